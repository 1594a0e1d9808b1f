//! Resource path grammar for remote-system administrative objects
//!
//! Provides [`ResourceIdentifier`], the normalized `{library, name, type_tag}`
//! triple that addresses one object on the remote system, and the locator that
//! parses it out of the opaque editor paths handed over by the host UI.

pub mod identifier;

pub use identifier::{ResourceError, ResourceIdentifier};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
