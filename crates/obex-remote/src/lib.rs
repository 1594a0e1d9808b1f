//! Remote-system I/O capability for OBEX
//!
//! Defines the asynchronous command/query surface handlers use to talk to the
//! remote system:
//! - [`RemoteSystemClient`] - the capability trait, injected into handlers
//! - [`CommandOutcome`] - result of one remote command invocation
//! - [`Row`] - typed accessors over loosely-typed remote result rows
//! - [`replay::ReplayClient`] - scripted client for tests and offline use
//!
//! The engine never talks to the remote system itself; it only drives
//! handlers, which own this capability. Connection management and transport
//! concurrency live behind implementations of the trait.

pub mod client;
pub mod error;
pub mod replay;
pub mod row;

pub use client::{CommandOutcome, RemoteSystemClient};
pub use error::RemoteError;
pub use replay::ReplayClient;
pub use row::Row;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
