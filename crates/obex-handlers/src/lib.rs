//! Per-object-type handlers for the OBEX engine
//!
//! Each handler implements the engine's capability interface for one kind of
//! remote administrative object. Handlers convert remote catalog rows into
//! explicit typed state at the fetch boundary, render markdown-style markup,
//! and speak the two-bit `dirty`/`rerender` contract back to the engine.
//!
//! [`build_default_registry`] wires the built-in handlers into a
//! [`HandlerRegistry`](obex_engine::HandlerRegistry) against one injected
//! remote client.

pub mod data_area;
pub mod data_queue;
pub mod output_queue;
pub mod registry;

pub use data_area::DataAreaHandler;
pub use data_queue::DataQueueHandler;
pub use output_queue::OutputQueueHandler;
pub use registry::build_default_registry;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
