//! OBEX Engine - document lifecycle and action dispatch
//!
//! The generic core between a host UI shell and the per-object-type
//! handlers:
//! - Resolves opaque editor paths to handler instances through a registry
//! - Orchestrates fetch/render/act/save/dispose transitions per document
//! - Interprets the handler contract (`dirty`, `rerender`) to decide what
//!   the UI must do next
//!
//! # Example
//!
//! ```rust,ignore
//! use obex_engine::{ActionRequest, DocumentManager, EngineConfig, HandlerRegistry};
//!
//! # async fn example(registry: HandlerRegistry) -> Result<(), Box<dyn std::error::Error>> {
//! let manager = DocumentManager::new(registry, EngineConfig::new());
//!
//! let opened = manager.open("/x/PAYROLL/QUEUE1.DTAQ").await?;
//! println!("{}", opened.markup);
//!
//! let request = ActionRequest::parse("action:clear?confirm=yes", Default::default())?;
//! if let Some(markup) = manager.act(&opened.identifier, request).await? {
//!     println!("{markup}");
//! }
//! # Ok(())
//! # }
//! ```

// Core modules
pub mod config;
pub mod controller;
pub mod dispatch;
pub mod document;
pub mod error;
pub mod handler;
pub mod manager;
pub mod registry;
pub mod render;

// Re-exports for convenience
pub use config::EngineConfig;
pub use controller::DocumentController;
pub use dispatch::{ActionDispatcher, ActionRequest};
pub use document::{Document, DocumentId};
pub use error::{EngineError, HandlerError};
pub use handler::{ActionPayload, ActionResult, FetchOutcome, ObjectHandler};
pub use manager::{DocumentManager, DocumentStatus, OpenedDocument};
pub use registry::{HandlerFactory, HandlerRegistry};
pub use render::{RenderGate, RenderTrigger};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with the engine
    pub use crate::{
        ActionPayload, ActionRequest, ActionResult, DocumentManager, EngineConfig, EngineError,
        FetchOutcome, HandlerError, HandlerRegistry, ObjectHandler,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
