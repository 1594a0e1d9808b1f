//! Default registry wiring
//!
//! Builds a [`HandlerRegistry`] with every built-in handler registered
//! against one injected remote client. The returned registry is an ordinary
//! value: hosts extend it with their own types before handing it to a
//! manager.

use crate::data_area::DataAreaHandler;
use crate::data_queue::DataQueueHandler;
use crate::output_queue::OutputQueueHandler;
use obex_engine::HandlerRegistry;
use obex_remote::RemoteSystemClient;
use std::sync::Arc;

/// Registry with the built-in handlers registered
#[must_use]
pub fn build_default_registry(client: Arc<dyn RemoteSystemClient>) -> HandlerRegistry {
    let mut registry = HandlerRegistry::new();

    {
        let client = Arc::clone(&client);
        registry.register(DataAreaHandler::TYPE_TAG, move |identifier| {
            Box::new(DataAreaHandler::new(identifier.clone(), Arc::clone(&client)))
        });
    }
    {
        let client = Arc::clone(&client);
        registry.register(DataQueueHandler::TYPE_TAG, move |identifier| {
            Box::new(DataQueueHandler::new(identifier.clone(), Arc::clone(&client)))
        });
    }
    {
        let client = Arc::clone(&client);
        registry.register(OutputQueueHandler::TYPE_TAG, move |identifier| {
            Box::new(OutputQueueHandler::new(
                identifier.clone(),
                Arc::clone(&client),
            ))
        });
    }

    registry
}
