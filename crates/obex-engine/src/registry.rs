//! Handler registry
//!
//! Maps upper-cased type tags to handler factories. Lookup happens once per
//! open, before any handler exists; an unknown tag aborts the open so the UI
//! can show "no support for type X yet". Factories are synchronous and must
//! not perform I/O - all remote traffic belongs in `fetch`.

use crate::error::EngineError;
use crate::handler::ObjectHandler;
use indexmap::IndexMap;
use obex_resource::ResourceIdentifier;
use std::fmt;

/// Factory constructing one handler instance for one resource
pub type HandlerFactory = Box<dyn Fn(&ResourceIdentifier) -> Box<dyn ObjectHandler> + Send + Sync>;

/// Registry of per-type handler factories
///
/// Extensible at runtime: hosts register additional types with
/// [`register`](Self::register). Tags are stored and looked up upper-cased.
#[derive(Default)]
pub struct HandlerRegistry {
    factories: IndexMap<String, HandlerFactory>,
}

impl HandlerRegistry {
    /// Create new empty registry
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            factories: IndexMap::new(),
        }
    }

    /// Register a factory for a type tag
    ///
    /// A later registration for the same tag replaces the earlier one.
    pub fn register<F>(&mut self, tag: &str, factory: F)
    where
        F: Fn(&ResourceIdentifier) -> Box<dyn ObjectHandler> + Send + Sync + 'static,
    {
        self.factories
            .insert(tag.to_uppercase(), Box::new(factory));
    }

    /// Construct a handler for the identifier's type tag
    ///
    /// # Errors
    /// Returns [`EngineError::UnsupportedType`] carrying the offending tag
    /// when nothing is registered for it. No handler is constructed and no
    /// fetch runs in that case.
    pub fn create(
        &self,
        identifier: &ResourceIdentifier,
    ) -> Result<Box<dyn ObjectHandler>, EngineError> {
        let tag = identifier.type_tag();
        let factory = self
            .factories
            .get(tag)
            .ok_or_else(|| EngineError::UnsupportedType(tag.to_string()))?;
        Ok(factory(identifier))
    }

    /// Check if a tag has a registered handler
    #[inline]
    #[must_use]
    pub fn contains(&self, tag: &str) -> bool {
        self.factories.contains_key(&tag.to_uppercase())
    }

    /// Registered tags in registration order
    #[must_use]
    pub fn supported_types(&self) -> Vec<&str> {
        self.factories.keys().map(String::as_str).collect()
    }

    /// Number of registered types
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    /// Check if the registry is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

impl fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerRegistry")
            .field("types", &self.supported_types())
            .finish()
    }
}
