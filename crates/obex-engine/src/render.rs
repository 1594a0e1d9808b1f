//! The render gate
//!
//! Decides, after any lifecycle transition, whether the view markup must be
//! regenerated or left untouched. The rule is deliberately narrow: opening
//! (and reverting, which re-runs open semantics) always renders; an action
//! renders only when its result asked for it; nothing else does. In
//! particular a dirty-only result never renders - regenerating markup would
//! discard in-progress, unsubmitted user input in other fields.

use crate::document::Document;

/// What just happened to the document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderTrigger {
    /// A successful open
    Open,
    /// A revert (reload from remote)
    Revert,
    /// An applied action with its `rerender` flag
    Action {
        /// The `rerender` bit of the applied action result
        rerender: bool,
    },
    /// A successful save
    Save,
}

/// Gate between lifecycle transitions and markup regeneration
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderGate;

impl RenderGate {
    /// Whether markup must be regenerated after the given transition
    #[inline]
    #[must_use]
    pub fn should_render(trigger: RenderTrigger) -> bool {
        match trigger {
            RenderTrigger::Open | RenderTrigger::Revert => true,
            RenderTrigger::Action { rerender } => rerender,
            RenderTrigger::Save => false,
        }
    }

    /// Regenerate markup from the handler's current in-memory state
    ///
    /// Pure delegation: no re-fetch, no hidden state. A handler that needs
    /// fresh remote data must have re-fetched before its action returned.
    #[must_use]
    pub fn render(document: &Document) -> String {
        document.handler().render()
    }
}
