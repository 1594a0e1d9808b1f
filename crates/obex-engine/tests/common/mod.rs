//! Shared probe handler for engine integration tests
#![allow(dead_code)]

use obex_engine::{ActionPayload, ActionResult, FetchOutcome, HandlerError, ObjectHandler};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

/// Invocation counters, shared between a probe and its test
#[derive(Debug, Default)]
pub struct Calls {
    pub fetch: AtomicUsize,
    pub render: AtomicUsize,
    pub action: AtomicUsize,
    pub save: AtomicUsize,
    pub dispose: AtomicUsize,
}

impl Calls {
    pub fn fetches(&self) -> usize {
        self.fetch.load(Ordering::SeqCst)
    }

    pub fn renders(&self) -> usize {
        self.render.load(Ordering::SeqCst)
    }

    pub fn actions(&self) -> usize {
        self.action.load(Ordering::SeqCst)
    }

    pub fn saves(&self) -> usize {
        self.save.load(Ordering::SeqCst)
    }

    pub fn disposals(&self) -> usize {
        self.dispose.load(Ordering::SeqCst)
    }
}

/// Scripted results, consumed front to back; defaults when exhausted
#[derive(Debug, Default)]
pub struct Script {
    pub fetches: Mutex<VecDeque<Result<FetchOutcome, HandlerError>>>,
    pub actions: Mutex<VecDeque<Result<ActionResult, HandlerError>>>,
    pub saves: Mutex<VecDeque<Result<(), HandlerError>>>,
}

impl Script {
    pub fn push_fetch(&self, result: Result<FetchOutcome, HandlerError>) {
        self.fetches.lock().unwrap().push_back(result);
    }

    pub fn push_action(&self, result: Result<ActionResult, HandlerError>) {
        self.actions.lock().unwrap().push_back(result);
    }

    pub fn push_save(&self, result: Result<(), HandlerError>) {
        self.saves.lock().unwrap().push_back(result);
    }
}

/// Handler probe: counts invocations and replays scripted results
pub struct ProbeHandler {
    calls: Arc<Calls>,
    script: Arc<Script>,
    /// When set, `handle_action` parks on this until notified
    pub gate: Option<Arc<Notify>>,
}

impl ProbeHandler {
    pub fn new(calls: Arc<Calls>, script: Arc<Script>) -> Self {
        Self {
            calls,
            script,
            gate: None,
        }
    }

    pub fn gated(calls: Arc<Calls>, script: Arc<Script>, gate: Arc<Notify>) -> Self {
        Self {
            calls,
            script,
            gate: Some(gate),
        }
    }
}

#[async_trait::async_trait]
impl ObjectHandler for ProbeHandler {
    async fn fetch(&mut self) -> Result<FetchOutcome, HandlerError> {
        self.calls.fetch.fetch_add(1, Ordering::SeqCst);
        self.script
            .fetches
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(FetchOutcome::Loaded))
    }

    fn render(&self) -> String {
        self.calls.render.fetch_add(1, Ordering::SeqCst);
        "## probe".to_string()
    }

    async fn handle_action(&mut self, _payload: ActionPayload) -> Result<ActionResult, HandlerError> {
        self.calls.action.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        self.script
            .actions
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(ActionResult::none()))
    }

    async fn save(&mut self) -> Result<(), HandlerError> {
        self.calls.save.fetch_add(1, Ordering::SeqCst);
        self.script
            .saves
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(()))
    }

    fn dispose(&mut self) {
        self.calls.dispose.fetch_add(1, Ordering::SeqCst);
    }
}
