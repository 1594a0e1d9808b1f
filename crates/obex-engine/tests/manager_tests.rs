//! Session-table tests: one session per resource, busy rejection, routing

mod common;

use common::{Calls, ProbeHandler, Script};
use obex_engine::{
    ActionRequest, ActionResult, DocumentManager, EngineConfig, EngineError, HandlerRegistry,
};
use obex_resource::ResourceIdentifier;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

struct Fixture {
    calls: Arc<Calls>,
    script: Arc<Script>,
    factory_calls: Arc<AtomicUsize>,
    manager: DocumentManager,
}

fn fixture_with(config: EngineConfig, gate: Option<Arc<Notify>>) -> Fixture {
    let calls = Arc::new(Calls::default());
    let script = Arc::new(Script::default());
    let factory_calls = Arc::new(AtomicUsize::new(0));

    let mut registry = HandlerRegistry::new();
    {
        let calls = Arc::clone(&calls);
        let script = Arc::clone(&script);
        let factory_calls = Arc::clone(&factory_calls);
        registry.register("DTAQ", move |_identifier| {
            factory_calls.fetch_add(1, Ordering::SeqCst);
            match &gate {
                Some(gate) => Box::new(ProbeHandler::gated(
                    Arc::clone(&calls),
                    Arc::clone(&script),
                    Arc::clone(gate),
                )),
                None => Box::new(ProbeHandler::new(Arc::clone(&calls), Arc::clone(&script))),
            }
        });
    }

    Fixture {
        calls,
        script,
        factory_calls,
        manager: DocumentManager::new(registry, config),
    }
}

fn fixture() -> Fixture {
    fixture_with(EngineConfig::new(), None)
}

fn request(name: &str) -> ActionRequest {
    ActionRequest::new(name, HashMap::new(), HashMap::new())
}

#[tokio::test]
async fn open_yields_the_parsed_identifier() {
    let f = fixture();

    let opened = f.manager.open("/x/PAYROLL/QUEUE1.DTAQ").await.unwrap();

    assert_eq!(opened.identifier.library(), "PAYROLL");
    assert_eq!(opened.identifier.name(), "QUEUE1");
    assert_eq!(opened.identifier.type_tag(), "DTAQ");
    assert!(!opened.failed_fetch);
    assert_eq!(opened.markup, "## probe");
    assert_eq!(f.manager.open_count(), 1);
}

#[tokio::test]
async fn malformed_path_constructs_nothing() {
    let f = fixture();

    let err = f.manager.open("/x/PAYROLL").await.unwrap_err();

    assert!(matches!(err, EngineError::Resource(_)));
    assert_eq!(f.factory_calls.load(Ordering::SeqCst), 0);
    assert_eq!(f.manager.open_count(), 0);
}

#[tokio::test]
async fn extensionless_path_is_unsupported_not_malformed() {
    let f = fixture();

    let err = f.manager.open("/x/LIBA/OBJ1").await.unwrap_err();

    assert!(matches!(err, EngineError::UnsupportedType(ref tag) if tag.is_empty()));
    // No handler constructed, no fetch issued
    assert_eq!(f.factory_calls.load(Ordering::SeqCst), 0);
    assert_eq!(f.calls.fetches(), 0);
}

#[tokio::test]
async fn unknown_tag_runs_no_fetch() {
    let f = fixture();

    let err = f.manager.open("/x/LIBA/JRNL1.JRN").await.unwrap_err();

    assert!(matches!(err, EngineError::UnsupportedType(ref tag) if tag == "JRN"));
    assert_eq!(f.calls.fetches(), 0);
}

#[tokio::test]
async fn second_open_for_same_resource_is_rejected() {
    let f = fixture();

    f.manager.open("/x/PAYROLL/QUEUE1.DTAQ").await.unwrap();
    let err = f.manager.open("/x/payroll/queue1.dtaq").await.unwrap_err();

    assert!(matches!(err, EngineError::AlreadyOpen(_)));
    // The losing open constructed no second handler
    assert_eq!(f.factory_calls.load(Ordering::SeqCst), 1);
    assert_eq!(f.manager.open_count(), 1);
}

#[tokio::test]
async fn session_table_capacity_is_enforced() {
    let f = fixture_with(EngineConfig::new().with_max_open_documents(1), None);

    f.manager.open("/x/PAYROLL/QUEUE1.DTAQ").await.unwrap();
    let err = f.manager.open("/x/PAYROLL/QUEUE2.DTAQ").await.unwrap_err();

    assert!(matches!(err, EngineError::TooManyDocuments(1)));
}

#[tokio::test]
async fn concurrent_action_is_rejected_busy() {
    let gate = Arc::new(Notify::new());
    let f = fixture_with(EngineConfig::new(), Some(Arc::clone(&gate)));
    let manager = Arc::new(f.manager);

    let opened = manager.open("/x/PAYROLL/QUEUE1.DTAQ").await.unwrap();
    let identifier = opened.identifier.clone();

    let in_flight = {
        let manager = Arc::clone(&manager);
        let identifier = identifier.clone();
        tokio::spawn(async move { manager.act(&identifier, request("slow")).await })
    };

    // Wait until the first action is parked inside the handler
    while f.calls.actions() == 0 {
        tokio::task::yield_now().await;
    }

    let err = manager.act(&identifier, request("second")).await.unwrap_err();
    assert!(err.is_busy());

    gate.notify_one();
    let first = in_flight.await.unwrap().unwrap();
    assert!(first.is_none());

    // The handler saw exactly one action
    assert_eq!(f.calls.actions(), 1);
}

#[tokio::test]
async fn close_disposes_and_frees_the_session() {
    let f = fixture();

    let opened = f.manager.open("/x/PAYROLL/QUEUE1.DTAQ").await.unwrap();
    f.manager.close(&opened.identifier).unwrap();

    assert_eq!(f.calls.disposals(), 1);
    assert_eq!(f.manager.open_count(), 0);

    let err = f.manager.close(&opened.identifier).unwrap_err();
    assert!(matches!(err, EngineError::NotOpen(_)));

    // The resource can be opened again after close
    f.manager.open("/x/PAYROLL/QUEUE1.DTAQ").await.unwrap();
    assert_eq!(f.manager.open_count(), 1);
}

#[tokio::test]
async fn status_tracks_dirty_through_act_and_save() {
    let f = fixture();
    f.script.push_action(Ok(ActionResult::dirty()));

    let opened = f.manager.open("/x/PAYROLL/QUEUE1.DTAQ").await.unwrap();
    let identifier = &opened.identifier;

    assert!(!f.manager.status(identifier).unwrap().dirty);

    f.manager.act(identifier, request("edit")).await.unwrap();
    assert!(f.manager.status(identifier).unwrap().dirty);

    f.manager.save(identifier).await.unwrap();
    assert!(!f.manager.status(identifier).unwrap().dirty);
}

#[tokio::test]
async fn revert_routes_through_the_manager() {
    let f = fixture();
    f.script.push_action(Ok(ActionResult::dirty()));

    let opened = f.manager.open("/x/PAYROLL/QUEUE1.DTAQ").await.unwrap();
    f.manager.act(&opened.identifier, request("edit")).await.unwrap();

    let markup = f.manager.revert(&opened.identifier).await.unwrap();

    assert_eq!(markup, "## probe");
    assert!(!f.manager.status(&opened.identifier).unwrap().dirty);
    assert_eq!(f.calls.fetches(), 2);
}

#[tokio::test]
async fn act_on_unopened_resource_is_not_open() {
    let f = fixture();
    let identifier = ResourceIdentifier::resolve("/x/PAYROLL/QUEUE1.DTAQ").unwrap();

    let err = f.manager.act(&identifier, request("edit")).await.unwrap_err();
    assert!(matches!(err, EngineError::NotOpen(_)));
}
