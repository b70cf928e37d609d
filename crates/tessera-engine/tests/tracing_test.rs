//! Tracing setup tests. Output goes to stderr; these only check that
//! initialization accepts every input without panicking.

use std::sync::{Arc, Mutex};

use tessera_core::config::{ObservabilityConfig, TesseraConfig};
use tessera_core::intent::Intent;
use tessera_core::models::Element;
use tessera_engine::tracing_setup::spans::names;
use tessera_engine::{init_tracing, init_tracing_with, CompositionEngine};
use tessera_storage::InMemoryRepository;

/// Serializes tests that touch `TESSERA_LOG`.
static TRACING_MUTEX: Mutex<()> = Mutex::new(());

#[test]
fn debug_filter_is_accepted() {
    let _lock = TRACING_MUTEX.lock().unwrap();
    std::env::set_var("TESSERA_LOG", "tessera=debug");
    init_tracing();
    std::env::remove_var("TESSERA_LOG");
}

#[test]
fn per_crate_filters_are_accepted() {
    let _lock = TRACING_MUTEX.lock().unwrap();
    std::env::set_var("TESSERA_LOG", "tessera_selection=debug,tessera_storage=warn");
    init_tracing();
    std::env::remove_var("TESSERA_LOG");
}

#[test]
fn garbage_filter_falls_back() {
    let _lock = TRACING_MUTEX.lock().unwrap();
    std::env::set_var("TESSERA_LOG", "this_is_garbage_not_a_valid_filter");
    init_tracing();
    std::env::remove_var("TESSERA_LOG");
}

#[test]
fn repeated_initialization_is_harmless() {
    let _lock = TRACING_MUTEX.lock().unwrap();
    init_tracing();
    init_tracing_with(&ObservabilityConfig {
        log_level: "debug".to_string(),
        json_logs: true,
    });
    init_tracing();
}

#[test]
fn pipeline_runs_under_an_installed_subscriber() {
    let _lock = TRACING_MUTEX.lock().unwrap();
    init_tracing();
    let elements: Vec<Element> = test_fixtures::portrait_library();
    let repo = InMemoryRepository::with_elements(&elements).unwrap();
    let engine = CompositionEngine::new(TesseraConfig::default(), Arc::new(repo)).unwrap();
    let intent: Intent = test_fixtures::intent("pinned_conflict");
    assert!(engine.compose(&intent, None).is_ok());
}

#[test]
fn stage_span_names_follow_the_pipeline() {
    assert_eq!(
        names::STAGES,
        ["tessera.select", "tessera.check", "tessera.resolve", "tessera.compose", "tessera.audit"]
    );
}
