//! Test fixtures and common test helpers.
//!
//! The sample catalog lives in `test_data/catalog.json`:
//!
//! | Level | XP | Game | Resources |
//! |-------|----|------|-----------|
//! | `dsa-1` | 100 | `sorting-race` (practice, pass 70) | - |
//! | `dsa-2` | 150 | `stack-tower` (practice, pass 60) | 1 |
//! | `dsa-3` | 200 | - | - |
//! | `web-1` | 80 | `tag-match` (teaching, pass 50) | - |
//! | `web-2` | 120 | - | 1 |
//!
//! The `dsa` course awards the `dsa-master` badge on completion.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use skillquest_domain::Catalog;
use tokio::sync::mpsc;

use crate::infrastructure::catalog_loader::CatalogLoader;
use crate::infrastructure::clock::FixedClock;
use crate::infrastructure::sync_worker::{OutboundEvent, SyncOutbox};
use crate::use_cases::ProgressionEngine;

/// Load a fixture file from the `test_data/` directory.
///
/// # Panics
///
/// Panics if the fixture file cannot be read.
pub fn load_fixture(name: &str) -> String {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("test_data")
        .join(name);
    std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("failed to read fixture {}: {}", path.display(), e))
}

pub fn sample_catalog() -> Catalog {
    CatalogLoader::from_json(&load_fixture("catalog.json")).expect("fixture catalog is valid")
}

pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0)
        .single()
        .expect("valid timestamp")
}

/// Engine over the sample catalog with a connected outbox, so tests can
/// inspect what would be replicated.
pub fn engine_with_outbox() -> (ProgressionEngine, mpsc::UnboundedReceiver<OutboundEvent>) {
    let (outbox, receiver) = SyncOutbox::channel();
    let engine = ProgressionEngine::new(sample_catalog(), outbox, Arc::new(FixedClock(fixed_now())));
    (engine, receiver)
}

/// Drain everything queued so far.
pub fn drain(receiver: &mut mpsc::UnboundedReceiver<OutboundEvent>) -> Vec<OutboundEvent> {
    let mut events = Vec::new();
    while let Ok(event) = receiver.try_recv() {
        events.push(event);
    }
    events
}
