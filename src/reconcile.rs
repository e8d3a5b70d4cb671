use serde::Serialize;
use tracing::{error, info};

use crate::db::Store;
use crate::error::Result;
use crate::sources::SourceAdapter;

/// Outcome of one reconciliation run. `total_found` counts every candidate a
/// completed source produced, duplicates included, so it grows on every rerun
/// even when the stored row count does not. `sources_synced` counts only
/// adapters that completed without error.
#[derive(Serialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub total_found: u64,
    pub sources_synced: u64,
}

/// Drives source adapters into the canonical store. The store handle is
/// injected; the reconciler owns nothing global.
pub struct Reconciler<'a> {
    store: &'a Store,
    adapters: Vec<Box<dyn SourceAdapter>>,
}

impl<'a> Reconciler<'a> {
    pub fn new(store: &'a Store) -> Self {
        Self {
            store,
            adapters: Vec::new(),
        }
    }

    pub fn register(&mut self, adapter: Box<dyn SourceAdapter>) {
        info!(source = adapter.name(), "registered source");
        self.adapters.push(adapter);
    }

    /// Runs every registered adapter in turn. An adapter failure is logged
    /// and skipped, never fatal and never retried; only a store failure
    /// aborts the run.
    pub fn run(&self) -> Result<SyncReport> {
        let mut report = SyncReport::default();
        for adapter in &self.adapters {
            match adapter.fetch() {
                Ok(drafts) => {
                    for draft in &drafts {
                        self.store.upsert_event(draft)?;
                        report.total_found += 1;
                    }
                    report.sources_synced += 1;
                    info!(source = adapter.name(), events = drafts.len(), "source synced");
                }
                Err(err) => {
                    error!(source = adapter.name(), error = %err, "source sync failed");
                }
            }
        }
        Ok(report)
    }
}
