//! Application state and composition.

use std::sync::Arc;

use anyhow::Context;
use tokio::task::JoinHandle;

use skillquest_domain::{Catalog, CourseId, UserId};

use crate::config::AppConfig;
use crate::infrastructure::{
    catalog_loader::CatalogLoader,
    clock::SystemClock,
    ports::{ClockPort, ProgressServicePort, SnapshotError, SnapshotRepo},
    progress_http::HttpProgressService,
    resilient_progress::ResilientProgressService,
    snapshot_file::JsonFileSnapshotRepo,
    sync_worker::{SyncOutbox, SyncWorker},
};
use crate::stores::RestoreReport;
use crate::use_cases::ProgressionEngine;

/// Per-course progress line for status output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseSummary {
    pub course_id: CourseId,
    pub title: String,
    pub completed: usize,
    pub total: usize,
}

/// Main application state.
///
/// Owns the progression engine, the snapshot store and, for an
/// authenticated learner, the replication worker.
pub struct App {
    engine: ProgressionEngine,
    snapshots: Arc<dyn SnapshotRepo>,
    worker: Option<JoinHandle<()>>,
}

impl App {
    /// Wire up an app. With a remote, a [`SyncWorker`] is spawned on the
    /// current tokio runtime; without one, events stay local.
    pub fn new(
        catalog: Catalog,
        snapshots: Arc<dyn SnapshotRepo>,
        remote: Option<(UserId, Arc<dyn ProgressServicePort>)>,
        clock: Arc<dyn ClockPort>,
    ) -> Self {
        match remote {
            Some((user_id, service)) => {
                let (outbox, receiver) = SyncOutbox::channel();
                let worker =
                    SyncWorker::new(receiver, Arc::clone(&service), user_id.clone()).spawn();
                let engine =
                    ProgressionEngine::new(catalog, outbox, clock).with_remote(user_id, service);
                Self {
                    engine,
                    snapshots,
                    worker: Some(worker),
                }
            }
            None => Self {
                engine: ProgressionEngine::new(catalog, SyncOutbox::disconnected(), clock),
                snapshots,
                worker: None,
            },
        }
    }

    /// Build the production app from configuration and restore the local
    /// snapshot.
    pub async fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        let catalog = CatalogLoader::load_file(&config.catalog_path)
            .await
            .with_context(|| format!("loading catalog {}", config.catalog_path.display()))?;

        let remote = config.user_id.clone().map(|user_id| {
            let http = Arc::new(HttpProgressService::new(
                &config.progress_url,
                config.http_timeout,
            ));
            tracing::info!(
                url = %config.progress_url,
                max_retries = config.retry.max_retries,
                base_delay_ms = config.retry.base_delay_ms,
                "Progress service configured"
            );
            let service: Arc<dyn ProgressServicePort> =
                Arc::new(ResilientProgressService::new(http, config.retry.clone()));
            (user_id, service)
        });
        if remote.is_none() {
            tracing::info!("No user configured, running as guest");
        }

        let snapshots = Arc::new(JsonFileSnapshotRepo::new(&config.snapshot_path));
        let mut app = Self::new(catalog, snapshots, remote, Arc::new(SystemClock::new()));

        if let Err(e) = app.restore().await {
            tracing::warn!(error = %e, "Could not restore local snapshot, starting fresh");
        }
        Ok(app)
    }

    pub fn engine(&self) -> &ProgressionEngine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut ProgressionEngine {
        &mut self.engine
    }

    /// Apply the saved snapshot, if any. Snapshots from another format
    /// version are ignored.
    pub async fn restore(&mut self) -> Result<Option<RestoreReport>, SnapshotError> {
        let Some(snapshot) = self.snapshots.load().await? else {
            tracing::debug!("No local snapshot to restore");
            return Ok(None);
        };

        match self.engine.restore_snapshot(snapshot) {
            Ok(report) => Ok(Some(report)),
            Err(SnapshotError::UnsupportedVersion { found, expected }) => {
                tracing::warn!(found, expected, "Ignoring snapshot with unsupported version");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Save the current learning state. A failure is logged and leaves the
    /// in-memory state as it is.
    pub async fn persist(&self) -> Result<(), SnapshotError> {
        let snapshot = self.engine.snapshot();
        match self.snapshots.save(&snapshot).await {
            Ok(()) => {
                tracing::debug!(levels = snapshot.levels.len(), "Snapshot saved");
                Ok(())
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to save snapshot");
                Err(e)
            }
        }
    }

    pub fn course_summaries(&self) -> Vec<CourseSummary> {
        self.engine
            .catalog()
            .courses()
            .iter()
            .map(|course| CourseSummary {
                course_id: course.id.clone(),
                title: course.title.clone(),
                completed: course.completed_count(),
                total: course.levels.len(),
            })
            .collect()
    }

    /// Close the outbox and wait for queued events to be replicated.
    pub async fn shutdown(self) {
        let Self { engine, worker, .. } = self;
        drop(engine);

        if let Some(worker) = worker {
            if let Err(e) = worker.await {
                tracing::error!(error = %e, "Sync worker terminated abnormally");
            }
        }
    }
}
