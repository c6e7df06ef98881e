//! Background snapshot poller
//!
//! On a fixed interval: fetch a snapshot, translate it, reconcile it into the
//! cloud cache. A failed fetch skips the tick and leaves the cache untouched;
//! the next tick is the only retry.
//!
//! ## Graceful Shutdown
//!
//! Shutdown is signalled over a watch channel. The signal is only observed
//! between passes, so a pass that has started always runs to completion and
//! no new pass starts afterwards.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn, Instrument};

use crate::cache::{CloudCache, ReconcileReport};
use crate::config::AppConfig;
use crate::errors::{Error, Result};
use crate::observability::MetricsRecorder;
use crate::source::SnapshotSource;
use crate::translate::Translator;

/// Shortest interval the poller will tick at; `tokio::time::interval` rejects zero
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Drives the fetch, translate, reconcile pipeline for one proxy
pub struct Poller {
    source: Arc<dyn SnapshotSource>,
    translator: Translator,
    cache: Arc<CloudCache>,
    proxy_id: String,
    interval: Duration,
    metrics: MetricsRecorder,
}

impl Poller {
    pub fn new(
        source: Arc<dyn SnapshotSource>,
        translator: Translator,
        cache: Arc<CloudCache>,
        proxy_id: impl Into<String>,
        interval: Duration,
    ) -> Self {
        let interval = if interval < MIN_POLL_INTERVAL {
            warn!(
                requested_ms = interval.as_millis() as u64,
                minimum_ms = MIN_POLL_INTERVAL.as_millis() as u64,
                "Poll interval below minimum, clamping"
            );
            MIN_POLL_INTERVAL
        } else {
            interval
        };

        Self {
            source,
            translator,
            cache,
            proxy_id: proxy_id.into(),
            interval,
            metrics: MetricsRecorder::new(),
        }
    }

    /// Build a poller from the `sync` section of the configuration
    pub fn from_config(
        config: &AppConfig,
        source: Arc<dyn SnapshotSource>,
        cache: Arc<CloudCache>,
    ) -> Self {
        Self::new(
            source,
            Translator::new(&config.sync.tenant),
            cache,
            &config.sync.proxy_id,
            config.sync.poll_interval(),
        )
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Run a single fetch, translate, reconcile pass.
    ///
    /// The fetch happens before the cache lock is taken; on fetch failure the
    /// cache is not touched at all.
    pub async fn poll_once(&self) -> Result<ReconcileReport> {
        let span = crate::reconcile_span!(self.translator.tenant(), self.proxy_id);

        async {
            let snapshot = match self
                .source
                .fetch(&self.proxy_id)
                .instrument(crate::fetch_span!(self.proxy_id))
                .await
            {
                Ok(snapshot) => snapshot,
                Err(e) => {
                    self.metrics.record_fetch_failure();
                    return Err(e);
                }
            };

            debug!(services = snapshot.services.len(), "Fetched configuration snapshot");
            let ir = self.translator.translate(&snapshot);
            self.cache.reconcile(ir)
        }
        .instrument(span)
        .await
    }

    /// Start polling on a background task.
    ///
    /// The first pass runs immediately, then once per interval.
    pub fn spawn(self) -> PollerHandle {
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);

        info!(
            proxy_id = %self.proxy_id,
            tenant = %self.translator.tenant(),
            interval_ms = self.interval.as_millis() as u64,
            "Starting snapshot poller"
        );

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(self.interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    biased;

                    changed = shutdown_rx.changed() => {
                        if changed.is_err() || *shutdown_rx.borrow() {
                            info!(proxy_id = %self.proxy_id, "Snapshot poller stopped");
                            break;
                        }
                    }

                    _ = ticker.tick() => {
                        self.run_tick().await;
                    }
                }
            }
        });

        PollerHandle { shutdown_tx, task }
    }

    async fn run_tick(&self) {
        match self.poll_once().await {
            Ok(report) => {
                debug!(notifications = report.total(), "Poll tick complete");
            }
            Err(e) if e.is_retryable() => {
                warn!(error = %e, proxy_id = %self.proxy_id, "Snapshot poll failed, skipping tick");
            }
            Err(e) => {
                error!(error = %e, proxy_id = %self.proxy_id, "Snapshot poll failed, skipping tick");
            }
        }
    }
}

/// Handle for controlling a running poller
pub struct PollerHandle {
    shutdown_tx: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl PollerHandle {
    /// Ask the poller to stop after the current pass, if any
    pub fn shutdown(&self) {
        info!("Initiating graceful shutdown of snapshot poller");
        let _ = self.shutdown_tx.send(true);
    }

    /// Wait for the poller task to finish
    pub async fn join(self) -> Result<()> {
        self.task
            .await
            .map_err(|e| Error::internal(format!("Snapshot poller task failed: {}", e)))
    }

    pub async fn shutdown_and_join(self) -> Result<()> {
        self.shutdown();
        self.join().await
    }
}
