//! Refresher task implementation
//!
//! Runs as a tokio async event loop: a fixed interval drives periodic
//! refresh cycles, a capacity-1 channel carries coalesced manual-refresh
//! signals, and a shutdown channel ends the loop between cycles.

use crate::cache::SnapshotStore;
use crate::schema::{SchemaSnapshot, SnapshotSource};
use crate::sparql::SchemaSource;
use crate::Result;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, mpsc};

/// Default refresh interval (5 minutes)
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(300);

/// Default row limit for both schema queries
pub const DEFAULT_QUERY_LIMIT: usize = 100;

/// Default event broadcast channel capacity
pub const DEFAULT_EVENT_CHANNEL_CAPACITY: usize = 64;

/// Refresher configuration
#[derive(Debug, Clone)]
pub struct RefresherConfig {
    /// Interval between automatic refresh cycles
    pub interval: Duration,

    /// Row limit applied to both schema queries
    pub query_limit: usize,

    /// Event broadcast channel capacity
    pub event_channel_capacity: usize,
}

impl Default for RefresherConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_REFRESH_INTERVAL,
            query_limit: DEFAULT_QUERY_LIMIT,
            event_channel_capacity: DEFAULT_EVENT_CHANNEL_CAPACITY,
        }
    }
}

impl RefresherConfig {
    /// Set the refresh interval
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Set the query row limit
    pub fn with_query_limit(mut self, limit: usize) -> Self {
        self.query_limit = limit;
        self
    }
}

/// Events emitted by the refresher
#[derive(Debug, Clone)]
pub enum RefresherEvent {
    /// Loop started
    Started,

    /// Loop stopped
    Stopped,

    /// Refresh cycle started
    RefreshStarted,

    /// Refresh cycle published a new snapshot
    RefreshCompleted {
        /// Unique classes in the published snapshot
        classes: usize,
        /// Unique predicates in the published snapshot
        predicates: usize,
    },

    /// Refresh cycle failed; the previous snapshot stands
    RefreshFailed {
        /// Failure description
        message: String,
    },
}

/// Cross-context handle into a running refresher
///
/// Cheap to clone; safe to use from request handlers.
#[derive(Debug, Clone)]
pub struct RefreshHandle {
    refresh_tx: mpsc::Sender<()>,
    shutdown_tx: mpsc::Sender<()>,
}

impl RefreshHandle {
    /// Request a refresh, fire-and-forget
    ///
    /// Returns true when the signal was queued, false when it was coalesced
    /// into one already pending (at most one fetch is ever in flight, and at
    /// most one more queued).
    pub fn refresh_now(&self) -> bool {
        match self.refresh_tx.try_send(()) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(())) => {
                tracing::debug!("Refresh already pending, signal coalesced");
                false
            }
            Err(mpsc::error::TrySendError::Closed(())) => {
                tracing::warn!("Refresher is gone, ignoring refresh request");
                false
            }
        }
    }

    /// Ask the loop to stop after the current cycle
    pub async fn shutdown(&self) {
        let _ = self.shutdown_tx.send(()).await;
    }
}

/// Background refresher
///
/// Generic over the schema source so tests can drive it without a network.
pub struct Refresher<S: SchemaSource> {
    config: RefresherConfig,
    source: S,
    store: Arc<SnapshotStore>,

    event_tx: broadcast::Sender<RefresherEvent>,

    refresh_tx: mpsc::Sender<()>,
    refresh_rx: Option<mpsc::Receiver<()>>,

    shutdown_tx: mpsc::Sender<()>,
    shutdown_rx: Option<mpsc::Receiver<()>>,
}

impl<S: SchemaSource> Refresher<S> {
    /// Create a new refresher over a source and store
    pub fn new(source: S, store: Arc<SnapshotStore>, config: RefresherConfig) -> Self {
        let (event_tx, _) = broadcast::channel(config.event_channel_capacity);
        // Capacity 1 makes the manual-refresh queue a coalescing slot
        let (refresh_tx, refresh_rx) = mpsc::channel(1);
        let (shutdown_tx, shutdown_rx) = mpsc::channel(1);

        Self {
            config,
            source,
            store,
            event_tx,
            refresh_tx,
            refresh_rx: Some(refresh_rx),
            shutdown_tx,
            shutdown_rx: Some(shutdown_rx),
        }
    }

    /// Get an event subscriber
    pub fn subscribe(&self) -> broadcast::Receiver<RefresherEvent> {
        self.event_tx.subscribe()
    }

    /// Get a handle for manual refresh and shutdown
    pub fn handle(&self) -> RefreshHandle {
        RefreshHandle {
            refresh_tx: self.refresh_tx.clone(),
            shutdown_tx: self.shutdown_tx.clone(),
        }
    }

    fn send_event(&self, event: RefresherEvent) {
        // No receivers is fine; events are observability, not control flow
        let _ = self.event_tx.send(event);
    }

    /// Run the refresh loop until shutdown
    ///
    /// The first interval tick fires immediately, so startup performs an
    /// initial live fetch without waiting a full period.
    pub async fn run(mut self) -> Result<()> {
        self.send_event(RefresherEvent::Started);
        tracing::info!(
            interval_secs = self.config.interval.as_secs(),
            limit = self.config.query_limit,
            "Refresher started"
        );

        let mut interval = tokio::time::interval(self.config.interval);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        let mut refresh_rx = self
            .refresh_rx
            .take()
            .ok_or_else(|| crate::SchemascopeError::Other("Refresher already running".to_string()))?;
        let mut shutdown_rx = self
            .shutdown_rx
            .take()
            .ok_or_else(|| crate::SchemascopeError::Other("Refresher already running".to_string()))?;

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    self.refresh_cycle().await;
                }
                Some(()) = refresh_rx.recv() => {
                    tracing::info!("Manual refresh requested");
                    self.refresh_cycle().await;
                }
                _ = shutdown_rx.recv() => {
                    tracing::info!("Refresher shutting down");
                    break;
                }
            }
        }

        self.send_event(RefresherEvent::Stopped);
        Ok(())
    }

    /// One fetch-then-maybe-publish cycle
    async fn refresh_cycle(&mut self) {
        self.send_event(RefresherEvent::RefreshStarted);

        match self.fetch_snapshot().await {
            Ok(snapshot) => {
                let classes = snapshot.stats.total_classes;
                let predicates = snapshot.stats.total_predicates;
                self.store.publish(snapshot);
                self.send_event(RefresherEvent::RefreshCompleted {
                    classes,
                    predicates,
                });
            }
            Err(e) => {
                // The previous snapshot stays authoritative
                tracing::warn!(error = %e, "Refresh failed, keeping current snapshot");
                self.send_event(RefresherEvent::RefreshFailed {
                    message: e.to_string(),
                });
            }
        }
    }

    /// Fetch both element kinds and assemble a live snapshot
    async fn fetch_snapshot(&self) -> Result<SchemaSnapshot> {
        let classes = self.source.fetch_classes(self.config.query_limit).await?;
        let predicates = self.source.fetch_predicates(self.config.query_limit).await?;

        Ok(SchemaSnapshot::from_elements(
            classes,
            predicates,
            SnapshotSource::Live,
        ))
    }
}
