//! The full trust manager node orchestrator.
//!
//! Wires storage, stat sources, the calculator, the scheduled jobs, event
//! ingestion and the HTTP API together, then runs until shut down.

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;

use fedtrust_bus::{BroadcastBus, TrustPublisher};
use fedtrust_core::events::{IngestEvent, TrustUpdate};
use fedtrust_core::TrustEntryType;
use fedtrust_scoring::TrustCalculator;
use fedtrust_stats::{RestHistorySource, RestStatsLoader, StatsEndpoints};
use fedtrust_store::{RocksStore, TrustStore, ViolationLog};

use crate::api::{self, ApiState};
use crate::config::FedtrustConfig;
use crate::ingest::EventIngestor;
use crate::scheduler::UpdateScheduler;

/// Capacity of the inbound event channel.
const INGEST_CHANNEL_CAPACITY: usize = 256;

/// The trust manager node.
pub struct TrustNode {
    config: FedtrustConfig,
    bus: Arc<BroadcastBus>,
    /// Sends inbound domain events into the ingest loop.
    event_tx: mpsc::Sender<IngestEvent>,
    event_rx: Option<mpsc::Receiver<IngestEvent>>,
    tasks: Vec<JoinHandle<()>>,
}

impl TrustNode {
    pub fn new(config: FedtrustConfig) -> Self {
        let (event_tx, event_rx) = mpsc::channel(INGEST_CHANNEL_CAPACITY);
        Self {
            config,
            bus: Arc::new(BroadcastBus::default()),
            event_tx,
            event_rx: Some(event_rx),
            tasks: Vec::new(),
        }
    }

    /// Handle for feeding inbound domain events to the node.
    pub fn event_sender(&self) -> mpsc::Sender<IngestEvent> {
        self.event_tx.clone()
    }

    /// Subscribe to outbound trust update notifications.
    pub fn subscribe_updates(&self) -> broadcast::Receiver<TrustUpdate> {
        self.bus.subscribe()
    }

    /// Initialize and start all node components.
    pub async fn start(&mut self) -> Result<()> {
        tracing::info!(platform_id = %self.config.platform.id, "starting trust manager node");

        let rocks = Arc::new(RocksStore::open(&self.config.storage.data_dir)?);
        let store: Arc<dyn TrustStore> = rocks.clone();
        let violations: Arc<dyn ViolationLog> = rocks;
        tracing::info!(path = %self.config.storage.data_dir.display(), "storage initialized");

        let timeout = Duration::from_secs(self.config.collaborators.request_timeout_secs);
        let stats = Arc::new(RestStatsLoader::new(
            StatsEndpoints {
                monitoring_url: self.config.collaborators.monitoring_url.clone(),
                anomaly_url: self.config.collaborators.anomaly_url.clone(),
                bartering_url: self.config.collaborators.bartering_url.clone(),
            },
            timeout,
        )?);
        let history = Arc::new(RestHistorySource::new(
            self.config.collaborators.federation_history_url.clone(),
            timeout,
        )?);

        let calculator = Arc::new(TrustCalculator::new(
            stats,
            history,
            store.clone(),
            violations.clone(),
        ));

        // Event ingestion loop
        let ingestor = EventIngestor::new(
            self.config.platform.id.clone(),
            store.clone(),
            violations.clone(),
        );
        let event_rx = self
            .event_rx
            .take()
            .ok_or_else(|| anyhow::anyhow!("node already started"))?;
        self.tasks.push(tokio::spawn(async move {
            ingestor.run(event_rx).await;
        }));

        // Scheduled recomputation jobs, one per entry type
        let publisher: Arc<dyn TrustPublisher> = self.bus.clone();
        let scheduler = Arc::new(UpdateScheduler::new(
            calculator.clone(),
            store.clone(),
            publisher,
            self.config.scheduler.staleness_window_minutes,
        ));
        let periods = [
            (
                TrustEntryType::ResourceTrust,
                self.config.scheduler.resource_trust_period_secs,
            ),
            (
                TrustEntryType::PlatformReputation,
                self.config.scheduler.platform_reputation_period_secs,
            ),
            (
                TrustEntryType::AdaptiveResourceTrust,
                self.config.scheduler.adaptive_resource_trust_period_secs,
            ),
        ];
        for (entry_type, period_secs) in periods {
            self.tasks
                .push(Arc::clone(&scheduler).spawn(entry_type, Duration::from_secs(period_secs)));
        }

        // HTTP API
        let api_addr: SocketAddr =
            format!("{}:{}", self.config.api.listen_addr, self.config.api.port).parse()?;
        let api_state = Arc::new(ApiState {
            platform_id: self.config.platform.id.clone(),
            store,
            calculator,
            start_time: Instant::now(),
        });
        self.tasks.push(tokio::spawn(async move {
            if let Err(e) = api::start_api_server(api_addr, api_state).await {
                tracing::error!(error = %e, "HTTP API server error");
            }
        }));

        Ok(())
    }

    /// Stop all background tasks.
    pub async fn shutdown(&mut self) {
        for task in self.tasks.drain(..) {
            task.abort();
        }
        tracing::info!("trust manager node stopped");
    }
}
