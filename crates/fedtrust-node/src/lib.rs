//! The fedtrust composition service: configuration, scheduled
//! recomputation, event ingestion, HTTP API and the node orchestrator.

pub mod api;
pub mod config;
pub mod ingest;
pub mod node;
pub mod scheduler;

pub use config::FedtrustConfig;
pub use ingest::EventIngestor;
pub use node::TrustNode;
pub use scheduler::{BatchOutcome, UpdateScheduler};
