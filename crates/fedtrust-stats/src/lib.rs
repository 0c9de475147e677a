//! External signal sources for trust computation.
//!
//! The traits here are the Stats Loader boundary: every method degrades to
//! `None` on transport, auth or decode failure so that the formula layer
//! only ever sees "signal present" or "signal absent", never an error.

pub mod error;
pub mod rest;
pub mod traits;

pub use error::StatsError;
pub use rest::{RestHistorySource, RestStatsLoader, StatsEndpoints};
pub use traits::{FederationHistorySource, StatsLoader};
