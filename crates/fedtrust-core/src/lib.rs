pub mod events;
pub mod history;
pub mod score;
pub mod types;
pub mod violation;

pub use history::FederationHistory;
pub use types::{EntryKey, TrustEntry, TrustEntryType};
pub use violation::Violation;
