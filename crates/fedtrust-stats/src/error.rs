/// Errors internal to the REST stat fetchers.
///
/// These never escape the crate: fetch methods log the failure and degrade
/// to an absent signal.
#[derive(Debug, thiserror::Error)]
pub enum StatsError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected status {status} from {url}")]
    BadStatus {
        status: reqwest::StatusCode,
        url: String,
    },

    #[error("empty response from {0}")]
    EmptyResponse(String),
}
