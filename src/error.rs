//! Error types for the gateway and per-item processing.

/// Failures talking to reddit outside of reply sends.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("reddit returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("authentication failed: {0}")]
    Auth(String),

    #[error("unexpected response: {0}")]
    Decode(String),
}

/// Failures sending a reply. The tag decides whether the dispatcher retries.
#[derive(Debug, thiserror::Error)]
pub enum SendError {
    #[error("rate limited: {0}")]
    RateLimited(String),

    #[error("reddit API error: {0}")]
    Api(String),

    #[error("client error: {0}")]
    Client(String),

    #[error("transport error: {0}")]
    Transport(String),
}

impl SendError {
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            SendError::RateLimited(_) | SendError::Api(_) | SendError::Client(_)
        )
    }
}

/// The referral list could not produce a candidate.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("referral list unavailable: {0}")]
    Unavailable(#[from] GatewayError),

    #[error("referral list r/{subreddit}/wiki/{page} is empty")]
    Empty { subreddit: String, page: String },
}

/// Failure while handling a single inbox item.
#[derive(Debug, thiserror::Error)]
pub enum ResponderError {
    #[error(transparent)]
    Source(#[from] SourceError),

    #[error("gateway error: {0}")]
    Gateway(#[from] GatewayError),
}
