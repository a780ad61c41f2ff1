use std::time::Duration;
use thiserror::Error;

/// Why a single request attempt (or a whole strategy chain) did not produce
/// a usable payload.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FetchError {
    #[error("timed out after {0:?}")]
    Timeout(Duration),
    #[error("upstream returned HTTP {0}")]
    Status(u16),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("malformed payload: {0}")]
    Payload(String),
    /// Well-formed answer that carries no records for the game.
    #[error("no records: {0}")]
    NoRecords(String),
    #[error("all {} strategies failed", .0.len())]
    Exhausted(Vec<AttemptFailure>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct AttemptFailure {
    pub strategy: String,
    pub error: Box<FetchError>,
}

impl std::fmt::Display for AttemptFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.strategy, self.error)
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            return Self::Status(status.as_u16());
        }
        Self::Transport(err.to_string())
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        Self::Payload(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exhausted_message_counts_attempts() {
        let err = FetchError::Exhausted(vec![
            AttemptFailure {
                strategy: "primary-relay".to_string(),
                error: Box::new(FetchError::Status(502)),
            },
            AttemptFailure {
                strategy: "direct".to_string(),
                error: Box::new(FetchError::Timeout(Duration::from_secs(8))),
            },
        ]);
        assert_eq!(err.to_string(), "all 2 strategies failed");
    }

    #[test]
    fn attempt_failure_display() {
        let failure = AttemptFailure {
            strategy: "direct".to_string(),
            error: Box::new(FetchError::Status(403)),
        };
        assert_eq!(failure.to_string(), "direct: upstream returned HTTP 403");
    }

    #[test]
    fn no_records_message() {
        let err = FetchError::NoRecords("no content object".to_string());
        assert_eq!(err.to_string(), "no records: no content object");
    }
}
