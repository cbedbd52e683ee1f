//! Fetch failure taxonomy.
//!
//! Every variant is recoverable. The poller counts the failure, keeps the
//! previous chart contents on screen, and tries again on the next tick.

use thiserror::Error;

/// Why a poll of the device's `/data` endpoint produced no snapshot.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The device could not be reached at the transport level.
    #[error("device unreachable: {0}")]
    Transport(#[from] reqwest::Error),

    /// The device answered, but not with a 2xx status.
    #[error("device returned HTTP {0}")]
    Status(u16),

    /// The device answered 2xx, but the body was not a two-meter snapshot.
    #[error("malformed snapshot: {0}")]
    Malformed(#[from] serde_json::Error),
}

impl FetchError {
    /// Short stable label for the dashboard status line.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Transport(_) => "transport",
            Self::Status(_) => "status",
            Self::Malformed(_) => "malformed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_names_the_code() {
        let e = FetchError::Status(503);
        assert_eq!(e.to_string(), "device returned HTTP 503");
        assert_eq!(e.kind(), "status");
    }

    #[test]
    fn malformed_error_wraps_serde() {
        let bad = serde_json::from_str::<serde_json::Value>("{nope").unwrap_err();
        let e = FetchError::from(bad);
        assert_eq!(e.kind(), "malformed");
        assert!(e.to_string().starts_with("malformed snapshot:"));
    }
}
