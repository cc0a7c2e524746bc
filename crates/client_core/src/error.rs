use shared::error::{ApiError, ErrorCode};
use thiserror::Error;

/// Longest slice of a non-2xx response body kept in the error message.
const MAX_ERROR_BODY_CHARS: usize = 300;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    TransportFailure,
    MalformedResponse,
}

/// Why a submission did not produce a `GenerationResult`.
///
/// Non-2xx statuses are kept apart from connection errors for logging, but
/// both are a `TransportFailure` to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmissionError {
    #[error("generation request failed: {0}")]
    Transport(String),
    #[error("generation endpoint returned HTTP {status}: {message}")]
    Status { status: u16, message: String },
    #[error("malformed generation response: {0}")]
    MalformedResponse(String),
}

impl SubmissionError {
    pub fn status(status: u16, body: &str) -> Self {
        let body = body.trim();
        let message = if body.is_empty() {
            "<empty body>".to_string()
        } else {
            body.chars().take(MAX_ERROR_BODY_CHARS).collect()
        };
        Self::Status { status, message }
    }

    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Transport(_) | Self::Status { .. } => FailureKind::TransportFailure,
            Self::MalformedResponse(_) => FailureKind::MalformedResponse,
        }
    }

    /// User-facing failure notice naming the underlying message.
    pub fn notice(&self) -> String {
        let hint = match self {
            Self::Transport(message) => {
                let lower = message.to_ascii_lowercase();
                if lower.contains("connect")
                    || lower.contains("connection refused")
                    || lower.contains("dns")
                {
                    Some("Generator unreachable; check the endpoint URL/network and resubmit.")
                } else if lower.contains("timed out") || lower.contains("timeout") {
                    Some("Generator did not answer in time; resubmit when ready.")
                } else {
                    None
                }
            }
            Self::Status { status, .. } if *status >= 500 => {
                Some("Generator failed while producing assets; resubmit to try again.")
            }
            Self::Status { .. } => Some("Generator rejected the brief."),
            Self::MalformedResponse(_) => {
                Some("Generator answered with something other than a ranked asset list.")
            }
        };

        match hint {
            Some(hint) => format!("Generation failed: {self}. {hint}"),
            None => format!("Generation failed: {self}"),
        }
    }
}

impl From<reqwest::Error> for SubmissionError {
    fn from(value: reqwest::Error) -> Self {
        if value.is_decode() {
            Self::MalformedResponse(value.to_string())
        } else {
            Self::Transport(value.to_string())
        }
    }
}

impl From<&SubmissionError> for ApiError {
    fn from(value: &SubmissionError) -> Self {
        let code = match value.kind() {
            FailureKind::TransportFailure => ErrorCode::TransportFailure,
            FailureKind::MalformedResponse => ErrorCode::MalformedResponse,
        };
        ApiError::new(code, value.to_string())
    }
}

#[cfg(test)]
#[path = "tests/error_tests.rs"]
mod tests;
