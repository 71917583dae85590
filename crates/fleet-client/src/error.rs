use thiserror::Error;

/// Tagged failure type for every client operation.
///
/// Callers can distinguish "not found" from transient transport failure from
/// validation errors; the original upstream status survives in `Api.status`.
/// Degrading to a uniform "unavailable" presentation is an explicit mapping
/// step at the UI boundary, not something decided here.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("authentication required")]
    Unauthenticated,

    #[error("not found: {0}")]
    NotFound(String),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("upstream error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("transport error: {0}")]
    Transport(String),
}

impl ClientError {
    /// The upstream HTTP status, when one was observed.
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            Self::Unauthenticated => Some(401),
            Self::NotFound(_) => Some(404),
            Self::Api { status, .. } => Some(*status),
            Self::InvalidRequest(_) | Self::Transport(_) => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_status_is_recoverable() {
        let err = ClientError::Api {
            status: 422,
            message: "unprocessable".into(),
        };
        assert_eq!(err.upstream_status(), Some(422));
        assert_eq!(ClientError::Unauthenticated.upstream_status(), Some(401));
        assert_eq!(
            ClientError::Transport("refused".into()).upstream_status(),
            None
        );
    }
}
