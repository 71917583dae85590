use thiserror::Error;

#[derive(Debug, Error)]
pub enum FleetError {
    #[error("unrecognized token: expected an 'fo1_' or 'fm1_' prefix")]
    UnrecognizedToken,

    #[error("no credential stored: run 'fleet login'")]
    NotLoggedIn,

    #[error("invalid proxy path: {0}")]
    InvalidPath(String),

    #[error("store error: {0}")]
    Store(String),

    #[error("upstream error ({status}): {message}")]
    Upstream { status: u16, message: String },

    #[error("transport error: {0}")]
    Transport(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, FleetError>;
