use uuid::Uuid;

/// Shared error type used across all Rollcall crates.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("IO: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP: {0}")]
    Http(String),

    #[error("timeout: {0}")]
    Timeout(String),

    #[error("ledger: {0}")]
    Ledger(String),

    #[error("ledger schema: {0}")]
    Schema(String),

    #[error("object store: {0}")]
    ObjectStore(String),

    #[error("media: {0}")]
    Media(String),

    /// A registration that was created earlier no longer resolves to a
    /// ledger row.  Indicates external data loss, never a transient fault.
    #[error("registration {registration_id} has no ledger row")]
    Consistency { registration_id: Uuid },

    #[error("config: {0}")]
    Config(String),

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Whether retrying the same call may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Error::Io(_)
                | Error::Http(_)
                | Error::Timeout(_)
                | Error::Ledger(_)
                | Error::ObjectStore(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
