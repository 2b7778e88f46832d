// crates/cnpost-core/src/error.rs
use thiserror::Error;

/// Errors surfaced by the reference loaders and the resolution pipeline.
///
/// Lookups that simply find nothing are *not* errors: an unresolved postcode
/// comes back as a record with [`Level::None`](crate::Level::None), and an
/// unmatched alias or code leaves the corresponding fields empty. This type is
/// reserved for conditions that make a whole run meaningless.
#[derive(Debug, Error)]
pub enum CnPostError {
    /// A reference table (or its snapshot) cannot be opened or read.
    #[error("reference data '{what}' is unavailable: {reason}")]
    ReferenceUnavailable { what: String, reason: String },

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("configuration error: {0}")]
    Config(String),

    /// A batch worker thread died before returning its records.
    #[error("batch worker failed: {0}")]
    Worker(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[cfg(feature = "json")]
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Bincode(#[from] bincode::Error),

    #[error(transparent)]
    Toml(#[from] toml::de::Error),
}

impl CnPostError {
    pub(crate) fn unavailable(what: impl Into<String>, reason: impl ToString) -> Self {
        CnPostError::ReferenceUnavailable {
            what: what.into(),
            reason: reason.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CnPostError>;
