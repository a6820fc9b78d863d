//! The module contains the errors the engine can return.
//!
//! Every variant belongs to one [`ErrorKind`], so callers can decide how to
//! react (retry, report bad data, answer "not found") without matching on
//! messages:
//!
//! - [`Configuration`] no spend source is configured.
//! - [`InvalidData`] and [`InvalidAmount`] a commitment or billing row is malformed.
//! - [`Unavailable`] and [`Database`] the spend source failed mid-query.
//! - [`KeyNotFound`] a company or commitment does not exist in the catalog.
//!
//!  [`Configuration`]: EngineError::Configuration
//!  [`InvalidData`]: EngineError::InvalidData
//!  [`InvalidAmount`]: EngineError::InvalidAmount
//!  [`Unavailable`]: EngineError::Unavailable
//!  [`Database`]: EngineError::Database
//!  [`KeyNotFound`]: EngineError::KeyNotFound
use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Configuration error: {0}")]
    Configuration(String),
    #[error("Invalid data: {0}")]
    InvalidData(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("\"{0}\" key not found!")]
    KeyNotFound(String),
    #[error("Spend source unavailable: {0}")]
    Unavailable(String),
    #[error(transparent)]
    Database(#[from] DbErr),
    #[error("Invalid CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Coarse classification of an [`EngineError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Missing or unusable configuration; retrying will not help.
    Configuration,
    /// Malformed input data.
    Data,
    /// The spend source could not answer; the call may be retried.
    Transport,
    /// The requested item does not exist.
    NotFound,
}

impl EngineError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Configuration(_) | Self::Io(_) => ErrorKind::Configuration,
            Self::InvalidData(_) | Self::InvalidAmount(_) | Self::Csv(_) => ErrorKind::Data,
            Self::Unavailable(_) | Self::Database(_) => ErrorKind::Transport,
            Self::KeyNotFound(_) => ErrorKind::NotFound,
        }
    }
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Configuration(a), Self::Configuration(b)) => a == b,
            (Self::InvalidData(a), Self::InvalidData(b)) => a == b,
            (Self::InvalidAmount(a), Self::InvalidAmount(b)) => a == b,
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::Unavailable(a), Self::Unavailable(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            (Self::Csv(a), Self::Csv(b)) => a.to_string() == b.to_string(),
            (Self::Io(a), Self::Io(b)) => a.kind() == b.kind(),
            _ => false,
        }
    }
}
