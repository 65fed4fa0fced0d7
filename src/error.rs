//! Storefront Error Types
//!
//! Failures that can stop the service from starting. Business outcomes such
//! as a rejected coupon or a clamped quantity are never reported through
//! this type.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Catalog error: {0}")]
    Catalog(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for convenience
pub type StoreResult<T> = Result<T, StoreError>;
