//! Core errors (renderer-agnostic).

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("invalid viewport '{0}': expected WIDTHxHEIGHT with both sides > 0")]
    InvalidViewport(String),
}

pub type CoreResult<T> = Result<T, CoreError>;
