//! Error types shared across the crate.

use thiserror::Error;

/// Crate-wide error type.
///
/// Record lookup, validation and persistence failures surface through these
/// variants; views propagate them unchanged so the serving layer can decide
/// how to translate them (e.g. `NotFound` into an HTTP 404).
#[derive(Debug, Error)]
pub enum Error {
	#[error("HTTP error: {0}")]
	Http(String),

	#[error("Not found: {0}")]
	NotFound(String),

	#[error("Validation error: {0}")]
	Validation(String),

	#[error("Serialization error: {0}")]
	Serialization(#[from] serde_json::Error),

	#[error("Template error: {0}")]
	Template(#[from] tera::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
