//! Error Types
//!
//! This module defines the error types used throughout the crate.
//!
//! # Overview
//!
//! The main error type [`Error`] covers all failure modes including:
//! - Parametric descriptors with no registered generator
//! - Asset streaming and glTF decoding errors
//! - Scene-graph lookups on stale handles
//!
//! # Usage
//!
//! All public APIs return [`Result<T>`] which is an alias for `std::result::Result<T, Error>`.
//!
//! ```rust,ignore
//! use myth_items::errors::{Error, Result};
//!
//! fn build_item() -> Result<()> {
//!     // Operations that may fail return Result
//!     Ok(())
//! }
//! ```

use thiserror::Error;

/// The main error type for placed-item visuals.
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // Parametric Geometry Errors
    // ========================================================================
    /// No generator is registered for the descriptor's base type (or the base
    /// type's family does not know the sub type).
    #[error("Unsupported parametric type: base {base}{}", sub_suffix(.sub))]
    UnsupportedParametricType {
        /// Base parametric type tag
        base: u32,
        /// Sub type tag, when the base family was found but the sub type was not
        sub: Option<u32>,
    },

    /// The descriptor's parameters could not be interpreted.
    #[error("Invalid parametric data: {0}")]
    InvalidParametricData(String),

    // ========================================================================
    // Asset Streaming Errors
    // ========================================================================
    /// Streaming an external asset failed.
    #[error("Failed to load asset '{reference}': {reason}")]
    AssetLoad {
        /// The asset reference that was requested
        reference: String,
        /// Human readable failure reason
        reason: String,
    },

    /// glTF parsing or conversion error.
    #[error("glTF error: {0}")]
    Gltf(String),

    // ========================================================================
    // I/O & Format Errors
    // ========================================================================
    /// File I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    // ========================================================================
    // Scene Errors
    // ========================================================================
    /// A node handle did not resolve to a live node.
    #[error("Scene node not found: {0}")]
    NodeNotFound(String),

    /// The item was disposed and can no longer change.
    #[error("Item has been disposed")]
    Disposed,
}

fn sub_suffix(sub: &Option<u32>) -> String {
    sub.map(|s| format!(", sub {s}")).unwrap_or_default()
}

#[cfg(feature = "gltf")]
impl From<gltf::Error> for Error {
    fn from(err: gltf::Error) -> Self {
        Error::Gltf(err.to_string())
    }
}

/// Alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
