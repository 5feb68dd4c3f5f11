//! This module contains the primary error type for the decoder's interface.
//! It also re-exports the more specific error types that are
//! subsystem-specific.

pub mod decoding;
pub mod read;

use thiserror::Error;

pub use decoding::{DecodingError, StopDecoding};

/// The interface result type for the library.
///
/// # Usage
///
/// Functions outside the decoding path that are part of the public interface
/// of the library should return this result type. The decoder itself returns
/// a [`StopDecoding`] directly, as that is what a retry loop inspects.
pub type Result<T> = std::result::Result<T, Error>;

/// The interface error type for the library.
#[derive(Clone, Debug, Error)]
pub enum Error {
    /// A type name that is not a Solidity elementary type.
    #[error("{name:?} is not a valid elementary type name")]
    InvalidTypeName { name: String },

    /// An unknown error, represented as a string.
    #[error("Unknown Error: {_0:?}")]
    Other(String),
}

impl Error {
    /// Constructs an unknown error with the provided `message`.
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other(message.into())
    }

    /// Constructs an error for the invalid type `name`.
    pub fn invalid_type_name(name: impl Into<String>) -> Self {
        let name = name.into();
        Self::InvalidTypeName { name }
    }
}
