//! This module contains errors pertaining to reading raw bytes from a data
//! location.

use serde::Serialize;
use thiserror::Error;

use crate::pointer::Location;

/// Errors that occur when a [`crate::read::ByteSource`] cannot produce the
/// bytes for a pointer.
///
/// These never escape the decoder directly. They are converted into a
/// [`crate::error::decoding::DecodingError::Read`] for the type being decoded.
#[derive(Clone, Debug, Eq, Error, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all_fields = "camelCase")]
pub enum Error {
    #[error("Stack words {from}..={to} are out of range for a stack of depth {depth}")]
    #[serde(rename = "ReadErrorStack")]
    StackOutOfRange { from: usize, to: usize, depth: usize },

    #[error("Byte range {from}..={to} is not a valid range within a storage slot")]
    #[serde(rename = "ReadErrorStorage")]
    InvalidStorageRange { from: usize, to: usize },

    #[error("Cannot read {length} bytes at offset {start} from {location}")]
    #[serde(rename = "ReadErrorBytes")]
    BytesOutOfRange {
        location: Location,
        start:    usize,
        length:   usize,
    },

    #[error("Event topic {topic} does not exist among {available} topics")]
    #[serde(rename = "ReadErrorTopic")]
    NoSuchTopic { topic: usize, available: usize },

    #[error("Data at {location} is not available")]
    #[serde(rename = "ReadErrorUnavailable")]
    Unavailable { location: Location },
}

/// The result type for functions that may return read errors.
pub type Result<T> = std::result::Result<T, Error>;
