//! This module contains the pointers that locate the raw data for a value.
//!
//! The decoder never interprets a pointer itself; it only hands the pointer to
//! a [`crate::read::ByteSource`].

use std::fmt::{Display, Formatter};

use ethnum::U256;
use serde::{Deserialize, Serialize};

use crate::constant::WORD_SIZE_BYTES;

/// The byte-addressed data locations of the EVM.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Location {
    Memory,
    Calldata,
    Returndata,
    Eventdata,
    Code,
}

impl Display for Location {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Memory => "memory",
            Self::Calldata => "calldata",
            Self::Returndata => "returndata",
            Self::Eventdata => "eventdata",
            Self::Code => "code",
        };
        write!(f, "{name}")
    }
}

/// The location of the raw bytes for a single value.
#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum DataPointer {
    /// The stack words `from..=to`, counted from the bottom of the stack, which
    /// are concatenated.
    Stack { from: usize, to: usize },

    /// A value that is already known, such as a constant.
    StackLiteral { literal: Vec<u8> },

    /// The bytes `from..=to` (counted from the most significant byte) of the
    /// storage slot `slot`.
    Storage {
        #[serde(with = "ethnum::serde::decimal")]
        slot: U256,
        from: usize,
        to:   usize,
    },

    /// `length` bytes from `start` in one of the byte-addressed locations.
    Bytes {
        location: Location,
        start:    usize,
        length:   usize,
    },

    /// The topic with index `topic` of the current event.
    EventTopic { topic: usize },
}

impl DataPointer {
    /// Constructs a pointer to the single stack word at `index`.
    #[must_use]
    pub fn stack(index: usize) -> Self {
        Self::Stack {
            from: index,
            to:   index,
        }
    }

    /// Constructs a pointer to a known `literal` value.
    #[must_use]
    pub fn literal(literal: impl Into<Vec<u8>>) -> Self {
        let literal = literal.into();
        Self::StackLiteral { literal }
    }

    /// Constructs a pointer to the whole of the storage slot `slot`.
    #[must_use]
    pub fn storage_slot(slot: impl Into<U256>) -> Self {
        Self::Storage {
            slot: slot.into(),
            from: 0,
            to:   31,
        }
    }

    /// Constructs a pointer to the bytes `from..=to` of the storage slot
    /// `slot`.
    #[must_use]
    pub fn storage(slot: impl Into<U256>, from: usize, to: usize) -> Self {
        let slot = slot.into();
        Self::Storage { slot, from, to }
    }

    /// Constructs a pointer to `length` bytes from `start` in `location`.
    #[must_use]
    pub fn bytes(location: Location, start: usize, length: usize) -> Self {
        Self::Bytes {
            location,
            start,
            length,
        }
    }

    /// Constructs a pointer to the 32-byte word at `start` in `location`.
    #[must_use]
    pub fn word(location: Location, start: usize) -> Self {
        Self::bytes(location, start, WORD_SIZE_BYTES)
    }
}
