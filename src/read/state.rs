//! This module contains an in-memory snapshot of machine state that can serve
//! as a [`ByteSource`].

use std::collections::{HashMap, HashSet};

use ethnum::U256;

use crate::{
    constant::{ADDRESS_SIZE_BYTES, MAX_SINGLE_READ_BYTES, WORD_SIZE_BYTES},
    error::read::{Error, Result},
    pointer::{DataPointer, Location},
    read::ByteSource,
};

/// A single EVM word in big-endian byte order.
pub type Word = [u8; WORD_SIZE_BYTES];

/// A snapshot of the machine state at a point in execution.
///
/// Reads are satisfied immediately, so a decode driven against a
/// `MachineState` never actually suspends. Unset storage slots read as zero,
/// and reads past the end of a byte-addressed location are zero-filled, as
/// they would be on the EVM.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct MachineState {
    /// The stack, with the bottom of the stack first.
    stack: Vec<Word>,

    storage: HashMap<U256, Word>,

    memory: Vec<u8>,

    calldata: Vec<u8>,

    returndata: Vec<u8>,

    eventdata: Vec<u8>,

    topics: Vec<Word>,

    /// The code of the currently-executing contract.
    code: Vec<u8>,

    /// The deployed code of other accounts, keyed by address.
    accounts: HashMap<[u8; ADDRESS_SIZE_BYTES], Vec<u8>>,

    /// The byte-addressed locations whose contents are not known.
    unavailable: HashSet<Location>,
}

impl MachineState {
    /// Creates a new, empty, machine state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pushes `word` onto the top of the stack.
    #[must_use]
    pub fn push_stack(mut self, word: Word) -> Self {
        self.stack.push(word);
        self
    }

    /// Sets the contents of the storage slot `slot` to `word`.
    #[must_use]
    pub fn with_storage(mut self, slot: impl Into<U256>, word: Word) -> Self {
        self.storage.insert(slot.into(), word);
        self
    }

    /// Sets the contents of `location` to `bytes`.
    #[must_use]
    pub fn with_bytes(mut self, location: Location, bytes: impl Into<Vec<u8>>) -> Self {
        let bytes = bytes.into();
        match location {
            Location::Memory => self.memory = bytes,
            Location::Calldata => self.calldata = bytes,
            Location::Returndata => self.returndata = bytes,
            Location::Eventdata => self.eventdata = bytes,
            Location::Code => self.code = bytes,
        }
        self.unavailable.remove(&location);
        self
    }

    /// Adds `topic` to the topics of the current event.
    #[must_use]
    pub fn push_topic(mut self, topic: Word) -> Self {
        self.topics.push(topic);
        self
    }

    /// Sets the deployed code at `address` to `code`.
    #[must_use]
    pub fn with_account_code(
        mut self,
        address: [u8; ADDRESS_SIZE_BYTES],
        code: impl Into<Vec<u8>>,
    ) -> Self {
        self.accounts.insert(address, code.into());
        self
    }

    /// Marks the contents of `location` as not known, such that reads from it
    /// fail.
    #[must_use]
    pub fn without(mut self, location: Location) -> Self {
        self.unavailable.insert(location);
        self
    }

    fn read_stack(&self, from: usize, to: usize) -> Result<Vec<u8>> {
        let depth = self.stack.len();
        if from > to || to >= depth {
            return Err(Error::StackOutOfRange { from, to, depth });
        }

        Ok(self.stack[from..=to].concat())
    }

    fn read_storage(&self, slot: U256, from: usize, to: usize) -> Result<Vec<u8>> {
        if from > to || to >= WORD_SIZE_BYTES {
            return Err(Error::InvalidStorageRange { from, to });
        }

        let word = self.storage.get(&slot).copied().unwrap_or_default();
        Ok(word[from..=to].to_vec())
    }

    fn read_bytes(&self, location: Location, start: usize, length: usize) -> Result<Vec<u8>> {
        if self.unavailable.contains(&location) {
            return Err(Error::Unavailable { location });
        }

        let out_of_range = Error::BytesOutOfRange {
            location,
            start,
            length,
        };
        if length > MAX_SINGLE_READ_BYTES {
            return Err(out_of_range);
        }
        let end = start.checked_add(length).ok_or(out_of_range)?;

        let source = match location {
            Location::Memory => &self.memory,
            Location::Calldata => &self.calldata,
            Location::Returndata => &self.returndata,
            Location::Eventdata => &self.eventdata,
            Location::Code => &self.code,
        };

        // Anything past the end of the source is zero
        let mut data = vec![0x00; length];
        if start < source.len() {
            let available = &source[start..end.min(source.len())];
            data[..available.len()].copy_from_slice(available);
        }

        Ok(data)
    }

    fn read_topic(&self, topic: usize) -> Result<Vec<u8>> {
        self.topics
            .get(topic)
            .map(|word| word.to_vec())
            .ok_or(Error::NoSuchTopic {
                topic,
                available: self.topics.len(),
            })
    }
}

impl ByteSource for MachineState {
    async fn read(&self, pointer: &DataPointer) -> Result<Vec<u8>> {
        match pointer {
            DataPointer::Stack { from, to } => self.read_stack(*from, *to),
            DataPointer::StackLiteral { literal } => Ok(literal.clone()),
            DataPointer::Storage { slot, from, to } => self.read_storage(*slot, *from, *to),
            DataPointer::Bytes {
                location,
                start,
                length,
            } => self.read_bytes(*location, *start, *length),
            DataPointer::EventTopic { topic } => self.read_topic(*topic),
        }
    }

    async fn code(&self, address: &[u8]) -> Option<Vec<u8>> {
        let address = &address[address.len().saturating_sub(ADDRESS_SIZE_BYTES)..];
        let mut key = [0x00; ADDRESS_SIZE_BYTES];
        key[ADDRESS_SIZE_BYTES - address.len()..].copy_from_slice(address);

        Some(self.accounts.get(&key).cloned().unwrap_or_default())
    }
}
