//! This module contains common utilities for simplifying the writing of
//! integration tests for this library.

#![cfg(test)]
#![allow(unused)] // Each test binary uses a different subset

use evm_value_decoder::{
    context::{Context, Contexts},
    decode_blocking,
    error::decoding::StopDecoding,
    evm::{EvmInfo, InternalFunctionsTable},
    pointer::{DataPointer, Location},
    read::{state::Word, MachineState},
    types::{Type, UserDefinedTypes},
    DecodeOptions,
    DecodedResult,
};

/// Everything a decode needs, owned in one place so that tests can borrow it
/// as an [`EvmInfo`].
#[derive(Clone, Debug)]
pub struct Fixture {
    pub state:    MachineState,
    pub types:    UserDefinedTypes,
    pub contexts: Contexts,
    pub current:  Context,
    pub table:    Option<InternalFunctionsTable>,
}

impl Fixture {
    /// Creates a fixture with empty state, no known types or contexts, and a
    /// deployed-code current context.
    pub fn new() -> Self {
        Self {
            state:    MachineState::new(),
            types:    UserDefinedTypes::new(),
            contexts: Contexts::new(),
            current:  Context::new("Current", vec![0xfe]),
            table:    None,
        }
    }

    /// Places `word` at the start of memory, where [`Self::decode`] reads.
    pub fn with_word(mut self, word: Word) -> Self {
        self.state = self.state.with_bytes(Location::Memory, word);
        self
    }

    /// Registers the user-defined type `ty`.
    pub fn with_type(mut self, ty: Type) -> Self {
        self.types.insert(ty);
        self
    }

    /// Registers `context` and deploys its binary at `address`.
    pub fn with_deployed(mut self, address: [u8; 20], context: Context) -> Self {
        self.state = self.state.with_account_code(address, context.binary().to_vec());
        self.contexts.add(context);
        self
    }

    /// Sets the internal functions table.
    pub fn with_table(mut self, table: InternalFunctionsTable) -> Self {
        self.table = Some(table);
        self
    }

    /// Makes the current context a constructor context.
    pub fn in_constructor(mut self) -> Self {
        self.current = self.current.constructor();
        self
    }

    /// Borrows the fixture as the info bundle for a decode.
    pub fn info(&self) -> EvmInfo<'_, MachineState> {
        let info = EvmInfo::new(&self.state, &self.types, &self.contexts, &self.current);
        match &self.table {
            Some(table) => info.with_internal_functions(table),
            None => info,
        }
    }

    /// Decodes a value of type `ty` from the first word of memory.
    pub fn decode(&self, ty: &Type, options: DecodeOptions) -> Result<DecodedResult, StopDecoding> {
        self.decode_at(ty, &DataPointer::word(Location::Memory, 0), options)
    }

    /// Decodes a value of type `ty` from `pointer`.
    pub fn decode_at(
        &self,
        ty: &Type,
        pointer: &DataPointer,
        options: DecodeOptions,
    ) -> Result<DecodedResult, StopDecoding> {
        decode_blocking(ty, pointer, &self.info(), options)
    }
}

/// Builds a word holding `bytes` at its right end, zero-filled on the left.
pub fn left_padded(bytes: &[u8]) -> Word {
    let mut word = [0x00; 32];
    word[32 - bytes.len()..].copy_from_slice(bytes);
    word
}

/// Builds a word holding `bytes` at its left end, zero-filled on the right.
pub fn right_padded(bytes: &[u8]) -> Word {
    let mut word = [0x00; 32];
    word[..bytes.len()].copy_from_slice(bytes);
    word
}

/// Gets the strict decoding options.
pub fn strict() -> DecodeOptions {
    DecodeOptions::default().with_strict_abi_mode(true)
}
