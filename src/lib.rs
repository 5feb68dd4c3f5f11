//! This library implements a decoder for statically-sized
//! [Solidity ABI](https://docs.soliditylang.org/en/latest/abi-spec.html) values
//! read out of [EVM](https://ethereum.org/en/developers/docs/evm/) data
//! locations.
//!
//! Given a type descriptor and a pointer to the raw bytes for a value, the
//! decoder produces either a fully-typed value or a structured decoding error.
//! Dynamically-sized types (strings, dynamic bytes, arrays) and containers are
//! not decoded here.
//!
//! # How it Works
//!
//! 1. The raw bytes for the [`pointer::DataPointer`] are requested from a
//!    [`read::ByteSource`]. This request may suspend the decode until the bytes
//!    are available.
//! 2. The padding of the bytes is checked against the discipline that the
//!    [`padding::PaddingMode`] prescribes for the type, and then removed.
//! 3. What remains is interpreted according to the class of the
//!    [`types::Type`]. Contracts and external function pointers are resolved
//!    against the known [`context::Contexts`], and internal function pointers
//!    against the [`evm::InternalFunctionsTable`].
//! 4. Any problem is either embedded into the [`DecodedResult`] or, under
//!    strict ABI mode, stops the decode with an
//!    [`error::decoding::StopDecoding`].
//!
//! # Basic Usage
//!
//! ```
//! use evm_value_decoder::{
//!     context::{Context, Contexts},
//!     decode_blocking,
//!     evm::EvmInfo,
//!     pointer::{DataPointer, Location},
//!     read::MachineState,
//!     types::{Type, UserDefinedTypes},
//!     DecodeOptions,
//! };
//!
//! let mut word = [0x00; 32];
//! word[31] = 0x07;
//!
//! let state = MachineState::new().with_bytes(Location::Memory, word);
//! let types = UserDefinedTypes::new();
//! let contexts = Contexts::new();
//! let current = Context::new("Example", vec![0x00]);
//! let info = EvmInfo::new(&state, &types, &contexts, &current);
//!
//! let ty: Type = "uint8".parse().unwrap();
//! let pointer = DataPointer::word(Location::Memory, 0);
//! let result = decode_blocking(&ty, &pointer, &info, DecodeOptions::default()).unwrap();
//!
//! assert_eq!(result.to_string(), "7");
//! ```

#![warn(clippy::all, clippy::cargo, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)] // Allows for better API naming

pub mod constant;
pub mod context;
pub mod decoder;
pub mod error;
pub mod evm;
pub mod padding;
pub mod pointer;
pub mod read;
pub mod types;
pub mod utility;
pub mod value;

// Re-exports to provide the library interface.
pub use decoder::{decode, decode_blocking, DecodeOptions};
pub use value::DecodedResult;
