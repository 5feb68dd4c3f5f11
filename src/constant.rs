//! This module contains constants that are needed throughout the codebase.

use crate::padding::PaddingMode;

/// The width of word on the EVM in bits.
pub const WORD_SIZE_BITS: usize = 256;

/// The width of a byte on the EVM (and most other places) in bits.
pub const BYTE_SIZE_BITS: usize = 8;

/// The width of a word on the EVM in bytes.
pub const WORD_SIZE_BYTES: usize = WORD_SIZE_BITS / BYTE_SIZE_BITS;

/// The width of a bool in bytes.
pub const BOOL_SIZE_BYTES: usize = 1;

/// The width of an address in bytes.
pub const ADDRESS_SIZE_BYTES: usize = 20;

/// The width of a function selector in bytes.
pub const SELECTOR_SIZE_BYTES: usize = 4;

/// The width of an external function pointer in bytes, consisting of an
/// address followed by a selector.
pub const EXTERNAL_FUNCTION_SIZE_BYTES: usize = ADDRESS_SIZE_BYTES + SELECTOR_SIZE_BYTES;

/// The width of a single program counter within an internal function pointer.
pub const PC_SIZE_BYTES: usize = 4;

/// The width of an internal function pointer in bytes, consisting of a
/// constructor-context program counter followed by a deployed-context program
/// counter.
pub const INTERNAL_FUNCTION_SIZE_BYTES: usize = PC_SIZE_BYTES * 2;

/// The smallest bit-width allowed for integer and fixed-point types.
pub const MIN_NUMERIC_WIDTH_BITS: u16 = 8;

/// The largest bit-width allowed for integer and fixed-point types.
pub const MAX_NUMERIC_WIDTH_BITS: u16 = 256;

/// The maximum number of decimal places a fixed-point type may declare.
pub const MAX_FIXED_PLACES: u8 = 80;

/// The bit-width of `fixed` and `ufixed` when written without a size.
pub const DEFAULT_FIXED_WIDTH_BITS: u16 = 128;

/// The number of decimal places of `fixed` and `ufixed` when written without
/// a size.
pub const DEFAULT_FIXED_PLACES: u8 = 18;

/// The maximum size that memory can be within the block gas limit.
///
/// Obtained by solving:
///
/// ```text
/// 3 * a + (a^2 / 512) = 30,000,000
/// ```
pub const MAX_MEMORY_SIZE_WORDS: usize = 123_170;

/// The maximum number of bytes that a single read from a byte-addressed
/// location may request.
///
/// Anything larger could not have been produced within the block gas limit, so
/// such a request indicates a corrupt pointer rather than real data.
pub const MAX_SINGLE_READ_BYTES: usize = MAX_MEMORY_SIZE_WORDS * WORD_SIZE_BYTES;

/// The default value for whether decoding happens in strict ABI mode.
pub const DEFAULT_STRICT_ABI_MODE: bool = false;

/// The default padding mode used when checking and removing padding.
pub const DEFAULT_PADDING_MODE: PaddingMode = PaddingMode::Default;

/// The default value for whether non-strict decoding may stop with a
/// retryable error.
pub const DEFAULT_ALLOW_RETRY: bool = false;
