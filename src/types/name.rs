//! This module parses Solidity elementary type names into [`Type`]s.

use std::str::FromStr;

use crate::{
    constant::{
        BYTE_SIZE_BITS,
        DEFAULT_FIXED_PLACES,
        DEFAULT_FIXED_WIDTH_BITS,
        MAX_FIXED_PLACES,
        MAX_NUMERIC_WIDTH_BITS,
        MIN_NUMERIC_WIDTH_BITS,
        WORD_SIZE_BYTES,
    },
    error::{Error, Result},
    types::{FunctionType, Type, Visibility},
};

/// Parses the elementary type names `bool`, `address`, `address payable`,
/// `uintN`, `intN`, `bytesN`, `fixedMxN`, `ufixedMxN` and `function`.
///
/// User-defined types cannot be named this way, as their definitions come
/// from the compiler rather than from their names.
impl FromStr for Type {
    type Err = Error;

    fn from_str(name: &str) -> Result<Self> {
        let trimmed = name.trim();
        let invalid = || Error::invalid_type_name(name);

        let ty = match trimmed {
            "bool" => Type::Bool,
            "address" => Type::Address { payable: false },
            "address payable" => Type::Address { payable: true },
            "function" | "function external" => {
                Type::Function(FunctionType::new(Visibility::External))
            }
            "function internal" => Type::Function(FunctionType::new(Visibility::Internal)),
            _ => {
                if let Some(suffix) = trimmed.strip_prefix("uint") {
                    let bits = parse_width(suffix).ok_or_else(invalid)?;
                    Type::Uint { bits }
                } else if let Some(suffix) = trimmed.strip_prefix("int") {
                    let bits = parse_width(suffix).ok_or_else(invalid)?;
                    Type::Int { bits }
                } else if let Some(suffix) = trimmed.strip_prefix("ufixed") {
                    let (bits, places) = parse_fixed(suffix).ok_or_else(invalid)?;
                    Type::Ufixed { bits, places }
                } else if let Some(suffix) = trimmed.strip_prefix("fixed") {
                    let (bits, places) = parse_fixed(suffix).ok_or_else(invalid)?;
                    Type::Fixed { bits, places }
                } else if let Some(suffix) = trimmed.strip_prefix("bytes") {
                    let length = parse_bytes_length(suffix).ok_or_else(invalid)?;
                    Type::Bytes { length }
                } else {
                    return Err(invalid());
                }
            }
        };

        Ok(ty)
    }
}

/// Parses the bit-width suffix of an integer type, where an empty suffix
/// means 256.
fn parse_width(suffix: &str) -> Option<u16> {
    if suffix.is_empty() {
        return Some(MAX_NUMERIC_WIDTH_BITS);
    }

    let bits = parse_decimal::<u16>(suffix)?;
    let valid = (MIN_NUMERIC_WIDTH_BITS..=MAX_NUMERIC_WIDTH_BITS).contains(&bits)
        && usize::from(bits) % BYTE_SIZE_BITS == 0;
    valid.then_some(bits)
}

/// Parses the `MxN` suffix of a fixed-point type, where an empty suffix means
/// `128x18`.
fn parse_fixed(suffix: &str) -> Option<(u16, u8)> {
    if suffix.is_empty() {
        return Some((DEFAULT_FIXED_WIDTH_BITS, DEFAULT_FIXED_PLACES));
    }

    let (bits, places) = suffix.split_once('x')?;
    let bits = parse_width(bits).filter(|_| !bits.is_empty())?;
    let places = parse_decimal::<u8>(places).filter(|p| *p <= MAX_FIXED_PLACES)?;

    Some((bits, places))
}

/// Parses the length suffix of a static bytes type.
fn parse_bytes_length(suffix: &str) -> Option<u8> {
    let length = parse_decimal::<u8>(suffix)?;
    (1..=WORD_SIZE_BYTES)
        .contains(&usize::from(length))
        .then_some(length)
}

/// Parses `digits` as a plain decimal number, rejecting signs and leading
/// zeroes.
fn parse_decimal<T: FromStr>(digits: &str) -> Option<T> {
    let plain = !digits.is_empty()
        && digits.bytes().all(|b| b.is_ascii_digit())
        && !(digits.len() > 1 && digits.starts_with('0'));
    if !plain {
        return None;
    }

    digits.parse().ok()
}
