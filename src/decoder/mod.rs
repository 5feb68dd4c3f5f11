//! This module contains the decoder for statically-sized ABI values.
//!
//! A decode reads the raw bytes for a pointer from the [`ByteSource`], checks
//! and removes their padding, and interprets what remains according to the
//! class of the type being decoded.
//!
//! # Errors
//!
//! Problems with the value (bad padding, out of range values, missing type
//! definitions, and so on) are normally embedded into the
//! [`DecodedResult`] as an error result. Under strict ABI mode, and for
//! missing type definitions when retries are allowed, they instead stop the
//! whole decode with a [`StopDecoding`]. This policy is applied in exactly
//! one place, so that every type class follows it in the same way.

pub mod contract;
pub mod internal;

use ethnum::U256;
use futures::{
    executor::block_on,
    future::{FutureExt, LocalBoxFuture},
};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::{
    constant::{
        ADDRESS_SIZE_BYTES,
        BOOL_SIZE_BYTES,
        BYTE_SIZE_BITS,
        DEFAULT_ALLOW_RETRY,
        DEFAULT_PADDING_MODE,
        DEFAULT_STRICT_ABI_MODE,
        EXTERNAL_FUNCTION_SIZE_BYTES,
        INTERNAL_FUNCTION_SIZE_BYTES,
        PC_SIZE_BYTES,
        WORD_SIZE_BYTES,
    },
    decoder::{
        contract::{resolve_contract, resolve_external_function},
        internal::resolve_internal_function,
    },
    error::decoding::{DecodingError, StopDecoding},
    evm::EvmInfo,
    padding::{check_padding, padding_type_for, strip, PaddingMode, PaddingType},
    pointer::DataPointer,
    read::ByteSource,
    types::{allocation::enum_byte_width, EnumType, Type, UserDefinedValueType, Visibility},
    utility::{bytes_to_i256, bytes_to_pc, bytes_to_u256, to_checksum_address, to_hex_string},
    value::{DecodedResult, ErrorResult, FixedPoint, Value, ValueResult},
};

/// The result type for a decode, which is stopped by a [`StopDecoding`].
pub type Result<T> = std::result::Result<T, StopDecoding>;

/// The options that control how strictly values are decoded.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DecodeOptions {
    /// Whether decoding errors stop the decode rather than being embedded in
    /// the result.
    ///
    /// Defaults to [`DEFAULT_STRICT_ABI_MODE`].
    pub strict_abi_mode: bool,

    /// How padding is checked and removed.
    ///
    /// Defaults to [`DEFAULT_PADDING_MODE`].
    pub padding_mode: PaddingMode,

    /// Whether a missing type definition stops the decode with a retryable
    /// error even outside of strict ABI mode.
    ///
    /// Defaults to [`DEFAULT_ALLOW_RETRY`].
    pub allow_retry: bool,
}

impl DecodeOptions {
    /// Sets the `strict_abi_mode` option to `value`.
    #[must_use]
    pub fn with_strict_abi_mode(mut self, value: bool) -> Self {
        self.strict_abi_mode = value;
        self
    }

    /// Sets the `padding_mode` option to `value`.
    #[must_use]
    pub fn with_padding_mode(mut self, value: PaddingMode) -> Self {
        self.padding_mode = value;
        self
    }

    /// Sets the `allow_retry` option to `value`.
    #[must_use]
    pub fn with_allow_retry(mut self, value: bool) -> Self {
        self.allow_retry = value;
        self
    }
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            strict_abi_mode: DEFAULT_STRICT_ABI_MODE,
            padding_mode:    DEFAULT_PADDING_MODE,
            allow_retry:     DEFAULT_ALLOW_RETRY,
        }
    }
}

/// Decodes the value of type `ty` whose bytes are located by `pointer`.
///
/// The returned future suspends whenever the byte source does, and can be
/// driven by any executor.
///
/// # Errors
///
/// Returns [`Err`] if decoding was stopped, which only happens under strict
/// ABI mode or for missing type definitions when retries are allowed.
pub fn decode<'a, S>(
    ty: &'a Type,
    pointer: &'a DataPointer,
    info: &'a EvmInfo<'a, S>,
    options: DecodeOptions,
) -> LocalBoxFuture<'a, Result<DecodedResult>>
where
    S: ByteSource + 'a,
{
    async move {
        if let Type::UserDefinedValueType(udvt) = ty {
            return decode_user_defined_value_type(ty, udvt, pointer, info, options).await;
        }

        let raw = match info.state.read(pointer).await {
            Ok(raw) => raw,
            Err(error) => {
                debug!(%ty, %error, "Could not read the bytes to decode");
                return dispatch(Failure::new(ty, error.into()), options);
            }
        };

        // Every basic value fits in a word, and a wider buffer has no exact
        // raw interpretation
        if raw.len() > WORD_SIZE_BYTES {
            debug!(%ty, length = raw.len(), "Read more bytes than fit in a word");
            let padding_type = padding_type_for(ty, options.padding_mode);
            let error = padding_error(ty, padding_type, to_hex_string(&raw));
            return dispatch(Failure::new(ty, error), options);
        }

        match decode_bytes(ty, &raw, info, options).await {
            Ok(value) => Ok(DecodedResult::Value(value)),
            Err(failure) => dispatch(failure, options),
        }
    }
    .boxed_local()
}

/// Decodes the value of type `ty` located by `pointer`, blocking the current
/// thread whenever the byte source suspends.
///
/// # Errors
///
/// Returns [`Err`] under the same conditions as [`decode`].
pub fn decode_blocking<S: ByteSource>(
    ty: &Type,
    pointer: &DataPointer,
    info: &EvmInfo<'_, S>,
    options: DecodeOptions,
) -> Result<DecodedResult> {
    block_on(decode(ty, pointer, info, options))
}

/// A decoding error that has not yet had the error policy applied to it.
struct Failure {
    /// The type that the error result is tagged with.
    ty: Type,

    error: DecodingError,

    /// Whether the error stems from missing type information.
    retryable: bool,
}

impl Failure {
    fn new(ty: &Type, error: DecodingError) -> Self {
        let ty = ty.clone();
        let retryable = false;
        Self {
            ty,
            error,
            retryable,
        }
    }

    fn retryable(ty: &Type, error: DecodingError) -> Self {
        Self {
            retryable: true,
            ..Self::new(ty, error)
        }
    }
}

/// Applies the error policy given by `options` to `failure`.
///
/// Retryable errors stop the decode under strict ABI mode or when retries are
/// allowed. All other errors stop it only under strict ABI mode, and are
/// otherwise embedded into the result.
fn dispatch(failure: Failure, options: DecodeOptions) -> Result<DecodedResult> {
    let Failure {
        ty,
        error,
        retryable,
    } = failure;

    if retryable && (options.strict_abi_mode || options.allow_retry) {
        debug!(%ty, kind = error.kind(), "Stopping decoding, retryable");
        return Err(StopDecoding::retryable(error));
    }

    if options.strict_abi_mode {
        debug!(%ty, kind = error.kind(), "Stopping decoding");
        return Err(StopDecoding::new(error));
    }

    trace!(%ty, kind = error.kind(), "Embedding decoding error");
    Ok(DecodedResult::Error(ErrorResult::new(ty, error)))
}

/// Decodes a user-defined value type as its underlying type, reading from the
/// same `pointer`.
///
/// An error decoding the underlying value is wrapped rather than isolated, as
/// the user-defined type has no other contents that could be salvaged.
async fn decode_user_defined_value_type<S: ByteSource>(
    ty: &Type,
    udvt: &UserDefinedValueType,
    pointer: &DataPointer,
    info: &EvmInfo<'_, S>,
    options: DecodeOptions,
) -> Result<DecodedResult> {
    let definition = info.user_defined_types.resolve_user_defined_value_type(udvt);
    let Some((definition, underlying)) =
        definition.and_then(|d| d.underlying_type.clone().map(|u| (d, u)))
    else {
        let error = DecodingError::UserDefinedTypeNotFound { ty: ty.clone() };
        return dispatch(Failure::retryable(ty, error), options);
    };
    let full_type = Type::UserDefinedValueType(definition);

    match decode(&underlying, pointer, info, options).await? {
        DecodedResult::Value(inner) => {
            let value = Value::UserDefinedValueType(Box::new(inner));
            Ok(DecodedResult::Value(ValueResult::new(full_type, value)))
        }
        DecodedResult::Error(inner) => {
            let error = DecodingError::Wrapped {
                error: Box::new(inner),
            };
            Ok(DecodedResult::Error(ErrorResult::new(full_type, error)))
        }
    }
}

/// Decodes the `raw` bytes as a value of type `ty`.
async fn decode_bytes<S: ByteSource>(
    ty: &Type,
    raw: &[u8],
    info: &EvmInfo<'_, S>,
    options: DecodeOptions,
) -> std::result::Result<ValueResult, Failure> {
    let mode = options.padding_mode;
    let value = match ty {
        Type::Bool => {
            let bytes = unpad(raw, BOOL_SIZE_BYTES, ty, mode)?;
            let numeric = bytes_to_u256(bytes);
            let as_boolean = if numeric == U256::ZERO {
                false
            } else if numeric == U256::ONE {
                true
            } else {
                let error = DecodingError::BoolOutOfRange { raw_as_bn: numeric };
                return Err(Failure::new(ty, error));
            };
            Value::Bool { as_boolean }
        }
        Type::Uint { bits } => {
            let bytes = unpad(raw, width(*bits), ty, mode)?;
            Value::Uint {
                as_bn:     bytes_to_u256(bytes),
                raw_as_bn: bytes_to_u256(raw),
            }
        }
        Type::Int { bits } => {
            let bytes = unpad(raw, width(*bits), ty, mode)?;
            Value::Int {
                as_bn:     bytes_to_i256(bytes),
                raw_as_bn: bytes_to_i256(raw),
            }
        }
        Type::Address { .. } => {
            let bytes = unpad(raw, ADDRESS_SIZE_BYTES, ty, mode)?;
            Value::Address {
                as_address: to_checksum_address(bytes),
                raw_as_hex: to_hex_string(raw),
            }
        }
        Type::Contract(contract_type) => {
            let bytes = unpad(raw, ADDRESS_SIZE_BYTES, ty, mode)?;
            let contract = resolve_contract(bytes, info).await;
            let full_type = Type::Contract(info.user_defined_types.resolve_contract(contract_type));
            return Ok(ValueResult::new(full_type, Value::Contract(contract)));
        }
        Type::Bytes { length } => {
            let bytes = unpad(raw, usize::from(*length), ty, mode)?;
            Value::Bytes {
                as_hex:     to_hex_string(bytes),
                raw_as_hex: to_hex_string(raw),
            }
        }
        Type::Function(function) => match function.visibility {
            Visibility::External => {
                let bytes = unpad(raw, EXTERNAL_FUNCTION_SIZE_BYTES, ty, mode)?;
                let (address, selector) = bytes.split_at(ADDRESS_SIZE_BYTES.min(bytes.len()));
                Value::FunctionExternal(resolve_external_function(address, selector, info).await)
            }
            Visibility::Internal => {
                // Internal function pointers are outside the ABI, but still
                // reach strict decoding through immutables
                let bytes = unpad(raw, INTERNAL_FUNCTION_SIZE_BYTES, ty, mode)?;
                let split = bytes.len().saturating_sub(PC_SIZE_BYTES);
                let (constructor_pc, deployed_pc) = bytes.split_at(split);
                let resolved = resolve_internal_function(
                    info.current_context,
                    info.internal_functions_table,
                    bytes_to_pc(deployed_pc),
                    bytes_to_pc(constructor_pc),
                )
                .map_err(|error| Failure::new(ty, error))?;
                Value::FunctionInternal(resolved)
            }
        },
        Type::Enum(enum_type) => return decode_enum(ty, enum_type, raw, info, mode),
        Type::Fixed { bits, places } => {
            let bytes = unpad(raw, width(*bits), ty, mode)?;
            Value::Fixed {
                as_big:     FixedPoint::from_signed(bytes_to_i256(bytes), *places),
                raw_as_big: FixedPoint::from_signed(bytes_to_i256(raw), *places),
            }
        }
        Type::Ufixed { bits, places } => {
            let bytes = unpad(raw, width(*bits), ty, mode)?;
            Value::Fixed {
                as_big:     FixedPoint::from_unsigned(bytes_to_u256(bytes), *places),
                raw_as_big: FixedPoint::from_unsigned(bytes_to_u256(raw), *places),
            }
        }
        Type::UserDefinedValueType(_) => {
            unreachable!("User-defined value types are decoded before their bytes are read")
        }
    };

    Ok(ValueResult::new(ty.clone(), value))
}

/// Decodes the `raw` bytes as an option of `enum_type`.
///
/// The padding is checked against the number of bytes needed to hold the
/// largest option index, rather than against the width of a word.
fn decode_enum<S: ByteSource>(
    ty: &Type,
    enum_type: &EnumType,
    raw: &[u8],
    info: &EvmInfo<'_, S>,
    mode: PaddingMode,
) -> std::result::Result<ValueResult, Failure> {
    let full_numeric = bytes_to_u256(raw);
    let Some(definition) = info.user_defined_types.resolve_enum(enum_type) else {
        let error = DecodingError::EnumNotFound {
            ty:        enum_type.clone(),
            raw_as_bn: full_numeric,
        };
        return Err(Failure::retryable(ty, error));
    };
    let options = definition.options.clone().unwrap_or_default();
    let full_type = Type::Enum(definition.clone());

    let bytes = unpad(raw, enum_byte_width(options.len()), &full_type, mode)?;
    let numeric = bytes_to_u256(bytes);

    let index = if numeric > U256::from(u64::MAX) {
        None
    } else {
        usize::try_from(numeric.as_u64()).ok()
    };
    let name = index.and_then(|index| options.get(index));
    match name {
        Some(name) => {
            let value = Value::Enum {
                name:          name.clone(),
                numeric_as_bn: numeric,
            };
            Ok(ValueResult::new(full_type, value))
        }
        None => {
            // Known to be invalid, so never retryable
            let error = DecodingError::EnumOutOfRange {
                ty:        definition,
                raw_as_bn: numeric,
            };
            Err(Failure::new(&full_type, error))
        }
    }
}

/// Checks the padding of `raw`, which holds `length` significant bytes, and
/// strips it if valid.
///
/// If the padding is invalid, the padding error for the class of `ty` is
/// returned.
fn unpad<'b>(
    raw: &'b [u8],
    length: usize,
    ty: &Type,
    mode: PaddingMode,
) -> std::result::Result<&'b [u8], Failure> {
    let padding_type = padding_type_for(ty, mode);
    if !check_padding(raw, length, ty, mode) {
        let error = padding_error(ty, padding_type, to_hex_string(raw));
        return Err(Failure::new(ty, error));
    }

    Ok(strip(raw, length, padding_type))
}

/// Builds the padding error for the class of `ty`, expecting `padding_type`
/// and having found the `raw` hex.
fn padding_error(ty: &Type, padding_type: PaddingType, raw: String) -> DecodingError {
    match ty {
        Type::Bool => DecodingError::BoolPadding { padding_type, raw },
        Type::Uint { .. } => DecodingError::UintPadding { padding_type, raw },
        Type::Int { .. } => DecodingError::IntPadding { padding_type, raw },
        Type::Address { .. } => DecodingError::AddressPadding { padding_type, raw },
        Type::Contract(_) => DecodingError::ContractPadding { padding_type, raw },
        Type::Bytes { .. } => DecodingError::BytesPadding { padding_type, raw },
        Type::Function(function) => match function.visibility {
            Visibility::External => DecodingError::FunctionExternalPadding { padding_type, raw },
            Visibility::Internal => DecodingError::FunctionInternalPadding { padding_type, raw },
        },
        Type::Enum(enum_type) => DecodingError::EnumPadding {
            ty: enum_type.clone(),
            padding_type,
            raw,
        },
        Type::Fixed { .. } => DecodingError::FixedPadding { padding_type, raw },
        Type::Ufixed { .. } => DecodingError::UfixedPadding { padding_type, raw },
        Type::UserDefinedValueType(udvt) => match &udvt.underlying_type {
            Some(underlying) => padding_error(underlying, padding_type, raw),
            None => DecodingError::UserDefinedTypeNotFound { ty: ty.clone() },
        },
    }
}

/// Gets the number of bytes in a numeric type of `bits` width.
fn width(bits: u16) -> usize {
    usize::from(bits) / BYTE_SIZE_BITS
}
