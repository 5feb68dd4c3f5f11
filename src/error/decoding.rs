//! This module contains the structured errors produced when a value cannot be
//! decoded, along with the signal used to abandon a decode entirely.

use std::fmt::{Display, Formatter};

use ethnum::U256;
use serde::Serialize;
use thiserror::Error;

use crate::{
    error::read,
    padding::PaddingType,
    types::{ContractType, EnumType, Type},
    value::ErrorResult,
};

/// The errors that can occur while decoding a single value.
///
/// By default these are embedded into a [`crate::value::DecodedResult`] so
/// that the caller can render them in place of the value. Under strict ABI
/// mode (and, for the resolution errors, when retries are allowed) they are
/// instead raised inside a [`StopDecoding`].
///
/// The serialized `kind` of each variant is given by [`Self::kind`].
#[derive(Clone, Debug, Eq, Error, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all_fields = "camelCase")]
pub enum DecodingError {
    #[error("Bool {raw} is not padded as {padding_type}")]
    #[serde(rename = "BoolPaddingError")]
    BoolPadding {
        padding_type: PaddingType,
        raw:          String,
    },

    #[error("Uint {raw} is not padded as {padding_type}")]
    #[serde(rename = "UintPaddingError")]
    UintPadding {
        padding_type: PaddingType,
        raw:          String,
    },

    #[error("Int {raw} is not padded as {padding_type}")]
    #[serde(rename = "IntPaddingError")]
    IntPadding {
        padding_type: PaddingType,
        raw:          String,
    },

    #[error("Address {raw} is not padded as {padding_type}")]
    #[serde(rename = "AddressPaddingError")]
    AddressPadding {
        padding_type: PaddingType,
        raw:          String,
    },

    #[error("Contract address {raw} is not padded as {padding_type}")]
    #[serde(rename = "ContractPaddingError")]
    ContractPadding {
        padding_type: PaddingType,
        raw:          String,
    },

    #[error("Bytes {raw} are not padded as {padding_type}")]
    #[serde(rename = "BytesPaddingError")]
    BytesPadding {
        padding_type: PaddingType,
        raw:          String,
    },

    #[error("External function pointer {raw} is not padded as {padding_type}")]
    #[serde(rename = "FunctionExternalNonStackPaddingError")]
    FunctionExternalPadding {
        padding_type: PaddingType,
        raw:          String,
    },

    #[error("Internal function pointer {raw} is not padded as {padding_type}")]
    #[serde(rename = "FunctionInternalPaddingError")]
    FunctionInternalPadding {
        padding_type: PaddingType,
        raw:          String,
    },

    #[error("Enum {} value {raw} is not padded as {padding_type}", .ty.type_name)]
    #[serde(rename = "EnumPaddingError")]
    EnumPadding {
        #[serde(rename = "type")]
        ty:           EnumType,
        padding_type: PaddingType,
        raw:          String,
    },

    #[error("Fixed {raw} is not padded as {padding_type}")]
    #[serde(rename = "FixedPaddingError")]
    FixedPadding {
        padding_type: PaddingType,
        raw:          String,
    },

    #[error("Ufixed {raw} is not padded as {padding_type}")]
    #[serde(rename = "UfixedPaddingError")]
    UfixedPadding {
        padding_type: PaddingType,
        raw:          String,
    },

    #[error("Bool has numeric value {raw_as_bn}, which is neither 0 nor 1")]
    #[serde(rename = "BoolOutOfRangeError")]
    BoolOutOfRange {
        #[serde(rename = "rawAsBN", with = "ethnum::serde::decimal")]
        raw_as_bn: U256,
    },

    #[error("Enum {} has no option with index {raw_as_bn}", .ty.type_name)]
    #[serde(rename = "EnumOutOfRangeError")]
    EnumOutOfRange {
        #[serde(rename = "type")]
        ty:        EnumType,
        #[serde(rename = "rawAsBN", with = "ethnum::serde::decimal")]
        raw_as_bn: U256,
    },

    #[error("The definition of enum {} could not be found", .ty.type_name)]
    #[serde(rename = "EnumNotFoundDecodingError")]
    EnumNotFound {
        #[serde(rename = "type")]
        ty:        EnumType,
        #[serde(rename = "rawAsBN", with = "ethnum::serde::decimal")]
        raw_as_bn: U256,
    },

    #[error("The definition of {ty} could not be found")]
    #[serde(rename = "UserDefinedTypeNotFoundError")]
    UserDefinedTypeNotFound {
        #[serde(rename = "type")]
        ty: Type,
    },

    #[error(
        "Internal function pointer has deployed PC 0 but constructor PC \
         {constructor_program_counter}"
    )]
    #[serde(rename = "MalformedInternalFunctionError")]
    MalformedInternalFunction {
        context:                     ContractType,
        deployed_program_counter:    u64,
        constructor_program_counter: u64,
    },

    #[error(
        "Internal function pointer with deployed PC {deployed_program_counter} was used in a \
         constructor"
    )]
    #[serde(rename = "DeployedFunctionInConstructorError")]
    DeployedFunctionInConstructor {
        context:                     ContractType,
        deployed_program_counter:    u64,
        constructor_program_counter: u64,
    },

    #[error(
        "No internal function exists at deployed PC {deployed_program_counter} / constructor PC \
         {constructor_program_counter}"
    )]
    #[serde(rename = "NoSuchInternalFunctionError")]
    NoSuchInternalFunction {
        context:                     ContractType,
        deployed_program_counter:    u64,
        constructor_program_counter: u64,
    },

    #[error("Underlying value could not be decoded: {error}")]
    #[serde(rename = "WrappedError")]
    Wrapped { error: Box<ErrorResult> },

    #[error("Could not read value: {error}")]
    #[serde(rename = "ReadError")]
    Read { error: read::Error },
}

impl DecodingError {
    /// Gets the name by which this kind of error is known, matching the `kind`
    /// tag it serializes with.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::BoolPadding { .. } => "BoolPaddingError",
            Self::UintPadding { .. } => "UintPaddingError",
            Self::IntPadding { .. } => "IntPaddingError",
            Self::AddressPadding { .. } => "AddressPaddingError",
            Self::ContractPadding { .. } => "ContractPaddingError",
            Self::BytesPadding { .. } => "BytesPaddingError",
            Self::FunctionExternalPadding { .. } => "FunctionExternalNonStackPaddingError",
            Self::FunctionInternalPadding { .. } => "FunctionInternalPaddingError",
            Self::EnumPadding { .. } => "EnumPaddingError",
            Self::FixedPadding { .. } => "FixedPaddingError",
            Self::UfixedPadding { .. } => "UfixedPaddingError",
            Self::BoolOutOfRange { .. } => "BoolOutOfRangeError",
            Self::EnumOutOfRange { .. } => "EnumOutOfRangeError",
            Self::EnumNotFound { .. } => "EnumNotFoundDecodingError",
            Self::UserDefinedTypeNotFound { .. } => "UserDefinedTypeNotFoundError",
            Self::MalformedInternalFunction { .. } => "MalformedInternalFunctionError",
            Self::DeployedFunctionInConstructor { .. } => "DeployedFunctionInConstructorError",
            Self::NoSuchInternalFunction { .. } => "NoSuchInternalFunctionError",
            Self::Wrapped { .. } => "WrappedError",
            Self::Read { .. } => "ReadError",
        }
    }

    /// Checks whether this error stems from missing type information, such
    /// that retrying with a better-populated type registry may succeed.
    #[must_use]
    pub fn is_resolution_error(&self) -> bool {
        matches!(
            self,
            Self::UserDefinedTypeNotFound { .. } | Self::EnumNotFound { .. }
        )
    }
}

impl From<read::Error> for DecodingError {
    fn from(error: read::Error) -> Self {
        Self::Read { error }
    }
}

/// The signal used to abandon the current decode attempt in its entirety.
///
/// Where a [`DecodingError`] is normally embedded into the result for the
/// offending value, a `StopDecoding` unwinds the whole decode (through `?`)
/// so that no partially-decoded result survives.
///
/// The `retryable` flag is only ever set for errors where
/// [`DecodingError::is_resolution_error`] holds.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct StopDecoding {
    /// The error that caused decoding to stop.
    pub error: DecodingError,

    /// Whether re-attempting the decode with more type information may
    /// succeed.
    pub retryable: bool,
}

impl StopDecoding {
    /// Constructs a stop signal that does not permit a retry.
    #[must_use]
    pub fn new(error: DecodingError) -> Self {
        let retryable = false;
        Self { error, retryable }
    }

    /// Constructs a stop signal that permits a retry.
    #[must_use]
    pub fn retryable(error: DecodingError) -> Self {
        let retryable = true;
        Self { error, retryable }
    }

    /// Checks whether the caller may retry the decode.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        self.retryable
    }
}

impl Display for StopDecoding {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.retryable {
            write!(f, "Decoding stopped (retryable): {}", self.error)
        } else {
            write!(f, "Decoding stopped: {}", self.error)
        }
    }
}

impl std::error::Error for StopDecoding {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}
