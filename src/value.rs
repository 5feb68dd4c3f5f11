//! This module contains the representation of decoded values.
//!
//! A decode produces a [`DecodedResult`], which is either a value tagged with
//! the fully-resolved type it was decoded as, or an embedded error tagged with
//! the type that was being decoded.

use std::fmt::{Display, Formatter};

use ethnum::{I256, U256};
use serde::{Serialize, Serializer};

use crate::{
    context::FunctionAbiEntry,
    error::decoding::DecodingError,
    types::{ContractType, Mutability, Type},
};

/// The outcome of decoding a single value.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum DecodedResult {
    Value(ValueResult),
    Error(ErrorResult),
}

impl DecodedResult {
    /// Gets the type that the result is tagged with.
    #[must_use]
    pub fn ty(&self) -> &Type {
        match self {
            Self::Value(value) => &value.ty,
            Self::Error(error) => &error.ty,
        }
    }

    /// Gets the value, if decoding succeeded.
    #[must_use]
    pub fn value(&self) -> Option<&ValueResult> {
        match self {
            Self::Value(value) => Some(value),
            Self::Error(_) => None,
        }
    }

    /// Gets the error, if decoding failed.
    #[must_use]
    pub fn error(&self) -> Option<&ErrorResult> {
        match self {
            Self::Value(_) => None,
            Self::Error(error) => Some(error),
        }
    }

    /// Checks if decoding succeeded.
    #[must_use]
    pub fn is_value(&self) -> bool {
        matches!(self, Self::Value(_))
    }
}

impl Display for DecodedResult {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Value(value) => write!(f, "{value}"),
            Self::Error(error) => write!(f, "{error}"),
        }
    }
}

/// A successfully-decoded value.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct ValueResult {
    /// The fully-resolved type of the value.
    #[serde(rename = "type")]
    pub ty: Type,

    pub value: Value,

    pub interpretations: Interpretations,
}

impl ValueResult {
    /// Constructs a value result for `value` of type `ty`, with no
    /// interpretations.
    #[must_use]
    pub fn new(ty: Type, value: Value) -> Self {
        let interpretations = Interpretations::default();
        Self {
            ty,
            value,
            interpretations,
        }
    }
}

impl Display for ValueResult {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match (&self.value, &self.ty) {
            (Value::Enum { name, .. }, Type::Enum(enum_type)) => {
                write!(f, "{}.{name}", enum_type.qualified_name())
            }
            (Value::UserDefinedValueType(inner), Type::UserDefinedValueType(udvt)) => {
                write!(f, "{}.wrap({inner})", udvt.qualified_name())
            }
            (value, _) => write!(f, "{value}"),
        }
    }
}

/// A value that could not be decoded.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct ErrorResult {
    /// The type that was being decoded, which may not be fully resolved.
    #[serde(rename = "type")]
    pub ty: Type,

    pub error: DecodingError,
}

impl ErrorResult {
    /// Constructs an error result for a value of type `ty`.
    #[must_use]
    pub fn new(ty: Type, error: DecodingError) -> Self {
        Self { ty, error }
    }
}

impl Display for ErrorResult {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "<decoding error ({}): {}>", self.ty, self.error)
    }
}

/// Semantic annotations attached to a value by higher layers.
///
/// The decoder itself never fills these in.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Interpretations {
    /// An ENS name that the value (an address) resolves from.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ens_name: Option<String>,
}

/// The payload of a decoded value, specific to the class of its type.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(untagged, rename_all_fields = "camelCase")]
pub enum Value {
    Bool {
        as_boolean: bool,
    },

    /// An unsigned integer, alongside the interpretation of the unstripped
    /// bytes.
    Uint {
        #[serde(rename = "asBN", with = "ethnum::serde::decimal")]
        as_bn:     U256,
        #[serde(rename = "rawAsBN", with = "ethnum::serde::decimal")]
        raw_as_bn: U256,
    },

    /// A signed integer, alongside the interpretation of the unstripped bytes.
    Int {
        #[serde(rename = "asBN", with = "ethnum::serde::decimal")]
        as_bn:     I256,
        #[serde(rename = "rawAsBN", with = "ethnum::serde::decimal")]
        raw_as_bn: I256,
    },

    Address {
        /// The checksummed address.
        as_address: String,
        raw_as_hex: String,
    },

    Contract(ContractValueInfo),

    Bytes {
        as_hex:     String,
        raw_as_hex: String,
    },

    FunctionExternal(FunctionExternalValueInfo),

    FunctionInternal(FunctionInternalValueInfo),

    Enum {
        name:          String,
        #[serde(rename = "numericAsBN", with = "ethnum::serde::decimal")]
        numeric_as_bn: U256,
    },

    /// A signed or unsigned fixed-point number, alongside the interpretation
    /// of the unstripped bytes.
    Fixed {
        as_big:     FixedPoint,
        raw_as_big: FixedPoint,
    },

    /// The value of the underlying type of a user-defined value type.
    UserDefinedValueType(Box<ValueResult>),
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bool { as_boolean } => write!(f, "{as_boolean}"),
            Self::Uint { as_bn, .. } => write!(f, "{as_bn}"),
            Self::Int { as_bn, .. } => write!(f, "{as_bn}"),
            Self::Address { as_address, .. } => write!(f, "{as_address}"),
            Self::Contract(contract) => write!(f, "{contract}"),
            Self::Bytes { as_hex, .. } => write!(f, "{as_hex}"),
            Self::FunctionExternal(function) => write!(f, "{function}"),
            Self::FunctionInternal(function) => write!(f, "{function}"),
            Self::Enum { name, .. } => write!(f, "{name}"),
            Self::Fixed { as_big, .. } => write!(f, "{as_big}"),
            Self::UserDefinedValueType(inner) => write!(f, "{inner}"),
        }
    }
}

/// An exact fixed-point decimal: `magnitude / 10^places`, negated if
/// `negative`.
///
/// The magnitude is kept separately from the sign so that both the full range
/// of `ufixed256xN` and of `fixed256xN` can be represented.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct FixedPoint {
    negative:  bool,
    magnitude: U256,
    places:    u8,
}

impl FixedPoint {
    /// Constructs the fixed-point number `value / 10^places`.
    #[must_use]
    pub fn from_signed(value: I256, places: u8) -> Self {
        let negative = value.is_negative();
        let magnitude = value.unsigned_abs();
        Self {
            negative,
            magnitude,
            places,
        }
    }

    /// Constructs the non-negative fixed-point number `value / 10^places`.
    #[must_use]
    pub fn from_unsigned(value: U256, places: u8) -> Self {
        Self {
            negative:  false,
            magnitude: value,
            places,
        }
    }

    /// Checks if the number is below zero.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.negative
    }

    /// Gets the absolute value of the unscaled integer.
    #[must_use]
    pub fn magnitude(&self) -> U256 {
        self.magnitude
    }

    /// Gets the number of decimal places the integer is scaled down by.
    #[must_use]
    pub fn places(&self) -> u8 {
        self.places
    }
}

/// Formats the number as an exact decimal, without trailing zeroes after the
/// decimal point.
impl Display for FixedPoint {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let places = usize::from(self.places);
        let mut digits = self.magnitude.to_string();
        if digits.len() <= places {
            // Always leave at least one integer digit
            digits.insert_str(0, &"0".repeat(places + 1 - digits.len()));
        }
        let (integer, fraction) = digits.split_at(digits.len() - places);
        let fraction = fraction.trim_end_matches('0');

        if self.negative {
            write!(f, "-")?;
        }
        write!(f, "{integer}")?;
        if !fraction.is_empty() {
            write!(f, ".{fraction}")?;
        }

        Ok(())
    }
}

impl Serialize for FixedPoint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// What is known about the contract at an address.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ContractValueInfo {
    /// The code at the address belongs to a known contract.
    Known {
        address:     String,
        raw_address: String,
        class:       ContractType,
    },

    /// The code at the address is not recognised.
    Unknown {
        address:     String,
        raw_address: String,
    },
}

impl ContractValueInfo {
    /// Gets the checksummed address of the contract.
    #[must_use]
    pub fn address(&self) -> &str {
        match self {
            Self::Known { address, .. } | Self::Unknown { address, .. } => address,
        }
    }
}

impl Display for ContractValueInfo {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Known { address, class, .. } => write!(f, "{}({address})", class.type_name),
            Self::Unknown { address, .. } => write!(f, "{address}"),
        }
    }
}

/// What is known about an external function pointer.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum FunctionExternalValueInfo {
    /// The contract is known and has a function with the selector.
    Known {
        contract: ContractValueInfo,
        selector: String,
        abi:      FunctionAbiEntry,
    },

    /// The contract is known but has no function with the selector.
    Invalid {
        contract: ContractValueInfo,
        selector: String,
    },

    /// The contract is not known, so the selector cannot be resolved.
    Unknown {
        contract: ContractValueInfo,
        selector: String,
    },
}

impl Display for FunctionExternalValueInfo {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Known { contract, abi, .. } => write!(f, "{contract}.{}", abi.name),
            Self::Invalid { contract, selector } | Self::Unknown { contract, selector } => {
                write!(f, "{contract}.{selector}")
            }
        }
    }
}

/// What is known about an internal function pointer.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum FunctionInternalValueInfo {
    /// The pointer refers to a known function.
    Function {
        context:                     ContractType,
        deployed_program_counter:    u64,
        constructor_program_counter: u64,
        name:                        String,
        id:                          String,
        defined_in:                  Option<ContractType>,
        mutability:                  Option<Mutability>,
    },

    /// The pointer is unassigned, or refers to the designated invalid
    /// function, and so throws when called.
    Exception {
        context:                     ContractType,
        deployed_program_counter:    u64,
        constructor_program_counter: u64,
    },

    /// No internal functions table is available to resolve the pointer.
    Unknown {
        context:                     ContractType,
        deployed_program_counter:    u64,
        constructor_program_counter: u64,
    },
}

impl Display for FunctionInternalValueInfo {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Function {
                name, defined_in, ..
            } => match defined_in {
                Some(class) => write!(f, "{}.{name}", class.type_name),
                None => write!(f, "{name}"),
            },
            Self::Exception { .. } => write!(f, "assert(false)"),
            Self::Unknown {
                deployed_program_counter,
                constructor_program_counter,
                ..
            } => write!(
                f,
                "<internal function at deployed PC {deployed_program_counter}, constructor PC \
                 {constructor_program_counter}>"
            ),
        }
    }
}
