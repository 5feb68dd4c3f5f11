//! This module contains the definition of the Solidity value types that the
//! decoder is capable of dealing with.
//!
//! Only statically-sized value types are represented. Dynamic types and
//! containers are decoded elsewhere and never reach the basic decoder.

pub mod allocation;
pub mod name;
pub mod registry;

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

pub use registry::UserDefinedTypes;

/// A descriptor for a statically-sized Solidity value type.
///
/// # Invariants
///
/// Each individual variant in the enum describes the invariants placed upon it.
/// It is the responsibility of the code constructing these values to ensure
/// that the invariants are satisfied. Code utilising them will assume that the
/// data has been correctly constructed.
#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(tag = "typeClass", rename_all = "camelCase")]
pub enum Type {
    /// Booleans, occupying a single byte.
    Bool,

    /// Unsigned integers of a given `bits` width, where `8 <= bits <= 256 &&
    /// bits % 8 == 0`.
    Uint { bits: u16 },

    /// Signed (two's complement) integers of a given `bits` width, where `8 <=
    /// bits <= 256 && bits % 8 == 0`.
    Int { bits: u16 },

    /// Addresses, occupying 20 bytes.
    Address {
        #[serde(default)]
        payable: bool,
    },

    /// A reference to a contract, encoded as its address.
    Contract(ContractType),

    /// Byte arrays of a static `length`, where `0 < length <= 32`.
    Bytes { length: u8 },

    /// A function pointer.
    Function(FunctionType),

    /// An enum, which may not yet have its options resolved.
    Enum(EnumType),

    /// Signed fixed-point numbers of `bits` width (as for [`Self::Int`]) with
    /// `places` decimal places, where `places <= 80`.
    Fixed { bits: u16, places: u8 },

    /// Unsigned fixed-point numbers of `bits` width (as for [`Self::Uint`])
    /// with `places` decimal places, where `places <= 80`.
    Ufixed { bits: u16, places: u8 },

    /// A user-defined value type, which may not yet have its underlying type
    /// resolved.
    UserDefinedValueType(UserDefinedValueType),
}

impl Type {
    /// Gets the name of the class of types that this type belongs to.
    #[must_use]
    pub fn type_class(&self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Uint { .. } => "uint",
            Self::Int { .. } => "int",
            Self::Address { .. } => "address",
            Self::Contract(_) => "contract",
            Self::Bytes { .. } => "bytes",
            Self::Function(_) => "function",
            Self::Enum(_) => "enum",
            Self::Fixed { .. } => "fixed",
            Self::Ufixed { .. } => "ufixed",
            Self::UserDefinedValueType(_) => "userDefinedValueType",
        }
    }

    /// Gets the registry id of this type, if it is a user-defined type.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        match self {
            Self::Contract(contract) => contract.id.as_deref(),
            Self::Enum(enum_type) => Some(&enum_type.id),
            Self::UserDefinedValueType(udvt) => Some(&udvt.id),
            _ => None,
        }
    }

    /// Checks whether the type carries everything needed to decode it without
    /// consulting a [`UserDefinedTypes`] registry.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        match self {
            Self::Enum(enum_type) => enum_type.options.is_some(),
            Self::UserDefinedValueType(udvt) => udvt.underlying_type.is_some(),
            _ => true,
        }
    }
}

impl Display for Type {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bool => write!(f, "bool"),
            Self::Uint { bits } => write!(f, "uint{bits}"),
            Self::Int { bits } => write!(f, "int{bits}"),
            Self::Address { payable: false } => write!(f, "address"),
            Self::Address { payable: true } => write!(f, "address payable"),
            Self::Contract(contract) => write!(f, "contract {}", contract.type_name),
            Self::Bytes { length } => write!(f, "bytes{length}"),
            Self::Function(function) => write!(f, "function {}", function.visibility),
            Self::Enum(enum_type) => write!(f, "enum {}", enum_type.qualified_name()),
            Self::Fixed { bits, places } => write!(f, "fixed{bits}x{places}"),
            Self::Ufixed { bits, places } => write!(f, "ufixed{bits}x{places}"),
            Self::UserDefinedValueType(udvt) => write!(f, "{}", udvt.qualified_name()),
        }
    }
}

/// The kinds of contract-like definitions in Solidity.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ContractKind {
    Contract,
    Interface,
    Library,
}

/// A contract type.
///
/// Contracts known to the current compilation are _native_ and carry an `id`
/// for lookup in the [`UserDefinedTypes`] registry. Contracts that are only
/// known by name are _foreign_ and have no `id`.
#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractType {
    /// The registry id of the contract type, if it is native.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// The name of the contract.
    pub type_name: String,

    /// What kind of contract this is, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contract_kind: Option<ContractKind>,

    /// Whether the contract can receive ether, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payable: Option<bool>,
}

impl ContractType {
    /// Constructs a native contract type with the given `id` and `type_name`.
    #[must_use]
    pub fn native(id: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            id:            Some(id.into()),
            type_name:     type_name.into(),
            contract_kind: None,
            payable:       None,
        }
    }

    /// Constructs a foreign contract type known only by `type_name`.
    #[must_use]
    pub fn foreign(type_name: impl Into<String>) -> Self {
        Self {
            id:            None,
            type_name:     type_name.into(),
            contract_kind: None,
            payable:       None,
        }
    }

    /// Sets the kind of the contract to `kind`.
    #[must_use]
    pub fn with_kind(mut self, kind: ContractKind) -> Self {
        self.contract_kind = Some(kind);
        self
    }

    /// Sets the payability of the contract to `payable`.
    #[must_use]
    pub fn with_payable(mut self, payable: bool) -> Self {
        self.payable = Some(payable);
        self
    }
}

/// The visibility of a function pointer, which determines its encoding.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Visibility {
    /// An address and selector pair, usable across contracts.
    External,

    /// A pair of program counters, only meaningful within the current
    /// contract's bytecode.
    Internal,
}

impl Display for Visibility {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::External => write!(f, "external"),
            Self::Internal => write!(f, "internal"),
        }
    }
}

/// The state mutability of a function.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Mutability {
    Pure,
    View,
    Nonpayable,
    Payable,
}

/// A function pointer type.
#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionType {
    pub visibility: Visibility,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mutability: Option<Mutability>,
}

impl FunctionType {
    /// Constructs a function type with the provided `visibility` and no known
    /// mutability.
    #[must_use]
    pub fn new(visibility: Visibility) -> Self {
        let mutability = None;
        Self {
            visibility,
            mutability,
        }
    }
}

/// An enum type.
///
/// References to enums frequently arrive without their `options`, in which
/// case the full definition must be looked up by `id`.
#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnumType {
    pub id: String,

    pub type_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub defining_contract_name: Option<String>,

    /// The names of the options, in declaration order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
}

impl EnumType {
    /// Constructs an unresolved reference to the enum `type_name` with the
    /// registry id `id`.
    #[must_use]
    pub fn reference(id: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            id:                     id.into(),
            type_name:              type_name.into(),
            defining_contract_name: None,
            options:                None,
        }
    }

    /// Sets the options of the enum, resolving it.
    #[must_use]
    pub fn with_options<S: Into<String>>(mut self, options: impl IntoIterator<Item = S>) -> Self {
        self.options = Some(options.into_iter().map(Into::into).collect());
        self
    }

    /// Sets the name of the contract in which the enum is defined.
    #[must_use]
    pub fn defined_in(mut self, contract_name: impl Into<String>) -> Self {
        self.defining_contract_name = Some(contract_name.into());
        self
    }

    /// Gets the name of the enum, qualified by its defining contract if it has
    /// one.
    #[must_use]
    pub fn qualified_name(&self) -> String {
        qualify(self.defining_contract_name.as_deref(), &self.type_name)
    }
}

/// A user-defined value type, a thin alias over an underlying value type.
#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDefinedValueType {
    pub id: String,

    pub type_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub defining_contract_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub underlying_type: Option<Box<Type>>,
}

impl UserDefinedValueType {
    /// Constructs an unresolved reference to the user-defined value type
    /// `type_name` with the registry id `id`.
    #[must_use]
    pub fn reference(id: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            id:                     id.into(),
            type_name:              type_name.into(),
            defining_contract_name: None,
            underlying_type:        None,
        }
    }

    /// Sets the underlying type, resolving the user-defined value type.
    #[must_use]
    pub fn with_underlying(mut self, underlying: Type) -> Self {
        self.underlying_type = Some(Box::new(underlying));
        self
    }

    /// Sets the name of the contract in which the type is defined.
    #[must_use]
    pub fn defined_in(mut self, contract_name: impl Into<String>) -> Self {
        self.defining_contract_name = Some(contract_name.into());
        self
    }

    /// Gets the name of the type, qualified by its defining contract if it has
    /// one.
    #[must_use]
    pub fn qualified_name(&self) -> String {
        qualify(self.defining_contract_name.as_deref(), &self.type_name)
    }
}

fn qualify(scope: Option<&str>, name: &str) -> String {
    match scope {
        Some(scope) => format!("{scope}.{name}"),
        None => name.to_string(),
    }
}
