//! This module contains the registry of user-defined type definitions used to
//! resolve type references.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::types::{ContractType, EnumType, Type, UserDefinedValueType};

/// The known user-defined types, keyed by their id.
///
/// Type descriptors for enums and user-defined value types are frequently
/// references that omit the full definition. This registry supplies those
/// definitions. It is treated as a read-only snapshot for the duration of a
/// decode.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(transparent)]
pub struct UserDefinedTypes {
    types: HashMap<String, Type>,
}

impl UserDefinedTypes {
    /// Creates a new, empty, registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the definition `ty` to the registry under its id, returning the
    /// definition it replaced, if any.
    ///
    /// Types without an id (see [`Type::id`]) are not user-defined and are
    /// ignored.
    pub fn insert(&mut self, ty: Type) -> Option<Type> {
        let id = ty.id()?.to_string();
        self.types.insert(id, ty)
    }

    /// Adds the definition `ty` to the registry, returning the registry.
    #[must_use]
    pub fn with(mut self, ty: Type) -> Self {
        self.insert(ty);
        self
    }

    /// Gets the definition registered under `id`.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Type> {
        self.types.get(id)
    }

    /// Gets the number of definitions in the registry.
    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Checks if the registry contains no definitions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Resolves `ty` into its full definition.
    ///
    /// Types that are not user-defined are returned as they are. Contract
    /// types that are missing from the registry are also returned as they
    /// are, as they can be decoded without their definition.
    ///
    /// Returns [`None`] if `ty` is an enum or user-defined value type whose
    /// definition is not known.
    #[must_use]
    pub fn full_type(&self, ty: &Type) -> Option<Type> {
        match ty {
            Type::Enum(enum_type) => self.resolve_enum(enum_type).map(Type::Enum),
            Type::UserDefinedValueType(udvt) => self
                .resolve_user_defined_value_type(udvt)
                .map(Type::UserDefinedValueType),
            Type::Contract(contract) => Some(Type::Contract(self.resolve_contract(contract))),
            _ => Some(ty.clone()),
        }
    }

    /// Resolves an enum reference into a definition carrying its options.
    #[must_use]
    pub fn resolve_enum(&self, enum_type: &EnumType) -> Option<EnumType> {
        if enum_type.options.is_some() {
            return Some(enum_type.clone());
        }

        match self.get(&enum_type.id)? {
            Type::Enum(definition) if definition.options.is_some() => Some(definition.clone()),
            _ => None,
        }
    }

    /// Resolves a user-defined value type reference into a definition
    /// carrying its underlying type.
    #[must_use]
    pub fn resolve_user_defined_value_type(
        &self,
        udvt: &UserDefinedValueType,
    ) -> Option<UserDefinedValueType> {
        if udvt.underlying_type.is_some() {
            return Some(udvt.clone());
        }

        match self.get(&udvt.id)? {
            Type::UserDefinedValueType(definition) if definition.underlying_type.is_some() => {
                Some(definition.clone())
            }
            _ => None,
        }
    }

    /// Resolves a contract type against the registry, falling back to
    /// `contract` itself if no better definition is known.
    #[must_use]
    pub fn resolve_contract(&self, contract: &ContractType) -> ContractType {
        let definition = contract.id.as_deref().and_then(|id| self.get(id));
        match definition {
            Some(Type::Contract(definition)) => definition.clone(),
            _ => contract.clone(),
        }
    }
}

impl FromIterator<Type> for UserDefinedTypes {
    fn from_iter<T: IntoIterator<Item = Type>>(iter: T) -> Self {
        let mut registry = Self::new();
        iter.into_iter().for_each(|ty| {
            registry.insert(ty);
        });
        registry
    }
}
