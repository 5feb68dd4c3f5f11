//! This module contains the execution-context bundle that accompanies every
//! decode, including the table used to resolve internal function pointers.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{
    context::{Context, ContextRegistry},
    read::ByteSource,
    types::{ContractKind, ContractType, Mutability, UserDefinedTypes},
    utility::make_type_id,
};

/// A mapping from program counter to the internal function found there.
pub type InternalFunctionsTable = BTreeMap<u64, InternalFunctionEntry>;

/// An entry in an [`InternalFunctionsTable`].
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum InternalFunctionEntry {
    /// The compiler's designated invalid function, which throws when called.
    DesignatedInvalid,

    /// An ordinary internal function.
    Function(InternalFunction),
}

/// The metadata for an internal function found in the bytecode.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InternalFunction {
    pub name: String,

    /// The id of the function's definition, local to its compilation.
    pub id: String,

    #[serde(default)]
    pub compilation_id: Option<String>,

    #[serde(default)]
    pub mutability: Option<Mutability>,

    /// The id of the contract that defines the function, or [`None`] for a
    /// free function.
    #[serde(default)]
    pub contract_id: Option<String>,

    #[serde(default)]
    pub contract_name: Option<String>,

    #[serde(default)]
    pub contract_kind: Option<ContractKind>,

    #[serde(default)]
    pub contract_payable: Option<bool>,
}

impl InternalFunction {
    /// Constructs a free function `name` with the local definition id `id`.
    #[must_use]
    pub fn new(name: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            name:             name.into(),
            id:               id.into(),
            compilation_id:   None,
            mutability:       None,
            contract_id:      None,
            contract_name:    None,
            contract_kind:    None,
            contract_payable: None,
        }
    }

    /// Sets the compilation that the function comes from.
    #[must_use]
    pub fn in_compilation(mut self, compilation_id: impl Into<String>) -> Self {
        self.compilation_id = Some(compilation_id.into());
        self
    }

    /// Sets the state mutability of the function.
    #[must_use]
    pub fn with_mutability(mut self, mutability: Mutability) -> Self {
        self.mutability = Some(mutability);
        self
    }

    /// Sets the contract that defines the function.
    #[must_use]
    pub fn defined_in(
        mut self,
        contract_id: impl Into<String>,
        contract_name: impl Into<String>,
    ) -> Self {
        self.contract_id = Some(contract_id.into());
        self.contract_name = Some(contract_name.into());
        self
    }

    /// Gets the globally-unique id of the function.
    #[must_use]
    pub fn type_id(&self) -> String {
        make_type_id(&self.id, self.compilation_id.as_deref())
    }

    /// Gets the type of the contract that defines the function, if it is not
    /// a free function.
    #[must_use]
    pub fn defining_contract(&self) -> Option<ContractType> {
        let contract_id = self.contract_id.as_deref()?;
        let id = make_type_id(contract_id, self.compilation_id.as_deref());
        let name = self.contract_name.clone().unwrap_or_default();

        Some(ContractType {
            contract_kind: self.contract_kind,
            payable: self.contract_payable,
            ..ContractType::native(id, name)
        })
    }
}

/// Everything about the executing EVM that the decoder may consult.
///
/// All of the referenced data is treated as a read-only snapshot for the
/// duration of a decode.
pub struct EvmInfo<'a, S> {
    /// The source of raw bytes for the pointers being decoded.
    pub state: &'a S,

    /// The definitions of the user-defined types that may be referenced.
    pub user_defined_types: &'a UserDefinedTypes,

    /// The known contexts, used to recognise the code at an address.
    pub contexts: &'a dyn ContextRegistry,

    /// The context that is currently executing.
    ///
    /// Whether execution is inside a constructor is given by its
    /// [`Context::is_constructor`].
    pub current_context: &'a Context,

    /// The internal functions of the current context, if they are known.
    pub internal_functions_table: Option<&'a InternalFunctionsTable>,
}

impl<'a, S: ByteSource> EvmInfo<'a, S> {
    /// Constructs the info bundle without an internal functions table.
    #[must_use]
    pub fn new(
        state: &'a S,
        user_defined_types: &'a UserDefinedTypes,
        contexts: &'a dyn ContextRegistry,
        current_context: &'a Context,
    ) -> Self {
        Self {
            state,
            user_defined_types,
            contexts,
            current_context,
            internal_functions_table: None,
        }
    }

    /// Sets the internal functions table used to resolve internal function
    /// pointers.
    #[must_use]
    pub fn with_internal_functions(mut self, table: &'a InternalFunctionsTable) -> Self {
        self.internal_functions_table = Some(table);
        self
    }
}
