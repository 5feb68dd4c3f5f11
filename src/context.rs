//! This module contains the types describing known pieces of contract
//! bytecode, and the registry used to recognise them on chain.

use std::{
    collections::{BTreeMap, HashMap},
    ops::Range,
};

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::{
    constant::SELECTOR_SIZE_BYTES,
    types::{ContractKind, ContractType, Mutability},
    utility::{keccak256, make_type_id, to_hex_string},
};

/// A parameter in an ABI function entry.
#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AbiParameter {
    pub name: String,

    /// The canonical ABI type of the parameter, e.g. `uint256` or
    /// `(address,bytes32)`.
    #[serde(rename = "type")]
    pub ty: String,
}

impl AbiParameter {
    /// Constructs a new parameter named `name` of canonical ABI type `ty`.
    #[must_use]
    pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
        let name = name.into();
        let ty = ty.into();
        Self { name, ty }
    }
}

/// A function entry from a contract's ABI.
#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionAbiEntry {
    pub name: String,

    #[serde(default)]
    pub inputs: Vec<AbiParameter>,

    #[serde(default)]
    pub outputs: Vec<AbiParameter>,

    pub state_mutability: Mutability,
}

impl FunctionAbiEntry {
    /// Constructs a new entry for the function `name` that takes `inputs`.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        inputs: Vec<AbiParameter>,
        state_mutability: Mutability,
    ) -> Self {
        let name = name.into();
        let outputs = Vec::new();
        Self {
            name,
            inputs,
            outputs,
            state_mutability,
        }
    }

    /// Sets the outputs of the function.
    #[must_use]
    pub fn with_outputs(mut self, outputs: Vec<AbiParameter>) -> Self {
        self.outputs = outputs;
        self
    }

    /// Gets the canonical signature of the function, e.g.
    /// `transfer(address,uint256)`.
    #[must_use]
    pub fn signature(&self) -> String {
        let inputs = self.inputs.iter().map(|p| p.ty.as_str()).join(",");
        format!("{}({inputs})", self.name)
    }

    /// Gets the selector of the function as a `0x`-prefixed hex string.
    #[must_use]
    pub fn selector(&self) -> String {
        let hash = keccak256(self.signature().as_bytes());
        to_hex_string(&hash[..SELECTOR_SIZE_BYTES])
    }
}

/// A known piece of bytecode and the contract it belongs to.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Context {
    /// The hex-encoded Keccak-256 hash of the `binary`.
    context_hash: String,

    /// The bytecode of the context.
    binary: Vec<u8>,

    /// Ranges in `binary` (library link references and immutables) whose
    /// contents vary between deployments and so match any bytes.
    wildcards: Vec<Range<usize>>,

    /// Whether this is constructor (creation) code rather than deployed code.
    pub is_constructor: bool,

    pub contract_name: String,

    /// The compiler-assigned id of the contract, if it was compiled from
    /// source available to us.
    pub contract_id: Option<String>,

    pub contract_kind: Option<ContractKind>,

    pub payable: Option<bool>,

    /// The id of the compilation the contract came from.
    pub compilation_id: Option<String>,

    /// The contract's function ABI entries, keyed by hex selector.
    abi: HashMap<String, FunctionAbiEntry>,
}

impl Context {
    /// Constructs a new deployed-code context for the contract `contract_name`
    /// with the provided `binary`.
    #[must_use]
    pub fn new(contract_name: impl Into<String>, binary: Vec<u8>) -> Self {
        let context_hash = to_hex_string(&keccak256(&binary));
        Self {
            context_hash,
            binary,
            wildcards: Vec::new(),
            is_constructor: false,
            contract_name: contract_name.into(),
            contract_id: None,
            contract_kind: None,
            payable: None,
            compilation_id: None,
            abi: HashMap::new(),
        }
    }

    /// Marks the context as constructor code.
    #[must_use]
    pub fn constructor(mut self) -> Self {
        self.is_constructor = true;
        self
    }

    /// Sets the contract id, making the context native to `compilation_id`.
    #[must_use]
    pub fn with_id(mut self, contract_id: impl Into<String>, compilation_id: Option<&str>) -> Self {
        self.contract_id = Some(contract_id.into());
        self.compilation_id = compilation_id.map(str::to_string);
        self
    }

    /// Sets the kind of the contract.
    #[must_use]
    pub fn with_kind(mut self, kind: ContractKind) -> Self {
        self.contract_kind = Some(kind);
        self
    }

    /// Sets whether the contract is payable.
    #[must_use]
    pub fn with_payable(mut self, payable: bool) -> Self {
        self.payable = Some(payable);
        self
    }

    /// Adds the function `entry` to the context's ABI.
    #[must_use]
    pub fn with_function(mut self, entry: FunctionAbiEntry) -> Self {
        self.abi.insert(entry.selector(), entry);
        self
    }

    /// Marks `range` in the binary as matching any bytes.
    ///
    /// Ranges extending beyond the binary are clipped to it.
    #[must_use]
    pub fn with_wildcard(mut self, range: Range<usize>) -> Self {
        let end = range.end.min(self.binary.len());
        self.wildcards.push(range.start.min(end)..end);
        self
    }

    /// Gets the hex-encoded Keccak-256 hash of the context's binary.
    #[must_use]
    pub fn context_hash(&self) -> &str {
        &self.context_hash
    }

    /// Gets the context's binary.
    #[must_use]
    pub fn binary(&self) -> &[u8] {
        &self.binary
    }

    /// Looks up the ABI entry for the hex-encoded `selector`.
    #[must_use]
    pub fn function(&self, selector: &str) -> Option<&FunctionAbiEntry> {
        self.abi.get(&selector.to_ascii_lowercase())
    }

    /// Gets the contract type that this context belongs to.
    ///
    /// Contexts with a contract id are native, and all others are foreign.
    #[must_use]
    pub fn contract_type(&self) -> ContractType {
        let base = match &self.contract_id {
            Some(id) => ContractType::native(
                make_type_id(id, self.compilation_id.as_deref()),
                &self.contract_name,
            ),
            None => ContractType::foreign(&self.contract_name),
        };
        ContractType {
            contract_kind: self.contract_kind,
            payable: self.payable,
            ..base
        }
    }

    /// Checks whether `code` is an instance of this context, with wildcard
    /// ranges matching anything.
    #[must_use]
    pub fn matches(&self, code: &[u8]) -> bool {
        if code.len() != self.binary.len() {
            return false;
        }

        code.iter()
            .zip(&self.binary)
            .enumerate()
            .all(|(i, (actual, expected))| {
                actual == expected || self.wildcards.iter().any(|range| range.contains(&i))
            })
    }
}

/// The interface to a registry that recognises on-chain code.
pub trait ContextRegistry {
    /// Finds the context whose bytecode is `code`, if any.
    fn find_context(&self, code: &[u8]) -> Option<&Context>;
}

/// A registry of known contexts, keyed by their hash.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Contexts {
    contexts: BTreeMap<String, Context>,
}

impl Contexts {
    /// Creates a new, empty, registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `context` to the registry.
    pub fn add(&mut self, context: Context) {
        self.contexts.insert(context.context_hash.clone(), context);
    }

    /// Adds `context` to the registry, returning the registry.
    #[must_use]
    pub fn with(mut self, context: Context) -> Self {
        self.add(context);
        self
    }

    /// Gets the number of contexts in the registry.
    #[must_use]
    pub fn len(&self) -> usize {
        self.contexts.len()
    }

    /// Checks if the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.contexts.is_empty()
    }
}

impl ContextRegistry for Contexts {
    fn find_context(&self, code: &[u8]) -> Option<&Context> {
        if code.is_empty() {
            return None;
        }

        let hash = to_hex_string(&keccak256(code));
        self.contexts
            .get(&hash)
            .or_else(|| self.contexts.values().find(|context| context.matches(code)))
    }
}

impl FromIterator<Context> for Contexts {
    fn from_iter<T: IntoIterator<Item = Context>>(iter: T) -> Self {
        let mut contexts = Self::new();
        iter.into_iter().for_each(|c| contexts.add(c));
        contexts
    }
}
