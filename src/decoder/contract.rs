//! This module resolves addresses and external function pointers to what is
//! known about the code behind them.
//!
//! Both resolutions fetch the code at an address from the byte source, and so
//! may suspend.

use tracing::trace;

use crate::{
    context::Context,
    evm::EvmInfo,
    read::ByteSource,
    utility::{to_checksum_address, to_hex_string},
    value::{ContractValueInfo, FunctionExternalValueInfo},
};

/// Resolves the contract at the address given by `address_bytes`.
pub async fn resolve_contract<S: ByteSource>(
    address_bytes: &[u8],
    info: &EvmInfo<'_, S>,
) -> ContractValueInfo {
    lookup_contract(address_bytes, info).await.0
}

/// Resolves the external function pointer made up of `address_bytes` and
/// `selector_bytes`.
pub async fn resolve_external_function<S: ByteSource>(
    address_bytes: &[u8],
    selector_bytes: &[u8],
    info: &EvmInfo<'_, S>,
) -> FunctionExternalValueInfo {
    let selector = to_hex_string(selector_bytes);
    let (contract, context) = lookup_contract(address_bytes, info).await;

    let Some(context) = context else {
        return FunctionExternalValueInfo::Unknown { contract, selector };
    };

    match context.function(&selector) {
        Some(abi) => {
            trace!(%selector, name = %abi.name, "Resolved external function");
            let abi = abi.clone();
            FunctionExternalValueInfo::Known {
                contract,
                selector,
                abi,
            }
        }
        None => {
            trace!(%selector, contract = %context.contract_name, "Selector not found in ABI");
            FunctionExternalValueInfo::Invalid { contract, selector }
        }
    }
}

/// Fetches the code at `address_bytes` and looks it up in the known contexts.
async fn lookup_contract<'a, S: ByteSource>(
    address_bytes: &[u8],
    info: &EvmInfo<'a, S>,
) -> (ContractValueInfo, Option<&'a Context>) {
    let address = to_checksum_address(address_bytes);
    let raw_address = to_hex_string(address_bytes);

    let code = match info.state.code(address_bytes).await {
        Some(code) => code,
        None => {
            trace!(%address, "Could not fetch contract code");
            Vec::new()
        }
    };
    match info.contexts.find_context(&code) {
        Some(context) => {
            trace!(%address, contract = %context.contract_name, "Recognised contract code");
            let class = context.contract_type();
            let contract = ContractValueInfo::Known {
                address,
                raw_address,
                class,
            };
            (contract, Some(context))
        }
        None => {
            trace!(%address, code_length = code.len(), "Unrecognised contract code");
            let contract = ContractValueInfo::Unknown {
                address,
                raw_address,
            };
            (contract, None)
        }
    }
}

#[cfg(test)]
mod test {
    use futures::executor::block_on;

    use crate::{
        context::{Context, Contexts},
        decoder::contract::{resolve_contract, resolve_external_function},
        error::read,
        evm::EvmInfo,
        pointer::{DataPointer, Location},
        read::{ByteSource, MachineState},
        types::UserDefinedTypes,
        value::{ContractValueInfo, FunctionExternalValueInfo},
    };

    /// A source that can never fetch code.
    struct Offline;

    impl ByteSource for Offline {
        async fn read(&self, _: &DataPointer) -> read::Result<Vec<u8>> {
            Err(read::Error::Unavailable {
                location: Location::Code,
            })
        }

        async fn code(&self, _: &[u8]) -> Option<Vec<u8>> {
            None
        }
    }

    #[test]
    fn resolves_known_and_unknown_contracts() {
        let code = vec![0x60, 0x80, 0x60, 0x40, 0x52];
        let state = MachineState::new().with_account_code([0x42; 20], code.clone());
        let types = UserDefinedTypes::new();
        let contexts = Contexts::new().with(Context::new("Vault", code));
        let current = Context::new("Caller", vec![0x00]);
        let info = EvmInfo::new(&state, &types, &contexts, &current);

        let known = block_on(resolve_contract(&[0x42; 20], &info));
        assert!(matches!(
            &known,
            ContractValueInfo::Known { class, .. } if class.type_name == "Vault"
        ));

        let unknown = block_on(resolve_contract(&[0x43; 20], &info));
        assert!(matches!(unknown, ContractValueInfo::Unknown { .. }));
    }

    #[test]
    fn failed_code_fetches_resolve_to_unknown_contracts() {
        let types = UserDefinedTypes::new();
        let contexts = Contexts::new().with(Context::new("Vault", vec![0x60, 0x80]));
        let current = Context::new("Caller", vec![0x00]);
        let info = EvmInfo::new(&Offline, &types, &contexts, &current);

        let contract = block_on(resolve_contract(&[0x42; 20], &info));
        let ContractValueInfo::Unknown { raw_address, .. } = contract else {
            panic!("Expected an unknown contract");
        };
        assert_eq!(raw_address, format!("0x{}", "42".repeat(20)));
    }

    #[test]
    fn unknown_contracts_short_circuit_function_lookup() {
        let state = MachineState::new();
        let types = UserDefinedTypes::new();
        let contexts = Contexts::new();
        let current = Context::new("Caller", vec![0x00]);
        let info = EvmInfo::new(&state, &types, &contexts, &current);

        let function = block_on(resolve_external_function(
            &[0x01; 20],
            &[0xa9, 0x05, 0x9c, 0xbb],
            &info,
        ));
        let FunctionExternalValueInfo::Unknown { selector, .. } = function else {
            panic!("Expected an unknown function");
        };
        assert_eq!(selector, "0xa9059cbb");
    }
}
