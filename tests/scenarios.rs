//! This module is an integration test that checks the decoder end-to-end on
//! the canonical decoding scenarios.
#![cfg(test)]

use ethnum::{I256, U256};
use evm_value_decoder::{
    context::{AbiParameter, Context, FunctionAbiEntry},
    types::{EnumType, FunctionType, Mutability, Type, Visibility},
    value::{ContractValueInfo, FunctionExternalValueInfo, Value},
    DecodeOptions,
};

mod common;

use common::{left_padded, right_padded, strict, Fixture};

#[test]
fn decodes_a_small_uint() -> anyhow::Result<()> {
    let fixture = Fixture::new().with_word(left_padded(&[0x07]));
    let result = fixture.decode(&"uint8".parse()?, DecodeOptions::default())?;

    let value = result.value().map(|v| &v.value);
    assert_eq!(
        value,
        Some(&Value::Uint {
            as_bn:     U256::new(7),
            raw_as_bn: U256::new(7),
        })
    );

    let json = serde_json::to_value(&result)?;
    assert_eq!(json["kind"], "value");
    assert_eq!(json["value"]["asBN"], "7");
    assert_eq!(json["value"]["rawAsBN"], "7");

    Ok(())
}

#[test]
fn embeds_out_of_range_bools() -> anyhow::Result<()> {
    let fixture = Fixture::new().with_word(left_padded(&[0x02]));
    let result = fixture.decode(&Type::Bool, DecodeOptions::default())?;

    let json = serde_json::to_value(&result)?;
    assert_eq!(json["kind"], "error");
    assert_eq!(json["error"]["kind"], "BoolOutOfRangeError");
    assert_eq!(json["error"]["rawAsBN"], "2");

    Ok(())
}

#[test]
fn decodes_negative_one() -> anyhow::Result<()> {
    let fixture = Fixture::new().with_word([0xff; 32]);
    let result = fixture.decode(&"int8".parse()?, DecodeOptions::default())?;

    let value = result.value().map(|v| &v.value);
    assert_eq!(
        value,
        Some(&Value::Int {
            as_bn:     I256::new(-1),
            raw_as_bn: I256::new(-1),
        })
    );
    assert_eq!(result.to_string(), "-1");

    Ok(())
}

#[test]
fn stops_on_out_of_range_enums_without_retry() {
    let colour = EnumType::reference("1", "Colour").with_options(["Red", "Green", "Blue"]);
    let fixture = Fixture::new().with_word(left_padded(&[0x05]));

    let result = fixture.decode(&Type::Enum(colour), strict());

    let Err(stop) = result else {
        panic!("Expected decoding to stop");
    };
    assert_eq!(stop.error.kind(), "EnumOutOfRangeError");
    assert!(!stop.is_retryable());
}

#[test]
fn finds_invalid_selectors_on_known_contracts() -> anyhow::Result<()> {
    let address = [0x5a; 20];
    let token = Context::new("Token", vec![0x60, 0x80, 0x60, 0x40, 0x52]).with_function(
        FunctionAbiEntry::new(
            "transfer",
            vec![
                AbiParameter::new("to", "address"),
                AbiParameter::new("amount", "uint256"),
            ],
            Mutability::Nonpayable,
        ),
    );

    let mut pointer = address.to_vec();
    pointer.extend_from_slice(&[0xde, 0xad, 0xbe, 0xef]);
    let fixture = Fixture::new()
        .with_deployed(address, token)
        .with_word(right_padded(&pointer));

    let ty = Type::Function(FunctionType::new(Visibility::External));
    let result = fixture.decode(&ty, DecodeOptions::default())?;

    let Some(Value::FunctionExternal(function)) = result.value().map(|v| &v.value) else {
        anyhow::bail!("Expected an external function value");
    };
    let FunctionExternalValueInfo::Invalid { contract, selector } = function else {
        anyhow::bail!("Expected an invalid selector");
    };
    assert_eq!(selector, "0xdeadbeef");
    assert!(matches!(
        contract,
        ContractValueInfo::Known { class, .. } if class.type_name == "Token"
    ));

    let json = serde_json::to_value(function)?;
    assert_eq!(json["kind"], "invalid");
    assert_eq!(json["contract"]["kind"], "known");
    assert_eq!(json["selector"], "0xdeadbeef");

    Ok(())
}
