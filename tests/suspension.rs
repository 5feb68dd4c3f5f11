//! This module is an integration test that checks the decoder suspends at
//! exactly the points where it needs data, and resumes correctly afterwards.
#![cfg(test)]

use std::{
    cell::Cell,
    future::Future,
    pin::Pin,
    task::{Context as TaskContext, Poll},
};

use evm_value_decoder::{
    context::{Context, Contexts},
    decode,
    error::read,
    evm::EvmInfo,
    pointer::{DataPointer, Location},
    read::{ByteSource, MachineState},
    types::{ContractType, Type, UserDefinedTypes, UserDefinedValueType},
    DecodeOptions,
    DecodedResult,
};
use futures::{task::noop_waker_ref, FutureExt};

mod common;

use common::left_padded;

/// A future that is pending the first time it is polled.
#[derive(Default)]
struct YieldOnce {
    yielded: bool,
}

impl Future for YieldOnce {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut TaskContext<'_>) -> Poll<()> {
        if self.yielded {
            Poll::Ready(())
        } else {
            self.yielded = true;
            cx.waker().wake_by_ref();
            Poll::Pending
        }
    }
}

/// A byte source that makes the decoder wait for every request, as a source
/// backed by a node would.
struct SlowSource {
    inner:    MachineState,
    requests: Cell<usize>,
}

impl ByteSource for SlowSource {
    async fn read(&self, pointer: &DataPointer) -> read::Result<Vec<u8>> {
        self.requests.set(self.requests.get() + 1);
        YieldOnce::default().await;
        self.inner.read(pointer).await
    }

    async fn code(&self, address: &[u8]) -> Option<Vec<u8>> {
        self.requests.set(self.requests.get() + 1);
        YieldOnce::default().await;
        self.inner.code(address).await
    }
}

/// Polls `future` to completion, counting the number of times it suspends.
fn drive<F: Future + Unpin>(mut future: F) -> (F::Output, usize) {
    let mut cx = TaskContext::from_waker(noop_waker_ref());
    let mut suspensions = 0;
    loop {
        match future.poll_unpin(&mut cx) {
            Poll::Ready(output) => return (output, suspensions),
            Poll::Pending => suspensions += 1,
        }
    }
}

#[test]
fn suspends_once_to_read_bytes() -> anyhow::Result<()> {
    let source = SlowSource {
        inner:    MachineState::new().with_bytes(Location::Memory, left_padded(&[0x01])),
        requests: Cell::new(0),
    };
    let types = UserDefinedTypes::new();
    let contexts = Contexts::new();
    let current = Context::new("Current", vec![0xfe]);
    let info = EvmInfo::new(&source, &types, &contexts, &current);

    let pointer = DataPointer::word(Location::Memory, 0);
    let (result, suspensions) = drive(decode(&Type::Bool, &pointer, &info, DecodeOptions::default()));

    assert_eq!(result?.to_string(), "true");
    assert_eq!(suspensions, 1);
    assert_eq!(source.requests.get(), 1);

    Ok(())
}

#[test]
fn suspends_again_to_fetch_code() -> anyhow::Result<()> {
    let address = [0x33; 20];
    let code = vec![0x60, 0x00, 0xf3];
    let source = SlowSource {
        inner:    MachineState::new()
            .with_bytes(Location::Memory, left_padded(&address))
            .with_account_code(address, code.clone()),
        requests: Cell::new(0),
    };
    let types = UserDefinedTypes::new();
    let contexts = Contexts::new().with(Context::new("Target", code));
    let current = Context::new("Current", vec![0xfe]);
    let info = EvmInfo::new(&source, &types, &contexts, &current);

    let ty = Type::Contract(ContractType::foreign("Target"));
    let pointer = DataPointer::word(Location::Memory, 0);
    let (result, suspensions) = drive(decode(&ty, &pointer, &info, DecodeOptions::default()));

    assert!(result?.to_string().starts_with("Target(0x"));
    assert_eq!(suspensions, 2);
    assert_eq!(source.requests.get(), 2);

    Ok(())
}

#[test]
fn user_defined_value_types_add_no_suspensions() -> anyhow::Result<()> {
    let source = SlowSource {
        inner:    MachineState::new().with_bytes(Location::Memory, left_padded(&[0x09])),
        requests: Cell::new(0),
    };
    let amount = UserDefinedValueType::reference("3", "Amount");
    let types = UserDefinedTypes::new().with(Type::UserDefinedValueType(
        amount.clone().with_underlying(Type::Uint { bits: 32 }),
    ));
    let contexts = Contexts::new();
    let current = Context::new("Current", vec![0xfe]);
    let info = EvmInfo::new(&source, &types, &contexts, &current);

    let ty = Type::UserDefinedValueType(amount);
    let pointer = DataPointer::word(Location::Memory, 0);
    let (result, suspensions) = drive(decode(&ty, &pointer, &info, DecodeOptions::default()));

    assert!(result?.is_value());
    assert_eq!(suspensions, 1);

    Ok(())
}

#[test]
fn missing_definitions_never_suspend() {
    let source = SlowSource {
        inner:    MachineState::new(),
        requests: Cell::new(0),
    };
    let types = UserDefinedTypes::new();
    let contexts = Contexts::new();
    let current = Context::new("Current", vec![0xfe]);
    let info = EvmInfo::new(&source, &types, &contexts, &current);

    let ty = Type::UserDefinedValueType(UserDefinedValueType::reference("3", "Amount"));
    let pointer = DataPointer::word(Location::Memory, 0);
    let (result, suspensions) = drive(decode(&ty, &pointer, &info, DecodeOptions::default()));

    assert!(matches!(result, Ok(DecodedResult::Error(_))));
    assert_eq!(suspensions, 0);
    assert_eq!(source.requests.get(), 0);
}
