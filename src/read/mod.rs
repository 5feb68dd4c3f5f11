//! This module contains the interface through which the decoder obtains raw
//! bytes.
//!
//! # Suspension
//!
//! Both operations of a [`ByteSource`] are asynchronous. The decoder awaits
//! them, so any byte source that needs to fetch data (from a node, from a
//! cache, or from a runner driving a debugger) suspends the decode until the
//! data arrives. The decoder itself never decides how a request is satisfied.

pub mod state;

pub use state::MachineState;

use crate::{error::read::Result, pointer::DataPointer};

/// The interface to the subsystem that turns pointers into bytes.
///
/// Implementations own (or borrow) whatever machine state they need to
/// interpret a [`DataPointer`].
#[allow(async_fn_in_trait)] // Decoding is single-threaded, so `Send` is not needed
pub trait ByteSource {
    /// Reads the raw bytes that `pointer` locates.
    ///
    /// # Errors
    ///
    /// Returns [`Err`] if the pointer is out of range for the data it points
    /// into, or if that data is not available.
    async fn read(&self, pointer: &DataPointer) -> Result<Vec<u8>>;

    /// Fetches the deployed code at `address`.
    ///
    /// Returns [`None`] if the code for the address cannot be obtained, which
    /// the decoder treats in the same way as an account with no code.
    async fn code(&self, address: &[u8]) -> Option<Vec<u8>>;
}
