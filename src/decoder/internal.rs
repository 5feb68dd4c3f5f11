//! This module resolves internal function pointers against the internal
//! functions table of the executing contract.
//!
//! Resolution is pure and never suspends. The conditions are checked in a
//! fixed order, and an earlier condition always pre-empts a later one:
//!
//! 1. Without a table, the pointer is [`FunctionInternalValueInfo::Unknown`].
//! 2. A pointer with both program counters zero was never assigned, and so is
//!    an [`FunctionInternalValueInfo::Exception`].
//! 3. A zero deployed PC with a non-zero constructor PC is malformed.
//! 4. A pointer with no constructor PC cannot be used inside a constructor.
//! 5. Otherwise the PC for the current phase is looked up in the table.

use tracing::trace;

use crate::{
    context::Context,
    error::decoding::DecodingError,
    evm::{InternalFunctionEntry, InternalFunctionsTable},
    value::FunctionInternalValueInfo,
};

/// Resolves the internal function pointer made up of `deployed_pc` and
/// `constructor_pc` within `context`.
///
/// # Errors
///
/// Returns [`Err`] if the pointer is malformed, if it is only valid in
/// deployed code but is being used in a constructor, or if there is no
/// function at the relevant PC.
pub fn resolve_internal_function(
    context: &Context,
    table: Option<&InternalFunctionsTable>,
    deployed_pc: u64,
    constructor_pc: u64,
) -> Result<FunctionInternalValueInfo, DecodingError> {
    let context_type = context.contract_type();

    let Some(table) = table else {
        trace!(deployed_pc, constructor_pc, "No internal functions table is available");
        return Ok(FunctionInternalValueInfo::Unknown {
            context:                     context_type,
            deployed_program_counter:    deployed_pc,
            constructor_program_counter: constructor_pc,
        });
    };

    let exception = |context| FunctionInternalValueInfo::Exception {
        context,
        deployed_program_counter: deployed_pc,
        constructor_program_counter: constructor_pc,
    };

    if deployed_pc == 0 && constructor_pc == 0 {
        return Ok(exception(context_type));
    }

    if deployed_pc == 0 {
        return Err(DecodingError::MalformedInternalFunction {
            context:                     context_type,
            deployed_program_counter:    deployed_pc,
            constructor_program_counter: constructor_pc,
        });
    }

    if context.is_constructor && constructor_pc == 0 {
        return Err(DecodingError::DeployedFunctionInConstructor {
            context:                     context_type,
            deployed_program_counter:    deployed_pc,
            constructor_program_counter: constructor_pc,
        });
    }

    let pc = if context.is_constructor {
        constructor_pc
    } else {
        deployed_pc
    };

    match table.get(&pc) {
        None => Err(DecodingError::NoSuchInternalFunction {
            context:                     context_type,
            deployed_program_counter:    deployed_pc,
            constructor_program_counter: constructor_pc,
        }),
        Some(InternalFunctionEntry::DesignatedInvalid) => Ok(exception(context_type)),
        Some(InternalFunctionEntry::Function(function)) => {
            trace!(pc, name = %function.name, "Resolved internal function");
            Ok(FunctionInternalValueInfo::Function {
                context:                     context_type,
                deployed_program_counter:    deployed_pc,
                constructor_program_counter: constructor_pc,
                name:                        function.name.clone(),
                id:                          function.type_id(),
                defined_in:                  function.defining_contract(),
                mutability:                  function.mutability,
            })
        }
    }
}
