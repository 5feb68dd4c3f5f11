//! This module computes how many significant bytes a value of a given type
//! occupies.

use crate::{
    constant::{
        ADDRESS_SIZE_BYTES,
        BOOL_SIZE_BYTES,
        BYTE_SIZE_BITS,
        EXTERNAL_FUNCTION_SIZE_BYTES,
        INTERNAL_FUNCTION_SIZE_BYTES,
    },
    types::{Type, UserDefinedTypes, Visibility},
};

/// Gets the number of significant bytes occupied by a value of type `ty`.
///
/// Returns [`None`] if `ty` is an enum or user-defined value type whose
/// definition cannot be found in `user_defined_types`.
#[must_use]
pub fn byte_length(ty: &Type, user_defined_types: &UserDefinedTypes) -> Option<usize> {
    let length = match ty {
        Type::Bool => BOOL_SIZE_BYTES,
        Type::Uint { bits }
        | Type::Int { bits }
        | Type::Fixed { bits, .. }
        | Type::Ufixed { bits, .. } => usize::from(*bits) / BYTE_SIZE_BITS,
        Type::Address { .. } | Type::Contract(_) => ADDRESS_SIZE_BYTES,
        Type::Bytes { length } => usize::from(*length),
        Type::Function(function) => match function.visibility {
            Visibility::External => EXTERNAL_FUNCTION_SIZE_BYTES,
            Visibility::Internal => INTERNAL_FUNCTION_SIZE_BYTES,
        },
        Type::Enum(enum_type) => {
            let options = user_defined_types.resolve_enum(enum_type)?.options?;
            enum_byte_width(options.len())
        }
        Type::UserDefinedValueType(udvt) => {
            let definition = user_defined_types.resolve_user_defined_value_type(udvt)?;
            byte_length(definition.underlying_type.as_deref()?, user_defined_types)?
        }
    };

    Some(length)
}

/// Gets the number of bytes needed to hold the index of any option in an enum
/// with `option_count` options.
///
/// This is `ceil(log2(option_count) / 8)`, but never less than one byte so
/// that even a single-option enum has its padding checked.
#[must_use]
pub fn enum_byte_width(option_count: usize) -> usize {
    // The largest index is `option_count - 1`, and the number of bits needed
    // to hold it is exactly `ceil(log2(option_count))`
    let max_index = option_count.saturating_sub(1);
    let bits_needed = (usize::BITS - max_index.leading_zeros()) as usize;

    bits_needed.div_ceil(BYTE_SIZE_BITS).max(1)
}
