//! This module contains the padding policy for statically-sized values.
//!
//! Every basic value occupies some number of significant bytes within a
//! (usually word-sized) buffer. Which side of the buffer holds the padding,
//! and what that padding must look like, depends on both the type being
//! decoded and the [`PaddingMode`] requested by the caller.
//!
//! The functions here are pure and never suspend.

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::types::{Type, Visibility};

/// How strictly, and in which style, the decoder checks padding.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum PaddingMode {
    /// Each type is checked against its usual ABI padding.
    #[default]
    Default,

    /// Every type is expected to be right-padded.
    Right,

    /// Like [`Self::Default`], but signed types must be zero-padded instead
    /// of sign-extended.
    Zero,

    /// Like [`Self::Default`], but signed types may be either sign-extended
    /// or zero-padded.
    DefaultOrZero,

    /// Like [`Self::Default`], except that only `bool`, `enum` and `function`
    /// values are actually checked.
    Permissive,
}

/// The padding discipline that a specific buffer is checked against.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum PaddingType {
    /// Zero bytes precede the significant bytes.
    Left,

    /// Zero bytes follow the significant bytes.
    Right,

    /// The significant bytes are preceded by their sign extension.
    Signed,

    /// Either [`Self::Signed`] or [`Self::Left`] is acceptable.
    SignedOrLeft,
}

impl Display for PaddingType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Left => "left",
            Self::Right => "right",
            Self::Signed => "signed",
            Self::SignedOrLeft => "signedOrLeft",
        };
        write!(f, "{name}")
    }
}

/// Gets the padding discipline that `ty` uses when no mode overrides it.
#[must_use]
pub fn default_padding_type(ty: &Type) -> PaddingType {
    match ty {
        Type::Bytes { .. } => PaddingType::Right,
        Type::Int { .. } | Type::Fixed { .. } => PaddingType::Signed,
        Type::Function(function) if function.visibility == Visibility::External => {
            PaddingType::Right
        }
        _ => PaddingType::Left,
    }
}

/// Gets the padding discipline that applies to `ty` under `mode`.
#[must_use]
pub fn padding_type_for(ty: &Type, mode: PaddingMode) -> PaddingType {
    let default = default_padding_type(ty);
    match mode {
        PaddingMode::Right => PaddingType::Right,
        PaddingMode::Default | PaddingMode::Permissive => default,
        PaddingMode::Zero => match default {
            PaddingType::Signed => PaddingType::Left,
            other => other,
        },
        PaddingMode::DefaultOrZero => match default {
            PaddingType::Signed => PaddingType::SignedOrLeft,
            other => other,
        },
    }
}

/// Checks whether `mode` requires the padding of `ty` to be validated at all.
///
/// Permissive mode still checks the types for which a bad encoding cannot be
/// coerced into a sensible value.
#[must_use]
pub fn is_checked(ty: &Type, mode: PaddingMode) -> bool {
    match mode {
        PaddingMode::Permissive => matches!(
            ty,
            Type::Bool | Type::Enum(_) | Type::Function(_)
        ),
        _ => true,
    }
}

/// Checks `bytes` against `ty`'s padding under `mode`, where the value has
/// `length` significant bytes.
#[must_use]
pub fn check_padding(bytes: &[u8], length: usize, ty: &Type, mode: PaddingMode) -> bool {
    if !is_checked(ty, mode) {
        return true;
    }

    validate(bytes, length, padding_type_for(ty, mode))
}

/// Validates that `bytes` carries `length` significant bytes padded according
/// to `padding`.
#[must_use]
pub fn validate(bytes: &[u8], length: usize, padding: PaddingType) -> bool {
    match padding {
        PaddingType::Left => check_left(bytes, length),
        PaddingType::Right => check_right(bytes, length),
        PaddingType::Signed => check_signed(bytes, length),
        PaddingType::SignedOrLeft => check_signed(bytes, length) || check_left(bytes, length),
    }
}

/// Strips the padding from `bytes`, leaving the `length` significant bytes.
///
/// If `bytes` is shorter than `length` it is returned whole.
#[must_use]
pub fn strip(bytes: &[u8], length: usize, padding: PaddingType) -> &[u8] {
    let length = length.min(bytes.len());
    match padding {
        PaddingType::Right => &bytes[..length],
        _ => &bytes[bytes.len() - length..],
    }
}

/// Pads the `significant` bytes out to `total` bytes according to `padding`.
///
/// Signed padding sign-extends based on the high bit of the first significant
/// byte. If `significant` is already at least `total` bytes long it is
/// returned unchanged.
#[must_use]
pub fn pad(significant: &[u8], total: usize, padding: PaddingType) -> Vec<u8> {
    let padding_len = total.saturating_sub(significant.len());
    match padding {
        PaddingType::Right => {
            let mut result = significant.to_vec();
            result.resize(significant.len() + padding_len, 0x00);
            result
        }
        PaddingType::Left => [vec![0x00; padding_len], significant.to_vec()].concat(),
        PaddingType::Signed | PaddingType::SignedOrLeft => {
            let fill = sign_byte(significant);
            [vec![fill; padding_len], significant.to_vec()].concat()
        }
    }
}

/// Splits `bytes` into its padding and its value, assuming the value sits at
/// the right of the buffer.
fn split_right_aligned(bytes: &[u8], length: usize) -> (&[u8], &[u8]) {
    bytes.split_at(bytes.len().saturating_sub(length))
}

fn check_left(bytes: &[u8], length: usize) -> bool {
    let (padding, _) = split_right_aligned(bytes, length);
    padding.iter().all(|b| *b == 0x00)
}

fn check_right(bytes: &[u8], length: usize) -> bool {
    let padding = bytes.get(length..).unwrap_or_default();
    padding.iter().all(|b| *b == 0x00)
}

fn check_signed(bytes: &[u8], length: usize) -> bool {
    let (padding, value) = split_right_aligned(bytes, length);
    let fill = sign_byte(value);
    padding.iter().all(|b| *b == fill)
}

/// Gets the byte that sign-extends `value`.
fn sign_byte(value: &[u8]) -> u8 {
    match value.first() {
        Some(first) if first & 0x80 != 0 => 0xff,
        _ => 0x00,
    }
}

#[cfg(test)]
mod test {
    use crate::{
        padding::{
            check_padding,
            pad,
            padding_type_for,
            strip,
            validate,
            PaddingMode,
            PaddingType,
        },
        types::{FunctionType, Type, Visibility},
    };

    fn word_with_tail(tail: &[u8], fill: u8) -> Vec<u8> {
        let mut word = vec![fill; 32 - tail.len()];
        word.extend_from_slice(tail);
        word
    }

    #[test]
    fn picks_default_disciplines_by_type() {
        let mode = PaddingMode::Default;
        assert_eq!(padding_type_for(&Type::Bool, mode), PaddingType::Left);
        assert_eq!(
            padding_type_for(&Type::Uint { bits: 8 }, mode),
            PaddingType::Left
        );
        assert_eq!(
            padding_type_for(&Type::Int { bits: 8 }, mode),
            PaddingType::Signed
        );
        assert_eq!(
            padding_type_for(&Type::Bytes { length: 4 }, mode),
            PaddingType::Right
        );
        assert_eq!(
            padding_type_for(
                &Type::Function(FunctionType::new(Visibility::External)),
                mode
            ),
            PaddingType::Right
        );
        assert_eq!(
            padding_type_for(
                &Type::Function(FunctionType::new(Visibility::Internal)),
                mode
            ),
            PaddingType::Left
        );
        assert_eq!(
            padding_type_for(
                &Type::Ufixed {
                    bits:   128,
                    places: 18,
                },
                mode
            ),
            PaddingType::Left
        );
    }

    #[test]
    fn modes_override_signed_padding() {
        let int = Type::Int { bits: 16 };
        assert_eq!(padding_type_for(&int, PaddingMode::Zero), PaddingType::Left);
        assert_eq!(
            padding_type_for(&int, PaddingMode::DefaultOrZero),
            PaddingType::SignedOrLeft
        );
        assert_eq!(
            padding_type_for(&int, PaddingMode::Right),
            PaddingType::Right
        );
        assert_eq!(
            padding_type_for(&Type::Bool, PaddingMode::Zero),
            PaddingType::Left
        );
        assert_eq!(
            padding_type_for(&Type::Bool, PaddingMode::Right),
            PaddingType::Right
        );
    }

    #[test]
    fn validates_left_padding() {
        let good = word_with_tail(&[0x12, 0x34], 0x00);
        let mut bad = good.clone();
        bad[0] = 0x01;

        assert!(validate(&good, 2, PaddingType::Left));
        assert!(!validate(&bad, 2, PaddingType::Left));
    }

    #[test]
    fn validates_right_padding() {
        let mut good = vec![0x00; 32];
        good[0] = 0xab;
        good[1] = 0xcd;
        let mut bad = good.clone();
        bad[31] = 0x01;

        assert!(validate(&good, 2, PaddingType::Right));
        assert!(!validate(&bad, 2, PaddingType::Right));
    }

    #[test]
    fn validates_signed_padding() {
        let negative = word_with_tail(&[0x80], 0xff);
        let positive = word_with_tail(&[0x7f], 0x00);
        let zero_padded_negative = word_with_tail(&[0x80], 0x00);
        let ones_padded_positive = word_with_tail(&[0x7f], 0xff);

        assert!(validate(&negative, 1, PaddingType::Signed));
        assert!(validate(&positive, 1, PaddingType::Signed));
        assert!(!validate(&zero_padded_negative, 1, PaddingType::Signed));
        assert!(!validate(&ones_padded_positive, 1, PaddingType::Signed));

        // Signed-or-left additionally accepts a zero-padded negative
        assert!(validate(&zero_padded_negative, 1, PaddingType::SignedOrLeft));
        assert!(!validate(&ones_padded_positive, 1, PaddingType::SignedOrLeft));
    }

    #[test]
    fn permissive_mode_only_checks_some_types() {
        let bad = word_with_tail(&[0x01], 0x01);

        assert!(check_padding(
            &bad,
            1,
            &Type::Uint { bits: 8 },
            PaddingMode::Permissive
        ));
        assert!(!check_padding(&bad, 1, &Type::Bool, PaddingMode::Permissive));
        assert!(!check_padding(
            &bad,
            8,
            &Type::Function(FunctionType::new(Visibility::Internal)),
            PaddingMode::Permissive
        ));
        assert!(!check_padding(
            &bad,
            1,
            &Type::Uint { bits: 8 },
            PaddingMode::Default
        ));
    }

    #[test]
    fn strips_from_the_correct_side() {
        let word = [0x01, 0x02, 0x03, 0x04];

        assert_eq!(strip(&word, 2, PaddingType::Right), &[0x01, 0x02]);
        assert_eq!(strip(&word, 2, PaddingType::Left), &[0x03, 0x04]);
        assert_eq!(strip(&word, 2, PaddingType::Signed), &[0x03, 0x04]);
        assert_eq!(strip(&word, 2, PaddingType::SignedOrLeft), &[0x03, 0x04]);
        assert_eq!(strip(&word, 8, PaddingType::Left), &word);
    }

    #[test]
    fn pads_to_a_valid_buffer() {
        let padded = pad(&[0xff, 0x00], 32, PaddingType::Signed);
        assert_eq!(padded.len(), 32);
        assert!(padded[..30].iter().all(|b| *b == 0xff));
        assert!(validate(&padded, 2, PaddingType::Signed));

        let padded = pad(&[0xab], 4, PaddingType::Right);
        assert_eq!(padded, vec![0xab, 0x00, 0x00, 0x00]);
    }

    #[test]
    fn handles_empty_buffers() {
        assert!(validate(&[], 4, PaddingType::Signed));
        assert!(validate(&[], 4, PaddingType::Right));
        assert!(strip(&[], 4, PaddingType::Left).is_empty());
    }
}
