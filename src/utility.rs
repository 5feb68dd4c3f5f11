//! Utility functions useful throughout the codebase.
//!
//! These cover the conversions between raw big-endian byte buffers and the
//! representations that decoded values are expressed in.

use ethnum::{I256, U256};
use sha3::{Digest, Keccak256};

use crate::{
    constant::{ADDRESS_SIZE_BYTES, WORD_SIZE_BYTES},
    error::{Error, Result},
};

/// Computes the Keccak-256 hash of `bytes`.
#[must_use]
pub fn keccak256(bytes: &[u8]) -> [u8; 32] {
    Keccak256::digest(bytes).into()
}

/// Formats `bytes` as a lowercase, `0x`-prefixed, hexadecimal string.
#[must_use]
pub fn to_hex_string(bytes: &[u8]) -> String {
    let mut value = String::from("0x");
    value.push_str(&hex::encode(bytes));
    value
}

/// Gets the bytes from the provided hex-encoded string `data`.
///
/// This hex-encoded string may or may not start with the `0x` prefix. Both
/// cases will be handled.
///
/// # Errors
///
/// Returns [`Err`] if `data` is not valid hex.
pub fn bytes_from_hex(data: &str) -> Result<Vec<u8>> {
    let no_0x_prefix = data.strip_prefix("0x").unwrap_or(data);
    hex::decode(no_0x_prefix).map_err(|e| Error::other(format!("Could not decode hex: {e}")))
}

/// Interprets `bytes` as a big-endian unsigned integer.
///
/// Only the last 32 bytes are considered if more are provided, and an empty
/// buffer is zero.
#[must_use]
pub fn bytes_to_u256(bytes: &[u8]) -> U256 {
    U256::from_be_bytes(to_word(bytes, 0x00))
}

/// Interprets `bytes` as a big-endian two's-complement signed integer, with
/// the sign given by the high bit of the first byte.
///
/// Only the last 32 bytes are considered if more are provided, and an empty
/// buffer is zero.
#[must_use]
pub fn bytes_to_i256(bytes: &[u8]) -> I256 {
    let fill = match bytes.first() {
        Some(first) if first & 0x80 != 0 => 0xff,
        _ => 0x00,
    };
    I256::from_be_bytes(to_word(bytes, fill))
}

/// Interprets `bytes` as a program counter.
///
/// Program counters are small in practice, so a value that does not fit into
/// a [`u64`] saturates.
#[must_use]
pub fn bytes_to_pc(bytes: &[u8]) -> u64 {
    let value = bytes_to_u256(bytes);
    if value > U256::from(u64::MAX) {
        u64::MAX
    } else {
        value.as_u64()
    }
}

/// Right-aligns `bytes` into a word, filling the remainder with `fill`.
fn to_word(bytes: &[u8], fill: u8) -> [u8; WORD_SIZE_BYTES] {
    let bytes = &bytes[bytes.len().saturating_sub(WORD_SIZE_BYTES)..];
    let mut word = [fill; WORD_SIZE_BYTES];
    word[WORD_SIZE_BYTES - bytes.len()..].copy_from_slice(bytes);
    word
}

/// Formats `bytes` as an [EIP-55](https://eips.ethereum.org/EIPS/eip-55)
/// checksummed address.
///
/// Buffers longer than an address are truncated to their last 20 bytes, and
/// shorter ones are left-padded with zeroes.
#[must_use]
pub fn to_checksum_address(bytes: &[u8]) -> String {
    let bytes = &bytes[bytes.len().saturating_sub(ADDRESS_SIZE_BYTES)..];
    let mut address = vec![0x00; ADDRESS_SIZE_BYTES - bytes.len()];
    address.extend_from_slice(bytes);

    let lowercase = hex::encode(&address);
    let hash = keccak256(lowercase.as_bytes());

    let mut checksummed = String::from("0x");
    for (i, c) in lowercase.chars().enumerate() {
        // Each hex character is checked against the corresponding nibble of
        // the hash
        let nibble = if i % 2 == 0 {
            hash[i / 2] >> 4
        } else {
            hash[i / 2] & 0x0f
        };
        if nibble >= 8 {
            checksummed.push(c.to_ascii_uppercase());
        } else {
            checksummed.push(c);
        }
    }

    checksummed
}

/// Constructs the globally-unique id for a definition with the local `id`
/// from the compilation `compilation_id`.
#[must_use]
pub fn make_type_id(id: &str, compilation_id: Option<&str>) -> String {
    match compilation_id {
        Some(compilation) => format!("{compilation}:{id}"),
        None => id.to_string(),
    }
}

#[cfg(test)]
mod test {
    use ethnum::{I256, U256};

    use crate::utility::{
        bytes_from_hex,
        bytes_to_i256,
        bytes_to_pc,
        bytes_to_u256,
        make_type_id,
        to_checksum_address,
        to_hex_string,
    };

    #[test]
    fn converts_unsigned_integers() {
        assert_eq!(bytes_to_u256(&[]), U256::ZERO);
        assert_eq!(bytes_to_u256(&[0x01, 0x00]), U256::new(256));
        assert_eq!(bytes_to_u256(&[0xff; 32]), U256::MAX);
    }

    #[test]
    fn converts_signed_integers() {
        assert_eq!(bytes_to_i256(&[0xff]), I256::new(-1));
        assert_eq!(bytes_to_i256(&[0x80]), I256::new(-128));
        assert_eq!(bytes_to_i256(&[0x7f]), I256::new(127));
        assert_eq!(bytes_to_i256(&[0x00, 0x80]), I256::new(128));
        assert_eq!(bytes_to_i256(&[0xff; 32]), I256::new(-1));
    }

    #[test]
    fn converts_program_counters() {
        assert_eq!(bytes_to_pc(&[0x00, 0x00, 0x01, 0x2c]), 300);
        assert_eq!(bytes_to_pc(&[0xff; 16]), u64::MAX);
    }

    #[test]
    fn checksums_addresses() -> anyhow::Result<()> {
        // Test vectors from EIP-55
        for expected in [
            "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed",
            "0xfB6916095ca1df60bB79Ce92cE3Ea74c37c5d359",
            "0xdbF03B407c01E7cD3CBea99509d93f8DDDC8C6FB",
            "0xD1220A0cf47c7B9Be7A2E6BA89F429762e7b9aDb",
        ] {
            let bytes = bytes_from_hex(&expected.to_lowercase())?;
            assert_eq!(to_checksum_address(&bytes), expected);
        }

        Ok(())
    }

    #[test]
    fn normalizes_address_length() {
        let mut word = vec![0x00; 12];
        word.extend_from_slice(&[0x11; 20]);
        assert_eq!(to_checksum_address(&word), to_checksum_address(&[0x11; 20]));
        assert_eq!(
            to_checksum_address(&[0x01]),
            "0x0000000000000000000000000000000000000001"
        );
    }

    #[test]
    fn formats_hex_and_ids() {
        assert_eq!(to_hex_string(&[0xab, 0x01]), "0xab01");
        assert_eq!(to_hex_string(&[]), "0x");
        assert_eq!(make_type_id("7", Some("shimmer")), "shimmer:7");
        assert_eq!(make_type_id("7", None), "7");
        assert!(bytes_from_hex("0xzz").is_err());
    }
}
