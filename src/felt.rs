use std::fmt;
use std::sync::OnceLock;

use num_bigint::BigUint;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Hex digits of the field modulus, 2^251 + 17 * 2^192 + 1.
const MODULUS_HEX: &str = "800000000000011000000000000000000000000000000000000000000000001";

static MODULUS: OnceLock<BigUint> = OnceLock::new();

/// The field modulus every scalar in the protocol is reduced into.
pub fn modulus() -> &'static BigUint {
    MODULUS.get_or_init(|| BigUint::parse_bytes(MODULUS_HEX.as_bytes(), 16).unwrap())
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FeltError {
    #[error("empty hex string")]
    Empty,
    #[error("invalid hex digit in {0:?}")]
    InvalidHex(String),
    #[error("value does not fit in the field modulus")]
    OutOfRange,
}

/// An element of the prime field all hashes and identifiers live in.
///
/// The canonical text form is `0x` followed by minimal lowercase hex. The
/// transcript form pads the digit count to even length with one leading
/// zero nibble so it always decodes to whole bytes.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Felt(BigUint);

impl Felt {
    pub fn zero() -> Self {
        Felt(BigUint::from(0u8))
    }

    /// Parses a hex string, with or without a `0x` prefix. Leading zeros
    /// and uppercase digits are accepted; values at or above the modulus
    /// are rejected.
    pub fn from_hex(s: &str) -> Result<Self, FeltError> {
        let digits = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .unwrap_or(s);
        if digits.is_empty() {
            return Err(FeltError::Empty);
        }
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(FeltError::InvalidHex(s.to_string()));
        }
        let value = BigUint::parse_bytes(digits.as_bytes(), 16)
            .ok_or_else(|| FeltError::InvalidHex(s.to_string()))?;
        Self::from_biguint(value)
    }

    pub fn from_biguint(value: BigUint) -> Result<Self, FeltError> {
        if &value >= modulus() {
            return Err(FeltError::OutOfRange);
        }
        Ok(Felt(value))
    }

    /// Reduces an arbitrary big-endian byte string into the field.
    pub fn from_be_bytes_reduce(bytes: &[u8]) -> Self {
        Felt(BigUint::from_bytes_be(bytes) % modulus())
    }

    pub fn as_biguint(&self) -> &BigUint {
        &self.0
    }

    /// Canonical hex form: `0x` + minimal lowercase digits, `0x0` for zero.
    pub fn to_hex(&self) -> String {
        format!("0x{}", self.0.to_str_radix(16))
    }

    /// Transcript hex form: as `to_hex`, left-padded with one zero nibble
    /// when the natural digit count is odd.
    pub fn to_even_hex(&self) -> String {
        let digits = self.0.to_str_radix(16);
        if digits.len() % 2 == 0 {
            format!("0x{digits}")
        } else {
            format!("0x0{digits}")
        }
    }

    /// The bytes the transcript hex decodes to. This is the byte form fed
    /// to tree-level hashing, so it must match `to_even_hex` exactly.
    pub fn to_transcript_bytes(&self) -> Vec<u8> {
        let even = self.to_even_hex();
        hex::decode(&even[2..]).unwrap()
    }

    /// Fixed-width big-endian form used for record-field hashing.
    pub fn to_be_bytes32(&self) -> [u8; 32] {
        let bytes = self.0.to_bytes_be();
        let mut out = [0u8; 32];
        out[32 - bytes.len()..].copy_from_slice(&bytes);
        out
    }
}

impl From<u64> for Felt {
    fn from(value: u64) -> Self {
        Felt(BigUint::from(value))
    }
}

impl fmt::Display for Felt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for Felt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Felt({})", self.to_hex())
    }
}

impl Serialize for Felt {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_even_hex())
    }
}

impl<'de> Deserialize<'de> for Felt {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Felt::from_hex(&s).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_hex_round_trip() {
        let felt = Felt::from_hex("0x541bfd168a64acb7fc3331bec8226e672c786ed76f4585229941a95b9d4a60b")
            .unwrap();
        assert_eq!(Felt::from_hex(&felt.to_hex()).unwrap(), felt);
        assert_eq!(Felt::from_hex(&felt.to_even_hex()).unwrap(), felt);
    }

    #[test]
    fn test_parse_accepts_padding_and_case() {
        let plain = Felt::from_hex("abc").unwrap();
        assert_eq!(Felt::from_hex("0x0abc").unwrap(), plain);
        assert_eq!(Felt::from_hex("0x00000abc").unwrap(), plain);
        assert_eq!(Felt::from_hex("0xABC").unwrap(), plain);
        assert_eq!(plain.to_hex(), "0xabc");
    }

    #[test]
    fn test_even_hex_pads_odd_lengths() {
        let odd = Felt::from_hex("0xabc").unwrap();
        assert_eq!(odd.to_even_hex(), "0x0abc");
        assert_eq!(odd.to_transcript_bytes(), vec![0x0a, 0xbc]);

        let even = Felt::from_hex("0xabcd").unwrap();
        assert_eq!(even.to_even_hex(), "0xabcd");
        assert_eq!(even.to_transcript_bytes(), vec![0xab, 0xcd]);
    }

    #[test]
    fn test_zero_forms() {
        let zero = Felt::zero();
        assert_eq!(zero.to_hex(), "0x0");
        assert_eq!(zero.to_even_hex(), "0x00");
        assert_eq!(zero.to_transcript_bytes(), vec![0x00]);
    }

    #[test]
    fn test_rejects_out_of_range_and_garbage() {
        assert_eq!(Felt::from_hex(""), Err(FeltError::Empty));
        assert_eq!(Felt::from_hex("0x"), Err(FeltError::Empty));
        assert!(matches!(
            Felt::from_hex("0xnothex"),
            Err(FeltError::InvalidHex(_))
        ));
        assert_eq!(Felt::from_hex(MODULUS_HEX), Err(FeltError::OutOfRange));

        // One below the modulus is the largest representable element.
        let max = modulus() - BigUint::from(1u8);
        assert!(Felt::from_biguint(max).is_ok());
    }

    #[test]
    fn test_reduce_wraps_digest_sized_values() {
        let wide = [0xffu8; 32];
        let reduced = Felt::from_be_bytes_reduce(&wide);
        assert!(reduced.as_biguint() < modulus());
    }

    #[test]
    fn test_be_bytes32_left_pads() {
        let felt = Felt::from(0x1234u64);
        let bytes = felt.to_be_bytes32();
        assert_eq!(&bytes[..30], &[0u8; 30]);
        assert_eq!(&bytes[30..], &[0x12, 0x34]);
    }

    #[test]
    fn test_serde_uses_transcript_hex() {
        let felt = Felt::from_hex("0xabc").unwrap();
        let json = serde_json::to_string(&felt).unwrap();
        assert_eq!(json, "\"0x0abc\"");
        let back: Felt = serde_json::from_str(&json).unwrap();
        assert_eq!(back, felt);
    }
}
