use num_bigint::BigUint;

/// Fixed-width big-endian form of an amount. The value must already be
/// below the field modulus, so it always fits in 32 bytes.
pub fn big_uint_to_be_bytes32(value: &BigUint) -> [u8; 32] {
    let bytes = value.to_bytes_be();
    let mut out = [0u8; 32];
    out[32 - bytes.len()..].copy_from_slice(&bytes);
    out
}
