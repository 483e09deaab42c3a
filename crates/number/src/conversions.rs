//! Conversion utilities.

use {alloy::primitives::U256, num::BigUint};

pub fn big_uint_to_u256(i: &BigUint) -> Option<U256> {
    let bytes = i.to_bytes_be();
    if bytes.len() > 32 {
        return None;
    }
    U256::try_from_be_slice(&bytes)
}

pub fn u256_to_big_uint(i: &U256) -> BigUint {
    BigUint::from_bytes_be(&i.to_be_bytes::<32>())
}
