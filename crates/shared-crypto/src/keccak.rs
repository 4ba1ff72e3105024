//! # Keccak-256 Hashing
//!
//! EVM-compatible hashing, distinct from the BLAKE3 hasher in [`crate::hashing`].
//! Used wherever a value must match the legacy keccak-based storage-layout
//! convention (slot hashing, event topics, selector derivation).

use sha3::{Digest, Keccak256};

/// Keccak-256 hash output (256-bit).
pub type Hash = [u8; 32];

/// Hash data with Keccak-256 (one-shot).
pub fn keccak256(data: &[u8]) -> Hash {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    let digest = hasher.finalize();
    let mut out = [0u8; 32];
    out.copy_from_slice(&digest);
    out
}

/// Hash the concatenation of several byte slices, as used by the storage
/// codec's `hash(key ∥ slot)` convention.
pub fn keccak256_concat(parts: &[&[u8]]) -> Hash {
    let mut hasher = Keccak256::new();
    for part in parts {
        hasher.update(part);
    }
    let digest = hasher.finalize();
    let mut out = [0u8; 32];
    out.copy_from_slice(&digest);
    out
}

/// First 4 bytes of `keccak256(signature)`, the ABI method selector.
pub fn selector(signature: &str) -> [u8; 4] {
    let hash = keccak256(signature.as_bytes());
    [hash[0], hash[1], hash[2], hash[3]]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keccak256_empty() {
        let hash = keccak256(&[]);
        assert_eq!(
            hex_encode(&hash),
            "c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a47"
        );
    }

    #[test]
    fn test_keccak256_concat_matches_manual() {
        let a = b"hello";
        let b = b"world";
        let concatenated = [a.as_slice(), b.as_slice()].concat();
        assert_eq!(keccak256_concat(&[a, b]), keccak256(&concatenated));
    }

    #[test]
    fn test_selector_is_stable() {
        let sel1 = selector("stake(bytes,string,string,string,string)");
        let sel2 = selector("stake(bytes,string,string,string,string)");
        assert_eq!(sel1, sel2);
    }

    fn hex_encode(bytes: &[u8]) -> String {
        bytes.iter().map(|b| format!("{b:02x}")).collect()
    }
}
