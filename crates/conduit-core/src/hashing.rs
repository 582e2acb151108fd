//! Deterministic hashing utilities.
//!
//! All hashes are:
//! - sha256
//! - domain-separated (see `crate::domain`)
//! - computed over length-prefixed parts, so `["ab", "c"]` and `["a", "bc"]` differ
//!
//! Used for derived intent keys and for per-intent tie-breaking jitter.

use sha2::{Digest, Sha256};

/// Domain-separated digest over a sequence of byte strings.
pub fn hash_parts(domain: &str, parts: &[&[u8]]) -> [u8; 32] {
    let mut h = Sha256::new();
    h.update(domain.as_bytes());
    for part in parts {
        h.update((part.len() as u64).to_be_bytes());
        h.update(part);
    }
    let mut out = [0u8; 32];
    out.copy_from_slice(&h.finalize());
    out
}

/// Lowercase hex of [`hash_parts`].
pub fn hash_parts_hex(domain: &str, parts: &[&[u8]]) -> String {
    hex::encode(hash_parts(domain, parts))
}

/// Map a digest onto `[0, 1)` using its first eight bytes.
pub fn unit_interval(domain: &str, parts: &[&[u8]]) -> f64 {
    let digest = hash_parts(domain, parts);
    let mut head = [0u8; 8];
    head.copy_from_slice(&digest[..8]);
    // 53 bits fit exactly in an f64 mantissa.
    (u64::from_be_bytes(head) >> 11) as f64 / (1u64 << 53) as f64
}
