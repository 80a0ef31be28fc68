//! Canonical serialization for deterministic fingerprints.
//!
//! Glyph tables and width specs are fingerprinted so two generation runs can
//! be compared without diffing every row.
//!
//! ## Determinism Guarantees
//!
//! - Stable field order: struct fields serialize in declaration order
//! - Stable entry order: tables serialize in table order (letters, digits, punctuation)
//! - No HashMap allowed: use BTreeMap for maps in fingerprinted data

use serde::Serialize;
use xxhash_rust::xxh64::xxh64;

/// Seed for every fingerprint. Changing it invalidates recorded fingerprints.
const FINGERPRINT_SEED: u64 = 0;

/// Serialize a value to canonical JSON bytes.
pub fn to_canonical_bytes<T: Serialize>(value: &T) -> Result<Vec<u8>, serde_json::Error> {
    serde_json::to_vec(value)
}

/// Compute the canonical xxh64 hash of a serializable value.
pub fn canonical_hash<T: Serialize>(value: &T) -> Result<u64, serde_json::Error> {
    let bytes = to_canonical_bytes(value)?;
    Ok(xxh64(&bytes, FINGERPRINT_SEED))
}

/// Compute the canonical hash rendered as 16 lowercase hex digits.
pub fn canonical_hash_hex<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    Ok(format!("{:016x}", canonical_hash(value)?))
}
