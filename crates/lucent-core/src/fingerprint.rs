//! Content fingerprints for snapshots
//!
//! A fingerprint is the SHA-256 of a snapshot's canonical JSON, so two
//! renderings can be checked against the same input.

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::error::Result;
use crate::models::{InsightSnapshot, LedgerSnapshot};

/// Hex-encoded SHA-256 of a value's JSON encoding
pub fn fingerprint<T: Serialize>(value: &T) -> Result<String> {
    let bytes = serde_json::to_vec(value)?;
    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    Ok(hex::encode(hasher.finalize()))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Fingerprints {
    pub insights: String,
    pub ledger: String,
}

impl Fingerprints {
    pub fn of(snapshot: &InsightSnapshot, ledger: &LedgerSnapshot) -> Result<Self> {
        Ok(Self {
            insights: fingerprint(snapshot)?,
            ledger: fingerprint(ledger)?,
        })
    }
}
