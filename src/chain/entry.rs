use chrono::{SecondsFormat, Utc};

use crate::digest::DigestStrategy;
use crate::record::PatientRecord;

/// Previous-hash placeholder carried by the genesis entry.
pub const GENESIS_PREVIOUS_HASH: &str =
    "0000000000000000000000000000000000000000000000000000000000000000";

/// Fixed marker payload of the genesis entry.
pub const GENESIS_MARKER: &str = "Genesis Block - Patient Blockchain Initialized";

/// Current time as an ISO-8601 string with millisecond precision.
pub fn iso_now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Payload of a chain entry: the genesis marker string, or a patient record.
///
/// Untagged so the serialized form is either a bare JSON string or a record
/// object, matching the persisted state written by the original client.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum EntryData {
    Patient(PatientRecord),
    Marker(String),
}

impl EntryData {
    /// Canonical string form fed to the digest function: the marker string
    /// verbatim, or the record as JSON with stable field order.
    pub fn canonical_string(&self) -> String {
        match self {
            EntryData::Marker(s) => s.clone(),
            // PatientRecord serialization cannot fail: no maps, no
            // non-string keys, no custom Serialize impls.
            EntryData::Patient(record) => {
                serde_json::to_string(record).unwrap_or_default()
            }
        }
    }
}

/// One link in the append-only record chain.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainEntry {
    pub index: u64,
    pub timestamp: String,
    pub data: EntryData,
    pub previous_hash: String,
    pub hash: String,
    pub nonce: u64,
}

impl ChainEntry {
    /// Recompute this entry's digest from its stored fields.
    pub fn compute_digest(&self, digest: &dyn DigestStrategy) -> String {
        digest.digest(
            self.index,
            &self.timestamp,
            &self.data.canonical_string(),
            &self.previous_hash,
            self.nonce,
        )
    }
}

/// Build the unique genesis entry: index 0, marker payload, all-zero
/// previous hash, nonce 0. The genesis digest is computed directly, not
/// mined against a difficulty target.
pub fn genesis_entry(digest: &dyn DigestStrategy) -> ChainEntry {
    let timestamp = iso_now();
    let hash = digest.digest(0, &timestamp, GENESIS_MARKER, GENESIS_PREVIOUS_HASH, 0);

    ChainEntry {
        index: 0,
        timestamp,
        data: EntryData::Marker(GENESIS_MARKER.to_string()),
        previous_hash: GENESIS_PREVIOUS_HASH.to_string(),
        hash,
        nonce: 0,
    }
}
