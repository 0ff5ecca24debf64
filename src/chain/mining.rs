use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::chain::entry::{iso_now, ChainEntry, EntryData};
use crate::digest::DigestStrategy;
use crate::error::{ChainError, Result};
use crate::record::PatientRecord;

/// Leading zero hex characters a mined digest must carry.
pub const DEFAULT_DIFFICULTY: u32 = 2;

/// Nonce attempts before a mining run is declared exhausted.
pub const DEFAULT_MAX_ITERATIONS: u64 = 10_000_000;

/// Bounds on a nonce search. The search fails with
/// [`ChainError::MiningExhausted`] once `max_iterations` nonces have been
/// tried, and with [`ChainError::MiningCancelled`] when the shared cancel
/// flag is raised.
#[derive(Debug, Clone)]
pub struct MiningLimits {
    pub max_iterations: u64,
    pub cancel: Option<Arc<AtomicBool>>,
}

impl Default for MiningLimits {
    fn default() -> Self {
        MiningLimits {
            max_iterations: DEFAULT_MAX_ITERATIONS,
            cancel: None,
        }
    }
}

impl MiningLimits {
    pub fn with_cancel(mut self, cancel: Arc<AtomicBool>) -> Self {
        self.cancel = Some(cancel);
        self
    }

    fn cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .map(|flag| flag.load(Ordering::Relaxed))
            .unwrap_or(false)
    }
}

/// True when `hash` starts with `difficulty` consecutive `'0'` characters.
pub fn meets_difficulty(hash: &str, difficulty: u32) -> bool {
    let needed = difficulty as usize;
    hash.len() >= needed && hash.bytes().take(needed).all(|b| b == b'0')
}

/// Search for a nonce whose digest satisfies the difficulty prefix.
///
/// Nonces are tried from 1 upward, recomputing the digest each iteration.
/// Purely computational and blocking; the caller bounds the work through
/// `limits`.
pub fn mine_entry(
    digest: &dyn DigestStrategy,
    index: u64,
    timestamp: String,
    record: PatientRecord,
    previous_hash: String,
    difficulty: u32,
    limits: &MiningLimits,
) -> Result<ChainEntry> {
    let data = EntryData::Patient(record);
    let canonical = data.canonical_string();

    for attempt in 1..=limits.max_iterations {
        if limits.cancelled() {
            return Err(ChainError::MiningCancelled);
        }

        let nonce = attempt;
        let hash = digest.digest(index, &timestamp, &canonical, &previous_hash, nonce);
        if meets_difficulty(&hash, difficulty) {
            log::debug!(
                "mined entry {} after {} nonce attempts (difficulty {})",
                index,
                attempt,
                difficulty
            );
            return Ok(ChainEntry {
                index,
                timestamp,
                data,
                previous_hash,
                hash,
                nonce,
            });
        }
    }

    Err(ChainError::MiningExhausted {
        attempts: limits.max_iterations,
    })
}

/// Mine the next entry extending `chain` with `record`.
///
/// Reads the last entry for the next index and previous-hash reference; the
/// input sequence is not mutated. An empty chain (no genesis entry) is
/// rejected outright.
pub fn append_entry(
    chain: &[ChainEntry],
    record: PatientRecord,
    digest: &dyn DigestStrategy,
    difficulty: u32,
    limits: &MiningLimits,
) -> Result<ChainEntry> {
    let last = chain.last().ok_or(ChainError::EmptyChain)?;

    mine_entry(
        digest,
        last.index + 1,
        iso_now(),
        record,
        last.hash.clone(),
        difficulty,
        limits,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::entry::genesis_entry;
    use crate::digest::Sha256Digest;

    fn sample_record(name: &str) -> PatientRecord {
        PatientRecord::new(
            name.to_string(),
            30,
            "F".to_string(),
            "O+".to_string(),
            "Flu".to_string(),
            "Oseltamivir".to_string(),
            "Dr. Ruiz".to_string(),
        )
    }

    #[test]
    fn meets_difficulty_prefix_check() {
        assert!(meets_difficulty("00ab", 2));
        assert!(meets_difficulty("00ab", 0));
        assert!(!meets_difficulty("0a00", 2));
        assert!(!meets_difficulty("0", 2));
    }

    #[test]
    fn mined_entry_satisfies_difficulty_and_starts_at_nonce_one() {
        let digest = Sha256Digest;
        let entry = mine_entry(
            &digest,
            1,
            iso_now(),
            sample_record("Ann"),
            "ab".repeat(32),
            1,
            &MiningLimits::default(),
        )
        .unwrap();

        assert!(meets_difficulty(&entry.hash, 1));
        assert!(entry.nonce >= 1);
        assert_eq!(entry.compute_digest(&digest), entry.hash);
    }

    #[test]
    fn append_entry_links_to_last_hash() {
        let digest = Sha256Digest;
        let chain = vec![genesis_entry(&digest)];
        let entry =
            append_entry(&chain, sample_record("Ann"), &digest, 1, &MiningLimits::default())
                .unwrap();

        assert_eq!(entry.index, 1);
        assert_eq!(entry.previous_hash, chain[0].hash);
    }

    #[test]
    fn append_entry_rejects_empty_chain() {
        let result = append_entry(
            &[],
            sample_record("Ann"),
            &Sha256Digest,
            1,
            &MiningLimits::default(),
        );
        assert!(matches!(result, Err(ChainError::EmptyChain)));
    }

    #[test]
    fn mining_exhausts_at_iteration_cap() {
        let limits = MiningLimits {
            max_iterations: 5,
            cancel: None,
        };
        // 64 leading zeros is unreachable for SHA-256 output.
        let result = mine_entry(
            &Sha256Digest,
            1,
            iso_now(),
            sample_record("Ann"),
            "ab".repeat(32),
            64,
            &limits,
        );
        assert!(matches!(result, Err(ChainError::MiningExhausted { attempts: 5 })));
    }

    #[test]
    fn mining_honors_cancel_flag() {
        let cancel = Arc::new(AtomicBool::new(true));
        let limits = MiningLimits::default().with_cancel(cancel);
        let result = mine_entry(
            &Sha256Digest,
            1,
            iso_now(),
            sample_record("Ann"),
            "ab".repeat(32),
            64,
            &limits,
        );
        assert!(matches!(result, Err(ChainError::MiningCancelled)));
    }
}
