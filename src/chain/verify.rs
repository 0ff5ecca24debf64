use std::fmt;

use crate::chain::entry::ChainEntry;
use crate::digest::DigestStrategy;

/// Why a chain failed verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FaultKind {
    /// The digest recomputed from the entry's stored fields does not match
    /// the stored digest: the entry was edited after mining.
    DigestMismatch { recomputed: String, stored: String },
    /// The entry's previous-hash reference does not match the predecessor's
    /// digest: the link between entries is broken.
    LinkageMismatch { expected: String, stored: String },
}

/// First verification failure found while walking a chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainFault {
    /// Position of the offending entry in the sequence.
    pub index: u64,
    pub kind: FaultKind,
}

impl fmt::Display for ChainFault {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.kind {
            FaultKind::DigestMismatch { recomputed, stored } => write!(
                f,
                "entry {}: recomputed digest {} does not match stored digest {}",
                self.index, recomputed, stored
            ),
            FaultKind::LinkageMismatch { expected, stored } => write!(
                f,
                "entry {}: previous-hash reference {} does not match predecessor digest {}",
                self.index, stored, expected
            ),
        }
    }
}

impl std::error::Error for ChainFault {}

/// Walk the chain, recomputing every digest and confirming linkage.
///
/// Empty and genesis-only chains verify clean. The difficulty prefix is a
/// mining-time constraint and is deliberately not re-checked here. Returns
/// the first fault found, so a caller can report exactly where and how a
/// chain was tampered with.
pub fn verify_chain(
    chain: &[ChainEntry],
    digest: &dyn DigestStrategy,
) -> Result<(), ChainFault> {
    for i in 1..chain.len() {
        let current = &chain[i];
        let previous = &chain[i - 1];

        let recomputed = current.compute_digest(digest);
        if recomputed != current.hash {
            return Err(ChainFault {
                index: i as u64,
                kind: FaultKind::DigestMismatch {
                    recomputed,
                    stored: current.hash.clone(),
                },
            });
        }

        if current.previous_hash != previous.hash {
            return Err(ChainFault {
                index: i as u64,
                kind: FaultKind::LinkageMismatch {
                    expected: previous.hash.clone(),
                    stored: current.previous_hash.clone(),
                },
            });
        }
    }
    Ok(())
}

/// All-or-nothing form of [`verify_chain`].
pub fn is_valid(chain: &[ChainEntry], digest: &dyn DigestStrategy) -> bool {
    verify_chain(chain, digest).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::entry::{genesis_entry, iso_now, EntryData};
    use crate::chain::mining::{append_entry, mine_entry, MiningLimits};
    use crate::digest::Sha256Digest;
    use crate::record::PatientRecord;

    fn sample_record(name: &str) -> PatientRecord {
        PatientRecord::new(
            name.to_string(),
            41,
            "M".to_string(),
            "B+".to_string(),
            "Diabetes".to_string(),
            "Metformin".to_string(),
            "Dr. Kim".to_string(),
        )
    }

    fn build_chain(len: usize) -> Vec<ChainEntry> {
        let digest = Sha256Digest;
        let mut chain = vec![genesis_entry(&digest)];
        for i in 1..len {
            let entry = append_entry(
                &chain,
                sample_record(&format!("patient-{}", i)),
                &digest,
                1,
                &MiningLimits::default(),
            )
            .unwrap();
            chain.push(entry);
        }
        chain
    }

    #[test]
    fn empty_chain_is_valid() {
        assert!(is_valid(&[], &Sha256Digest));
    }

    #[test]
    fn genesis_only_chain_is_valid() {
        let chain = build_chain(1);
        assert!(is_valid(&chain, &Sha256Digest));
    }

    #[test]
    fn intact_chain_is_valid() {
        let chain = build_chain(3);
        assert!(verify_chain(&chain, &Sha256Digest).is_ok());
    }

    #[test]
    fn edited_payload_reports_digest_mismatch_at_entry() {
        let mut chain = build_chain(3);
        if let EntryData::Patient(record) = &mut chain[1].data {
            record.name = "Bob".to_string();
        } else {
            panic!("expected patient payload");
        }

        let fault = verify_chain(&chain, &Sha256Digest).unwrap_err();
        assert_eq!(fault.index, 1);
        assert!(matches!(fault.kind, FaultKind::DigestMismatch { .. }));
        assert!(!is_valid(&chain, &Sha256Digest));
    }

    #[test]
    fn edited_nonce_invalidates_chain() {
        let mut chain = build_chain(2);
        chain[1].nonce += 1;
        assert!(!is_valid(&chain, &Sha256Digest));
    }

    #[test]
    fn broken_link_reports_linkage_mismatch() {
        let digest = Sha256Digest;
        let mut chain = build_chain(2);

        // A self-consistent entry mined against the wrong predecessor:
        // its digest checks out but the link does not.
        let stray = mine_entry(
            &digest,
            2,
            iso_now(),
            sample_record("stray"),
            "ee".repeat(32),
            1,
            &MiningLimits::default(),
        )
        .unwrap();
        chain.push(stray);

        let fault = verify_chain(&chain, &digest).unwrap_err();
        assert_eq!(fault.index, 2);
        assert!(matches!(fault.kind, FaultKind::LinkageMismatch { .. }));
    }
}
