//! Digest strategies for chain entries.
//!
//! Every strategy maps the same five entry fields, concatenated in a fixed
//! order with no delimiters, to a 64-character lowercase hex string. The
//! default is SHA-256. [`RollingChecksum`] reproduces the weak 32-bit
//! checksum used by the original client-side ledger so chains written by it
//! can still be verified; it is trivially collision-prone and must not be
//! used where tamper-evidence actually matters.

use sha2::{Digest, Sha256};

/// Length in hex characters of every digest produced by a strategy.
pub const DIGEST_HEX_LEN: usize = 64;

/// A pure mapping from entry fields to a fixed-length hex digest.
///
/// Implementations must be deterministic and side-effect free: the same
/// inputs always produce the same output.
pub trait DigestStrategy: Send + Sync {
    /// Digest the concatenation of `index`, `timestamp`, `data`,
    /// `previous_hash` and `nonce`, in that order, with no delimiters.
    fn digest(&self, index: u64, timestamp: &str, data: &str, previous_hash: &str, nonce: u64)
        -> String;

    fn name(&self) -> &'static str;
}

fn concat_fields(index: u64, timestamp: &str, data: &str, previous_hash: &str, nonce: u64) -> String {
    format!("{}{}{}{}{}", index, timestamp, data, previous_hash, nonce)
}

/// SHA-256 over the concatenated fields, hex-encoded.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256Digest;

impl DigestStrategy for Sha256Digest {
    fn digest(&self, index: u64, timestamp: &str, data: &str, previous_hash: &str, nonce: u64)
        -> String {
        let input = concat_fields(index, timestamp, data, previous_hash, nonce);
        let mut hasher = Sha256::new();
        hasher.update(input.as_bytes());
        hex::encode(hasher.finalize())
    }

    fn name(&self) -> &'static str {
        "sha256"
    }
}

/// Legacy 32-bit rolling checksum, kept for compatibility with chains
/// written by the original client.
///
/// The checksum runs over UTF-16 code units with wrapping signed 32-bit
/// arithmetic (`h = (h << 5) - h + unit`), then the absolute value is
/// printed as 16 zero-padded hex characters and repeated to fill 64.
#[derive(Debug, Clone, Copy, Default)]
pub struct RollingChecksum;

impl DigestStrategy for RollingChecksum {
    fn digest(&self, index: u64, timestamp: &str, data: &str, previous_hash: &str, nonce: u64)
        -> String {
        let input = concat_fields(index, timestamp, data, previous_hash, nonce);

        let mut h: i32 = 0;
        for unit in input.encode_utf16() {
            h = h.wrapping_shl(5).wrapping_sub(h).wrapping_add(unit as i32);
        }

        let word = format!("{:016x}", (h as i64).unsigned_abs());
        word.repeat(4)
    }

    fn name(&self) -> &'static str {
        "rolling"
    }
}

/// Look up a strategy by its configured name.
pub fn strategy_from_name(name: &str) -> Option<Box<dyn DigestStrategy>> {
    match name {
        "sha256" => Some(Box::new(Sha256Digest)),
        "rolling" => Some(Box::new(RollingChecksum)),
        _ => None,
    }
}
