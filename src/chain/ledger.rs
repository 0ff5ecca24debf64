use crate::chain::entry::{genesis_entry, ChainEntry};
use crate::chain::mining::{append_entry, MiningLimits, DEFAULT_DIFFICULTY};
use crate::chain::verify::{verify_chain, ChainFault};
use crate::config::MiningConfig;
use crate::digest::{strategy_from_name, DigestStrategy, Sha256Digest};
use crate::error::{ChainError, Result};
use crate::persistence::{InMemoryRepository, Repository};
use crate::record::PatientRecord;

/// Stateful chain assembler: owns the entry sequence, the patient roster,
/// the digest strategy and mining bounds, plus the injected repository.
/// The core holds no ambient state; everything it persists goes through
/// [`Repository`].
pub struct Ledger {
    pub entries: Vec<ChainEntry>,
    pub patients: Vec<PatientRecord>,
    pub difficulty: u32,
    digest: Box<dyn DigestStrategy>,
    limits: MiningLimits,
    pub repository: Box<dyn Repository>,
}

impl Ledger {
    /// Create a ledger backed by an in-memory repository, with the default
    /// SHA-256 digest and difficulty.
    pub fn new() -> Result<Self> {
        Self::open(
            Box::new(InMemoryRepository::new()),
            Box::new(Sha256Digest),
            DEFAULT_DIFFICULTY,
            MiningLimits::default(),
        )
    }

    /// Load both collections from `repository`, seeding a genesis entry when
    /// the stored chain is empty.
    pub fn open(
        repository: Box<dyn Repository>,
        digest: Box<dyn DigestStrategy>,
        difficulty: u32,
        limits: MiningLimits,
    ) -> Result<Self> {
        let mut entries = repository.load_chain()?;
        let patients = repository.load_patients()?;

        if entries.is_empty() {
            log::info!("no stored chain found, seeding genesis entry");
            entries.push(genesis_entry(digest.as_ref()));
            repository.save_chain(&entries)?;
        }

        Ok(Ledger {
            entries,
            patients,
            difficulty,
            digest,
            limits,
            repository,
        })
    }

    /// Load a ledger using settings from the `[mining]` config section.
    pub fn open_with_config(
        repository: Box<dyn Repository>,
        mining: &MiningConfig,
    ) -> Result<Self> {
        let digest = strategy_from_name(&mining.digest).ok_or_else(|| {
            ChainError::ConfigError(format!("unknown digest strategy '{}'", mining.digest))
        })?;
        let limits = MiningLimits {
            max_iterations: mining.max_nonce_iterations,
            cancel: None,
        };
        Self::open(repository, digest, mining.difficulty, limits)
    }

    pub fn digest(&self) -> &dyn DigestStrategy {
        self.digest.as_ref()
    }

    /// Mine and append an entry for `record`, extend the patient roster, and
    /// persist both collections.
    pub fn append_record(&mut self, record: PatientRecord) -> Result<&ChainEntry> {
        record.validate()?;

        let entry = append_entry(
            &self.entries,
            record.clone(),
            self.digest.as_ref(),
            self.difficulty,
            &self.limits,
        )?;

        self.entries.push(entry);
        self.patients.push(record);

        self.repository.save_chain(&self.entries)?;
        self.repository.save_patients(&self.patients)?;

        log::info!(
            "appended entry {} ({} patients on record)",
            self.entries.len() - 1,
            self.patients.len()
        );

        // The push above guarantees a last entry.
        Ok(self.entries.last().unwrap())
    }

    /// Walk the chain and report the first fault, if any.
    pub fn verify(&self) -> std::result::Result<(), ChainFault> {
        verify_chain(&self.entries, self.digest.as_ref())
    }

    pub fn is_valid(&self) -> bool {
        self.verify().is_ok()
    }
}
