//! Integration tests for chain construction and tamper detection

use carechain::chain::{
    append_entry, genesis_entry, is_valid, verify_chain, ChainEntry, EntryData, FaultKind,
    MiningLimits,
};
use carechain::digest::{DigestStrategy, RollingChecksum, Sha256Digest};
use carechain::record::PatientRecord;

/// Helper to build a populated record
fn patient(name: &str, age: u32, gender: &str) -> PatientRecord {
    PatientRecord::new(
        name.to_string(),
        age,
        gender.to_string(),
        "O+".to_string(),
        "Checkup".to_string(),
        "None".to_string(),
        "Dr. Adler".to_string(),
    )
}

/// Helper to extend a chain by one mined entry
fn extend(
    chain: &mut Vec<ChainEntry>,
    record: PatientRecord,
    digest: &dyn DigestStrategy,
) -> Result<(), Box<dyn std::error::Error>> {
    let entry = append_entry(chain, record, digest, 1, &MiningLimits::default())?;
    chain.push(entry);
    Ok(())
}

#[test]
fn genesis_then_append_then_corrupt() -> Result<(), Box<dyn std::error::Error>> {
    let digest = Sha256Digest;

    // Start with genesis only: valid.
    let mut chain = vec![genesis_entry(&digest)];
    assert!(is_valid(&chain, &digest));

    // Append one record: chain of length 2, still valid.
    extend(&mut chain, patient("Ann", 30, "F"), &digest)?;
    assert_eq!(chain.len(), 2);
    assert!(verify_chain(&chain, &digest).is_ok());

    // Corrupt the payload without recomputing the digest: invalid.
    if let EntryData::Patient(record) = &mut chain[1].data {
        record.name = "Bob".to_string();
    } else {
        panic!("entry 1 should carry a patient record");
    }
    assert!(!is_valid(&chain, &digest));

    let fault = verify_chain(&chain, &digest).unwrap_err();
    assert_eq!(fault.index, 1);
    assert!(matches!(fault.kind, FaultKind::DigestMismatch { .. }));

    Ok(())
}

#[test]
fn two_appends_produce_strictly_increasing_linked_entries(
) -> Result<(), Box<dyn std::error::Error>> {
    let digest = Sha256Digest;
    let mut chain = vec![genesis_entry(&digest)];

    extend(&mut chain, patient("Ann", 30, "F"), &digest)?;
    extend(&mut chain, patient("Ben", 45, "M"), &digest)?;

    let indices: Vec<u64> = chain.iter().map(|e| e.index).collect();
    assert_eq!(indices, vec![0, 1, 2]);
    assert_eq!(chain[2].previous_hash, chain[1].hash);
    assert_eq!(chain[1].previous_hash, chain[0].hash);
    assert!(is_valid(&chain, &digest));

    Ok(())
}

#[test]
fn every_appended_entry_satisfies_the_difficulty_prefix(
) -> Result<(), Box<dyn std::error::Error>> {
    let digest = Sha256Digest;
    let mut chain = vec![genesis_entry(&digest)];

    for i in 0..3 {
        let last_hash = chain.last().unwrap().hash.clone();
        let entry = append_entry(
            &chain,
            patient(&format!("patient-{}", i), 20 + i, "F"),
            &digest,
            2,
            &MiningLimits::default(),
        )?;
        assert!(entry.hash.starts_with("00"));
        assert_eq!(entry.previous_hash, last_hash);
        chain.push(entry);
    }

    assert!(is_valid(&chain, &digest));
    Ok(())
}

#[test]
fn tampering_any_single_field_breaks_verification() -> Result<(), Box<dyn std::error::Error>> {
    let digest = Sha256Digest;
    let mut base = vec![genesis_entry(&digest)];
    extend(&mut base, patient("Ann", 30, "F"), &digest)?;
    extend(&mut base, patient("Ben", 45, "M"), &digest)?;
    assert!(is_valid(&base, &digest));

    // index
    let mut chain = base.clone();
    chain[1].index = 7;
    assert!(!is_valid(&chain, &digest));

    // timestamp
    let mut chain = base.clone();
    chain[2].timestamp = "1999-12-31T23:59:59.999Z".to_string();
    assert!(!is_valid(&chain, &digest));

    // nonce
    let mut chain = base.clone();
    chain[1].nonce += 1;
    assert!(!is_valid(&chain, &digest));

    // previous-hash reference
    let mut chain = base.clone();
    chain[2].previous_hash = "ff".repeat(32);
    assert!(!is_valid(&chain, &digest));

    // payload field
    let mut chain = base;
    if let EntryData::Patient(record) = &mut chain[2].data {
        record.age = 99;
    }
    assert!(!is_valid(&chain, &digest));

    Ok(())
}

#[test]
fn legacy_checksum_chain_verifies_with_its_own_strategy(
) -> Result<(), Box<dyn std::error::Error>> {
    // The legacy digest pads each 32-bit word to 16 hex chars, so every
    // output carries at least 8 leading zeros and mining finds a nonce
    // immediately. Decorative, but the linkage checks still hold.
    let digest = RollingChecksum;
    let mut chain = vec![genesis_entry(&digest)];
    extend(&mut chain, patient("Ann", 30, "F"), &digest)?;
    extend(&mut chain, patient("Ben", 45, "M"), &digest)?;

    assert!(is_valid(&chain, &digest));
    assert_eq!(chain[1].nonce, 1);

    if let EntryData::Patient(record) = &mut chain[1].data {
        record.medication = "Edited".to_string();
    }
    assert!(!is_valid(&chain, &digest));

    Ok(())
}

#[test]
fn verification_does_not_reenforce_difficulty() -> Result<(), Box<dyn std::error::Error>> {
    // Genesis digests are computed, not mined, so a genesis-only chain may
    // carry a digest with no zero prefix; the verifier must accept it.
    let digest = Sha256Digest;
    let chain = vec![genesis_entry(&digest)];
    assert!(verify_chain(&chain, &digest).is_ok());
    Ok(())
}
