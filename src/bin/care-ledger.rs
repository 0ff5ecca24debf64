#![forbid(unsafe_code)]
use carechain::chain::{EntryData, Ledger};
use carechain::config::load_config;
use carechain::persistence::Database;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let config = load_config()?;

    let db = Database::open(&config.database.path)?;
    let ledger = Ledger::open_with_config(Box::new(db), &config.mining)?;

    println!("\n╔═══════════════════════════════════════════════════════════════╗");
    println!("║                 ⛓️  PATIENT RECORD CHAIN                      ║");
    println!("╚═══════════════════════════════════════════════════════════════╝\n");

    for entry in &ledger.entries {
        println!("┌─ Entry #{}", entry.index);
        println!("│ Timestamp:  {}", entry.timestamp);
        match &entry.data {
            EntryData::Marker(marker) => {
                println!("│ Payload:    {}", marker);
            }
            EntryData::Patient(record) => {
                println!("│ Patient:    {} ({}, {})", record.name, record.age, record.gender);
                if !record.diagnosis.is_empty() {
                    println!("│ Diagnosis:  {}", record.diagnosis);
                }
                if !record.medication.is_empty() {
                    println!("│ Medication: {}", record.medication);
                }
                if !record.doctor.is_empty() {
                    println!("│ Doctor:     {}", record.doctor);
                }
            }
        }
        println!("│ Hash:       {}", entry.hash);
        println!("│ Previous:   {}", entry.previous_hash);
        println!("│ Nonce:      {}", entry.nonce);
        println!("└─────────────────────────────────────────────────────────────────\n");
    }

    println!("┌──────────────────────────── STATISTICS ────────────────────────────────┐");
    println!("│ Total Entries:    {:<53} │", ledger.entries.len());
    println!("│ Patient Records:  {:<53} │", ledger.patients.len());
    println!(
        "│ Chain Integrity:  {:<53} │",
        if ledger.is_valid() { "100%" } else { "0%" }
    );
    println!("└────────────────────────────────────────────────────────────────────────┘\n");

    Ok(())
}
