#![forbid(unsafe_code)]
use std::time::Instant;

use clap::Parser;

use carechain::chain::Ledger;
use carechain::config::load_config;
use carechain::persistence::Database;
use carechain::record::PatientRecord;

/// Append a patient record to the care chain.
#[derive(Parser)]
#[command(name = "care-record")]
struct Args {
    #[arg(long)]
    name: String,
    #[arg(long)]
    age: u32,
    #[arg(long)]
    gender: String,
    #[arg(long, default_value = "")]
    blood_type: String,
    #[arg(long, default_value = "")]
    diagnosis: String,
    #[arg(long, default_value = "")]
    medication: String,
    #[arg(long, default_value = "")]
    doctor: String,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();
    let config = load_config()?;

    let record = PatientRecord::new(
        args.name,
        args.age,
        args.gender,
        args.blood_type,
        args.diagnosis,
        args.medication,
        args.doctor,
    );
    // Form-boundary validation: malformed records never reach the chain.
    record.validate()?;

    let db = Database::open(&config.database.path)?;
    let mut ledger = Ledger::open_with_config(Box::new(db), &config.mining)?;

    println!("\n╔═══════════════════════════════════════════════════════════════╗");
    println!("║              ⛏️  MINING ENTRY {}                               ║", ledger.entries.len());
    println!("╚═══════════════════════════════════════════════════════════════╝\n");

    let start_time = Instant::now();
    let entry = ledger.append_record(record)?.clone();
    let elapsed = start_time.elapsed();

    println!("╔═══════════════════════════════════════════════════════════════╗");
    println!("║                     ✅ ENTRY APPENDED!                        ║");
    println!("╚═══════════════════════════════════════════════════════════════╝\n");

    println!("┌──────────────────────────── ENTRY METADATA ────────────────────────────┐");
    println!("│ Index:       #{:<57} │", entry.index);
    println!("│ Hash:        {} │", entry.hash);
    println!("│ Previous:    {} │", entry.previous_hash);
    println!("│ Timestamp:   {:<58} │", entry.timestamp);
    println!("│ Nonce:       {:<58} │", entry.nonce);
    println!("│ Difficulty:  {:<58} │", ledger.difficulty);
    println!("│ Mining Time: {:.3} seconds{:<49} │", elapsed.as_secs_f64(), "");
    println!("└────────────────────────────────────────────────────────────────────────┘\n");

    println!("┌──────────────────────────── LEDGER STATE ──────────────────────────────┐");
    println!("│ Total Entries:    {:<53} │", ledger.entries.len());
    println!("│ Patient Records:  {:<53} │", ledger.patients.len());
    println!(
        "│ Chain Integrity:  {:<53} │",
        if ledger.is_valid() { "Valid ✓" } else { "Invalid ✗" }
    );
    println!("└────────────────────────────────────────────────────────────────────────┘\n");

    Ok(())
}
