#![forbid(unsafe_code)]
use std::process::ExitCode;

use carechain::chain::Ledger;
use carechain::config::load_config;
use carechain::persistence::Database;

fn main() -> ExitCode {
    env_logger::init();

    let config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let ledger = match Database::open(&config.database.path)
        .map(Box::new)
        .and_then(|db| Ledger::open_with_config(db, &config.mining))
    {
        Ok(ledger) => ledger,
        Err(e) => {
            eprintln!("Failed to load chain: {}", e);
            return ExitCode::FAILURE;
        }
    };

    println!("Entries: {}", ledger.entries.len());
    match ledger.verify() {
        Ok(()) => {
            println!("Chain Status: Valid ✓");
            ExitCode::SUCCESS
        }
        Err(fault) => {
            println!("Chain Status: Invalid ✗");
            println!("First fault: {}", fault);
            ExitCode::FAILURE
        }
    }
}
