//! Persistence layer for CareChain.
//!
//! The original client kept two named collections (`blockchain` and
//! `patients`) in browser storage, rewritten wholesale after every append.
//! That shape is preserved here behind an injected [`Repository`] trait:
//! both collections are saved and loaded as whole units.

use rusqlite::{params, Connection};
use std::sync::{Arc, Mutex};

use crate::chain::entry::ChainEntry;
use crate::error::{ChainError, Result};
use crate::record::PatientRecord;

/// Abstraction for persistence backends. Implementations save and load the
/// chain and the patient roster as whole collections.
pub trait Repository: Send + Sync {
    fn save_chain(&self, entries: &[ChainEntry]) -> Result<()>;
    fn load_chain(&self) -> Result<Vec<ChainEntry>>;
    fn save_patients(&self, records: &[PatientRecord]) -> Result<()>;
    fn load_patients(&self) -> Result<Vec<PatientRecord>>;
}

pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    pub fn open(path: &str) -> Result<Self> {
        let conn = Connection::open(path)
            .map_err(|e| ChainError::DatabaseError(format!("Failed to open database: {}", e)))?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS chain_entries (
                idx INTEGER PRIMARY KEY,
                entry TEXT NOT NULL
            )",
            [],
        )
        .map_err(|e| {
            ChainError::DatabaseError(format!("Failed to create chain_entries table: {}", e))
        })?;

        // Keyed by insertion position, not record id: the id is a
        // millisecond timestamp and two records captured in the same
        // millisecond may share one.
        conn.execute(
            "CREATE TABLE IF NOT EXISTS patients (
                position INTEGER PRIMARY KEY,
                record TEXT NOT NULL
            )",
            [],
        )
        .map_err(|e| {
            ChainError::DatabaseError(format!("Failed to create patients table: {}", e))
        })?;

        Ok(Database {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| ChainError::DatabaseError("Mutex poisoned".to_string()))
    }
}

impl Repository for Database {
    /// Replace the stored chain with `entries` inside one transaction.
    fn save_chain(&self, entries: &[ChainEntry]) -> Result<()> {
        let conn_guard = self.lock()?;
        let tx = conn_guard.unchecked_transaction().map_err(|e| {
            ChainError::DatabaseError(format!("Failed to start transaction: {}", e))
        })?;

        tx.execute("DELETE FROM chain_entries", [])
            .map_err(|e| ChainError::DatabaseError(format!("Failed to clear chain: {}", e)))?;

        for entry in entries {
            let entry_json = serde_json::to_string(entry).map_err(|e| {
                ChainError::DatabaseError(format!("Failed to serialize entry: {}", e))
            })?;

            tx.execute(
                "INSERT INTO chain_entries (idx, entry) VALUES (?1, ?2)",
                params![entry.index as i64, entry_json],
            )
            .map_err(|e| ChainError::DatabaseError(format!("Failed to save entry: {}", e)))?;
        }

        tx.commit().map_err(|e| {
            ChainError::DatabaseError(format!("Failed to commit transaction: {}", e))
        })?;

        Ok(())
    }

    fn load_chain(&self) -> Result<Vec<ChainEntry>> {
        let conn_guard = self.lock()?;
        let mut stmt = conn_guard
            .prepare("SELECT entry FROM chain_entries ORDER BY idx ASC")
            .map_err(|e| ChainError::DatabaseError(format!("Failed to prepare query: {}", e)))?;

        let rows = stmt
            .query_map([], |row| {
                let entry_json: String = row.get(0)?;
                Ok(entry_json)
            })
            .map_err(|e| ChainError::DatabaseError(format!("Failed to query chain: {}", e)))?;

        let mut entries = Vec::new();
        for row_result in rows {
            let entry_json =
                row_result.map_err(|e| ChainError::DatabaseError(format!("Failed to read row: {}", e)))?;
            let entry: ChainEntry = serde_json::from_str(&entry_json).map_err(|e| {
                ChainError::DatabaseError(format!("Failed to deserialize entry: {}", e))
            })?;
            entries.push(entry);
        }

        Ok(entries)
    }

    fn save_patients(&self, records: &[PatientRecord]) -> Result<()> {
        let conn_guard = self.lock()?;
        let tx = conn_guard.unchecked_transaction().map_err(|e| {
            ChainError::DatabaseError(format!("Failed to start transaction: {}", e))
        })?;

        tx.execute("DELETE FROM patients", [])
            .map_err(|e| ChainError::DatabaseError(format!("Failed to clear patients: {}", e)))?;

        for (position, record) in records.iter().enumerate() {
            let record_json = serde_json::to_string(record).map_err(|e| {
                ChainError::DatabaseError(format!("Failed to serialize record: {}", e))
            })?;

            tx.execute(
                "INSERT INTO patients (position, record) VALUES (?1, ?2)",
                params![position as i64, record_json],
            )
            .map_err(|e| ChainError::DatabaseError(format!("Failed to save record: {}", e)))?;
        }

        tx.commit().map_err(|e| {
            ChainError::DatabaseError(format!("Failed to commit transaction: {}", e))
        })?;

        Ok(())
    }

    fn load_patients(&self) -> Result<Vec<PatientRecord>> {
        let conn_guard = self.lock()?;
        let mut stmt = conn_guard
            .prepare("SELECT record FROM patients ORDER BY position ASC")
            .map_err(|e| ChainError::DatabaseError(format!("Failed to prepare query: {}", e)))?;

        let rows = stmt
            .query_map([], |row| {
                let record_json: String = row.get(0)?;
                Ok(record_json)
            })
            .map_err(|e| ChainError::DatabaseError(format!("Failed to query patients: {}", e)))?;

        let mut records = Vec::new();
        for row_result in rows {
            let record_json =
                row_result.map_err(|e| ChainError::DatabaseError(format!("Failed to read row: {}", e)))?;
            let record: PatientRecord = serde_json::from_str(&record_json).map_err(|e| {
                ChainError::DatabaseError(format!("Failed to deserialize record: {}", e))
            })?;
            records.push(record);
        }

        Ok(records)
    }
}

/// Simple in-memory repository useful for tests and ephemeral runs.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    pub entries: Arc<Mutex<Vec<ChainEntry>>>,
    pub records: Arc<Mutex<Vec<PatientRecord>>>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Repository for InMemoryRepository {
    fn save_chain(&self, entries: &[ChainEntry]) -> Result<()> {
        let mut stored = self
            .entries
            .lock()
            .map_err(|_| ChainError::DatabaseError("Mutex poisoned".to_string()))?;
        *stored = entries.to_vec();
        Ok(())
    }

    fn load_chain(&self) -> Result<Vec<ChainEntry>> {
        let stored = self
            .entries
            .lock()
            .map_err(|_| ChainError::DatabaseError("Mutex poisoned".to_string()))?;
        Ok(stored.clone())
    }

    fn save_patients(&self, records: &[PatientRecord]) -> Result<()> {
        let mut stored = self
            .records
            .lock()
            .map_err(|_| ChainError::DatabaseError("Mutex poisoned".to_string()))?;
        *stored = records.to_vec();
        Ok(())
    }

    fn load_patients(&self) -> Result<Vec<PatientRecord>> {
        let stored = self
            .records
            .lock()
            .map_err(|_| ChainError::DatabaseError("Mutex poisoned".to_string()))?;
        Ok(stored.clone())
    }
}
