//! Error types for CareChain

use std::fmt;

#[derive(Debug, Clone)]
pub enum ChainError {
    EmptyChain,
    MiningExhausted { attempts: u64 },
    MiningCancelled,
    InvalidRecord(String),
    InvalidEntry(String),
    DatabaseError(String),
    SerializationError(String),
    ConfigError(String),
    IoError(String),
}

impl fmt::Display for ChainError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ChainError::EmptyChain => {
                write!(f, "Chain has no genesis entry; cannot append")
            }
            ChainError::MiningExhausted { attempts } => {
                write!(f, "Mining exhausted after {} nonce attempts", attempts)
            }
            ChainError::MiningCancelled => write!(f, "Mining cancelled"),
            ChainError::InvalidRecord(msg) => write!(f, "Invalid patient record: {}", msg),
            ChainError::InvalidEntry(msg) => write!(f, "Invalid chain entry: {}", msg),
            ChainError::DatabaseError(msg) => write!(f, "Database error: {}", msg),
            ChainError::SerializationError(msg) => write!(f, "Serialization error: {}", msg),
            ChainError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            ChainError::IoError(msg) => write!(f, "IO error: {}", msg),
        }
    }
}

impl std::error::Error for ChainError {}

impl From<std::io::Error> for ChainError {
    fn from(err: std::io::Error) -> Self {
        ChainError::IoError(err.to_string())
    }
}

impl From<serde_json::Error> for ChainError {
    fn from(err: serde_json::Error) -> Self {
        ChainError::SerializationError(err.to_string())
    }
}

/// Convenience alias used across the crate
pub type Result<T> = std::result::Result<T, ChainError>;
