//! Patient record type and boundary validation.

use chrono::{SecondsFormat, Utc};

use crate::error::{ChainError, Result};

/// A single patient entry as captured at the form boundary.
///
/// Records are immutable once created: the chain core never mutates or
/// deletes them. Field names serialize in camelCase so persisted JSON
/// matches the shape written by the original client.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientRecord {
    pub id: String,
    pub name: String,
    pub age: u32,
    pub gender: String,
    pub blood_type: String,
    pub diagnosis: String,
    pub medication: String,
    pub doctor: String,
    pub timestamp: String,
}

impl PatientRecord {
    /// Build a record from form fields, assigning a fresh id and creation
    /// timestamp.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        name: String,
        age: u32,
        gender: String,
        blood_type: String,
        diagnosis: String,
        medication: String,
        doctor: String,
    ) -> Self {
        let now = Utc::now();
        PatientRecord {
            id: now.timestamp_millis().to_string(),
            name,
            age,
            gender,
            blood_type,
            diagnosis,
            medication,
            doctor,
            timestamp: now.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }

    /// Reject records with missing required fields before they reach the
    /// chain core.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(ChainError::InvalidRecord("name must not be empty".to_string()));
        }
        if self.age == 0 {
            return Err(ChainError::InvalidRecord("age must be greater than zero".to_string()));
        }
        if self.gender.trim().is_empty() {
            return Err(ChainError::InvalidRecord("gender must not be empty".to_string()));
        }
        Ok(())
    }
}
