//! CareChain - A tamper-evident append-only ledger for patient health records
//!
//! # Architecture
//!
//! The crate is organized into logical modules:
//!
//! ## Core Chain
//! - [`chain`] - Entry construction, mining, linkage verification
//! - [`record`] - Patient record type and boundary validation
//!
//! ## Digests
//! - [`digest`] - Pluggable digest strategies (SHA-256 default, legacy
//!   rolling checksum for compatibility)
//!
//! ## State Management
//! - [`persistence`] - Repository abstraction (SQLite and in-memory)
//!
//! ## Configuration & Utilities
//! - [`config`] - Configuration management
//! - [`error`] - Error types

#![forbid(unsafe_code)]

// ============================================================================
// Core Chain
// ============================================================================
pub mod chain;
pub mod record;

// ============================================================================
// Digests
// ============================================================================
pub mod digest;

// ============================================================================
// State Management
// ============================================================================
pub mod persistence;

// ============================================================================
// Configuration & Utilities
// ============================================================================
pub mod config;
pub mod error;
