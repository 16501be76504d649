//! Error types for slotdb
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

/// Result type alias using SlotDbError
pub type Result<T> = std::result::Result<T, SlotDbError>;

/// Unified error type for slotdb operations
#[derive(Debug, Error)]
pub enum SlotDbError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // File Format Errors
    // -------------------------------------------------------------------------
    #[error("Corrupt record: {0}")]
    CorruptRecord(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    // -------------------------------------------------------------------------
    // Store Errors
    // -------------------------------------------------------------------------
    #[error("Id {id} out of range (max_rows = {max_rows})")]
    OutOfRange { id: i32, max_rows: usize },

    #[error("Slot {0} already set, delete it first")]
    SlotOccupied(i32),

    #[error("Field '{field}' too long: {len} bytes (max {max})")]
    FieldTooLong {
        field: &'static str,
        len: usize,
        max: usize,
    },

    #[error("Invalid capacity: {0}")]
    InvalidCapacity(String),

    // -------------------------------------------------------------------------
    // Session Errors
    // -------------------------------------------------------------------------
    #[error("Session is closed")]
    SessionClosed,
}
