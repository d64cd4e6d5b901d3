//! Error types for spanstore
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

/// Result type alias using StoreError
pub type Result<T> = std::result::Result<T, StoreError>;

/// Unified error type for spanstore operations
#[derive(Debug, Error)]
pub enum StoreError {
    // -------------------------------------------------------------------------
    // Allocation Errors
    // -------------------------------------------------------------------------
    #[error("Allocation exhausted: requested {requested} bytes, {available} available")]
    Exhausted { requested: u32, available: u32 },

    #[error("Directory full: metadata section holds at most {capacity} entries")]
    DirectoryFull { capacity: u32 },

    // -------------------------------------------------------------------------
    // Identity Errors
    // -------------------------------------------------------------------------
    #[error("No entry with id {0}")]
    IdNotFound(u64),

    #[error("Ambiguous id {id}: {count} entries match")]
    DuplicateId { id: u64, count: usize },

    // -------------------------------------------------------------------------
    // Locking Errors
    // -------------------------------------------------------------------------
    #[error("Lock acquisition timed out after {timeout_ms} ms")]
    LockTimeout { timeout_ms: u64 },

    // -------------------------------------------------------------------------
    // Codec / Integrity Errors
    // -------------------------------------------------------------------------
    #[error("Corrupt directory entry: {0}")]
    CorruptEntry(String),

    #[error("Unknown type tag: {0}")]
    UnknownTypeTag(u32),

    #[error("Unsupported entry format version {found} (supported: {supported})")]
    UnsupportedVersion { found: u32, supported: u32 },

    #[error("Serialization error: {0}")]
    Serialization(String),

    // -------------------------------------------------------------------------
    // Registry Errors
    // -------------------------------------------------------------------------
    #[error("Registry error: {0}")]
    Registry(String),

    // -------------------------------------------------------------------------
    // Backing Store Errors
    // -------------------------------------------------------------------------
    #[error("Offset {index} out of bounds (capacity {capacity})")]
    OutOfBounds { index: u32, capacity: u32 },

    #[error("Range/data length mismatch: span covers {expected} bytes, got {actual}")]
    LengthMismatch { expected: u32, actual: u32 },

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}
