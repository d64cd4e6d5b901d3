//! Backing byte store
//!
//! The engine never owns its bytes: it drives any fixed address space that
//! can read and write single bytes and ranges at absolute offsets (memory,
//! a file, a network buffer, device registers). [`MemBacking`] is the
//! in-memory implementation used by tests and by embedders that have no
//! medium of their own.

use parking_lot::RwLock;

use crate::error::{Result, StoreError};
use crate::span::Span;

/// Byte-level access to a fixed address space
///
/// All offsets are absolute. The store enforces its own bounds; everything
/// above it (sections, the engine) trusts those checks.
pub trait BackingStore: Send + Sync {
    /// Total addressable bytes
    fn capacity(&self) -> u32;

    /// Read a single byte
    fn get(&self, index: u32) -> Result<u8>;

    /// Write a single byte
    fn set(&self, index: u32, value: u8) -> Result<()>;

    /// Read an inclusive range of bytes
    fn read(&self, span: Span) -> Result<Vec<u8>>;

    /// Write bytes over an inclusive range
    ///
    /// `bytes.len()` must equal the span length.
    fn write(&self, span: Span, bytes: &[u8]) -> Result<()>;
}

/// Fixed-size in-memory backing store
///
/// Uses interior mutability (RwLock) so one instance can be shared across
/// threads; serializing writers is the engine's job, not this type's.
pub struct MemBacking {
    bytes: RwLock<Vec<u8>>,
}

impl MemBacking {
    /// Create a zero-filled store of `capacity` bytes
    pub fn new(capacity: u32) -> Self {
        Self {
            bytes: RwLock::new(vec![0; capacity as usize]),
        }
    }

    fn check(&self, index: u32) -> Result<()> {
        let capacity = self.capacity();
        if index >= capacity {
            return Err(StoreError::OutOfBounds { index, capacity });
        }
        Ok(())
    }
}

impl BackingStore for MemBacking {
    fn capacity(&self) -> u32 {
        self.bytes.read().len() as u32
    }

    fn get(&self, index: u32) -> Result<u8> {
        self.check(index)?;
        Ok(self.bytes.read()[index as usize])
    }

    fn set(&self, index: u32, value: u8) -> Result<()> {
        self.check(index)?;
        self.bytes.write()[index as usize] = value;
        Ok(())
    }

    fn read(&self, span: Span) -> Result<Vec<u8>> {
        if span.is_empty() {
            return Ok(Vec::new());
        }
        self.check(span.end)?;
        Ok(self.bytes.read()[span.start as usize..=span.end as usize].to_vec())
    }

    fn write(&self, span: Span, bytes: &[u8]) -> Result<()> {
        if bytes.len() as u32 != span.len() {
            return Err(StoreError::LengthMismatch {
                expected: span.len(),
                actual: bytes.len() as u32,
            });
        }
        if span.is_empty() {
            return Ok(());
        }
        self.check(span.end)?;
        self.bytes.write()[span.start as usize..=span.end as usize].copy_from_slice(bytes);
        Ok(())
    }
}
