//! Byte sections
//!
//! A [`ByteSection`] is a read/write window over a contiguous sub-range of
//! the backing store. It translates section-relative offsets to absolute
//! offsets and otherwise stays out of the way: bounds enforcement is the
//! backing store's job.
//!
//! The engine carves two sections out of the address space: the *metadata
//! section* (directory) and the *main section* (payloads and directory
//! entries).

use crate::backing::BackingStore;
use crate::error::Result;
use crate::span::Span;

/// A view over `[start, start + capacity)` of a backing store
pub struct ByteSection<'a, B: BackingStore> {
    backing: &'a B,
    start: u32,
    capacity: u32,
}

impl<'a, B: BackingStore> ByteSection<'a, B> {
    /// Create a section starting at absolute offset `start`
    pub fn new(backing: &'a B, start: u32, capacity: u32) -> Self {
        Self {
            backing,
            start,
            capacity,
        }
    }

    /// Section size in bytes
    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Read one byte at a section-relative offset
    pub fn get(&self, index: u32) -> Result<u8> {
        self.backing.get(index + self.start)
    }

    /// Write one byte at a section-relative offset
    pub fn set(&self, index: u32, value: u8) -> Result<()> {
        self.backing.set(index + self.start, value)
    }

    /// Read a section-relative inclusive range
    pub fn read(&self, span: Span) -> Result<Vec<u8>> {
        if span.is_empty() {
            return Ok(Vec::new());
        }
        self.backing.read(span.shift(self.start))
    }

    /// Write bytes over a section-relative inclusive range
    pub fn write(&self, span: Span, bytes: &[u8]) -> Result<()> {
        if span.is_empty() && bytes.is_empty() {
            return Ok(());
        }
        self.backing.write(span.shift(self.start), bytes)
    }

    /// The full section contents
    pub fn all(&self) -> Result<Vec<u8>> {
        self.read(Span::new(0, self.capacity - 1))
    }
}
