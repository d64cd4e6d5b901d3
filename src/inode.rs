//! Directory entries
//!
//! An [`Inode`] records where one stored record's payload lives (an ordered
//! list of spans in the main section whose concatenated bytes reconstitute
//! the serialized payload), which type tag deserializes it, the on-disk
//! format version, and the record's stable 64-bit id.
//!
//! ## Serialized Form
//!
//! ```text
//! ┌───────────┬──────────────────────┬─────────┬────────────┬─────────┐
//! │ Spans (4) │ start(4) end(4) × N  │ Tag (4) │ Version(4) │ Id (8)  │
//! └───────────┴──────────────────────┴─────────┴────────────┴─────────┘
//! ```
//!
//! All integers big-endian. Span offsets are main-section-relative and
//! inclusive on both ends.

use bytes::{Buf, BufMut};

use crate::error::{Result, StoreError};
use crate::span::Span;

/// On-disk format version written by this engine
///
/// Stored in every entry for forward compatibility; no migration exists yet,
/// so reading any other version fails.
pub const FORMAT_VERSION: u32 = 0;

/// A directory entry: one stored record's placement and identity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inode {
    /// Payload spans, in payload order. More than one only when the payload
    /// was fragmented across non-contiguous free space.
    pub spans: Vec<Span>,

    /// Type tag resolved through the type registry
    pub type_tag: u32,

    /// On-disk format version of the record layout
    pub version: u32,

    /// Stable identifier, supplied by the caller
    pub id: u64,
}

impl Inode {
    /// Create an entry at the current format version
    pub fn new(spans: Vec<Span>, type_tag: u32, id: u64) -> Self {
        Self {
            spans,
            type_tag,
            version: FORMAT_VERSION,
            id,
        }
    }

    /// Total payload bytes the spans cover
    pub fn payload_len(&self) -> u32 {
        self.spans.iter().map(Span::len).sum()
    }

    /// Serialized size in bytes
    pub fn encoded_len(&self) -> u32 {
        (4 + 8 * self.spans.len() + 4 + 4 + 8) as u32
    }

    /// Serialize to the binary layout above
    pub fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.encoded_len() as usize);
        buf.put_u32(self.spans.len() as u32);
        for span in &self.spans {
            buf.put_u32(span.start);
            buf.put_u32(span.end);
        }
        buf.put_u32(self.type_tag);
        buf.put_u32(self.version);
        buf.put_u64(self.id);
        buf
    }

    /// Deserialize from the binary layout above
    ///
    /// Symmetric with [`encode`](Inode::encode): `decode(encode(x)) == x`
    /// for every valid entry. Truncated or over-long input is rejected.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let mut buf = bytes;
        if buf.remaining() < 4 {
            return Err(StoreError::CorruptEntry(
                "Missing span count".to_string(),
            ));
        }
        let count = buf.get_u32() as usize;
        let body_len = count * 8 + 4 + 4 + 8;
        if buf.remaining() < body_len {
            return Err(StoreError::CorruptEntry(format!(
                "Truncated entry: {} spans declared, {} of {} body bytes present",
                count,
                buf.remaining(),
                body_len
            )));
        }

        let mut spans = Vec::with_capacity(count);
        for _ in 0..count {
            let start = buf.get_u32();
            let end = buf.get_u32();
            spans.push(Span::new(start, end));
        }
        let type_tag = buf.get_u32();
        let version = buf.get_u32();
        let id = buf.get_u64();

        if buf.has_remaining() {
            return Err(StoreError::CorruptEntry(format!(
                "{} trailing bytes after entry",
                buf.remaining()
            )));
        }

        Ok(Self {
            spans,
            type_tag,
            version,
            id,
        })
    }

    /// Check every span against the main section bounds
    ///
    /// A degenerate or out-of-section span means the directory no longer
    /// describes real payload bytes; surface that instead of returning
    /// truncated data.
    pub fn validate(&self, main_capacity: u32) -> Result<()> {
        for span in &self.spans {
            if span.is_empty() || span.end >= main_capacity {
                return Err(StoreError::CorruptEntry(format!(
                    "Entry {}: span {} outside main section of {} bytes",
                    self.id, span, main_capacity
                )));
            }
        }
        Ok(())
    }
}
