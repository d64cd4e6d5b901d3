//! Records and the type registry
//!
//! Stored records are opaque to the engine: all it needs is to turn a record
//! into bytes at store time and, given a type tag, turn bytes back into a
//! record at retrieval time. The [`TypeRegistry`] holds that mapping,
//! registered once at startup and consumed by the engine only through this
//! interface.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;

use crate::error::{Result, StoreError};

/// A storable record: an opaque entity that serializes itself
///
/// Id uniqueness among live entries is the caller's obligation; the engine
/// does not validate it at store time, and a reused id makes `get_by_id`
/// fail with an ambiguity error.
pub trait Record: fmt::Debug + Send + Sync {
    /// Stable 64-bit identifier
    fn id(&self) -> u64;

    /// Serialize to bytes. The engine never inspects the contents.
    fn to_bytes(&self) -> Result<Vec<u8>>;

    /// Type-erasure escape hatch, used by the registry for tag lookup and by
    /// callers for downcasting retrieved records
    fn as_any(&self) -> &dyn Any;
}

/// Reconstructs a record from its id and payload bytes
pub type DecodeFn = Box<dyn Fn(u64, &[u8]) -> Result<Box<dyn Record>> + Send + Sync>;

/// Maps type tags to deserializers, and record types to tags
#[derive(Default)]
pub struct TypeRegistry {
    decoders: HashMap<u32, DecodeFn>,
    tags: HashMap<TypeId, u32>,
}

impl TypeRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a record type under `tag`
    ///
    /// Fails if either the tag or the type is already registered.
    pub fn register<T: Record + 'static>(&mut self, tag: u32, decode: DecodeFn) -> Result<()> {
        if self.decoders.contains_key(&tag) {
            return Err(StoreError::Registry(format!(
                "Tag {} already registered",
                tag
            )));
        }
        if self.tags.contains_key(&TypeId::of::<T>()) {
            return Err(StoreError::Registry(format!(
                "Type {} already registered",
                std::any::type_name::<T>()
            )));
        }
        self.decoders.insert(tag, decode);
        self.tags.insert(TypeId::of::<T>(), tag);
        Ok(())
    }

    /// Tag registered for this record's concrete type
    pub fn tag_of(&self, record: &dyn Record) -> Result<u32> {
        self.tags
            .get(&record.as_any().type_id())
            .copied()
            .ok_or_else(|| StoreError::Registry("Record type not registered".to_string()))
    }

    /// Reconstruct a record from its tag, id, and payload bytes
    pub fn decode(&self, tag: u32, id: u64, bytes: &[u8]) -> Result<Box<dyn Record>> {
        let decode = self
            .decoders
            .get(&tag)
            .ok_or(StoreError::UnknownTypeTag(tag))?;
        decode(id, bytes)
    }
}
