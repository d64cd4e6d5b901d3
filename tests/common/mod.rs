//! Shared test fixtures
//!
//! A small record type (serde + bincode), a registry that knows it, and
//! helpers for building engines over an in-memory backing store.

#![allow(dead_code)]

use std::any::Any;

use serde::{Deserialize, Serialize};
use spanstore::{
    Config, LocalLock, MemBacking, Record, Result, StorageEngine, StoreError, TypeRegistry,
};
use tracing_subscriber::EnvFilter;

/// Install a tracing subscriber honoring `RUST_LOG`, once per test binary.
/// Later calls (and parallel test threads) hit the global-default guard and
/// are ignored.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Type tag `Note` is registered under
pub const NOTE_TAG: u32 = 1;

/// A simple record with a variable-length body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: u64,
    pub body: String,
}

/// bincode overhead for a `Note`: u64 id + u64 string length
const NOTE_OVERHEAD: usize = 16;

impl Note {
    pub fn new(id: u64, body: impl Into<String>) -> Self {
        Self {
            id,
            body: body.into(),
        }
    }

    /// A note whose serialized form is exactly `len` bytes
    pub fn with_payload_len(id: u64, len: usize) -> Self {
        assert!(len >= NOTE_OVERHEAD, "payload cannot be smaller than {NOTE_OVERHEAD} bytes");
        Self::new(id, "x".repeat(len - NOTE_OVERHEAD))
    }
}

impl Record for Note {
    fn id(&self) -> u64 {
        self.id
    }

    fn to_bytes(&self) -> Result<Vec<u8>> {
        bincode::serialize(self).map_err(|e| StoreError::Serialization(e.to_string()))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Registry with `Note` registered under `NOTE_TAG`
pub fn registry() -> TypeRegistry {
    let mut registry = TypeRegistry::new();
    registry
        .register::<Note>(
            NOTE_TAG,
            Box::new(|_id, bytes| {
                bincode::deserialize::<Note>(bytes)
                    .map(|note| Box::new(note) as Box<dyn Record>)
                    .map_err(|e| StoreError::Serialization(e.to_string()))
            }),
        )
        .unwrap();
    registry
}

/// Engine over a fresh zero-filled `MemBacking` sized to the config
pub fn engine(config: Config) -> StorageEngine<MemBacking, LocalLock> {
    init_tracing();
    let capacity = config.metadata_capacity + config.main_capacity;
    StorageEngine::new(MemBacking::new(capacity), LocalLock::new(), registry(), config).unwrap()
}

/// Default-sized engine with a seeded RNG for deterministic placement
pub fn seeded_engine() -> StorageEngine<MemBacking, LocalLock> {
    engine(Config::builder().rng_seed(42).build())
}

/// Downcast a retrieved record back to a `Note`
pub fn as_note(record: &dyn Record) -> &Note {
    record
        .as_any()
        .downcast_ref::<Note>()
        .expect("record is not a Note")
}
