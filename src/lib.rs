//! # spanstore
//!
//! A minimal embedded storage engine over a fixed, byte-addressable space:
//! - Variable-length records across any caller-supplied backing store
//! - Fragmentation-tolerant allocation with random spot placement
//! - A compact binary directory (entry count + entry pointers)
//! - Coarse whole-space mutual exclusion around writes
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        StorageEngine                         │
//! │          (store / get_by_id / all, poll-then-acquire)        │
//! └────────┬──────────────────┬──────────────────┬───────────────┘
//!          │                  │                  │
//!          ▼                  ▼                  ▼
//!   ┌─────────────┐    ┌──────────────┐   ┌─────────────┐
//!   │  Allocator  │    │ TypeRegistry │   │ LockBackend │
//!   │ (free spans)│    │ (tag ⇄ codec)│   │ (exclusion) │
//!   └──────┬──────┘    └──────────────┘   └─────────────┘
//!          │
//!          ▼
//!   ┌──────────────────────────────┐
//!   │ ByteSection (metadata / main)│
//!   └──────────────┬───────────────┘
//!                  │
//!                  ▼
//!   ┌──────────────────────────────┐
//!   │     BackingStore (bytes)     │
//!   └──────────────────────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod span;
pub mod backing;
pub mod section;
pub mod inode;
pub mod alloc;
pub mod registry;
pub mod lock;
pub mod interval;
pub mod engine;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{Result, StoreError};
pub use config::Config;
pub use span::Span;
pub use backing::{BackingStore, MemBacking};
pub use section::ByteSection;
pub use inode::{Inode, FORMAT_VERSION};
pub use registry::{DecodeFn, Record, TypeRegistry};
pub use lock::{LocalLock, LockBackend};
pub use interval::Interval;
pub use engine::StorageEngine;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of spanstore
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
