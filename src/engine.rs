//! Engine Module
//!
//! The core storage engine that coordinates all components.
//!
//! ## Responsibilities
//! - Partition the backing store into the metadata and main sections
//! - Serialize records and place them in free space (contiguous when
//!   possible, fragmented otherwise)
//! - Maintain the directory: entry count plus pointers to entry records
//! - Serialize writers through the lock backend's poll-then-acquire protocol

use std::time::Duration;

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::debug;

use crate::alloc;
use crate::backing::BackingStore;
use crate::config::Config;
use crate::error::{Result, StoreError};
use crate::inode::{Inode, FORMAT_VERSION};
use crate::lock::LockBackend;
use crate::registry::{Record, TypeRegistry};
use crate::section::ByteSection;
use crate::span::Span;

/// Bytes holding the directory entry count at metadata offset 0
const COUNT_LEN: u32 = 4;

/// Bytes per directory slot (u32 start + u32 end)
const SLOT_LEN: u32 = 8;

/// The main storage engine
///
/// ## Concurrency Model: Single Writer / Unlocked Readers
///
/// - **Writes** (`store`): one at a time across every handle sharing the
///   same backing store. Waiters poll the lock backend's status at the
///   configured interval, then block in its `acquire` for at most the
///   configured timeout. Waiters spin rather than queue, so no fairness
///   ordering is guaranteed among them.
/// - **Reads** (`all`/`get_by_id`): take no lock. A reader overlapping an
///   in-progress `store` can observe the incremented directory count before
///   the matching entry and payload bytes have landed (a torn read).
///   Accepted risk, kept from the reference design; callers needing
///   consistent reads can hold the lock backend around them.
pub struct StorageEngine<B: BackingStore, L: LockBackend> {
    /// Engine configuration (section sizes, lock timing, RNG seed)
    config: Config,

    /// The fixed byte address space this engine manages
    backing: B,

    /// Mutual exclusion for mutating operations
    lock: L,

    /// Type tag ⇄ serializer mapping for stored records
    registry: TypeRegistry,

    /// Spot-selection randomness; seedable for deterministic tests
    rng: Mutex<StdRng>,
}

impl<B: BackingStore, L: LockBackend> StorageEngine<B, L> {
    /// Create an engine over `backing`, fixing both sections
    ///
    /// Section sizes come from the config, never from the backing store;
    /// the store only has to be large enough to hold both.
    pub fn new(backing: B, lock: L, registry: TypeRegistry, config: Config) -> Result<Self> {
        let needed = u64::from(config.metadata_capacity) + u64::from(config.main_capacity);
        if u64::from(backing.capacity()) < needed {
            return Err(StoreError::Config(format!(
                "Backing store too small: {} bytes, need {}",
                backing.capacity(),
                needed
            )));
        }
        if config.metadata_capacity < COUNT_LEN + SLOT_LEN {
            return Err(StoreError::Config(format!(
                "Metadata section of {} bytes cannot hold a single directory slot",
                config.metadata_capacity
            )));
        }
        if config.main_capacity == 0 {
            return Err(StoreError::Config("Main section is empty".to_string()));
        }

        let rng = match config.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Ok(Self {
            config,
            backing,
            lock,
            registry,
            rng: Mutex::new(rng),
        })
    }

    // =========================================================================
    // Read Path
    // =========================================================================

    /// Retrieve every stored record, in directory insertion order
    pub fn all(&self) -> Result<Vec<Box<dyn Record>>> {
        self.inodes()?
            .iter()
            .map(|inode| self.retrieve(inode))
            .collect()
    }

    /// Retrieve the single record with the given id
    ///
    /// Zero matches and multiple matches are both errors; ambiguity from a
    /// reused id is never silently resolved to the first match.
    pub fn get_by_id(&self, id: u64) -> Result<Box<dyn Record>> {
        let inodes = self.inodes()?;
        let matches: Vec<&Inode> = inodes.iter().filter(|inode| inode.id == id).collect();
        match matches.len() {
            0 => Err(StoreError::IdNotFound(id)),
            1 => self.retrieve(matches[0]),
            count => Err(StoreError::DuplicateId { id, count }),
        }
    }

    /// Reassemble and deserialize one record from its directory entry
    fn retrieve(&self, inode: &Inode) -> Result<Box<dyn Record>> {
        if inode.version != FORMAT_VERSION {
            return Err(StoreError::UnsupportedVersion {
                found: inode.version,
                supported: FORMAT_VERSION,
            });
        }
        inode.validate(self.config.main_capacity)?;

        let main = self.main();
        let mut payload = Vec::with_capacity(inode.payload_len() as usize);
        for span in &inode.spans {
            payload.extend_from_slice(&main.read(*span)?);
        }
        self.registry.decode(inode.type_tag, inode.id, &payload)
    }

    // =========================================================================
    // Write Path
    // =========================================================================

    /// Store a record
    ///
    /// Steps:
    /// 1. Wait for the lock backend to read unlocked, then acquire it
    /// 2. Serialize the record
    /// 3. Allocate: one contiguous spot if any gap fits (random choice),
    ///    else fragments across the largest gaps
    /// 4. Persist the directory entry (placed clear of the payload spans)
    ///    and its metadata slot
    /// 5. Write the payload chunks
    ///
    /// A failure after step 1 releases the lock before propagating; nothing
    /// is rolled back beyond that (no transactional write).
    pub fn store(&self, record: &dyn Record) -> Result<()> {
        self.wait_and_acquire()?;
        let result = self.store_locked(record);
        // Release on the error path too; the reference design leaked the
        // lock when a store failed mid-flight.
        self.lock.release();
        result
    }

    /// Poll-then-acquire: spin on the observable status at the configured
    /// interval, then block in the backend's own acquire with the configured
    /// timeout
    ///
    /// The poll loop retries indefinitely; only the acquire is bounded.
    fn wait_and_acquire(&self) -> Result<()> {
        let poll = Duration::from_millis(self.config.lock_poll_interval_ms);
        while self.lock.is_locked() {
            std::thread::sleep(poll);
        }
        self.lock
            .acquire(Duration::from_millis(self.config.lock_timeout_ms))
    }

    /// The mutation steps, run with the lock held
    fn store_locked(&self, record: &dyn Record) -> Result<()> {
        let payload = record.to_bytes()?;
        if payload.is_empty() {
            return Err(StoreError::Serialization(
                "Record serialized to zero bytes".to_string(),
            ));
        }
        let size = payload.len() as u32;
        let type_tag = self.registry.tag_of(record)?;

        // Step 1: current free space, no reservations yet
        let occupied = self.occupied_spans(&[])?;
        let free = alloc::free_spans(self.config.main_capacity, &occupied, 1);

        // Step 2: one contiguous spot when any gap fits, fragments otherwise
        let spans = {
            let mut rng = self.rng.lock();
            match alloc::pick_spot(&free, size, &mut *rng) {
                Some(spot) => vec![spot],
                None => alloc::fragment(&free, size)?,
            }
        };

        debug!(
            id = record.id(),
            size,
            fragments = spans.len(),
            "storing record"
        );

        // Step 3: directory entry first, then the payload. A concurrent
        // unlocked reader can observe the new count before the payload bytes
        // land; see the module doc.
        let inode = Inode::new(spans.clone(), type_tag, record.id());
        self.persist_inode(&inode, &spans)?;

        // Step 4: payload chunks, sliced to the chosen span lengths
        let main = self.main();
        let mut offset = 0usize;
        for span in &spans {
            let next = offset + span.len() as usize;
            main.write(*span, &payload[offset..next])?;
            offset = next;
        }
        Ok(())
    }

    /// Write a directory entry into free space and append its metadata slot
    ///
    /// `reserved` carries the payload spans already chosen for the record
    /// this entry describes, so the entry's own storage never overlaps the
    /// payload it points at.
    fn persist_inode(&self, inode: &Inode, reserved: &[Span]) -> Result<()> {
        let count = self.entry_count()?;
        let slot_base = COUNT_LEN + count * SLOT_LEN;
        if slot_base + SLOT_LEN > self.config.metadata_capacity {
            return Err(StoreError::DirectoryFull {
                capacity: (self.config.metadata_capacity - COUNT_LEN) / SLOT_LEN,
            });
        }

        let encoded = inode.encode();
        let occupied = self.occupied_spans(reserved)?;
        let free = alloc::free_spans(self.config.main_capacity, &occupied, 1);
        let spot = {
            let mut rng = self.rng.lock();
            alloc::pick_spot(&free, encoded.len() as u32, &mut *rng).ok_or_else(|| {
                // The entry needs one contiguous spot; report the largest gap.
                StoreError::Exhausted {
                    requested: encoded.len() as u32,
                    available: free.iter().map(Span::len).max().unwrap_or(0),
                }
            })?
        };

        self.main().write(spot, &encoded)?;

        let metadata = self.metadata();
        metadata.write(Span::with_len(slot_base, 4), &spot.start.to_be_bytes())?;
        metadata.write(Span::with_len(slot_base + 4, 4), &spot.end.to_be_bytes())?;
        metadata.write(Span::new(0, COUNT_LEN - 1), &(count + 1).to_be_bytes())?;
        Ok(())
    }

    /// Everything currently occupying the main section: the payload spans of
    /// every entry, the entry storage spans themselves, plus `extra`
    /// reservations for an allocation in progress
    fn occupied_spans(&self, extra: &[Span]) -> Result<Vec<Span>> {
        let mut occupied = Vec::new();
        for inode in self.inodes()? {
            occupied.extend(inode.spans);
        }
        occupied.extend(self.inode_spans()?);
        occupied.extend_from_slice(extra);
        Ok(occupied)
    }

    // =========================================================================
    // Directory Access
    // =========================================================================

    /// Number of directory entries
    pub fn entry_count(&self) -> Result<u32> {
        let bytes = self.metadata().read(Span::new(0, COUNT_LEN - 1))?;
        Ok(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// Storage spans of every directory entry, in directory order
    ///
    /// Exposed for tests and debugging.
    pub fn inode_spans(&self) -> Result<Vec<Span>> {
        let count = self.entry_count()?;
        let metadata = self.metadata();
        let mut spans = Vec::with_capacity(count as usize);
        for i in 0..count {
            let base = COUNT_LEN + i * SLOT_LEN;
            let slot = metadata.read(Span::with_len(base, SLOT_LEN))?;
            let start = u32::from_be_bytes([slot[0], slot[1], slot[2], slot[3]]);
            let end = u32::from_be_bytes([slot[4], slot[5], slot[6], slot[7]]);
            spans.push(Span::new(start, end));
        }
        Ok(spans)
    }

    /// Decode every directory entry, in insertion order
    ///
    /// Exposed for tests and debugging.
    pub fn inodes(&self) -> Result<Vec<Inode>> {
        let main = self.main();
        let mut inodes = Vec::new();
        for span in self.inode_spans()? {
            let bytes = main.read(span)?;
            inodes.push(Inode::decode(&bytes)?);
        }
        Ok(inodes)
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    // =========================================================================
    // Section Views
    // =========================================================================

    fn metadata(&self) -> ByteSection<'_, B> {
        ByteSection::new(&self.backing, 0, self.config.metadata_capacity)
    }

    fn main(&self) -> ByteSection<'_, B> {
        ByteSection::new(
            &self.backing,
            self.config.metadata_capacity,
            self.config.main_capacity,
        )
    }
}
