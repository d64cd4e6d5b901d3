//! Configuration for spanstore
//!
//! Centralized configuration with sensible defaults.

/// Main configuration for a storage engine instance
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Address Space Configuration
    // -------------------------------------------------------------------------
    /// Size of the metadata section in bytes (entry count + directory slots).
    /// Occupies `[0, metadata_capacity)` of the backing store.
    pub metadata_capacity: u32,

    /// Size of the main section in bytes (record payloads and directory
    /// entries). Occupies `[metadata_capacity, metadata_capacity +
    /// main_capacity)` of the backing store.
    pub main_capacity: u32,

    // -------------------------------------------------------------------------
    // Locking Configuration
    // -------------------------------------------------------------------------
    /// How often to poll the lock backend's status while waiting (milliseconds)
    pub lock_poll_interval_ms: u64,

    /// Upper bound for the backend's blocking acquire (milliseconds)
    pub lock_timeout_ms: u64,

    // -------------------------------------------------------------------------
    // Allocation Configuration
    // -------------------------------------------------------------------------
    /// Seed for the spot-selection RNG. `None` seeds from OS entropy;
    /// set it to make placement deterministic in tests.
    pub rng_seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            metadata_capacity: 1024,
            main_capacity: 2048,
            lock_poll_interval_ms: 10,
            lock_timeout_ms: 30_000,
            rng_seed: None,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the metadata section size (in bytes)
    pub fn metadata_capacity(mut self, bytes: u32) -> Self {
        self.config.metadata_capacity = bytes;
        self
    }

    /// Set the main section size (in bytes)
    pub fn main_capacity(mut self, bytes: u32) -> Self {
        self.config.main_capacity = bytes;
        self
    }

    /// Set the lock status poll interval (in milliseconds)
    pub fn lock_poll_interval_ms(mut self, ms: u64) -> Self {
        self.config.lock_poll_interval_ms = ms;
        self
    }

    /// Set the lock acquisition timeout (in milliseconds)
    pub fn lock_timeout_ms(mut self, ms: u64) -> Self {
        self.config.lock_timeout_ms = ms;
        self
    }

    /// Seed the spot-selection RNG for deterministic placement
    pub fn rng_seed(mut self, seed: u64) -> Self {
        self.config.rng_seed = Some(seed);
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
