//! Port traits — the boundary between the kiosk core and the outside world.
//!
//! ```text
//!   Adapter ──▶ port trait ──▶ KioskService (domain)
//! ```
//!
//! Driven adapters (event sinks, tag sources, storage) implement these
//! traits; the service consumes them via generics and never touches
//! hardware or the network directly.

use crate::config::KioskConfig;
use crate::history::TagId;

// ───────────────────────────────────────────────────────────────
// Event sink (domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The kiosk emits structured [`KioskEvent`](super::events::KioskEvent)s
/// through this port.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::KioskEvent);
}

// ───────────────────────────────────────────────────────────────
// Tag source (scanner → domain)
// ───────────────────────────────────────────────────────────────

/// Accepted-scan feed. The RFID reader, its protocol, and the upstream
/// acceptance decision all live outside this crate; whatever implements
/// this port hands the core already-accepted tag ids.
pub trait TagSource {
    /// Next accepted tag id, if one arrived since the last poll.
    fn poll_tag(&mut self) -> Option<TagId>;
}

// ───────────────────────────────────────────────────────────────
// Configuration port (domain ↔ persistent config)
// ───────────────────────────────────────────────────────────────

/// Loads and persists kiosk configuration.
///
/// Implementations MUST validate before persisting — invalid ranges are
/// rejected with [`ConfigError::ValidationFailed`], not silently clamped.
pub trait ConfigPort {
    /// Load configuration from persistent storage.
    fn load(&self) -> Result<KioskConfig, ConfigError>;

    /// Validate and persist configuration.
    fn save(&self, config: &KioskConfig) -> Result<(), ConfigError>;
}

// ───────────────────────────────────────────────────────────────
// Storage port (domain ↔ NVS / flash)
// ───────────────────────────────────────────────────────────────

/// Persistent key-value storage (NVS on the device, in-memory on the host).
/// Write operations must be atomic — no partial writes on power loss.
pub trait StoragePort {
    /// Read a value. Returns the number of bytes written to `buf`.
    fn read(&self, namespace: &str, key: &str, buf: &mut [u8]) -> Result<usize, StorageError>;

    /// Write a value atomically.
    fn write(&mut self, namespace: &str, key: &str, data: &[u8]) -> Result<(), StorageError>;

    /// Delete a key. `Ok(())` even if the key didn't exist.
    fn delete(&mut self, namespace: &str, key: &str) -> Result<(), StorageError>;

    /// Check whether a key exists without reading it.
    fn exists(&self, namespace: &str, key: &str) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from [`ConfigPort`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// No config found in storage (first boot).
    NotFound,
    /// Stored config failed deserialization.
    Corrupted,
    /// A config field failed range validation.
    ValidationFailed(&'static str),
    /// Generic I/O error from the storage backend.
    IoError,
}

/// Errors from [`StoragePort`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageError {
    /// Requested key does not exist.
    NotFound,
    /// Storage partition is full.
    Full,
    /// Generic I/O error.
    IoError,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotFound => write!(f, "config not found"),
            Self::Corrupted => write!(f, "config corrupted"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {msg}"),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}

impl core::fmt::Display for StorageError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotFound => write!(f, "key not found"),
            Self::Full => write!(f, "storage full"),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}
