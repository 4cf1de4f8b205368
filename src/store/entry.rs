//! Store Entry Module
//!
//! Defines the structure for individual in-process store entries with TTL support.

use std::time::Duration;

use tokio::time::Instant;

// == Entry Value ==
/// Payload held under a key: a plain byte string or a list of byte strings.
#[derive(Debug, Clone, PartialEq)]
pub enum EntryValue {
    Bytes(Vec<u8>),
    List(Vec<Vec<u8>>),
}

// == Store Entry ==
/// Represents a single store entry with value and expiry metadata.
#[derive(Debug, Clone)]
pub struct StoreEntry {
    /// The stored payload
    pub value: EntryValue,
    /// Expiration instant on the tokio clock, None = no expiration
    pub expires_at: Option<Instant>,
}

impl StoreEntry {
    // == Constructor ==
    /// Creates a new entry with optional TTL.
    pub fn new(value: EntryValue, ttl: Option<Duration>) -> Self {
        Self {
            value,
            expires_at: ttl.map(|ttl| Instant::now() + ttl),
        }
    }

    /// Creates a byte string entry with no expiration.
    pub fn bytes(value: &[u8]) -> Self {
        Self::new(EntryValue::Bytes(value.to_vec()), None)
    }

    // == Is Expired ==
    /// Checks if the entry has expired.
    ///
    /// An entry is expired once the current time reaches its expiration
    /// instant, so a read exactly at the TTL boundary is already a miss.
    pub fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(expires) => Instant::now() >= expires,
            None => false,
        }
    }

    // == Time To Live ==
    /// Returns the remaining lifetime, or None if no expiration is set.
    pub fn ttl_remaining(&self) -> Option<Duration> {
        self.expires_at
            .map(|expires| expires.saturating_duration_since(Instant::now()))
    }
}
