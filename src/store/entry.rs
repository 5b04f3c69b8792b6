//! Store Entry Module
//!
//! Defines the structure for individual store entries with deadline support.

use chrono::{DateTime, TimeDelta, Utc};

// == Store Entry ==
/// A stored value together with its absolute expiry deadline.
#[derive(Debug, Clone)]
pub struct StoreEntry<V> {
    /// The stored value
    pub value: V,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Expiration deadline, None = no expiration
    pub expires_at: Option<DateTime<Utc>>,
}

impl<V> StoreEntry<V> {
    // == Constructor ==
    /// Creates a new entry whose deadline is `now + ttl`.
    ///
    /// A negative or zero `ttl` produces an entry that is already expired.
    pub fn new(value: V, ttl: Option<TimeDelta>) -> Self {
        Self::created_at(value, ttl, Utc::now())
    }

    /// Creates a new entry relative to an explicit creation time.
    pub fn created_at(value: V, ttl: Option<TimeDelta>, now: DateTime<Utc>) -> Self {
        let expires_at = ttl.map(|ttl| {
            now.checked_add_signed(ttl).unwrap_or(if ttl < TimeDelta::zero() {
                DateTime::<Utc>::MIN_UTC
            } else {
                DateTime::<Utc>::MAX_UTC
            })
        });

        Self {
            value,
            created_at: now,
            expires_at,
        }
    }

    // == Is Expired ==
    /// Checks whether the deadline has passed at `now`.
    ///
    /// Boundary condition: an entry is expired once `now >= expires_at`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        match self.expires_at {
            Some(deadline) => now >= deadline,
            None => false,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    // == Time To Live ==
    /// Returns the remaining lifetime, or None if the entry never expires.
    ///
    /// Expired entries report zero.
    pub fn ttl_remaining(&self) -> Option<TimeDelta> {
        self.expires_at
            .map(|deadline| (deadline - Utc::now()).max(TimeDelta::zero()))
    }
}
