//! Generators for handler action identifiers.
//!
//! Documents written before `actionId` existed carry handlers without one;
//! the normalizer assigns a fresh identifier from an [`IdGenerator`].

use std::sync::atomic::{AtomicU64, Ordering};

use uuid::Uuid;

/// Source of identifiers for handlers that lack an `actionId`
#[cfg_attr(test, mockall::automock)]
pub trait IdGenerator: Send + Sync {
    /// Produce a new, non-empty identifier
    fn next_id(&self) -> String;
}

// Shared by every clock generator so ids stay unique across normalizers
static LAST_CLOCK_ID: AtomicU64 = AtomicU64::new(0);

/// Numeric identifiers derived from the wall clock (nanoseconds since the Unix
/// epoch), bumped so that no two ids issued in this process are equal.
#[derive(Debug, Clone, Copy, Default)]
pub struct MonotonicClockIds;

impl IdGenerator for MonotonicClockIds {
    fn next_id(&self) -> String {
        let now = chrono::Utc::now()
            .timestamp_nanos_opt()
            .and_then(|nanos| u64::try_from(nanos).ok())
            .unwrap_or_default();

        let previous = LAST_CLOCK_ID
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                Some(now.max(last.saturating_add(1)))
            })
            .unwrap_or_else(|last| last);

        now.max(previous.saturating_add(1)).to_string()
    }
}

/// Decimal counter identifiers
#[derive(Debug)]
pub struct SequentialIds {
    next: AtomicU64,
}

impl SequentialIds {
    /// Start counting at `start`
    pub fn starting_at(start: u64) -> Self {
        Self {
            next: AtomicU64::new(start),
        }
    }
}

impl Default for SequentialIds {
    fn default() -> Self {
        Self::starting_at(1)
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&self) -> String {
        self.next.fetch_add(1, Ordering::Relaxed).to_string()
    }
}

/// Random UUID v4 identifiers
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidIds;

impl IdGenerator for UuidIds {
    fn next_id(&self) -> String {
        Uuid::new_v4().to_string()
    }
}
