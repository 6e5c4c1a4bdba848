//! Snowflake ID Generator
//!
//! Time-ordered 63-bit IDs: 41 bits of milliseconds since [`EPOCH_MS`],
//! 5 bits machine, 5 bits node, 12 bits sequence.

use std::sync::atomic::{AtomicU64, Ordering};

/// Service epoch (2020-01-01T00:00:00.000Z)
pub const EPOCH_MS: u64 = 1_577_836_800_000;

const SEQUENCE_BITS: u64 = 12;
const SEQUENCE_MASK: u64 = (1 << SEQUENCE_BITS) - 1;

/// Snowflake ID generator
pub struct SnowflakeGenerator {
    machine_id: u64,
    node_id: u64,
    /// Last issued `(timestamp << 12) | sequence`
    state: AtomicU64,
}

impl SnowflakeGenerator {
    /// Create a new snowflake generator
    pub fn new(machine_id: u64, node_id: u64) -> Self {
        Self {
            machine_id: machine_id & 0x1F,
            node_id: node_id & 0x1F,
            state: AtomicU64::new(0),
        }
    }

    /// Generate a new snowflake ID
    pub fn generate(&self) -> i64 {
        let mut current = self.state.load(Ordering::Acquire);
        loop {
            let now = current_timestamp().saturating_sub(EPOCH_MS);
            let last_ts = current >> SEQUENCE_BITS;
            let last_seq = current & SEQUENCE_MASK;

            // Same (or regressed) millisecond: bump the sequence, borrowing the
            // next millisecond when it overflows.
            let next = if now > last_ts {
                now << SEQUENCE_BITS
            } else if last_seq < SEQUENCE_MASK {
                current + 1
            } else {
                (last_ts + 1) << SEQUENCE_BITS
            };

            match self
                .state
                .compare_exchange_weak(current, next, Ordering::AcqRel, Ordering::Acquire)
            {
                Ok(_) => {
                    let timestamp = next >> SEQUENCE_BITS;
                    let sequence = next & SEQUENCE_MASK;
                    let id = (timestamp << 22)
                        | (self.machine_id << 17)
                        | (self.node_id << 12)
                        | sequence;
                    return id as i64;
                }
                Err(observed) => current = observed,
            }
        }
    }
}

/// Current wall-clock time in milliseconds
fn current_timestamp() -> u64 {
    chrono::Utc::now().timestamp_millis().max(0) as u64
}

/// Extract the creation timestamp (Unix milliseconds) from a snowflake ID
pub fn extract_timestamp(snowflake: i64) -> u64 {
    ((snowflake as u64) >> 22) + EPOCH_MS
}
