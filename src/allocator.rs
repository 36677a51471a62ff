use core::cmp::Ordering;
use core::time::Duration;
use std::time::Instant;

use parking_lot::Mutex;
use tracing::warn;

use crate::{Error, Result, SequenceId, TimeSource, WallClock};

/// Upper bound on the sequence-exhaustion spin wait.
///
/// A working clock advances within about a millisecond, so this limit is
/// never reached in normal operation. Exceeding it means the time source is
/// frozen, and the allocation fails with [`Error::SequenceExhausted`] instead
/// of spinning forever.
pub const MAX_SEQUENCE_WAIT: Duration = Duration::from_secs(1);

/// A thread-safe allocator of unique, time-ordered 64-bit IDs.
///
/// Each instance owns a fixed node ID and a mutex-guarded
/// `(timestamp, sequence)` pair, stored as the last issued [`SequenceId`].
/// One allocation step runs at a time; callers never observe a half-updated
/// state. The expected usage pattern is a single instance per process (or per
/// logical shard needing a distinct node ID), constructed once and shared.
///
/// # Example
/// ```
/// use seqid::IdAllocator;
///
/// let allocator = IdAllocator::new(3).expect("node id in range");
/// let a = allocator.next_id().expect("healthy clock");
/// let b = allocator.next_id().expect("healthy clock");
/// assert_ne!(a, b);
/// assert_eq!(a.node_id(), 3);
/// ```
pub struct IdAllocator<T = WallClock>
where
    T: TimeSource,
{
    node_id: u64,
    state: Mutex<SequenceId>,
    time: T,
}

impl IdAllocator<WallClock> {
    /// Creates an allocator reading the system wall clock against
    /// [`CUSTOM_EPOCH`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidNodeId`] if `node_id` does not fit the 10-bit
    /// node field (`0..=1023`).
    ///
    /// [`CUSTOM_EPOCH`]: crate::CUSTOM_EPOCH
    pub fn new(node_id: i64) -> Result<Self> {
        Self::with_clock(node_id, WallClock::default())
    }
}

impl Default for IdAllocator<WallClock> {
    /// Constructs a single-node allocator with node ID 0.
    fn default() -> Self {
        Self {
            node_id: 0,
            state: Mutex::new(SequenceId::from_parts(0, 0, 0)),
            time: WallClock::default(),
        }
    }
}

impl<T> IdAllocator<T>
where
    T: TimeSource,
{
    /// Creates an allocator with an explicit time source.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidNodeId`] if `node_id` does not fit the 10-bit
    /// node field (`0..=1023`).
    pub fn with_clock(node_id: i64, time: T) -> Result<Self> {
        if node_id < 0 || node_id > SequenceId::max_node_id() as i64 {
            return Err(Error::InvalidNodeId { node_id });
        }
        let node_id = node_id as u64;
        Ok(Self {
            node_id,
            state: Mutex::new(SequenceId::from_parts(0, node_id, 0)),
            time,
        })
    }

    /// Returns the node ID embedded in every issued identifier.
    pub const fn node_id(&self) -> u64 {
        self.node_id
    }

    /// Issues the next unique ID.
    ///
    /// The timestamp field of successive IDs never decreases, and no two
    /// calls on the same instance return the same value. The clock is read
    /// while holding the instance lock, so the regression check below is
    /// deterministic with respect to this allocator's own history rather than
    /// a race artifact.
    ///
    /// If the 4096-per-millisecond sequence budget is exhausted, this call
    /// spins (holding the lock, so other callers queue behind it) until the
    /// clock advances to the next millisecond.
    ///
    /// # Errors
    ///
    /// - [`Error::ClockRegression`] if the clock reads earlier than the last
    ///   issued timestamp. State is left unchanged; retrying after the clock
    ///   stabilizes is the caller's decision.
    /// - [`Error::SequenceExhausted`] if the sequence overflowed and the
    ///   clock failed to advance within [`MAX_SEQUENCE_WAIT`].
    pub fn next_id(&self) -> Result<SequenceId> {
        let mut id = self.state.lock();
        let now = self.time.current_millis();

        match now.cmp(&id.timestamp()) {
            Ordering::Greater => {
                *id = id.rollover_to_timestamp(now);
                Ok(*id)
            }
            Ordering::Equal => {
                if id.has_sequence_room() {
                    *id = id.increment_sequence();
                    Ok(*id)
                } else {
                    let next = self.wait_for_next_millis(id.timestamp())?;
                    *id = id.rollover_to_timestamp(next);
                    Ok(*id)
                }
            }
            Ordering::Less => Err(Self::cold_clock_behind(now, id.timestamp())),
        }
    }

    /// Spins until the clock advances past `last`, bounded by
    /// [`MAX_SEQUENCE_WAIT`].
    fn wait_for_next_millis(&self, last: u64) -> Result<u64> {
        let started = Instant::now();
        loop {
            let now = self.time.current_millis();
            if now > last {
                return Ok(now);
            }
            let waited = started.elapsed();
            if waited >= MAX_SEQUENCE_WAIT {
                warn!(
                    last_timestamp = last,
                    ?waited,
                    "sequence exhausted and time source did not advance"
                );
                return Err(Error::SequenceExhausted { waited });
            }
            core::hint::spin_loop();
        }
    }

    #[cold]
    #[inline(never)]
    fn cold_clock_behind(observed: u64, last_timestamp: u64) -> Error {
        warn!(
            last_timestamp,
            observed, "clock moved backward; refusing to issue an ID"
        );
        Error::ClockRegression {
            last_timestamp,
            observed,
        }
    }
}
