use core::time::Duration;

/// A result type defaulting to this crate's [`Error`].
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// All possible errors that `seqid` can produce.
///
/// Construction fails only on an out-of-range node ID. At allocation time the
/// only failure modes are the two clock anomalies: an observed regression and
/// a time source that refuses to advance. Neither is retried internally —
/// masking either one risks issuing a duplicate ID, which is the one thing
/// this crate must never do.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The configured node ID does not fit in the 10-bit node field.
    ///
    /// Returned from construction; the valid range is `0..=1023`.
    #[error("node id {node_id} out of range (expected 0..={max})", max = crate::SequenceId::NODE_ID_MASK)]
    InvalidNodeId {
        /// The rejected node ID.
        node_id: i64,
    },

    /// The time source reported a millisecond earlier than the last issued
    /// timestamp.
    ///
    /// This typically means the wall clock was stepped backward (e.g. by an
    /// NTP correction). The allocator refuses to issue an ID rather than
    /// reuse or falsify a timestamp, and leaves its state untouched; the
    /// caller decides whether to retry once the clock stabilizes, abort, or
    /// escalate.
    #[error("clock moved backward: last issued timestamp {last_timestamp}, observed {observed}")]
    ClockRegression {
        /// Milliseconds since the epoch at the last successful allocation.
        last_timestamp: u64,
        /// Milliseconds since the epoch as currently observed.
        observed: u64,
    },

    /// The per-millisecond sequence was exhausted and the time source did not
    /// advance within [`MAX_SEQUENCE_WAIT`].
    ///
    /// Under a working clock, sequence exhaustion resolves itself within
    /// about a millisecond and never surfaces as an error. Hitting this
    /// variant means the time source is frozen or broken.
    ///
    /// [`MAX_SEQUENCE_WAIT`]: crate::MAX_SEQUENCE_WAIT
    #[error("sequence exhausted and clock did not advance within {waited:?}")]
    SequenceExhausted {
        /// How long the allocator spun before giving up.
        waited: Duration,
    },
}
