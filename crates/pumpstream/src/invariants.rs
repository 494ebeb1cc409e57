//! Debug assertion macros for stream invariants.
//!
//! These macros are only active in debug builds (`debug_assert!`), so there is
//! zero overhead in release builds.
//!
//! Used by both `BoundedBuffer` and `PumpAdapter`.

// =============================================================================
// Buffer conservation
// =============================================================================

/// Assert that a read removed exactly the bytes it returned from the head.
///
/// **Invariant**: `size_after == size_before - returned`
///
/// Used in: `BoundedBuffer::read()`, `BoundedBuffer::drain_all()`
macro_rules! debug_assert_conserved {
    ($before:expr, $returned:expr, $after:expr) => {
        debug_assert!(
            $before == $returned + $after,
            "buffer conservation violated: {} buffered, {} returned, {} left",
            $before,
            $returned,
            $after
        )
    };
}

/// Assert that a read returned fewer bytes than requested only when the
/// buffer was drained completely.
///
/// **Invariant**: `returned < requested → size_after == 0`
///
/// Used in: `BoundedBuffer::read()`
macro_rules! debug_assert_short_read_drains {
    ($requested:expr, $returned:expr, $after:expr) => {
        debug_assert!(
            $returned >= $requested || $after == 0,
            "short read of {} (requested {}) left {} bytes buffered",
            $returned,
            $requested,
            $after
        )
    };
}

// =============================================================================
// Pump position & producer lifecycle
// =============================================================================

/// Assert that the delivered position only increases.
///
/// **Invariant**: `new_position ≥ old_position`
///
/// Used in: `PumpAdapter::read()` after each drain of the staging buffer
macro_rules! debug_assert_monotonic {
    ($old:expr, $new:expr) => {
        debug_assert!(
            $new >= $old,
            "position decreased from {} to {}",
            $old,
            $new
        )
    };
}

/// Assert that a detached adapter never reaches its producer.
///
/// **Invariant**: `detached → producer is None`
///
/// Used in: `PumpAdapter::pump()` before each producer call
macro_rules! debug_assert_attached {
    ($attached:expr) => {
        debug_assert!(
            $attached,
            "producer invoked on a detached adapter"
        )
    };
}

// =============================================================================
// Re-exports for crate-internal use
// =============================================================================

pub(crate) use debug_assert_attached;
pub(crate) use debug_assert_conserved;
pub(crate) use debug_assert_monotonic;
pub(crate) use debug_assert_short_read_drains;
