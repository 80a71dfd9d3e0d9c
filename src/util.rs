/// Numeric conversion helpers.
///
/// This module provides safe functions for converting between `i64` and
/// `f64` without silent data loss. The interpreter widens INTEGER values to
/// REAL in several places (assignment, argument passing, mixed arithmetic),
/// and the `INT` built-in narrows in the other direction; both directions go
/// through these helpers so that out-of-range values are diagnosed instead
/// of rounded.
pub mod num;
