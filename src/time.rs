/// This library uses a simple discrete integer time model.
///
/// Time values are signed: inverse job-event queries subtract phases and
/// deadlines, and backward job-chain walks legitimately step before the
/// start of the schedule.
pub type Time = i64;

/// Syntactic sugar to give a hint that a time value indicates a
/// point in time or some offset.
pub type Instant = Time;

/// Syntactic sugar to give a hint that a time value denotes an
/// interval length.
pub type Duration = Time;

/// The occurrence count of a job of a periodic task.
///
/// Job indices are conceptually non-negative; a negative index is the
/// result of a backward job-chain query for which no job exists.
pub type JobIndex = i64;

/// Exact `ceil(a / b)` for a possibly negative numerator (`b > 0`).
pub(crate) fn div_ceil(a: Time, b: Time) -> Time {
    -((-a).div_euclid(b))
}

/// Exact `floor(a / b)` for a possibly negative numerator (`b > 0`).
pub(crate) fn div_floor(a: Time, b: Time) -> Time {
    a.div_euclid(b)
}
