use serde::{Deserialize, Serialize};

use crate::time::{div_ceil, div_floor, Duration, Instant, JobIndex};

/// A periodic task communicating under logical-execution-time semantics:
/// job `idx` reads its inputs at release time `phase + idx * period` and
/// publishes its output at `phase + idx * period + deadline`.
///
/// Deadlines are arbitrary; in particular, a deadline may exceed the
/// period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Release offset of the first job.
    pub phase: Instant,
    /// The exact separation between two job releases.
    pub period: Duration,
    /// Offset of the write event relative to the read event.
    pub deadline: Duration,
}

impl Task {
    pub fn new(phase: Instant, period: Duration, deadline: Duration) -> Self {
        Task {
            phase,
            period,
            deadline,
        }
    }

    /// Read event of job `idx`.
    pub fn read_event(&self, idx: JobIndex) -> Instant {
        self.phase + idx * self.period
    }

    /// Write event of job `idx`.
    pub fn write_event(&self, idx: JobIndex) -> Instant {
        self.read_event(idx) + self.deadline
    }

    /// Index of the earliest job whose read event is no earlier than
    /// `time`.
    pub fn first_read_at_or_after(&self, time: Instant) -> JobIndex {
        div_ceil(time - self.phase, self.period).max(0)
    }

    /// Index of the latest job whose write event is no later than `time`.
    ///
    /// A negative index signals that no such job exists.
    pub fn last_write_at_or_before(&self, time: Instant) -> JobIndex {
        div_floor(time - self.phase - self.deadline, self.period)
    }
}

#[cfg(test)]
mod tests {
    use crate::tests::t;

    #[test]
    fn job_events() {
        let task = t(2, 10, 4);
        assert_eq!(task.read_event(0), 2);
        assert_eq!(task.read_event(3), 32);
        assert_eq!(task.write_event(0), 6);
        assert_eq!(task.write_event(3), 36);
    }

    #[test]
    fn inverse_read_query() {
        let task = t(0, 10, 10);
        assert_eq!(task.first_read_at_or_after(0), 0);
        assert_eq!(task.first_read_at_or_after(1), 1);
        assert_eq!(task.first_read_at_or_after(10), 1);
        assert_eq!(task.first_read_at_or_after(11), 2);
        // Never negative, even for queries before the first release.
        assert_eq!(task.first_read_at_or_after(-25), 0);

        let phased = t(3, 10, 10);
        assert_eq!(phased.first_read_at_or_after(3), 0);
        assert_eq!(phased.first_read_at_or_after(4), 1);
        assert_eq!(phased.first_read_at_or_after(13), 1);
    }

    #[test]
    fn inverse_write_query() {
        let task = t(0, 10, 10);
        assert_eq!(task.last_write_at_or_before(10), 0);
        assert_eq!(task.last_write_at_or_before(19), 0);
        assert_eq!(task.last_write_at_or_before(20), 1);
        // No job writes at or before time 9.
        assert!(task.last_write_at_or_before(9) < 0);

        // Arbitrary deadline exceeding the period.
        let long = t(0, 5, 12);
        assert_eq!(long.last_write_at_or_before(12), 0);
        assert_eq!(long.last_write_at_or_before(16), 0);
        assert_eq!(long.last_write_at_or_before(17), 1);
    }
}
