//! Longest consecutive time above a latency bound.

use derive_more::Display;
use itertools::Itertools;
use serde::{Serialize, Serializer};

use crate::anchors::AnchorPoint;
use crate::time::{Duration, Instant};

/// Length of the longest contiguous interval during which the envelope
/// exceeds a bound. Unbounded means the envelope never recovers below
/// the bound at all.
///
/// Serializes as a plain number, or as the string `"infinite"` when
/// unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Exceedance {
    #[display(fmt = "{}", _0)]
    Finite(Duration),
    #[display(fmt = "infinite")]
    Unbounded,
}

impl Serialize for Exceedance {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Exceedance::Finite(len) => serializer.serialize_i64(*len),
            Exceedance::Unbounded => serializer.serialize_str("infinite"),
        }
    }
}

/// Longest consecutive exceedance of `bound` by the reaction-time
/// envelope.
///
/// Each segment whose anchor value exceeds the bound contributes the
/// interval from its anchor until the envelope either falls back to the
/// bound or the next anchor takes over. To catch runs that straddle the
/// cyclic boundary, all intervals are duplicated one hyperperiod later
/// before merging; a merged run covering the entire doubled window means
/// the envelope never recovers.
pub fn longest_exceedance(
    anchors: &[AnchorPoint],
    hyperperiod: Duration,
    bound: Duration,
) -> Exceedance {
    let mut intervals: Vec<(Instant, Instant)> = anchors
        .iter()
        .tuple_windows()
        .filter(|(cur, _)| cur.value > bound)
        .map(|(cur, next)| {
            let len = (cur.value - bound).min(next.time - cur.time);
            (cur.time, cur.time + len)
        })
        .collect();
    if intervals.is_empty() {
        return Exceedance::Finite(0);
    }
    let shifted: Vec<_> = intervals
        .iter()
        .map(|&(from, to)| (from + hyperperiod, to + hyperperiod))
        .collect();
    intervals.extend(shifted);

    // Merge abutting and overlapping intervals; the input is already
    // sorted by start time.
    let mut longest = 0;
    let (mut from, mut to) = intervals[0];
    for &(next_from, next_to) in &intervals[1..] {
        if next_from <= to {
            to = to.max(next_to);
        } else {
            longest = longest.max(to - from);
            from = next_from;
            to = next_to;
        }
    }
    longest = longest.max(to - from);

    if longest >= 2 * hyperperiod {
        Exceedance::Unbounded
    } else {
        Exceedance::Finite(longest)
    }
}
