//! Weakly-hard (m,k) constraints derived from the anchor envelope.

use itertools::Itertools;

use crate::anchors::AnchorPoint;
use crate::time::{div_ceil, Duration};

/// For every window size `k` in `1..=max_window`, the tightest bound `m`
/// on the number of chain instances exceeding `bound` among any `k`
/// consecutive instances, reported as `(m, k)` pairs.
///
/// One chain instance starts with each source job, so instances occupy
/// slots of length `source_period`; within a segment of the
/// reaction-time envelope, the leading
/// `ceil((value - bound - source_period) / source_period)` slots fail
/// (clamped to the segment). The worst window always begins at the start
/// of a failing run, so only those offsets are enumerated.
pub fn weakly_hard_miss_bounds(
    anchors: &[AnchorPoint],
    source_period: Duration,
    hyperperiod: Duration,
    bound: Duration,
    max_window: usize,
) -> Vec<(usize, usize)> {
    let slots_per_hyperperiod = (hyperperiod / source_period) as usize;

    // Fail/pass pattern of one hyperperiod worth of source-job slots.
    // Anchor times of the reaction-time list sit on source read events,
    // so every segment length is an exact multiple of the source period.
    let mut pattern = Vec::with_capacity(slots_per_hyperperiod);
    for (cur, next) in anchors.iter().tuple_windows() {
        let segment_slots = (next.time - cur.time) / source_period;
        let failing = div_ceil(cur.value - bound - source_period, source_period)
            .clamp(0, segment_slots);
        for slot in 0..segment_slots {
            pattern.push(slot < failing);
        }
    }

    // Worst-case windows start where a failing run begins (cyclically).
    let starts: Vec<usize> = (0..pattern.len())
        .filter(|&i| pattern[i] && !pattern[(i + pattern.len() - 1) % pattern.len()])
        .collect();

    if starts.is_empty() {
        if pattern.iter().all(|&fail| fail) {
            // Every instance misses; m saturates at the window size.
            return (1..=max_window).map(|k| (k, k)).collect();
        }
        return (1..=max_window).map(|k| (0, k)).collect();
    }

    // Unroll the cyclic pattern far enough that every window fits.
    let needed = slots_per_hyperperiod + max_window;
    let slots: Vec<bool> = pattern.iter().copied().cycle().take(needed).collect();

    (1..=max_window)
        .map(|k| {
            let misses = starts
                .iter()
                .map(|&s| slots[s..s + k].iter().filter(|&&fail| fail).count())
                .max()
                .unwrap_or(0);
            (misses, k)
        })
        .collect()
}
