/*! Metric evaluators over reduced anchor lists.

All functions here are pure, closed-form passes over the cyclic anchor
lists produced by [crate::anchors]. Because a reduced list always ends
with a copy of its first entry shifted by one hyperperiod, iterating
consecutive pairs covers exactly one period of the envelope; no function
in this module needs the chain itself.

The reaction-time envelope falls with slope -1 *after* each anchor, the
data-age envelope climbs with slope +1 *towards* each anchor. Functions
whose formulas depend on that orientation exist in `_rt` and `_da`
variants; mixing them up yields silently wrong results, so the distinct
formulas are kept side by side rather than unified.
*/

use itertools::Itertools;

use crate::anchors::AnchorPoint;
use crate::time::Duration;

mod exceedance;
mod weakly_hard;

pub use exceedance::{longest_exceedance, Exceedance};
pub use weakly_hard::weakly_hard_miss_bounds;

/// Largest envelope value: the worst-case end-to-end latency. Identical
/// for the reaction-time and data-age anchors of the same chain.
pub fn maximum(anchors: &[AnchorPoint]) -> Duration {
    anchors.iter().map(|a| a.value).max().unwrap_or(0)
}

/// Smallest reaction time attained: immediately before the jump at
/// `next`, the envelope has fallen to `cur.value - (next.time - cur.time)`.
pub fn minimum_rt(anchors: &[AnchorPoint]) -> Duration {
    anchors
        .iter()
        .tuple_windows()
        .map(|(cur, next)| cur.value - (next.time - cur.time))
        .min()
        .unwrap_or(0)
}

/// Smallest data age attained: immediately after the drop at `cur`, the
/// envelope restarts at `next.value - (next.time - cur.time)`.
pub fn minimum_da(anchors: &[AnchorPoint]) -> Duration {
    anchors
        .iter()
        .tuple_windows()
        .map(|(cur, next)| next.value - (next.time - cur.time))
        .min()
        .unwrap_or(0)
}

/// Time-weighted mean reaction time over one hyperperiod: trapezoid
/// integral of the piecewise-linear envelope, normalized.
pub fn average_rt(anchors: &[AnchorPoint], hyperperiod: Duration) -> f64 {
    let twice_integral: Duration = anchors
        .iter()
        .tuple_windows()
        .map(|(cur, next)| {
            let len = next.time - cur.time;
            let y_low = cur.value - len;
            len * (cur.value + y_low)
        })
        .sum();
    twice_integral as f64 / (2 * hyperperiod) as f64
}

/// Time-weighted mean data age over one hyperperiod.
pub fn average_da(anchors: &[AnchorPoint], hyperperiod: Duration) -> f64 {
    let twice_integral: Duration = anchors
        .iter()
        .tuple_windows()
        .map(|(cur, next)| {
            let len = next.time - cur.time;
            let y_low = next.value - len;
            len * (next.value + y_low)
        })
        .sum();
    twice_integral as f64 / (2 * hyperperiod) as f64
}

/// Rate of distinguishable chain completions: anchors per hyperperiod
/// (the closing copy does not count) divided by the hyperperiod.
pub fn throughput(anchors: &[AnchorPoint], hyperperiod: Duration) -> f64 {
    (anchors.len() - 1) as f64 / hyperperiod as f64
}

/// Reactivity bound: the largest segment-local envelope minimum plus the
/// release period of the source task.
pub fn reactivity(anchors: &[AnchorPoint], source_period: Duration) -> Duration {
    let max_local_min = anchors
        .iter()
        .tuple_windows()
        .map(|(cur, next)| cur.value - (next.time - cur.time))
        .max()
        .unwrap_or(0);
    max_local_min + source_period
}
