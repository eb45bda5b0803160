/*! Exact end-to-end latency analysis for cause-effect chains.

A *cause-effect chain* is an ordered sequence of independently released
periodic tasks whose outputs causally feed into each other: a data
pipeline across tasks with different, generally non-harmonic periods.
This crate computes exact worst-case and statistical timing properties
of such chains: *reaction time* (stimulus read until final effect
written) and *data age* (staleness of the data consumed downstream),
together with weakly-hard relaxations of both.

The core is the anchor-point reduction in [anchors]: a minimal periodic
set of breakpoints of the piecewise-linear worst-case latency envelope
over one hyperperiod, from which every metric in [metrics] follows in
closed form. The crate analyzes a purely static task model; it does not
schedule or execute anything.
*/

pub mod analysis;
pub mod anchors;
pub mod cancel;
pub mod chain;
pub mod error;
pub mod io;
pub mod metrics;
pub mod task;
pub mod time;
