/*! Anchor points of the worst-case latency envelope.

The worst-case reaction time and data age of a cause-effect chain, seen
as functions of the stimulus arrival time, are piecewise linear with
slope -1 between upward jumps. This module computes the minimal periodic
set of breakpoints, the *anchor points*, of both envelopes over one
hyperperiod. Every derived metric (see [crate::metrics]) is a closed-form
function of these finite lists; no simulation beyond one hyperperiod is
ever needed.

An [AnchoredChain] is the immutable result of the pure pipeline
`chain → hyperperiod → warm-up → anchors`. Reaction-time anchors are
keyed by the read event opening a chain instance, data-age anchors by the
write event closing one; both carry the same instance latency as value.
*/

use derive_more::Display;

use crate::cancel::CancelToken;
use crate::chain::{CEChain, Warmup};
use crate::error::Error;
use crate::time::{Duration, Instant};

mod reduce;

/// A breakpoint `(time, value)` of a worst-case latency envelope.
///
/// Between two anchors the envelope falls with slope -1 from the left
/// anchor's value; at an anchor it jumps up to the anchor's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[display(fmt = "({}, {})", time, value)]
pub struct AnchorPoint {
    pub time: Instant,
    pub value: Duration,
}

impl AnchorPoint {
    fn shifted(&self, offset: Duration) -> AnchorPoint {
        AnchorPoint {
            time: self.time + offset,
            value: self.value,
        }
    }
}

/// Which of the two envelopes an anchor list describes. Used to report
/// which reduction pass violated a postcondition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum AnchorKind {
    #[display(fmt = "reaction-time")]
    ReactionTime,
    #[display(fmt = "data-age")]
    DataAge,
}

/// A chain together with its fully computed derived state.
///
/// Both anchor lists are cyclic: the last entry equals the first entry
/// shifted by one hyperperiod, so consecutive-pair iteration covers
/// exactly one period of the envelope. Neither list contains a removable
/// entry, and both attain the same maximum value.
#[derive(Debug, Clone, PartialEq)]
pub struct AnchoredChain<'a> {
    chain: &'a CEChain,
    hyperperiod: Duration,
    warmup: Warmup,
    pivot: usize,
    anchors_rt: Vec<AnchorPoint>,
    anchors_da: Vec<AnchorPoint>,
}

impl<'a> AnchoredChain<'a> {
    /// Run the anchor-point reduction with the default pivot (the task
    /// with the largest period).
    pub fn compute(chain: &'a CEChain) -> Result<Self, Error> {
        Self::compute_with(chain, None, &CancelToken::new())
    }

    /// Run the anchor-point reduction with an explicit pivot task and a
    /// cancellation token, polled once per pivot job.
    ///
    /// The anchor lists are independent of the pivot choice; a smaller
    /// pivot period only means more candidate work before reduction.
    pub fn compute_with(
        chain: &'a CEChain,
        pivot: Option<usize>,
        cancel: &CancelToken,
    ) -> Result<Self, Error> {
        let hyperperiod = chain.hyperperiod();
        let warmup = chain.warmup()?;
        let p = pivot.unwrap_or_else(|| chain.default_pivot());
        if p >= chain.len() {
            return Err(Error::PivotOutOfRange {
                chain: chain.id().clone(),
                pivot: p,
            });
        }

        let pivot_period = chain.tasks()[p].period;
        if hyperperiod % pivot_period != 0 {
            return Err(Error::MisalignedHyperperiod {
                chain: chain.id().clone(),
                hyperperiod,
                period: pivot_period,
            });
        }
        let pivot_jobs = hyperperiod / pivot_period;

        // One candidate per partitioned job chain within a hyperperiod.
        // Candidates arrive in order of both keys, so keeping the
        // larger value on a key collision is a constant-time check
        // against the last entry.
        let capacity = pivot_jobs.min(1 << 16) as usize + 1;
        let mut rt = Vec::with_capacity(capacity);
        let mut da = Vec::with_capacity(capacity);
        for job in warmup.jobs[p]..warmup.jobs[p] + pivot_jobs {
            if cancel.is_cancelled() {
                return Err(Error::Cancelled {
                    chain: chain.id().clone(),
                });
            }
            let (backward, forward) = chain.partitioned_chain(p, job);
            let start_job = backward[0];
            if start_job < 0 {
                // Negative backward indices are expected only during
                // warm-up discovery; past warm-up they indicate a
                // structural defect.
                return Err(Error::IncompleteJobChain {
                    chain: chain.id().clone(),
                });
            }
            let start = chain.source().read_event(start_job);
            let end = chain.sink().write_event(forward[forward.len() - 1]);
            let value = end - start;
            record_candidate(&mut rt, AnchorPoint { time: start, value });
            record_candidate(&mut da, AnchorPoint { time: end, value });
        }

        // Close the cycle before reduction.
        close_cycle(&mut rt, hyperperiod);
        close_cycle(&mut da, hyperperiod);

        let anchors_rt = reduce::reduce_reaction_time(rt, hyperperiod, chain.id())?;
        let anchors_da = reduce::reduce_data_age(da, hyperperiod, chain.id())?;

        Ok(AnchoredChain {
            chain,
            hyperperiod,
            warmup,
            pivot: p,
            anchors_rt,
            anchors_da,
        })
    }

    pub fn chain(&self) -> &CEChain {
        self.chain
    }

    pub fn hyperperiod(&self) -> Duration {
        self.hyperperiod
    }

    pub fn warmup(&self) -> &Warmup {
        &self.warmup
    }

    /// The reduced, cyclic reaction-time anchors (read-event keyed).
    pub fn anchors_rt(&self) -> &[AnchorPoint] {
        &self.anchors_rt
    }

    /// The reduced, cyclic data-age anchors (write-event keyed).
    pub fn anchors_da(&self) -> &[AnchorPoint] {
        &self.anchors_da
    }

    /// Distinct anchors per hyperperiod, i.e. excluding the closing
    /// copy of the first entry.
    pub fn anchors_per_hyperperiod(&self) -> usize {
        self.anchors_rt.len() - 1
    }

    /// The pivot task the candidate enumeration used.
    pub fn pivot(&self) -> usize {
        self.pivot
    }

    /// Number of pivot jobs enumerated per hyperperiod.
    pub fn pivot_jobs(&self) -> Duration {
        self.hyperperiod / self.chain.tasks()[self.pivot].period
    }
}

/// Append a candidate, keeping only the larger value when two
/// partitioned chains share the same boundary time.
fn record_candidate(candidates: &mut Vec<AnchorPoint>, candidate: AnchorPoint) {
    match candidates.last_mut() {
        Some(last) if last.time == candidate.time => {
            last.value = last.value.max(candidate.value);
        }
        _ => candidates.push(candidate),
    }
}

/// Close the candidate cycle by appending the first candidate shifted by
/// one hyperperiod. A pivot whose period is smaller than an upstream
/// period can emit its final candidate exactly there; that key wraps
/// around onto the first candidate's, so both boundary entries take the
/// larger value, mirroring [record_candidate]. Anchor times stay
/// strictly increasing either way.
fn close_cycle(candidates: &mut Vec<AnchorPoint>, hyperperiod: Duration) {
    let first = candidates[0];
    let last = candidates[candidates.len() - 1];
    if last.time == first.time + hyperperiod {
        let value = first.value.max(last.value);
        candidates[0].value = value;
        let end = candidates.len() - 1;
        candidates[end].value = value;
    } else {
        candidates.push(first.shifted(hyperperiod));
    }
}

#[cfg(test)]
mod tests;
