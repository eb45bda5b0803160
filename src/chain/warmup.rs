//! Warm-up discovery: the point from which a chain behaves periodically.

use super::CEChain;
use crate::error::Error;
use crate::time::{Instant, JobIndex};

/// One job index per task marking the earliest jobs from which the
/// chain's job-chain structure is guaranteed to repeat every
/// hyperperiod, plus the times at which reaction time and data age
/// become well-defined.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Warmup {
    /// Per-task job index of the first warmed-up job.
    pub jobs: Vec<JobIndex>,
    /// Read event of the source's warm-up job and write event of the
    /// sink's warm-up job.
    pub start_times: (Instant, Instant),
}

impl CEChain {
    /// Determine the warm-up jobs: follow the forward chain of the
    /// source's first job to the sink, then the backward chain from the
    /// sink job reached. Behavior before these jobs may be affected by
    /// unaligned initial phases; from them on, the chain repeats every
    /// hyperperiod.
    pub fn warmup(&self) -> Result<Warmup, Error> {
        let forward = self.forward_chain(0, 0);
        let jobs = self.backward_chain(self.len() - 1, forward[self.len() - 1]);

        // The backward walk starts from a job reached going forward, so
        // every index it yields must denote an existing job.
        if jobs.iter().any(|&j| j < 0) {
            return Err(Error::IncompleteJobChain {
                chain: self.id().clone(),
            });
        }

        let start_times = (
            self.source().read_event(jobs[0]),
            self.sink().write_event(jobs[self.len() - 1]),
        );
        Ok(Warmup { jobs, start_times })
    }
}
