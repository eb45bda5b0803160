/*! Cause-effect chains of periodic tasks.

A [CEChain] is an ordered, non-empty sequence of [Task]s whose outputs
causally feed into each other: task 0 samples the stimulus, the last task
writes the final effect. The chain does not schedule anything; it is a
purely static model over which end-to-end latency is analyzed.

This module provides the chain type itself together with the job-chain
navigation primitives ([CEChain::forward_chain], [CEChain::backward_chain],
[CEChain::partitioned_chain]) and the warm-up computation
([CEChain::warmup]) on which the anchor-point reduction builds.
*/

use derive_more::Display;
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::task::Task;
use crate::time::Duration;

mod navigation;
mod warmup;

pub use warmup::Warmup;

/// Identifier of a chain, as found in persisted chain definitions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChainId {
    #[display(fmt = "{}", _0)]
    Number(i64),
    #[display(fmt = "{}", _0)]
    Label(String),
}

impl From<i64> for ChainId {
    fn from(n: i64) -> Self {
        ChainId::Number(n)
    }
}

impl From<&str> for ChainId {
    fn from(s: &str) -> Self {
        ChainId::Label(s.to_string())
    }
}

/// A cause-effect chain: an identifier plus an immutable task sequence.
///
/// Construction validates the task model; a `CEChain` that exists is
/// structurally sound. Tasks are never mutated in place; derived
/// analysis state lives in [AnchoredChain](crate::anchors::AnchoredChain),
/// not here.
#[derive(Debug, Clone, PartialEq)]
pub struct CEChain {
    id: ChainId,
    tasks: Vec<Task>,
}

impl CEChain {
    /// Construct a chain, rejecting malformed task models up front:
    /// the chain must be non-empty, and every task needs a positive
    /// period, a non-negative phase, and a non-negative deadline.
    pub fn new(id: ChainId, tasks: Vec<Task>) -> Result<Self, Error> {
        if tasks.is_empty() {
            return Err(Error::EmptyChain(id));
        }
        for (index, t) in tasks.iter().enumerate() {
            if t.period <= 0 {
                return Err(Error::NonPositivePeriod {
                    chain: id.clone(),
                    index,
                    period: t.period,
                });
            }
            if t.phase < 0 {
                return Err(Error::NegativePhase {
                    chain: id.clone(),
                    index,
                    phase: t.phase,
                });
            }
            if t.deadline < 0 {
                return Err(Error::NegativeDeadline {
                    chain: id.clone(),
                    index,
                    deadline: t.deadline,
                });
            }
        }
        Ok(CEChain { id, tasks })
    }

    pub fn id(&self) -> &ChainId {
        &self.id
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Number of tasks in the chain.
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// The task sampling the stimulus.
    pub fn source(&self) -> &Task {
        &self.tasks[0]
    }

    /// The task writing the final effect.
    pub fn sink(&self) -> &Task {
        &self.tasks[self.tasks.len() - 1]
    }

    /// Least common multiple of all task periods. The chain's job-chain
    /// structure repeats with this period once warmed up.
    pub fn hyperperiod(&self) -> Duration {
        self.tasks.iter().map(|t| t.period).fold(1, lcm)
    }

    /// Index of the task with the largest period (first on ties). That
    /// task has the fewest jobs per hyperperiod, so anchoring the
    /// partitioned-chain enumeration on it minimizes work.
    pub fn default_pivot(&self) -> usize {
        let mut pivot = 0;
        for (i, t) in self.tasks.iter().enumerate() {
            if t.period > self.tasks[pivot].period {
                pivot = i;
            }
        }
        pivot
    }
}

fn gcd(a: Duration, b: Duration) -> Duration {
    if b == 0 {
        a
    } else {
        gcd(b, a % b)
    }
}

fn lcm(a: Duration, b: Duration) -> Duration {
    a / gcd(a, b) * b
}
