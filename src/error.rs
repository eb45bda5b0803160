use thiserror::Error;

use crate::anchors::AnchorKind;
use crate::chain::ChainId;
use crate::time::{Duration, Instant};

/// Everything that can go wrong while analyzing a cause-effect chain.
///
/// Structural variants identify the offending chain and the violated
/// invariant; they indicate either a malformed task model or a defect in
/// the anchor reduction and must never be swallowed.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    #[error("chain {0}: must contain at least one task")]
    EmptyChain(ChainId),

    #[error("chain {chain}: task {index} has non-positive period {period}")]
    NonPositivePeriod {
        chain: ChainId,
        index: usize,
        period: Duration,
    },

    #[error("chain {chain}: task {index} has negative phase {phase}")]
    NegativePhase {
        chain: ChainId,
        index: usize,
        phase: Instant,
    },

    #[error("chain {chain}: task {index} has negative deadline {deadline}")]
    NegativeDeadline {
        chain: ChainId,
        index: usize,
        deadline: Duration,
    },

    #[error("chain {chain}: pivot task index {pivot} is out of range")]
    PivotOutOfRange { chain: ChainId, pivot: usize },

    #[error(
        "chain {chain}: hyperperiod {hyperperiod} is not a multiple of the pivot period {period}"
    )]
    MisalignedHyperperiod {
        chain: ChainId,
        hyperperiod: Duration,
        period: Duration,
    },

    #[error("chain {chain}: backward job chain has no valid job after warm-up")]
    IncompleteJobChain { chain: ChainId },

    #[error("chain {chain}: reduction left fewer than two {kind} anchors")]
    TooFewAnchors { chain: ChainId, kind: AnchorKind },

    #[error("chain {chain}: the final two {kind} anchors are mutually redundant")]
    RedundantTail { chain: ChainId, kind: AnchorKind },

    #[error("an absolute bound and a relative bound are mutually exclusive")]
    ConflictingBounds,

    #[error("chain {chain}: analysis was cancelled")]
    Cancelled { chain: ChainId },

    #[error("chain {chain}: analysis worker terminated unexpectedly")]
    WorkerTerminated { chain: ChainId },
}
