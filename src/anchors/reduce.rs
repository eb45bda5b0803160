//! Directional redundancy elimination over candidate anchors.
//!
//! Reaction time and data age are observed at different boundary times
//! (read side vs. write side), so redundancy is directional: a
//! reaction-time anchor is redundant when its *predecessor* already
//! describes it via the slope -1 segment, a data-age anchor when its
//! *successor* does. The two passes below are deliberately written out
//! independently rather than derived from one another; getting either
//! direction backwards corrupts every downstream metric, which is why
//! both are guarded by explicit postconditions.

use itertools::Itertools;

use super::{AnchorKind, AnchorPoint};
use crate::chain::ChainId;
use crate::error::Error;
use crate::time::Duration;

/// `b` contributes nothing to the reaction-time envelope if the slope -1
/// segment from `a` passes exactly through it.
fn rt_redundant(a: &AnchorPoint, b: &AnchorPoint) -> bool {
    a.value - b.value == b.time - a.time
}

/// `a` contributes nothing to the data-age envelope if the slope +1
/// climb towards `b` passes exactly through it.
fn da_redundant(a: &AnchorPoint, b: &AnchorPoint) -> bool {
    b.value - a.value == b.time - a.time
}

/// Reduce cycle-closed reaction-time candidates to the minimal anchor
/// list: walking consecutive pairs, drop the successor whenever it is
/// redundant. If that eliminated the closing copy, the first candidate
/// is itself only an artifact of where the enumeration started; drop it
/// and close the cycle on the first surviving anchor instead.
pub(super) fn reduce_reaction_time(
    candidates: Vec<AnchorPoint>,
    hyperperiod: Duration,
    chain: &ChainId,
) -> Result<Vec<AnchorPoint>, Error> {
    let mut anchors: Vec<AnchorPoint> = Vec::with_capacity(candidates.len());
    anchors.push(candidates[0]);
    for b in &candidates[1..] {
        let a = anchors[anchors.len() - 1];
        if !rt_redundant(&a, b) {
            anchors.push(*b);
        }
    }

    if anchors[anchors.len() - 1].time != anchors[0].time + hyperperiod {
        ensure_more_than_one(&anchors, AnchorKind::ReactionTime, chain)?;
        anchors.remove(0);
        anchors.push(anchors[0].shifted(hyperperiod));
    }

    finish(anchors, AnchorKind::ReactionTime, chain, rt_redundant)
}

/// Reduce cycle-closed data-age candidates, mirrored: walking
/// consecutive pairs, drop the predecessor whenever it is redundant. If
/// the first candidate was dropped, the closing copy at the tail is
/// stale; replace it with the first surviving anchor shifted by one
/// hyperperiod.
pub(super) fn reduce_data_age(
    candidates: Vec<AnchorPoint>,
    hyperperiod: Duration,
    chain: &ChainId,
) -> Result<Vec<AnchorPoint>, Error> {
    let mut anchors: Vec<AnchorPoint> = Vec::with_capacity(candidates.len());
    for (a, b) in candidates.iter().tuple_windows() {
        if !da_redundant(a, b) {
            anchors.push(*a);
        }
    }
    anchors.push(candidates[candidates.len() - 1]);

    if anchors[anchors.len() - 1].time != anchors[0].time + hyperperiod {
        anchors.pop();
        if anchors.is_empty() {
            return Err(Error::TooFewAnchors {
                chain: chain.clone(),
                kind: AnchorKind::DataAge,
            });
        }
        anchors.push(anchors[0].shifted(hyperperiod));
    }

    finish(anchors, AnchorKind::DataAge, chain, da_redundant)
}

fn ensure_more_than_one(
    anchors: &[AnchorPoint],
    kind: AnchorKind,
    chain: &ChainId,
) -> Result<(), Error> {
    if anchors.len() < 2 {
        Err(Error::TooFewAnchors {
            chain: chain.clone(),
            kind,
        })
    } else {
        Ok(())
    }
}

/// Postcondition checks shared by both passes: a reduced list needs more
/// than one entry, and its final two entries must not be mutually
/// redundant. A violation signals a degenerate chain or a defect in the
/// reduction itself and is surfaced, never accepted.
fn finish(
    anchors: Vec<AnchorPoint>,
    kind: AnchorKind,
    chain: &ChainId,
    redundant: impl Fn(&AnchorPoint, &AnchorPoint) -> bool,
) -> Result<Vec<AnchorPoint>, Error> {
    ensure_more_than_one(&anchors, kind, chain)?;
    let a = &anchors[anchors.len() - 2];
    let b = &anchors[anchors.len() - 1];
    if redundant(a, b) {
        return Err(Error::RedundantTail {
            chain: chain.clone(),
            kind,
        });
    }
    Ok(anchors)
}
