use crate::anchors::AnchoredChain;
use crate::cancel::CancelToken;
use crate::error::Error;
use crate::metrics;
use crate::tests::{ap, chain, paper_chain, phased_chain, two_task_chain};

#[test]
fn paper_chain_anchors() {
    let ch = paper_chain();
    let anchored = AnchoredChain::compute(&ch).unwrap();
    assert_eq!(anchored.hyperperiod(), 30);
    assert_eq!(anchored.pivot(), 1);
    assert_eq!(
        anchored.anchors_rt(),
        &[ap(0, 35), ap(12, 33), ap(24, 31), ap(30, 35)]
    );
    assert_eq!(
        anchored.anchors_da(),
        &[ap(35, 35), ap(45, 33), ap(55, 31), ap(65, 35)]
    );
    assert_eq!(anchored.anchors_per_hyperperiod(), 3);
    assert_eq!(anchored.pivot_jobs(), 3);
}

#[test]
fn two_task_chain_anchors() {
    let ch = two_task_chain();
    let anchored = AnchoredChain::compute(&ch).unwrap();
    assert_eq!(anchored.hyperperiod(), 600);
    assert_eq!(
        anchored.anchors_rt(),
        &[
            ap(50, 310),
            ap(150, 330),
            ap(300, 300),
            ap(400, 320),
            ap(550, 290),
            ap(650, 310),
        ]
    );
    assert_eq!(
        anchored.anchors_da(),
        &[
            ap(360, 310),
            ap(480, 330),
            ap(600, 300),
            ap(720, 320),
            ap(840, 290),
            ap(960, 310),
        ]
    );
}

#[test]
fn phased_chain_anchors() {
    let ch = phased_chain();
    let anchored = AnchoredChain::compute(&ch).unwrap();
    assert_eq!(anchored.hyperperiod(), 12);
    assert_eq!(anchored.anchors_rt(), &[ap(1, 17), ap(5, 19), ap(13, 17)]);
    assert_eq!(anchored.anchors_da(), &[ap(18, 17), ap(24, 19), ap(30, 17)]);
}

#[test]
fn single_task_chain_anchors() {
    let ch = chain(11, &[(0, 5, 5)]);
    let anchored = AnchoredChain::compute(&ch).unwrap();
    assert_eq!(anchored.hyperperiod(), 5);
    assert_eq!(anchored.anchors_rt(), &[ap(0, 10), ap(5, 10)]);
    assert_eq!(anchored.anchors_da(), &[ap(10, 10), ap(15, 10)]);
}

/// The anchor lists do not depend on the pivot choice. A non-maximal
/// pivot enumerates more candidates per hyperperiod and so exercises the
/// candidate dedup and both redundancy-elimination directions, including
/// the re-closure of a data-age list whose first candidate was dropped.
#[test]
fn pivot_independence() {
    let ch = paper_chain();
    let reference = AnchoredChain::compute(&ch).unwrap();
    for pivot in 0..ch.len() {
        let anchored =
            AnchoredChain::compute_with(&ch, Some(pivot), &CancelToken::new()).unwrap();
        assert_eq!(anchored.anchors_rt(), reference.anchors_rt(), "pivot {}", pivot);
        assert_eq!(anchored.anchors_da(), reference.anchors_da(), "pivot {}", pivot);
    }
}

/// A pivot whose period is smaller than an upstream period can emit its
/// final candidate exactly one hyperperiod after its first. That
/// candidate must fold into the cycle-closing copy rather than stand
/// next to it at the same time.
#[test]
fn cycle_boundary_collisions_fold_into_the_closing_anchor() {
    let ch = chain(12, &[(6, 12, 3), (15, 1, 0), (15, 6, 19)]);
    let reference = AnchoredChain::compute(&ch).unwrap();
    assert_eq!(reference.pivot(), 0);
    assert_eq!(reference.anchors_rt(), &[ap(6, 34), ap(18, 34)]);
    assert_eq!(reference.anchors_da(), &[ap(40, 34), ap(52, 34)]);
    for pivot in 0..ch.len() {
        let anchored =
            AnchoredChain::compute_with(&ch, Some(pivot), &CancelToken::new()).unwrap();
        assert_eq!(anchored.anchors_rt(), reference.anchors_rt(), "pivot {}", pivot);
        assert_eq!(anchored.anchors_da(), reference.anchors_da(), "pivot {}", pivot);
        for anchors in [anchored.anchors_rt(), anchored.anchors_da()] {
            for pair in anchors.windows(2) {
                assert!(pair[0].time < pair[1].time, "pivot {}", pivot);
            }
        }
    }
}

#[test]
fn cyclic_closure_and_max_equality() {
    for ch in [paper_chain(), two_task_chain(), phased_chain()] {
        let anchored = AnchoredChain::compute(&ch).unwrap();
        let h = anchored.hyperperiod();
        for anchors in [anchored.anchors_rt(), anchored.anchors_da()] {
            assert!(anchors.len() > 1);
            let first = anchors[0];
            let last = anchors[anchors.len() - 1];
            assert_eq!(last.time, first.time + h);
            assert_eq!(last.value, first.value);
        }
        assert_eq!(
            metrics::maximum(anchored.anchors_rt()),
            metrics::maximum(anchored.anchors_da())
        );
    }
}

#[test]
fn recomputation_is_deterministic() {
    let ch = two_task_chain();
    let once = AnchoredChain::compute(&ch).unwrap();
    let twice = AnchoredChain::compute(&ch).unwrap();
    assert_eq!(once.anchors_rt(), twice.anchors_rt());
    assert_eq!(once.anchors_da(), twice.anchors_da());
    assert_eq!(once.warmup(), twice.warmup());
}

#[test]
fn pivot_out_of_range_is_rejected() {
    let ch = paper_chain();
    let result = AnchoredChain::compute_with(&ch, Some(3), &CancelToken::new());
    assert!(matches!(result, Err(Error::PivotOutOfRange { pivot: 3, .. })));
}

#[test]
fn cancellation_aborts_computation() {
    let ch = paper_chain();
    let cancel = CancelToken::new();
    cancel.cancel();
    let result = AnchoredChain::compute_with(&ch, None, &cancel);
    assert!(matches!(result, Err(Error::Cancelled { .. })));
}
