use assert_approx_eq::assert_approx_eq;

use crate::analysis::{analyze, analyze_all, analyze_with_timeout, AnalysisConfig, Outcome};
use crate::error::Error;
use crate::metrics::Exceedance;
use crate::tests::{chain, paper_chain, two_task_chain};

#[test]
fn paper_chain_report() {
    let ch = paper_chain();
    let m = analyze(&ch, &AnalysisConfig::default()).unwrap();
    assert_eq!(m.max_rt, 35);
    assert_eq!(m.max_da, 35);
    assert_eq!(m.min_rt, 21);
    assert_eq!(m.min_da, 21);
    assert_approx_eq!(m.av_rt, 28.0);
    assert_approx_eq!(m.av_da, 28.0);
    assert_approx_eq!(m.throughput, 0.1);
    assert_eq!(m.reactivity, 31);
    assert_eq!(m.num_anchors_rt, 3);
    assert_eq!(m.hyperperiod, 30);
    assert_eq!(m.pivot_jobs, 3);
    // No bound configured: the bound-dependent metrics are skipped.
    assert_eq!(m.mk_rt, None);
    assert_eq!(m.le_rt, None);
    assert!(m.analysis_time_sec >= 0.0);
}

#[test]
fn two_task_chain_report() {
    let ch = two_task_chain();
    let m = analyze(&ch, &AnalysisConfig::default()).unwrap();
    assert_eq!(m.max_rt, 330);
    assert_eq!(m.min_rt, 170);
    assert_approx_eq!(m.av_rt, 250.0);
    assert_eq!(m.hyperperiod, 600);
    assert_eq!(m.num_anchors_rt, 5);
    assert_eq!(m.pivot_jobs, 5);
}

#[test]
fn absolute_bound_enables_weakly_hard_and_exceedance() {
    let ch = paper_chain();
    let config = AnalysisConfig {
        bound: Some(25),
        max_window: 5,
        ..AnalysisConfig::default()
    };
    let m = analyze(&ch, &config).unwrap();
    assert_eq!(m.mk_rt, Some(vec![(1, 1), (1, 2), (2, 3), (2, 4), (2, 5)]));
    assert_eq!(m.le_rt, Some(Exceedance::Finite(16)));
}

#[test]
fn relative_bound_resolves_against_the_maximum() {
    let ch = paper_chain();
    let config = AnalysisConfig {
        relative_bound: Some(1.0),
        ..AnalysisConfig::default()
    };
    let m = analyze(&ch, &config).unwrap();
    // 1.0 * MaxRT = 35: nothing exceeds the maximum.
    assert_eq!(m.le_rt, Some(Exceedance::Finite(0)));
}

#[test]
fn conflicting_bounds_are_rejected_up_front() {
    let ch = paper_chain();
    let config = AnalysisConfig {
        bound: Some(25),
        relative_bound: Some(0.9),
        ..AnalysisConfig::default()
    };
    assert_eq!(analyze(&ch, &config), Err(Error::ConflictingBounds));
}

#[test]
fn serialized_metrics_use_the_persisted_keys() {
    let ch = paper_chain();
    let config = AnalysisConfig {
        bound: Some(25),
        ..AnalysisConfig::default()
    };
    let m = analyze(&ch, &config).unwrap();
    let json: serde_json::Value = serde_json::from_str(&serde_json::to_string(&m).unwrap()).unwrap();
    assert_eq!(json["MaxRT"], 35);
    assert_eq!(json["MinRT"], 21);
    assert_eq!(json["AvRT"], 28.0);
    assert_eq!(json["throughp"], 0.1);
    assert_eq!(json["#AnchorsRT"], 3);
    assert_eq!(json["H"], 30);
    assert_eq!(json["H/Tp"], 3);
    assert!(json["mkRT"].is_array());
    assert!(json["LE-RT"].is_number());
    assert!(json["analysis_time_sec"].is_number());
}

#[test]
fn batch_analysis_completes_independent_chains() {
    let reports = analyze_all(
        vec![paper_chain(), two_task_chain()],
        &AnalysisConfig::default(),
    );
    assert_eq!(reports.len(), 2);
    for report in &reports {
        assert!(matches!(report.outcome, Outcome::Completed(_)));
    }
}

#[test]
fn structural_failure_does_not_abort_the_batch() {
    // A pivot override that is valid for one chain but out of range for
    // the other.
    let config = AnalysisConfig {
        pivot: Some(2),
        ..AnalysisConfig::default()
    };
    let reports = analyze_all(vec![two_task_chain(), paper_chain()], &config);
    assert!(matches!(
        reports[0].outcome,
        Outcome::Failed(Error::PivotOutOfRange { pivot: 2, .. })
    ));
    assert!(matches!(reports[1].outcome, Outcome::Completed(_)));
}

#[test]
fn timeout_yields_a_partial_report() {
    // Pairwise coprime periods near 1000 give a hyperperiod around 1e15
    // and far more pivot jobs than can be enumerated in a millisecond.
    let ch = chain(
        99,
        &[(0, 997, 997), (0, 991, 991), (0, 983, 983), (0, 977, 977), (0, 1009, 1009)],
    );
    let config = AnalysisConfig {
        timeout: Some(std::time::Duration::from_millis(10)),
        ..AnalysisConfig::default()
    };
    let report = analyze_with_timeout(ch, &config);
    match report.outcome {
        Outcome::TimedOut { analysis_time_sec } => {
            assert!(analysis_time_sec >= 0.01);
        }
        other => panic!("expected timeout, got {:?}", other),
    }
}

#[test]
fn fast_chains_complete_under_a_timeout() {
    let config = AnalysisConfig {
        timeout: Some(std::time::Duration::from_secs(10)),
        ..AnalysisConfig::default()
    };
    let report = analyze_with_timeout(paper_chain(), &config);
    assert!(matches!(report.outcome, Outcome::Completed(_)));
}
