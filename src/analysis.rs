/*! End-to-end analysis of chains and batches of chains.

[analyze] runs the pure pipeline `chain → hyperperiod → warm-up →
anchors → metrics` and assembles a flat [ChainMetrics] record with the
persisted result keys. [analyze_all] drives a whole collection,
supervising each chain with an optional wall-clock timeout: an expired
chain yields a report carrying only its elapsed time, a structurally
broken chain yields its error, and the batch always continues with the
next chain.
*/

use std::sync::mpsc;
use std::thread;

use serde::Serialize;

use crate::anchors::AnchoredChain;
use crate::cancel::CancelToken;
use crate::chain::{CEChain, ChainId};
use crate::error::Error;
use crate::metrics;
use crate::metrics::Exceedance;
use crate::time::Duration;

/// Tunables of a single-chain analysis.
///
/// `bound` and `relative_bound` are mutually exclusive; supplying both
/// is rejected before any analysis starts. A relative bound is a
/// fraction of the computed `MaxRT` and is resolved once the anchors
/// are known. When neither is given, the weakly-hard and exceedance
/// evaluators are skipped.
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    /// Pivot task override; defaults to the task with the largest period.
    pub pivot: Option<usize>,
    /// Absolute latency bound for the weakly-hard and exceedance metrics.
    pub bound: Option<Duration>,
    /// Latency bound as a fraction of the computed maximum.
    pub relative_bound: Option<f64>,
    /// Largest window size `k` evaluated by the weakly-hard analysis.
    pub max_window: usize,
    /// Per-chain wall-clock budget for batch analysis.
    pub timeout: Option<std::time::Duration>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        AnalysisConfig {
            pivot: None,
            bound: None,
            relative_bound: None,
            max_window: 10,
            timeout: None,
        }
    }
}

impl AnalysisConfig {
    fn validate(&self) -> Result<(), Error> {
        if self.bound.is_some() && self.relative_bound.is_some() {
            return Err(Error::ConflictingBounds);
        }
        Ok(())
    }

    /// The effective bound, once the maximum latency is known.
    fn resolved_bound(&self, max_rt: Duration) -> Option<Duration> {
        match (self.bound, self.relative_bound) {
            (Some(bound), _) => Some(bound),
            (None, Some(fraction)) => Some((fraction * max_rt as f64).floor() as Duration),
            (None, None) => None,
        }
    }
}

/// The flat result record of one analyzed chain, keyed for persistence.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChainMetrics {
    #[serde(rename = "MaxRT")]
    pub max_rt: Duration,
    #[serde(rename = "MaxDA")]
    pub max_da: Duration,
    #[serde(rename = "MinRT")]
    pub min_rt: Duration,
    #[serde(rename = "MinDA")]
    pub min_da: Duration,
    #[serde(rename = "AvRT")]
    pub av_rt: f64,
    #[serde(rename = "AvDA")]
    pub av_da: f64,
    #[serde(rename = "throughp")]
    pub throughput: f64,
    #[serde(rename = "reactivity")]
    pub reactivity: Duration,
    /// Per window size `k`, the worst-case miss count `m` as `(m, k)`.
    #[serde(rename = "mkRT", skip_serializing_if = "Option::is_none")]
    pub mk_rt: Option<Vec<(usize, usize)>>,
    #[serde(rename = "LE-RT", skip_serializing_if = "Option::is_none")]
    pub le_rt: Option<Exceedance>,
    #[serde(rename = "#AnchorsRT")]
    pub num_anchors_rt: usize,
    #[serde(rename = "H")]
    pub hyperperiod: Duration,
    #[serde(rename = "H/Tp")]
    pub pivot_jobs: Duration,
    pub analysis_time_sec: f64,
}

/// Analyze a single chain to completion.
pub fn analyze(chain: &CEChain, config: &AnalysisConfig) -> Result<ChainMetrics, Error> {
    analyze_cancellable(chain, config, &CancelToken::new())
}

/// Analyze a single chain, aborting promptly once `cancel` fires.
/// Cancellation surfaces as [Error::Cancelled]; no partially populated
/// metrics record can escape.
pub fn analyze_cancellable(
    chain: &CEChain,
    config: &AnalysisConfig,
    cancel: &CancelToken,
) -> Result<ChainMetrics, Error> {
    config.validate()?;
    let started = std::time::Instant::now();

    let anchored = AnchoredChain::compute_with(chain, config.pivot, cancel)?;
    let anchors_rt = anchored.anchors_rt();
    let anchors_da = anchored.anchors_da();

    let max_rt = metrics::maximum(anchors_rt);
    let max_da = metrics::maximum(anchors_da);
    // Both envelopes describe the same worst case, observed at
    // different boundary times.
    debug_assert_eq!(max_rt, max_da);

    let bound = config.resolved_bound(max_rt);
    let source_period = chain.source().period;
    let hyperperiod = anchored.hyperperiod();

    Ok(ChainMetrics {
        max_rt,
        max_da,
        min_rt: metrics::minimum_rt(anchors_rt),
        min_da: metrics::minimum_da(anchors_da),
        av_rt: metrics::average_rt(anchors_rt, hyperperiod),
        av_da: metrics::average_da(anchors_da, hyperperiod),
        throughput: metrics::throughput(anchors_da, hyperperiod),
        reactivity: metrics::reactivity(anchors_rt, source_period),
        mk_rt: bound.map(|b| {
            metrics::weakly_hard_miss_bounds(
                anchors_rt,
                source_period,
                hyperperiod,
                b,
                config.max_window,
            )
        }),
        le_rt: bound.map(|b| metrics::longest_exceedance(anchors_rt, hyperperiod, b)),
        num_anchors_rt: anchored.anchors_per_hyperperiod(),
        hyperperiod,
        pivot_jobs: anchored.pivot_jobs(),
        analysis_time_sec: started.elapsed().as_secs_f64(),
    })
}

/// How the analysis of one chain in a batch ended.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Completed(ChainMetrics),
    /// The wall-clock budget expired; only the elapsed time is known.
    TimedOut { analysis_time_sec: f64 },
    Failed(Error),
}

/// Per-chain result of a batch run.
#[derive(Debug, Clone, PartialEq)]
pub struct ChainReport {
    pub id: ChainId,
    pub outcome: Outcome,
}

/// Analyze one chain under the configured wall-clock budget.
///
/// The chain is handed to a worker thread and raced against the
/// timeout; on expiry the worker's cancellation token is fired and the
/// worker winds down on its own between pivot-job iterations, so no
/// runaway computation outlives the report.
pub fn analyze_with_timeout(chain: CEChain, config: &AnalysisConfig) -> ChainReport {
    let id = chain.id().clone();
    let limit = match config.timeout {
        Some(limit) => limit,
        None => {
            let outcome = match analyze(&chain, config) {
                Ok(m) => Outcome::Completed(m),
                Err(e) => Outcome::Failed(e),
            };
            return ChainReport { id, outcome };
        }
    };

    let cancel = CancelToken::new();
    let token = cancel.clone();
    let worker_config = config.clone();
    let started = std::time::Instant::now();
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let _ = tx.send(analyze_cancellable(&chain, &worker_config, &token));
    });

    let outcome = match rx.recv_timeout(limit) {
        Ok(Ok(m)) => Outcome::Completed(m),
        Ok(Err(e)) => Outcome::Failed(e),
        Err(mpsc::RecvTimeoutError::Timeout) => {
            cancel.cancel();
            Outcome::TimedOut {
                analysis_time_sec: started.elapsed().as_secs_f64(),
            }
        }
        Err(mpsc::RecvTimeoutError::Disconnected) => {
            Outcome::Failed(Error::WorkerTerminated { chain: id.clone() })
        }
    };
    ChainReport { id, outcome }
}

/// Analyze a collection of chains. Chains are independent, so a timeout
/// or a structural failure of one never aborts the rest.
pub fn analyze_all(chains: Vec<CEChain>, config: &AnalysisConfig) -> Vec<ChainReport> {
    chains
        .into_iter()
        .map(|chain| {
            let report = analyze_with_timeout(chain, config);
            match &report.outcome {
                Outcome::Completed(m) => {
                    log::debug!("chain {}: analyzed in {:.3}s", report.id, m.analysis_time_sec)
                }
                Outcome::TimedOut { analysis_time_sec } => log::warn!(
                    "chain {}: analysis timed out after {:.3}s",
                    report.id,
                    analysis_time_sec
                ),
                Outcome::Failed(e) => log::warn!("chain {}: {}", report.id, e),
            }
            report
        })
        .collect()
}

#[cfg(test)]
mod tests;
