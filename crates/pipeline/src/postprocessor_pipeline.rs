//! The PostprocessorChain runs candidate-list transformers in order.
//!
//! Each stage sees the complete output of the previous one. Stages that carry
//! a score threshold are evaluated against the list as it stands at their
//! position, and the resulting report travels back to the caller next to the
//! candidates.

use crate::postprocessors::ThresholdReport;
use crate::traits::Postprocessor;
use places::Candidate;
use tracing;

/// Output of a postprocessor chain run.
#[derive(Debug, Clone, PartialEq)]
pub struct Postprocessed {
    pub candidates: Vec<Candidate>,
    /// Present when the chain contains a threshold stage
    pub threshold: Option<ThresholdReport>,
}

impl Postprocessed {
    /// True when a threshold stage saw a score at or above its threshold.
    pub fn threshold_met(&self) -> bool {
        self.threshold.as_ref().is_some_and(|report| report.met)
    }
}

/// Ordered list of postprocessors applied to a provider's candidates.
///
/// ## Usage
/// ```ignore
/// let chain = PostprocessorChain::new()
///     .add(AttrFilter::new(["rooftop", "interpolation"], CandidateAttr::Locator))
///     .add(ScoreSorter)
///     .add(GroupBy::new(CandidateAttr::Locator));
///
/// let result = chain.run(candidates);
/// ```
pub struct PostprocessorChain {
    stages: Vec<Box<dyn Postprocessor>>,
}

impl PostprocessorChain {
    /// Create a new empty chain.
    pub fn new() -> Self {
        Self { stages: Vec::new() }
    }

    /// Build a chain from an already-assembled list (e.g. a provider preset).
    pub fn from_stages(stages: Vec<Box<dyn Postprocessor>>) -> Self {
        Self { stages }
    }

    /// Append a postprocessor (builder pattern).
    pub fn add(mut self, stage: impl Postprocessor + 'static) -> Self {
        self.stages.push(Box::new(stage));
        self
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Names of the stages in execution order.
    pub fn stage_names(&self) -> Vec<&str> {
        self.stages.iter().map(|s| s.name()).collect()
    }

    /// Apply all stages in sequence.
    ///
    /// ## Algorithm
    /// 1. Start with the input candidates
    /// 2. For each stage in order:
    ///    a. If it carries a threshold, evaluate it on the current list
    ///    b. Apply the stage
    /// 3. Return the final list with the threshold report (a met report is
    ///    never overwritten by a later, unmet one)
    pub fn run(&self, candidates: Vec<Candidate>) -> Postprocessed {
        let mut current = candidates;
        let mut threshold: Option<ThresholdReport> = None;

        for stage in &self.stages {
            if let Some(min_score) = stage.score_threshold() {
                let report = ThresholdReport::evaluate(&current, min_score);
                tracing::debug!(
                    "Threshold check by {}: max={:?} threshold={} met={}",
                    stage.name(),
                    report.max_score,
                    report.threshold,
                    report.met
                );
                if !threshold.as_ref().is_some_and(|r| r.met) {
                    threshold = Some(report);
                }
            }

            let input_count = current.len();
            current = stage.process(current);
            tracing::debug!(
                "Postprocessor applied: {} (input count: {}, output count: {})",
                stage.name(),
                input_count,
                current.len()
            );
        }

        Postprocessed {
            candidates: current,
            threshold,
        }
    }
}

impl Default for PostprocessorChain {
    fn default() -> Self {
        Self::new()
    }
}
