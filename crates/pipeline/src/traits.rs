//! Core traits for the query and candidate pipelines.
//!
//! Both chains are built from small, configuration-bearing transformer
//! objects. They hold no per-request state, so one chain can be shared by
//! any number of concurrent geocode requests.

use places::{Candidate, PlaceQuery};
use std::fmt;

/// Why a preprocessor refused to let a query reach the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CancelReason {
    /// Name of the preprocessor that cancelled
    pub preprocessor: String,
    pub message: String,
}

impl CancelReason {
    pub fn new(preprocessor: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            preprocessor: preprocessor.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for CancelReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.preprocessor, self.message)
    }
}

/// Result of running a preprocessor.
///
/// Cancellation is an expected outcome, not an error: the caller skips the
/// provider and moves on.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryOutcome {
    Continue(PlaceQuery),
    Cancelled(CancelReason),
}

impl QueryOutcome {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, QueryOutcome::Cancelled(_))
    }

    /// The query, if the outcome is `Continue`.
    pub fn into_query(self) -> Option<PlaceQuery> {
        match self {
            QueryOutcome::Continue(query) => Some(query),
            QueryOutcome::Cancelled(_) => None,
        }
    }
}

/// Transforms or vetoes a query before it is sent to a provider.
///
/// ## Design Note
/// - `Send + Sync` lets one chain serve concurrent requests
/// - The query is taken by value and handed back on `Continue`, so a stage
///   can rewrite fields without cloning
pub trait Preprocessor: Send + Sync {
    /// Returns the name of this preprocessor (for logging/debugging)
    fn name(&self) -> &str;

    fn process(&self, query: PlaceQuery) -> QueryOutcome;
}

/// Transforms the candidate list returned by a provider.
///
/// Stages may drop, reorder or relabel candidates but never invent new ones.
/// An empty list is always valid input.
pub trait Postprocessor: Send + Sync {
    /// Returns the name of this postprocessor (for logging/debugging)
    fn name(&self) -> &str;

    fn process(&self, candidates: Vec<Candidate>) -> Vec<Candidate>;

    /// Score at which this stage signals "good enough, stop asking other
    /// providers". Only `UseHighScoreIfAtLeast` returns `Some`.
    fn score_threshold(&self) -> Option<f64> {
        None
    }
}
