//! The PreprocessorChain runs query transformers in order.

use crate::traits::{Preprocessor, QueryOutcome};
use places::PlaceQuery;
use tracing;

/// Ordered list of preprocessors applied to a query before a provider call.
///
/// ## Usage
/// ```ignore
/// let chain = PreprocessorChain::new()
///     .add(ReplaceRangeWithNumber::new())
///     .add(CancelIfPoBox::new());
///
/// match chain.run(query) {
///     QueryOutcome::Continue(query) => { /* call the provider */ }
///     QueryOutcome::Cancelled(reason) => { /* skip it */ }
/// }
/// ```
pub struct PreprocessorChain {
    stages: Vec<Box<dyn Preprocessor>>,
}

impl PreprocessorChain {
    /// Create a new empty chain.
    pub fn new() -> Self {
        Self { stages: Vec::new() }
    }

    /// Build a chain from an already-assembled list (e.g. a provider preset).
    pub fn from_stages(stages: Vec<Box<dyn Preprocessor>>) -> Self {
        Self { stages }
    }

    /// Append a preprocessor (builder pattern).
    pub fn add(mut self, stage: impl Preprocessor + 'static) -> Self {
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

    /// Apply every stage in order, stopping at the first cancellation.
    pub fn run(&self, query: PlaceQuery) -> QueryOutcome {
        let mut current = query;
        for stage in &self.stages {
            match stage.process(current) {
                QueryOutcome::Continue(next) => {
                    tracing::debug!("Preprocessor applied: {}", stage.name());
                    current = next;
                }
                QueryOutcome::Cancelled(reason) => {
                    tracing::debug!("Query cancelled by {}: {}", stage.name(), reason.message);
                    return QueryOutcome::Cancelled(reason);
                }
            }
        }
        QueryOutcome::Continue(current)
    }
}

impl Default for PreprocessorChain {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preprocessors::{CancelIfPoBox, ReplaceRangeWithNumber, RequireCountry};
    use crate::traits::CancelReason;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Counts how often it runs so we can check short-circuiting.
    struct Counting(Arc<AtomicUsize>);

    impl Preprocessor for Counting {
        fn name(&self) -> &str {
            "Counting"
        }

        fn process(&self, query: PlaceQuery) -> QueryOutcome {
            self.0.fetch_add(1, Ordering::SeqCst);
            QueryOutcome::Continue(query)
        }
    }

    #[test]
    fn test_empty_chain_passes_query_through() {
        let query = PlaceQuery::single_line("766-68 Any St.");
        let outcome = PreprocessorChain::new().run(query.clone());
        assert_eq!(outcome, QueryOutcome::Continue(query));
    }

    #[test]
    fn test_stages_run_in_order() {
        let chain = PreprocessorChain::new()
            .add(ReplaceRangeWithNumber::new())
            .add(RequireCountry::with_default("US"));

        let query = PlaceQuery::structured().with_address("766-68 Any St.");
        let query = chain.run(query).into_query().unwrap();

        assert_eq!(query.address, "766 Any St.");
        assert_eq!(query.country, "US");
        assert_eq!(chain.stage_names(), vec!["ReplaceRangeWithNumber", "RequireCountry"]);
    }

    #[test]
    fn test_cancellation_stops_the_chain() {
        let counter = Arc::new(AtomicUsize::new(0));
        let chain = PreprocessorChain::new()
            .add(CancelIfPoBox::new())
            .add(Counting(counter.clone()));

        let outcome = chain.run(PlaceQuery::single_line("PO Box 123"));

        match outcome {
            QueryOutcome::Cancelled(CancelReason { preprocessor, .. }) => {
                assert_eq!(preprocessor, "CancelIfPoBox")
            }
            other => panic!("expected cancellation, got {:?}", other),
        }
        assert_eq!(counter.load(Ordering::SeqCst), 0);
    }
}
