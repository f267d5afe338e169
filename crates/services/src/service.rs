//! Provider adapter contract and the per-provider pipeline wrapper.

use crate::error::Result;
use pipeline::{
    CancelReason, Postprocessed, Postprocessor, PostprocessorChain, Preprocessor,
    PreprocessorChain, QueryOutcome,
};
use places::{Candidate, PlaceQuery};
use tracing::{debug, instrument};

/// One geocoding provider.
///
/// `geocode` builds the provider request from the query, sends it and maps
/// each raw row into a `Candidate` with `geoservice` set and numeric
/// coordinates. Zero matches is an empty list, not an error.
///
/// The default chains are factory methods so every caller gets fresh
/// instances; nothing is shared between pipelines.
pub trait GeocodeService: Send + Sync {
    fn name(&self) -> &str;

    fn geocode(&self, query: &PlaceQuery) -> Result<Vec<Candidate>>;

    fn default_preprocessors(&self) -> Vec<Box<dyn Preprocessor>> {
        Vec::new()
    }

    fn default_postprocessors(&self) -> Vec<Box<dyn Postprocessor>> {
        Vec::new()
    }
}

/// Result of running one provider through its chains.
#[derive(Debug, Clone, PartialEq)]
pub enum ServiceOutcome {
    /// A preprocessor vetoed the query; the provider was never called
    Cancelled(CancelReason),
    Completed(Postprocessed),
}

impl ServiceOutcome {
    pub fn candidates(&self) -> &[Candidate] {
        match self {
            ServiceOutcome::Cancelled(_) => &[],
            ServiceOutcome::Completed(result) => &result.candidates,
        }
    }

    pub fn into_candidates(self) -> Vec<Candidate> {
        match self {
            ServiceOutcome::Cancelled(_) => Vec::new(),
            ServiceOutcome::Completed(result) => result.candidates,
        }
    }

    /// True when the postprocessor chain reported its score threshold met.
    pub fn threshold_met(&self) -> bool {
        matches!(self, ServiceOutcome::Completed(result) if result.threshold_met())
    }
}

/// A provider adapter together with its preprocessor and postprocessor
/// chains.
///
/// ## Usage
/// ```ignore
/// let bing = ServicePipeline::new(Bing::new(transport, settings)?);
///
/// // or replace a default chain wholesale:
/// let nominatim = ServicePipeline::new(Nominatim::new(transport))
///     .with_postprocessors(PostprocessorChain::new().add(ScoreSorter));
/// ```
pub struct ServicePipeline {
    service: Box<dyn GeocodeService>,
    preprocessors: PreprocessorChain,
    postprocessors: PostprocessorChain,
}

impl ServicePipeline {
    /// Wrap `service` with its default chains.
    pub fn new(service: impl GeocodeService + 'static) -> Self {
        let preprocessors = PreprocessorChain::from_stages(service.default_preprocessors());
        let postprocessors = PostprocessorChain::from_stages(service.default_postprocessors());
        Self {
            service: Box::new(service),
            preprocessors,
            postprocessors,
        }
    }

    pub fn with_preprocessors(mut self, chain: PreprocessorChain) -> Self {
        self.preprocessors = chain;
        self
    }

    pub fn with_postprocessors(mut self, chain: PostprocessorChain) -> Self {
        self.postprocessors = chain;
        self
    }

    pub fn name(&self) -> &str {
        self.service.name()
    }

    pub fn preprocessors(&self) -> &PreprocessorChain {
        &self.preprocessors
    }

    pub fn postprocessors(&self) -> &PostprocessorChain {
        &self.postprocessors
    }

    /// Preprocess, call the provider unless cancelled, postprocess.
    ///
    /// Adapter errors propagate unchanged; the caller decides whether to move
    /// on to the next provider.
    #[instrument(skip(self, query), fields(service = self.service.name()))]
    pub fn run(&self, query: PlaceQuery) -> Result<ServiceOutcome> {
        let query = match self.preprocessors.run(query) {
            QueryOutcome::Continue(query) => query,
            QueryOutcome::Cancelled(reason) => {
                debug!("Skipping provider call: {}", reason);
                return Ok(ServiceOutcome::Cancelled(reason));
            }
        };

        let raw = self.service.geocode(&query)?;
        debug!("Provider returned {} raw candidates", raw.len());

        Ok(ServiceOutcome::Completed(self.postprocessors.run(raw)))
    }
}
