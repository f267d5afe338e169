//! # Geocode Orchestrator
//!
//! Runs one query through an ordered list of provider pipelines:
//! 1. Each provider gets its own copy of the query and runs its
//!    preprocessor chain (which may cancel it)
//! 2. The provider is called and its candidates run through the
//!    postprocessor chain
//! 3. Candidates are appended to the combined result
//! 4. If the provider's chain reported its score threshold met, the
//!    remaining providers are skipped
//!
//! Batches of independent queries run concurrently, either on tokio's
//! blocking pool (`geocode_many`) or on the rayon pool (`geocode_batch`).

use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use rayon::prelude::*;
use tracing::{debug, info, instrument, warn};

use places::{Candidate, PlaceQuery};
use services::{ServiceOutcome, ServicePipeline};

/// What to do when a provider call fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Record the failure and move on to the next provider
    #[default]
    Continue,
    /// Stop and return the error
    Abort,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ProviderStatus {
    /// A preprocessor vetoed the query; carries the reason
    Cancelled(String),
    /// Provider ran; number of candidates after postprocessing
    Completed(usize),
    Failed(String),
    /// Not called because an earlier provider met its threshold
    Skipped,
}

/// How one provider fared for one query.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderReport {
    pub provider: String,
    pub status: ProviderStatus,
    pub threshold_met: bool,
}

/// Combined candidates from every provider that ran, in provider order.
#[derive(Debug, Clone, Default)]
pub struct GeocodeResult {
    pub candidates: Vec<Candidate>,
    pub providers: Vec<ProviderReport>,
}

impl GeocodeResult {
    /// True when some provider stopped the run by meeting its threshold.
    pub fn threshold_met(&self) -> bool {
        self.providers.iter().any(|p| p.threshold_met)
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Reports of providers whose call failed.
    pub fn failures(&self) -> impl Iterator<Item = &ProviderReport> {
        self.providers
            .iter()
            .filter(|p| matches!(p.status, ProviderStatus::Failed(_)))
    }
}

/// Ordered set of provider pipelines.
///
/// Cheap to clone; clones share the providers.
#[derive(Clone)]
pub struct Geocoder {
    providers: Arc<Vec<ServicePipeline>>,
    policy: FailurePolicy,
}

impl Geocoder {
    pub fn new(providers: Vec<ServicePipeline>) -> Self {
        Self {
            providers: Arc::new(providers),
            policy: FailurePolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> FailurePolicy {
        self.policy
    }

    pub fn provider_names(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    /// Geocode one query against the providers in order.
    ///
    /// Only fails under `FailurePolicy::Abort`; otherwise failed providers are
    /// recorded in the result and skipped.
    #[instrument(skip(self, query), fields(providers = self.providers.len()))]
    pub fn geocode(&self, query: &PlaceQuery) -> Result<GeocodeResult> {
        let start_time = Instant::now();
        let mut result = GeocodeResult::default();
        let mut stopped = false;

        for provider in self.providers.iter() {
            let name = provider.name().to_string();
            if stopped {
                result.providers.push(ProviderReport {
                    provider: name,
                    status: ProviderStatus::Skipped,
                    threshold_met: false,
                });
                continue;
            }

            let report = match provider.run(query.clone()) {
                Ok(ServiceOutcome::Cancelled(reason)) => {
                    info!("{} cancelled: {}", name, reason);
                    ProviderReport {
                        provider: name,
                        status: ProviderStatus::Cancelled(reason.to_string()),
                        threshold_met: false,
                    }
                }
                Ok(ServiceOutcome::Completed(processed)) => {
                    let threshold_met = processed.threshold_met();
                    let count = processed.candidates.len();
                    info!(
                        "{} returned {} candidates (threshold met: {})",
                        name, count, threshold_met
                    );
                    result.candidates.extend(processed.candidates);
                    stopped = threshold_met;
                    ProviderReport {
                        provider: name,
                        status: ProviderStatus::Completed(count),
                        threshold_met,
                    }
                }
                Err(e) => {
                    if self.policy == FailurePolicy::Abort {
                        return Err(e).with_context(|| format!("Provider {} failed", name));
                    }
                    warn!("{} failed, continuing: {}", name, e);
                    ProviderReport {
                        provider: name,
                        status: ProviderStatus::Failed(e.to_string()),
                        threshold_met: false,
                    }
                }
            };
            result.providers.push(report);
        }

        debug!(
            "Geocoded with {} candidates in {:.2?}",
            result.candidates.len(),
            start_time.elapsed()
        );
        Ok(result)
    }

    /// Geocode independent queries concurrently.
    ///
    /// Each query runs on the blocking pool; results come back in input
    /// order. Every task is awaited before an error is returned, so no
    /// provider call is still in flight when this resolves.
    pub async fn geocode_many(&self, queries: Vec<PlaceQuery>) -> Result<Vec<GeocodeResult>> {
        let count = queries.len();
        let handles: Vec<_> = queries
            .into_iter()
            .map(|query| {
                let geocoder = self.clone();
                tokio::task::spawn_blocking(move || geocoder.geocode(&query))
            })
            .collect();

        let mut outcomes = Vec::with_capacity(count);
        for handle in handles {
            outcomes.push(handle.await);
        }

        let results = outcomes
            .into_iter()
            .enumerate()
            .map(|(index, outcome)| {
                outcome.with_context(|| format!("Geocode task {} panicked", index))?
            })
            .collect::<Result<Vec<_>>>()?;
        info!("Geocoded batch of {} queries", count);
        Ok(results)
    }

    /// Synchronous counterpart of `geocode_many` for callers without a
    /// runtime. Each query keeps its own outcome; results are in input order.
    pub fn geocode_batch(&self, queries: &[PlaceQuery]) -> Vec<Result<GeocodeResult>> {
        let results: Vec<_> = queries.par_iter().map(|query| self.geocode(query)).collect();
        info!(
            "Geocoded batch of {} queries ({} failed)",
            results.len(),
            results.iter().filter(|r| r.is_err()).count()
        );
        results
    }
}
