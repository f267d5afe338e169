//! Geocoder crate: runs queries across provider pipelines.
//!
//! This crate contains the orchestrator that queries providers in order,
//! stopping early once one of them returns a good enough match, and the
//! tracing setup shared by binaries embedding it.
//!
//! ## Example Usage
//! ```ignore
//! use geocoder::{Geocoder, init_tracing, DEFAULT_FILTER};
//! use services::{Bing, Nominatim, ServicePipeline, ServiceSettings};
//!
//! init_tracing(DEFAULT_FILTER)?;
//! let geocoder = Geocoder::new(vec![
//!     ServicePipeline::new(Bing::new(transport.clone(), &ServiceSettings::from_env("BING"))?),
//!     ServicePipeline::new(Nominatim::new(transport)),
//! ]);
//!
//! let result = geocoder.geocode(&PlaceQuery::single_line("340 N 12th St, Philadelphia"))?;
//! ```

pub mod logging;
pub mod orchestrator;

pub use logging::{DEFAULT_FILTER, init_tracing};
pub use orchestrator::{FailurePolicy, GeocodeResult, Geocoder, ProviderReport, ProviderStatus};
