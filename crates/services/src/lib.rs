//! # Services Crate
//!
//! Geocoding provider adapters and the per-provider pipeline wrapper.
//!
//! ## Main Components
//!
//! - **service**: `GeocodeService` trait and `ServicePipeline`, which runs an
//!   adapter between its preprocessor and postprocessor chains
//! - **bing / census / mapquest / nominatim**: provider adapters with their
//!   default chains
//! - **transport**: `JsonTransport`, the seam to whatever HTTP client the
//!   caller uses
//! - **settings**: `ServiceSettings` loaded from code, env/.env or TOML
//! - **error**: `ServiceError`
//!
//! ## Example Usage
//!
//! ```ignore
//! use services::{Bing, ServicePipeline, ServiceSettings};
//!
//! let settings = ServiceSettings::from_env("BING");
//! let bing = ServicePipeline::new(Bing::new(transport.clone(), &settings)?);
//!
//! let outcome = bing.run(PlaceQuery::single_line("1 Microsoft Way, Redmond, WA"))?;
//! if outcome.threshold_met() {
//!     // good enough, skip the remaining providers
//! }
//! ```

mod json;

pub mod bing;
pub mod census;
pub mod error;
pub mod mapquest;
pub mod nominatim;
pub mod service;
pub mod settings;
pub mod transport;

pub use bing::Bing;
pub use census::UsCensus;
pub use error::{Result, ServiceError};
pub use mapquest::{MapQuest, MapQuestEndpoint};
pub use nominatim::Nominatim;
pub use service::{GeocodeService, ServiceOutcome, ServicePipeline};
pub use settings::ServiceSettings;
pub use transport::{JsonTransport, RequestParams, decode_json};
