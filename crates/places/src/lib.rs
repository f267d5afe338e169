//! # Places Crate
//!
//! The data model shared by every stage of the geocoding pipeline.
//!
//! ## Main Components
//!
//! - **query**: `PlaceQuery` (the address search request) and `Viewbox`
//! - **candidate**: `Candidate` (one normalized result) with name-keyed
//!   attribute access through `CandidateAttr` / `AttrValue`
//! - **country**: ISO2 / ISO3 / name normalization
//! - **error**: Error types for invalid construction input
//!
//! ## Example Usage
//!
//! ```ignore
//! use places::{Candidate, CandidateAttr, PlaceQuery};
//!
//! let query = PlaceQuery::single_line("1200 Main St, Springfield, IL 62701");
//!
//! let mut candidate = Candidate::new("1200 MAIN ST, SPRINGFIELD, IL", -89.65, 39.79, "Bing")
//!     .with_confidence("High");
//! candidate.set(CandidateAttr::Score, 100.into());
//! ```

pub mod candidate;
pub mod country;
pub mod error;
pub mod query;

pub use candidate::{AttrValue, Candidate, CandidateAttr};
pub use country::{lookup_country, normalize_country, Country, CountryFormat};
pub use error::{PlacesError, Result};
pub use query::{PlaceQuery, QueryField, Viewbox, DEFAULT_WKID};
