//! Error types for the places crate.

use thiserror::Error;

/// Errors raised while constructing query or candidate values.
///
/// Pipeline stages never produce these; they only surface at construction
/// time, when a caller hands us something that cannot be represented.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlacesError {
    /// Viewbox edges are inverted
    #[error("Invalid viewbox: left={left} right={right} bottom={bottom} top={top}")]
    InvalidViewbox {
        left: f64,
        right: f64,
        bottom: f64,
        top: f64,
    },

    /// Attribute name is not part of the candidate schema
    #[error("Unknown candidate attribute: {0}")]
    UnknownAttribute(String),
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, PlacesError>;
