//! Horizon computation error types.

/// Errors surfaced by the horizon pipeline.
///
/// Degenerate geometry (tangent planes, apex inside the ellipsoid, grazing
/// corners) is not an error: it simply produces no crossings.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum HorizonError {
    /// A portion-to-display value that names no known mode.
    #[error("unrecognized portion to display: {0}")]
    InvalidPortion(String),

    /// A crossing whose angular position on the horizon circle is undefined.
    #[error("crossing from facet {facet_index} has no angular position on the horizon circle")]
    UndefinedCrossingAngle { facet_index: usize },

    /// Sensor shape parameters that do not describe a usable volume.
    #[error("invalid sensor shape: {0}")]
    InvalidShape(String),

    /// Sensor radius that is zero, negative, or not finite.
    #[error("sensor radius must be positive and finite, got {0}")]
    InvalidRadius(f64),
}
