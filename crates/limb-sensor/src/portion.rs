//! Which part of the sensor volume is shown relative to the horizon.

use std::fmt;
use std::str::FromStr;

use crate::error::HorizonError;

/// Display mode selecting the portion of the sensor volume to mesh.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum PortionToDisplay {
    /// The whole volume out to the sensor radius.
    #[default]
    Complete,
    /// Only the part between the apex and the limb.
    BelowHorizon,
    /// Only the part beyond the limb.
    AboveHorizon,
}

impl PortionToDisplay {
    /// Mesh shape bounding this portion.
    ///
    /// With `show_through_ellipsoid` the complete volume is drawn as the
    /// frustum beyond the limb; otherwise as the pyramid out to the radius.
    pub fn surface_kind(self, show_through_ellipsoid: bool) -> HorizonSurfaceKind {
        match self {
            PortionToDisplay::BelowHorizon => HorizonSurfaceKind::FrontPyramid,
            PortionToDisplay::AboveHorizon => HorizonSurfaceKind::BackPyramid,
            PortionToDisplay::Complete if show_through_ellipsoid => HorizonSurfaceKind::Frustum,
            PortionToDisplay::Complete => HorizonSurfaceKind::BackPyramid,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PortionToDisplay::Complete => "complete",
            PortionToDisplay::BelowHorizon => "below_horizon",
            PortionToDisplay::AboveHorizon => "above_horizon",
        }
    }
}

impl TryFrom<u32> for PortionToDisplay {
    type Error = HorizonError;

    fn try_from(code: u32) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(PortionToDisplay::Complete),
            1 => Ok(PortionToDisplay::BelowHorizon),
            2 => Ok(PortionToDisplay::AboveHorizon),
            other => Err(HorizonError::InvalidPortion(other.to_string())),
        }
    }
}

impl FromStr for PortionToDisplay {
    type Err = HorizonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "complete" => Ok(PortionToDisplay::Complete),
            "below_horizon" => Ok(PortionToDisplay::BelowHorizon),
            "above_horizon" => Ok(PortionToDisplay::AboveHorizon),
            _ => Err(HorizonError::InvalidPortion(s.to_string())),
        }
    }
}

impl fmt::Display for PortionToDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Shape of the emitted horizon mesh.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HorizonSurfaceKind {
    /// Band between the limb ring and the radius ring, capped at both ends.
    Frustum,
    /// Fan from the apex out to the radius ring, capped there.
    BackPyramid,
    /// Fan from the apex to the limb ring, capped there.
    FrontPyramid,
}
