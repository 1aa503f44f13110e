//! Horizon crossings: points where a sensor facet meets the ellipsoid limb.

use glam::DVec3;
use limb_math::EPSILON12;

/// Whether the horizon arc following a crossing (counter-clockwise) lies
/// inside the sensor volume.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CrossingKind {
    /// The horizon enters the sensor volume here.
    On,
    /// The horizon leaves the sensor volume here.
    Off,
    /// Not yet resolved against the other crossings.
    #[default]
    Undetermined,
}

impl CrossingKind {
    /// Signed integer code: +1, -1 or 0.
    pub fn sign(self) -> i32 {
        match self {
            CrossingKind::On => 1,
            CrossingKind::Off => -1,
            CrossingKind::Undetermined => 0,
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            CrossingKind::On => CrossingKind::Off,
            CrossingKind::Off => CrossingKind::On,
            CrossingKind::Undetermined => CrossingKind::Undetermined,
        }
    }
}

/// A single facet/limb intersection.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Crossing {
    /// Index of the facet that produced this crossing.
    pub facet_index: usize,
    /// Apex-to-limb vector in the sensor model frame. Its length is the
    /// distance to the limb point.
    pub direction_model: DVec3,
    /// The limb point in the ellipsoid's scaled space (unit length).
    pub direction_scaled: DVec3,
    /// Angular position on the horizon circle.
    pub angle_cosine: f64,
    pub angle_sine: f64,
    pub kind: CrossingKind,
    /// Outward normal of the facet surface at the crossing, in scaled space.
    pub surface_normal: DVec3,
}

impl Crossing {
    /// Angle on the horizon circle in `[0, 2π)`. Only for display and
    /// diagnostics; ordering uses [`crate::compare_angular_position`].
    pub fn angle(&self) -> f64 {
        let angle = self.angle_sine.atan2(self.angle_cosine);
        if angle < 0.0 {
            angle + std::f64::consts::TAU
        } else {
            angle
        }
    }

    /// Returns true if the angular position is defined.
    pub fn has_angle(&self) -> bool {
        !(self.angle_sine == 0.0 && self.angle_cosine == 0.0)
    }

    /// Two crossings are duplicates when their model directions point the
    /// same way to within `EPSILON12` (squared cross product of unit vectors).
    pub fn is_duplicate_of(&self, other: &Crossing) -> bool {
        same_direction(self.direction_model, other.direction_model)
    }
}

pub(crate) fn same_direction(a: DVec3, b: DVec3) -> bool {
    let (Some(a), Some(b)) = (a.try_normalize(), b.try_normalize()) else {
        return false;
    };
    a.dot(b) > 0.0 && a.cross(b).length_squared() < EPSILON12
}
