//! Horizon circle of an ellipsoid as seen from a sensor apex.
//!
//! In scaled space the ellipsoid is the unit sphere and the apex sits at `q`.
//! Every tangent ray from `q` touches the sphere on the circle
//! `{X : |X| = 1, X·q = 1}`, centred at `q̂/|q|` with radius `√(1 − 1/|q|²)`.
//! Angles on that circle are measured from `e1` toward `e2 = q̂ × e1`, i.e.
//! counter-clockwise about `q̂`.

use glam::{DMat3, DMat4, DVec3};
use limb_math::EPSILON10;

use crate::ellipsoid::Ellipsoid;

/// Per-update horizon geometry for one apex and ellipsoid.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HorizonFrame {
    ellipsoid: Ellipsoid,
    apex: DVec3,
    rotation: DMat3,
    inverse_rotation: DMat3,
    q: DVec3,
    q_magnitude: f64,
    q_unit: DVec3,
    center: DVec3,
    radius: f64,
    e1: DVec3,
    e2: DVec3,
}

impl HorizonFrame {
    /// Build the frame for a sensor placed by `model_matrix` (model → world).
    ///
    /// Returns `None` when the apex is inside or on the ellipsoid: there is no
    /// horizon to cross.
    pub fn new(ellipsoid: &Ellipsoid, model_matrix: &DMat4) -> Option<Self> {
        let apex = model_matrix.transform_point3(DVec3::ZERO);
        let q = ellipsoid.transform_position_to_scaled_space(apex);
        let q_squared = q.length_squared();
        if !q_squared.is_finite() || q_squared <= 1.0 + EPSILON10 {
            return None;
        }

        let rotation = DMat3::from_mat4(*model_matrix);
        let inverse_rotation = rotation.inverse();
        if !inverse_rotation.is_finite() {
            return None;
        }

        let q_magnitude = q_squared.sqrt();
        let q_unit = q / q_magnitude;
        let center = q_unit / q_magnitude;
        let radius = (1.0 - 1.0 / q_squared).sqrt();

        let reference = ellipsoid.transform_position_to_scaled_space(rotation.x_axis);
        let e1 = reject(reference, q_unit).unwrap_or_else(|| least_aligned_axis(q_unit));
        let e2 = q_unit.cross(e1);

        Some(Self {
            ellipsoid: *ellipsoid,
            apex,
            rotation,
            inverse_rotation,
            q,
            q_magnitude,
            q_unit,
            center,
            radius,
            e1,
            e2,
        })
    }

    pub fn ellipsoid(&self) -> &Ellipsoid {
        &self.ellipsoid
    }

    /// Sensor apex, world frame.
    pub fn apex(&self) -> DVec3 {
        self.apex
    }

    /// Model → world rotation.
    pub fn rotation(&self) -> DMat3 {
        self.rotation
    }

    /// Apex in scaled space.
    pub fn q(&self) -> DVec3 {
        self.q
    }

    pub fn q_magnitude(&self) -> f64 {
        self.q_magnitude
    }

    pub fn q_unit(&self) -> DVec3 {
        self.q_unit
    }

    /// Centre of the horizon circle, scaled space.
    pub fn circle_center(&self) -> DVec3 {
        self.center
    }

    pub fn circle_radius(&self) -> f64 {
        self.radius
    }

    pub fn e1(&self) -> DVec3 {
        self.e1
    }

    pub fn e2(&self) -> DVec3 {
        self.e2
    }

    /// Limb point (scaled space) at an angular position on the circle.
    pub fn limb_point(&self, cosine: f64, sine: f64) -> DVec3 {
        self.center + (self.e1 * cosine + self.e2 * sine) * self.radius
    }

    /// Angular position of a scaled-space point, projected onto the circle
    /// plane. `(0, 0)` when the point sits on the axis.
    pub fn angle_of(&self, scaled: DVec3) -> (f64, f64) {
        let offset = scaled - self.center;
        let (x, y) = (offset.dot(self.e1), offset.dot(self.e2));
        let length = x.hypot(y);
        if length == 0.0 {
            (0.0, 0.0)
        } else {
            (x / length, y / length)
        }
    }

    /// Apex-to-point vector in the model frame for a scaled-space point.
    pub fn scaled_to_model(&self, scaled: DVec3) -> DVec3 {
        let world = self.ellipsoid.transform_scaled_to_position(scaled);
        self.inverse_rotation * (world - self.apex)
    }

    /// Linear part of [`Self::scaled_to_model`]: scaled offsets to model vectors.
    pub fn scaled_offset_to_model(&self) -> DMat3 {
        self.inverse_rotation * DMat3::from_diagonal(self.ellipsoid.radii())
    }

    /// Model-frame direction into world space.
    pub fn model_to_world_direction(&self, direction: DVec3) -> DVec3 {
        self.rotation * direction
    }

    /// Model-frame vector from the apex to a limb point.
    pub fn limb_direction_model(&self, cosine: f64, sine: f64) -> DVec3 {
        self.scaled_to_model(self.limb_point(cosine, sine))
    }

    /// Centre of the limb ellipse, model frame.
    pub fn limb_center_model(&self) -> DVec3 {
        self.scaled_to_model(self.center)
    }

    /// Unit model-frame direction from the apex toward the limb centre.
    pub fn axis_model(&self) -> DVec3 {
        self.limb_center_model().normalize_or_zero()
    }

    /// Tangent of the circle at a point, pointing counter-clockwise.
    pub fn ccw_tangent(&self, scaled: DVec3) -> DVec3 {
        self.q_unit.cross(scaled - self.center)
    }

    /// Distance from the apex to the limb along the reference direction.
    /// Exact for spheres.
    pub fn horizon_distance(&self) -> f64 {
        self.limb_direction_model(1.0, 0.0).length()
    }

    /// Height of the apex above the ellipsoid along the line to its centre.
    pub fn apex_altitude(&self) -> f64 {
        self.apex.length() * (1.0 - 1.0 / self.q_magnitude)
    }
}

fn reject(v: DVec3, unit: DVec3) -> Option<DVec3> {
    (v - unit * v.dot(unit))
        .try_normalize()
        .filter(|r| r.is_finite())
}

fn least_aligned_axis(unit: DVec3) -> DVec3 {
    let abs = unit.abs();
    let axis = if abs.x <= abs.y && abs.x <= abs.z {
        DVec3::X
    } else if abs.y <= abs.z {
        DVec3::Y
    } else {
        DVec3::Z
    };
    (axis - unit * axis.dot(unit)).normalize()
}
