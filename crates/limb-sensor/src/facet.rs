//! Sensor cross-sections and the facets bounding them.
//!
//! All directions live in the sensor model frame: the apex is the origin and
//! the boresight is +Z. Edge directions are ordered counter-clockwise about
//! the boresight, so every planar facet's outward normal is `end × start`.

use std::f64::consts::{FRAC_PI_2, PI, TAU};

use glam::DVec3;
use limb_math::{EPSILON10, EPSILON12};

use crate::error::HorizonError;

/// Clock-angle interval of a partial cone, radians, measured in the cone's
/// local frame from local +X toward local +Y.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClockRange {
    pub minimum: f64,
    pub maximum: f64,
}

impl ClockRange {
    pub const FULL: ClockRange = ClockRange {
        minimum: 0.0,
        maximum: TAU,
    };

    pub fn new(minimum: f64, maximum: f64) -> Result<Self, HorizonError> {
        if !(minimum.is_finite() && maximum.is_finite()) || maximum <= minimum {
            return Err(HorizonError::InvalidShape(format!(
                "clock range [{minimum}, {maximum}] is empty"
            )));
        }
        if maximum - minimum > TAU + EPSILON10 {
            return Err(HorizonError::InvalidShape(format!(
                "clock range [{minimum}, {maximum}] exceeds a full turn"
            )));
        }
        Ok(Self { minimum, maximum })
    }

    pub fn span(&self) -> f64 {
        self.maximum - self.minimum
    }

    pub fn is_full(&self) -> bool {
        self.span() >= TAU - EPSILON10
    }

    /// Outward normals of the two clock-limit planes in the cone's local
    /// frame: `(sin φmin, −cos φmin, 0)` and `(−sin φmax, cos φmax, 0)`.
    pub fn limit_normals(&self) -> (DVec3, DVec3) {
        let (sin_min, cos_min) = self.minimum.sin_cos();
        let (sin_max, cos_max) = self.maximum.sin_cos();
        (
            DVec3::new(sin_min, -cos_min, 0.0),
            DVec3::new(-sin_max, cos_max, 0.0),
        )
    }

    /// Returns true if a local-frame direction falls within the clock range.
    ///
    /// Below a half turn the range is convex and both limit planes must hold;
    /// above it the range is the union of the two half-spaces.
    pub fn contains_local(&self, local: DVec3) -> bool {
        if self.is_full() {
            return true;
        }
        let (n_min, n_max) = self.limit_normals();
        let inside_min = local.dot(n_min) <= 0.0;
        let inside_max = local.dot(n_max) <= 0.0;
        if self.span() < PI {
            inside_min && inside_max
        } else {
            inside_min || inside_max
        }
    }
}

impl Default for ClockRange {
    fn default() -> Self {
        Self::FULL
    }
}

/// Sector of a plane through the apex, between two edge directions.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlanarFacet {
    pub start: DVec3,
    pub end: DVec3,
}

impl PlanarFacet {
    pub fn new(start: DVec3, end: DVec3) -> Self {
        Self {
            start: start.normalize(),
            end: end.normalize(),
        }
    }

    /// Unit normal pointing out of the sensor volume.
    pub fn outward_normal(&self) -> DVec3 {
        self.end.cross(self.start).normalize_or_zero()
    }

    /// Returns true if a direction in the facet plane lies within the sector.
    ///
    /// Compares against the bisector, so the opposite ray is rejected.
    pub fn spans(&self, direction: DVec3) -> bool {
        let Some(direction) = direction.try_normalize() else {
            return false;
        };
        let Some(bisector) = (self.start + self.end).try_normalize() else {
            return false;
        };
        direction.dot(bisector) >= self.start.dot(bisector) - EPSILON12
    }
}

/// Circular cone surface about `axis`, optionally limited in clock angle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ConicFacet {
    pub axis: DVec3,
    pub half_angle: f64,
    pub clock: ClockRange,
}

impl ConicFacet {
    /// Local frame `(x, y, axis)`: model X rejected from the axis, falling
    /// back to model Y when the axis lies along X.
    pub fn local_frame(&self) -> (DVec3, DVec3, DVec3) {
        let axis = self.axis.normalize();
        let x = (DVec3::X - axis * axis.x)
            .try_normalize()
            .unwrap_or_else(|| (DVec3::Y - axis * axis.y).normalize());
        (x, axis.cross(x), axis)
    }

    /// Model-frame edge direction at a clock angle.
    pub fn edge_direction(&self, clock: f64) -> DVec3 {
        let (x, y, axis) = self.local_frame();
        let (sin_beta, cos_beta) = self.half_angle.sin_cos();
        let (sin_phi, cos_phi) = clock.sin_cos();
        (x * cos_phi + y * sin_phi) * sin_beta + axis * cos_beta
    }

    /// Clock-range test for a model-frame direction.
    pub fn clock_contains(&self, direction: DVec3) -> bool {
        let (x, y, axis) = self.local_frame();
        let local = DVec3::new(direction.dot(x), direction.dot(y), direction.dot(axis));
        self.clock.contains_local(local)
    }
}

/// One bounding surface of a sensor volume.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Facet {
    Planar(PlanarFacet),
    Conic(ConicFacet),
}

/// Cross-section of a sensor volume, apex at the model origin.
#[derive(Clone, Debug, PartialEq)]
pub enum SensorShape {
    /// Convex polygonal pyramid given by unit edge directions.
    Polygon { directions: Vec<DVec3> },
    /// Circular cone about +Z, optionally clock-limited.
    Cone { half_angle: f64, clock: ClockRange },
}

impl SensorShape {
    /// Pyramid from arbitrary edge directions.
    ///
    /// Directions must describe a convex cross-section ordered
    /// counter-clockwise about the boresight.
    pub fn custom(directions: Vec<DVec3>) -> Result<Self, HorizonError> {
        if directions.len() < 3 {
            return Err(HorizonError::InvalidShape(format!(
                "a polygonal sensor needs at least 3 directions, got {}",
                directions.len()
            )));
        }
        let directions = directions
            .into_iter()
            .map(|d| {
                d.try_normalize().ok_or_else(|| {
                    HorizonError::InvalidShape(format!("direction {d:?} has no length"))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let boresight = directions
            .iter()
            .copied()
            .sum::<DVec3>()
            .try_normalize()
            .ok_or_else(|| HorizonError::InvalidShape("directions cancel out".to_string()))?;

        let n = directions.len();
        for i in 0..n {
            let start = directions[i];
            let end = directions[(i + 1) % n];
            if start.cross(end).dot(boresight) <= 0.0 {
                return Err(HorizonError::InvalidShape(format!(
                    "directions {i} and {} are not counter-clockwise about the boresight",
                    (i + 1) % n
                )));
            }
            let normal = end.cross(start).normalize_or_zero();
            if directions.iter().any(|d| d.dot(normal) > EPSILON10) {
                return Err(HorizonError::InvalidShape(format!(
                    "cross-section is not convex at direction {i}"
                )));
            }
        }
        Ok(SensorShape::Polygon { directions })
    }

    /// Rectangular pyramid with half angles about the X and Y axes.
    pub fn rectangular(x_half_angle: f64, y_half_angle: f64) -> Result<Self, HorizonError> {
        for angle in [x_half_angle, y_half_angle] {
            if !(angle > 0.0 && angle < FRAC_PI_2) {
                return Err(HorizonError::InvalidShape(format!(
                    "rectangular half angle {angle} must be in (0, π/2)"
                )));
            }
        }
        let (x, y) = (x_half_angle.tan(), y_half_angle.tan());
        Self::custom(vec![
            DVec3::new(x, y, 1.0),
            DVec3::new(-x, y, 1.0),
            DVec3::new(-x, -y, 1.0),
            DVec3::new(x, -y, 1.0),
        ])
    }

    /// Regular polygon inscribed in a circular cone.
    pub fn polygonal_cone(half_angle: f64, facet_count: usize) -> Result<Self, HorizonError> {
        if facet_count < 3 {
            return Err(HorizonError::InvalidShape(format!(
                "a polygonal cone needs at least 3 facets, got {facet_count}"
            )));
        }
        if !(half_angle > 0.0 && half_angle < FRAC_PI_2) {
            return Err(HorizonError::InvalidShape(format!(
                "polygonal cone half angle {half_angle} must be in (0, π/2)"
            )));
        }
        let (sin_beta, cos_beta) = half_angle.sin_cos();
        let directions = (0..facet_count)
            .map(|k| {
                let (sin_phi, cos_phi) = (TAU * k as f64 / facet_count as f64).sin_cos();
                DVec3::new(sin_beta * cos_phi, sin_beta * sin_phi, cos_beta)
            })
            .collect();
        Ok(SensorShape::Polygon { directions })
    }

    /// Circular cone about +Z.
    pub fn conic(half_angle: f64, clock: ClockRange) -> Result<Self, HorizonError> {
        if !(half_angle > 0.0 && half_angle < PI) {
            return Err(HorizonError::InvalidShape(format!(
                "cone half angle {half_angle} must be in (0, π)"
            )));
        }
        Ok(SensorShape::Cone { half_angle, clock })
    }

    pub fn boresight(&self) -> DVec3 {
        match self {
            SensorShape::Polygon { directions } => directions
                .iter()
                .copied()
                .sum::<DVec3>()
                .try_normalize()
                .unwrap_or(DVec3::Z),
            SensorShape::Cone { .. } => DVec3::Z,
        }
    }

    /// Bounding facets, in counter-clockwise order about the boresight.
    ///
    /// A clock-limited cone contributes its cone surface plus one planar
    /// sector per clock limit, each running between the boresight and the
    /// limit edge.
    pub fn facets(&self) -> Vec<Facet> {
        match self {
            SensorShape::Polygon { directions } => {
                let n = directions.len();
                (0..n)
                    .map(|i| {
                        Facet::Planar(PlanarFacet {
                            start: directions[i],
                            end: directions[(i + 1) % n],
                        })
                    })
                    .collect()
            }
            SensorShape::Cone { half_angle, clock } => {
                let cone = ConicFacet {
                    axis: DVec3::Z,
                    half_angle: *half_angle,
                    clock: *clock,
                };
                let mut facets = vec![Facet::Conic(cone)];
                if !clock.is_full() {
                    facets.push(Facet::Planar(PlanarFacet {
                        start: cone.edge_direction(clock.maximum),
                        end: cone.axis,
                    }));
                    facets.push(Facet::Planar(PlanarFacet {
                        start: cone.axis,
                        end: cone.edge_direction(clock.minimum),
                    }));
                }
                facets
            }
        }
    }

    pub fn facet_count(&self) -> usize {
        match self {
            SensorShape::Polygon { directions } => directions.len(),
            SensorShape::Cone { clock, .. } if clock.is_full() => 1,
            SensorShape::Cone { .. } => 3,
        }
    }

    /// Closed loop of unit directions tracing the cross-section boundary.
    ///
    /// Polygons return their own edge directions. Cones are sampled with
    /// `samples` directions; a clock-limited cone samples its arc inclusively
    /// and closes the loop through the boresight.
    pub fn sample_directions(&self, samples: usize) -> Vec<DVec3> {
        match self {
            SensorShape::Polygon { directions } => directions.clone(),
            SensorShape::Cone { half_angle, clock } => {
                let cone = ConicFacet {
                    axis: DVec3::Z,
                    half_angle: *half_angle,
                    clock: *clock,
                };
                let samples = samples.max(3);
                if clock.is_full() {
                    (0..samples)
                        .map(|k| cone.edge_direction(TAU * k as f64 / samples as f64))
                        .collect()
                } else {
                    let mut loop_directions: Vec<DVec3> = (0..=samples)
                        .map(|k| {
                            cone.edge_direction(
                                clock.minimum + clock.span() * k as f64 / samples as f64,
                            )
                        })
                        .collect();
                    loop_directions.push(cone.axis);
                    loop_directions
                }
            }
        }
    }

    /// Returns true if a model-frame direction points into the sensor volume.
    pub fn contains_direction(&self, direction: DVec3) -> bool {
        let Some(direction) = direction.try_normalize() else {
            return false;
        };
        match self {
            SensorShape::Polygon { .. } => self.facets().iter().all(|facet| match facet {
                Facet::Planar(planar) => direction.dot(planar.outward_normal()) <= EPSILON12,
                Facet::Conic(_) => true,
            }),
            SensorShape::Cone { half_angle, clock } => {
                let cone = ConicFacet {
                    axis: DVec3::Z,
                    half_angle: *half_angle,
                    clock: *clock,
                };
                direction.z >= half_angle.cos() - EPSILON12 && cone.clock_contains(direction)
            }
        }
    }
}
