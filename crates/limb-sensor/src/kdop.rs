//! Discrete oriented polytope bounding a sensor volume, for culling.

use std::f64::consts::{FRAC_PI_2, PI};

use glam::DVec3;

use crate::facet::{ConicFacet, Facet, SensorShape};

/// Half-space `normal · p <= offset`, model frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HalfSpace {
    /// Unit normal pointing out of the volume.
    pub normal: DVec3,
    pub offset: f64,
}

impl HalfSpace {
    pub fn signed_distance(&self, point: DVec3) -> f64 {
        self.normal.dot(point) - self.offset
    }
}

/// Result of testing a bounding volume against a [`KDop`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Intersection {
    Inside,
    Outside,
    Intersecting,
}

/// Convex intersection of half-spaces containing the sensor volume.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct KDop {
    planes: Vec<HalfSpace>,
}

impl KDop {
    /// Bound `shape` out to `radius`.
    ///
    /// Planar facets contribute their own planes. A cone narrower than a
    /// hemisphere contributes `conic_planes` tangent planes spread over its
    /// clock range; wider cones are bounded by the cap alone. The cap plane
    /// sits at the radius along the boresight.
    pub fn from_shape(shape: &SensorShape, radius: f64, conic_planes: usize) -> Self {
        let facets = shape.facets();
        let convex_clock = match shape {
            SensorShape::Cone { clock, .. } => clock.span() <= PI,
            SensorShape::Polygon { .. } => true,
        };

        let mut planes = Vec::with_capacity(facets.len() + conic_planes + 1);
        for facet in &facets {
            match facet {
                Facet::Planar(planar) if convex_clock => planes.push(HalfSpace {
                    normal: planar.outward_normal(),
                    offset: 0.0,
                }),
                Facet::Planar(_) => {}
                Facet::Conic(cone) => planes.extend(tangent_planes(cone, conic_planes)),
            }
        }
        planes.push(HalfSpace {
            normal: shape.boresight(),
            offset: radius,
        });
        Self { planes }
    }

    pub fn planes(&self) -> &[HalfSpace] {
        &self.planes
    }

    pub fn len(&self) -> usize {
        self.planes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.planes.is_empty()
    }

    pub fn contains_point(&self, point: DVec3) -> bool {
        self.planes.iter().all(|p| p.signed_distance(point) <= 0.0)
    }

    /// Classify a sphere: fully inside, fully outside, or straddling a plane.
    pub fn test_sphere(&self, center: DVec3, radius: f64) -> Intersection {
        let mut result = Intersection::Inside;
        for plane in &self.planes {
            let distance = plane.signed_distance(center);
            if distance > radius {
                return Intersection::Outside;
            }
            if distance > -radius {
                result = Intersection::Intersecting;
            }
        }
        result
    }
}

/// Planes through the apex touching the cone along evenly spread edges.
fn tangent_planes(cone: &ConicFacet, count: usize) -> Vec<HalfSpace> {
    if cone.half_angle >= FRAC_PI_2 || count == 0 {
        return Vec::new();
    }
    let (x, y, axis) = cone.local_frame();
    let (sin_beta, cos_beta) = cone.half_angle.sin_cos();
    let full = cone.clock.is_full();
    let steps = if full { count } else { count.max(2) - 1 };
    let count = if full { count } else { count.max(2) };
    (0..count)
        .map(|k| {
            let phi = cone.clock.minimum + cone.clock.span() * k as f64 / steps as f64;
            let (sin_phi, cos_phi) = phi.sin_cos();
            let radial = x * cos_phi + y * sin_phi;
            HalfSpace {
                normal: (radial * cos_beta - axis * sin_beta).normalize(),
                offset: 0.0,
            }
        })
        .collect()
}
