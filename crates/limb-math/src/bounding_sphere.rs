use glam::DVec3;

/// Sphere enclosing a set of points, used to cull generated meshes.
///
/// Built from the axis-aligned bounds of the points: the center is the box
/// center and the radius the farthest point from it. Not minimal, but cheap
/// and stable from frame to frame.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct BoundingSphere {
    pub center: DVec3,
    pub radius: f64,
}

impl BoundingSphere {
    /// Create a sphere from a center and a non-negative radius.
    pub fn new(center: DVec3, radius: f64) -> Self {
        debug_assert!(radius >= 0.0, "bounding sphere radius must be non-negative");
        Self { center, radius }
    }

    /// Enclose every point yielded by `points`.
    ///
    /// Returns the default (zero-radius sphere at the origin) for an empty set.
    pub fn from_points<I>(points: I) -> Self
    where
        I: IntoIterator<Item = DVec3>,
        I::IntoIter: Clone,
    {
        let iter = points.into_iter();
        let mut min = DVec3::splat(f64::INFINITY);
        let mut max = DVec3::splat(f64::NEG_INFINITY);
        let mut any = false;
        for p in iter.clone() {
            min = min.min(p);
            max = max.max(p);
            any = true;
        }
        if !any {
            return Self::default();
        }

        let center = (min + max) * 0.5;
        let radius_squared = iter.fold(0.0_f64, |acc, p| acc.max(center.distance_squared(p)));
        Self::new(center, radius_squared.sqrt())
    }

    /// Returns true if the point lies inside or on the sphere.
    pub fn contains_point(&self, point: DVec3) -> bool {
        self.center.distance_squared(point) <= self.radius * self.radius
    }
}
