//! Triaxial ellipsoid and its scaled (unit-sphere) space.

use glam::{DMat3, DMat4, DVec3};

/// An ellipsoid centered at the origin, axis-aligned with the world frame.
///
/// Scaled space divides every coordinate by the matching radius, turning the
/// ellipsoid into the unit sphere. Horizon intersections are solved there.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ellipsoid {
    radii: DVec3,
    one_over_radii: DVec3,
    one_over_radii_squared: DVec3,
}

impl Ellipsoid {
    /// WGS84 radii in meters.
    pub const WGS84_RADII: DVec3 = DVec3::new(6_378_137.0, 6_378_137.0, 6_356_752.314_245_179);

    /// Construct an ellipsoid from its three radii.
    ///
    /// # Panics
    ///
    /// Panics if any radius is not positive and finite.
    pub fn new(radii: DVec3) -> Self {
        assert!(
            radii.is_finite() && radii.min_element() > 0.0,
            "Ellipsoid radii must be positive and finite, got {radii:?}"
        );
        Self {
            radii,
            one_over_radii: radii.recip(),
            one_over_radii_squared: (radii * radii).recip(),
        }
    }

    /// The WGS84 reference ellipsoid.
    pub fn wgs84() -> Self {
        Self::new(Self::WGS84_RADII)
    }

    /// A sphere of the given radius.
    pub fn sphere(radius: f64) -> Self {
        Self::new(DVec3::splat(radius))
    }

    /// The unit sphere, for which world and scaled space coincide.
    pub fn unit_sphere() -> Self {
        Self::sphere(1.0)
    }

    pub fn radii(&self) -> DVec3 {
        self.radii
    }

    pub fn one_over_radii(&self) -> DVec3 {
        self.one_over_radii
    }

    /// Map a world position into scaled space.
    pub fn transform_position_to_scaled_space(&self, position: DVec3) -> DVec3 {
        position * self.one_over_radii
    }

    /// Map a scaled-space position back into world space.
    pub fn transform_scaled_to_position(&self, scaled: DVec3) -> DVec3 {
        scaled * self.radii
    }

    /// Outward geodetic surface normal at (or above) a world position.
    pub fn geodetic_surface_normal(&self, position: DVec3) -> DVec3 {
        (position * self.one_over_radii_squared).normalize_or_zero()
    }

    /// Returns true if the world position is inside or on the surface.
    pub fn contains(&self, position: DVec3) -> bool {
        self.transform_position_to_scaled_space(position).length_squared() <= 1.0
    }

    /// World position of a geodetic latitude/longitude (radians) and height (meters).
    pub fn cartographic_to_cartesian(&self, latitude: f64, longitude: f64, height: f64) -> DVec3 {
        let (sin_lat, cos_lat) = latitude.sin_cos();
        let (sin_lon, cos_lon) = longitude.sin_cos();
        let normal = DVec3::new(cos_lat * cos_lon, cos_lat * sin_lon, sin_lat);
        let k = self.radii * self.radii * normal;
        let gamma = normal.dot(k).sqrt();
        k / gamma + normal * height
    }

    /// East-north-up frame at a world position, as the columns of a rotation.
    ///
    /// At the poles east is taken as +Y so the frame stays defined.
    pub fn east_north_up(&self, position: DVec3) -> DMat3 {
        let up = self.geodetic_surface_normal(position);
        let east = DVec3::new(-position.y, position.x, 0.0)
            .try_normalize()
            .unwrap_or(DVec3::Y);
        let north = up.cross(east);
        DMat3::from_cols(east, north, up)
    }

    /// Model matrix for a sensor at `position` whose boresight (+Z) points at
    /// the nadir, tilted by `tilt` radians toward local north.
    ///
    /// The model X axis stays aligned with local east.
    pub fn nadir_sensor_frame(&self, position: DVec3, tilt: f64) -> DMat4 {
        let enu = self.east_north_up(position);
        let (east, north, up) = (enu.x_axis, enu.y_axis, enu.z_axis);
        let (sin_tilt, cos_tilt) = tilt.sin_cos();
        let boresight = -up * cos_tilt + north * sin_tilt;
        let y = boresight.cross(east);
        DMat4::from_cols(
            east.extend(0.0),
            y.extend(0.0),
            boresight.extend(0.0),
            position.extend(1.0),
        )
    }
}

impl Default for Ellipsoid {
    fn default() -> Self {
        Self::wgs84()
    }
}
