//! Builds sensor inputs from configuration.

use glam::{DMat4, DVec3};
use limb_config::{Config, ShapeKind};
use limb_sensor::{
    ClockRange, Ellipsoid, HorizonError, HorizonOptions, MeshSettings, PortionToDisplay,
    SensorShape, SensorVolume,
};

pub(crate) fn ellipsoid(config: &Config) -> Result<Ellipsoid, HorizonError> {
    let (x, y, z) = config.ellipsoid.radii_m;
    let radii = DVec3::new(x, y, z);
    if !radii.is_finite() || radii.min_element() <= 0.0 {
        return Err(HorizonError::InvalidShape(format!(
            "ellipsoid radii must be positive, got {radii}"
        )));
    }
    Ok(Ellipsoid::new(radii))
}

pub(crate) fn shape(config: &Config) -> Result<SensorShape, HorizonError> {
    let sensor = &config.sensor;
    match sensor.shape {
        ShapeKind::Cone => {
            let clock = if sensor.has_full_clock() {
                ClockRange::FULL
            } else {
                ClockRange::new(
                    sensor.clock_min_deg.to_radians(),
                    sensor.clock_max_deg.to_radians(),
                )?
            };
            SensorShape::conic(sensor.half_angle_deg.to_radians(), clock)
        }
        ShapeKind::Polygon => {
            SensorShape::polygonal_cone(sensor.half_angle_deg.to_radians(), sensor.facet_count)
        }
        ShapeKind::Rectangle => SensorShape::rectangular(
            sensor.x_half_angle_deg.to_radians(),
            sensor.y_half_angle_deg.to_radians(),
        ),
    }
}

/// Model matrix placing the sensor above the configured geodetic position.
pub(crate) fn model_matrix(config: &Config, ellipsoid: &Ellipsoid) -> DMat4 {
    let sensor = &config.sensor;
    let apex = ellipsoid.cartographic_to_cartesian(
        sensor.latitude_deg.to_radians(),
        sensor.longitude_deg.to_radians(),
        sensor.altitude_m,
    );
    ellipsoid.nadir_sensor_frame(apex, sensor.tilt_deg.to_radians())
}

pub(crate) fn options(config: &Config) -> Result<HorizonOptions, HorizonError> {
    let horizon = &config.horizon;
    Ok(HorizonOptions {
        portion: horizon.portion_to_display.parse::<PortionToDisplay>()?,
        show_through_ellipsoid: horizon.show_through_ellipsoid,
        mesh: MeshSettings {
            max_arc_step: horizon.max_arc_step_deg.to_radians(),
            circle_samples: horizon.circle_samples,
        },
        ..HorizonOptions::default()
    })
}

pub(crate) fn volume(config: &Config, ellipsoid: &Ellipsoid) -> Result<SensorVolume, HorizonError> {
    let volume = SensorVolume::new(
        shape(config)?,
        model_matrix(config, ellipsoid),
        config.sensor.radius_m,
    )?;
    Ok(volume.with_options(options(config)?))
}
