//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// Command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "limb", about = "Sensor volume horizon crossings")]
pub struct CliArgs {
    /// Sensor altitude above the ellipsoid in meters.
    #[arg(long)]
    pub altitude: Option<f64>,

    /// Cone or pyramid half-angle in degrees.
    #[arg(long)]
    pub half_angle: Option<f64>,

    /// Boresight tilt from nadir in degrees.
    #[arg(long)]
    pub tilt: Option<f64>,

    /// Sensor volume radius in meters.
    #[arg(long)]
    pub radius: Option<f64>,

    /// Portion to display (complete, below_horizon, above_horizon).
    #[arg(long)]
    pub portion: Option<String>,

    /// Draw the volume behind the ellipsoid.
    #[arg(long)]
    pub show_through: Option<bool>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(altitude) = args.altitude {
            self.sensor.altitude_m = altitude;
        }
        if let Some(half_angle) = args.half_angle {
            self.sensor.half_angle_deg = half_angle;
        }
        if let Some(tilt) = args.tilt {
            self.sensor.tilt_deg = tilt;
        }
        if let Some(radius) = args.radius {
            self.sensor.radius_m = radius;
        }
        if let Some(ref portion) = args.portion {
            self.horizon.portion_to_display = portion.clone();
        }
        if let Some(show_through) = args.show_through {
            self.horizon.show_through_ellipsoid = show_through;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}
