//! Configuration structs with defaults and RON persistence.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

const CONFIG_FILE: &str = "config.ron";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Sensor shape and placement.
    pub sensor: SensorConfig,
    /// Body whose limb is tracked.
    pub ellipsoid: EllipsoidConfig,
    /// Horizon surface display settings.
    pub horizon: HorizonConfig,
    pub debug: DebugConfig,
}

/// Which family of sensor shape to build.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum ShapeKind {
    /// Circular cone, optionally limited in clock angle.
    #[default]
    Cone,
    /// Regular pyramid approximating a cone.
    Polygon,
    /// Rectangular field of view.
    Rectangle,
}

/// Sensor configuration. Angles are in degrees, distances in meters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SensorConfig {
    pub shape: ShapeKind,
    /// Cone or pyramid half-angle.
    pub half_angle_deg: f64,
    /// Rectangle half-angle about the sensor X axis.
    pub x_half_angle_deg: f64,
    /// Rectangle half-angle about the sensor Y axis.
    pub y_half_angle_deg: f64,
    /// Side count for `Polygon`.
    pub facet_count: usize,
    pub clock_min_deg: f64,
    pub clock_max_deg: f64,
    /// Far extent of the sensor volume.
    pub radius_m: f64,
    pub altitude_m: f64,
    pub latitude_deg: f64,
    pub longitude_deg: f64,
    /// Boresight tilt away from nadir toward north.
    pub tilt_deg: f64,
}

/// Ellipsoid radii in meters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EllipsoidConfig {
    pub radii_m: (f64, f64, f64),
}

/// Horizon surface configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct HorizonConfig {
    /// One of "complete", "below_horizon" or "above_horizon".
    pub portion_to_display: String,
    /// Draw the part of the volume hidden behind the limb.
    pub show_through_ellipsoid: bool,
    /// Largest angle a single arc segment may sweep.
    pub max_arc_step_deg: f64,
    /// Limb samples when the whole horizon circle is visible.
    pub circle_samples: usize,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "limb_sensor=trace").
    pub log_level: String,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            shape: ShapeKind::Cone,
            half_angle_deg: 30.0,
            x_half_angle_deg: 20.0,
            y_half_angle_deg: 10.0,
            facet_count: 8,
            clock_min_deg: -180.0,
            clock_max_deg: 180.0,
            radius_m: 5.0e6,
            altitude_m: 500_000.0,
            latitude_deg: 0.0,
            longitude_deg: 0.0,
            tilt_deg: 50.0,
        }
    }
}

impl Default for EllipsoidConfig {
    fn default() -> Self {
        Self {
            radii_m: (6_378_137.0, 6_378_137.0, 6_356_752.314_245_179),
        }
    }
}

impl Default for HorizonConfig {
    fn default() -> Self {
        Self {
            portion_to_display: "complete".to_string(),
            show_through_ellipsoid: true,
            max_arc_step_deg: 2.0,
            circle_samples: 64,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

impl SensorConfig {
    /// Whether the clock limits cover the whole circle.
    pub fn has_full_clock(&self) -> bool {
        self.clock_max_deg - self.clock_min_deg >= 360.0
    }
}

// --- Load / Save / Reload ---

impl Config {
    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE);

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
            let config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(ConfigError::WriteError)?;

        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(true)
            .enumerate_arrays(false);
        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(config_dir.join(CONFIG_FILE), serialized).map_err(ConfigError::WriteError)
    }

    /// Returns `Some(new_config)` if the file on disk differs from `self`.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let contents = std::fs::read_to_string(config_dir.join(CONFIG_FILE))
            .map_err(ConfigError::ReadError)?;
        let new_config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;

        if &new_config != self {
            log::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }
}
