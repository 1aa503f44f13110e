//! Places a sensor from `config.ron` above the ellipsoid and reports the
//! horizon surface it produces.
//!
//! Run with `cargo run -p limb-demo -- --tilt 60 --portion above_horizon`.

mod sensor;

use std::process::ExitCode;

use clap::Parser;
use limb_config::{CliArgs, Config, default_config_dir};
use limb_sensor::{CrossingKind, HorizonError};
use tracing::{error, info};

fn run(config: &Config) -> Result<(), HorizonError> {
    let ellipsoid = sensor::ellipsoid(config)?;
    let mut volume = sensor::volume(config, &ellipsoid)?;
    info!(
        "Sensor at altitude {} m, tilt {}°, radius {} m, {} facet(s)",
        config.sensor.altitude_m,
        config.sensor.tilt_deg,
        volume.radius(),
        volume.shape().facet_count()
    );

    let surface = volume.update(&ellipsoid)?;
    let on = surface
        .crossings
        .iter()
        .filter(|c| c.kind == CrossingKind::On)
        .count();
    info!(
        "{} horizon crossings ({} on, {} off)",
        surface.crossings.len(),
        on,
        surface.crossings.len() - on
    );
    for crossing in &surface.crossings {
        info!(
            "  facet {} at {:.3}° {:?}",
            crossing.facet_index,
            crossing.angle().to_degrees(),
            crossing.kind
        );
    }

    let sphere = surface.mesh.bounding_sphere();
    info!(
        "{:?} surface from {:?}: {} vertices, {} triangles",
        surface.kind,
        surface.source,
        surface.mesh.vertex_count(),
        surface.mesh.triangle_count()
    );
    info!(
        "Bounding sphere center {} radius {:.1}; k-DOP with {} planes",
        sphere.center,
        sphere.radius,
        surface.kdop.len()
    );
    Ok(())
}

fn main() -> ExitCode {
    let args = CliArgs::parse();

    let Some(config_dir) = args.config.clone().or_else(default_config_dir) else {
        eprintln!("Failed to resolve config directory");
        return ExitCode::FAILURE;
    };

    let mut config = Config::load_or_create(&config_dir).unwrap_or_else(|e| {
        eprintln!("Failed to load config: {e}, using defaults");
        Config::default()
    });
    config.apply_cli_overrides(&args);

    let log_dir = config_dir.join("logs");
    limb_log::init_logging(Some(&log_dir), cfg!(debug_assertions), Some(&config));

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
