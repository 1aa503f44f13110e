//! Per-frame driver: runs classification, aggregation and meshing for one
//! sensor and caches the result until an input changes.

use glam::{DMat4, DVec3};
use tracing::debug;

use crate::aggregate::aggregate_crossings;
use crate::classify::{ClassifyOptions, classify_facets};
use crate::crossing::Crossing;
use crate::ellipsoid::Ellipsoid;
use crate::error::HorizonError;
use crate::facet::SensorShape;
use crate::horizon::HorizonFrame;
use crate::kdop::KDop;
use crate::mesh::{HorizonMesh, MeshSettings, build_arc_mesh, build_circle_mesh, build_dome_mesh};
use crate::portion::{HorizonSurfaceKind, PortionToDisplay};

/// Display and tessellation options for a sensor volume.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HorizonOptions {
    pub portion: PortionToDisplay,
    pub show_through_ellipsoid: bool,
    pub mesh: MeshSettings,
    /// Tangent planes approximating each conic facet in the k-DOP.
    pub kdop_conic_planes: usize,
}

impl Default for HorizonOptions {
    fn default() -> Self {
        Self {
            portion: PortionToDisplay::Complete,
            show_through_ellipsoid: false,
            mesh: MeshSettings::default(),
            kdop_conic_planes: 16,
        }
    }
}

/// How the mesh of a [`HorizonSurface`] was produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SurfaceSource {
    /// Arcs between sorted crossings.
    Arcs,
    /// The whole horizon circle lies inside the sensor.
    FullCircle,
    /// No horizon inside the sensor: the sensor pyramid itself.
    Dome,
}

/// Everything computed for one sensor in one update.
#[derive(Clone, Debug, PartialEq)]
pub struct HorizonSurface {
    /// Sorted crossings with resolved kinds.
    pub crossings: Vec<Crossing>,
    pub mesh: HorizonMesh,
    pub kind: HorizonSurfaceKind,
    pub source: SurfaceSource,
    pub kdop: KDop,
}

/// Run the full horizon pipeline for one sensor.
pub fn compute_horizon_surface(
    ellipsoid: &Ellipsoid,
    shape: &SensorShape,
    model_matrix: &DMat4,
    radius: f64,
    options: &HorizonOptions,
) -> Result<HorizonSurface, HorizonError> {
    validate_radius(radius)?;
    let kind = options.portion.surface_kind(options.show_through_ellipsoid);
    let kdop = KDop::from_shape(shape, radius, options.kdop_conic_planes);

    let dome = |kdop: KDop| HorizonSurface {
        crossings: Vec::new(),
        mesh: build_dome_mesh(
            &shape.sample_directions(options.mesh.circle_samples),
            shape.boresight(),
            radius,
        ),
        kind: HorizonSurfaceKind::BackPyramid,
        source: SurfaceSource::Dome,
        kdop,
    };

    let Some(frame) = HorizonFrame::new(ellipsoid, model_matrix) else {
        debug!("Sensor apex is inside the ellipsoid, no horizon");
        return Ok(dome(kdop));
    };

    let classify_options = ClassifyOptions {
        portion: options.portion,
        radius,
    };
    let raw = classify_facets(&frame, &shape.facets(), &classify_options);
    let crossings = aggregate_crossings(&frame, raw)?;

    if !crossings.is_empty() {
        let mesh = build_arc_mesh(&frame, &crossings, kind, radius, &options.mesh);
        return Ok(HorizonSurface {
            crossings,
            mesh,
            kind,
            source: SurfaceSource::Arcs,
            kdop,
        });
    }

    let reference = frame.limb_direction_model(1.0, 0.0);
    let limb_in_range =
        options.portion != PortionToDisplay::Complete || reference.length() <= radius;
    if limb_in_range && shape.contains_direction(reference) {
        return Ok(HorizonSurface {
            crossings,
            mesh: build_circle_mesh(&frame, kind, radius, &options.mesh),
            kind,
            source: SurfaceSource::FullCircle,
            kdop,
        });
    }

    Ok(dome(kdop))
}

fn validate_radius(radius: f64) -> Result<(), HorizonError> {
    if radius.is_finite() && radius > 0.0 {
        Ok(())
    } else {
        Err(HorizonError::InvalidRadius(radius))
    }
}

/// A sensor volume placed in the world, recomputed lazily.
#[derive(Clone, Debug)]
pub struct SensorVolume {
    shape: SensorShape,
    model_matrix: DMat4,
    radius: f64,
    options: HorizonOptions,
    dirty: bool,
    last_ellipsoid: Option<Ellipsoid>,
    surface: Option<HorizonSurface>,
}

impl SensorVolume {
    pub fn new(shape: SensorShape, model_matrix: DMat4, radius: f64) -> Result<Self, HorizonError> {
        validate_radius(radius)?;
        Ok(Self {
            shape,
            model_matrix,
            radius,
            options: HorizonOptions::default(),
            dirty: true,
            last_ellipsoid: None,
            surface: None,
        })
    }

    pub fn with_options(mut self, options: HorizonOptions) -> Self {
        self.options = options;
        self.dirty = true;
        self
    }

    pub fn shape(&self) -> &SensorShape {
        &self.shape
    }

    pub fn model_matrix(&self) -> DMat4 {
        self.model_matrix
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn options(&self) -> &HorizonOptions {
        &self.options
    }

    /// Sensor apex in world space.
    pub fn apex(&self) -> DVec3 {
        self.model_matrix.transform_point3(DVec3::ZERO)
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn set_shape(&mut self, shape: SensorShape) {
        self.shape = shape;
        self.dirty = true;
    }

    pub fn set_model_matrix(&mut self, model_matrix: DMat4) {
        self.model_matrix = model_matrix;
        self.dirty = true;
    }

    pub fn set_radius(&mut self, radius: f64) -> Result<(), HorizonError> {
        validate_radius(radius)?;
        self.radius = radius;
        self.dirty = true;
        Ok(())
    }

    pub fn set_portion(&mut self, portion: PortionToDisplay) {
        self.options.portion = portion;
        self.dirty = true;
    }

    pub fn set_show_through_ellipsoid(&mut self, show_through: bool) {
        self.options.show_through_ellipsoid = show_through;
        self.dirty = true;
    }

    pub fn set_mesh_settings(&mut self, settings: MeshSettings) {
        self.options.mesh = settings;
        self.dirty = true;
    }

    /// Last successfully computed surface, if still current.
    pub fn surface(&self) -> Option<&HorizonSurface> {
        self.surface.as_ref()
    }

    /// Recompute the surface if an input or the ellipsoid changed.
    ///
    /// On error the cached surface is dropped; the next update starts clean.
    pub fn update(&mut self, ellipsoid: &Ellipsoid) -> Result<&HorizonSurface, HorizonError> {
        let up_to_date = !self.dirty && self.last_ellipsoid.as_ref() == Some(ellipsoid);
        let surface = match self.surface.take() {
            Some(surface) if up_to_date => surface,
            _ => {
                let surface = compute_horizon_surface(
                    ellipsoid,
                    &self.shape,
                    &self.model_matrix,
                    self.radius,
                    &self.options,
                )?;
                debug!(
                    crossings = surface.crossings.len(),
                    kind = ?surface.kind,
                    source = ?surface.source,
                    vertices = surface.mesh.vertex_count(),
                    "Rebuilt sensor horizon surface"
                );
                surface
            }
        };
        self.dirty = false;
        self.last_ellipsoid = Some(*ellipsoid);
        Ok(self.surface.insert(surface))
    }
}
