//! Sensor-volume horizon geometry: where a cone or pyramid sensor volume meets
//! the horizon limb of an ellipsoid, and the triangle meshes bounding the
//! volume against that horizon.
//!
//! The computation is a strict three-phase pipeline run once per update:
//! every facet is classified against the limb ([`classify`]), the crossings
//! are deduplicated, sorted around the horizon circle and given alternating
//! kinds ([`aggregate`]), and the mesh is built from the sorted sequence
//! ([`mesh`]). [`SensorVolume`] drives the pipeline and caches the result
//! until its inputs change.

pub mod aggregate;
pub mod classify;
mod crossing;
mod ellipsoid;
mod error;
mod facet;
mod horizon;
mod kdop;
pub mod mesh;
mod portion;
mod volume;

pub use aggregate::{aggregate_crossings, compare_angular_position, kinds_alternate};
pub use classify::{ClassifyOptions, classify_facet, classify_facets, plane_horizon_intersections};
pub use crossing::{Crossing, CrossingKind};
pub use ellipsoid::Ellipsoid;
pub use error::HorizonError;
pub use facet::{ClockRange, ConicFacet, Facet, PlanarFacet, SensorShape};
pub use horizon::HorizonFrame;
pub use kdop::{HalfSpace, Intersection, KDop};
pub use mesh::{HorizonMesh, MeshSettings};
pub use portion::{HorizonSurfaceKind, PortionToDisplay};
pub use volume::{
    HorizonOptions, HorizonSurface, SensorVolume, SurfaceSource, compute_horizon_surface,
};
