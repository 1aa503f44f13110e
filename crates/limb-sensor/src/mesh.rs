//! Triangle meshes bounding a sensor volume against the horizon.
//!
//! Meshes are non-indexed triangle lists in the sensor model frame, apex at
//! the origin, with one flat normal per triangle. Each vertex is six `f32`:
//! position then normal.
//!
//! A horizon arc becomes two rings of points along the same rays from the
//! apex: the front ring on the limb itself and the back ring at the sensor
//! radius. The [`HorizonSurfaceKind`] picks which of the lateral fans, the
//! band between the rings and the two caps are emitted. Winding is chosen
//! once per ring from its orientation about the axis so that every normal
//! points out of the solid.

use std::f64::consts::TAU;

use glam::DVec3;
use limb_math::{BoundingSphere, EPSILON10};

use crate::crossing::{Crossing, CrossingKind};
use crate::horizon::HorizonFrame;
use crate::portion::HorizonSurfaceKind;

/// Tessellation controls.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MeshSettings {
    /// Largest angle, radians, spanned by one arc segment on the horizon circle.
    pub max_arc_step: f64,
    /// Samples around the full horizon circle or a sampled cone.
    pub circle_samples: usize,
}

impl MeshSettings {
    const MIN_ARC_STEP: f64 = 1e-4;
    const MIN_CIRCLE_SAMPLES: usize = 3;

    fn arc_step(&self) -> f64 {
        if self.max_arc_step.is_finite() {
            self.max_arc_step.max(Self::MIN_ARC_STEP)
        } else {
            Self::default().max_arc_step
        }
    }

    fn samples(&self) -> usize {
        self.circle_samples.max(Self::MIN_CIRCLE_SAMPLES)
    }
}

impl Default for MeshSettings {
    fn default() -> Self {
        Self {
            max_arc_step: 2f64.to_radians(),
            circle_samples: 64,
        }
    }
}

/// Flat, interleaved vertex buffer plus its bounding sphere.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HorizonMesh {
    vertices: Vec<f32>,
    bounding_sphere: BoundingSphere,
}

impl HorizonMesh {
    /// `f32` values per vertex: position xyz, normal xyz.
    pub const FLOATS_PER_VERTEX: usize = 6;

    pub fn vertices(&self) -> &[f32] {
        &self.vertices
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / Self::FLOATS_PER_VERTEX
    }

    pub fn triangle_count(&self) -> usize {
        self.vertex_count() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn bounding_sphere(&self) -> BoundingSphere {
        self.bounding_sphere
    }

    pub fn positions(&self) -> impl Iterator<Item = DVec3> + '_ {
        self.vertices
            .chunks_exact(Self::FLOATS_PER_VERTEX)
            .map(|v| DVec3::new(v[0] as f64, v[1] as f64, v[2] as f64))
    }

    pub fn normals(&self) -> impl Iterator<Item = DVec3> + '_ {
        self.vertices
            .chunks_exact(Self::FLOATS_PER_VERTEX)
            .map(|v| DVec3::new(v[3] as f64, v[4] as f64, v[5] as f64))
    }

    /// Triangle corners with the stored face normal.
    pub fn triangles(&self) -> impl Iterator<Item = ([DVec3; 3], DVec3)> + '_ {
        self.vertices
            .chunks_exact(Self::FLOATS_PER_VERTEX * 3)
            .map(|t| {
                let corner = |i: usize| {
                    let o = i * Self::FLOATS_PER_VERTEX;
                    DVec3::new(t[o] as f64, t[o + 1] as f64, t[o + 2] as f64)
                };
                let normal = DVec3::new(t[3] as f64, t[4] as f64, t[5] as f64);
                ([corner(0), corner(1), corner(2)], normal)
            })
    }
}

/// Accumulates triangles in f64 and flattens them on finish.
struct MeshWriter {
    vertices: Vec<f32>,
    positions: Vec<DVec3>,
    flip: bool,
}

impl MeshWriter {
    fn with_triangle_capacity(triangles: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(triangles * 3 * HorizonMesh::FLOATS_PER_VERTEX),
            positions: Vec::with_capacity(triangles * 3),
            flip: false,
        }
    }

    /// Emit `(a, b, c)` for positively oriented rings, `(a, c, b)` otherwise.
    fn triangle(&mut self, a: DVec3, b: DVec3, c: DVec3) {
        let (b, c) = if self.flip { (c, b) } else { (b, c) };
        let normal = (b - a).cross(c - a).normalize_or_zero();
        for p in [a, b, c] {
            self.vertices.extend_from_slice(&[
                p.x as f32,
                p.y as f32,
                p.z as f32,
                normal.x as f32,
                normal.y as f32,
                normal.z as f32,
            ]);
            self.positions.push(p);
        }
    }

    fn finish(self) -> HorizonMesh {
        HorizonMesh {
            bounding_sphere: BoundingSphere::from_points(self.positions.iter().copied()),
            vertices: self.vertices,
        }
    }
}

/// Points along one stretch of the boundary, with the point the caps fan from.
#[derive(Clone, Debug)]
struct Ring {
    points: Vec<DVec3>,
    center: DVec3,
}

impl Ring {
    /// Centre on `axis` at the mean axial depth of the points.
    fn around_axis(points: Vec<DVec3>, axis: DVec3) -> Self {
        let depth = points.iter().map(|p| p.dot(axis)).sum::<f64>() / points.len().max(1) as f64;
        Self {
            center: axis * depth,
            points,
        }
    }

    /// Signed area swept about `axis`; positive for counter-clockwise rings.
    fn orientation(&self, axis: DVec3, closed: bool) -> f64 {
        segments(self.points.len(), closed)
            .map(|(i, j)| {
                (self.points[i] - self.center)
                    .cross(self.points[j] - self.center)
                    .dot(axis)
            })
            .sum()
    }
}

fn segments(len: usize, closed: bool) -> impl Iterator<Item = (usize, usize)> {
    let open = (0..len.saturating_sub(1)).map(|i| (i, i + 1));
    let closing = (closed && len > 2).then_some((len - 1, 0));
    open.chain(closing)
}

/// Front and back rings over the same rays.
struct RingPair {
    front: Ring,
    back: Ring,
    axis: DVec3,
    closed: bool,
}

impl RingPair {
    /// Rings over limb samples `(cos, sin)` on the horizon circle.
    fn on_horizon(frame: &HorizonFrame, samples: &[(f64, f64)], radius: f64, closed: bool) -> Self {
        let axis = frame.axis_model();
        let mut clamped = false;
        let mut front = Vec::with_capacity(samples.len());
        let mut back = Vec::with_capacity(samples.len());
        for &(cosine, sine) in samples {
            let limb = frame.limb_direction_model(cosine, sine);
            let distance = limb.length();
            let unit = limb / distance;
            if distance > radius {
                clamped = true;
            }
            front.push(unit * distance.min(radius));
            back.push(unit * radius);
        }
        let front = if clamped {
            Ring::around_axis(front, axis)
        } else {
            Ring {
                points: front,
                center: frame.limb_center_model(),
            }
        };
        Self {
            front,
            back: Ring::around_axis(back, axis),
            axis,
            closed,
        }
    }

    fn emit(&self, kind: HorizonSurfaceKind, writer: &mut MeshWriter) {
        writer.flip = self.back.orientation(self.axis, self.closed) < 0.0;
        let (f, b) = (&self.front.points, &self.back.points);
        let (cf, cb) = (self.front.center, self.back.center);
        for (i, j) in segments(f.len(), self.closed) {
            match kind {
                HorizonSurfaceKind::Frustum => {
                    writer.triangle(f[i], b[j], b[i]);
                    writer.triangle(f[i], f[j], b[j]);
                    writer.triangle(cf, f[j], f[i]);
                    writer.triangle(cb, b[i], b[j]);
                }
                HorizonSurfaceKind::BackPyramid => {
                    writer.triangle(DVec3::ZERO, b[j], b[i]);
                    writer.triangle(cb, b[i], b[j]);
                }
                HorizonSurfaceKind::FrontPyramid => {
                    writer.triangle(DVec3::ZERO, f[j], f[i]);
                    writer.triangle(cf, f[i], f[j]);
                }
            }
        }
    }
}

fn triangles_per_segment(kind: HorizonSurfaceKind) -> usize {
    match kind {
        HorizonSurfaceKind::Frustum => 4,
        HorizonSurfaceKind::BackPyramid | HorizonSurfaceKind::FrontPyramid => 2,
    }
}

/// Angular samples from one crossing counter-clockwise to the next,
/// endpoints included.
fn arc_samples(from: &Crossing, to: &Crossing, max_step: f64) -> Vec<(f64, f64)> {
    let (c0, s0) = (from.angle_cosine, from.angle_sine);
    let cross = c0 * to.angle_sine - s0 * to.angle_cosine;
    let dot = c0 * to.angle_cosine + s0 * to.angle_sine;
    let mut sweep = cross.atan2(dot);
    if sweep <= EPSILON10 {
        sweep += TAU;
    }
    let count = (sweep / max_step).ceil().max(1.0) as usize;
    (0..=count)
        .map(|k| {
            let (s, c) = (sweep * k as f64 / count as f64).sin_cos();
            (c0 * c - s0 * s, s0 * c + c0 * s)
        })
        .collect()
}

/// Mesh the arcs of the horizon inside the sensor.
///
/// `crossings` must be sorted with resolved kinds; every `On` crossing opens
/// an arc that runs to the next crossing.
pub fn build_arc_mesh(
    frame: &HorizonFrame,
    crossings: &[Crossing],
    kind: HorizonSurfaceKind,
    radius: f64,
    settings: &MeshSettings,
) -> HorizonMesh {
    let n = crossings.len();
    let arcs: Vec<RingPair> = (0..n)
        .filter(|&i| crossings[i].kind == CrossingKind::On)
        .map(|i| {
            let samples = arc_samples(&crossings[i], &crossings[(i + 1) % n], settings.arc_step());
            RingPair::on_horizon(frame, &samples, radius, false)
        })
        .collect();

    let segment_count: usize = arcs.iter().map(|a| a.front.points.len().saturating_sub(1)).sum();
    let mut writer = MeshWriter::with_triangle_capacity(segment_count * triangles_per_segment(kind));
    for arc in &arcs {
        arc.emit(kind, &mut writer);
    }
    writer.finish()
}

/// Mesh the whole horizon circle, for a limb lying entirely inside the sensor.
pub fn build_circle_mesh(
    frame: &HorizonFrame,
    kind: HorizonSurfaceKind,
    radius: f64,
    settings: &MeshSettings,
) -> HorizonMesh {
    let count = settings.samples();
    let samples: Vec<(f64, f64)> = (0..count)
        .map(|k| {
            let (s, c) = (TAU * k as f64 / count as f64).sin_cos();
            (c, s)
        })
        .collect();
    let rings = RingPair::on_horizon(frame, &samples, radius, true);
    let mut writer = MeshWriter::with_triangle_capacity(count * triangles_per_segment(kind));
    rings.emit(kind, &mut writer);
    writer.finish()
}

/// Mesh the sensor pyramid itself out to the radius: one lateral and one
/// cap triangle per boundary direction.
pub fn build_dome_mesh(directions: &[DVec3], boresight: DVec3, radius: f64) -> HorizonMesh {
    let points: Vec<DVec3> = directions
        .iter()
        .map(|d| d.normalize_or_zero() * radius)
        .collect();
    let ring = Ring::around_axis(points, boresight);
    let rings = RingPair {
        front: ring.clone(),
        back: ring,
        axis: boresight,
        closed: true,
    };
    let mut writer = MeshWriter::with_triangle_capacity(directions.len() * 2);
    rings.emit(HorizonSurfaceKind::BackPyramid, &mut writer);
    writer.finish()
}
