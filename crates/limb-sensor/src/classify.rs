//! Per-facet horizon-crossing classification.
//!
//! Each facet is intersected with the horizon circle independently. Planar
//! facets cut the circle in at most two points, found in closed form in scaled
//! space. Conic facets reduce to a quadratic expression in the unit vector
//! parameterising the circle and meet it in up to four points.

use glam::{DMat2, DMat3, DVec2, DVec3};
use limb_math::{EPSILON4, EPSILON10, EPSILON15, quadratic_vector_expression};
use tracing::trace;

use crate::crossing::{Crossing, CrossingKind, same_direction};
use crate::facet::{ConicFacet, Facet, PlanarFacet};
use crate::horizon::HorizonFrame;
use crate::portion::PortionToDisplay;

/// Options shared by every facet of one classification pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClassifyOptions {
    pub portion: PortionToDisplay,
    /// Sensor range in meters; limits crossings in complete mode only.
    pub radius: f64,
}

/// Classify every facet, concatenating their crossings in facet order.
pub fn classify_facets(
    frame: &HorizonFrame,
    facets: &[Facet],
    options: &ClassifyOptions,
) -> Vec<Crossing> {
    facets
        .iter()
        .enumerate()
        .flat_map(|(index, facet)| classify_facet(frame, index, facet, options))
        .collect()
}

/// Crossings of a single facet with the horizon.
pub fn classify_facet(
    frame: &HorizonFrame,
    facet_index: usize,
    facet: &Facet,
    options: &ClassifyOptions,
) -> Vec<Crossing> {
    let crossings = match facet {
        Facet::Planar(planar) => classify_planar(frame, facet_index, planar, options),
        Facet::Conic(conic) => classify_conic(frame, facet_index, conic, options),
    };
    trace!(facet_index, count = crossings.len(), "Classified facet");
    crossings
}

/// Both points where the plane through the apex with model-frame normal
/// `normal_model` cuts the horizon circle, in scaled space.
///
/// `None` when the plane misses the circle, touches it tangentially, or is
/// perpendicular to the apex direction. The first point is
/// `g + ĥ·√(1 − |g|²)` with `ĥ = b̂ × q̂`.
pub fn plane_horizon_intersections(
    frame: &HorizonFrame,
    normal_model: DVec3,
) -> Option<(DVec3, DVec3, DVec3)> {
    let world_normal = frame.model_to_world_direction(normal_model);
    let b_unit = (frame.ellipsoid().radii() * world_normal).try_normalize()?;
    let q_unit = frame.q_unit();

    let cosine_sigma = frame.q().dot(b_unit);
    if cosine_sigma > 1.0 {
        return None;
    }

    let h = b_unit.cross(q_unit);
    if h.length_squared() <= EPSILON15 {
        return None;
    }
    let h_unit = h.normalize();

    let rows = DMat3::from_cols(q_unit, b_unit, h_unit).transpose();
    let g = rows.inverse() * DVec3::new(1.0 / frame.q_magnitude(), cosine_sigma, 0.0);
    let g_squared = g.length_squared();
    if !g_squared.is_finite() || g_squared >= 1.0 - EPSILON10 {
        return None;
    }

    let offset = h_unit * (1.0 - g_squared).sqrt();
    Some((g + offset, g - offset, b_unit))
}

fn classify_planar(
    frame: &HorizonFrame,
    facet_index: usize,
    facet: &PlanarFacet,
    options: &ClassifyOptions,
) -> Vec<Crossing> {
    let Some((first, second, surface_normal)) =
        plane_horizon_intersections(frame, facet.outward_normal())
    else {
        return Vec::new();
    };

    let radius_squared = options.radius * options.radius;
    let mut crossings = Vec::with_capacity(2);
    for scaled in [first, second] {
        let direction = frame.scaled_to_model(scaled);
        if !facet.spans(direction) {
            continue;
        }
        if options.portion == PortionToDisplay::Complete
            && direction.length_squared() > radius_squared
        {
            continue;
        }
        let (angle_cosine, angle_sine) = frame.angle_of(scaled);
        let kind = if crossings.is_empty() {
            CrossingKind::On
        } else {
            CrossingKind::Off
        };
        crossings.push(Crossing {
            facet_index,
            direction_model: direction,
            direction_scaled: scaled,
            angle_cosine,
            angle_sine,
            kind,
            surface_normal,
        });
    }
    crossings
}

/// Cross-product matrix `W` with `W·v = w × v`.
fn cross_matrix(w: DVec3) -> DMat3 {
    DMat3::from_cols(
        DVec3::new(0.0, w.z, -w.y),
        DVec3::new(-w.z, 0.0, w.x),
        DVec3::new(w.y, -w.x, 0.0),
    )
}

fn classify_conic(
    frame: &HorizonFrame,
    facet_index: usize,
    facet: &ConicFacet,
    options: &ClassifyOptions,
) -> Vec<Crossing> {
    let axis = facet.axis.normalize();
    let w = cross_matrix(axis);
    let (sin_beta, cos_beta) = facet.half_angle.sin_cos();
    // vᵀQv = |w × v|² − sin²β·|v|², zero on the cone surface.
    let cone = w.transpose() * w - DMat3::from_diagonal(DVec3::splat(sin_beta * sin_beta));

    let to_model = frame.scaled_offset_to_model();
    let pulled = to_model.transpose() * cone * to_model;

    let (e1, e2) = (frame.e1(), frame.e2());
    let rho = frame.circle_radius();
    let k = frame.circle_center() - frame.q();

    let a11 = rho * rho * e1.dot(pulled * e1);
    let a12 = rho * rho * e1.dot(pulled * e2);
    let a22 = rho * rho * e2.dot(pulled * e2);
    let a = DMat2::from_cols(DVec2::new(a11, a12), DVec2::new(a12, a22));
    let b = DVec2::new(k.dot(pulled * e1), k.dot(pulled * e2)) * (2.0 * rho);
    let c = k.dot(pulled * k);

    let q = frame.q();
    let radius_squared = options.radius * options.radius;
    let mut crossings: Vec<Crossing> = Vec::with_capacity(4);

    for u in quadratic_vector_expression(a, b, c) {
        let scaled = frame.limb_point(u.x, u.y);
        if (scaled.length_squared() - 1.0).abs() > EPSILON4 || (scaled.dot(q) - 1.0).abs() > EPSILON4
        {
            continue;
        }

        let direction = frame.scaled_to_model(scaled);
        let Some(unit) = direction.try_normalize() else {
            continue;
        };
        // The quadric also holds the mirror cone of half-angle π − β.
        if unit.dot(cone * unit).abs() > EPSILON4
            || (unit.dot(axis) - cos_beta).abs() > EPSILON4
        {
            continue;
        }
        if !facet.clock_contains(unit) {
            continue;
        }
        if options.portion == PortionToDisplay::Complete
            && direction.length_squared() > radius_squared
        {
            continue;
        }
        if crossings
            .iter()
            .any(|existing| same_direction(existing.direction_model, direction))
        {
            continue;
        }

        // The quadric gradient points out of the cone only while β < π/2.
        let outward = (pulled * (scaled - q)).normalize_or_zero() * cos_beta.signum();
        crossings.push(Crossing {
            facet_index,
            direction_model: direction,
            direction_scaled: scaled,
            angle_cosine: u.x,
            angle_sine: u.y,
            kind: CrossingKind::Undetermined,
            surface_normal: outward,
        });
    }
    crossings
}

#[cfg(test)]
mod tests {
    use std::f64::consts::{FRAC_PI_2, PI, TAU};

    use glam::DMat4;

    use super::*;
    use crate::ellipsoid::Ellipsoid;
    use crate::facet::{ClockRange, SensorShape};

    const COMPLETE: ClassifyOptions = ClassifyOptions {
        portion: PortionToDisplay::Complete,
        radius: 1.0e3,
    };

    /// Unit sphere, apex at (0, 0, 2), boresight along −Z toward the centre.
    fn looking_down_from_two() -> HorizonFrame {
        let model = DMat4::from_cols(
            DVec3::X.extend(0.0),
            DVec3::NEG_Y.extend(0.0),
            DVec3::NEG_Z.extend(0.0),
            DVec3::new(0.0, 0.0, 2.0).extend(1.0),
        );
        HorizonFrame::new(&Ellipsoid::unit_sphere(), &model).unwrap()
    }

    /// Same apex, boresight tilted toward +X in world.
    fn looking_sideways_from_two(tilt: f64) -> HorizonFrame {
        let (sin, cos) = tilt.sin_cos();
        let z = DVec3::new(sin, 0.0, -cos);
        let x = DVec3::Y;
        let y = z.cross(x);
        let model = DMat4::from_cols(
            x.extend(0.0),
            y.extend(0.0),
            z.extend(0.0),
            DVec3::new(0.0, 0.0, 2.0).extend(1.0),
        );
        HorizonFrame::new(&Ellipsoid::unit_sphere(), &model).unwrap()
    }

    #[test]
    fn test_plane_through_centre_cuts_circle_twice() {
        let frame = looking_down_from_two();
        let (first, second, _) =
            plane_horizon_intersections(&frame, DVec3::X).expect("plane x = 0 cuts the limb");
        for p in [first, second] {
            assert!((p.length() - 1.0).abs() < 1e-12);
            assert!((p.z - 0.5).abs() < 1e-12);
            assert!(p.x.abs() < 1e-12, "point must lie in the plane x = 0: {p:?}");
        }
        assert!((first - second).length() > 1.0);
    }

    #[test]
    fn test_tangent_planes_produce_nothing() {
        let frame = looking_down_from_two();
        let apex = DVec3::new(0.0, 0.0, 2.0);
        for k in 0..36 {
            let phi = TAU * k as f64 / 36.0;
            let limb = DVec3::new(0.75_f64.sqrt() * phi.cos(), 0.75_f64.sqrt() * phi.sin(), 0.5);
            // The sphere's tangent plane at a limb point passes through the apex.
            let world_normal = limb;
            let model_normal = frame.rotation().transpose() * world_normal;
            assert!(
                plane_horizon_intersections(&frame, model_normal).is_none(),
                "tangent plane at {phi} must not produce crossings"
            );
            assert!((limb - apex).dot(world_normal).abs() < 1e-12);
        }
    }

    #[test]
    fn test_plane_perpendicular_to_apex_direction() {
        let frame = looking_down_from_two();
        // Boresight direction is −q̂ in world, so the normal is parallel to q̂.
        assert!(plane_horizon_intersections(&frame, DVec3::Z).is_none());
        assert!(plane_horizon_intersections(&frame, DVec3::NEG_Z).is_none());
    }

    #[test]
    fn test_narrow_nadir_pyramid_has_no_crossings() {
        let frame = looking_down_from_two();
        let shape = SensorShape::polygonal_cone(0.3, 6).unwrap();
        let crossings = classify_facets(&frame, &shape.facets(), &COMPLETE);
        assert!(crossings.is_empty(), "limb is outside a 0.3 rad cone: {crossings:?}");
    }

    #[test]
    fn test_wide_nadir_pyramid_has_no_crossings() {
        // Limb at 30° off nadir, entirely inside a 50° pyramid.
        let frame = looking_down_from_two();
        let shape = SensorShape::polygonal_cone(50f64.to_radians(), 6).unwrap();
        let crossings = classify_facets(&frame, &shape.facets(), &COMPLETE);
        assert!(crossings.is_empty(), "got {crossings:?}");
    }

    #[test]
    fn test_tilted_pyramid_crossings_lie_on_limb_and_facet() {
        let frame = looking_sideways_from_two(30f64.to_radians());
        let shape = SensorShape::polygonal_cone(15f64.to_radians(), 8).unwrap();
        let facets = shape.facets();
        let crossings = classify_facets(&frame, &facets, &COMPLETE);
        assert!(!crossings.is_empty(), "tilted edge must cross the limb");
        assert_eq!(crossings.len() % 2, 0, "closed cross-section crosses evenly: {crossings:?}");
        for crossing in &crossings {
            let x = crossing.direction_scaled;
            assert!((x.length() - 1.0).abs() < 1e-9);
            assert!((x.dot(frame.q()) - 1.0).abs() < 1e-9);
            let Facet::Planar(facet) = facets[crossing.facet_index] else {
                panic!("polygon facets are planar");
            };
            assert!(crossing.direction_model.dot(facet.outward_normal()).abs() < 1e-9);
            assert!(facet.spans(crossing.direction_model));
        }
    }

    #[test]
    fn test_planar_provisional_kinds() {
        let frame = looking_sideways_from_two(30f64.to_radians());
        // A wide sector spanning the whole plane x = 0 in model space.
        let facet = Facet::Planar(PlanarFacet::new(
            DVec3::new(0.0, -1.0, 0.2),
            DVec3::new(0.0, 1.0, 0.2),
        ));
        let crossings = classify_facet(&frame, 0, &facet, &COMPLETE);
        assert_eq!(crossings.len(), 2, "got {crossings:?}");
        assert_eq!(crossings[0].kind, CrossingKind::On);
        assert_eq!(crossings[1].kind, CrossingKind::Off);
    }

    #[test]
    fn test_radius_bound_applies_in_complete_mode_only() {
        let frame = looking_sideways_from_two(30f64.to_radians());
        let shape = SensorShape::polygonal_cone(15f64.to_radians(), 8).unwrap();
        let facets = shape.facets();
        let short = ClassifyOptions {
            portion: PortionToDisplay::Complete,
            radius: 1.0,
        };
        assert!(classify_facets(&frame, &facets, &short).is_empty(), "limb is √3 away");
        let above = ClassifyOptions {
            portion: PortionToDisplay::AboveHorizon,
            radius: 1.0,
        };
        assert!(!classify_facets(&frame, &facets, &above).is_empty());
    }

    #[test]
    fn test_conic_crossings_satisfy_cone_and_horizon() {
        let frame = looking_sideways_from_two(30f64.to_radians());
        let beta = 15f64.to_radians();
        let shape = SensorShape::conic(beta, ClockRange::FULL).unwrap();
        let crossings = classify_facets(&frame, &shape.facets(), &COMPLETE);
        assert_eq!(crossings.len(), 2, "circle meets a tilted cone twice: {crossings:?}");
        for crossing in &crossings {
            let unit = crossing.direction_model.normalize();
            assert!((unit.z - beta.cos()).abs() < 1e-6, "off the cone: {unit:?}");
            let x = crossing.direction_scaled;
            assert!((x.length() - 1.0).abs() < 1e-6);
            assert_eq!(crossing.kind, CrossingKind::Undetermined);
            // Outward cone normal points away from the boresight.
            let to_model = frame.scaled_offset_to_model();
            let normal_model = to_model.inverse().transpose() * crossing.surface_normal;
            assert!(normal_model.dot(DVec3::Z) < 0.0);
        }
    }

    #[test]
    fn test_conic_matches_fine_polygon() {
        let frame = looking_sideways_from_two(30f64.to_radians());
        let beta = 15f64.to_radians();
        let cone = SensorShape::conic(beta, ClockRange::FULL).unwrap();
        let polygon = SensorShape::polygonal_cone(beta, 720).unwrap();
        let exact = classify_facets(&frame, &cone.facets(), &COMPLETE);
        let approx = classify_facets(&frame, &polygon.facets(), &COMPLETE);
        assert_eq!(exact.len(), 2);
        for crossing in &exact {
            let closest = approx
                .iter()
                .map(|a| a.direction_scaled.distance(crossing.direction_scaled))
                .fold(f64::INFINITY, f64::min);
            assert!(closest < 1e-3, "no polygon crossing near {crossing:?}");
        }
    }

    #[test]
    fn test_clock_limited_cone_filters_crossings() {
        let frame = looking_sideways_from_two(30f64.to_radians());
        let beta = 15f64.to_radians();
        let full = SensorShape::conic(beta, ClockRange::FULL).unwrap();
        let full_crossings = classify_facets(&frame, &full.facets(), &COMPLETE);
        assert_eq!(full_crossings.len(), 2);

        // Keep only the half of the cone containing the first crossing.
        let first = full_crossings[0].direction_model;
        let phi = first.y.atan2(first.x);
        let clock = ClockRange::new(phi - FRAC_PI_2, phi + FRAC_PI_2).unwrap();
        let half = SensorShape::conic(beta, clock).unwrap();
        let conic_only = classify_facet(&frame, 0, &half.facets()[0], &COMPLETE);
        assert_eq!(conic_only.len(), 1, "got {conic_only:?}");
        assert!(same_direction(conic_only[0].direction_model, first));
    }

    #[test]
    fn test_cone_wider_than_hemisphere_keeps_its_own_nappe() {
        let frame = looking_sideways_from_two(FRAC_PI_2);
        let beta = 100f64.to_radians();
        let wide = Facet::Conic(ConicFacet {
            axis: DVec3::Z,
            half_angle: beta,
            clock: ClockRange::FULL,
        });
        let crossings = classify_facet(&frame, 0, &wide, &COMPLETE);
        assert_eq!(crossings.len(), 2, "got {crossings:?}");
        for crossing in &crossings {
            let off_axis = crossing.direction_model.normalize().z.acos();
            assert!(
                (off_axis - beta).abs() < 1e-6,
                "crossing {}° off the boresight, expected 100°",
                off_axis.to_degrees()
            );
        }

        // Same surface seen as the complementary cone about the opposite axis:
        // identical points, opposite outward normals.
        let mirror = Facet::Conic(ConicFacet {
            axis: DVec3::NEG_Z,
            half_angle: PI - beta,
            clock: ClockRange::FULL,
        });
        let mirrored = classify_facet(&frame, 0, &mirror, &COMPLETE);
        assert_eq!(mirrored.len(), 2);
        for crossing in &crossings {
            let twin = mirrored
                .iter()
                .find(|m| same_direction(m.direction_model, crossing.direction_model))
                .expect("mirror cone meets the limb at the same points");
            let alignment = twin.surface_normal.dot(crossing.surface_normal);
            assert!(alignment < -0.999, "normals must be opposite, dot = {alignment}");
        }
    }
}
