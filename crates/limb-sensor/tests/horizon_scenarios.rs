use std::f64::consts::TAU;

use glam::{DMat4, DVec3};
use limb_sensor::{
    ClockRange, Crossing, CrossingKind, Ellipsoid, HorizonFrame, HorizonMesh, HorizonOptions,
    HorizonSurfaceKind, Intersection, PortionToDisplay, SensorShape, SensorVolume, SurfaceSource,
    compute_horizon_surface, kinds_alternate,
};

const EARTH_RADIUS: f64 = 6_378_137.0;
const ALTITUDE: f64 = 500_000.0;

fn equatorial_sensor(ellipsoid: &Ellipsoid, tilt_deg: f64) -> DMat4 {
    let apex = DVec3::new(EARTH_RADIUS + ALTITUDE, 0.0, 0.0);
    ellipsoid.nadir_sensor_frame(apex, tilt_deg.to_radians())
}

fn show_through() -> HorizonOptions {
    HorizonOptions {
        portion: PortionToDisplay::Complete,
        show_through_ellipsoid: true,
        ..HorizonOptions::default()
    }
}

/// Angle halfway along the counter-clockwise arc from `a` to `b`.
fn arc_middle(a: &Crossing, b: &Crossing) -> (f64, f64) {
    let mut sweep = b.angle() - a.angle();
    if sweep <= 0.0 {
        sweep += TAU;
    }
    let middle = a.angle() + sweep / 2.0;
    (middle.cos(), middle.sin())
}

/// Checks every crossing's kind against its own facet normal and every arc
/// midpoint against the sensor shape.
fn assert_kinds_match_geometry(frame: &HorizonFrame, shape: &SensorShape, crossings: &[Crossing]) {
    assert!(kinds_alternate(crossings), "kinds must alternate: {crossings:?}");
    for crossing in crossings {
        let clockwise = -frame.ccw_tangent(crossing.direction_scaled);
        let entering = crossing.surface_normal.dot(clockwise) > 0.0;
        assert_eq!(
            crossing.kind == CrossingKind::On,
            entering,
            "kind of crossing on facet {} disagrees with its normal",
            crossing.facet_index
        );
    }
    let n = crossings.len();
    for i in 0..n {
        let (cos, sin) = arc_middle(&crossings[i], &crossings[(i + 1) % n]);
        let inside = shape.contains_direction(frame.limb_direction_model(cos, sin));
        assert_eq!(
            inside,
            crossings[i].kind == CrossingKind::On,
            "arc after crossing {i} ({:?}) is {} the sensor",
            crossings[i].kind,
            if inside { "inside" } else { "outside" }
        );
    }
}

fn assert_outward(mesh: &HorizonMesh) {
    let interior = mesh.positions().sum::<DVec3>() / mesh.vertex_count() as f64;
    for (corners, normal) in mesh.triangles() {
        if normal == DVec3::ZERO {
            continue;
        }
        let side = normal.dot(corners[0] - interior);
        assert!(side > 0.0, "face {corners:?} with normal {normal:?} points inward");
    }
}

#[test]
fn test_nadir_cone_below_limb_emits_dome() {
    let ellipsoid = Ellipsoid::sphere(EARTH_RADIUS);
    let model = equatorial_sensor(&ellipsoid, 0.0);
    let facet_count = 8;
    let shape = SensorShape::polygonal_cone(30f64.to_radians(), facet_count).unwrap();

    let surface =
        compute_horizon_surface(&ellipsoid, &shape, &model, 1_000_000.0, &show_through()).unwrap();

    assert!(surface.crossings.is_empty(), "limb is 68° off nadir: {:?}", surface.crossings);
    assert_eq!(surface.source, SurfaceSource::Dome);
    assert_eq!(surface.kind, HorizonSurfaceKind::BackPyramid);
    assert_eq!(surface.mesh.vertex_count(), facet_count * 2 * 3);
    assert_outward(&surface.mesh);
}

#[test]
fn test_tilted_cone_crossing_limb_emits_frustum() {
    let ellipsoid = Ellipsoid::sphere(EARTH_RADIUS);
    let model = equatorial_sensor(&ellipsoid, 50.0);
    let shape = SensorShape::polygonal_cone(30f64.to_radians(), 8).unwrap();
    let radius = 5_000_000.0;

    let surface = compute_horizon_surface(&ellipsoid, &shape, &model, radius, &show_through()).unwrap();

    assert_eq!(surface.source, SurfaceSource::Arcs);
    assert_eq!(surface.kind, HorizonSurfaceKind::Frustum);
    assert!(!surface.crossings.is_empty());
    assert_eq!(surface.crossings.len() % 2, 0);

    let frame = HorizonFrame::new(&ellipsoid, &model).unwrap();
    assert_kinds_match_geometry(&frame, &shape, &surface.crossings);

    let limb_distance = ((EARTH_RADIUS + ALTITUDE).powi(2) - EARTH_RADIUS.powi(2)).sqrt();
    let mut front = 0;
    let mut back = 0;
    for p in surface.mesh.positions() {
        let r = p.length();
        if (r - limb_distance).abs() < 10.0 {
            front += 1;
        } else if (r - radius).abs() < 10.0 {
            back += 1;
        }
    }
    assert!(front > 0, "front ring on the limb must be populated");
    assert!(back > 0, "back ring at the radius must be populated");
    assert_outward(&surface.mesh);

    let sphere = surface.mesh.bounding_sphere();
    for p in surface.mesh.positions() {
        assert!(sphere.center.distance(p) <= sphere.radius + 1.0);
    }
}

#[test]
fn test_tilt_sweep_keeps_kinds_consistent() {
    let ellipsoid = Ellipsoid::wgs84();
    let shape = SensorShape::rectangular(20f64.to_radians(), 10f64.to_radians()).unwrap();
    for tilt in (40..=80).step_by(5) {
        for roll in 0..6 {
            let apex = ellipsoid.cartographic_to_cartesian(0.3, 1.1, ALTITUDE);
            let frame_matrix = ellipsoid.nadir_sensor_frame(apex, (tilt as f64).to_radians())
                * DMat4::from_rotation_z(roll as f64 * 0.5);
            let surface = compute_horizon_surface(
                &ellipsoid,
                &shape,
                &frame_matrix,
                1.0e7,
                &show_through(),
            )
            .unwrap();
            let frame = HorizonFrame::new(&ellipsoid, &frame_matrix).unwrap();
            if !surface.crossings.is_empty() {
                assert_kinds_match_geometry(&frame, &shape, &surface.crossings);
            }
        }
    }
}

#[test]
fn test_conic_sensor_matches_polygon_approximation() {
    let ellipsoid = Ellipsoid::sphere(EARTH_RADIUS);
    let model = equatorial_sensor(&ellipsoid, 50.0);
    let beta = 30f64.to_radians();
    let cone = SensorShape::conic(beta, ClockRange::FULL).unwrap();
    let polygon = SensorShape::polygonal_cone(beta, 720).unwrap();

    let exact = compute_horizon_surface(&ellipsoid, &cone, &model, 5.0e6, &show_through()).unwrap();
    let approx =
        compute_horizon_surface(&ellipsoid, &polygon, &model, 5.0e6, &show_through()).unwrap();

    assert_eq!(exact.crossings.len(), 2, "got {:?}", exact.crossings);
    assert_eq!(approx.crossings.len(), 2, "got {:?}", approx.crossings);
    for (e, a) in exact.crossings.iter().zip(&approx.crossings) {
        assert_eq!(e.kind, a.kind);
        assert!(
            (e.angle() - a.angle()).abs() < 1e-3,
            "angles {} and {} differ",
            e.angle(),
            a.angle()
        );
    }
    let frame = HorizonFrame::new(&ellipsoid, &model).unwrap();
    assert_kinds_match_geometry(&frame, &cone, &exact.crossings);
}

#[test]
fn test_clock_limited_cone() {
    let ellipsoid = Ellipsoid::sphere(EARTH_RADIUS);
    let model = equatorial_sensor(&ellipsoid, 50.0);
    let clock = ClockRange::new(-2.5, 0.5).unwrap();
    let shape = SensorShape::conic(30f64.to_radians(), clock).unwrap();

    let surface = compute_horizon_surface(&ellipsoid, &shape, &model, 5.0e6, &show_through()).unwrap();
    // One crossing on the cone surface, one on the sector plane at the
    // lower clock limit.
    assert_eq!(surface.crossings.len(), 2, "got {:?}", surface.crossings);
    let facets: Vec<usize> = surface.crossings.iter().map(|c| c.facet_index).collect();
    assert!(facets.contains(&0), "cone surface must contribute: {facets:?}");
    let frame = HorizonFrame::new(&ellipsoid, &model).unwrap();
    assert_kinds_match_geometry(&frame, &shape, &surface.crossings);
}

#[test]
fn test_portion_modes_select_mesh_shape() {
    let ellipsoid = Ellipsoid::sphere(EARTH_RADIUS);
    let model = equatorial_sensor(&ellipsoid, 50.0);
    let shape = SensorShape::polygonal_cone(30f64.to_radians(), 8).unwrap();

    let mut volume = SensorVolume::new(shape, model, 5.0e6).unwrap();
    volume.set_portion(PortionToDisplay::BelowHorizon);
    let below = volume.update(&ellipsoid).unwrap().clone();
    assert_eq!(below.kind, HorizonSurfaceKind::FrontPyramid);
    let limb_distance = ((EARTH_RADIUS + ALTITUDE).powi(2) - EARTH_RADIUS.powi(2)).sqrt();
    for p in below.mesh.positions() {
        assert!(p.length() <= limb_distance + 10.0, "below-horizon mesh beyond the limb");
    }
    assert_outward(&below.mesh);

    volume.set_portion(PortionToDisplay::AboveHorizon);
    let above = volume.update(&ellipsoid).unwrap().clone();
    assert_eq!(above.kind, HorizonSurfaceKind::BackPyramid);
    assert_outward(&above.mesh);

    volume.set_portion(PortionToDisplay::Complete);
    volume.set_show_through_ellipsoid(false);
    let complete = volume.update(&ellipsoid).unwrap();
    assert_eq!(complete.kind, HorizonSurfaceKind::BackPyramid);
}

#[test]
fn test_kdop_bounds_crossings() {
    let ellipsoid = Ellipsoid::sphere(EARTH_RADIUS);
    let model = equatorial_sensor(&ellipsoid, 50.0);
    let shape = SensorShape::polygonal_cone(30f64.to_radians(), 8).unwrap();
    let surface =
        compute_horizon_surface(&ellipsoid, &shape, &model, 5.0e6, &show_through()).unwrap();
    assert!(!surface.crossings.is_empty());
    for crossing in &surface.crossings {
        // Crossings sit on a facet plane; step toward the boresight to land inside.
        let nudged = crossing.direction_model + DVec3::Z;
        assert!(
            surface.kdop.contains_point(nudged),
            "crossing {:?} outside the k-DOP",
            crossing.direction_model
        );
    }
    let sphere = surface.mesh.bounding_sphere();
    assert_ne!(
        surface.kdop.test_sphere(sphere.center, sphere.radius),
        Intersection::Outside
    );
}

#[test]
fn test_cone_wider_than_hemisphere_crosses_on_its_own_edge() {
    let ellipsoid = Ellipsoid::sphere(EARTH_RADIUS);
    let model = equatorial_sensor(&ellipsoid, 90.0);
    let beta = 100f64.to_radians();
    let shape = SensorShape::conic(beta, ClockRange::FULL).unwrap();
    let options = HorizonOptions {
        portion: PortionToDisplay::AboveHorizon,
        ..HorizonOptions::default()
    };

    let surface = compute_horizon_surface(&ellipsoid, &shape, &model, 5.0e6, &options).unwrap();

    assert_eq!(surface.source, SurfaceSource::Arcs);
    assert_eq!(surface.crossings.len(), 2, "got {:?}", surface.crossings);
    for crossing in &surface.crossings {
        let off_boresight = crossing.direction_model.normalize().z.acos();
        assert!(
            (off_boresight - beta).abs() < 1e-6,
            "crossing {:.3}° off the boresight",
            off_boresight.to_degrees()
        );
    }
    let frame = HorizonFrame::new(&ellipsoid, &model).unwrap();
    assert_kinds_match_geometry(&frame, &shape, &surface.crossings);
}
