//! Grid geolocation for every supported grid type.

use grib_message::{
    BuiltinEngine, GribError, GribMessage, MemoryDecoder, ProjParams, Projection,
    ProjectionEngine, SUPPORTED_GRID_TYPES,
};
use projection::ProjectionError;
use test_utils::{assert_approx_eq, fixtures, gaussian_latitudes};

fn message(decoder: MemoryDecoder) -> GribMessage<MemoryDecoder> {
    GribMessage::new(decoder, 1).unwrap()
}

/// Longitudes equal modulo 360.
fn assert_lon_eq(actual: f64, expected: f64, epsilon: f64) {
    let diff = (actual - expected).rem_euclid(360.0);
    let diff = diff.min(360.0 - diff);
    assert!(diff <= epsilon, "longitude {} != {} (mod 360)", actual, expected);
}

// ============================================================================
// Regular and gaussian grids
// ============================================================================

#[test]
fn test_regular_ll_94x192() {
    let spec = fixtures::grid::LATLON_94X192;
    let mut msg = message(fixtures::regular_ll(spec.height, spec.width));
    let grid = msg.compute_latlons().unwrap();
    assert_eq!(grid.shape(), (spec.height, spec.width));
    assert_eq!(grid.lats.len(), spec.size());
    assert_eq!(grid.lats[[0, 0]], spec.min_lat);
    assert_eq!(grid.lats[[spec.height - 1, 0]], spec.max_lat);
    assert_eq!(grid.lons[[0, 0]], spec.min_lon);
    assert_eq!(grid.lons[[0, spec.width - 1]], spec.max_lon);

    let (dx, dy) = spec.resolution();
    assert_approx_eq!(grid.lons[[0, 1]] - grid.lons[[0, 0]], dx, 1e-12);
    assert_approx_eq!(grid.lats[[1, 0]] - grid.lats[[0, 0]], dy, 1e-9);
    assert_eq!(grid.projparams.proj, "cyl");
}

#[test]
fn test_regular_gg_t62() {
    let spec = fixtures::grid::T62;
    let mut msg = message(fixtures::regular_gg_t62());
    let grid = msg.compute_latlons().unwrap();
    assert_eq!(grid.shape(), (spec.height, spec.width));

    let max = grid.lats.iter().cloned().fold(f64::MIN, f64::max);
    let min = grid.lats.iter().cloned().fold(f64::MAX, f64::min);
    assert_approx_eq!(max, spec.max_lat, 1e-9);
    assert_approx_eq!(min, spec.min_lat, 1e-9);
    assert_eq!(grid.lons[[0, 0]], spec.min_lon);
    assert_eq!(grid.lons[[0, spec.width - 1]], spec.max_lon);
    assert_approx_eq!(grid.lons[[0, 1]], spec.resolution().0, 1e-12);

    let mut lats = gaussian_latitudes(94);
    lats.reverse();
    for j in 0..94 {
        for i in [0, 95, 191] {
            assert_eq!(grid.lats[[j, i]], lats[j]);
        }
    }
    assert_eq!(grid.lons.column(5).iter().filter(|l| **l != 9.375).count(), 0);
}

#[test]
fn test_t62_values_match_coordinates() {
    let mut msg = message(fixtures::regular_gg_t62());
    let field = msg.values().unwrap();
    let (lats, _) = msg.latlons().unwrap();
    assert_eq!(field.shape(), lats.shape());
}

#[test]
fn test_reduced_gg_coordinates() {
    let mut msg = message(fixtures::reduced_gg(8));
    let grid = msg.compute_latlons().unwrap();
    assert_eq!(grid.shape(), (8, 16));
    assert_eq!(msg.values().unwrap().shape(), &[8, 16]);
    assert_eq!(grid.lons[[0, 0]], 0.0);
    assert_eq!(grid.lons[[0, 15]], 360.0 - 360.0 / 16.0);
    assert!(grid.lats[[0, 0]] < grid.lats[[7, 0]]);
}

#[test]
fn test_reduced_ll_coordinates() {
    let mut msg = message(fixtures::reduced_ll(6));
    let grid = msg.compute_latlons().unwrap();
    assert_eq!(grid.shape(), (6, 12));
    assert_eq!(grid.lats[[0, 0]], -60.0);
    assert_eq!(grid.lats[[5, 0]], 60.0);
}

// ============================================================================
// Projected grids
// ============================================================================

#[test]
fn test_lambert_corner_and_spacing() {
    let mut msg = message(fixtures::lambert(5, 4));
    let grid = msg.compute_latlons().unwrap();
    assert_eq!(grid.shape(), (4, 5));
    assert_approx_eq!(grid.lats[[0, 0]], 21.138123, 1e-6);
    assert_lon_eq(grid.lons[[0, 0]], 237.280472, 1e-6);

    let params = msg.projparams().unwrap().clone();
    assert_eq!(params.proj, "lcc");
    assert_eq!(params.get("lat_1"), Some(38.5));
    assert_eq!(params.get("a"), Some(6_371_229.0));

    let lcc = BuiltinEngine.build(&params).unwrap();
    let (x0, y0) = lcc.forward(grid.lons[[0, 0]], grid.lats[[0, 0]]);
    let (x1, _) = lcc.forward(grid.lons[[0, 1]], grid.lats[[0, 1]]);
    let (_, y1) = lcc.forward(grid.lons[[1, 0]], grid.lats[[1, 0]]);
    assert_approx_eq!(x1 - x0, 3000.0, 1e-3);
    assert_approx_eq!(y1 - y0, 3000.0, 1e-3);
}

#[test]
fn test_polar_stereographic_corner() {
    let mut msg = message(fixtures::polar_stereographic(4, 3));
    let grid = msg.compute_latlons().unwrap();
    assert_eq!(grid.shape(), (3, 4));
    assert_approx_eq!(grid.lats[[0, 0]], 60.0, 1e-6);
    assert_lon_eq(grid.lons[[0, 0]], 250.0, 1e-6);

    let params = msg.projparams().unwrap();
    assert_eq!(params.proj, "stere");
    assert_eq!(params.get("lat_0"), Some(90.0));
    assert_eq!(params.get("lat_ts"), Some(60.0));
}

#[test]
fn test_polar_stereographic_south_pole() {
    let mut msg = message(
        fixtures::polar_stereographic(4, 3)
            .with("projectionCentreFlag", 128_i64)
            .with("latitudeOfFirstGridPointInDegrees", -60.0)
            .with("LaDInDegrees", -60.0),
    );
    let grid = msg.compute_latlons().unwrap();
    assert_eq!(msg.projparams().unwrap().get("lat_0"), Some(-90.0));
    assert_approx_eq!(grid.lats[[0, 0]], -60.0, 1e-6);
}

#[test]
fn test_mercator_corners() {
    let mut msg = message(fixtures::mercator(6, 5));
    let grid = msg.compute_latlons().unwrap();
    assert_eq!(grid.shape(), (5, 6));
    assert_approx_eq!(grid.lats[[0, 0]], -10.0, 1e-9);
    assert_approx_eq!(grid.lons[[0, 0]], 100.0, 1e-9);
    assert_approx_eq!(grid.lats[[4, 5]], 10.0, 1e-9);
    assert_approx_eq!(grid.lons[[4, 5]], 140.0, 1e-9);
    assert_eq!(msg.projparams().unwrap().get("lon_0"), Some(120.0));
}

#[test]
fn test_mercator_across_the_dateline() {
    let mut msg = message(
        fixtures::mercator(5, 3)
            .with("longitudeOfFirstGridPointInDegrees", 170.0)
            .with("longitudeOfLastGridPointInDegrees", -170.0),
    );
    let grid = msg.compute_latlons().unwrap();
    assert_eq!(msg.projparams().unwrap().get("lon_0"), Some(180.0));
    assert_lon_eq(grid.lons[[0, 2]], 180.0, 1e-9);
    assert_lon_eq(grid.lons[[0, 4]], 190.0, 1e-9);
}

#[test]
fn test_albers_corner() {
    let mut msg = message(fixtures::albers(4, 3));
    let grid = msg.compute_latlons().unwrap();
    assert_eq!(grid.shape(), (3, 4));
    assert_approx_eq!(grid.lats[[0, 0]], 30.0, 1e-6);
    assert_lon_eq(grid.lons[[0, 0]], 260.0, 1e-6);
    assert_eq!(msg.projparams().unwrap().proj, "aea");
}

#[test]
fn test_azimuthal_corners() {
    for (grid_type, proj) in [
        ("equatorial_azimuthal_equidistant", "aeqd"),
        ("lambert_azimuthal_equal_area", "laea"),
    ] {
        let mut msg = message(fixtures::azimuthal(grid_type, 4, 3));
        let grid = msg.compute_latlons().unwrap();
        assert_eq!(grid.shape(), (3, 4));
        assert_approx_eq!(grid.lats[[0, 0]], 44.0, 1e-6);
        assert_lon_eq(grid.lons[[0, 0]], 9.0, 1e-6);

        let params = msg.projparams().unwrap();
        assert_eq!(params.proj, proj);
        assert_eq!(params.get("lat_0"), Some(45.0));
        assert_eq!(params.get("lon_0"), Some(10.0));
    }
}

#[test]
fn test_truncate_degrees() {
    let mut msg = message(
        fixtures::polar_stereographic(2, 2)
            .with("latitudeOfFirstGridPointInDegrees", 60.7)
            .with("truncateDegrees", 1_i64),
    );
    let grid = msg.compute_latlons().unwrap();
    assert_approx_eq!(grid.lats[[0, 0]], 60.0, 1e-6);
}

// ============================================================================
// Space view
// ============================================================================

#[test]
fn test_geostationary_disk() {
    let n = 11;
    let mut msg = message(fixtures::space_view(n));
    let grid = msg.compute_latlons().unwrap();
    assert_eq!(grid.shape(), (n, n));

    let c = n / 2;
    assert_approx_eq!(grid.lats[[c, c]], 0.0, 1e-6);
    assert_approx_eq!(grid.lons[[c, c]], -75.0, 1e-6);

    for (j, i) in [(0, 0), (0, n - 1), (n - 1, 0), (n - 1, n - 1)] {
        assert_eq!(grid.lats[[j, i]], 1.0e30);
        assert_eq!(grid.lons[[j, i]], 1.0e30);
    }

    let params = msg.projparams().unwrap();
    assert_eq!(params.proj, "geos");
    assert_approx_eq!(params.get("h").unwrap(), 5.6107 * 6_371_229.0, 1e-3);
}

#[test]
fn test_space_view_scaled_camera_distance() {
    let mut decoder = fixtures::space_view(5);
    decoder.remove("NrInRadiusOfEarth");
    let mut msg = message(decoder.with("Nr", 6_610_700_i64));
    msg.compute_latlons().unwrap();
    assert_approx_eq!(
        msg.projparams().unwrap().get("h").unwrap(),
        5.6107 * 6_371_229.0,
        1e-3
    );
}

#[test]
fn test_space_view_camera_inside_earth() {
    let mut msg = message(fixtures::space_view(5).with("NrInRadiusOfEarth", 0.5));
    assert!(matches!(
        msg.compute_latlons(),
        Err(GribError::InvalidValue { .. })
    ));
}

#[test]
fn test_near_side_perspective_off_equator() {
    let mut msg = message(
        fixtures::space_view(7).with("latitudeOfSubSatellitePointInDegrees", 30.0),
    );
    let grid = msg.compute_latlons().unwrap();
    assert_eq!(msg.projparams().unwrap().proj, "nsper");
    assert_approx_eq!(grid.lats[[3, 3]], 30.0, 1e-6);
    assert_approx_eq!(grid.lons[[3, 3]], -75.0, 1e-6);
}

#[test]
fn test_near_side_perspective_needs_sphere() {
    let mut msg = message(
        fixtures::space_view(7)
            .with("latitudeOfSubSatellitePointInDegrees", 30.0)
            .with("shapeOfTheEarth", 5_i64),
    );
    assert!(matches!(
        msg.compute_latlons(),
        Err(GribError::UnsupportedGrid(_))
    ));
}

// ============================================================================
// Earth shape
// ============================================================================

fn earth_axes(decoder: MemoryDecoder) -> (f64, f64) {
    let mut msg = message(decoder);
    msg.compute_latlons().unwrap();
    let params = msg.projparams().unwrap();
    (params.get("a").unwrap(), params.get("b").unwrap())
}

#[test]
fn test_earth_shape_codes() {
    let base = || fixtures::regular_ll(3, 4);
    assert_eq!(earth_axes(base().with("shapeOfTheEarth", 0_i64)), (6_367_470.0, 6_367_470.0));
    assert_eq!(earth_axes(base().with("shapeOfTheEarth", 2_i64)), (6_378_160.0, 6_378_160.0));
    assert_eq!(earth_axes(base().with("shapeOfTheEarth", 6_i64)), (6_371_229.0, 6_371_229.0));
    assert_eq!(earth_axes(base().with("shapeOfTheEarth", 8_i64)), (6_371_229.0, 6_371_229.0));

    let mut no_radius = base().with("shapeOfTheEarth", 8_i64);
    no_radius.remove("radius");
    assert_eq!(earth_axes(no_radius), (6_371_200.0, 6_371_200.0));

    let (a, b) = earth_axes(base().with("shapeOfTheEarth", 5_i64));
    assert_eq!(a, 6_378_137.0);
    assert_approx_eq!(b, 6_356_752.314245, 1e-6);
}

#[test]
fn test_earth_shape_from_scaled_keys() {
    let sphere = fixtures::regular_ll(3, 4)
        .with("shapeOfTheEarth", 1_i64)
        .with("scaledValueOfRadiusOfSphericalEarth", 63_710_000_i64)
        .with("scaleFactorOfRadiusOfSphericalEarth", 1_i64);
    let (a, b) = earth_axes(sphere);
    assert_approx_eq!(a, 6_371_000.0, 1e-6);
    assert_eq!(a, b);

    let km = fixtures::regular_ll(3, 4)
        .with("shapeOfTheEarth", 3_i64)
        .with("scaledValueOfEarthMajorAxis", 6_378_137_i64)
        .with("scaleFactorOfEarthMajorAxis", 3_i64)
        .with("scaledValueOfEarthMinorAxis", 6_356_752_i64)
        .with("scaleFactorOfEarthMinorAxis", 3_i64);
    let (a, b) = earth_axes(km);
    assert_approx_eq!(a, 6_378_137.0, 1e-6);
    assert_approx_eq!(b, 6_356_752.0, 1e-6);

    let metres = fixtures::regular_ll(3, 4)
        .with("shapeOfTheEarth", 7_i64)
        .with("scaledValueOfEarthMajorAxis", 6_378_137_i64)
        .with("scaleFactorOfEarthMajorAxis", 0_i64)
        .with("scaledValueOfEarthMinorAxis", 6_356_752_i64)
        .with("scaleFactorOfEarthMinorAxis", grib_message::MISSING_LONG);
    assert_eq!(earth_axes(metres), (6_378_137.0, 6_356_752.0));
}

#[test]
fn test_grib1_default_earth() {
    let mut decoder = fixtures::regular_ll(3, 4);
    decoder.remove("shapeOfTheEarth");
    assert_eq!(earth_axes(decoder), (6_367_470.0, 6_367_470.0));
}

#[test]
fn test_unknown_earth_shape() {
    let mut msg = message(fixtures::regular_ll(3, 4).with("shapeOfTheEarth", 9_i64));
    assert!(matches!(
        msg.compute_latlons(),
        Err(GribError::UnknownEarthShape(9))
    ));
}

// ============================================================================
// Registry and failures
// ============================================================================

#[test]
fn test_every_supported_grid_type_has_a_strategy() {
    for grid_type in SUPPORTED_GRID_TYPES {
        assert!(grib_message::grid::family_for(grid_type).is_some(), "{}", grid_type);
    }
    assert!(grib_message::grid::family_for("rotated_ll").is_none());
}

#[test]
fn test_unsupported_grid_type() {
    let mut msg = message(fixtures::regular_ll(3, 4).with("gridType", "rotated_ll"));
    match msg.compute_latlons() {
        Err(GribError::UnsupportedGrid(name)) => assert_eq!(name, "rotated_ll"),
        other => panic!("expected unsupported grid, got {:?}", other),
    }
    assert!(msg.projparams().is_none());
}

#[test]
fn test_missing_required_key() {
    let mut decoder = fixtures::lambert(3, 3);
    decoder.remove("Latin2InDegrees");
    match message(decoder).compute_latlons() {
        Err(GribError::KeyNotFound(key)) => assert_eq!(key, "Latin2InDegrees"),
        other => panic!("expected a missing key, got {:?}", other),
    }
}

#[test]
fn test_projparams_replaced_on_recompute() {
    let mut msg = message(fixtures::regular_ll(3, 4));
    assert!(msg.projparams().is_none());
    msg.compute_latlons().unwrap();
    assert_eq!(msg.projparams().unwrap().get("a"), Some(6_371_229.0));

    msg.set("radius", 6_400_000.0).unwrap();
    msg.compute_latlons().unwrap();
    assert_eq!(msg.projparams().unwrap().get("a"), Some(6_400_000.0));
}

struct RefusingEngine;

impl ProjectionEngine for RefusingEngine {
    fn build(&self, params: &ProjParams) -> projection::Result<Box<dyn Projection>> {
        Err(ProjectionError::UnknownProjection(params.proj.clone()))
    }
}

#[test]
fn test_engine_errors_propagate() {
    let mut msg = message(fixtures::lambert(3, 3));
    match msg.compute_latlons_with(&RefusingEngine) {
        Err(GribError::Projection(ProjectionError::UnknownProjection(name))) => {
            assert_eq!(name, "lcc")
        }
        other => panic!("expected a projection error, got {:?}", other),
    }
}
