//! Synthetic GRIB messages for tests.
//!
//! Each builder returns a [`MemoryDecoder`] holding the keys a decoder would
//! report for one message of that grid type. Tests override individual keys
//! with [`MemoryDecoder::with`] before wrapping the decoder in a message.

use grib_message::{MemoryDecoder, MISSING_LONG};

use crate::generators::{create_test_grid, gaussian_latitudes, linspace, octahedral_row_lengths};

/// Missing-value sentinel used by the fixtures.
pub const MISSING: f64 = 9999.0;

/// Common grid specifications for testing.
pub mod grid {
    /// T62 regular gaussian grid (94 x 192).
    pub const T62: GridSpec = GridSpec {
        width: 192,
        height: 94,
        min_lon: 0.0,
        max_lon: 358.125,
        min_lat: -88.5419501373,
        max_lat: 88.5419501373,
    };

    /// 94 x 192 regular lat/lon grid.
    pub const LATLON_94X192: GridSpec = GridSpec {
        width: 192,
        height: 94,
        min_lon: 0.0,
        max_lon: 358.125,
        min_lat: -90.0,
        max_lat: 90.0,
    };

    /// Grid specification for testing.
    #[derive(Debug, Clone, Copy)]
    pub struct GridSpec {
        pub width: usize,
        pub height: usize,
        pub min_lon: f64,
        pub max_lon: f64,
        pub min_lat: f64,
        pub max_lat: f64,
    }

    impl GridSpec {
        /// Returns the total number of grid cells.
        pub fn size(&self) -> usize {
            self.width * self.height
        }

        /// Returns the spacing between grid points in degrees.
        pub fn resolution(&self) -> (f64, f64) {
            let dx = (self.max_lon - self.min_lon) / (self.width - 1) as f64;
            let dy = (self.max_lat - self.min_lat) / (self.height - 1) as f64;
            (dx, dy)
        }
    }
}

/// Product keys shared by every fixture: 500 hPa temperature, 12 h forecast
/// from 2024-01-15 12Z, on a 6371229 m sphere.
pub fn base_message(grid_type: &str) -> MemoryDecoder {
    MemoryDecoder::new()
        .with("name", "Temperature")
        .with("shortName", "t")
        .with("units", "K")
        .with("stepType", "instant")
        .with("gridType", grid_type)
        .with("typeOfLevel", "isobaricInhPa")
        .with("level", 500_i64)
        .with("dataDate", 20240115_i64)
        .with("dataTime", 1200_i64)
        .with("forecastTime", 12_i64)
        .with("stepUnits", 1_i64)
        .with("shapeOfTheEarth", 6_i64)
        .with("radius", 6_371_229.0)
        .with("bitmapPresent", 0_i64)
        .with("missingValue", MISSING)
        .with_read_only("numberOfMissing", 0_i64)
        .with_read_only("edition", 2_i64)
}

/// Coded north to south, west to east, rows consecutive.
fn north_to_south(decoder: MemoryDecoder) -> MemoryDecoder {
    decoder
        .with("iScansNegatively", 0_i64)
        .with("jScansPositively", 0_i64)
        .with("jPointsAreConsecutive", 0_i64)
        .with("alternativeRowScanning", 0_i64)
}

/// Regular lat/lon grid from 90N to 90S and 0E eastward at 360/ni degrees.
///
/// Values are `col * 1000 + row` in coded order.
pub fn regular_ll(nj: usize, ni: usize) -> MemoryDecoder {
    let last_lon = 360.0 - 360.0 / ni as f64;
    north_to_south(base_message("regular_ll"))
        .with("Ni", ni as i64)
        .with("Nj", nj as i64)
        .with("latitudeOfFirstGridPointInDegrees", 90.0)
        .with("longitudeOfFirstGridPointInDegrees", 0.0)
        .with("latitudeOfLastGridPointInDegrees", -90.0)
        .with("longitudeOfLastGridPointInDegrees", last_lon)
        .with_read_only("distinctLatitudes", linspace(-90.0, 90.0, nj))
        .with_read_only("distinctLongitudes", linspace(0.0, last_lon, ni))
        .with("values", create_test_grid(ni, nj))
}

/// T62 regular gaussian grid, 94 x 192.
pub fn regular_gg_t62() -> MemoryDecoder {
    let mut lats = gaussian_latitudes(94);
    let (first, last) = (lats[0], lats[93]);
    lats.reverse();
    north_to_south(base_message("regular_gg"))
        .with("N", 47_i64)
        .with("Ni", 192_i64)
        .with("Nj", 94_i64)
        .with("latitudeOfFirstGridPointInDegrees", first)
        .with("longitudeOfFirstGridPointInDegrees", 0.0)
        .with("latitudeOfLastGridPointInDegrees", last)
        .with("longitudeOfLastGridPointInDegrees", 358.125)
        .with_read_only("distinctLatitudes", lats)
        .with_read_only("distinctLongitudes", linspace(0.0, 358.125, 192))
        .with("values", create_test_grid(192, 94))
}

/// Values of a reduced grid: row `j`, point `i` holds `j * 100 + i`.
fn reduced_values(pl: &[i64]) -> Vec<f64> {
    pl.iter()
        .enumerate()
        .flat_map(|(j, &n)| (0..n).map(move |i| (j * 100) as f64 + i as f64))
        .collect()
}

/// Octahedral reduced gaussian grid with `nlat` rows.
pub fn reduced_gg(nlat: usize) -> MemoryDecoder {
    let pl = octahedral_row_lengths(nlat);
    let mut lats = gaussian_latitudes(nlat);
    let (first, last) = (lats[0], lats[nlat - 1]);
    lats.reverse();
    let values = reduced_values(&pl);
    north_to_south(base_message("reduced_gg"))
        .with("N", (nlat / 2) as i64)
        .with("Ni", MISSING_LONG)
        .with("Nj", nlat as i64)
        .with("latitudeOfFirstGridPointInDegrees", first)
        .with("longitudeOfFirstGridPointInDegrees", 0.0)
        .with("latitudeOfLastGridPointInDegrees", last)
        .with("longitudeOfLastGridPointInDegrees", 360.0 - 360.0 / (2 * nlat) as f64)
        .with_read_only("distinctLatitudes", lats)
        .with_read_only("pl", pl)
        .with("values", values)
}

/// Reduced lat/lon grid from 60N to 60S with rows shrinking poleward.
pub fn reduced_ll(nj: usize) -> MemoryDecoder {
    let lats = linspace(60.0, -60.0, nj);
    let pl: Vec<i64> = lats
        .iter()
        .map(|lat| (2.0 * nj as f64 * lat.to_radians().cos()).round().max(4.0) as i64)
        .collect();
    let values = reduced_values(&pl);
    north_to_south(base_message("reduced_ll"))
        .with("Ni", MISSING_LONG)
        .with("Nj", nj as i64)
        .with("latitudeOfFirstGridPointInDegrees", 60.0)
        .with("longitudeOfFirstGridPointInDegrees", 0.0)
        .with("latitudeOfLastGridPointInDegrees", -60.0)
        .with("longitudeOfLastGridPointInDegrees", 360.0 - 180.0 / nj as f64)
        .with_read_only("pl", pl)
        .with("values", values)
}

/// Corner of an HRRR-like Lambert conformal grid at 3 km spacing.
pub fn lambert(nx: usize, ny: usize) -> MemoryDecoder {
    projected(base_message("lambert"), nx, ny)
        .with("latitudeOfFirstGridPointInDegrees", 21.138123)
        .with("longitudeOfFirstGridPointInDegrees", 237.280472)
        .with("LoVInDegrees", 262.5)
        .with("LaDInDegrees", 38.5)
        .with("Latin1InDegrees", 38.5)
        .with("Latin2InDegrees", 38.5)
        .with("DxInMetres", 3000.0)
        .with("DyInMetres", 3000.0)
}

/// North polar stereographic grid at 10 km spacing.
pub fn polar_stereographic(nx: usize, ny: usize) -> MemoryDecoder {
    projected(base_message("polar_stereographic"), nx, ny)
        .with("latitudeOfFirstGridPointInDegrees", 60.0)
        .with("longitudeOfFirstGridPointInDegrees", 250.0)
        .with("orientationOfTheGridInDegrees", 255.0)
        .with("LaDInDegrees", 60.0)
        .with("projectionCentreFlag", 0_i64)
        .with("DxInMetres", 10_000.0)
        .with("DyInMetres", 10_000.0)
}

/// Mercator grid from (10S, 100E) to (10N, 140E).
pub fn mercator(ni: usize, nj: usize) -> MemoryDecoder {
    north_to_south(base_message("mercator"))
        .with("jScansPositively", 1_i64)
        .with("Ni", ni as i64)
        .with("Nj", nj as i64)
        .with("latitudeOfFirstGridPointInDegrees", -10.0)
        .with("longitudeOfFirstGridPointInDegrees", 100.0)
        .with("latitudeOfLastGridPointInDegrees", 10.0)
        .with("longitudeOfLastGridPointInDegrees", 140.0)
        .with("LaDInDegrees", 20.0)
        .with("values", create_test_grid(ni, nj))
}

/// Albers equal-area grid over the central US at 5 km spacing.
pub fn albers(nx: usize, ny: usize) -> MemoryDecoder {
    projected(base_message("albers"), nx, ny)
        .with("latitudeOfFirstGridPoint", 30_000_000_i64)
        .with("longitudeOfFirstGridPoint", 260_000_000_i64)
        .with("LoVInDegrees", 264.0)
        .with("LaDInDegrees", 23.0)
        .with("Latin1InDegrees", 29.5)
        .with("Latin2InDegrees", 45.5)
        .with("Dx", 5_000_000_i64)
        .with("Dy", 5_000_000_i64)
}

/// Azimuthal grid (`equatorial_azimuthal_equidistant` or
/// `lambert_azimuthal_equal_area`) centred on (45N, 10E) at 2 km spacing.
pub fn azimuthal(grid_type: &str, nx: usize, ny: usize) -> MemoryDecoder {
    projected(base_message(grid_type), nx, ny)
        .with("standardParallel", 45_000_000_i64)
        .with("centralLongitude", 10_000_000_i64)
        .with("latitudeOfFirstGridPoint", 44_000_000_i64)
        .with("longitudeOfFirstGridPoint", 9_000_000_i64)
        .with("Dx", 2_000_000_i64)
        .with("Dy", 2_000_000_i64)
}

/// Geostationary full disk seen from 75W, `n x n` pixels with the disk
/// exactly spanning the raster.
pub fn space_view(n: usize) -> MemoryDecoder {
    projected(base_message("space_view"), n, n)
        .with("longitudeOfSubSatellitePointInDegrees", -75.0)
        .with("latitudeOfSubSatellitePointInDegrees", 0.0)
        .with("NrInRadiusOfEarth", 6.6107)
        .with("dx", (n - 1) as f64)
        .with("dy", (n - 1) as f64)
}

/// `Nx x Ny` raster coded south to north, filled with `col * 1000 + row`.
fn projected(decoder: MemoryDecoder, nx: usize, ny: usize) -> MemoryDecoder {
    north_to_south(decoder)
        .with("jScansPositively", 1_i64)
        .with("Nx", nx as i64)
        .with("Ny", ny as i64)
        .with("Ni", nx as i64)
        .with("Nj", ny as i64)
        .with("values", create_test_grid(nx, ny))
}

/// Replace the given coded positions with [`MISSING`] and record the count.
pub fn with_missing(decoder: MemoryDecoder, positions: &[usize]) -> MemoryDecoder {
    let mut values = match decoder.value("values").and_then(|v| v.as_doubles()) {
        Some(values) => values,
        None => return decoder,
    };
    for &p in positions {
        values[p] = MISSING;
    }
    let count = values.iter().filter(|v| **v == MISSING).count();
    decoder
        .with("values", values)
        .with_read_only("numberOfMissing", count as i64)
}
