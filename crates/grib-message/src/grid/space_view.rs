//! Satellite space-view grids.
//!
//! The image is a raster of scan angles centred on the sub-satellite point.
//! Its extent comes from the apparent diameter of the earth disk in pixels
//! (`dx`, `dy`): the horizon points are forward-projected to get the disk's
//! size on the projection plane, which fixes the pixel spacing.

use ndarray::Zip;
use tracing::{debug, warn};

use super::projected::Raster;
use super::{GeoGrid, GridContext, GridFamily};
use crate::accessor::dimension;
use crate::error::{GribError, Result};

/// Scale of the `Nr` key relative to earth radii.
const NR_DIVIDER: f64 = 1.0e6;

/// Coordinates at or beyond this magnitude are off the earth disk.
const OFF_DISK: f64 = 1.0e20;

pub(super) struct SpaceViewGrid;

impl GridFamily for SpaceViewGrid {
    fn name(&self) -> &'static str {
        "space view"
    }

    fn required_keys(&self) -> &'static [&'static str] {
        &[
            "Nx",
            "Ny",
            "longitudeOfSubSatellitePointInDegrees",
            "latitudeOfSubSatellitePointInDegrees",
            "dx",
            "dy",
        ]
    }

    fn synthesize(&self, ctx: &GridContext<'_>) -> Result<GeoGrid> {
        let r = ctx.reader;
        let lon_0 = r.double("longitudeOfSubSatellitePointInDegrees")?;
        let lat_0 = r.double("latitudeOfSubSatellitePointInDegrees")?;
        let nr = camera_distance(ctx)?;
        let earth = ctx.earth;

        let geostationary = lat_0 == 0.0;
        if !geostationary {
            if !earth.is_spherical() {
                return Err(GribError::UnsupportedGrid(
                    "space_view off the equator requires a spherical earth".to_string(),
                ));
            }
            warn!(
                lat_0,
                "Space view not centred on the equator, using near-side perspective"
            );
        }

        let mut params = ctx.params(if geostationary { "geos" } else { "nsper" });
        params.set("lon_0", lon_0);
        params.set("lat_0", lat_0);
        params.set("h", nr * earth.a - earth.a);
        let projection = ctx.build(&params)?;

        // Angular radius of the visible cap, kept just inside the horizon.
        let horizon = (1000.0 * (90.0 - (1.0 / nr).asin().to_degrees())).trunc() / 1000.0;
        let (half_width, half_height) = if geostationary {
            let (x, _) = projection.forward(lon_0 + horizon, 0.0);
            let (_, y) = projection.forward(lon_0, horizon);
            (x.abs(), y.abs())
        } else {
            let lat = if lat_0 > 0.0 { lat_0 - horizon } else { lat_0 + horizon };
            let (_, y) = projection.forward(lon_0, lat);
            (y.abs(), y.abs())
        };

        let nx = dimension(r, "Nx")?;
        let ny = dimension(r, "Ny")?;
        let dx = 2.0 * half_width / r.double("dx")?;
        let dy = 2.0 * half_height / r.double("dy")?;
        let raster = Raster {
            x0: -0.5 * dx * (nx as f64 - 1.0),
            y0: -0.5 * dy * (ny as f64 - 1.0),
            dx,
            dy,
            nx,
            ny,
        };

        let mut grid = raster.into_grid(projection.as_ref(), params)?;
        let off = Zip::from(&grid.lats)
            .and(&grid.lons)
            .map_collect(|lat, lon| !on_disk(*lat) || !on_disk(*lon));
        let undefined = ctx.options.undefined_coordinate;
        Zip::from(&mut grid.lats)
            .and(&mut grid.lons)
            .and(&off)
            .for_each(|lat, lon, &off| {
                if off {
                    *lat = undefined;
                    *lon = undefined;
                }
            });
        let off_disk = off.iter().filter(|off| **off).count();

        debug!(nx, ny, off_disk, horizon, "Space view raster");
        Ok(grid)
    }
}

fn on_disk(v: f64) -> bool {
    v.is_finite() && v.abs() < OFF_DISK
}

/// Distance of the camera from the earth centre, in earth radii.
fn camera_distance(ctx: &GridContext<'_>) -> Result<f64> {
    let r = ctx.reader;
    let nr = if r.has("NrInRadiusOfEarth") {
        r.double("NrInRadiusOfEarth")?
    } else if r.has("Nr") {
        r.double("Nr")? / NR_DIVIDER
    } else {
        return Err(GribError::KeyNotFound("NrInRadiusOfEarth".to_string()));
    };
    if !(nr > 1.0) {
        return Err(GribError::invalid_value(
            "NrInRadiusOfEarth",
            format!("camera must be above the surface, got {} earth radii", nr),
        ));
    }
    Ok(nr)
}
