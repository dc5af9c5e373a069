//! Reduced (quasi-regular) grids, geolocated as their expanded form.
//!
//! Coordinates match the field `values` returns with expansion on: `Nj` rows
//! of `2 * Nj` evenly spaced longitudes.

use ndarray::Array1;

use super::{linspace, mesh, GeoGrid, GridContext, GridFamily};
use crate::accessor::dimension;
use crate::error::Result;

/// `reduced_gg`: gaussian latitudes from the decoder.
pub(super) struct ReducedGaussian;

/// `reduced_ll`: latitudes evenly spaced between the first and last rows,
/// south to north like the normalized field.
pub(super) struct ReducedLatLon;

impl GridFamily for ReducedGaussian {
    fn name(&self) -> &'static str {
        "reduced gaussian"
    }

    fn required_keys(&self) -> &'static [&'static str] {
        &[
            "Nj",
            "distinctLatitudes",
            "longitudeOfFirstGridPointInDegrees",
            "longitudeOfLastGridPointInDegrees",
        ]
    }

    fn synthesize(&self, ctx: &GridContext<'_>) -> Result<GeoGrid> {
        let lats = ctx.reader.doubles("distinctLatitudes")?;
        expanded(ctx, lats)
    }
}

impl GridFamily for ReducedLatLon {
    fn name(&self) -> &'static str {
        "reduced lat/lon"
    }

    fn required_keys(&self) -> &'static [&'static str] {
        &[
            "Nj",
            "latitudeOfFirstGridPointInDegrees",
            "latitudeOfLastGridPointInDegrees",
            "longitudeOfFirstGridPointInDegrees",
            "longitudeOfLastGridPointInDegrees",
        ]
    }

    fn synthesize(&self, ctx: &GridContext<'_>) -> Result<GeoGrid> {
        let nj = dimension(ctx.reader, "Nj")?;
        let lat1 = ctx.reader.double("latitudeOfFirstGridPointInDegrees")?;
        let lat2 = ctx.reader.double("latitudeOfLastGridPointInDegrees")?;
        expanded(ctx, linspace(lat1.min(lat2), lat1.max(lat2), nj))
    }
}

fn expanded(ctx: &GridContext<'_>, lats: Array1<f64>) -> Result<GeoGrid> {
    let nj = dimension(ctx.reader, "Nj")?;
    let lon1 = ctx.reader.double("longitudeOfFirstGridPointInDegrees")?;
    let lon2 = ctx.reader.double("longitudeOfLastGridPointInDegrees")?;
    let lons = linspace(lon1, lon2, 2 * nj);
    let (lats, lons) = mesh(&lats, &lons);
    Ok(GeoGrid {
        lats,
        lons,
        projparams: ctx.params("cyl"),
    })
}
