//! Grids defined on a map projection plane.
//!
//! Each family builds a projection record from its own keys, projects the
//! first grid point to find the lower-left corner of the x/y raster, and
//! inverse-projects the full `nx × ny` raster at the declared spacing.

use ndarray::Array2;
use projection::{ProjParams, Projection};

use super::{GeoGrid, GridContext, GridFamily};
use crate::accessor::{dimension, KeyReader};
use crate::error::{GribError, Result};

/// Divisor for angles stored as scaled integers.
const DEFAULT_GRIB2_DIVIDER: f64 = 1.0e6;

pub(super) struct PolarStereographicGrid;
pub(super) struct LambertGrid;
pub(super) struct AlbersGrid;
pub(super) struct MercatorGrid;

/// Azimuthal grids whose definitions share one set of scaled-integer keys.
pub(super) struct AzimuthalGrid {
    name: &'static str,
    proj: &'static str,
}

pub(super) static AZIMUTHAL_EQUIDISTANT: AzimuthalGrid = AzimuthalGrid {
    name: "equatorial azimuthal equidistant",
    proj: "aeqd",
};

pub(super) static AZIMUTHAL_EQUAL_AREA: AzimuthalGrid = AzimuthalGrid {
    name: "lambert azimuthal equal area",
    proj: "laea",
};

impl GridFamily for PolarStereographicGrid {
    fn name(&self) -> &'static str {
        "polar stereographic"
    }

    fn required_keys(&self) -> &'static [&'static str] {
        &[
            "Nx",
            "Ny",
            "latitudeOfFirstGridPointInDegrees",
            "longitudeOfFirstGridPointInDegrees",
            "orientationOfTheGridInDegrees",
            "DxInMetres",
            "DyInMetres",
        ]
    }

    fn synthesize(&self, ctx: &GridContext<'_>) -> Result<GeoGrid> {
        let r = ctx.reader;
        let south_pole = r.long_or("projectionCentreFlag", 0)? & 0x80 != 0;

        let mut params = ctx.params("stere");
        params.set("lat_ts", r.double_or("LaDInDegrees", 60.0)?);
        params.set("lat_0", if south_pole { -90.0 } else { 90.0 });
        params.set("lon_0", r.double("orientationOfTheGridInDegrees")?);

        let projection = ctx.build(&params)?;
        let (lon1, lat1) = first_point_degrees(r)?;
        let raster = Raster::from_corner(
            projection.as_ref(),
            lon1,
            lat1,
            r.double("DxInMetres")?,
            r.double("DyInMetres")?,
            dimension(r, "Nx")?,
            dimension(r, "Ny")?,
        );
        raster.into_grid(projection.as_ref(), params)
    }
}

impl GridFamily for LambertGrid {
    fn name(&self) -> &'static str {
        "lambert conformal"
    }

    fn required_keys(&self) -> &'static [&'static str] {
        &[
            "Nx",
            "Ny",
            "latitudeOfFirstGridPointInDegrees",
            "longitudeOfFirstGridPointInDegrees",
            "LoVInDegrees",
            "LaDInDegrees",
            "Latin1InDegrees",
            "Latin2InDegrees",
            "DxInMetres",
            "DyInMetres",
        ]
    }

    fn synthesize(&self, ctx: &GridContext<'_>) -> Result<GeoGrid> {
        let r = ctx.reader;
        let mut params = ctx.params("lcc");
        set_conic_parameters(r, &mut params)?;

        let projection = ctx.build(&params)?;
        let (lon1, lat1) = first_point_degrees(r)?;
        let raster = Raster::from_corner(
            projection.as_ref(),
            lon1,
            lat1,
            r.double("DxInMetres")?,
            r.double("DyInMetres")?,
            dimension(r, "Nx")?,
            dimension(r, "Ny")?,
        );
        raster.into_grid(projection.as_ref(), params)
    }
}

impl GridFamily for AlbersGrid {
    fn name(&self) -> &'static str {
        "albers equal area"
    }

    fn required_keys(&self) -> &'static [&'static str] {
        &[
            "Nx",
            "Ny",
            "latitudeOfFirstGridPoint",
            "longitudeOfFirstGridPoint",
            "LoVInDegrees",
            "LaDInDegrees",
            "Latin1InDegrees",
            "Latin2InDegrees",
            "Dx",
            "Dy",
        ]
    }

    fn synthesize(&self, ctx: &GridContext<'_>) -> Result<GeoGrid> {
        let r = ctx.reader;
        let mut params = ctx.params("aea");
        set_conic_parameters(r, &mut params)?;

        let projection = ctx.build(&params)?;
        let (lon1, lat1) = first_point_scaled(r)?;
        let raster = Raster::from_corner(
            projection.as_ref(),
            lon1,
            lat1,
            r.double("Dx")? / 1000.0,
            r.double("Dy")? / 1000.0,
            dimension(r, "Nx")?,
            dimension(r, "Ny")?,
        );
        raster.into_grid(projection.as_ref(), params)
    }
}

impl GridFamily for MercatorGrid {
    fn name(&self) -> &'static str {
        "mercator"
    }

    fn required_keys(&self) -> &'static [&'static str] {
        &[
            "Ni",
            "Nj",
            "latitudeOfFirstGridPointInDegrees",
            "longitudeOfFirstGridPointInDegrees",
            "latitudeOfLastGridPointInDegrees",
            "longitudeOfLastGridPointInDegrees",
            "LaDInDegrees",
        ]
    }

    fn synthesize(&self, ctx: &GridContext<'_>) -> Result<GeoGrid> {
        let r = ctx.reader;
        let truncate = r.flag("truncateDegrees")?;
        let lon1 = degrees(r, "longitudeOfFirstGridPointInDegrees", truncate)?;
        let lat1 = degrees(r, "latitudeOfFirstGridPointInDegrees", truncate)?;
        let mut lon2 = degrees(r, "longitudeOfLastGridPointInDegrees", truncate)?;
        let lat2 = degrees(r, "latitudeOfLastGridPointInDegrees", truncate)?;
        if lon2 < lon1 {
            lon2 += 360.0;
        }

        let mut params = ctx.params("merc");
        params.set("lat_ts", r.double("LaDInDegrees")?);
        params.set("lon_0", 0.5 * (lon1 + lon2));
        let projection = ctx.build(&params)?;

        let nx = dimension(r, "Ni")?;
        let ny = dimension(r, "Nj")?;
        let (x0, y0) = projection.forward(lon1, lat1);
        let (x1, y1) = projection.forward(lon2, lat2);
        let raster = Raster {
            x0,
            y0,
            dx: spacing(x0, x1, nx),
            dy: spacing(y0, y1, ny),
            nx,
            ny,
        };
        raster.into_grid(projection.as_ref(), params)
    }
}

impl GridFamily for AzimuthalGrid {
    fn name(&self) -> &'static str {
        self.name
    }

    fn required_keys(&self) -> &'static [&'static str] {
        &[
            "Nx",
            "Ny",
            "standardParallel",
            "centralLongitude",
            "latitudeOfFirstGridPoint",
            "longitudeOfFirstGridPoint",
            "Dx",
            "Dy",
        ]
    }

    fn synthesize(&self, ctx: &GridContext<'_>) -> Result<GeoGrid> {
        let r = ctx.reader;
        let mut params = ctx.params(self.proj);
        params.set("lat_0", r.double("standardParallel")? / DEFAULT_GRIB2_DIVIDER);
        params.set("lon_0", r.double("centralLongitude")? / DEFAULT_GRIB2_DIVIDER);

        let projection = ctx.build(&params)?;
        let (lon1, lat1) = first_point_scaled(r)?;
        let raster = Raster::from_corner(
            projection.as_ref(),
            lon1,
            lat1,
            r.double("Dx")? / 1000.0,
            r.double("Dy")? / 1000.0,
            dimension(r, "Nx")?,
            dimension(r, "Ny")?,
        );
        raster.into_grid(projection.as_ref(), params)
    }
}

/// An `nx × ny` raster on the projection plane.
#[derive(Debug, Clone, Copy)]
pub(super) struct Raster {
    pub x0: f64,
    pub y0: f64,
    pub dx: f64,
    pub dy: f64,
    pub nx: usize,
    pub ny: usize,
}

impl Raster {
    fn from_corner(
        projection: &dyn Projection,
        lon: f64,
        lat: f64,
        dx: f64,
        dy: f64,
        nx: usize,
        ny: usize,
    ) -> Self {
        let (x0, y0) = projection.forward(lon, lat);
        Self {
            x0,
            y0,
            dx,
            dy,
            nx,
            ny,
        }
    }

    pub(super) fn into_grid(self, projection: &dyn Projection, projparams: ProjParams) -> Result<GeoGrid> {
        if !(self.x0.is_finite() && self.y0.is_finite()) {
            return Err(GribError::invalid_value(
                "latitudeOfFirstGridPoint",
                format!("first grid point does not map onto the {} plane", projection.name()),
            ));
        }
        let (lats, lons) = inverse_mesh(projection, self)?;
        Ok(GeoGrid {
            lats,
            lons,
            projparams,
        })
    }
}

/// Inverse-project every raster point, row by row from the corner.
fn inverse_mesh(projection: &dyn Projection, raster: Raster) -> Result<(Array2<f64>, Array2<f64>)> {
    let n = raster.nx * raster.ny;
    let mut xs = Vec::with_capacity(n);
    let mut ys = Vec::with_capacity(n);
    for j in 0..raster.ny {
        let y = raster.y0 + j as f64 * raster.dy;
        for i in 0..raster.nx {
            xs.push(raster.x0 + i as f64 * raster.dx);
            ys.push(y);
        }
    }
    let (lons, lats) = projection.inverse_batch(&xs, &ys);
    let shape = (raster.ny, raster.nx);
    let lats = Array2::from_shape_vec(shape, lats).map_err(|e| GribError::Shape(e.to_string()))?;
    let lons = Array2::from_shape_vec(shape, lons).map_err(|e| GribError::Shape(e.to_string()))?;
    Ok((lats, lons))
}

fn set_conic_parameters(r: &dyn KeyReader, params: &mut ProjParams) -> Result<()> {
    params.set("lon_0", r.double("LoVInDegrees")?);
    params.set("lat_0", r.double("LaDInDegrees")?);
    params.set("lat_1", r.double("Latin1InDegrees")?);
    params.set("lat_2", r.double("Latin2InDegrees")?);
    Ok(())
}

/// Two-endpoint spacing `(last - first) / (n - 1)`.
fn spacing(first: f64, last: f64, n: usize) -> f64 {
    if n > 1 {
        (last - first) / (n as f64 - 1.0)
    } else {
        0.0
    }
}

fn degrees(r: &dyn KeyReader, key: &str, truncate: bool) -> Result<f64> {
    let value = r.double(key)?;
    Ok(if truncate { value.trunc() } else { value })
}

/// First grid point from the `...InDegrees` keys, as (lon, lat).
fn first_point_degrees(r: &dyn KeyReader) -> Result<(f64, f64)> {
    let truncate = r.flag("truncateDegrees")?;
    Ok((
        degrees(r, "longitudeOfFirstGridPointInDegrees", truncate)?,
        degrees(r, "latitudeOfFirstGridPointInDegrees", truncate)?,
    ))
}

/// First grid point from the scaled-integer keys, as (lon, lat).
fn first_point_scaled(r: &dyn KeyReader) -> Result<(f64, f64)> {
    let truncate = r.flag("truncateDegrees")?;
    let divider = r.double_or("grib2divider", DEFAULT_GRIB2_DIVIDER)?;
    let scaled = |key: &str| -> Result<f64> {
        let value = r.double(key)? / divider;
        Ok(if truncate { value.trunc() } else { value })
    };
    Ok((
        scaled("longitudeOfFirstGridPoint")?,
        scaled("latitudeOfFirstGridPoint")?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spacing() {
        assert_eq!(spacing(0.0, 10.0, 11), 1.0);
        assert_eq!(spacing(5.0, 5.0, 1), 0.0);
    }

    #[test]
    fn test_inverse_mesh_row_order() {
        struct Identity;
        impl Projection for Identity {
            fn name(&self) -> &'static str {
                "identity"
            }
            fn forward(&self, lon: f64, lat: f64) -> (f64, f64) {
                (lon, lat)
            }
            fn inverse(&self, x: f64, y: f64) -> (f64, f64) {
                (x, y)
            }
        }
        let raster = Raster {
            x0: 10.0,
            y0: -5.0,
            dx: 2.0,
            dy: 1.0,
            nx: 3,
            ny: 2,
        };
        let (lats, lons) = inverse_mesh(&Identity, raster).unwrap();
        assert_eq!(lats.dim(), (2, 3));
        assert_eq!(lons[[1, 2]], 14.0);
        assert_eq!(lats[[1, 2]], -4.0);
        assert_eq!(lats[[0, 0]], -5.0);
    }
}
