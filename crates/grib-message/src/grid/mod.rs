//! Grid geolocation.
//!
//! Every supported `gridType` maps to a [`GridFamily`] strategy. A strategy
//! names the keys it cannot do without and synthesizes the per-point
//! latitude/longitude arrays, delegating map math to a
//! [`ProjectionEngine`]. Arrays are shaped `(ny, nx)` in degrees, rows
//! running south to north like the normalized `values` field.

pub mod earth;
mod projected;
mod reduced;
mod regular;
mod space_view;

use ndarray::{Array1, Array2};
use projection::{ProjParams, Projection, ProjectionEngine};
use tracing::debug;

use crate::accessor::KeyReader;
use crate::config::MessageOptions;
use crate::error::{GribError, Result};

pub use earth::EarthShape;

/// Per-point coordinates of a grid plus the projection that produced them.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoGrid {
    pub lats: Array2<f64>,
    pub lons: Array2<f64>,
    pub projparams: ProjParams,
}

impl GeoGrid {
    /// `(ny, nx)`
    pub fn shape(&self) -> (usize, usize) {
        self.lats.dim()
    }
}

/// Everything a strategy needs to synthesize coordinates.
pub struct GridContext<'a> {
    pub reader: &'a dyn KeyReader,
    pub grid_type: &'a str,
    pub earth: EarthShape,
    pub engine: &'a dyn ProjectionEngine,
    pub options: &'a MessageOptions,
}

impl GridContext<'_> {
    /// A projection record carrying the earth axes.
    pub fn params(&self, proj: &str) -> ProjParams {
        let mut params = ProjParams::new(proj);
        self.earth.apply(&mut params);
        params
    }

    pub fn build(&self, params: &ProjParams) -> Result<Box<dyn Projection>> {
        Ok(self.engine.build(params)?)
    }
}

/// Coordinate synthesis for one family of grid types.
pub trait GridFamily: Sync {
    fn name(&self) -> &'static str;

    /// Keys that must be present before synthesis is attempted.
    fn required_keys(&self) -> &'static [&'static str];

    fn synthesize(&self, ctx: &GridContext<'_>) -> Result<GeoGrid>;
}

/// Grid types with a registered strategy.
pub const SUPPORTED_GRID_TYPES: &[&str] = &[
    "regular_gg",
    "regular_ll",
    "reduced_gg",
    "reduced_ll",
    "polar_stereographic",
    "lambert",
    "albers",
    "mercator",
    "equatorial_azimuthal_equidistant",
    "lambert_azimuthal_equal_area",
    "space_view",
];

/// Strategy registered for `grid_type`.
pub fn family_for(grid_type: &str) -> Option<&'static dyn GridFamily> {
    let family: &'static dyn GridFamily = match grid_type {
        "regular_gg" | "regular_ll" => &regular::RegularGrid,
        "reduced_gg" => &reduced::ReducedGaussian,
        "reduced_ll" => &reduced::ReducedLatLon,
        "polar_stereographic" => &projected::PolarStereographicGrid,
        "lambert" => &projected::LambertGrid,
        "albers" => &projected::AlbersGrid,
        "mercator" => &projected::MercatorGrid,
        "equatorial_azimuthal_equidistant" => &projected::AZIMUTHAL_EQUIDISTANT,
        "lambert_azimuthal_equal_area" => &projected::AZIMUTHAL_EQUAL_AREA,
        "space_view" => &space_view::SpaceViewGrid,
        _ => return None,
    };
    Some(family)
}

/// Compute latitudes, longitudes and projection parameters for a message.
pub fn resolve(
    reader: &dyn KeyReader,
    engine: &dyn ProjectionEngine,
    options: &MessageOptions,
) -> Result<GeoGrid> {
    let grid_type = reader.text("gridType")?;
    let family =
        family_for(&grid_type).ok_or_else(|| GribError::UnsupportedGrid(grid_type.clone()))?;

    if let Some(key) = family.required_keys().iter().find(|key| !reader.has(key)) {
        return Err(GribError::KeyNotFound(key.to_string()));
    }

    let earth = EarthShape::from_reader(reader)?;
    debug!(
        grid_type = %grid_type,
        family = family.name(),
        a = earth.a,
        b = earth.b,
        "Resolving grid geolocation"
    );

    let ctx = GridContext {
        reader,
        grid_type: &grid_type,
        earth,
        engine,
        options,
    };
    let grid = family.synthesize(&ctx)?;

    debug!(
        ny = grid.lats.nrows(),
        nx = grid.lats.ncols(),
        proj = %grid.projparams,
        "Resolved grid"
    );
    Ok(grid)
}

/// `n` evenly spaced values from `first` to `last` inclusive.
pub(crate) fn linspace(first: f64, last: f64, n: usize) -> Array1<f64> {
    if n == 1 {
        return Array1::from_elem(1, first);
    }
    let step = (last - first) / (n as f64 - 1.0);
    let mut out = Array1::from_shape_fn(n, |k| first + k as f64 * step);
    if let Some(end) = out.last_mut() {
        *end = last;
    }
    out
}

/// Outer product of a latitude and a longitude vector, shaped `(ny, nx)`.
pub(crate) fn mesh(lats: &Array1<f64>, lons: &Array1<f64>) -> (Array2<f64>, Array2<f64>) {
    let shape = (lats.len(), lons.len());
    (
        Array2::from_shape_fn(shape, |(j, _)| lats[j]),
        Array2::from_shape_fn(shape, |(_, i)| lons[i]),
    )
}
