//! Regular latitude/longitude and regular gaussian grids.

use super::{mesh, GeoGrid, GridContext, GridFamily};
use crate::error::Result;

/// `regular_ll` and `regular_gg`: the outer product of the distinct
/// latitudes and longitudes the decoder computes.
pub(super) struct RegularGrid;

impl GridFamily for RegularGrid {
    fn name(&self) -> &'static str {
        "regular"
    }

    fn required_keys(&self) -> &'static [&'static str] {
        &["distinctLatitudes", "distinctLongitudes"]
    }

    fn synthesize(&self, ctx: &GridContext<'_>) -> Result<GeoGrid> {
        let lats = ctx.reader.doubles("distinctLatitudes")?;
        let lons = ctx.reader.doubles("distinctLongitudes")?;
        let (lats, lons) = mesh(&lats, &lons);
        Ok(GeoGrid {
            lats,
            lons,
            projparams: ctx.params("cyl"),
        })
    }
}
