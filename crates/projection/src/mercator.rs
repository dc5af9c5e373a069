//! Mercator projection (spherical), true scale at `lat_ts`.

use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

use crate::engine::{adjlon, Projection, OFF_MAP};
use crate::error::Result;
use crate::params::ProjParams;

#[derive(Debug, Clone)]
pub struct Mercator {
    lon0: f64,
    /// `R * cos(lat_ts)`
    scale: f64,
}

impl Mercator {
    pub fn new(lon0_deg: f64, lat_ts_deg: f64, earth_radius: f64) -> Self {
        Self {
            lon0: lon0_deg.to_radians(),
            scale: earth_radius * lat_ts_deg.to_radians().cos(),
        }
    }

    pub fn from_params(params: &ProjParams) -> Result<Self> {
        Ok(Self::new(
            params.get_or("lon_0", 0.0),
            params.get_or("lat_ts", 0.0),
            params.a()?,
        ))
    }
}

impl Projection for Mercator {
    fn name(&self) -> &'static str {
        "merc"
    }

    fn forward(&self, lon: f64, lat: f64) -> (f64, f64) {
        let lat = lat.to_radians();
        if (lat.abs() - FRAC_PI_2).abs() < 1e-12 {
            return OFF_MAP;
        }
        let dlon = adjlon(lon.to_radians() - self.lon0);
        (self.scale * dlon, self.scale * (FRAC_PI_4 + lat / 2.0).tan().ln())
    }

    fn inverse(&self, x: f64, y: f64) -> (f64, f64) {
        let lat = FRAC_PI_2 - 2.0 * (-y / self.scale).exp().atan();
        let lon = self.lon0 + x / self.scale;
        (lon.to_degrees(), lat.to_degrees())
    }
}
