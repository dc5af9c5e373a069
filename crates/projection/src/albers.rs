//! Albers equal-area conic projection (spherical).

use crate::engine::{adjlon, Projection};
use crate::error::{ProjectionError, Result};
use crate::params::ProjParams;

#[derive(Debug, Clone)]
pub struct AlbersEqualArea {
    lon0: f64,
    earth_radius: f64,
    n: f64,
    c: f64,
    rho0: f64,
}

impl AlbersEqualArea {
    pub fn new(lon0_deg: f64, lat0_deg: f64, lat1_deg: f64, lat2_deg: f64, earth_radius: f64) -> Result<Self> {
        let lat0 = lat0_deg.to_radians();
        let lat1 = lat1_deg.to_radians();
        let lat2 = lat2_deg.to_radians();

        let n = (lat1.sin() + lat2.sin()) / 2.0;
        if n.abs() < 1e-10 {
            return Err(ProjectionError::invalid(
                "lat_1",
                "standard parallels symmetric about the equator",
            ));
        }
        let c = lat1.cos().powi(2) + 2.0 * n * lat1.sin();
        let rho0 = earth_radius * (c - 2.0 * n * lat0.sin()).max(0.0).sqrt() / n;

        Ok(Self {
            lon0: lon0_deg.to_radians(),
            earth_radius,
            n,
            c,
            rho0,
        })
    }

    pub fn from_params(params: &ProjParams) -> Result<Self> {
        let lat1 = params.require("lat_1")?;
        Self::new(
            params.get_or("lon_0", 0.0),
            params.get_or("lat_0", 0.0),
            lat1,
            params.get_or("lat_2", lat1),
            params.a()?,
        )
    }
}

impl Projection for AlbersEqualArea {
    fn name(&self) -> &'static str {
        "aea"
    }

    fn forward(&self, lon: f64, lat: f64) -> (f64, f64) {
        let lat = lat.to_radians();
        let dlon = adjlon(lon.to_radians() - self.lon0);
        let rho = self.earth_radius * (self.c - 2.0 * self.n * lat.sin()).max(0.0).sqrt() / self.n;
        let theta = self.n * dlon;
        (rho * theta.sin(), self.rho0 - rho * theta.cos())
    }

    fn inverse(&self, x: f64, y: f64) -> (f64, f64) {
        let sign = self.n.signum();
        let dy = self.rho0 - y;
        let rho = x.hypot(dy);
        let theta = (sign * x).atan2(sign * dy);
        let q = rho * self.n / self.earth_radius;
        let lat = ((self.c - q * q) / (2.0 * self.n)).clamp(-1.0, 1.0).asin();
        let lon = adjlon(self.lon0 + theta / self.n);
        (lon.to_degrees(), lat.to_degrees())
    }
}
