//! Polar stereographic projection (spherical).
//!
//! The projection plane touches the sphere at one pole; `lat_ts` is the
//! latitude at which the scale is true (GRIB2 LaD, 60° in GRIB1).

use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

use crate::engine::{adjlon, Projection, OFF_MAP};
use crate::error::{ProjectionError, Result};
use crate::params::ProjParams;

#[derive(Debug, Clone)]
pub struct PolarStereographic {
    /// +1 for a north-pole projection, -1 for south.
    hemisphere: f64,
    /// Central meridian (radians)
    lon0: f64,
    /// `R * (1 + sin(lat_ts))`, in the projection's own hemisphere.
    scale: f64,
}

impl PolarStereographic {
    pub fn new(lon0_deg: f64, lat_ts_deg: f64, south_pole: bool, earth_radius: f64) -> Self {
        let hemisphere = if south_pole { -1.0 } else { 1.0 };
        let lat_ts = hemisphere * lat_ts_deg.to_radians();
        Self {
            hemisphere,
            lon0: lon0_deg.to_radians(),
            scale: earth_radius * (1.0 + lat_ts.sin()),
        }
    }

    pub fn from_params(params: &ProjParams) -> Result<Self> {
        let lat0 = params.get_or("lat_0", 90.0);
        if (lat0.abs() - 90.0).abs() > 1e-9 {
            return Err(ProjectionError::invalid(
                "lat_0",
                format!("polar stereographic needs lat_0 = +/-90, got {}", lat0),
            ));
        }
        let south = lat0 < 0.0;
        let lat_ts = params.get_or("lat_ts", lat0);
        Ok(Self::new(params.get_or("lon_0", 0.0), lat_ts, south, params.a()?))
    }
}

impl Projection for PolarStereographic {
    fn name(&self) -> &'static str {
        "stere"
    }

    fn forward(&self, lon: f64, lat: f64) -> (f64, f64) {
        let lat = self.hemisphere * lat.to_radians();
        if (lat + FRAC_PI_2).abs() < 1e-12 {
            // Opposite pole projects to infinity.
            return OFF_MAP;
        }
        let dlon = adjlon(lon.to_radians() - self.lon0);
        let rho = self.scale * (FRAC_PI_4 - lat / 2.0).tan();
        (rho * dlon.sin(), -self.hemisphere * rho * dlon.cos())
    }

    fn inverse(&self, x: f64, y: f64) -> (f64, f64) {
        let rho = x.hypot(y);
        let lat = FRAC_PI_2 - 2.0 * (rho / self.scale).atan();
        let lon = if rho == 0.0 {
            self.lon0
        } else {
            adjlon(self.lon0 + x.atan2(-self.hemisphere * y))
        };
        (lon.to_degrees(), (self.hemisphere * lat).to_degrees())
    }
}
