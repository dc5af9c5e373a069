//! Oblique azimuthal projections on a sphere: equidistant and equal-area.

use crate::engine::{adjlon, azimuthal_inverse, Projection, OFF_MAP};
use crate::error::Result;
use crate::params::ProjParams;

/// Centre point shared by the azimuthal families.
#[derive(Debug, Clone, Copy)]
struct Centre {
    lon0: f64,
    lat0: f64,
    earth_radius: f64,
}

impl Centre {
    fn from_params(params: &ProjParams) -> Result<Self> {
        Ok(Self {
            lon0: params.get_or("lon_0", 0.0).to_radians(),
            lat0: params.get_or("lat_0", 0.0).to_radians(),
            earth_radius: params.a()?,
        })
    }

    /// Returns (cos c, cos(lat) sin(dlon), cos(lat0) sin(lat) - sin(lat0) cos(lat) cos(dlon)).
    fn terms(&self, lon: f64, lat: f64) -> (f64, f64, f64) {
        let lat = lat.to_radians();
        let dlon = adjlon(lon.to_radians() - self.lon0);
        let (sin_lat, cos_lat) = lat.sin_cos();
        let (sin_lat0, cos_lat0) = self.lat0.sin_cos();
        let cos_c = sin_lat0 * sin_lat + cos_lat0 * cos_lat * dlon.cos();
        (
            cos_c.clamp(-1.0, 1.0),
            cos_lat * dlon.sin(),
            cos_lat0 * sin_lat - sin_lat0 * cos_lat * dlon.cos(),
        )
    }

    fn to_degrees(&self, (lon, lat): (f64, f64)) -> (f64, f64) {
        (lon.to_degrees(), lat.to_degrees())
    }
}

/// Azimuthal equidistant projection.
#[derive(Debug, Clone)]
pub struct AzimuthalEquidistant {
    centre: Centre,
}

impl AzimuthalEquidistant {
    pub fn from_params(params: &ProjParams) -> Result<Self> {
        Ok(Self {
            centre: Centre::from_params(params)?,
        })
    }
}

impl Projection for AzimuthalEquidistant {
    fn name(&self) -> &'static str {
        "aeqd"
    }

    fn forward(&self, lon: f64, lat: f64) -> (f64, f64) {
        let (cos_c, ex, ey) = self.centre.terms(lon, lat);
        let c = cos_c.acos();
        if (c - std::f64::consts::PI).abs() < 1e-12 {
            return OFF_MAP;
        }
        let k = if c.abs() < 1e-12 { 1.0 } else { c / c.sin() };
        let r = self.centre.earth_radius;
        (r * k * ex, r * k * ey)
    }

    fn inverse(&self, x: f64, y: f64) -> (f64, f64) {
        let rho = x.hypot(y);
        let c = rho / self.centre.earth_radius;
        if c > std::f64::consts::PI {
            return OFF_MAP;
        }
        self.centre
            .to_degrees(azimuthal_inverse(x, y, rho, c, self.centre.lon0, self.centre.lat0))
    }
}

/// Lambert azimuthal equal-area projection.
#[derive(Debug, Clone)]
pub struct AzimuthalEqualArea {
    centre: Centre,
}

impl AzimuthalEqualArea {
    pub fn from_params(params: &ProjParams) -> Result<Self> {
        Ok(Self {
            centre: Centre::from_params(params)?,
        })
    }
}

impl Projection for AzimuthalEqualArea {
    fn name(&self) -> &'static str {
        "laea"
    }

    fn forward(&self, lon: f64, lat: f64) -> (f64, f64) {
        let (cos_c, ex, ey) = self.centre.terms(lon, lat);
        if 1.0 + cos_c < 1e-12 {
            return OFF_MAP;
        }
        let k = (2.0 / (1.0 + cos_c)).sqrt();
        let r = self.centre.earth_radius;
        (r * k * ex, r * k * ey)
    }

    fn inverse(&self, x: f64, y: f64) -> (f64, f64) {
        let rho = x.hypot(y);
        let ratio = rho / (2.0 * self.centre.earth_radius);
        if ratio > 1.0 {
            return OFF_MAP;
        }
        let c = 2.0 * ratio.asin();
        self.centre
            .to_degrees(azimuthal_inverse(x, y, rho, c, self.centre.lon0, self.centre.lat0))
    }
}
