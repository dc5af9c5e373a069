//! Lambert Conformal Conic projection.
//!
//! This projection is commonly used for regional weather grids such as HRRR.
//! It maps a cone tangent or secant to the Earth's surface onto a flat plane.
//!
//! The projection parameters include:
//! - Central meridian (`lon_0`, LoV in GRIB2)
//! - Latitude of origin (`lat_0`, LaD in GRIB2)
//! - Standard parallel(s): `lat_1` and `lat_2` (equal for a tangent cone)
//!
//! Spherical form, radius `a`.

use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

use crate::engine::{adjlon, Projection};
use crate::error::{ProjectionError, Result};
use crate::params::ProjParams;

/// Lambert Conformal Conic projection parameters.
#[derive(Debug, Clone)]
pub struct LambertConformal {
    /// Central meridian in radians
    pub lon0: f64,
    /// Latitude of origin in radians
    pub lat0: f64,
    /// First standard parallel in radians
    pub latin1: f64,
    /// Second standard parallel in radians
    pub latin2: f64,
    /// Earth radius (meters)
    pub earth_radius: f64,
    /// Cone constant (n)
    n: f64,
    /// F constant
    f: f64,
    /// Rho at the latitude of origin
    rho0: f64,
}

impl LambertConformal {
    /// Create a projection from angles in degrees.
    pub fn new(lon0_deg: f64, lat0_deg: f64, latin1_deg: f64, latin2_deg: f64, earth_radius: f64) -> Result<Self> {
        let lon0 = lon0_deg.to_radians();
        let lat0 = lat0_deg.to_radians();
        let latin1 = latin1_deg.to_radians();
        let latin2 = latin2_deg.to_radians();

        // Compute cone constant n
        let n = if (latin1 - latin2).abs() < 1e-10 {
            // Tangent cone (single standard parallel)
            latin1.sin()
        } else {
            // Secant cone (two standard parallels)
            let ln_ratio = (latin1.cos() / latin2.cos()).ln();
            let tan_ratio = ((FRAC_PI_4 + latin2 / 2.0).tan() / (FRAC_PI_4 + latin1 / 2.0).tan()).ln();
            ln_ratio / tan_ratio
        };
        if n.abs() < 1e-10 || !n.is_finite() {
            return Err(ProjectionError::invalid(
                "lat_1",
                "standard parallels give a degenerate cone",
            ));
        }

        let f = (latin1.cos() * (FRAC_PI_4 + latin1 / 2.0).tan().powf(n)) / n;
        let rho0 = earth_radius * f / (FRAC_PI_4 + lat0 / 2.0).tan().powf(n);

        Ok(Self {
            lon0,
            lat0,
            latin1,
            latin2,
            earth_radius,
            n,
            f,
            rho0,
        })
    }

    pub fn from_params(params: &ProjParams) -> Result<Self> {
        let lat1 = params.require("lat_1")?;
        Self::new(
            params.get_or("lon_0", 0.0),
            params.get_or("lat_0", lat1),
            lat1,
            params.get_or("lat_2", lat1),
            params.a()?,
        )
    }

    /// Cone constant.
    pub fn cone_constant(&self) -> f64 {
        self.n
    }

    fn rho(&self, lat: f64) -> f64 {
        if (lat.abs() - FRAC_PI_2).abs() < 1e-12 && lat * self.n < 0.0 {
            return f64::INFINITY;
        }
        self.earth_radius * self.f / (FRAC_PI_4 + lat / 2.0).tan().powf(self.n)
    }
}

impl Projection for LambertConformal {
    fn name(&self) -> &'static str {
        "lcc"
    }

    fn forward(&self, lon_deg: f64, lat_deg: f64) -> (f64, f64) {
        let lat = lat_deg.to_radians();
        let dlon = adjlon(lon_deg.to_radians() - self.lon0);

        let rho = self.rho(lat);
        let theta = self.n * dlon;

        let x = rho * theta.sin();
        let y = self.rho0 - rho * theta.cos();
        (x, y)
    }

    fn inverse(&self, x: f64, y: f64) -> (f64, f64) {
        let sign = self.n.signum();
        let dy = self.rho0 - y;
        let rho = sign * x.hypot(dy);

        if rho == 0.0 {
            return (self.lon0.to_degrees(), sign * 90.0);
        }

        let theta = (sign * x).atan2(sign * dy);
        let lat = 2.0 * (self.earth_radius * self.f / rho).powf(1.0 / self.n).atan() - FRAC_PI_2;
        let lon = adjlon(self.lon0 + theta / self.n);

        (lon.to_degrees(), lat.to_degrees())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hrrr() -> LambertConformal {
        LambertConformal::new(-97.5, 38.5, 38.5, 38.5, 6371229.0).unwrap()
    }

    #[test]
    fn test_origin_maps_to_zero() {
        let proj = hrrr();
        let (x, y) = proj.forward(-97.5, 38.5);
        assert!(x.abs() < 1e-6, "x should be ~0, got {}", x);
        assert!(y.abs() < 1e-6, "y should be ~0, got {}", y);
    }

    #[test]
    fn test_roundtrip_hrrr_corner() {
        let proj = hrrr();

        let (x, y) = proj.forward(-122.719528, 21.138123);
        let (lon, lat) = proj.inverse(x, y);

        assert!((lon + 122.719528).abs() < 1e-8, "lon roundtrip failed: {}", lon);
        assert!((lat - 21.138123).abs() < 1e-8, "lat roundtrip failed: {}", lat);
    }

    #[test]
    fn test_secant_cone_roundtrip() {
        let proj = LambertConformal::new(-100.0, 40.0, 33.0, 45.0, 6371229.0).unwrap();
        assert!(proj.cone_constant() > 0.0 && proj.cone_constant() < 1.0);

        for (lon, lat) in [(-120.0, 25.0), (-80.0, 50.0), (-100.0, 40.0)] {
            let (x, y) = proj.forward(lon, lat);
            let (lon2, lat2) = proj.inverse(x, y);
            assert!((lon - lon2).abs() < 1e-8);
            assert!((lat - lat2).abs() < 1e-8);
        }
    }

    #[test]
    fn test_southern_cone() {
        let proj = LambertConformal::new(140.0, -30.0, -30.0, -30.0, 6371229.0).unwrap();
        let (x, y) = proj.forward(150.0, -40.0);
        let (lon, lat) = proj.inverse(x, y);
        assert!((lon - 150.0).abs() < 1e-8);
        assert!((lat + 40.0).abs() < 1e-8);
    }

    #[test]
    fn test_equator_parallel_is_degenerate() {
        assert!(LambertConformal::new(0.0, 0.0, 0.0, 0.0, 6371229.0).is_err());
    }
}
