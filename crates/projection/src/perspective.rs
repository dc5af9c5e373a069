//! General vertical near-side perspective projection (spherical).
//!
//! The view from a point `h` metres above the sphere over (`lon_0`, `lat_0`).
//! Only the visible hemisphere cap maps; everything beyond the horizon comes
//! back as infinities.

use crate::engine::{adjlon, azimuthal_inverse, Projection, OFF_MAP};
use crate::error::{ProjectionError, Result};
use crate::params::ProjParams;

#[derive(Debug, Clone)]
pub struct NearSidePerspective {
    lon0: f64,
    lat0: f64,
    earth_radius: f64,
    /// Distance of the perspective point from the centre, in earth radii.
    p: f64,
}

impl NearSidePerspective {
    pub fn new(lon0_deg: f64, lat0_deg: f64, height: f64, earth_radius: f64) -> Result<Self> {
        if !(height > 0.0) {
            return Err(ProjectionError::invalid(
                "h",
                format!("perspective height must be positive, got {}", height),
            ));
        }
        Ok(Self {
            lon0: lon0_deg.to_radians(),
            lat0: lat0_deg.to_radians(),
            earth_radius,
            p: 1.0 + height / earth_radius,
        })
    }

    pub fn from_params(params: &ProjParams) -> Result<Self> {
        if !params.is_spherical() {
            return Err(ProjectionError::invalid("b", "nsper requires a spherical earth"));
        }
        Self::new(
            params.get_or("lon_0", 0.0),
            params.get_or("lat_0", 0.0),
            params.require("h")?,
            params.a()?,
        )
    }
}

impl Projection for NearSidePerspective {
    fn name(&self) -> &'static str {
        "nsper"
    }

    fn forward(&self, lon: f64, lat: f64) -> (f64, f64) {
        let lat = lat.to_radians();
        let dlon = adjlon(lon.to_radians() - self.lon0);
        let (sin_lat, cos_lat) = lat.sin_cos();
        let (sin_lat0, cos_lat0) = self.lat0.sin_cos();
        let cos_c = sin_lat0 * sin_lat + cos_lat0 * cos_lat * dlon.cos();
        if cos_c < 1.0 / self.p {
            return OFF_MAP;
        }
        let k = (self.p - 1.0) / (self.p - cos_c);
        let r = self.earth_radius;
        (
            r * k * cos_lat * dlon.sin(),
            r * k * (cos_lat0 * sin_lat - sin_lat0 * cos_lat * dlon.cos()),
        )
    }

    fn inverse(&self, x: f64, y: f64) -> (f64, f64) {
        let rho = x.hypot(y);
        if rho == 0.0 {
            return (self.lon0.to_degrees(), self.lat0.to_degrees());
        }
        let r = self.earth_radius;
        let p = self.p;
        let radicand = 1.0 - rho * rho * (p + 1.0) / (r * r * (p - 1.0));
        if radicand < 0.0 {
            return OFF_MAP;
        }
        let sin_c = (p - radicand.sqrt()) / (r * (p - 1.0) / rho + rho / (r * (p - 1.0)));
        let c = sin_c.clamp(-1.0, 1.0).asin();
        let (lon, lat) = azimuthal_inverse(x, y, rho, c, self.lon0, self.lat0);
        (lon.to_degrees(), lat.to_degrees())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requires_sphere() {
        let params = ProjParams::new("nsper")
            .with("a", 6378137.0)
            .with("b", 6356752.314)
            .with("h", 35_785_831.0);
        assert!(NearSidePerspective::from_params(&params).is_err());
    }

    #[test]
    fn test_roundtrip() {
        let proj = NearSidePerspective::new(10.0, 30.0, 35_785_831.0, 6371229.0).unwrap();
        for (lon, lat) in [(10.0, 30.0), (-20.0, 10.0), (50.0, 60.0)] {
            let (x, y) = proj.forward(lon, lat);
            let (lon2, lat2) = proj.inverse(x, y);
            assert!((lon - lon2).abs() < 1e-7, "lon {} vs {}", lon, lon2);
            assert!((lat - lat2).abs() < 1e-7, "lat {} vs {}", lat, lat2);
        }
    }

    #[test]
    fn test_far_side_hidden() {
        let proj = NearSidePerspective::new(0.0, 45.0, 35_785_831.0, 6371229.0).unwrap();
        assert!(proj.forward(180.0, -45.0).0.is_infinite());
        assert!(proj.inverse(1e8, 0.0).1.is_infinite());
    }
}
