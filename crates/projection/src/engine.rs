//! Projection traits and the built-in engine.

use num_traits::{Float, FloatConst};

use crate::albers::AlbersEqualArea;
use crate::azimuthal::{AzimuthalEqualArea, AzimuthalEquidistant};
use crate::error::{ProjectionError, Result};
use crate::geostationary::Geostationary;
use crate::lambert::LambertConformal;
use crate::mercator::Mercator;
use crate::params::ProjParams;
use crate::perspective::NearSidePerspective;
use crate::stereographic::PolarStereographic;

/// A constructed map projection.
///
/// Longitudes and latitudes are in degrees, projected coordinates in metres.
/// Points that cannot be mapped (behind the horizon, outside the visible disk)
/// come back as infinities in both coordinates.
pub trait Projection: Send + Sync {
    /// Family name as used in [`ProjParams::proj`].
    fn name(&self) -> &'static str;

    /// Map (lon, lat) to (x, y).
    fn forward(&self, lon: f64, lat: f64) -> (f64, f64);

    /// Map (x, y) back to (lon, lat).
    fn inverse(&self, x: f64, y: f64) -> (f64, f64);

    /// Forward-map parallel coordinate slices.
    fn forward_batch(&self, lons: &[f64], lats: &[f64]) -> (Vec<f64>, Vec<f64>) {
        lons.iter()
            .zip(lats)
            .map(|(&lon, &lat)| self.forward(lon, lat))
            .unzip()
    }

    /// Inverse-map parallel coordinate slices.
    fn inverse_batch(&self, xs: &[f64], ys: &[f64]) -> (Vec<f64>, Vec<f64>) {
        xs.iter()
            .zip(ys)
            .map(|(&x, &y)| self.inverse(x, y))
            .unzip()
    }
}

/// Builds projections from parameter records.
pub trait ProjectionEngine {
    fn build(&self, params: &ProjParams) -> Result<Box<dyn Projection>>;
}

/// Engine backed by the projections implemented in this crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinEngine;

impl ProjectionEngine for BuiltinEngine {
    fn build(&self, params: &ProjParams) -> Result<Box<dyn Projection>> {
        let projection: Box<dyn Projection> = match params.proj.as_str() {
            "stere" => Box::new(PolarStereographic::from_params(params)?),
            "lcc" => Box::new(LambertConformal::from_params(params)?),
            "aea" => Box::new(AlbersEqualArea::from_params(params)?),
            "merc" => Box::new(Mercator::from_params(params)?),
            "aeqd" => Box::new(AzimuthalEquidistant::from_params(params)?),
            "laea" => Box::new(AzimuthalEqualArea::from_params(params)?),
            "geos" => Box::new(Geostationary::from_params(params)?),
            "nsper" => Box::new(NearSidePerspective::from_params(params)?),
            other => return Err(ProjectionError::UnknownProjection(other.to_string())),
        };
        Ok(projection)
    }
}

/// Marker returned for unmappable points.
pub(crate) const OFF_MAP: (f64, f64) = (f64::INFINITY, f64::INFINITY);

/// Normalize a longitude difference in radians to [-π, π].
pub(crate) fn adjlon<T: Float + FloatConst>(mut lon: T) -> T {
    let two_pi = T::PI() + T::PI();
    while lon > T::PI() {
        lon = lon - two_pi;
    }
    while lon < -T::PI() {
        lon = lon + two_pi;
    }
    lon
}

/// Inverse of the shared oblique-azimuthal parameterisation (Snyder 20-14, 20-15).
///
/// Given the polar distance `rho` on the plane and the angular distance `c`
/// from the centre, returns (lon, lat) in radians.
pub(crate) fn azimuthal_inverse(
    x: f64,
    y: f64,
    rho: f64,
    c: f64,
    lon0: f64,
    lat0: f64,
) -> (f64, f64) {
    if rho == 0.0 {
        return (lon0, lat0);
    }
    let (sin_c, cos_c) = c.sin_cos();
    let (sin_lat0, cos_lat0) = lat0.sin_cos();
    let lat = (cos_c * sin_lat0 + y * sin_c * cos_lat0 / rho).clamp(-1.0, 1.0).asin();
    let lon = lon0 + (x * sin_c).atan2(rho * cos_lat0 * cos_c - y * sin_lat0 * sin_c);
    (adjlon(lon), lat)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_adjlon_wraps() {
        assert!((adjlon(3.0 * PI / 2.0) + PI / 2.0).abs() < 1e-12);
        assert!((adjlon(-3.0 * PI / 2.0) - PI / 2.0).abs() < 1e-12);
        assert_eq!(adjlon(0.5_f64), 0.5);
    }

    #[test]
    fn test_unknown_projection() {
        let err = BuiltinEngine
            .build(&ProjParams::new("robin").with("a", 6371229.0))
            .err()
            .unwrap();
        assert_eq!(err, ProjectionError::UnknownProjection("robin".to_string()));
    }

    #[test]
    fn test_builds_every_family() {
        let base = ProjParams::new("")
            .with("a", 6371229.0)
            .with("b", 6371229.0)
            .with("lon_0", 10.0)
            .with("lat_0", 45.0)
            .with("lat_1", 30.0)
            .with("lat_2", 60.0)
            .with("lat_ts", 60.0)
            .with("h", 35_785_831.0);
        for family in ["stere", "lcc", "aea", "merc", "aeqd", "laea", "geos", "nsper"] {
            let mut params = base.clone();
            params.proj = family.to_string();
            if family == "stere" {
                params.set("lat_0", 90.0);
            }
            let projection = BuiltinEngine.build(&params).unwrap();
            assert_eq!(projection.name(), family);
        }
    }

    #[test]
    fn test_batch_matches_single() {
        let params = ProjParams::new("merc").with("a", 6371229.0).with("lat_ts", 0.0);
        let projection = BuiltinEngine.build(&params).unwrap();
        let (xs, ys) = projection.forward_batch(&[0.0, 10.0], &[0.0, 20.0]);
        assert_eq!((xs[1], ys[1]), projection.forward(10.0, 20.0));
        let (lons, lats) = projection.inverse_batch(&xs, &ys);
        assert!((lons[1] - 10.0).abs() < 1e-9);
        assert!((lats[1] - 20.0).abs() < 1e-9);
    }
}
