//! Geostationary satellite projection.
//!
//! The satellite views Earth from a fixed position above the equator and
//! projected coordinates are scan angles (radians from nadir) multiplied by
//! the satellite height `h` above the surface, which is how GRIB space-view
//! grids and Meteosat/GOES products express them.
//!
//! Both sweep conventions are supported: `sweep = y` (the default, Meteosat)
//! and `sweep = x` (GOES-R), selected with a non-zero `sweep_x` parameter.
//!
//! Reference: GOES-R Product Definition and Users' Guide (PUG) Volume 4

use nalgebra::Vector3;

use crate::engine::{adjlon, Projection, OFF_MAP};
use crate::error::{ProjectionError, Result};
use crate::params::ProjParams;

/// Geostationary projection parameters.
#[derive(Debug, Clone)]
pub struct Geostationary {
    /// Perspective point height above Earth surface (meters)
    pub perspective_point_height: f64,
    /// Semi-major axis of Earth ellipsoid (meters)
    pub req: f64,
    /// Semi-minor axis of Earth ellipsoid (meters)
    pub rpol: f64,
    /// Longitude of satellite nadir point (radians)
    pub lambda_0: f64,
    /// Sweep angle axis (true for GOES-R "x", false for Meteosat/Himawari "y")
    pub sweep_x: bool,
}

impl Geostationary {
    pub fn new(
        perspective_point_height: f64,
        semi_major_axis: f64,
        semi_minor_axis: f64,
        longitude_origin_deg: f64,
        sweep_x: bool,
    ) -> Result<Self> {
        if !(perspective_point_height > 0.0) {
            return Err(ProjectionError::invalid(
                "h",
                format!("satellite height must be positive, got {}", perspective_point_height),
            ));
        }
        Ok(Self {
            perspective_point_height,
            req: semi_major_axis,
            rpol: semi_minor_axis,
            lambda_0: longitude_origin_deg.to_radians(),
            sweep_x,
        })
    }

    pub fn from_params(params: &ProjParams) -> Result<Self> {
        Self::new(
            params.require("h")?,
            params.a()?,
            params.b()?,
            params.get_or("lon_0", 0.0),
            params.get_or("sweep_x", 0.0) != 0.0,
        )
    }

    /// Satellite distance from the Earth's centre in units of `req`.
    fn radius_g(&self) -> f64 {
        1.0 + self.perspective_point_height / self.req
    }

    /// Convert geographic coordinates (degrees) to scan angles (radians).
    ///
    /// Returns None if the point is not visible from the satellite.
    pub fn geo_to_scan(&self, lon_deg: f64, lat_deg: f64) -> Option<(f64, f64)> {
        let radius_p = self.rpol / self.req;
        let radius_p2 = radius_p * radius_p;
        let radius_g = self.radius_g();

        // Geocentric latitude (accounting for Earth's oblateness)
        let phi_c = (radius_p2 * lat_deg.to_radians().tan()).atan();
        let dlon = adjlon(lon_deg.to_radians() - self.lambda_0);

        // Distance from Earth centre to the surface point, in units of req
        let r = radius_p / (radius_p * phi_c.cos()).hypot(phi_c.sin());
        let v = Vector3::new(
            r * dlon.cos() * phi_c.cos(),
            r * dlon.sin() * phi_c.cos(),
            r * phi_c.sin(),
        );

        // Point must face the satellite
        if (radius_g - v.x) * v.x - v.y * v.y - v.z * v.z / radius_p2 < 0.0 {
            return None;
        }

        let tmp = radius_g - v.x;
        let (x, y) = if self.sweep_x {
            ((v.y / v.z.hypot(tmp)).atan(), (v.z / tmp).atan())
        } else {
            ((v.y / tmp).atan(), (v.z / v.y.hypot(tmp)).atan())
        };
        Some((x, y))
    }

    /// Convert scan angles (radians) to geographic coordinates (degrees).
    ///
    /// Returns None if the scan angle points to space (off Earth).
    pub fn scan_to_geo(&self, x_rad: f64, y_rad: f64) -> Option<(f64, f64)> {
        let radius_p = self.rpol / self.req;
        let radius_g = self.radius_g();

        let mut v = if self.sweep_x {
            let vz = y_rad.tan();
            Vector3::new(-1.0, x_rad.tan() * 1f64.hypot(vz), vz)
        } else {
            let vy = x_rad.tan();
            Vector3::new(-1.0, vy, y_rad.tan() * 1f64.hypot(vy))
        };

        // Quadratic coefficients for finding distance to Earth surface
        let scaled_z = v.z / radius_p;
        let a = v.y * v.y + scaled_z * scaled_z + v.x * v.x;
        let b = 2.0 * radius_g * v.x;
        let c = radius_g * radius_g - 1.0;
        let discriminant = b * b - 4.0 * a * c;
        if discriminant < 0.0 {
            return None; // Scan angle points to space
        }

        let k = (-b - discriminant.sqrt()) / (2.0 * a);
        v.x = radius_g + k * v.x;
        v.y *= k;
        v.z *= k;

        let lon = v.y.atan2(v.x);
        let lat = (v.z * lon.cos() / v.x).atan();
        let lat = (lat.tan() / (radius_p * radius_p)).atan();

        Some((adjlon(lon + self.lambda_0).to_degrees(), lat.to_degrees()))
    }
}

impl Projection for Geostationary {
    fn name(&self) -> &'static str {
        "geos"
    }

    fn forward(&self, lon: f64, lat: f64) -> (f64, f64) {
        match self.geo_to_scan(lon, lat) {
            Some((x, y)) => (x * self.perspective_point_height, y * self.perspective_point_height),
            None => OFF_MAP,
        }
    }

    fn inverse(&self, x: f64, y: f64) -> (f64, f64) {
        self.scan_to_geo(x / self.perspective_point_height, y / self.perspective_point_height)
            .unwrap_or(OFF_MAP)
    }
}
