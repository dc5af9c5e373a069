//! Figure of the earth (GRIB2 Code Table 3.2).

use projection::ProjParams;

use crate::accessor::KeyReader;
use crate::error::{GribError, Result};

/// Earth radius for shape 0.
pub const SPHERE_6367470: f64 = 6_367_470.0;
/// Earth radius for shape 2.
pub const SPHERE_6378160: f64 = 6_378_160.0;
/// Default radius for shape 6.
pub const SPHERE_6371229: f64 = 6_371_229.0;
/// Default radius for shape 8.
pub const SPHERE_6371200: f64 = 6_371_200.0;

const GRS80: (f64, f64) = (6_378_137.0, 6_356_752.314_140);
const WGS84: (f64, f64) = (6_378_137.0, 6_356_752.314_245);

/// Semi-major and semi-minor axes in metres.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EarthShape {
    pub a: f64,
    pub b: f64,
}

impl EarthShape {
    pub fn sphere(radius: f64) -> Self {
        Self { a: radius, b: radius }
    }

    pub fn spheroid(a: f64, b: f64) -> Self {
        Self { a, b }
    }

    pub fn is_spherical(&self) -> bool {
        self.a == self.b
    }

    /// Derive the earth shape from `shapeOfTheEarth` and its companion keys.
    ///
    /// Messages without the key (GRIB1) use the 6367470 m sphere.
    pub fn from_reader(reader: &dyn KeyReader) -> Result<Self> {
        let code = reader.long_or("shapeOfTheEarth", 0)?;
        match code {
            0 => Ok(Self::sphere(SPHERE_6367470)),
            1 => {
                let radius = reader.double("scaledValueOfRadiusOfSphericalEarth")?
                    * scale(reader, "scaleFactorOfRadiusOfSphericalEarth")?;
                Ok(Self::sphere(radius))
            }
            2 => Ok(Self::sphere(SPHERE_6378160)),
            3 => {
                let (a, b) = scaled_axes(reader)?;
                Ok(Self::spheroid(a * 1000.0, b * 1000.0))
            }
            4 => Ok(Self::spheroid(GRS80.0, GRS80.1)),
            5 => Ok(Self::spheroid(WGS84.0, WGS84.1)),
            6 => Ok(Self::sphere(reader.double_or("radius", SPHERE_6371229)?)),
            7 => {
                let (a, b) = scaled_axes(reader)?;
                Ok(Self::spheroid(a, b))
            }
            8 => Ok(Self::sphere(reader.double_or("radius", SPHERE_6371200)?)),
            other => Err(GribError::UnknownEarthShape(other)),
        }
    }

    /// Store the axes in a projection record.
    pub fn apply(&self, params: &mut ProjParams) {
        params.set("a", self.a);
        params.set("b", self.b);
    }
}

fn scaled_axes(reader: &dyn KeyReader) -> Result<(f64, f64)> {
    let a = reader.double("scaledValueOfEarthMajorAxis")?
        * scale(reader, "scaleFactorOfEarthMajorAxis")?;
    let b = reader.double("scaledValueOfEarthMinorAxis")?
        * scale(reader, "scaleFactorOfEarthMinorAxis")?;
    Ok((a, b))
}

/// `10^-factor`, or 1 when the factor is absent, zero or missing.
fn scale(reader: &dyn KeyReader, key: &str) -> Result<f64> {
    if !reader.has(key) || reader.missing(key)? {
        return Ok(1.0);
    }
    let factor = reader.long(key)?;
    if factor == 0 {
        return Ok(1.0);
    }
    Ok(10f64.powi(-(factor as i32)))
}
