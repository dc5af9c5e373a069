//! Projection parameter records.
//!
//! A [`ProjParams`] names a projection family (`proj`) and carries its numeric
//! parameters using the conventional short names: `a`, `b` (earth axes in
//! metres), `lon_0`, `lat_0`, `lat_1`, `lat_2`, `lat_ts` (degrees) and `h`
//! (perspective height above the surface in metres).

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ProjectionError, Result};

/// Projection family plus named numeric parameters.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ProjParams {
    /// Family identifier, e.g. `"lcc"`, `"stere"`, `"cyl"`.
    pub proj: String,
    /// Numeric parameters keyed by short name.
    pub values: BTreeMap<String, f64>,
}

impl ProjParams {
    pub fn new(proj: impl Into<String>) -> Self {
        Self {
            proj: proj.into(),
            values: BTreeMap::new(),
        }
    }

    /// Builder-style insert.
    pub fn with(mut self, name: &str, value: f64) -> Self {
        self.values.insert(name.to_string(), value);
        self
    }

    pub fn set(&mut self, name: &str, value: f64) {
        self.values.insert(name.to_string(), value);
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied()
    }

    /// Look up a parameter the projection cannot do without.
    pub fn require(&self, name: &str) -> Result<f64> {
        self.get(name)
            .ok_or_else(|| ProjectionError::missing(&self.proj, name))
    }

    /// Parameter with a fallback.
    pub fn get_or(&self, name: &str, default: f64) -> f64 {
        self.get(name).unwrap_or(default)
    }

    /// Semi-major axis.
    pub fn a(&self) -> Result<f64> {
        let a = self.require("a")?;
        if !(a.is_finite() && a > 0.0) {
            return Err(ProjectionError::invalid("a", format!("must be positive, got {}", a)));
        }
        Ok(a)
    }

    /// Semi-minor axis, defaulting to `a` for a sphere.
    pub fn b(&self) -> Result<f64> {
        let a = self.a()?;
        let b = self.get_or("b", a);
        if !(b.is_finite() && b > 0.0) {
            return Err(ProjectionError::invalid("b", format!("must be positive, got {}", b)));
        }
        Ok(b)
    }

    pub fn is_spherical(&self) -> bool {
        match (self.get("a"), self.get("b")) {
            (Some(a), Some(b)) => a == b,
            (Some(_), None) => true,
            _ => false,
        }
    }
}

impl fmt::Display for ProjParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "+proj={}", self.proj)?;
        for (name, value) in &self.values {
            write!(f, " +{}={}", name, value)?;
        }
        Ok(())
    }
}
