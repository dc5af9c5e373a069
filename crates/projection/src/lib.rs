//! Cartographic projections for grid geolocation.
//!
//! Implements the projection families GRIB grid definitions name, from
//! scratch, behind the [`ProjectionEngine`] / [`Projection`] traits:
//! polar stereographic, Lambert conformal conic, Albers equal-area, Mercator,
//! azimuthal equidistant, Lambert azimuthal equal-area, geostationary and
//! near-side perspective.

pub mod albers;
pub mod azimuthal;
pub mod engine;
pub mod error;
pub mod geostationary;
pub mod lambert;
pub mod mercator;
pub mod params;
pub mod perspective;
pub mod stereographic;

pub use engine::{BuiltinEngine, Projection, ProjectionEngine};
pub use error::{ProjectionError, Result};
pub use geostationary::Geostationary;
pub use lambert::LambertConformal;
pub use params::ProjParams;
