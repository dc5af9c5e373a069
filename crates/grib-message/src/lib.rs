//! Typed access to decoded GRIB messages.
//!
//! This crate sits on top of a GRIB decoder and exposes one message at a
//! time as typed keys, a masked data field and per-point coordinates:
//!
//! - **Typed keys**: scalars, arrays and text marshalled by native type
//! - **Data field**: reduced grids expanded, scan order normalized, missing
//!   values masked
//! - **Geolocation**: latitude/longitude arrays for regular, gaussian,
//!   reduced and projected grids, including satellite space views
//!
//! # Architecture
//!
//! ```text
//! GribMessage::values()
//!      │
//!      ├─► accessor::read("values")        (copy out of the decoder)
//!      │
//!      ├─► reduced grid? ──► expand::expand_reduced (rayon, per row)
//!      │
//!      ├─► ScanMode::normalize             (south to north, west to east)
//!      │
//!      └─► MaskedArray (missingValue sentinel masked)
//!
//! GribMessage::compute_latlons()
//!      │
//!      ├─► grid::family_for(gridType)
//!      │
//!      ├─► EarthShape::from_reader
//!      │
//!      └─► GridFamily::synthesize ──► ProjectionEngine (forward / inverse)
//! ```
//!
//! # Example
//!
//! ```ignore
//! use grib_message::{GribMessage, MemoryDecoder};
//!
//! let mut msg = GribMessage::new(decoder, 1)?;
//! let field = msg.values()?;
//! let grid = msg.compute_latlons()?;
//! assert_eq!(field.shape(), &[grid.lats.nrows(), grid.lats.ncols()]);
//! ```

pub mod accessor;
pub mod catalog;
pub mod config;
pub mod decoder;
pub mod error;
pub mod expand;
pub mod grid;
pub mod masked;
pub mod memory;
pub mod message;
pub mod scan;
pub mod step;
pub mod value;

pub use accessor::{KeyReader, Marshal};
pub use catalog::KeyCatalog;
pub use config::MessageOptions;
pub use decoder::{Decoder, DecoderError, KeyFilter, NativeType, MISSING_DOUBLE, MISSING_LONG};
pub use error::{GribError, Result};
pub use expand::expand_reduced;
pub use grid::{EarthShape, GeoGrid, GridFamily, SUPPORTED_GRID_TYPES};
pub use masked::MaskedArray;
pub use memory::{MemoryDecoder, StoredValue};
pub use message::{DataSubset, GribMessage};
pub use scan::ScanMode;
pub use step::StepUnit;
pub use value::{KeyValue, StorageOrder};

pub use projection::{BuiltinEngine, ProjParams, Projection, ProjectionEngine};
