//! One GRIB message behind a decoder handle.

use std::fmt;

use bytes::Bytes;
use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use ndarray::{Array1, Array2, Zip};
use projection::{BuiltinEngine, ProjParams, ProjectionEngine};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::accessor::{self, KeyReader};
use crate::catalog::KeyCatalog;
use crate::config::MessageOptions;
use crate::decoder::Decoder;
use crate::error::{ForKey, GribError, Result};
use crate::grid::{self, GeoGrid};
use crate::masked::{self, MaskedArray};
use crate::scan::ScanMode;
use crate::step::StepUnit;
use crate::value::{KeyValue, StorageOrder};

/// Key under which the data field lives.
pub const VALUES_KEY: &str = "values";

/// A decoded message: typed key access, data field and geolocation.
///
/// The decoder handle is owned and released when the message is dropped.
/// Key names are enumerated once at construction; writes change values only.
#[derive(Debug)]
pub struct GribMessage<D: Decoder> {
    decoder: D,
    position: usize,
    catalog: KeyCatalog,
    options: MessageOptions,
    projparams: Option<ProjParams>,
}

/// Points of a field that fall inside a latitude/longitude box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataSubset {
    pub values: Vec<f64>,
    pub lats: Vec<f64>,
    pub lons: Vec<f64>,
}

impl DataSubset {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<D: Decoder> GribMessage<D> {
    /// Wrap a decoder handle positioned at message `position` (1-based).
    pub fn new(decoder: D, position: usize) -> Result<Self> {
        Self::with_options(decoder, position, MessageOptions::default())
    }

    pub fn with_options(decoder: D, position: usize, options: MessageOptions) -> Result<Self> {
        options.validate().map_err(GribError::Config)?;
        let catalog = KeyCatalog::load(&decoder)?;

        debug!(position, keys = catalog.len(), "Opened message");

        Ok(Self {
            decoder,
            position,
            catalog,
            options,
            projparams: None,
        })
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn options(&self) -> &MessageOptions {
        &self.options
    }

    pub fn decoder(&self) -> &D {
        &self.decoder
    }

    /// Key names in decoder order, as enumerated at construction.
    pub fn keys(&self) -> &[String] {
        self.catalog.names()
    }

    pub fn has_key(&self, key: &str) -> bool {
        self.catalog.contains(key) || self.decoder.is_defined(key)
    }

    pub fn is_read_only(&self, key: &str) -> bool {
        self.catalog.is_read_only(key)
    }

    /// Whether `key` holds the decoder's missing sentinel.
    pub fn is_missing(&self, key: &str) -> Result<bool> {
        if !self.has_key(key) {
            return Err(GribError::KeyNotFound(key.to_string()));
        }
        self.decoder.is_missing(key).for_key(key)
    }

    /// Value of `key`, or `None` when its native type carries no value.
    ///
    /// `values` comes back as a [`KeyValue::Field`]; every other array is a
    /// flat copy in storage order (see [`storage_order`](Self::storage_order)).
    pub fn get(&self, key: &str) -> Result<Option<KeyValue>> {
        if key == VALUES_KEY {
            return self.values().map(|field| Some(KeyValue::Field(field)));
        }
        KeyReader::read(self, key)
    }

    /// The data field, reshaped, scan-normalized and masked.
    pub fn values(&self) -> Result<MaskedArray> {
        masked::materialize(self, &self.options)
    }

    /// Write `key`. Read-only and unknown keys are rejected before the
    /// decoder is touched.
    pub fn set(&mut self, key: &str, value: impl Into<KeyValue>) -> Result<()> {
        let value = value.into();
        if let Err(err) = self.catalog.check_writable(key) {
            debug!(key, error = %err, "Rejected write");
            return Err(err);
        }
        if key == VALUES_KEY {
            return self.set_values(value);
        }
        accessor::write(&mut self.decoder, &self.catalog, key, &value)
    }

    fn set_values(&mut self, value: KeyValue) -> Result<()> {
        let field = match value {
            KeyValue::Field(field) => field,
            KeyValue::Text(_) => {
                return Err(GribError::unsupported_type(
                    VALUES_KEY,
                    "text value for the data field",
                ))
            }
            other => {
                let data = other.to_f64_vec().unwrap_or_default();
                MaskedArray::new(Array1::from(data).into_dyn())
            }
        };

        let coded = masked::encode(&*self, &self.options, &field)?;
        accessor::write(
            &mut self.decoder,
            &self.catalog,
            VALUES_KEY,
            &KeyValue::DoubleArray(Array1::from(coded)),
        )?;

        // Flag the bitmap only once the values are in.
        const BITMAP: &str = "bitmapPresent";
        if field.is_masked() && self.catalog.check_writable(BITMAP).is_ok() {
            accessor::write(&mut self.decoder, &self.catalog, BITMAP, &KeyValue::Long(1))?;
        }
        Ok(())
    }

    /// The re-encoded message.
    pub fn to_bytes(&self) -> Result<Bytes> {
        self.decoder.message_bytes().for_key("message")
    }

    /// Order in which 2-D data is flattened in this message.
    pub fn storage_order(&self) -> Result<StorageOrder> {
        ScanMode::from_reader(self).map(|mode| mode.storage_order())
    }

    pub fn expand_reduced(&self) -> bool {
        self.options.expand_reduced
    }

    /// Switch reduced-grid expansion for later `values` reads.
    pub fn set_expand_reduced(&mut self, expand: bool) {
        self.options.expand_reduced = expand;
    }

    /// Geolocate every grid point with the built-in projections.
    pub fn compute_latlons(&mut self) -> Result<GeoGrid> {
        self.compute_latlons_with(&BuiltinEngine)
    }

    /// Geolocate with a caller-supplied projection engine. The resulting
    /// projection parameters replace any earlier ones.
    pub fn compute_latlons_with(&mut self, engine: &dyn ProjectionEngine) -> Result<GeoGrid> {
        let grid = grid::resolve(&*self, engine, &self.options)?;
        self.projparams = Some(grid.projparams.clone());
        Ok(grid)
    }

    /// `(lats, lons)`, each shaped `(ny, nx)`.
    pub fn latlons(&mut self) -> Result<(Array2<f64>, Array2<f64>)> {
        let grid = self.compute_latlons()?;
        Ok((grid.lats, grid.lons))
    }

    /// Projection parameters from the last geolocation, if any.
    pub fn projparams(&self) -> Option<&ProjParams> {
        self.projparams.as_ref()
    }

    /// Reference time of the data from `dataDate` (YYYYMMDD) and `dataTime`
    /// (HHMM).
    pub fn analysis_date(&self) -> Result<DateTime<Utc>> {
        let date = self.long("dataDate")?;
        let time = self.long_or("dataTime", 0)?;

        let day = u32::try_from(date % 100).ok();
        let month = u32::try_from((date / 100) % 100).ok();
        let year = i32::try_from(date / 10_000).ok();
        let day = match (year, month, day) {
            (Some(y), Some(m), Some(d)) => NaiveDate::from_ymd_opt(y, m, d),
            _ => None,
        }
        .ok_or_else(|| GribError::invalid_value("dataDate", format!("not a date: {}", date)))?;

        let clock = u32::try_from(time)
            .ok()
            .and_then(|t| NaiveTime::from_hms_opt(t / 100, t % 100, 0))
            .ok_or_else(|| GribError::invalid_value("dataTime", format!("not a time: {}", time)))?;

        Ok(Utc.from_utc_datetime(&day.and_time(clock)))
    }

    /// Analysis time plus `forecastTime` in `stepUnits` (hours by default).
    pub fn valid_date(&self) -> Result<DateTime<Utc>> {
        let analysis = self.analysis_date()?;
        if !self.has_key("forecastTime") {
            return Ok(analysis);
        }
        let steps = self.long("forecastTime")?;
        let unit = self.step_unit()?;
        unit.duration(steps)
            .and_then(|delta| analysis.checked_add_signed(delta))
            .ok_or_else(|| {
                GribError::invalid_value(
                    "forecastTime",
                    format!("{} {} is out of range", steps, unit.label()),
                )
            })
    }

    fn step_unit(&self) -> Result<StepUnit> {
        const KEY: &str = "stepUnits";
        if !self.has_key(KEY) {
            return Ok(StepUnit::Hour);
        }
        let value = self.value(KEY)?;
        StepUnit::from_value(&value)
            .ok_or_else(|| GribError::invalid_value(KEY, format!("unknown step unit {}", value)))
    }

    /// Field values and coordinates of the points with `lat1 <= lat <= lat2`
    /// and `lon1 <= lon <= lon2`, flattened row by row.
    pub fn data_subset(&mut self, lat1: f64, lat2: f64, lon1: f64, lon2: f64) -> Result<DataSubset> {
        let field = self.values()?;
        let grid = self.compute_latlons()?;
        let data = field.filled(self.missing_fill()?);
        if data.shape() != grid.lats.shape() {
            return Err(GribError::Shape(format!(
                "field shape {:?} does not match grid shape {:?}",
                data.shape(),
                grid.lats.shape()
            )));
        }

        let mut subset = DataSubset {
            values: Vec::new(),
            lats: Vec::new(),
            lons: Vec::new(),
        };
        Zip::from(data.view())
            .and(grid.lats.view().into_dyn())
            .and(grid.lons.view().into_dyn())
            .for_each(|&v, &lat, &lon| {
                if lat >= lat1 && lat <= lat2 && lon >= lon1 && lon <= lon2 {
                    subset.values.push(v);
                    subset.lats.push(lat);
                    subset.lons.push(lon);
                }
            });
        Ok(subset)
    }

    fn missing_fill(&self) -> Result<f64> {
        self.double_or("missingValue", self.options.missing_value)
    }

    /// One-line inventory entry, e.g.
    /// `1:Temperature:K (instant):regular_ll:isobaricInhPa:level 500:fcst time 6 hrs:from 202401011200`.
    pub fn summary(&self) -> Result<String> {
        let mut out = self.position.to_string();

        let name = self.text_if("name")?.filter(|name| name != "unknown");
        if let Some(name) = name.or(self.text_if("parameterName")?) {
            out.push(':');
            out.push_str(&name);
        }
        if let Some(units) = self.text_if("units")? {
            out.push(':');
            out.push_str(&units);
        }
        if let Some(step_type) = self.text_if("stepType")? {
            out.push_str(&format!(" ({})", step_type));
        }
        if let Some(grid_type) = self.text_if("gridType")? {
            out.push(':');
            out.push_str(&grid_type);
        }
        if let Some(level_type) = self.text_if("typeOfLevel")? {
            out.push(':');
            out.push_str(&level_type);
        }

        let top = self.text_if("topLevel")?;
        let bottom = self.text_if("bottomLevel")?;
        match (top, bottom) {
            (Some(top), Some(bottom)) if top != bottom => {
                out.push_str(&format!(":levels {}-{}", top, bottom));
            }
            _ => {
                if let Some(level) = self.text_if("level")? {
                    out.push_str(&format!(":level {}", level));
                }
            }
        }

        let step = match self.text_if("stepRange")? {
            Some(range) => Some(range),
            None => self.text_if("forecastTime")?,
        };
        if let Some(step) = step {
            out.push_str(&format!(":fcst time {} {}", step, self.step_unit()?.label()));
        }

        if self.has_key("dataDate") {
            let date = self.long("dataDate")?;
            let time = self.long_or("dataTime", 0)?;
            out.push_str(&format!(":from {}{:04}", date, time));
        }
        Ok(out)
    }

    fn text_if(&self, key: &str) -> Result<Option<String>> {
        if self.has_key(key) {
            self.text(key).map(Some)
        } else {
            Ok(None)
        }
    }
}

impl<D: Decoder> KeyReader for GribMessage<D> {
    fn has(&self, key: &str) -> bool {
        self.has_key(key)
    }

    fn read(&self, key: &str) -> Result<Option<KeyValue>> {
        if !self.has_key(key) {
            return Err(GribError::KeyNotFound(key.to_string()));
        }
        accessor::read(&self.decoder, key, self.options.text_capacity)
    }

    fn missing(&self, key: &str) -> Result<bool> {
        self.is_missing(key)
    }
}

impl<D: Decoder> fmt::Display for GribMessage<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.summary() {
            Ok(summary) => f.write_str(&summary),
            Err(_) => write!(f, "{}:<unreadable>", self.position),
        }
    }
}
