//! The `values` key as a shaped, masked field.
//!
//! [`materialize`] turns the coded value list into what callers want to look
//! at: a `(ny, nx)` array in south-to-north, west-to-east order, with reduced
//! grids expanded and missing points masked. [`encode`] goes the other way
//! for writes.

use ndarray::{Array2, ArrayD, ArrayView2, Ix2, ShapeBuilder};
use tracing::debug;

use crate::accessor::{contiguous, dimension, KeyReader};
use crate::config::MessageOptions;
use crate::error::{GribError, Result};
use crate::expand::expand_reduced;
use crate::scan::ScanMode;
use crate::value::StorageOrder;

/// A float array with an optional mask of the same shape.
///
/// `true` in the mask marks a missing point. An absent mask means every
/// point is valid.
#[derive(Debug, Clone, PartialEq)]
pub struct MaskedArray {
    data: ArrayD<f64>,
    mask: Option<ArrayD<bool>>,
}

impl MaskedArray {
    pub fn new(data: ArrayD<f64>) -> Self {
        Self { data, mask: None }
    }

    /// Mask every element exactly equal to `sentinel`.
    pub fn masked_equal(data: ArrayD<f64>, sentinel: f64) -> Self {
        let mask = data.mapv(|v| v == sentinel);
        Self {
            data,
            mask: Some(mask),
        }
    }

    pub fn with_mask(data: ArrayD<f64>, mask: ArrayD<bool>) -> Result<Self> {
        if data.shape() != mask.shape() {
            return Err(GribError::Shape(format!(
                "mask shape {:?} does not match data shape {:?}",
                mask.shape(),
                data.shape()
            )));
        }
        Ok(Self {
            data,
            mask: Some(mask),
        })
    }

    pub fn data(&self) -> &ArrayD<f64> {
        &self.data
    }

    pub fn mask(&self) -> Option<&ArrayD<bool>> {
        self.mask.as_ref()
    }

    pub fn into_parts(self) -> (ArrayD<f64>, Option<ArrayD<bool>>) {
        (self.data, self.mask)
    }

    pub fn shape(&self) -> &[usize] {
        self.data.shape()
    }

    pub fn ndim(&self) -> usize {
        self.data.ndim()
    }

    /// Whether any point is masked.
    pub fn is_masked(&self) -> bool {
        self.count_masked() > 0
    }

    pub fn count_masked(&self) -> usize {
        self.mask
            .as_ref()
            .map_or(0, |m| m.iter().filter(|masked| **masked).count())
    }

    /// Data with masked points replaced by `fill`.
    pub fn filled(&self, fill: f64) -> ArrayD<f64> {
        match &self.mask {
            Some(mask) => {
                let mut out = self.data.clone();
                out.zip_mut_with(mask, |v, masked| {
                    if *masked {
                        *v = fill;
                    }
                });
                out
            }
            None => self.data.clone(),
        }
    }

    /// Valid points in logical order.
    pub fn compressed(&self) -> Vec<f64> {
        match &self.mask {
            Some(mask) => self
                .data
                .iter()
                .zip(mask.iter())
                .filter(|(_, masked)| !**masked)
                .map(|(v, _)| *v)
                .collect(),
            None => self.data.iter().copied().collect(),
        }
    }

    pub fn as_2d(&self) -> Option<ArrayView2<'_, f64>> {
        self.data.view().into_dimensionality::<Ix2>().ok()
    }
}

/// Build the field for the `values` key.
///
/// Messages without `Nj` (spectral data) and reduced grids with expansion
/// switched off come back 1-D in coded order.
pub fn materialize(reader: &dyn KeyReader, options: &MessageOptions) -> Result<MaskedArray> {
    let raw = reader.doubles("values")?;
    let missing = if reader.has("missingValue") {
        reader.double("missingValue")?
    } else {
        options.missing_value
    };

    let data = match grid_shape(reader)? {
        FieldShape::Flat => raw.into_dyn(),
        FieldShape::Reduced { nj } if options.expand_reduced => {
            let row_lengths = row_lengths(reader)?;
            let expanded = expand_reduced(2 * nj, &row_lengths, &contiguous(&raw), missing)?;
            normalized(reader, expanded)?
        }
        FieldShape::Reduced { .. } => raw.into_dyn(),
        FieldShape::Regular { nj, ni } => {
            let mode = ScanMode::from_reader(reader)?;
            let grid = reshape(raw.to_vec(), nj, ni, mode.storage_order())?;
            standard(mode.normalize(grid))
        }
    };

    let number_of_missing = reader.long_or("numberOfMissing", 0)?;
    if reader.has("missingValue") && number_of_missing > 0 {
        debug!(missing = number_of_missing, "Masking missing values");
        Ok(MaskedArray::masked_equal(data, missing))
    } else {
        Ok(MaskedArray::new(data))
    }
}

/// Coded value list for a write of `field` to the `values` key.
///
/// Masked points are filled with the message's missing value. 2-D fields are
/// put back into coded scan order and flattened in storage order.
pub fn encode(
    reader: &dyn KeyReader,
    options: &MessageOptions,
    field: &MaskedArray,
) -> Result<Vec<f64>> {
    let missing = reader.double_or("missingValue", options.missing_value)?;
    let filled = field.filled(missing);

    match filled.ndim() {
        0 | 1 => Ok(filled.iter().copied().collect()),
        2 => {
            if let FieldShape::Reduced { .. } = grid_shape(reader)? {
                return Err(GribError::Shape(
                    "cannot write a 2-D field into a reduced grid".to_string(),
                ));
            }
            let grid = filled
                .into_dimensionality::<Ix2>()
                .map_err(|e| GribError::Shape(e.to_string()))?;
            let mode = ScanMode::from_reader(reader)?;
            let coded = mode.denormalize(grid);
            Ok(match mode.storage_order() {
                StorageOrder::RowMajor => coded.iter().copied().collect(),
                StorageOrder::ColumnMajor => coded.t().iter().copied().collect(),
            })
        }
        n => Err(GribError::Shape(format!(
            "values must have at most 2 dimensions, got {}",
            n
        ))),
    }
}

enum FieldShape {
    Flat,
    Reduced { nj: usize },
    Regular { nj: usize, ni: usize },
}

fn grid_shape(reader: &dyn KeyReader) -> Result<FieldShape> {
    if !reader.has("Nj") {
        return Ok(FieldShape::Flat);
    }
    let nj = dimension(reader, "Nj")?;
    let grid_type = if reader.has("gridType") {
        reader.text("gridType")?
    } else {
        String::new()
    };
    if grid_type.starts_with("reduced") {
        return Ok(FieldShape::Reduced { nj });
    }
    if reader.has("Ni") && !reader.missing("Ni")? {
        let ni = dimension(reader, "Ni")?;
        return Ok(FieldShape::Regular { nj, ni });
    }
    Ok(FieldShape::Flat)
}

fn row_lengths(reader: &dyn KeyReader) -> Result<Vec<usize>> {
    reader
        .longs("pl")?
        .into_iter()
        .map(|n| {
            usize::try_from(n)
                .map_err(|_| GribError::invalid_value("pl", format!("negative row length {}", n)))
        })
        .collect()
}

fn reshape(values: Vec<f64>, nj: usize, ni: usize, order: StorageOrder) -> Result<Array2<f64>> {
    let count = values.len();
    let shaped = match order {
        StorageOrder::RowMajor => Array2::from_shape_vec((nj, ni), values),
        StorageOrder::ColumnMajor => Array2::from_shape_vec((nj, ni).f(), values),
    };
    shaped.map_err(|_| {
        GribError::Shape(format!(
            "cannot shape {} values as {} x {} grid",
            count, nj, ni
        ))
    })
}

fn normalized(reader: &dyn KeyReader, grid: Array2<f64>) -> Result<ArrayD<f64>> {
    let mode = ScanMode::from_reader(reader)?;
    Ok(standard(mode.normalize(grid)))
}

/// Owned, row-major copy of a possibly axis-flipped array.
fn standard(grid: Array2<f64>) -> ArrayD<f64> {
    grid.as_standard_layout().into_owned().into_dyn()
}
