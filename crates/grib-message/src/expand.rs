//! Reduced-to-regular grid expansion.
//!
//! Reduced grids store fewer points per row toward the poles. Expansion
//! resamples every row onto a common width with periodic linear
//! interpolation, falling back to the nearer neighbour whenever either
//! neighbour is missing so that sentinels never leak into interpolated
//! values.

use ndarray::parallel::prelude::*;
use ndarray::{Array2, Axis};
use tracing::debug;

use crate::error::{GribError, Result};

/// Expand a reduced grid to `target_width` points per row.
///
/// # Arguments
/// * `target_width` - Number of points in every output row
/// * `row_lengths` - Number of points in each reduced row, north to south as coded
/// * `values` - Reduced values, rows concatenated
/// * `missing` - Sentinel marking missing values; also fills empty rows
///
/// # Returns
/// Array of shape `(row_lengths.len(), target_width)`
pub fn expand_reduced(
    target_width: usize,
    row_lengths: &[usize],
    values: &[f64],
    missing: f64,
) -> Result<Array2<f64>> {
    let total: usize = row_lengths.iter().sum();
    if values.len() < total {
        return Err(GribError::Shape(format!(
            "reduced grid needs {} values, got {}",
            total,
            values.len()
        )));
    }

    let offsets: Vec<usize> = row_lengths
        .iter()
        .scan(0usize, |acc, &len| {
            let start = *acc;
            *acc += len;
            Some(start)
        })
        .collect();

    let mut output = Array2::from_elem((row_lengths.len(), target_width), missing);
    output
        .axis_iter_mut(Axis(0))
        .into_par_iter()
        .enumerate()
        .for_each(|(j, mut out_row)| {
            let len = row_lengths[j];
            if len == 0 {
                return;
            }
            let row = &values[offsets[j]..offsets[j] + len];
            for (i, cell) in out_row.iter_mut().enumerate() {
                *cell = resample(row, i, target_width, missing);
            }
        });

    debug!(
        rows = row_lengths.len(),
        width = target_width,
        points = total,
        "Expanded reduced grid"
    );

    Ok(output)
}

/// Value at output column `i` of `width` for one non-empty reduced row.
fn resample(row: &[f64], i: usize, width: usize, missing: f64) -> f64 {
    let len = row.len();
    let zxi = i as f64 * len as f64 / width as f64;
    let base = zxi.floor();
    let frac = zxi - base;
    let im = (base as usize) % len;
    let ip = (im + 1) % len;

    let (lo, hi) = (row[im], row[ip]);
    if lo == missing || hi == missing {
        if frac < 0.5 {
            lo
        } else {
            hi
        }
    } else {
        lo * (1.0 - frac) + hi * frac
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MISSING: f64 = 9999.0;

    #[test]
    fn test_same_width_reproduces_row() {
        let row = [1.0, 5.0, 2.0, 8.0];
        let out = expand_reduced(4, &[4], &row, MISSING).unwrap();
        assert_eq!(out.row(0).to_vec(), row.to_vec());
    }

    #[test]
    fn test_linear_interpolation_wraps() {
        // Two points onto four: 0, midpoint, 1, midpoint back to 0.
        let out = expand_reduced(4, &[2], &[10.0, 20.0], MISSING).unwrap();
        assert_eq!(out.row(0).to_vec(), vec![10.0, 15.0, 20.0, 15.0]);
    }

    #[test]
    fn test_missing_neighbour_uses_nearest() {
        // zxi = 0.75 for column 1: nearer to index 1, which is missing.
        let out = expand_reduced(4, &[3], &[1.0, MISSING, 3.0], MISSING).unwrap();
        let row = out.row(0);
        assert_eq!(row[0], 1.0);
        assert_eq!(row[1], MISSING);
        // zxi = 1.5, neighbours 1 (missing) and 2: frac == 0.5 picks index 2.
        assert_eq!(row[2], 3.0);
        // zxi = 2.25, neighbours 2 and 0, both present.
        assert!((row[3] - (3.0 * 0.75 + 1.0 * 0.25)).abs() < 1e-12);
    }

    #[test]
    fn test_empty_row_stays_missing() {
        let out = expand_reduced(3, &[2, 0, 1], &[1.0, 2.0, 4.0], MISSING).unwrap();
        assert_eq!(out.shape(), &[3, 3]);
        assert!(out.row(1).iter().all(|v| *v == MISSING));
        assert!(out.row(2).iter().all(|v| *v == 4.0));
    }

    #[test]
    fn test_values_stay_within_row_bounds() {
        let rows = [5usize, 9, 13];
        let values: Vec<f64> = (0..27).map(|k| ((k * 7) % 11) as f64 - 3.0).collect();
        let out = expand_reduced(16, &rows, &values, MISSING).unwrap();
        let mut offset = 0;
        for (j, len) in rows.iter().enumerate() {
            let row = &values[offset..offset + len];
            let min = row.iter().cloned().fold(f64::INFINITY, f64::min);
            let max = row.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
            assert!(out.row(j).iter().all(|v| *v >= min - 1e-12 && *v <= max + 1e-12));
            offset += len;
        }
    }

    #[test]
    fn test_too_few_values() {
        let err = expand_reduced(4, &[4, 4], &[1.0; 6], MISSING).unwrap_err();
        assert!(matches!(err, GribError::Shape(_)));
    }
}
