//! Scan order of GRIB grid points.
//!
//! Coded data may run east-to-west, north-to-south, or alternate direction
//! every row. [`ScanMode::normalize`] turns a `(ny, nx)` array in coded order
//! into one whose rows run south to north and whose columns run west to east;
//! [`ScanMode::denormalize`] is its exact inverse for the encode path.

use ndarray::{Array2, ArrayViewMut1, Axis};
use serde::{Deserialize, Serialize};

use crate::accessor::KeyReader;
use crate::error::Result;
use crate::value::StorageOrder;

/// Scanning mode flags (GRIB2 Flag Table 3.4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanMode {
    /// +i direction: false = +x (east), true = -x (west)
    pub i_negative: bool,
    /// +j direction: false = -y (south), true = +y (north)
    pub j_positive: bool,
    /// Adjacent points: false = i direction, true = j direction
    pub j_consecutive: bool,
    /// Row scan direction alternates
    pub alternating_rows: bool,
}

impl Default for ScanMode {
    fn default() -> Self {
        Self::south_to_north()
    }
}

impl ScanMode {
    /// Mode that needs no correction: rows west to east, columns south to north.
    pub fn south_to_north() -> Self {
        Self {
            i_negative: false,
            j_positive: true,
            j_consecutive: false,
            alternating_rows: false,
        }
    }

    /// Create from GRIB2 flag byte.
    pub fn from_grib2_flag(flag: u8) -> Self {
        Self {
            i_negative: (flag & 0x80) != 0,
            j_positive: (flag & 0x40) != 0,
            j_consecutive: (flag & 0x20) != 0,
            alternating_rows: (flag & 0x10) != 0,
        }
    }

    /// Read the scan flags of a message.
    ///
    /// Individual flag keys win over `scanningMode`. A message with neither
    /// is taken to scan south to north.
    pub fn from_reader(reader: &dyn KeyReader) -> Result<Self> {
        let mut mode = if reader.has("scanningMode") {
            Self::from_grib2_flag(reader.long("scanningMode")? as u8)
        } else {
            Self::south_to_north()
        };
        if reader.has("iScansNegatively") {
            mode.i_negative = reader.long("iScansNegatively")? != 0;
        }
        if reader.has("jScansPositively") {
            mode.j_positive = reader.long("jScansPositively")? != 0;
        }
        if reader.has("jPointsAreConsecutive") {
            mode.j_consecutive = reader.long("jPointsAreConsecutive")? != 0;
        }
        if reader.has("alternativeRowScanning") {
            mode.alternating_rows = reader.long("alternativeRowScanning")? != 0;
        }
        Ok(mode)
    }

    pub fn storage_order(&self) -> StorageOrder {
        if self.j_consecutive {
            StorageOrder::ColumnMajor
        } else {
            StorageOrder::RowMajor
        }
    }

    /// Whether normalizing twice gives back the input for `rows` rows.
    pub fn is_self_inverse(&self, rows: usize) -> bool {
        !self.alternating_rows || self.j_positive || rows % 2 == 1
    }

    /// Coded order to south-to-north, west-to-east order.
    pub fn normalize<T>(&self, mut array: Array2<T>) -> Array2<T> {
        if !self.j_positive {
            array.invert_axis(Axis(0));
        }
        if self.i_negative {
            array.invert_axis(Axis(1));
        }
        if self.alternating_rows {
            reverse_odd_rows(&mut array);
        }
        array
    }

    /// Inverse of [`normalize`](Self::normalize).
    pub fn denormalize<T>(&self, mut array: Array2<T>) -> Array2<T> {
        if self.alternating_rows {
            reverse_odd_rows(&mut array);
        }
        if self.i_negative {
            array.invert_axis(Axis(1));
        }
        if !self.j_positive {
            array.invert_axis(Axis(0));
        }
        array
    }
}

/// Normalize with explicit flags.
pub fn normalize<T>(
    array: Array2<T>,
    j_scans_positive: bool,
    i_scans_negative: bool,
    alternating_rows: bool,
) -> Array2<T> {
    ScanMode {
        i_negative: i_scans_negative,
        j_positive: j_scans_positive,
        j_consecutive: false,
        alternating_rows,
    }
    .normalize(array)
}

fn reverse_odd_rows<T>(array: &mut Array2<T>) {
    for row in array.axis_iter_mut(Axis(0)).skip(1).step_by(2) {
        reverse_in_place(row);
    }
}

fn reverse_in_place<T>(mut row: ArrayViewMut1<'_, T>) {
    let n = row.len();
    for k in 0..n / 2 {
        row.swap(k, n - 1 - k);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_from_grib2_flag() {
        let mode = ScanMode::from_grib2_flag(0x40);
        assert!(!mode.i_negative);
        assert!(mode.j_positive);
        let mode = ScanMode::from_grib2_flag(0x90);
        assert!(mode.i_negative && mode.alternating_rows && !mode.j_positive);
    }

    #[test]
    fn test_north_to_south_flips_rows() {
        let a = array![[1, 2], [3, 4], [5, 6]];
        let out = normalize(a, false, false, false);
        assert_eq!(out, array![[5, 6], [3, 4], [1, 2]]);
    }

    #[test]
    fn test_east_to_west_flips_columns() {
        let a = array![[1, 2, 3], [4, 5, 6]];
        let out = normalize(a, true, true, false);
        assert_eq!(out, array![[3, 2, 1], [6, 5, 4]]);
    }

    #[test]
    fn test_alternating_rows() {
        let a = array![[1, 2, 3], [6, 5, 4], [7, 8, 9]];
        let out = normalize(a, true, false, true);
        assert_eq!(out, array![[1, 2, 3], [4, 5, 6], [7, 8, 9]]);
    }

    #[test]
    fn test_normalize_twice_restores_without_alternation() {
        let a = array![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]];
        let mode = ScanMode::from_grib2_flag(0x80);
        assert!(mode.is_self_inverse(2));
        assert_eq!(mode.normalize(mode.normalize(a.clone())), a);
    }

    #[test]
    fn test_denormalize_inverts_alternating_north_to_south() {
        let a = array![[1, 2], [3, 4], [5, 6], [7, 8]];
        let mode = ScanMode::from_grib2_flag(0x10);
        assert!(!mode.is_self_inverse(4));
        assert_ne!(mode.normalize(mode.normalize(a.clone())), a);
        assert_eq!(mode.denormalize(mode.normalize(a.clone())), a);
    }

    #[test]
    fn test_storage_order() {
        assert_eq!(ScanMode::from_grib2_flag(0x20).storage_order(), StorageOrder::ColumnMajor);
        assert_eq!(ScanMode::default().storage_order(), StorageOrder::RowMajor);
    }
}
