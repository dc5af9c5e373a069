//! Test data generators for synthetic GRIB fields and grid axes.
//!
//! These generators create predictable, verifiable test data patterns
//! that can be used across the test suite.

use std::f64::consts::PI;

/// Creates a test grid with predictable values.
///
/// Each cell value is calculated as: `col * 1000 + row`
///
/// This makes it easy to verify that data is being read/written correctly
/// by checking that grid[row][col] == col * 1000 + row.
///
/// # Returns
///
/// A `Vec<f64>` in row-major order (row 0 first, then row 1, etc.)
///
/// # Example
///
/// ```
/// use test_utils::create_test_grid;
///
/// let grid = create_test_grid(10, 5);
/// assert_eq!(grid.len(), 50);
/// assert_eq!(grid[1], 1000.0);
/// assert_eq!(grid[10], 1.0);
/// ```
pub fn create_test_grid(width: usize, height: usize) -> Vec<f64> {
    let mut data = Vec::with_capacity(width * height);
    for row in 0..height {
        for col in 0..width {
            data.push((col * 1000 + row) as f64);
        }
    }
    data
}

/// Creates a precipitation-like grid where roughly one cell in four is
/// replaced by `missing`.
///
/// Deterministic for a given `seed`.
pub fn create_sparse_grid(width: usize, height: usize, seed: u32, missing: f64) -> Vec<f64> {
    let mut data = Vec::with_capacity(width * height);
    for row in 0..height {
        for col in 0..width {
            let hash = simple_hash(col as u32, row as u32, seed);
            if hash % 4 == 0 {
                data.push(missing);
            } else {
                data.push((hash % 5000) as f64 / 100.0);
            }
        }
    }
    data
}

/// Simple deterministic hash for reproducible test data.
fn simple_hash(x: u32, y: u32, seed: u32) -> u32 {
    let mut h = seed;
    h = h.wrapping_mul(31).wrapping_add(x);
    h = h.wrapping_mul(31).wrapping_add(y);
    h ^= h >> 16;
    h = h.wrapping_mul(0x85ebca6b);
    h ^= h >> 13;
    h = h.wrapping_mul(0xc2b2ae35);
    h ^= h >> 16;
    h
}

/// Latitudes of a gaussian grid with `nlat` rows, north to south, in degrees.
///
/// Roots of the Legendre polynomial of degree `nlat`, found by Newton
/// iteration from the usual cosine first guess.
///
/// # Example
///
/// ```
/// use test_utils::gaussian_latitudes;
///
/// let lats = gaussian_latitudes(94);
/// assert!((lats[0] - 88.5419501373).abs() < 1e-9);
/// ```
pub fn gaussian_latitudes(nlat: usize) -> Vec<f64> {
    let n = nlat as f64;
    (1..=nlat)
        .map(|k| {
            let mut x = (PI * (k as f64 - 0.25) / (n + 0.5)).cos();
            for _ in 0..100 {
                let (p, dp) = legendre(nlat, x);
                let step = p / dp;
                x -= step;
                if step.abs() < 1e-15 {
                    break;
                }
            }
            x.asin().to_degrees()
        })
        .collect()
}

/// Legendre polynomial `P_n(x)` and its derivative.
fn legendre(n: usize, x: f64) -> (f64, f64) {
    let mut p_prev = 1.0;
    let mut p = x;
    for j in 2..=n {
        let j = j as f64;
        let next = ((2.0 * j - 1.0) * x * p - (j - 1.0) * p_prev) / j;
        p_prev = p;
        p = next;
    }
    let dp = n as f64 * (x * p - p_prev) / (x * x - 1.0);
    (p, dp)
}

/// Row lengths of an octahedral reduced gaussian grid with `nlat` rows:
/// 20 points at the poles, growing by 4 per row toward the equator.
pub fn octahedral_row_lengths(nlat: usize) -> Vec<i64> {
    let half = nlat / 2;
    (0..nlat)
        .map(|j| {
            let from_pole = if j < half { j } else { nlat - 1 - j };
            20 + 4 * from_pole as i64
        })
        .collect()
}

/// `n` evenly spaced values from `first` to `last` inclusive.
pub fn linspace(first: f64, last: f64, n: usize) -> Vec<f64> {
    if n == 1 {
        return vec![first];
    }
    let step = (last - first) / (n as f64 - 1.0);
    (0..n)
        .map(|k| if k + 1 == n { last } else { first + k as f64 * step })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_test_grid() {
        let grid = create_test_grid(3, 2);
        assert_eq!(grid.len(), 6);
        assert_eq!(grid, vec![0.0, 1000.0, 2000.0, 1.0, 1001.0, 2001.0]);
    }

    #[test]
    fn test_sparse_grid_is_deterministic() {
        let a = create_sparse_grid(20, 10, 42, 9999.0);
        let b = create_sparse_grid(20, 10, 42, 9999.0);
        assert_eq!(a, b);
        assert!(a.iter().any(|v| *v == 9999.0));
        assert!(a.iter().any(|v| *v != 9999.0));
    }

    #[test]
    fn test_gaussian_latitudes_t62() {
        let lats = gaussian_latitudes(94);
        assert_eq!(lats.len(), 94);
        assert!((lats[0] - 88.5419501373).abs() < 1e-9);
        assert!((lats[93] + 88.5419501373).abs() < 1e-9);
        assert!(lats.windows(2).all(|w| w[0] > w[1]));
    }

    #[test]
    fn test_gaussian_latitudes_symmetric() {
        let lats = gaussian_latitudes(32);
        for k in 0..16 {
            assert!((lats[k] + lats[31 - k]).abs() < 1e-10);
        }
    }

    #[test]
    fn test_octahedral_row_lengths() {
        let pl = octahedral_row_lengths(8);
        assert_eq!(pl, vec![20, 24, 28, 32, 32, 28, 24, 20]);
    }

    #[test]
    fn test_linspace_endpoints() {
        let v = linspace(0.0, 358.125, 192);
        assert_eq!(v[0], 0.0);
        assert_eq!(v[191], 358.125);
        assert!((v[1] - 1.875).abs() < 1e-12);
    }
}
