/////////////////////////////////////////////////////////////////////////////////////////////
//
// Supplies general-purpose utilities for point matrices and distances.
//
// Created on: 15 Nov 2025     Author: Daniel Owen
//
// Copyright (c) 2025, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

use crate::Vector3;
use faer::{Mat, RowRef};

/// Returns an owned `Mat<T>` from a subset of row indices.
///
/// # Examples
///
/// ```
/// use faer::mat;
/// use dfi_rbf_utils::select_mat_rows;
///
/// let matrix = mat![
///     [0.0, 1.0],
///     [1.0, 1.0],
///     [2.0, 2.0],
///     [3.0, 3.0f64],
/// ];
///
/// let wanted_rows = vec![0usize, 2];
///
/// let sub_matrix = select_mat_rows(&matrix, &wanted_rows);
///
/// assert_eq!(
///     sub_matrix,
///     mat![
///         [0.0, 1.0],
///         [2.0, 2.0f64],
///     ]
/// );
/// ```
#[inline(always)]
pub fn select_mat_rows<T>(existing_mat: &Mat<T>, row_indices: &[usize]) -> Mat<T>
where
    T: Clone,
{
    Mat::from_fn(row_indices.len(), existing_mat.ncols(), |i, j| {
        existing_mat.get(row_indices[i], j).clone()
    })
}

/// Reads row `i` of an `N × 3` point matrix as a 3-vector.
#[inline(always)]
pub fn point_row(points: &Mat<f64>, i: usize) -> Vector3 {
    [points[(i, 0)], points[(i, 1)], points[(i, 2)]]
}

/// Copies an `N × 3` point matrix into a contiguous list of 3-vectors.
///
/// # Examples
///
/// ```
/// use faer::mat;
/// use dfi_rbf_utils::to_vector3_rows;
///
/// let points = mat![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0f64]];
///
/// assert_eq!(to_vector3_rows(&points), vec![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]);
/// ```
pub fn to_vector3_rows(points: &Mat<f64>) -> Vec<Vector3> {
    assert_eq!(points.ncols(), 3, "expected an N x 3 point matrix");
    (0..points.nrows()).map(|i| point_row(points, i)).collect()
}

/// Returns the infinity-norm (Chebyshev) distance between two points.
///
/// # Examples
///
/// ```
/// use dfi_rbf_utils::get_distance_inf;
///
/// assert_eq!(get_distance_inf(&[0.0, 0.0, 0.0], &[1.0, -3.0, 2.0]), 3.0);
/// ```
#[inline(always)]
pub fn get_distance_inf(target: &Vector3, source: &Vector3) -> f64 {
    target
        .iter()
        .zip(source.iter())
        .fold(0.0, |acc: f64, (t, s)| acc.max((t - s).abs()))
}

/// Returns true when every entry of the row is finite.
#[inline(always)]
pub fn row_is_finite(row: RowRef<'_, f64>) -> bool {
    row.iter().all(|v| v.is_finite())
}
