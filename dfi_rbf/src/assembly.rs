/////////////////////////////////////////////////////////////////////////////////////////////
//
// Assembles the dense block system for divergence-free RBF interpolation.
//
// Created on: 15 Nov 2025     Author: Daniel Owen
//
// Copyright (c) 2025, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

//! # assembly
//!
//! Fills the `3N × 3N` interpolation matrix whose `(i, j)` 3×3 block is
//! `Φ(x_i, x_j)`, together with the interleaved right-hand side
//! `[u_0x, u_0y, u_0z, u_1x, ...]`.
//!
//! The matrix is written column-major into a single buffer. Block column `j`
//! occupies the contiguous range `[3j·3N, 3(j+1)·3N)`, which lets the parallel
//! fill hand each block column to a separate rayon task.

use crate::{config::AssemblyStrategy, rbf::DfiRbfError};
use dfi_rbf_utils::{MatrixKernelFunction, Vector3};
use faer::{Mat, MatRef};
use rayon::prelude::*;

/// The assembled interpolation system `A c = d`.
#[derive(Debug)]
pub struct AssembledSystem {
    /// `A` in column-major order, `dim × dim`.
    pub a_matrix: Vec<f64>,

    /// Interleaved sample vectors, `dim × 1`.
    pub rhs: Mat<f64>,

    /// `3N`.
    pub dim: usize,
}

impl AssembledSystem {
    /// Returns a view of the assembled matrix.
    pub fn matrix(&self) -> MatRef<'_, f64> {
        MatRef::from_column_major_slice(&self.a_matrix, self.dim, self.dim)
    }
}

/// Builds the interpolation system for `points` and their sample `vectors`.
///
/// `vectors` must be an `N × 3` matrix co-indexed with `points`. The kernel is
/// evaluated as `kernel.evaluate(x_i, x_j)` for block row `i` and block column `j`.
///
/// Fails with [`DfiRbfError::AllocationFailure`] when the `9N²` buffer cannot
/// be reserved.
///
/// # Panics
/// Panics if `vectors` is not `points.len() × 3`.
pub fn assemble_system<K: MatrixKernelFunction>(
    kernel: &K,
    points: &[Vector3],
    vectors: &Mat<f64>,
    strategy: AssemblyStrategy,
    parallel: bool,
) -> Result<AssembledSystem, DfiRbfError> {
    let num_points = points.len();
    assert_eq!(vectors.nrows(), num_points);
    assert_eq!(vectors.ncols(), 3);

    let dim = 3 * num_points;
    let num_entries = dim
        .checked_mul(dim)
        .ok_or(DfiRbfError::AllocationFailure { num_entries: usize::MAX })?;

    let mut a_matrix: Vec<f64> = Vec::new();
    a_matrix
        .try_reserve_exact(num_entries)
        .map_err(|_| DfiRbfError::AllocationFailure { num_entries })?;
    a_matrix.resize(num_entries, 0.0);

    let lower_only = strategy == AssemblyStrategy::Symmetric;

    if num_points > 0 {
        let block_column_len = 3 * dim;

        if parallel {
            a_matrix
                .par_chunks_mut(block_column_len)
                .enumerate()
                .for_each(|(j, column)| fill_block_column(kernel, points, j, column, lower_only));
        } else {
            a_matrix
                .chunks_mut(block_column_len)
                .enumerate()
                .for_each(|(j, column)| fill_block_column(kernel, points, j, column, lower_only));
        }
    }

    if lower_only {
        mirror_lower_to_upper(&mut a_matrix, dim);
    }

    let rhs = Mat::from_fn(dim, 1, |r, _| vectors[(r / 3, r % 3)]);

    Ok(AssembledSystem { a_matrix, rhs, dim })
}

/// Writes block column `j` into `column`, a `dim × 3` column-major slice.
#[inline]
fn fill_block_column<K: MatrixKernelFunction>(
    kernel: &K,
    points: &[Vector3],
    j: usize,
    column: &mut [f64],
    lower_only: bool,
) {
    let dim = 3 * points.len();
    let source = &points[j];
    let first_row = if lower_only { j } else { 0 };

    for (i, target) in points.iter().enumerate().skip(first_row) {
        let block = kernel.evaluate(target, source);
        for c in 0..3 {
            for r in 0..3 {
                column[c * dim + 3 * i + r] = block[r][c];
            }
        }
    }
}

/// Copies the lower block triangle into the upper block triangle.
fn mirror_lower_to_upper(a_matrix: &mut [f64], dim: usize) {
    for col in 0..dim {
        let block_row_start = 3 * (col / 3);
        for row in 0..block_row_start {
            a_matrix[col * dim + row] = a_matrix[row * dim + col];
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dfi_rbf_utils::kernels::DivergenceFreeGaussianKernel;
    use rand::{Rng, SeedableRng, rngs::StdRng};

    fn random_points(n: usize, seed: u64) -> Vec<Vector3> {
        let mut rng = StdRng::seed_from_u64(seed);
        (0..n)
            .map(|_| {
                [
                    rng.random_range(0.0..4.0),
                    rng.random_range(0.0..4.0),
                    rng.random_range(0.0..4.0),
                ]
            })
            .collect()
    }

    fn random_vectors(n: usize, seed: u64) -> Mat<f64> {
        let mut rng = StdRng::seed_from_u64(seed);
        Mat::from_fn(n, 3, |_, _| rng.random_range(-1.0..1.0))
    }

    #[test]
    fn blocks_match_kernel_and_rhs_is_interleaved() {
        let kernel = DivergenceFreeGaussianKernel::new(0.7);
        let points = random_points(5, 1);
        let vectors = random_vectors(5, 2);

        let system =
            assemble_system(&kernel, &points, &vectors, AssemblyStrategy::Full, false).unwrap();
        let a = system.matrix();

        assert_eq!(system.dim, 15);
        for i in 0..5 {
            for j in 0..5 {
                let block = kernel.evaluate(&points[i], &points[j]);
                for r in 0..3 {
                    for c in 0..3 {
                        assert_eq!(a[(3 * i + r, 3 * j + c)], block[r][c]);
                    }
                }
            }
            for k in 0..3 {
                assert_eq!(system.rhs[(3 * i + k, 0)], vectors[(i, k)]);
            }
        }
    }

    #[test]
    fn assembled_matrix_is_symmetric() {
        let kernel = DivergenceFreeGaussianKernel::new(1.3);
        let points = random_points(8, 3);
        let vectors = random_vectors(8, 4);

        let system =
            assemble_system(&kernel, &points, &vectors, AssemblyStrategy::Full, false).unwrap();
        let a = system.matrix();

        for r in 0..system.dim {
            for c in 0..system.dim {
                assert_eq!(a[(r, c)], a[(c, r)]);
            }
        }
    }

    #[test]
    fn symmetric_strategy_matches_full() {
        let kernel = DivergenceFreeGaussianKernel::new(0.9);
        let points = random_points(11, 5);
        let vectors = random_vectors(11, 6);

        let full =
            assemble_system(&kernel, &points, &vectors, AssemblyStrategy::Full, false).unwrap();
        let symmetric =
            assemble_system(&kernel, &points, &vectors, AssemblyStrategy::Symmetric, false)
                .unwrap();

        assert_eq!(full.a_matrix, symmetric.a_matrix);
        assert_eq!(full.rhs, symmetric.rhs);
    }

    #[test]
    fn parallel_fill_matches_sequential() {
        let kernel = DivergenceFreeGaussianKernel::new(0.5);
        let points = random_points(17, 7);
        let vectors = random_vectors(17, 8);

        for strategy in [AssemblyStrategy::Full, AssemblyStrategy::Symmetric] {
            let sequential = assemble_system(&kernel, &points, &vectors, strategy, false).unwrap();
            let parallel = assemble_system(&kernel, &points, &vectors, strategy, true).unwrap();
            assert_eq!(sequential.a_matrix, parallel.a_matrix);
        }
    }

    #[test]
    fn single_point_system_is_the_diagonal_block() {
        let eps = 2.0;
        let kernel = DivergenceFreeGaussianKernel::new(eps);
        let points = vec![[1.0, -2.0, 0.5]];
        let vectors = Mat::from_fn(1, 3, |_, k| k as f64);

        let system =
            assemble_system(&kernel, &points, &vectors, AssemblyStrategy::Symmetric, false)
                .unwrap();

        let f = 4.0 * eps;
        assert_eq!(
            system.a_matrix,
            vec![f, 0.0, 0.0, 0.0, f, 0.0, 0.0, 0.0, f]
        );
    }

    #[test]
    #[should_panic]
    fn mismatched_vector_rows_panic() {
        let kernel = DivergenceFreeGaussianKernel::new(1.0);
        let points = random_points(4, 3);
        let vectors = random_vectors(3, 4);

        let _ = assemble_system(&kernel, &points, &vectors, AssemblyStrategy::Full, false);
    }
}
