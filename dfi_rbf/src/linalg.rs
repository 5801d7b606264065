/////////////////////////////////////////////////////////////////////////////////////////////
//
// Adds the symmetric positive definite solvers used for the interpolation system.
//
// Created on: 15 Nov 2025     Author: Daniel Owen
//
// Copyright (c) 2025, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

//! # linalg
//!
//! Dense Cholesky solvers for the `3N × 3N` interpolation system.
//!
//! The assembled matrix is handed over as a column-major `Vec<f64>` so that the
//! in-place solver can factorise it without a second allocation.

use crate::config::Solvers;
use faer::{
    Mat, Par, Side,
    dyn_stack::{MemBuffer, MemStack},
    linalg::{cholesky::llt, triangular_solve},
    mat::*,
    prelude::*,
    reborrow::ReborrowMut,
};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FactorizationError {
    /// LLᵀ failed (matrix not SPD or numerically indefinite).
    NotSpd { dimension: usize },
}

impl fmt::Display for FactorizationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FactorizationError::NotSpd { dimension } => write!(
                f,
                "Cholesky factorisation failed: the {dimension} x {dimension} matrix is not numerically positive definite"
            ),
        }
    }
}

impl std::error::Error for FactorizationError {}

/// A solver for `A x = b` where `A` is symmetric positive definite.
///
/// `a_matrix` holds `A` in column-major order with `dim` rows and columns.
/// Only the lower triangle is read. Implementations may overwrite the buffer.
///
/// # Panics
/// The provided solvers panic if `a_matrix.len() != dim * dim` or
/// `rhs.nrows() != dim`.
pub trait SpdSolver: Send + Sync {
    fn solve(
        &self,
        a_matrix: &mut [f64],
        dim: usize,
        rhs: MatRef<'_, f64>,
    ) -> Result<Mat<f64>, FactorizationError>;
}

/// Cholesky factorisation computed in place on the caller's buffer.
///
/// After a successful solve the lower triangle of the buffer holds `L`.
#[derive(Debug, Clone, Copy)]
pub struct CholeskySolver {
    pub par: Par,
}

impl SpdSolver for CholeskySolver {
    #[allow(non_snake_case)]
    fn solve(
        &self,
        a_matrix: &mut [f64],
        dim: usize,
        rhs: MatRef<'_, f64>,
    ) -> Result<Mat<f64>, FactorizationError> {
        assert_eq!(a_matrix.len(), dim * dim);
        assert_eq!(rhs.nrows(), dim);

        let cholesky_memory = llt::factor::cholesky_in_place_scratch::<f64>(dim, self.par, default());
        let mut memory = MemBuffer::new(cholesky_memory);
        let stack = MemStack::new(&mut memory);

        let mut L = MatMut::from_column_major_slice_mut(a_matrix, dim, dim);

        llt::factor::cholesky_in_place(L.rb_mut(), default(), self.par, stack, default())
            .map_err(|_| FactorizationError::NotSpd { dimension: dim })?;

        let L = L.into_const();
        let mut X = rhs.to_owned();

        // Forward substitution: L Y = B
        triangular_solve::solve_lower_triangular_in_place(L, X.rb_mut(), self.par);

        // Backward substitution: L.T X = Y
        triangular_solve::solve_upper_triangular_in_place(L.transpose(), X.rb_mut(), self.par);

        Ok(X)
    }
}

/// faer's owned `LLᵀ` decomposition. Leaves the caller's buffer untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct DenseCholeskySolver;

impl SpdSolver for DenseCholeskySolver {
    fn solve(
        &self,
        a_matrix: &mut [f64],
        dim: usize,
        rhs: MatRef<'_, f64>,
    ) -> Result<Mat<f64>, FactorizationError> {
        assert_eq!(a_matrix.len(), dim * dim);
        assert_eq!(rhs.nrows(), dim);

        let a = MatRef::from_column_major_slice(a_matrix, dim, dim).to_owned();
        let chol = a
            .llt(Side::Lower)
            .map_err(|_| FactorizationError::NotSpd { dimension: dim })?;

        let b = rhs.to_owned();
        Ok(chol.solve(&b))
    }
}

/// Returns the solver matching a [`Solvers`] selection.
pub fn get_solver(solver_type: Solvers, par: Par) -> Box<dyn SpdSolver> {
    match solver_type {
        Solvers::InPlaceCholesky => Box::new(CholeskySolver { par }),
        Solvers::DenseCholesky => Box::new(DenseCholeskySolver),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use equator::assert;
    use faer::{self, prelude::Solve, utils::approx::*};

    /// Deterministic SPD matrix: A = M M^T + alpha I.
    fn make_spd(n: usize, alpha: f64) -> Mat<f64> {
        let mut m = Mat::<f64>::zeros(n, n);
        for i in 0..n {
            for j in 0..n {
                let x = (i as f64 + 1.0) * (j as f64 + 2.0);
                m[(i, j)] = (x.sin() + 2.0 * x.cos()) / (1.0 + (i + j + 1) as f64);
            }
        }
        let mut a = &m * m.transpose();
        for i in 0..n {
            a[(i, i)] += alpha.max(1e-3);
        }
        a
    }

    fn to_column_major(a: &Mat<f64>) -> Vec<f64> {
        let n = a.nrows();
        let mut buffer = Vec::with_capacity(n * n);
        for j in 0..a.ncols() {
            for i in 0..n {
                buffer.push(a[(i, j)]);
            }
        }
        buffer
    }

    #[test]
    fn in_place_cholesky_matches_standard() {
        let n = 9usize;
        let a = make_spd(n, 1e-2);
        let b = Mat::<f64>::from_fn(n, 1, |i, _| ((i + 2) as f64).sin());

        let mut buffer = to_column_major(&a);
        let x = CholeskySolver { par: Par::Seq }
            .solve(&mut buffer, n, b.as_ref())
            .expect("LLᵀ should succeed for SPD");

        let x_std = a.llt(Side::Lower).unwrap().solve(&b);

        let approx_eq = CwiseMat(ApproxEq::eps() * 128.0 * (n as f64));

        assert!(&a * &x ~ b);
        assert!(&x ~ &x_std);
    }

    #[test]
    fn in_place_cholesky_only_reads_lower_triangle() {
        let n = 6usize;
        let a = make_spd(n, 1.0);
        let b = Mat::<f64>::from_fn(n, 1, |i, _| (i + 1) as f64);

        let mut clean = to_column_major(&a);
        let mut scrambled = clean.clone();
        for j in 0..n {
            for i in 0..j {
                scrambled[j * n + i] = f64::NAN;
            }
        }

        let solver = CholeskySolver { par: Par::Seq };
        let x_clean = solver.solve(&mut clean, n, b.as_ref()).unwrap();
        let x_scrambled = solver.solve(&mut scrambled, n, b.as_ref()).unwrap();

        assert!(x_clean == x_scrambled);
    }

    #[test]
    fn dense_cholesky_matches_in_place() {
        let n = 12usize;
        let a = make_spd(n, 1e-2);
        let b = Mat::<f64>::from_fn(n, 1, |i, _| (i + 1) as f64 / (1.0 + i as f64));

        let mut buffer = to_column_major(&a);
        let x_dense = DenseCholeskySolver
            .solve(&mut buffer.clone(), n, b.as_ref())
            .unwrap();
        let x_in_place = CholeskySolver { par: Par::Seq }
            .solve(&mut buffer, n, b.as_ref())
            .unwrap();

        let approx_eq = CwiseMat(ApproxEq::eps() * 128.0 * (n as f64));

        assert!(&a * &x_dense ~ b);
        assert!(&x_dense ~ &x_in_place);
    }

    #[test]
    fn indefinite_matrix_is_rejected() {
        let n = 3usize;
        let mut a = make_spd(n, 1.0);
        a[(1, 1)] = -5.0;
        let b = Mat::<f64>::from_fn(n, 1, |_, _| 1.0);

        for solver_type in [Solvers::InPlaceCholesky, Solvers::DenseCholesky] {
            let mut buffer = to_column_major(&a);
            let result = get_solver(solver_type, Par::Seq).solve(&mut buffer, n, b.as_ref());
            assert!(result.err() == Some(FactorizationError::NotSpd { dimension: n }));
        }
    }

    #[test]
    #[should_panic]
    fn short_buffer_panics() {
        let n = 4usize;
        let a = make_spd(n, 1.0);
        let b = Mat::<f64>::from_fn(n, 1, |_, _| 1.0);

        let mut buffer = to_column_major(&a);
        buffer.pop();
        let _ = CholeskySolver { par: Par::Seq }.solve(&mut buffer, n, b.as_ref());
    }

    #[test]
    #[should_panic]
    fn mismatched_rhs_rows_panic() {
        let n = 4usize;
        let a = make_spd(n, 1.0);
        let b = Mat::<f64>::from_fn(n + 1, 1, |_, _| 1.0);

        let mut buffer = to_column_major(&a);
        let _ = DenseCholeskySolver.solve(&mut buffer, n, b.as_ref());
    }
}
