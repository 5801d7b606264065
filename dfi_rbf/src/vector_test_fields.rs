/////////////////////////////////////////////////////////////////////////////////////////////
//
// Provides analytic divergence-free vector fields for validating and demonstrating interpolation.
//
// Created on: 15 Nov 2025     Author: Daniel Owen
//
// Copyright (c) 2025, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

//! Solenoidal test fields. Each takes an `N × 3` point matrix and returns the
//! `N × 3` field values at those points.
use faer::Mat;

/// Struct that implements analytic divergence-free 3D vector fields for testing
/// vector interpolation.
pub struct VectorTestFields;

impl VectorTestFields {
    /// Point dipole at the origin with moment `m`:
    /// <div>
    /// $$
    /// \mathbf{B}(\mathbf{r}) = \frac{3(\mathbf{m}\cdot\hat{\mathbf{r}})\hat{\mathbf{r}} - \mathbf{m}}{|\mathbf{r}|^3}
    /// $$
    /// </div>
    ///
    /// Divergence-free everywhere except the origin, where it is singular.
    pub fn dipole(points: &Mat<f64>, moment: [f64; 3]) -> Mat<f64> {
        assert_eq!(points.ncols(), 3);

        Mat::from_fn(points.nrows(), 3, |i, k| {
            let r = [points[(i, 0)], points[(i, 1)], points[(i, 2)]];
            let r2 = r[0] * r[0] + r[1] * r[1] + r[2] * r[2];
            let r_len = r2.sqrt();
            let m_dot_r = moment[0] * r[0] + moment[1] * r[1] + moment[2] * r[2];

            (3.0 * m_dot_r * r[k] / r2 - moment[k]) / (r2 * r_len)
        })
    }

    /// Arnold-Beltrami-Childress flow:
    /// <div>
    /// $$
    /// \mathbf{u} = (A\sin z + C\cos y,\; B\sin x + A\cos z,\; C\sin y + B\cos x)
    /// $$
    /// </div>
    pub fn abc_flow(points: &Mat<f64>, a: f64, b: f64, c: f64) -> Mat<f64> {
        assert_eq!(points.ncols(), 3);

        Mat::from_fn(points.nrows(), 3, |i, k| {
            let (x, y, z) = (points[(i, 0)], points[(i, 1)], points[(i, 2)]);
            match k {
                0 => a * z.sin() + c * y.cos(),
                1 => b * x.sin() + a * z.cos(),
                _ => c * y.sin() + b * x.cos(),
            }
        })
    }

    /// Constant field `value` at every point.
    pub fn uniform(points: &Mat<f64>, value: [f64; 3]) -> Mat<f64> {
        Mat::from_fn(points.nrows(), 3, |_, k| value[k])
    }
}
