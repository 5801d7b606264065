/////////////////////////////////////////////////////////////////////////////////////////////
//
// Implements the divergence-free matrix-valued Gaussian RBF kernel and its derivatives.
//
// Created on: 15 Nov 2025     Author: Daniel Owen
//
// Copyright (c) 2025, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

//! The kernel is the matrix form of `{∇∇ᵀ - ∇²I}` applied to the scalar Gaussian
//! `ψ(r) = exp(-ε r²)`. Writing `d = x - x₀`, `f = 4ε` and `g = 4ε²`:
//!
//! ```text
//! Φ(d) = ψ · [ (f - g |d|²) I + g d dᵀ ]
//! ```
//!
//! Every column of `Φ` is a divergence-free vector field in `x`, so any linear
//! combination `Σ Φ(x - xⱼ) cⱼ` is divergence-free too.
//!
//! # References
//! 1. McNally, C. P. (2011). Divergence-free interpolation of vector fields from
//!    point values - exact ∇·B = 0 in numerical simulations. MNRAS 413, L76-L80.
//! 2. Lowitzsch, S. (2005). Error estimates for matrix-valued radial basis function
//!    interpolation. J. Approx. Theory 137, 238-249.

use crate::{Block3, KernelFromParams, KernelParams, MatrixKernelFunction, Vector3};

/// Divergence-free matrix-valued kernel built from a Gaussian scalar RBF.
#[derive(Clone, Debug, Copy, PartialEq)]
pub struct DivergenceFreeGaussianKernel {
    // user input
    pub shape_parameter: f64,

    // derived (computed once)
    f: f64, // 4 eps
    g: f64, // 4 eps^2
}

impl DivergenceFreeGaussianKernel {
    /// Creates the kernel for shape parameter `eps`.
    ///
    /// `eps` must be strictly positive; `eps == 0` collapses every block to zero.
    #[inline(always)]
    pub fn new(shape_parameter: f64) -> Self {
        let f = 4.0 * shape_parameter;
        Self {
            shape_parameter,
            f,
            g: f * shape_parameter,
        }
    }

    /// Scalar Gaussian `exp(-eps * r2)`.
    #[inline(always)]
    pub fn psi(&self, r2: f64) -> f64 {
        (-self.shape_parameter * r2).exp()
    }

    /// Returns the 3×3 kernel block for the displacement `d = target - source`.
    #[inline(always)]
    pub fn phi(&self, displacement: &Vector3) -> Block3 {
        let [x, y, z] = *displacement;

        let (x2, y2, z2) = (x * x, y * y, z * z);
        let (xy, xz, yz) = (x * y, x * z, y * z);
        let psi = self.psi(x2 + y2 + z2);
        let g = self.g;

        let p01 = g * xy * psi;
        let p02 = g * xz * psi;
        let p12 = g * yz * psi;

        [
            [(self.f - g * (y2 + z2)) * psi, p01, p02],
            [p01, (self.f - g * (x2 + z2)) * psi, p12],
            [p02, p12, (self.f - g * (x2 + y2)) * psi],
        ]
    }

    /// Jacobian of the single weighted term `Φ(x - source) · weight` with respect
    /// to `x`, evaluated at `x = target`.
    ///
    /// Entry `[i][k]` is `∂(Φ c)ᵢ / ∂x_k`. With `w = Φ c`:
    ///
    /// ```text
    /// J_ik = -2ε d_k w_i + g ψ (-2 d_k c_i + δ_ik (d·c) + d_i c_k)
    /// ```
    ///
    /// The trace vanishes identically.
    #[inline]
    pub fn jacobian_contribution(
        &self,
        target: &Vector3,
        source: &Vector3,
        weight: &Vector3,
    ) -> Block3 {
        let d = displacement(target, source);
        let psi = self.psi(dot(&d, &d));
        let w = mat_vec(&self.phi(&d), weight);
        let d_dot_c = dot(&d, weight);
        let two_eps = 2.0 * self.shape_parameter;
        let g_psi = self.g * psi;

        let mut jacobian = [[0.0; 3]; 3];
        for (i, row) in jacobian.iter_mut().enumerate() {
            for (k, entry) in row.iter_mut().enumerate() {
                let delta = if i == k { d_dot_c } else { 0.0 };
                *entry = -two_eps * d[k] * w[i]
                    + g_psi * (-2.0 * d[k] * weight[i] + delta + d[i] * weight[k]);
            }
        }
        jacobian
    }
}

impl MatrixKernelFunction for DivergenceFreeGaussianKernel {
    #[inline(always)]
    fn evaluate(&self, target: &Vector3, source: &Vector3) -> Block3 {
        self.phi(&displacement(target, source))
    }
}

impl KernelFromParams for DivergenceFreeGaussianKernel {
    #[inline(always)]
    fn from_params(p: &KernelParams) -> Self {
        Self::new(p.shape_parameter)
    }
}

/// Evaluates the kernel block `Φ(target, source)` for the given parameters.
///
/// # Examples
///
/// ```
/// use dfi_rbf_utils::{kernel_phi, KernelParams};
///
/// let params = KernelParams::builder().shape_parameter(0.5).build();
/// let phi = kernel_phi(&[0.0, 0.0, 0.0], &[0.0, 0.0, 0.0], &params);
///
/// // At zero displacement the block is 4 * eps * I.
/// assert_eq!(phi, [[2.0, 0.0, 0.0], [0.0, 2.0, 0.0], [0.0, 0.0, 2.0]]);
/// ```
#[inline(always)]
pub fn kernel_phi(target: &Vector3, source: &Vector3, params: &KernelParams) -> Block3 {
    DivergenceFreeGaussianKernel::from_params(params).evaluate(target, source)
}

/// Returns `target - source`.
#[inline(always)]
pub fn displacement(target: &Vector3, source: &Vector3) -> Vector3 {
    [
        target[0] - source[0],
        target[1] - source[1],
        target[2] - source[2],
    ]
}

/// Returns the dot product of two 3-vectors.
#[inline(always)]
pub fn dot(a: &Vector3, b: &Vector3) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

/// Multiplies a 3×3 block by a 3-vector.
#[inline(always)]
pub fn mat_vec(block: &Block3, v: &Vector3) -> Vector3 {
    [dot(&block[0], v), dot(&block[1], v), dot(&block[2], v)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn random_vector(rng: &mut StdRng) -> Vector3 {
        [
            rng.random_range(-2.0..2.0),
            rng.random_range(-2.0..2.0),
            rng.random_range(-2.0..2.0),
        ]
    }

    #[test]
    fn phi_is_symmetric_and_sign_invariant() {
        let mut rng = StdRng::seed_from_u64(7);

        for eps in [0.1, 0.5, 1.0, 3.0] {
            let kernel = DivergenceFreeGaussianKernel::new(eps);

            for _ in 0..50 {
                let v = random_vector(&mut rng);
                let v0 = random_vector(&mut rng);

                let forward = kernel.evaluate(&v, &v0);
                let backward = kernel.evaluate(&v0, &v);

                for p in 0..3 {
                    for q in 0..3 {
                        assert_eq!(forward[p][q], forward[q][p]);
                        assert_eq!(forward[p][q], backward[p][q]);
                    }
                }
            }
        }
    }

    #[test]
    fn phi_matches_component_formulas() {
        let eps = 0.7;
        let kernel = DivergenceFreeGaussianKernel::new(eps);
        let (x, y, z) = (0.3, -1.1, 0.45);

        let phi = kernel.evaluate(&[x, y, z], &[0.0, 0.0, 0.0]);

        let psi = (-eps * (x * x + y * y + z * z)).exp();
        let f = 4.0 * eps;
        let g = 4.0 * eps * eps;

        let expected = [
            [(f - g * (y * y + z * z)) * psi, g * x * y * psi, g * x * z * psi],
            [g * x * y * psi, (f - g * (x * x + z * z)) * psi, g * y * z * psi],
            [g * x * z * psi, g * y * z * psi, (f - g * (x * x + y * y)) * psi],
        ];

        for p in 0..3 {
            for q in 0..3 {
                assert!((phi[p][q] - expected[p][q]).abs() < 1e-14);
            }
        }
    }

    #[test]
    fn phi_depends_only_on_displacement() {
        let kernel = DivergenceFreeGaussianKernel::new(1.3);
        let shift = [10.0, -4.0, 2.5];

        let a = kernel.evaluate(&[0.2, 0.1, -0.3], &[-0.4, 0.6, 0.0]);
        let b = kernel.evaluate(
            &[0.2 + shift[0], 0.1 + shift[1], -0.3 + shift[2]],
            &[-0.4 + shift[0], 0.6 + shift[1], 0.0 + shift[2]],
        );

        for p in 0..3 {
            for q in 0..3 {
                assert!((a[p][q] - b[p][q]).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn phi_decays_far_from_source() {
        let kernel = DivergenceFreeGaussianKernel::new(1.0);
        let phi = kernel.evaluate(&[100.0, 100.0, 100.0], &[0.0, 0.0, 0.0]);

        for row in phi.iter() {
            for value in row.iter() {
                assert_eq!(*value, 0.0);
            }
        }
    }

    #[test]
    fn from_params_matches_new() {
        let params = KernelParams::builder().shape_parameter(2.5).build();
        let kernel = DivergenceFreeGaussianKernel::from_params(&params);

        assert_eq!(kernel, DivergenceFreeGaussianKernel::new(2.5));
        assert_eq!(
            kernel_phi(&[1.0, 0.0, 0.0], &[0.0, 1.0, 0.0], &params),
            kernel.evaluate(&[1.0, 0.0, 0.0], &[0.0, 1.0, 0.0])
        );
    }

    #[test]
    fn jacobian_has_zero_trace() {
        let mut rng = StdRng::seed_from_u64(11);
        let kernel = DivergenceFreeGaussianKernel::new(0.8);

        for _ in 0..100 {
            let target = random_vector(&mut rng);
            let source = random_vector(&mut rng);
            let weight = random_vector(&mut rng);

            let jacobian = kernel.jacobian_contribution(&target, &source, &weight);
            let trace = jacobian[0][0] + jacobian[1][1] + jacobian[2][2];

            assert!(trace.abs() < 1e-12, "trace = {trace}");
        }
    }

    #[test]
    fn jacobian_matches_central_differences() {
        let mut rng = StdRng::seed_from_u64(3);
        let kernel = DivergenceFreeGaussianKernel::new(0.6);
        let h = 1e-5;

        for _ in 0..20 {
            let target = random_vector(&mut rng);
            let source = random_vector(&mut rng);
            let weight = random_vector(&mut rng);

            let jacobian = kernel.jacobian_contribution(&target, &source, &weight);

            for k in 0..3 {
                let mut plus = target;
                let mut minus = target;
                plus[k] += h;
                minus[k] -= h;

                let f_plus = mat_vec(&kernel.evaluate(&plus, &source), &weight);
                let f_minus = mat_vec(&kernel.evaluate(&minus, &source), &weight);

                for i in 0..3 {
                    let numeric = (f_plus[i] - f_minus[i]) / (2.0 * h);
                    assert!(
                        (numeric - jacobian[i][k]).abs() < 1e-6,
                        "d{i}/dx{k}: numeric {numeric}, analytic {}",
                        jacobian[i][k]
                    );
                }
            }
        }
    }
}
