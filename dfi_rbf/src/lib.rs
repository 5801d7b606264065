/////////////////////////////////////////////////////////////////////////////////////////////
//
// Exposes the public API and high-level documentation for divergence-free RBF interpolation.
//
// Created on: 15 Nov 2025     Author: Daniel Owen
//
// Copyright (c) 2025, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

//! # Divergence-free Radial Basis Function (RBF) interpolation of 3D vector fields.
//!
//! Many physical vector fields are solenoidal: magnetic fields, incompressible
//! velocity fields, and current densities all satisfy `∇·u = 0`. Interpolating
//! each component independently with a scalar RBF reproduces the samples but
//! breaks this constraint, which shows up downstream as spurious sources and
//! sinks (for example, field lines that drift when traced).
//!
//! This crate fits an interpolant that is divergence-free **by construction**.
//! Following `1` and `2`, the matrix-valued kernel
//!
//! ```text
//! Φ(x) = (∇∇ᵀ - ∇²I) ψ(|x|),   ψ(r) = exp(-ε r²)
//! ```
//!
//! has divergence-free columns, so any weighted sum `s(x) = Σ_j Φ(x - x_j) c_j`
//! is divergence-free too. The weights come from a dense symmetric positive
//! definite `3N × 3N` system solved with a Cholesky factorisation from
//! [`faer`](https://docs.rs/faer/latest/faer/).
//!
//! The direct solve needs **O(N²)** memory and **O(N³)** operations, which suits
//! datasets of up to a few thousand samples.
//!
//! # Features
//! - Exact reproduction of the input vectors at the sample positions
//! - Analytic Jacobian, divergence, and curl of the fitted field
//! - Symmetric (half) or full assembly, optionally multi-threaded via rayon
//! - In-place or owned dense Cholesky backends
//! - Duplicate position detection and removal
//! - Versioned JSON model persistence
//!
//! # Examples
//!
//! ```
//! use dfi_rbf::{
//!     DfiRbfInterpolator,
//!     interpolant_config::InterpolantSettings,
//!     generate_random_points,
//!     VectorTestFields,
//! };
//!
//! // Generate some random positions in the unit cube
//! let source_points = generate_random_points(30, 3, Some(42));
//!
//! // Sample a divergence-free flow at those positions
//! let source_vectors = VectorTestFields::abc_flow(&source_points, 1.0, 0.7, 0.4);
//!
//! // Choose the kernel shape parameter
//! let interpolant_settings = InterpolantSettings::builder(10.0).build();
//!
//! // Setup and solve the RBF
//! let rbfi = DfiRbfInterpolator::builder(source_points, source_vectors, interpolant_settings)
//!     .build()?;
//!
//! // The fitted field reproduces the samples
//! let fitted = rbfi.evaluate_at_source();
//! let max_diff = (0..rbfi.num_points())
//!     .flat_map(|i| (0..3).map(move |k| (i, k)))
//!     .fold(0.0f64, |acc, (i, k)| acc.max((fitted[(i, k)] - rbfi.vectors()[(i, k)]).abs()));
//! assert!(max_diff < 1e-6);
//!
//! // ...and has no divergence anywhere
//! assert!(rbfi.divergence_at([0.3, 0.6, 0.2]).abs() < 1e-6);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # References
//! 1.  F. J. Narcowich and J. D. Ward. Generalized Hermite interpolation via
//!     matrix-valued conditionally positive definite functions. Math. Comp.
//!     63(208):661–687, 1994.
//! 2.  E. J. Fuselier. Refined error estimates for matrix-valued radial basis
//!     functions. PhD thesis, Texas A&M University, 2006.
//! 3.  C. P. McNally. Divergence-free interpolation of vector fields from point
//!     values: exact ∇·B = 0 in numerical simulations. MNRAS 413(1):L76–L80, 2011.
pub mod interpolant_config;

mod common;

mod rbf;

mod assembly;

mod linalg;

pub mod progress;

pub mod config;

mod vector_test_fields;

pub use {
    assembly::{AssembledSystem, assemble_system},
    common::{create_evaluation_grid, generate_random_points},
    linalg::{CholeskySolver, DenseCholeskySolver, FactorizationError, SpdSolver},
    rbf::{
        DfiRbfError, DfiRbfInterpolator, DfiRbfInterpolatorBuilder, DfiRbfResult, ModelIOError,
        ModelIOResult, SingularReason,
    },
    vector_test_fields::VectorTestFields,
};
