/////////////////////////////////////////////////////////////////////////////////////////////
//
// Re-exports kernel utilities and helper functions used across the dfi_rbf crates.
//
// Created on: 15 Nov 2025     Author: Daniel Owen
//
// Copyright (c) 2025, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

//! # Utilities for the [`dfi_rbf`] crate
//!
//! Holds the divergence-free matrix-valued kernel, its parameter set, and the
//! small point helpers shared by the assembler and the evaluator.
//!
//! [`dfi_rbf`]: https://docs.rs/dfi_rbf
mod kernel_helpers;
mod rbf_kernels;
mod traits;
mod utils;

/// A position or vector value in 3D.
pub type Vector3 = [f64; 3];

/// A dense 3×3 kernel block, indexed `block[row][col]`.
pub type Block3 = [[f64; 3]; 3];

/// Implemented kernels for use in the [`dfi_rbf`] crate.
///
/// [`dfi_rbf`]: https://docs.rs/dfi_rbf
pub mod kernels {
    pub use super::rbf_kernels::*;
}

pub use {
    kernel_helpers::{KernelParams, KernelParamsBuilder},
    rbf_kernels::kernel_phi,
    traits::{KernelFromParams, MatrixKernelFunction},
    utils::{
        get_distance_inf, point_row, row_is_finite, select_mat_rows,
        to_vector3_rows,
    },
};
