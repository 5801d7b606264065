/////////////////////////////////////////////////////////////////////////////////////////////
//
// Declares traits for matrix-valued kernels and shared kernel parameter sets.
//
// Created on: 15 Nov 2025     Author: Daniel Owen
//
// Copyright (c) 2025, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

use crate::{kernel_helpers::KernelParams, Block3, Vector3};

/// Converts a shared [`KernelParams`] configuration into a concrete kernel type.
pub trait KernelFromParams: Sized {
    /// Constructs `Self` from a set of uniform kernel parameters.
    fn from_params(p: &KernelParams) -> Self;
}

/// Evaluates a 3×3 matrix-valued kernel between a target and source point.
///
/// Implementors must be pure: the block assembler and the evaluator call
/// `evaluate` from several threads at once and rely on the same inputs always
/// producing the same block.
pub trait MatrixKernelFunction: Sync {
    fn evaluate(&self, target: &Vector3, source: &Vector3) -> Block3;
}
