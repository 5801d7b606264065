/////////////////////////////////////////////////////////////////////////////////////////////
//
// Declares configuration types for system assembly, factorisation, and duplicate handling.
//
// Created on: 15 Nov 2025     Author: Daniel Owen
//
// Copyright (c) 2025, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

//! Declares configuration types for system assembly, factorisation, and duplicate handling.
use serde::{Deserialize, Serialize};

/// Enum for the available symmetric positive definite solvers.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum Solvers {
    /// Cholesky factorisation performed in place on the assembled buffer,
    /// followed by forward and backward triangular solves. Holds a single
    /// copy of the `3N × 3N` matrix.
    #[default]
    InPlaceCholesky,

    /// faer's dense `LLᵀ` decomposition. Copies the assembled matrix into
    /// solver-owned storage before factorising.
    DenseCholesky,
}

/// How the `3N × 3N` block matrix is filled.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum AssemblyStrategy {
    /// Evaluate the kernel for every ordered pair of samples.
    Full,

    /// Evaluate the kernel for the lower block triangle only and mirror it into
    /// the upper triangle. Produces the same matrix as [`AssemblyStrategy::Full`]
    /// with roughly half the kernel evaluations.
    #[default]
    Symmetric,
}

/// What to do when two samples share (or nearly share) a position.
///
/// Coincident positions make the kernel matrix singular, so they can never be
/// solved as-is.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum DuplicatePolicy {
    /// Fail construction with [`crate::DfiRbfError::SingularSystem`].
    #[default]
    Reject,

    /// Keep the first sample of each duplicate group and drop the rest.
    Remove,
}

/// Solver and algorithm parameters for [`crate::DfiRbfInterpolator`].
///
/// ### Default Values
/// - `solver_type`: [`Solvers::InPlaceCholesky`]
/// - `assembly`: [`AssemblyStrategy::Symmetric`]
/// - `parallel`: `false`
/// - `duplicate_policy`: [`DuplicatePolicy::Reject`]
/// - `duplicate_tolerance`: `0.0`
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq)]
pub struct Params {
    /// Solver used for the assembled system.
    pub solver_type: Solvers,

    /// Block matrix fill strategy.
    pub assembly: AssemblyStrategy,

    /// Fill block columns on the rayon thread pool and let the factorisation
    /// use faer's global parallelism. The parallel fill produces the same
    /// matrix as the sequential one; the parallel solve agrees to rounding.
    pub parallel: bool,

    /// Handling of coincident sample positions.
    pub duplicate_policy: DuplicatePolicy,

    /// Two positions whose infinity-norm separation is at most this value are
    /// treated as duplicates. `0.0` only catches exact duplicates.
    pub duplicate_tolerance: f64,
}

impl Default for Params {
    fn default() -> Self {
        Params::builder().build()
    }
}

impl Params {
    /// Returns a new [`ParamsBuilder`] populated with defaults.
    pub fn builder() -> ParamsBuilder {
        ParamsBuilder::new()
    }
}

/// A convenience builder for constructing a [`Params`] instance.
///
/// The builder should be called via the [`Params::builder`] method.
///
/// See [`Params`] for details on each field.
#[derive(Debug, Clone)]
pub struct ParamsBuilder {
    pub solver_type: Solvers,
    pub assembly: AssemblyStrategy,
    pub parallel: bool,
    pub duplicate_policy: DuplicatePolicy,
    pub duplicate_tolerance: f64,
}

impl ParamsBuilder {
    /// Creates a new builder with default values.
    fn new() -> Self {
        Self {
            solver_type: Solvers::default(),
            assembly: AssemblyStrategy::default(),
            parallel: false,
            duplicate_policy: DuplicatePolicy::default(),
            duplicate_tolerance: 0.0,
        }
    }

    /// Sets the solver type.
    pub fn solver_type(mut self, solver_type: Solvers) -> Self {
        self.solver_type = solver_type;
        self
    }

    /// Sets the assembly strategy.
    pub fn assembly(mut self, assembly: AssemblyStrategy) -> Self {
        self.assembly = assembly;
        self
    }

    /// Enables or disables multi-threaded assembly and factorisation.
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Sets the duplicate handling policy.
    pub fn duplicate_policy(mut self, duplicate_policy: DuplicatePolicy) -> Self {
        self.duplicate_policy = duplicate_policy;
        self
    }

    /// Sets the distance below which two positions count as duplicates.
    pub fn duplicate_tolerance(mut self, duplicate_tolerance: f64) -> Self {
        self.duplicate_tolerance = duplicate_tolerance;
        self
    }

    /// Builds and returns a [`Params`] instance.
    pub fn build(self) -> Params {
        Params {
            solver_type: self.solver_type,
            assembly: self.assembly,
            parallel: self.parallel,
            duplicate_policy: self.duplicate_policy,
            duplicate_tolerance: self.duplicate_tolerance,
        }
    }
}
