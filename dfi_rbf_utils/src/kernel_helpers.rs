/////////////////////////////////////////////////////////////////////////////////////////////
//
// Provides parameter and builder types for configuring divergence-free kernels.
//
// Created on: 15 Nov 2025     Author: Daniel Owen
//
// Copyright (c) 2025, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

use serde::{Deserialize, Serialize};

/// Parameters for the divergence-free Gaussian kernel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KernelParams {
    /// Shape parameter `eps` of the scalar Gaussian `exp(-eps * r^2)`.
    ///
    /// Larger values make each sample's influence more local, smaller values
    /// give broader, smoother fields at the cost of a worse conditioned system.
    /// Must be strictly positive.
    pub shape_parameter: f64,
}

impl KernelParams {
    /// Begins building a [`KernelParams`] instance.
    pub fn builder() -> KernelParamsBuilder {
        KernelParamsBuilder {
            shape_parameter: 1.0,
        }
    }
}

impl Default for KernelParams {
    fn default() -> Self {
        KernelParams::builder().build()
    }
}

/// Builder for [`KernelParams`] that provides sensible defaults.
#[derive(Debug, Clone, Copy)]
pub struct KernelParamsBuilder {
    shape_parameter: f64,
}

impl KernelParamsBuilder {
    /// Sets the `shape_parameter` on the builder.
    pub fn shape_parameter(mut self, v: f64) -> Self {
        self.shape_parameter = v;
        self
    }

    /// Finalises the builder into a [`KernelParams`] value.
    ///
    /// The shape parameter is not validated here; interpolator construction
    /// rejects non-positive values with a structured error.
    pub fn build(self) -> KernelParams {
        KernelParams {
            shape_parameter: self.shape_parameter,
        }
    }
}
