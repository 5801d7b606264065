/////////////////////////////////////////////////////////////////////////////////////////////
//
// Specifies the kernel shape options for configuring divergence-free RBF interpolants.
//
// Created on: 15 Nov 2025     Author: Daniel Owen
//
// Copyright (c) 2025, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

//! Specifies the kernel shape options for configuring divergence-free RBF interpolants.
use dfi_rbf_utils::KernelParams;
use serde::{Deserialize, Serialize};

/// A convenience builder for constructing an [`InterpolantSettings`] instance.
///
/// The builder should be called via the [`InterpolantSettings::builder`] method.
///
/// See [`InterpolantSettings`] for details on each field.
#[derive(Debug, Clone, Copy)]
pub struct InterpolantSettingsBuilder {
    pub shape_parameter: f64,
}

impl InterpolantSettingsBuilder {
    /// Creates a new instance of the [`InterpolantSettingsBuilder`].
    fn new(shape_parameter: f64) -> Self {
        Self { shape_parameter }
    }

    /// Sets the shape parameter.
    pub fn shape_parameter(mut self, shape_parameter: f64) -> Self {
        self.shape_parameter = shape_parameter;
        self
    }

    /// Builds and returns an instance of [`InterpolantSettings`] from the values
    /// defined in the builder.
    pub fn build(self) -> InterpolantSettings {
        InterpolantSettings {
            shape_parameter: self.shape_parameter,
        }
    }
}

/// Kernel settings for a divergence-free interpolant.
///
/// Only the isotropic Gaussian family is implemented, so the single tunable is
/// the shape parameter `eps` in `psi(r) = exp(-eps * r^2)`.
///
/// # Choosing `eps`
/// `eps` has units of inverse length squared. A value around `1 / h^2`, where `h`
/// is a typical spacing between samples, keeps each sample's influence to its
/// neighbourhood. Much smaller values give smoother fields but drive the system
/// towards numerical singularity, which surfaces as
/// [`crate::DfiRbfError::SingularSystem`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InterpolantSettings {
    /// Shape parameter of the scalar Gaussian kernel. Must be finite and `> 0`.
    pub shape_parameter: f64,
}

impl InterpolantSettings {
    /// Returns a new [`InterpolantSettingsBuilder`] for the given shape parameter.
    pub fn builder(shape_parameter: f64) -> InterpolantSettingsBuilder {
        InterpolantSettingsBuilder::new(shape_parameter)
    }
}

impl From<InterpolantSettings> for KernelParams {
    /// Converts a [`InterpolantSettings`] instance into a
    /// [`dfi_rbf_utils::KernelParams`].
    ///
    /// This allows `.into()` or `KernelParams::from(...)` to be used
    /// directly when passing settings into lower-level utility functions.
    fn from(v: InterpolantSettings) -> Self {
        KernelParams::builder()
            .shape_parameter(v.shape_parameter)
            .build()
    }
}
