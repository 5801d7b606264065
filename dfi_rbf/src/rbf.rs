/////////////////////////////////////////////////////////////////////////////////////////////
//
// Implements the divergence-free RBF interpolator, its construction, evaluation, and model I/O.
//
// Created on: 15 Nov 2025     Author: Daniel Owen
//
// Copyright (c) 2025, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

use crate::{
    assembly::assemble_system,
    config::{DuplicatePolicy, Params},
    interpolant_config::InterpolantSettings,
    linalg::{self, FactorizationError},
    progress::{self, ProgressMsg, ProgressSink},
};

use dfi_rbf_utils::{
    self, Block3, KernelFromParams, KernelParams, MatrixKernelFunction, Vector3,
    kernels::{DivergenceFreeGaussianKernel, mat_vec},
};
use faer::{Mat, Par};
use serde::{Deserialize, Serialize};
use std::{
    error::Error,
    fmt,
    fs::File,
    io::{self, BufReader, BufWriter, Write},
    path::{Path, PathBuf},
    sync::Arc,
    time::Instant,
};

/// A builder for [`DfiRbfInterpolator`].
///
/// The builder should be called via the [`DfiRbfInterpolator::builder`] method.
///
/// See [`DfiRbfInterpolator`] for details on each field.
pub struct DfiRbfInterpolatorBuilder {
    points: Mat<f64>,
    vectors: Mat<f64>,
    interpolant_settings: InterpolantSettings,
    params: Params,
    progress_callback: Option<Arc<dyn ProgressSink>>,
}

impl DfiRbfInterpolatorBuilder {
    /// Creates a new builder with the required inputs:
    /// - `points`: `N × 3` sample positions.
    /// - `vectors`: `N × 3` sample vectors, co-indexed with `points`.
    /// - `interpolant_settings`: kernel configuration.
    ///
    /// Default [`Params`] are used unless overridden.
    fn new(points: Mat<f64>, vectors: Mat<f64>, interpolant_settings: InterpolantSettings) -> Self {
        Self {
            points,
            vectors,
            interpolant_settings,
            params: Params::default(),
            progress_callback: None,
        }
    }

    /// Sets custom solver and algorithm parameters.
    pub fn params(mut self, params: Params) -> Self {
        self.params = params;
        self
    }

    /// Optional callback for reporting construction progress.
    ///
    /// Skipped during serialization.
    pub fn progress_callback(mut self, progress_callback: Arc<dyn ProgressSink>) -> Self {
        self.progress_callback = Some(progress_callback);
        self
    }

    /// Validates the inputs, assembles and solves the interpolation system, and
    /// returns the fitted [`DfiRbfInterpolator`].
    ///
    /// ### Errors
    /// - [`DfiRbfError::InvalidParameter`] for malformed inputs.
    /// - [`DfiRbfError::SingularSystem`] for coincident positions (under
    ///   [`DuplicatePolicy::Reject`]) or a numerically indefinite matrix.
    /// - [`DfiRbfError::AllocationFailure`] when the `9N²` matrix cannot be allocated.
    pub fn build(self) -> DfiRbfResult<DfiRbfInterpolator> {
        DfiRbfInterpolator::new(
            self.points,
            self.vectors,
            self.interpolant_settings,
            self.params,
            self.progress_callback,
        )
    }
}

/// A fitted divergence-free RBF interpolant of a 3D vector field.
///
/// The interpolant is
///
/// ```text
/// s(x) = Σ_j Φ(x - x_j) c_j
/// ```
///
/// where `Φ` is the 3×3 matrix-valued kernel obtained by applying
/// `∇∇ᵀ - ∇²I` to a Gaussian. Each column of `Φ` is divergence-free, so `s` is
/// divergence-free everywhere, and the weights `c_j` are chosen so that
/// `s(x_i)` reproduces the sample vector at every sample position.
///
/// Instances only exist after a successful solve and are read-only from then
/// on, so evaluation never fails and may be shared across threads. All storage
/// is released when the value is dropped.
///
/// ### Example
/// ```
/// use dfi_rbf::{DfiRbfInterpolator, interpolant_config::InterpolantSettings};
/// use faer::mat;
///
/// let points = mat![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0f64]];
/// let vectors = mat![[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0], [1.0, 1.0, 1.0f64]];
///
/// let settings = InterpolantSettings::builder(0.5).build();
/// let rbfi = DfiRbfInterpolator::builder(points, vectors, settings).build()?;
///
/// let value = rbfi.evaluate_point([0.0, 0.0, 0.0]);
/// assert!((value[0] - 1.0).abs() < 1e-9);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
///
/// The fitted data is only reachable through accessors:
/// ```compile_fail
/// # use dfi_rbf::{DfiRbfInterpolator, interpolant_config::InterpolantSettings};
/// # use faer::{Mat, mat};
/// # let points = mat![[0.0, 0.0, 0.0], [1.0, 1.0, 1.0f64]];
/// # let vectors = mat![[1.0, 0.0, 0.0], [0.0, 1.0, 0.0f64]];
/// # let settings = InterpolantSettings::builder(1.0).build();
/// let mut rbfi = DfiRbfInterpolator::builder(points, vectors, settings).build().unwrap();
/// rbfi.points = Mat::zeros(5, 3);
/// ```
#[derive(Serialize, Deserialize, Debug)]
pub struct DfiRbfInterpolator {
    /// `N × 3` sample positions.
    pub(crate) points: Mat<f64>,

    /// `N × 3` sample vectors.
    pub(crate) vectors: Mat<f64>,

    /// `N × 3` solved weights, row `j` is `c_j`.
    pub(crate) weights: Mat<f64>,

    /// Kernel settings used to configure the interpolator.
    interpolant_settings: InterpolantSettings,

    /// Solver and algorithm parameters.
    pub(crate) params: Params,

    /// Optional callback for reporting progress.
    /// Skipped during serialization.
    #[serde(skip, default)]
    pub(crate) progress_callback: Option<Arc<dyn ProgressSink>>,
}

impl DfiRbfInterpolator {
    /// Creates a new [`DfiRbfInterpolatorBuilder`] for the given points,
    /// vectors, and kernel settings.
    ///
    /// This is the way to construct an interpolator.
    pub fn builder(
        points: Mat<f64>,
        vectors: Mat<f64>,
        interpolant_settings: InterpolantSettings,
    ) -> DfiRbfInterpolatorBuilder {
        DfiRbfInterpolatorBuilder::new(points, vectors, interpolant_settings)
    }

    fn new(
        points: Mat<f64>,
        vectors: Mat<f64>,
        interpolant_settings: InterpolantSettings,
        params: Params,
        progress_callback: Option<Arc<dyn ProgressSink>>,
    ) -> DfiRbfResult<Self> {
        let solver_start = Instant::now();

        validate_inputs(&points, &vectors, &interpolant_settings, &params)?;

        let source_points = dfi_rbf_utils::to_vector3_rows(&points);
        let duplicate_of = find_duplicates(&source_points, params.duplicate_tolerance);

        let (points, vectors, source_points) = match params.duplicate_policy {
            DuplicatePolicy::Reject => {
                if let Some((second, first)) = duplicate_of
                    .iter()
                    .enumerate()
                    .find_map(|(i, dup)| dup.map(|j| (i, j)))
                {
                    return Err(DfiRbfError::SingularSystem {
                        reason: SingularReason::DuplicatePositions { first, second },
                    });
                }
                (points, vectors, source_points)
            }
            DuplicatePolicy::Remove => {
                let idx: Vec<usize> = duplicate_of
                    .iter()
                    .enumerate()
                    .filter_map(|(i, dup)| dup.is_none().then_some(i))
                    .collect();

                if idx.len() == points.nrows() {
                    (points, vectors, source_points)
                } else {
                    progress::report(
                        &progress_callback,
                        ProgressMsg::DuplicatesRemoved {
                            num_duplicates: points.nrows() - idx.len(),
                        },
                    );
                    let kept_points: Vec<Vector3> = idx.iter().map(|&i| source_points[i]).collect();
                    (
                        dfi_rbf_utils::select_mat_rows(&points, &idx),
                        dfi_rbf_utils::select_mat_rows(&vectors, &idx),
                        kept_points,
                    )
                }
            }
        };

        let kernel_params: KernelParams = interpolant_settings.into();
        let kernel = DivergenceFreeGaussianKernel::from_params(&kernel_params);

        let assembly_start = Instant::now();
        let mut system = assemble_system(
            &kernel,
            &source_points,
            &vectors,
            params.assembly,
            params.parallel,
        )?;

        progress::report(
            &progress_callback,
            ProgressMsg::SystemAssembled {
                num_points: source_points.len(),
                system_size: system.dim,
                elapsed: assembly_start.elapsed(),
            },
        );

        let par = match params.parallel {
            true => faer::get_global_parallelism(),
            false => Par::Seq,
        };

        let solve_start = Instant::now();
        let solution = linalg::get_solver(params.solver_type, par)
            .solve(&mut system.a_matrix, system.dim, system.rhs.as_ref())
            .map_err(|e| DfiRbfError::SingularSystem {
                reason: SingularReason::NotPositiveDefinite(e),
            })?;
        drop(system);

        progress::report(
            &progress_callback,
            ProgressMsg::SystemSolved {
                solver: params.solver_type,
                elapsed: solve_start.elapsed(),
            },
        );

        let weights = Mat::from_fn(source_points.len(), 3, |i, k| solution[(3 * i + k, 0)]);

        let interpolator = Self {
            points,
            vectors,
            weights,
            interpolant_settings,
            params,
            progress_callback,
        };

        if let Some(sink) = &interpolator.progress_callback {
            let msg = format!(
                "Took {:?} to solve the divergence-free RBF for {} points using the following settings:\n\
                Shape parameter: {}, Solver: {:?}, Assembly: {:?}, Parallel: {}",
                solver_start.elapsed(),
                interpolator.num_points(),
                interpolator.interpolant_settings.shape_parameter,
                interpolator.params.solver_type,
                interpolator.params.assembly,
                interpolator.params.parallel,
            );

            sink.emit(ProgressMsg::Message { message: msg });
        }

        Ok(interpolator)
    }

    /// Returns the kernel described by the stored settings.
    #[inline]
    fn kernel(&self) -> DivergenceFreeGaussianKernel {
        DivergenceFreeGaussianKernel::new(self.interpolant_settings.shape_parameter)
    }

    /// Evaluates the interpolant at a single query point.
    ///
    /// The sum over samples runs in sample order, so repeated calls with the same
    /// query return bit-identical results.
    pub fn evaluate_point(&self, query: Vector3) -> Vector3 {
        let kernel = self.kernel();

        let mut value = [0.0; 3];
        for j in 0..self.points.nrows() {
            let source = dfi_rbf_utils::point_row(&self.points, j);
            let weight = dfi_rbf_utils::point_row(&self.weights, j);
            let term = mat_vec(&kernel.evaluate(&query, &source), &weight);
            value[0] += term[0];
            value[1] += term[1];
            value[2] += term[2];
        }
        value
    }

    /// Evaluates the interpolant at each row of an `M × 3` matrix of query points.
    ///
    /// ### Returns
    /// An `M × 3` matrix of interpolated vectors.
    ///
    /// ### Example
    /// ```no_run
    /// # use dfi_rbf::DfiRbfInterpolator;
    /// # use faer::Mat;
    /// # let (rbfi, targets): (DfiRbfInterpolator, Mat<f64>) = unimplemented!();
    /// let values = rbfi.evaluate(&targets);
    /// ```
    pub fn evaluate(&self, target_points: &Mat<f64>) -> Mat<f64> {
        assert_eq!(target_points.ncols(), 3, "expected an M x 3 target matrix");

        let mut values = Mat::<f64>::zeros(target_points.nrows(), 3);
        for i in 0..target_points.nrows() {
            let value = self.evaluate_point(dfi_rbf_utils::point_row(target_points, i));
            for k in 0..3 {
                values[(i, k)] = value[k];
            }
        }
        values
    }

    /// Evaluates the interpolant **at the source points**.
    ///
    /// The result reproduces [`DfiRbfInterpolator::vectors`] to within the
    /// accuracy of the solve and is useful as a residual check.
    pub fn evaluate_at_source(&self) -> Mat<f64> {
        self.evaluate(&self.points)
    }

    /// Returns the analytic Jacobian of the interpolant at `query`.
    ///
    /// Entry `[i][k]` is `∂s_i / ∂x_k`.
    pub fn jacobian_at(&self, query: Vector3) -> Block3 {
        let kernel = self.kernel();

        let mut jacobian = [[0.0; 3]; 3];
        for j in 0..self.points.nrows() {
            let source = dfi_rbf_utils::point_row(&self.points, j);
            let weight = dfi_rbf_utils::point_row(&self.weights, j);
            let term = kernel.jacobian_contribution(&query, &source, &weight);
            for (row, term_row) in jacobian.iter_mut().zip(term.iter()) {
                for (entry, t) in row.iter_mut().zip(term_row.iter()) {
                    *entry += t;
                }
            }
        }
        jacobian
    }

    /// Returns the divergence of the interpolant at `query`.
    ///
    /// Zero up to rounding for every query point.
    pub fn divergence_at(&self, query: Vector3) -> f64 {
        let jacobian = self.jacobian_at(query);
        jacobian[0][0] + jacobian[1][1] + jacobian[2][2]
    }

    /// Returns the curl of the interpolant at `query`.
    pub fn curl_at(&self, query: Vector3) -> Vector3 {
        let j = self.jacobian_at(query);
        [j[2][1] - j[1][2], j[0][2] - j[2][0], j[1][0] - j[0][1]]
    }

    /// Number of samples the interpolant was fitted to.
    pub fn num_points(&self) -> usize {
        self.points.nrows()
    }

    /// Shape parameter of the kernel.
    pub fn shape_parameter(&self) -> f64 {
        self.interpolant_settings.shape_parameter
    }

    /// Sample positions the interpolant was fitted to, after duplicate removal.
    pub fn points(&self) -> &Mat<f64> {
        &self.points
    }

    /// Sample vectors matching [`points`](Self::points) row for row.
    pub fn vectors(&self) -> &Mat<f64> {
        &self.vectors
    }

    /// Solved weights, one row per sample.
    pub fn weights(&self) -> &Mat<f64> {
        &self.weights
    }

    /// Solver and algorithm parameters used for the fit.
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Kernel settings used to fit the interpolant.
    pub fn settings(&self) -> &InterpolantSettings {
        &self.interpolant_settings
    }

    /// Save the interpolator to a versioned **JSON envelope**.
    ///
    /// The envelope carries `format` and `version` fields alongside the
    /// flattened model (points, vectors, weights, settings, and parameters).
    ///
    /// ### Example
    /// ```no_run
    /// # use dfi_rbf::DfiRbfInterpolator;
    /// # let rbfi: DfiRbfInterpolator = unimplemented!();
    /// rbfi.save_model("dfi_rbf_model.json")?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn save_model<P: AsRef<Path>>(&self, path: P) -> ModelIOResult<()> {
        let path_ref = path.as_ref();
        let file = File::create(path_ref).map_err(|e| ModelIOError::Create {
            path: path_ref.to_path_buf(),
            source: e,
        })?;
        let mut w = BufWriter::new(file);

        let env = JsonEnvelopeRef {
            format: JSON_FORMAT_NAME,
            version: JSON_VERSION,
            model: self,
        };

        serde_json::to_writer_pretty(&mut w, &env).map_err(|e| ModelIOError::Serialize {
            path: path_ref.to_path_buf(),
            source: e,
        })?;
        w.write_all(b"\n").map_err(|e| ModelIOError::Write {
            path: path_ref.to_path_buf(),
            source: e,
        })?;
        w.flush().map_err(|e| ModelIOError::Flush {
            path: path_ref.to_path_buf(),
            source: e,
        })?;
        Ok(())
    }

    /// Load an interpolator from a versioned **JSON envelope**, validating format & version.
    ///
    /// If `progress` is `Some`, installs the sink on the returned model.
    ///
    /// ### Validation
    /// - Fails if `format != "dfi_rbf.json"` or `version` is unsupported.
    /// - Fails if the stored matrices are not `N × 3` with a common `N ≥ 1`, or the
    ///   shape parameter is not finite and positive.
    ///
    /// ### Errors
    /// - Returns `ModelIOError::{Open, Parse, FormatMismatch, VersionMismatch, InvalidModel}`
    ///   as appropriate.
    ///
    /// ### Example
    /// ```no_run
    /// # use dfi_rbf::{DfiRbfInterpolator, progress::{closure_sink, ProgressMsg}};
    /// let (sink, _listener) = closure_sink(256, |msg: ProgressMsg| { /* handle */ });
    /// let rbfi = DfiRbfInterpolator::load_model("dfi_rbf_model.json", Some(sink))?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn load_model<P: AsRef<Path>>(
        path: P,
        progress: Option<Arc<dyn ProgressSink>>,
    ) -> ModelIOResult<Self> {
        let path_ref = path.as_ref();

        let file = File::open(path_ref).map_err(|e| ModelIOError::Open {
            path: path_ref.to_path_buf(),
            source: e,
        })?;
        let reader = BufReader::new(file);

        let env: JsonEnvelopeOwned<Self> =
            serde_json::from_reader(reader).map_err(|e| ModelIOError::Parse {
                path: path_ref.to_path_buf(),
                source: e,
            })?;

        // Validate envelope
        if env.format != JSON_FORMAT_NAME {
            return Err(ModelIOError::FormatMismatch {
                path: path_ref.to_path_buf(),
                found: env.format,
                expected: JSON_FORMAT_NAME,
            });
        }

        if env.version != JSON_VERSION {
            return Err(ModelIOError::VersionMismatch {
                path: path_ref.to_path_buf(),
                found: env.version,
                expected: JSON_VERSION,
            });
        }

        let mut model = env.model;
        if let Err(reason) = model.check_consistency() {
            return Err(ModelIOError::InvalidModel {
                path: path_ref.to_path_buf(),
                reason,
            });
        }

        if let Some(sink) = progress {
            model.progress_callback = Some(sink);
        }
        Ok(model)
    }

    /// Checks the invariants evaluation relies on for a deserialized model.
    fn check_consistency(&self) -> Result<(), String> {
        let n = self.points.nrows();
        if n == 0 {
            return Err("model holds no samples".to_string());
        }
        for (name, m) in [
            ("points", &self.points),
            ("vectors", &self.vectors),
            ("weights", &self.weights),
        ] {
            if m.nrows() != n || m.ncols() != 3 {
                return Err(format!(
                    "{name} is {} x {}, expected {n} x 3",
                    m.nrows(),
                    m.ncols()
                ));
            }
        }
        let eps = self.interpolant_settings.shape_parameter;
        if !(eps.is_finite() && eps > 0.0) {
            return Err(format!("shape parameter {eps} is not finite and positive"));
        }
        Ok(())
    }
}

/// Rejects malformed inputs before any computation takes place.
fn validate_inputs(
    points: &Mat<f64>,
    vectors: &Mat<f64>,
    interpolant_settings: &InterpolantSettings,
    params: &Params,
) -> DfiRbfResult<()> {
    let invalid = |parameter: &'static str, reason: String| {
        Err(DfiRbfError::InvalidParameter { parameter, reason })
    };

    if points.ncols() != 3 {
        return invalid(
            "points",
            format!("expected 3 columns, found {}", points.ncols()),
        );
    }
    if vectors.ncols() != 3 {
        return invalid(
            "vectors",
            format!("expected 3 columns, found {}", vectors.ncols()),
        );
    }
    if points.nrows() == 0 {
        return invalid("points", "at least one sample is required".to_string());
    }
    if vectors.nrows() != points.nrows() {
        return invalid(
            "vectors",
            format!(
                "found {} vectors for {} points",
                vectors.nrows(),
                points.nrows()
            ),
        );
    }
    if let Some(i) = points
        .row_iter()
        .position(|row| !dfi_rbf_utils::row_is_finite(row))
    {
        return invalid("points", format!("row {i} has a non-finite coordinate"));
    }
    if let Some(i) = vectors
        .row_iter()
        .position(|row| !dfi_rbf_utils::row_is_finite(row))
    {
        return invalid("vectors", format!("row {i} has a non-finite component"));
    }

    let eps = interpolant_settings.shape_parameter;
    if !(eps.is_finite() && eps > 0.0) {
        return invalid(
            "shape_parameter",
            format!("must be finite and greater than zero, found {eps}"),
        );
    }

    let tolerance = params.duplicate_tolerance;
    if !(tolerance.is_finite() && tolerance >= 0.0) {
        return invalid(
            "duplicate_tolerance",
            format!("must be finite and non-negative, found {tolerance}"),
        );
    }

    Ok(())
}

/// Groups samples whose positions lie within `tolerance` (infinity norm) of an
/// earlier kept sample.
///
/// Entry `i` is `Some(j)` when sample `i` duplicates the kept sample `j < i`,
/// and `None` when sample `i` is kept. The first sample of each group is the one
/// kept.
fn find_duplicates(points: &[Vector3], tolerance: f64) -> Vec<Option<usize>> {
    let mut kept: Vec<usize> = Vec::with_capacity(points.len());
    let mut duplicate_of = Vec::with_capacity(points.len());

    for (i, point) in points.iter().enumerate() {
        let found = kept
            .iter()
            .copied()
            .find(|&j| dfi_rbf_utils::get_distance_inf(point, &points[j]) <= tolerance);

        if found.is_none() {
            kept.push(i);
        }
        duplicate_of.push(found);
    }

    duplicate_of
}

/// Result alias for interpolator construction.
pub type DfiRbfResult<T> = std::result::Result<T, DfiRbfError>;

/// Why an interpolation system could not be solved.
#[derive(Debug, Clone, PartialEq)]
pub enum SingularReason {
    /// Two samples share a position (within the duplicate tolerance).
    DuplicatePositions { first: usize, second: usize },

    /// The Cholesky factorisation broke down.
    NotPositiveDefinite(FactorizationError),
}

impl fmt::Display for SingularReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SingularReason::DuplicatePositions { first, second } => {
                write!(f, "samples {first} and {second} share a position")
            }
            SingularReason::NotPositiveDefinite(e) => write!(f, "{e}"),
        }
    }
}

/// Errors that can occur when constructing a [`DfiRbfInterpolator`].
///
/// Evaluation never fails, so these are only returned by
/// [`DfiRbfInterpolatorBuilder::build`].
#[derive(Debug, Clone, PartialEq)]
pub enum DfiRbfError {
    /// An input was rejected before any computation.
    InvalidParameter {
        parameter: &'static str,
        reason: String,
    },
    /// The interpolation matrix is singular or numerically indefinite.
    SingularSystem { reason: SingularReason },
    /// The `3N × 3N` matrix could not be allocated.
    AllocationFailure { num_entries: usize },
}

impl fmt::Display for DfiRbfError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DfiRbfError::InvalidParameter { parameter, reason } => {
                write!(f, "invalid {parameter}: {reason}")
            }
            DfiRbfError::SingularSystem { reason } => {
                write!(f, "singular interpolation system: {reason}")
            }
            DfiRbfError::AllocationFailure { num_entries } => write!(
                f,
                "failed to allocate the interpolation matrix ({num_entries} entries)"
            ),
        }
    }
}

impl Error for DfiRbfError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            DfiRbfError::SingularSystem {
                reason: SingularReason::NotPositiveDefinite(e),
            } => Some(e),
            _ => None,
        }
    }
}

const JSON_FORMAT_NAME: &str = "dfi_rbf.json";
const JSON_VERSION: u32 = 1;

/// Borrowing envelope for SAVE (no clone of the model).
#[derive(Serialize)]
struct JsonEnvelopeRef<'a, T: ?Sized> {
    format: &'static str,
    version: u32,
    #[serde(flatten)]
    model: &'a T,
}

/// Owning envelope for LOAD (generic over the concrete model).
#[derive(Serialize, Deserialize)]
struct JsonEnvelopeOwned<T> {
    format: String,
    version: u32,
    #[serde(flatten)]
    model: T,
}

pub type ModelIOResult<T> = std::result::Result<T, ModelIOError>;

/// Errors that can occur when saving or loading a [`DfiRbfInterpolator`] model.
///
/// This is the error type returned by [`DfiRbfInterpolator::save_model`] and
/// [`DfiRbfInterpolator::load_model`], wrapping lower-level I/O and JSON
/// serialization issues as well as format/version validation failures.
#[derive(Debug)]
pub enum ModelIOError {
    /// Failed to create the target file before writing a model.
    Create { path: PathBuf, source: io::Error },
    /// Failed to open an existing model file for reading.
    Open { path: PathBuf, source: io::Error },
    /// Low-level write error while streaming the model to disk.
    Write { path: PathBuf, source: io::Error },
    /// Failed to flush buffered output when finishing a write.
    Flush { path: PathBuf, source: io::Error },
    /// Error serializing the in-memory model to JSON.
    Serialize {
        path: PathBuf,
        source: serde_json::Error,
    },
    /// Error parsing JSON when reading a model from disk.
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    /// The JSON `format` field does not match the expected model format.
    FormatMismatch {
        path: PathBuf,
        found: String,
        expected: &'static str,
    },
    /// The JSON `version` field does not match the supported version.
    VersionMismatch {
        path: PathBuf,
        found: u32,
        expected: u32,
    },
    /// The model parsed but its contents cannot be evaluated.
    InvalidModel { path: PathBuf, reason: String },
}

impl fmt::Display for ModelIOError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelIOError::Create { path, source } => {
                write!(f, "creating {}: {}", path.display(), source)
            }
            ModelIOError::Open { path, source } => {
                write!(f, "opening {}: {}", path.display(), source)
            }
            ModelIOError::Write { path, source } => {
                write!(f, "writing {}: {}", path.display(), source)
            }
            ModelIOError::Flush { path, source } => {
                write!(f, "flushing {}: {}", path.display(), source)
            }
            ModelIOError::Serialize { path, source } => {
                write!(f, "serializing JSON to {}: {}", path.display(), source)
            }
            ModelIOError::Parse { path, source } => {
                write!(f, "parsing JSON in {}: {}", path.display(), source)
            }
            ModelIOError::FormatMismatch {
                path,
                found,
                expected,
            } => write!(
                f,
                "unsupported format {:?} (expected {:?}) in {}",
                found,
                expected,
                path.display()
            ),
            ModelIOError::VersionMismatch {
                path,
                found,
                expected,
            } => write!(
                f,
                "unsupported version {} (expected {}) in {}",
                found,
                expected,
                path.display()
            ),
            ModelIOError::InvalidModel { path, reason } => {
                write!(f, "invalid model in {}: {}", path.display(), reason)
            }
        }
    }
}

impl Error for ModelIOError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ModelIOError::Create { source, .. }
            | ModelIOError::Open { source, .. }
            | ModelIOError::Write { source, .. }
            | ModelIOError::Flush { source, .. } => Some(source),
            ModelIOError::Serialize { source, .. } | ModelIOError::Parse { source, .. } => {
                Some(source)
            }
            ModelIOError::FormatMismatch { .. }
            | ModelIOError::VersionMismatch { .. }
            | ModelIOError::InvalidModel { .. } => None,
        }
    }
}
