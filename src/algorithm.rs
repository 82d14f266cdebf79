//! Gaussian process regression over an arbitrary positive-definite kernel.
//!
//! Sample/label pairs accumulate into [`GaussianProcess`]; the fit is
//! (re)computed lazily on the first prediction after a mutation, or
//! proactively through [`GaussianProcess::initialize`]. Fitting assembles
//! the kernel matrix over all training samples, regularizes its diagonal
//! with the noise variance, inverts it with the selected
//! [`InversionMethod`] and derives the regression vectors. Predictions
//! combine a kernel vector against the training samples with these cached
//! quantities.

use crate::errors::{GpError, Result};
use crate::inversion::{invert, InversionMethod};
use crate::kernels::Kernel;
use crate::matrix_io::{read_matrix, write_matrix};
use crate::registry::RegistryScalar;
use crate::utils::{difference_matrix, stack_columns, unstack_columns};
use linfa::Float;
use log::{debug, warn};
use ndarray::{Array1, Array2, ArrayBase, ArrayView1, Data, Ix1};
use rayon::prelude::*;
use std::fmt;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

/// A non-parametric regressor fitting vector-valued outputs through a
/// Gaussian process prior with a pluggable kernel.
///
/// The model predicts outputs, their derivatives and an uncertainty band
/// for new inputs. Input and output dimensions are fixed by the first
/// sample/label pair; every later pair must match.
///
/// # Implementation
///
/// * Based on [ndarray](https://github.com/rust-ndarray/ndarray) with
///   pure-Rust linear algebra, generic over `f32`/`f64` precision
/// * Kernel matrix entries are mutually independent and evaluated in
///   parallel over the upper triangle
/// * Models persist to a set of plain-text resources under a caller-chosen
///   prefix and reload through the process-wide [`KernelRegistry`]
///
/// [`KernelRegistry`]: crate::KernelRegistry
///
/// # Example
///
/// ```no_run
/// use gpr::{GaussianProcess, kernels::GaussianKernel};
/// use ndarray::array;
/// use std::sync::Arc;
///
/// let mut gp = GaussianProcess::new(Arc::new(GaussianKernel::new(1.0, 1.0)));
/// gp.set_noise(1e-6);
/// gp.add_sample(&array![0.], &array![0.]).unwrap();
/// gp.add_sample(&array![1.], &array![1.]).unwrap();
/// gp.add_sample(&array![2.], &array![4.]).unwrap();
///
/// let prediction = gp.predict(&array![1.5]).unwrap();
/// let band = gp.credible_interval(&array![1.5]).unwrap();
/// println!("f(1.5) = {} +/- {}", prediction[0], band);
/// ```
#[derive(Clone, Debug)]
pub struct GaussianProcess<F: Float> {
    /// Kernel shared with any other holders; never mutated by the model
    kernel: Arc<dyn Kernel<F>>,
    /// Additive diagonal regularizer on the kernel matrix
    noise: F,
    /// Training inputs in insertion order
    samples: Vec<Array1<F>>,
    /// Training outputs, parallel to `samples`
    labels: Vec<Array1<F>>,
    /// Fixed by the first sample
    input_dim: usize,
    /// Fixed by the first label
    output_dim: usize,
    /// One column of fitted weights per output dimension
    regression_vectors: Array2<F>,
    /// Inverse of the regularized kernel matrix
    core_matrix: Array2<F>,
    /// False after any mutation, true only after a successful fit
    initialized: bool,
    inversion_method: InversionMethod,
    /// Persisted verbosity flag
    debug: bool,
}

impl<F: Float> GaussianProcess<F> {
    /// A fresh model over the given kernel, with zero noise and the default
    /// inversion method
    pub fn new(kernel: Arc<dyn Kernel<F>>) -> Self {
        GaussianProcess {
            kernel,
            noise: F::zero(),
            samples: Vec::new(),
            labels: Vec::new(),
            input_dim: 0,
            output_dim: 0,
            regression_vectors: Array2::zeros((0, 0)),
            core_matrix: Array2::zeros((0, 0)),
            initialized: false,
            inversion_method: InversionMethod::default(),
            debug: false,
        }
    }

    /// The kernel backing this model
    pub fn kernel(&self) -> &Arc<dyn Kernel<F>> {
        &self.kernel
    }

    /// Noise variance added to the kernel matrix diagonal
    pub fn noise(&self) -> F {
        self.noise
    }

    /// Set the noise variance; invalidates the current fit
    pub fn set_noise(&mut self, noise: F) {
        self.noise = noise;
        self.initialized = false;
    }

    /// The selected inversion strategy
    pub fn inversion_method(&self) -> InversionMethod {
        self.inversion_method
    }

    /// Select the inversion strategy; invalidates the current fit
    pub fn set_inversion_method(&mut self, method: InversionMethod) {
        self.inversion_method = method;
        self.initialized = false;
    }

    /// Number of accumulated training samples
    pub fn n_samples(&self) -> usize {
        self.samples.len()
    }

    /// Input dimension, 0 until the first sample is added
    pub fn input_dim(&self) -> usize {
        self.input_dim
    }

    /// Output dimension, 0 until the first label is added
    pub fn output_dim(&self) -> usize {
        self.output_dim
    }

    /// Whether the model currently holds a valid fit
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Persisted verbosity flag
    pub fn debug(&self) -> bool {
        self.debug
    }

    /// Set the persisted verbosity flag
    pub fn set_debug(&mut self, debug: bool) {
        self.debug = debug;
    }

    /// Append one sample/label pair to the training set.
    ///
    /// The first call fixes the input and output dimensions; any later pair
    /// disagreeing with them fails with
    /// [`GpError::DimensionMismatch`] and leaves the model unchanged.
    /// A successful append invalidates the current fit.
    pub fn add_sample(
        &mut self,
        x: &ArrayBase<impl Data<Elem = F>, Ix1>,
        y: &ArrayBase<impl Data<Elem = F>, Ix1>,
    ) -> Result<()> {
        if self.samples.is_empty() {
            self.input_dim = x.len();
        }
        if self.labels.is_empty() {
            self.output_dim = y.len();
        }
        check_dimension(x.len(), self.input_dim)?;
        check_dimension(y.len(), self.output_dim)?;
        self.samples.push(x.to_owned());
        self.labels.push(y.to_owned());
        self.initialized = false;
        Ok(())
    }

    /// Perform the learning step if sample data has changed.
    ///
    /// Builds the regularized kernel matrix, inverts it with the selected
    /// strategy and computes the regression vectors. A no-op on an already
    /// fitted model, so predictions may call it unconditionally; fails with
    /// [`GpError::NotEnoughData`] when no samples have been accumulated.
    pub fn initialize(&mut self) -> Result<()> {
        if self.initialized {
            return Ok(());
        }
        if self.samples.is_empty() || self.labels.is_empty() {
            return Err(GpError::NotEnoughData);
        }
        let n = self.samples.len();
        debug!("building {n}x{n} kernel matrix");
        let mut k = self.compute_kernel_matrix();
        for i in 0..n {
            k[[i, i]] = k[[i, i]] + self.noise;
        }
        debug!("inverting kernel matrix ({:?})", self.inversion_method);
        self.core_matrix = invert(&k, self.inversion_method)?;
        let y = self.label_matrix();
        self.regression_vectors = self.core_matrix.dot(&y);
        self.initialized = true;
        Ok(())
    }

    /// Predict the output vector at a new input point.
    pub fn predict(&mut self, x: &ArrayBase<impl Data<Elem = F>, Ix1>) -> Result<Array1<F>> {
        self.initialize()?;
        check_dimension(x.len(), self.input_dim)?;
        let kx = self.kernel_vector(&x.view());
        Ok(self.regression_vectors.t().dot(&kx))
    }

    /// Predict the output vector at a new input point together with the
    /// derivative of the mean prediction, one column per output dimension.
    pub fn predict_derivative(
        &mut self,
        x: &ArrayBase<impl Data<Elem = F>, Ix1>,
    ) -> Result<(Array1<F>, Array2<F>)> {
        self.initialize()?;
        check_dimension(x.len(), self.input_dim)?;
        let kx = self.kernel_vector(&x.view());
        let diff = difference_matrix(&x.view(), &self.samples);

        let mut derivative = Array2::zeros((self.input_dim, self.output_dim));
        for (k, weights) in self.regression_vectors.columns().into_iter().enumerate() {
            let weighted = &kx * &weights;
            let column = diff.t().dot(&weighted).mapv(|v| -v);
            derivative.column_mut(k).assign(&column);
        }
        Ok((self.regression_vectors.t().dot(&kx), derivative))
    }

    /// Posterior covariance between two input points,
    /// `k(x, y) - Kx^t * core * Ky`; the scalar product in the RKHS of the
    /// fitted process.
    pub fn covariance(
        &mut self,
        x: &ArrayBase<impl Data<Elem = F>, Ix1>,
        y: &ArrayBase<impl Data<Elem = F>, Ix1>,
    ) -> Result<F> {
        self.initialize()?;
        check_dimension(x.len(), self.input_dim)?;
        check_dimension(y.len(), self.input_dim)?;
        let kx = self.kernel_vector(&x.view());
        let ky = self.kernel_vector(&y.view());
        Ok(self.kernel.eval(&x.view(), &y.view()) - kx.dot(&self.core_matrix.dot(&ky)))
    }

    /// Positive credible interval at an input point, a two-standard-deviation
    /// band derived from the posterior variance.
    ///
    /// Numerical error in the inversion may drive the posterior variance
    /// slightly negative; it is clamped to zero rather than reported as an
    /// error.
    pub fn credible_interval(&mut self, x: &ArrayBase<impl Data<Elem = F>, Ix1>) -> Result<F> {
        let c = self.covariance(x, x)?;
        if c < F::zero() {
            warn!("unstable prediction: posterior variance {c} clamped to zero");
        }
        Ok(F::cast(2.) * c.max(F::zero()).sqrt())
    }

    /// Kernel matrix `K[i][j] = k(x_i, x_j)`; symmetric, so only the upper
    /// triangle is evaluated (in parallel) and mirrored.
    fn compute_kernel_matrix(&self) -> Array2<F> {
        let n = self.samples.len();
        let rows: Vec<Vec<F>> = (0..n)
            .into_par_iter()
            .map(|i| {
                let xi = self.samples[i].view();
                (i..n)
                    .map(|j| self.kernel.eval(&xi, &self.samples[j].view()))
                    .collect()
            })
            .collect();
        let mut k = Array2::zeros((n, n));
        for (i, row) in rows.iter().enumerate() {
            for (offset, &value) in row.iter().enumerate() {
                let j = i + offset;
                k[[i, j]] = value;
                k[[j, i]] = value;
            }
        }
        k
    }

    /// Kernel vector `Kx[i] = k(x, x_i)` against all training samples.
    fn kernel_vector(&self, x: &ArrayView1<F>) -> Array1<F> {
        let entries: Vec<F> = self
            .samples
            .par_iter()
            .map(|sample| self.kernel.eval(x, &sample.view()))
            .collect();
        Array1::from_vec(entries)
    }

    /// Label matrix Y, one row per sample, one column per output dimension.
    fn label_matrix(&self) -> Array2<F> {
        let mut y = Array2::zeros((self.labels.len(), self.output_dim));
        for (mut row, label) in y.rows_mut().into_iter().zip(self.labels.iter()) {
            row.assign(label);
        }
        y
    }

    /// Write the fitted model as five text resources under `prefix`.
    ///
    /// Fails with [`GpError::NotInitialized`] before a successful fit. There
    /// is no rollback: on error the resources already written remain.
    pub fn save(&self, prefix: &str) -> Result<()> {
        if !self.initialized {
            return Err(GpError::NotInitialized);
        }
        debug!("saving gaussian process under prefix {prefix}");
        write_matrix(
            &self.regression_vectors,
            format!("{prefix}-RegressionVectors.txt"),
        )?;
        write_matrix(&self.core_matrix, format!("{prefix}-CoreMatrix.txt"))?;
        write_matrix(
            &stack_columns(&self.samples),
            format!("{prefix}-SampleVectors.txt"),
        )?;
        write_matrix(
            &stack_columns(&self.labels),
            format!("{prefix}-LabelVectors.txt"),
        )?;

        let parameters = self.kernel.parameters();
        let mut line = format!("{} {}", self.kernel.name(), parameters.len());
        for p in &parameters {
            line.push_str(&format!(" {p}"));
        }
        line.push_str(&format!(
            " {} {} {} {}",
            self.noise,
            self.input_dim,
            self.output_dim,
            u8::from(self.debug)
        ));
        fs::write(format!("{prefix}-ParameterFile.txt"), line)?;
        Ok(())
    }
}

impl<F: RegistryScalar> GaussianProcess<F> {
    /// Restore a model saved under `prefix`, reconstructing the kernel from
    /// its persisted name and parameters through the process-wide registry.
    ///
    /// The persisted core matrix and regression vectors are taken as
    /// authoritative: the restored model is initialized without refitting.
    pub fn load(prefix: &str) -> Result<Self> {
        debug!("loading gaussian process from prefix {prefix}");
        let regression_vectors = read_matrix(format!("{prefix}-RegressionVectors.txt"))?;
        let core_matrix = read_matrix(format!("{prefix}-CoreMatrix.txt"))?;
        let samples = unstack_columns(&read_matrix(format!("{prefix}-SampleVectors.txt"))?);
        let labels = unstack_columns(&read_matrix(format!("{prefix}-LabelVectors.txt"))?);

        let path = PathBuf::from(format!("{prefix}-ParameterFile.txt"));
        if !path.is_file() {
            return Err(GpError::MissingResource(path));
        }
        let line = fs::read_to_string(&path)?;
        let descriptor = ParameterDescriptor::parse(&line)?;
        let kernel = F::registry().load(&descriptor.kernel_name, &descriptor.kernel_parameters)?;

        Ok(GaussianProcess {
            kernel,
            noise: descriptor.noise,
            samples,
            labels,
            input_dim: descriptor.input_dim,
            output_dim: descriptor.output_dim,
            regression_vectors,
            core_matrix,
            initialized: true,
            inversion_method: InversionMethod::default(),
            debug: descriptor.debug,
        })
    }
}

/// Decoded content of the single-line parameter file.
struct ParameterDescriptor<F: Float> {
    kernel_name: String,
    kernel_parameters: Vec<F>,
    noise: F,
    input_dim: usize,
    output_dim: usize,
    debug: bool,
}

impl<F: Float> ParameterDescriptor<F> {
    /// Parse the exact token sequence
    /// `name count params... noise input_dim output_dim debug`.
    fn parse(line: &str) -> Result<Self> {
        let corrupt = |reason: &str| GpError::CorruptParameterFile(reason.to_string());
        let mut tokens = line.split_whitespace();

        let kernel_name = tokens
            .next()
            .ok_or_else(|| corrupt("missing kernel name"))?
            .to_string();
        let count: usize = tokens
            .next()
            .ok_or_else(|| corrupt("missing kernel parameter count"))?
            .parse()
            .map_err(|_| corrupt("bad kernel parameter count"))?;
        let mut kernel_parameters = Vec::with_capacity(count);
        for i in 0..count {
            let token = tokens
                .next()
                .ok_or_else(|| corrupt(&format!("missing kernel parameter {i}")))?;
            kernel_parameters.push(parse_scalar(token).ok_or_else(|| {
                corrupt(&format!("bad kernel parameter {i}: {token:?}"))
            })?);
        }
        let noise = {
            let token = tokens.next().ok_or_else(|| corrupt("missing noise"))?;
            parse_scalar(token).ok_or_else(|| corrupt(&format!("bad noise: {token:?}")))?
        };
        let input_dim: usize = tokens
            .next()
            .ok_or_else(|| corrupt("missing input dimension"))?
            .parse()
            .map_err(|_| corrupt("bad input dimension"))?;
        let output_dim: usize = tokens
            .next()
            .ok_or_else(|| corrupt("missing output dimension"))?
            .parse()
            .map_err(|_| corrupt("bad output dimension"))?;
        let debug = match tokens.next() {
            Some("0") => false,
            Some("1") => true,
            _ => return Err(corrupt("missing or bad debug flag")),
        };
        if tokens.next().is_some() {
            return Err(corrupt("trailing tokens"));
        }

        Ok(ParameterDescriptor {
            kernel_name,
            kernel_parameters,
            noise,
            input_dim,
            output_dim,
            debug,
        })
    }
}

fn parse_scalar<F: Float>(token: &str) -> Option<F> {
    token.parse::<f64>().ok().map(F::cast)
}

fn check_dimension(actual: usize, expected: usize) -> Result<()> {
    if actual != expected {
        return Err(GpError::DimensionMismatch { expected, actual });
    }
    Ok(())
}

impl<F: Float> fmt::Display for GaussianProcess<F> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "GP(kernel={}, noise={}, samples={}, input_dim={}, output_dim={}, initialized={})",
            self.kernel.name(),
            self.noise,
            self.samples.len(),
            self.input_dim,
            self.output_dim,
            self.initialized,
        )
    }
}

impl<F: Float> PartialEq for GaussianProcess<F> {
    fn eq(&self, other: &Self) -> bool {
        self.kernel.same_as(other.kernel.as_ref())
            && self.noise == other.noise
            && self.samples == other.samples
            && self.labels == other.labels
            && self.input_dim == other.input_dim
            && self.output_dim == other.output_dim
            && self.regression_vectors == other.regression_vectors
            && self.core_matrix == other.core_matrix
            && self.initialized == other.initialized
            && self.debug == other.debug
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernels::{GaussianKernel, PeriodicKernel, ProductKernel, SumKernel};
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    fn gaussian(sigma: f64) -> Arc<dyn Kernel<f64>> {
        Arc::new(GaussianKernel::new(sigma, 1.))
    }

    /// 1-d model over x = [0, 1, 2], y = [0, 1, 4]
    fn parabola_gp() -> GaussianProcess<f64> {
        let mut gp = GaussianProcess::new(gaussian(1.));
        gp.set_noise(1e-6);
        gp.add_sample(&array![0.], &array![0.]).unwrap();
        gp.add_sample(&array![1.], &array![1.]).unwrap();
        gp.add_sample(&array![2.], &array![4.]).unwrap();
        gp
    }

    fn test_prefix(name: &str) -> String {
        std::fs::create_dir_all("target/tests").ok();
        format!("target/tests/{name}")
    }

    #[test]
    fn test_dimension_invariant() {
        let mut gp = GaussianProcess::new(gaussian(1.));
        gp.add_sample(&array![0., 1.], &array![1.]).unwrap();
        assert_eq!(gp.input_dim(), 2);
        assert_eq!(gp.output_dim(), 1);

        let err = gp.add_sample(&array![0.], &array![1.]).unwrap_err();
        assert!(matches!(
            err,
            GpError::DimensionMismatch {
                expected: 2,
                actual: 1
            }
        ));
        let err = gp.add_sample(&array![0., 1.], &array![1., 2.]).unwrap_err();
        assert!(matches!(
            err,
            GpError::DimensionMismatch {
                expected: 1,
                actual: 2
            }
        ));
        // failed appends leave the training set unchanged
        assert_eq!(gp.n_samples(), 1);

        let err = gp.predict(&array![0.]).unwrap_err();
        assert!(matches!(err, GpError::DimensionMismatch { .. }));
    }

    #[test]
    fn test_not_enough_data() {
        let mut gp = GaussianProcess::<f64>::new(gaussian(1.));
        assert!(matches!(gp.initialize(), Err(GpError::NotEnoughData)));
        assert!(matches!(
            gp.predict(&array![0.]),
            Err(GpError::NotEnoughData)
        ));
    }

    #[test]
    fn test_lazy_fit_state_machine() {
        let mut gp = parabola_gp();
        assert!(!gp.is_initialized());
        gp.predict(&array![1.]).unwrap();
        assert!(gp.is_initialized());
        gp.add_sample(&array![3.], &array![9.]).unwrap();
        assert!(!gp.is_initialized());
        gp.predict(&array![1.]).unwrap();
        assert!(gp.is_initialized());
        gp.set_noise(1e-4);
        assert!(!gp.is_initialized());
    }

    #[test]
    fn test_idempotent_fit() {
        let mut gp = parabola_gp();
        gp.initialize().unwrap();
        let core = gp.core_matrix.clone();
        let regression = gp.regression_vectors.clone();
        gp.initialize().unwrap();
        assert_eq!(core, gp.core_matrix);
        assert_eq!(regression, gp.regression_vectors);
    }

    #[test]
    fn test_predict_on_training_data() {
        let mut gp = GaussianProcess::new(gaussian(1.));
        let samples = [array![0., 0.], array![1., 0.], array![0., 2.], array![1.5, 1.5]];
        let labels = [array![0., 1.], array![1., 0.], array![4., -1.], array![2., 2.]];
        for (x, y) in samples.iter().zip(labels.iter()) {
            gp.add_sample(x, y).unwrap();
        }
        for (x, y) in samples.iter().zip(labels.iter()) {
            let prediction = gp.predict(x).unwrap();
            assert_abs_diff_eq!(prediction, *y, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_concrete_scenario() {
        let mut gp = parabola_gp();
        gp.set_inversion_method(InversionMethod::FullPivLu);

        let prediction = gp.predict(&array![1.]).unwrap();
        assert_abs_diff_eq!(prediction[0], 1., epsilon = 1e-3);

        let at_training_point = gp.credible_interval(&array![1.]).unwrap();
        let far_away = gp.credible_interval(&array![10.]).unwrap();
        assert!(at_training_point < 1e-2);
        assert!(far_away > 10. * at_training_point);
        assert!(far_away > 1.);
    }

    #[test]
    fn test_all_inversion_methods_predict() {
        for method in [
            InversionMethod::FullPivLu,
            InversionMethod::JacobiSvd,
            InversionMethod::BdcSvd,
            InversionMethod::SelfAdjointEigen,
        ] {
            let mut gp = parabola_gp();
            gp.set_inversion_method(method);
            let prediction = gp.predict(&array![1.]).unwrap();
            assert_abs_diff_eq!(prediction[0], 1., epsilon = 1e-3);
        }
    }

    #[test]
    fn test_credible_interval_nonnegative() {
        let mut gp = parabola_gp();
        for i in 0..40 {
            let x = array![-2. + 0.25 * i as f64];
            assert!(gp.credible_interval(&x).unwrap() >= 0.);
        }
    }

    #[test]
    fn test_covariance_symmetry() {
        let mut gp = parabola_gp();
        let a = array![0.3];
        let b = array![1.7];
        let ab = gp.covariance(&a, &b).unwrap();
        let ba = gp.covariance(&b, &a).unwrap();
        assert_abs_diff_eq!(ab, ba, epsilon = 1e-10);
    }

    #[test]
    fn test_predict_derivative_matches_finite_difference() {
        let mut gp = parabola_gp();
        let x = 0.6;
        let (prediction, derivative) = gp.predict_derivative(&array![x]).unwrap();
        assert_eq!(derivative.dim(), (1, 1));
        assert_abs_diff_eq!(prediction[0], gp.predict(&array![x]).unwrap()[0]);

        let e = 1e-6;
        let up = gp.predict(&array![x + e]).unwrap()[0];
        let down = gp.predict(&array![x - e]).unwrap()[0];
        assert_abs_diff_eq!(derivative[[0, 0]], (up - down) / (2. * e), epsilon = 1e-4);
    }

    #[test]
    fn test_save_before_fit_fails() {
        let gp = parabola_gp();
        assert!(matches!(
            gp.save(&test_prefix("unfitted")),
            Err(GpError::NotInitialized)
        ));
    }

    #[test]
    fn test_save_load_roundtrip() {
        let prefix = test_prefix("roundtrip");
        let mut gp = parabola_gp();
        gp.initialize().unwrap();
        gp.save(&prefix).unwrap();

        let loaded = GaussianProcess::<f64>::load(&prefix).unwrap();
        assert!(loaded.is_initialized());
        assert_eq!(gp, loaded);
    }

    #[test]
    fn test_save_load_composite_kernel() {
        let prefix = test_prefix("roundtrip_composite");
        let inner: Arc<dyn Kernel<f64>> = Arc::new(ProductKernel::new(
            gaussian(0.5),
            Arc::new(PeriodicKernel::new(1., 2., 3.)),
        ));
        let kernel: Arc<dyn Kernel<f64>> = Arc::new(SumKernel::new(gaussian(1.), inner));

        let mut gp = GaussianProcess::new(kernel);
        gp.set_noise(1e-6);
        gp.add_sample(&array![0.], &array![0.]).unwrap();
        gp.add_sample(&array![1.], &array![1.]).unwrap();
        gp.add_sample(&array![2.], &array![4.]).unwrap();
        gp.initialize().unwrap();
        gp.save(&prefix).unwrap();

        let loaded = GaussianProcess::<f64>::load(&prefix).unwrap();
        assert_eq!(
            loaded.kernel().name(),
            "SumKernel#GaussianKernel#ProductKernel#GaussianKernel#PeriodicKernel"
        );
        assert_eq!(gp, loaded);
    }

    #[test]
    fn test_load_missing_resource() {
        assert!(matches!(
            GaussianProcess::<f64>::load(&test_prefix("never_saved")),
            Err(GpError::MissingResource(_))
        ));
    }

    #[test]
    fn test_load_corrupt_parameter_file() {
        let prefix = test_prefix("corrupt_params");
        let mut gp = parabola_gp();
        gp.initialize().unwrap();
        gp.save(&prefix).unwrap();

        // parameter count announces more values than the line holds
        fs::write(
            format!("{prefix}-ParameterFile.txt"),
            "GaussianKernel 9 1 1 1e-6 1 1 0",
        )
        .unwrap();
        assert!(matches!(
            GaussianProcess::<f64>::load(&prefix),
            Err(GpError::CorruptParameterFile(_))
        ));

        fs::write(format!("{prefix}-ParameterFile.txt"), "GaussianKernel").unwrap();
        assert!(matches!(
            GaussianProcess::<f64>::load(&prefix),
            Err(GpError::CorruptParameterFile(_))
        ));
    }

    #[test]
    fn test_load_unknown_kernel() {
        let prefix = test_prefix("unknown_kernel");
        let mut gp = parabola_gp();
        gp.initialize().unwrap();
        gp.save(&prefix).unwrap();

        fs::write(
            format!("{prefix}-ParameterFile.txt"),
            "NoSuchKernel 2 1 1 1e-6 1 1 0",
        )
        .unwrap();
        assert!(matches!(
            GaussianProcess::<f64>::load(&prefix),
            Err(GpError::KernelNotFound(_))
        ));
    }

    #[test]
    fn test_display() {
        let gp = parabola_gp();
        let summary = gp.to_string();
        assert!(summary.contains("GaussianKernel"));
        assert!(summary.contains("samples=3"));
    }

    #[test]
    fn test_equality() {
        let mut a = parabola_gp();
        let mut b = parabola_gp();
        a.initialize().unwrap();
        b.initialize().unwrap();
        assert_eq!(a, b);

        b.set_noise(1e-3);
        b.initialize().unwrap();
        assert_ne!(a, b);
    }
}
