//! A module for positive-definite kernels evaluated pairwise on input vectors.
//!
//! The following kernels are implemented:
//! * gaussian (squared exponential),
//! * periodic,
//! * sum and product combinators over two sub-kernels.
//!
//! Kernels are immutable once constructed and shareable behind an [`Arc`],
//! so a single (possibly composite) kernel may back several models at once.
//! Each kernel exposes a stable type name used by the
//! [`KernelRegistry`](crate::KernelRegistry) to reconstruct it from persisted
//! models: simple kernels use their bare name, composites encode their
//! children recursively as `SumKernel#<left>#<right>` (resp. `ProductKernel`).

use crate::errors::{GpError, Result};
use linfa::Float;
use ndarray::ArrayView1;
use std::fmt;
use std::sync::Arc;

/// Delimiter between combinator and child names in composite kernel names.
pub const KERNEL_NAME_DELIMITER: char = '#';

/// A positive-definite pairwise similarity function between input vectors.
///
/// Implementations must be symmetric (`eval(x, y) == eval(y, x)`) and yield a
/// positive-(semi)definite kernel matrix for any set of distinct inputs.
pub trait Kernel<F: Float>: Send + Sync + fmt::Debug {
    /// Evaluate the kernel on a pair of input vectors.
    fn eval(&self, x: &ArrayView1<F>, y: &ArrayView1<F>) -> F;

    /// Ordered parameter vector, fixed-length per kernel type.
    /// Composite kernels concatenate their children's parameters.
    fn parameters(&self) -> Vec<F>;

    /// Stable type name, recursively encoded for composite kernels.
    fn name(&self) -> String;

    /// Structural equality: same type name and exactly equal parameters.
    fn same_as(&self, other: &dyn Kernel<F>) -> bool {
        self.name() == other.name() && self.parameters() == other.parameters()
    }
}

fn squared_distance<F: Float>(x: &ArrayView1<F>, y: &ArrayView1<F>) -> F {
    x.iter()
        .zip(y.iter())
        .fold(F::zero(), |acc, (&a, &b)| acc + (a - b) * (a - b))
}

/// Gaussian (squared exponential) kernel
/// `k(x, y) = scale * exp(-|x - y|^2 / (2 sigma^2))`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GaussianKernel<F: Float> {
    sigma: F,
    scale: F,
}

impl<F: Float> GaussianKernel<F> {
    /// Number of parameters of this kernel type
    pub const ARITY: usize = 2;

    /// Constructor with length scale `sigma` and output `scale`
    pub fn new(sigma: F, scale: F) -> Self {
        GaussianKernel { sigma, scale }
    }

    /// Reconstruct from an ordered parameter slice `[sigma, scale]`
    pub fn from_parameters(parameters: &[F]) -> Result<Arc<dyn Kernel<F>>> {
        let &[sigma, scale] = parameters else {
            return Err(GpError::InvalidKernelParameters(format!(
                "GaussianKernel expects {} parameters, got {}",
                Self::ARITY,
                parameters.len()
            )));
        };
        if sigma == F::zero() {
            return Err(GpError::InvalidKernelParameters(
                "GaussianKernel sigma must be non-zero".to_string(),
            ));
        }
        Ok(Arc::new(GaussianKernel::new(sigma, scale)))
    }
}

impl<F: Float> Kernel<F> for GaussianKernel<F> {
    fn eval(&self, x: &ArrayView1<F>, y: &ArrayView1<F>) -> F {
        let r2 = squared_distance(x, y);
        self.scale * F::exp(-r2 / (F::cast(2.) * self.sigma * self.sigma))
    }

    fn parameters(&self) -> Vec<F> {
        vec![self.sigma, self.scale]
    }

    fn name(&self) -> String {
        "GaussianKernel".to_string()
    }
}

/// Periodic kernel
/// `k(x, y) = scale * exp(-2 sin^2(period * |x - y|) / sigma^2)`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PeriodicKernel<F: Float> {
    scale: F,
    period: F,
    sigma: F,
}

impl<F: Float> PeriodicKernel<F> {
    /// Number of parameters of this kernel type
    pub const ARITY: usize = 3;

    /// Constructor with output `scale`, angular `period` and length scale `sigma`
    pub fn new(scale: F, period: F, sigma: F) -> Self {
        PeriodicKernel {
            scale,
            period,
            sigma,
        }
    }

    /// Reconstruct from an ordered parameter slice `[scale, period, sigma]`
    pub fn from_parameters(parameters: &[F]) -> Result<Arc<dyn Kernel<F>>> {
        let &[scale, period, sigma] = parameters else {
            return Err(GpError::InvalidKernelParameters(format!(
                "PeriodicKernel expects {} parameters, got {}",
                Self::ARITY,
                parameters.len()
            )));
        };
        if sigma == F::zero() {
            return Err(GpError::InvalidKernelParameters(
                "PeriodicKernel sigma must be non-zero".to_string(),
            ));
        }
        Ok(Arc::new(PeriodicKernel::new(scale, period, sigma)))
    }
}

impl<F: Float> Kernel<F> for PeriodicKernel<F> {
    fn eval(&self, x: &ArrayView1<F>, y: &ArrayView1<F>) -> F {
        let r = squared_distance(x, y).sqrt();
        let s = F::sin(self.period * r);
        self.scale * F::exp(-F::cast(2.) * s * s / (self.sigma * self.sigma))
    }

    fn parameters(&self) -> Vec<F> {
        vec![self.scale, self.period, self.sigma]
    }

    fn name(&self) -> String {
        "PeriodicKernel".to_string()
    }
}

/// Pointwise sum of two sub-kernels over the same inputs
#[derive(Clone, Debug)]
pub struct SumKernel<F: Float> {
    left: Arc<dyn Kernel<F>>,
    right: Arc<dyn Kernel<F>>,
}

impl<F: Float> SumKernel<F> {
    /// Constructor from two shared sub-kernels
    pub fn new(left: Arc<dyn Kernel<F>>, right: Arc<dyn Kernel<F>>) -> Self {
        SumKernel { left, right }
    }
}

impl<F: Float> Kernel<F> for SumKernel<F> {
    fn eval(&self, x: &ArrayView1<F>, y: &ArrayView1<F>) -> F {
        self.left.eval(x, y) + self.right.eval(x, y)
    }

    fn parameters(&self) -> Vec<F> {
        let mut parameters = self.left.parameters();
        parameters.extend(self.right.parameters());
        parameters
    }

    fn name(&self) -> String {
        format!(
            "SumKernel{delim}{}{delim}{}",
            self.left.name(),
            self.right.name(),
            delim = KERNEL_NAME_DELIMITER
        )
    }
}

/// Pointwise product of two sub-kernels over the same inputs
#[derive(Clone, Debug)]
pub struct ProductKernel<F: Float> {
    left: Arc<dyn Kernel<F>>,
    right: Arc<dyn Kernel<F>>,
}

impl<F: Float> ProductKernel<F> {
    /// Constructor from two shared sub-kernels
    pub fn new(left: Arc<dyn Kernel<F>>, right: Arc<dyn Kernel<F>>) -> Self {
        ProductKernel { left, right }
    }
}

impl<F: Float> Kernel<F> for ProductKernel<F> {
    fn eval(&self, x: &ArrayView1<F>, y: &ArrayView1<F>) -> F {
        self.left.eval(x, y) * self.right.eval(x, y)
    }

    fn parameters(&self) -> Vec<F> {
        let mut parameters = self.left.parameters();
        parameters.extend(self.right.parameters());
        parameters
    }

    fn name(&self) -> String {
        format!(
            "ProductKernel{delim}{}{delim}{}",
            self.left.name(),
            self.right.name(),
            delim = KERNEL_NAME_DELIMITER
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    fn test_gaussian_kernel() {
        let k = GaussianKernel::new(1., 1.);
        let x = array![0., 0.];
        let y = array![1., 0.];
        assert_abs_diff_eq!(
            k.eval(&x.view(), &y.view()),
            f64::exp(-0.5),
            epsilon = 1e-12
        );
        // symmetric and one on the diagonal
        assert_abs_diff_eq!(
            k.eval(&x.view(), &y.view()),
            k.eval(&y.view(), &x.view()),
            epsilon = 1e-12
        );
        assert_abs_diff_eq!(k.eval(&x.view(), &x.view()), 1., epsilon = 1e-12);

        let scaled = GaussianKernel::new(2., 3.);
        assert_abs_diff_eq!(
            scaled.eval(&x.view(), &y.view()),
            3. * f64::exp(-1. / 8.),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_periodic_kernel() {
        let k = PeriodicKernel::new(1., std::f64::consts::FRAC_PI_2, 1.);
        let x = array![0.];
        let y = array![1.];
        // sin(pi/2) = 1 at unit distance
        assert_abs_diff_eq!(k.eval(&x.view(), &y.view()), f64::exp(-2.), epsilon = 1e-12);
        // periodicity: distance 2 maps back onto distance 0
        let z = array![2.];
        assert_abs_diff_eq!(k.eval(&x.view(), &z.view()), 1., epsilon = 1e-12);
    }

    #[test]
    fn test_composite_kernels() {
        let g: Arc<dyn Kernel<f64>> = Arc::new(GaussianKernel::new(1., 1.));
        let p: Arc<dyn Kernel<f64>> = Arc::new(PeriodicKernel::new(1., 1., 1.));
        let sum = SumKernel::new(g.clone(), p.clone());
        let prod = ProductKernel::new(g.clone(), p.clone());

        let x = array![0.];
        let y = array![0.7];
        let (gv, pv) = (g.eval(&x.view(), &y.view()), p.eval(&x.view(), &y.view()));
        assert_abs_diff_eq!(sum.eval(&x.view(), &y.view()), gv + pv, epsilon = 1e-12);
        assert_abs_diff_eq!(prod.eval(&x.view(), &y.view()), gv * pv, epsilon = 1e-12);
        assert_eq!(sum.parameters(), vec![1., 1., 1., 1., 1.]);
    }

    #[test]
    fn test_composite_name_encoding() {
        let g: Arc<dyn Kernel<f64>> = Arc::new(GaussianKernel::new(1., 1.));
        let p: Arc<dyn Kernel<f64>> = Arc::new(PeriodicKernel::new(1., 1., 1.));
        let inner: Arc<dyn Kernel<f64>> = Arc::new(ProductKernel::new(g.clone(), p));
        let outer = SumKernel::new(g, inner);
        assert_eq!(
            outer.name(),
            "SumKernel#GaussianKernel#ProductKernel#GaussianKernel#PeriodicKernel"
        );
    }

    #[test]
    fn test_structural_equality() {
        let a = GaussianKernel::new(1., 2.);
        let b = GaussianKernel::new(1., 2.);
        let c = GaussianKernel::new(1., 3.);
        let p = PeriodicKernel::new(1., 2., 3.);
        assert!(a.same_as(&b));
        assert!(!a.same_as(&c));
        assert!(!a.same_as(&p));
    }

    #[test]
    fn test_from_parameters_arity() {
        assert!(matches!(
            GaussianKernel::<f64>::from_parameters(&[1.]),
            Err(GpError::InvalidKernelParameters(_))
        ));
        assert!(matches!(
            GaussianKernel::<f64>::from_parameters(&[0., 1.]),
            Err(GpError::InvalidKernelParameters(_))
        ));
        let k = GaussianKernel::from_parameters(&[1.5, 2.]).unwrap();
        assert_eq!(k.parameters(), vec![1.5, 2.]);
    }
}
