//! This library implements Gaussian process regression, also known as
//! kriging, for vector-valued inputs and outputs.
//!
//! A [`GaussianProcess`] accumulates sample/label pairs, fits lazily on the
//! first prediction (assembling the noise-regularized kernel matrix and
//! inverting it with a selectable [`InversionMethod`]) and then predicts
//! outputs, their derivatives and credible intervals for new inputs. Fitted
//! models persist to a set of plain-text resources and are restored through
//! a process-wide [`KernelRegistry`] that reconstructs the kernel, composite
//! kernels included, from its persisted name and parameters.
//!
//! The implementation is generic over `f32`/`f64` precision through the
//! [`linfa::Float`] trait.
//!
//! # Features
//!
//! * gaussian and periodic kernels, sum and product combinators to any
//!   nesting depth, user-registrable kernel types
//! * four kernel-matrix inversion strategies: full-pivoting LU, two-sided
//!   Jacobi SVD, divide-and-conquer SVD and symmetric eigendecomposition
//! * mean prediction, prediction derivative, posterior covariance and a
//!   two-standard-deviation credible interval
//! * plain-text persistence with exact float round-trip
//!
//! # Example
//!
//! ```no_run
//! use gpr::{kernels::GaussianKernel, GaussianProcess};
//! use ndarray::array;
//! use std::sync::Arc;
//!
//! let mut gp = GaussianProcess::new(Arc::new(GaussianKernel::new(1.0, 1.0)));
//! gp.set_noise(1e-6);
//! gp.add_sample(&array![0.], &array![0.])?;
//! gp.add_sample(&array![1.], &array![1.])?;
//! gp.add_sample(&array![2.], &array![4.])?;
//!
//! let mean = gp.predict(&array![1.5])?;
//! let band = gp.credible_interval(&array![1.5])?;
//! println!("f(1.5) = {} +/- {}", mean[0], band);
//!
//! gp.save("target/demo")?;
//! let restored = GaussianProcess::<f64>::load("target/demo")?;
//! assert_eq!(gp, restored);
//! # Ok::<(), gpr::GpError>(())
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::broken_intra_doc_links)]

mod algorithm;
mod errors;
mod inversion;
pub mod kernels;
mod matrix_io;
mod registry;
mod utils;

pub use algorithm::GaussianProcess;
pub use errors::{GpError, Result};
pub use inversion::InversionMethod;
pub use registry::{CombinatorCtor, KernelRegistry, LeafCtor, RegistryScalar};
