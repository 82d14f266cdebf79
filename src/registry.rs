//! Name-based kernel reconstruction used when loading persisted models.
//!
//! The registry maps a kernel type name to a reconstruction entry. Leaf
//! kernels carry their parameter arity and a constructor over a parameter
//! slice; combinators (sum, product) carry a function combining two already
//! reconstructed children. Composite names are decoded by a small
//! recursive-descent parser over the `#`-delimited token stream, so nested
//! sum and product kernels reconstruct symmetrically to any depth, each leaf
//! consuming its arity's worth of the flat parameter list in order.
//!
//! One registry exists per scalar precision. The process-wide instances are
//! populated with the built-in kernel set on first access and never mutated
//! afterwards, so lookups need no synchronization.

use crate::errors::{GpError, Result};
use crate::kernels::{
    GaussianKernel, Kernel, PeriodicKernel, ProductKernel, SumKernel, KERNEL_NAME_DELIMITER,
};
use linfa::Float;
use paste::paste;
use std::collections::HashMap;
use std::str::Split;
use std::sync::{Arc, OnceLock};

/// Reconstructs a leaf kernel from its ordered parameter slice.
pub type LeafCtor<F> = fn(&[F]) -> Result<Arc<dyn Kernel<F>>>;

/// Combines two reconstructed children into a composite kernel.
pub type CombinatorCtor<F> = fn(Arc<dyn Kernel<F>>, Arc<dyn Kernel<F>>) -> Arc<dyn Kernel<F>>;

enum KernelEntry<F: Float> {
    Leaf { arity: usize, ctor: LeafCtor<F> },
    Combinator(CombinatorCtor<F>),
}

/// A mapping from kernel type names to reconstruction functions.
pub struct KernelRegistry<F: Float> {
    entries: HashMap<String, KernelEntry<F>>,
}

impl<F: Float> Default for KernelRegistry<F> {
    fn default() -> Self {
        KernelRegistry::with_builtin_kernels()
    }
}

impl<F: Float> KernelRegistry<F> {
    /// An empty registry
    pub fn new() -> Self {
        KernelRegistry {
            entries: HashMap::new(),
        }
    }

    /// A registry populated with the built-in kernel set
    /// {Gaussian, Periodic, Sum, Product}
    pub fn with_builtin_kernels() -> Self {
        let mut registry = KernelRegistry::new();
        registry.register_leaf(
            "GaussianKernel",
            GaussianKernel::<F>::ARITY,
            GaussianKernel::from_parameters,
        );
        registry.register_leaf(
            "PeriodicKernel",
            PeriodicKernel::<F>::ARITY,
            PeriodicKernel::from_parameters,
        );
        registry.register_combinator("SumKernel", |left, right| Arc::new(SumKernel::new(left, right)));
        registry.register_combinator("ProductKernel", |left, right| {
            Arc::new(ProductKernel::new(left, right))
        });
        registry
    }

    /// Register a leaf kernel type; a later registration under the same name wins.
    pub fn register_leaf(&mut self, name: &str, arity: usize, ctor: LeafCtor<F>) {
        self.entries
            .insert(name.to_string(), KernelEntry::Leaf { arity, ctor });
    }

    /// Register a combinator kernel type; a later registration under the same name wins.
    pub fn register_combinator(&mut self, name: &str, ctor: CombinatorCtor<F>) {
        self.entries
            .insert(name.to_string(), KernelEntry::Combinator(ctor));
    }

    /// Whether a type name has an entry
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Reconstruct a kernel from its (possibly composite) encoded name and
    /// its flat parameter list.
    pub fn load(&self, name: &str, parameters: &[F]) -> Result<Arc<dyn Kernel<F>>> {
        let mut tokens = name.split(KERNEL_NAME_DELIMITER);
        let mut parameters = parameters;
        let kernel = self.parse(name, &mut tokens, &mut parameters)?;
        if tokens.next().is_some() {
            return Err(GpError::TokenizationFailure(name.to_string()));
        }
        if !parameters.is_empty() {
            return Err(GpError::InvalidKernelParameters(format!(
                "{} unconsumed parameter(s) for kernel {name}",
                parameters.len()
            )));
        }
        Ok(kernel)
    }

    fn parse(
        &self,
        name: &str,
        tokens: &mut Split<char>,
        parameters: &mut &[F],
    ) -> Result<Arc<dyn Kernel<F>>> {
        let token = tokens
            .next()
            .ok_or_else(|| GpError::TokenizationFailure(name.to_string()))?;
        match self.entries.get(token) {
            None => Err(GpError::KernelNotFound(token.to_string())),
            Some(KernelEntry::Combinator(ctor)) => {
                let left = self.parse(name, tokens, parameters)?;
                let right = self.parse(name, tokens, parameters)?;
                Ok(ctor(left, right))
            }
            Some(KernelEntry::Leaf { arity, ctor }) => {
                if parameters.len() < *arity {
                    return Err(GpError::InvalidKernelParameters(format!(
                        "kernel {token} expects {arity} parameter(s), {} left",
                        parameters.len()
                    )));
                }
                let (head, rest) = parameters.split_at(*arity);
                *parameters = rest;
                ctor(head)
            }
        }
    }
}

/// Scalar precisions for which a process-wide kernel registry exists.
pub trait RegistryScalar: Float {
    /// The process-wide registry for this precision, populated with the
    /// built-in kernels on first access and read-only afterwards.
    fn registry() -> &'static KernelRegistry<Self>;
}

macro_rules! impl_registry_scalar {
    ($($scalar:ident),*) => {
        $(paste! {
            static [<REGISTRY_ $scalar:upper>]: OnceLock<KernelRegistry<$scalar>> = OnceLock::new();

            impl RegistryScalar for $scalar {
                fn registry() -> &'static KernelRegistry<$scalar> {
                    [<REGISTRY_ $scalar:upper>].get_or_init(KernelRegistry::with_builtin_kernels)
                }
            }
        })*
    };
}

impl_registry_scalar!(f32, f64);
