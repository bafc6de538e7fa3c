//! Normalize - standardizes tensors with a fixed mean and standard deviation.
//!
//! Every selected tensor `v` becomes
//! ```text
//! (v - mean) / std
//! ```
//! where `mean` and `std` are broadcast numpy-style against `v`. The same
//! statistics are used for inputs and labels. A zero in `std` is not
//! rejected and produces inf/NaN.
//!
//! # Example
//! ```
//! use sciprep::backend::{CpuBackend, Tensor};
//! use sciprep::preprocessing::{tensor_dict, Normalize, Transform, TensorDict};
//!
//! let normalize = Normalize::<CpuBackend>::new(
//!     Tensor::vector(vec![0.0]),
//!     Tensor::vector(vec![2.0]),
//!     &["input"],
//! )
//! .unwrap();
//! let inputs = tensor_dict([("x", Tensor::scalar(4.0))]);
//! let out = normalize.apply(&inputs, &TensorDict::new(), None).unwrap();
//! assert_eq!(out.inputs["x"].to_vec(), vec![2.0]);
//! ```

use crate::backend::{Backend, Tensor};
use crate::preprocessing::apply_keys::{default_apply_keys, ApplyKeys};
use crate::preprocessing::error::TransformError;
use crate::preprocessing::traits::{apply_selected, Sample, TensorDict, Transform};
use serde::{Deserialize, Serialize};

/// Configuration for Normalize.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NormalizeConfig {
    /// Mean values, row-major.
    pub mean: Vec<f64>,
    /// Standard deviation values, row-major.
    pub std: Vec<f64>,
    /// Shape of `mean` and `std`, e.g. `[3, 1, 1]` for per-channel statistics.
    /// One-dimensional when absent.
    #[serde(default)]
    pub shape: Option<Vec<usize>>,
    /// Which mappings to normalize.
    #[serde(default = "default_apply_keys")]
    pub apply_keys: Vec<String>,
}

/// Normalize transformer.
#[derive(Clone, Debug)]
pub struct Normalize<B: Backend> {
    mean: Tensor<B>,
    std: Tensor<B>,
    apply_keys: ApplyKeys,
}

impl<B: Backend> Normalize<B> {
    /// Create a new Normalize transform.
    ///
    /// # Errors
    /// Returns [`TransformError::InvalidApplyKeys`] if `apply_keys` is empty or
    /// names anything other than `"input"` / `"label"`.
    pub fn new<S: AsRef<str>>(
        mean: Tensor<B>,
        std: Tensor<B>,
        apply_keys: &[S],
    ) -> Result<Self, TransformError> {
        Ok(Self::with_keys(mean, std, ApplyKeys::new(apply_keys)?))
    }

    pub fn with_keys(mean: Tensor<B>, std: Tensor<B>, apply_keys: ApplyKeys) -> Self {
        Self {
            mean,
            std,
            apply_keys,
        }
    }

    /// Builds the transform from its configuration.
    ///
    /// # Errors
    /// Fails on invalid `apply_keys`, or when `shape` does not match the
    /// number of statistics given.
    pub fn from_config(config: &NormalizeConfig) -> Result<Self, TransformError> {
        let apply_keys = ApplyKeys::new(config.apply_keys.as_slice())?;
        let (mean, std) = match &config.shape {
            Some(shape) => (
                Tensor::new(config.mean.clone(), shape)?,
                Tensor::new(config.std.clone(), shape)?,
            ),
            None => (
                Tensor::vector(config.mean.clone()),
                Tensor::vector(config.std.clone()),
            ),
        };
        Ok(Self::with_keys(mean, std, apply_keys))
    }

    pub fn mean(&self) -> &Tensor<B> {
        &self.mean
    }

    pub fn std(&self) -> &Tensor<B> {
        &self.std
    }

    pub fn apply_keys(&self) -> ApplyKeys {
        self.apply_keys
    }
}

impl<B: Backend> Transform<B> for Normalize<B> {
    fn apply(
        &self,
        inputs: &TensorDict<B>,
        labels: &TensorDict<B>,
        weights: Option<&TensorDict<B>>,
    ) -> Result<Sample<B>, TransformError> {
        apply_selected(self.apply_keys, inputs, labels, weights, |v| {
            v.sub(&self.mean)?.div(&self.std)
        })
    }

    /// Restores `v * std + mean`.
    fn inverse(
        &self,
        inputs: &TensorDict<B>,
        labels: &TensorDict<B>,
        weights: Option<&TensorDict<B>>,
    ) -> Result<Sample<B>, TransformError> {
        apply_selected(self.apply_keys, inputs, labels, weights, |v| {
            v.mul(&self.std)?.add(&self.mean)
        })
    }

    fn supports_inverse(&self) -> bool {
        true
    }

    fn name(&self) -> &'static str {
        "Normalize"
    }
}
