//! Log1p - natural logarithm of one plus the scaled data, elementwise.
//!
//! ```text
//! v' = ln(1 + v / scale)
//! ```
//! Values with `v / scale <= -1` are outside the domain and produce NaN or
//! `-inf`; they are not rejected.

use crate::backend::Backend;
use crate::preprocessing::apply_keys::{default_apply_keys, ApplyKeys};
use crate::preprocessing::error::TransformError;
use crate::preprocessing::traits::{apply_selected, Sample, TensorDict, Transform};
use serde::{Deserialize, Serialize};
use std::marker::PhantomData;

fn default_scale() -> f64 {
    1.0
}

/// Configuration for Log1p.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Log1pConfig {
    /// Divisor applied before the logarithm.
    #[serde(default = "default_scale")]
    pub scale: f64,
    /// Which mappings to transform.
    #[serde(default = "default_apply_keys")]
    pub apply_keys: Vec<String>,
}

impl Default for Log1pConfig {
    fn default() -> Self {
        Self {
            scale: default_scale(),
            apply_keys: default_apply_keys(),
        }
    }
}

/// Log1p transformer.
#[derive(Clone, Debug)]
pub struct Log1p<B: Backend> {
    scale: f64,
    apply_keys: ApplyKeys,
    _backend: PhantomData<B>,
}

impl<B: Backend> Default for Log1p<B> {
    fn default() -> Self {
        Self::with_keys(default_scale(), ApplyKeys::BOTH)
    }
}

impl<B: Backend> Log1p<B> {
    /// Create a new Log1p transform.
    ///
    /// # Errors
    /// Returns [`TransformError::InvalidApplyKeys`] on an invalid key list.
    pub fn new<S: AsRef<str>>(scale: f64, apply_keys: &[S]) -> Result<Self, TransformError> {
        Ok(Self::with_keys(scale, ApplyKeys::new(apply_keys)?))
    }

    pub fn with_keys(scale: f64, apply_keys: ApplyKeys) -> Self {
        Self {
            scale,
            apply_keys,
            _backend: PhantomData,
        }
    }

    pub fn from_config(config: &Log1pConfig) -> Result<Self, TransformError> {
        Self::new(config.scale, config.apply_keys.as_slice())
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn apply_keys(&self) -> ApplyKeys {
        self.apply_keys
    }
}

impl<B: Backend> Transform<B> for Log1p<B> {
    fn apply(
        &self,
        inputs: &TensorDict<B>,
        labels: &TensorDict<B>,
        weights: Option<&TensorDict<B>>,
    ) -> Result<Sample<B>, TransformError> {
        let scale = self.scale;
        apply_selected(self.apply_keys, inputs, labels, weights, |v| {
            Ok(v.map(|x| (x / scale).ln_1p()))
        })
    }

    /// Restores `expm1(v) * scale`.
    fn inverse(
        &self,
        inputs: &TensorDict<B>,
        labels: &TensorDict<B>,
        weights: Option<&TensorDict<B>>,
    ) -> Result<Sample<B>, TransformError> {
        let scale = self.scale;
        apply_selected(self.apply_keys, inputs, labels, weights, |v| {
            Ok(v.map(|y| y.exp_m1() * scale))
        })
    }

    fn supports_inverse(&self) -> bool {
        true
    }

    fn name(&self) -> &'static str {
        "Log1p"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{CpuBackend, Tensor};
    use crate::preprocessing::traits::tensor_dict;
    use std::f64::consts::E;

    #[test]
    fn test_log1p_unit_scale() {
        let inputs = tensor_dict([("x", Tensor::<CpuBackend>::scalar(E - 1.0))]);
        let log1p = Log1p::<CpuBackend>::default();
        let out = log1p.apply(&inputs, &TensorDict::new(), None).unwrap();

        assert!((out.inputs["x"].to_vec()[0] - 1.0).abs() < 1e-12);
        assert!((inputs["x"].to_vec()[0] - (E - 1.0)).abs() < 1e-12);
    }

    #[test]
    fn test_log1p_scaled_labels_only() {
        let inputs = tensor_dict([("x", Tensor::<CpuBackend>::scalar(3.0))]);
        let labels = tensor_dict([("y", Tensor::<CpuBackend>::vector(vec![0.0, 1e-5]))]);
        let log1p = Log1p::<CpuBackend>::new(1e-5, &["label"]).unwrap();
        let out = log1p.apply(&inputs, &labels, None).unwrap();

        let y = out.labels["y"].to_vec();
        assert_eq!(y[0], 0.0);
        assert!((y[1] - 2f64.ln()).abs() < 1e-12);
        assert_eq!(out.inputs["x"].to_vec(), vec![3.0]);
    }

    #[test]
    fn test_log1p_domain_violation_propagates() {
        let inputs = tensor_dict([("x", Tensor::<CpuBackend>::vector(vec![-1.0, -2.0]))]);
        let out = Log1p::<CpuBackend>::default()
            .apply(&inputs, &TensorDict::new(), None)
            .unwrap();
        let values = out.inputs["x"].to_vec();

        assert_eq!(values[0], f64::NEG_INFINITY);
        assert!(values[1].is_nan());
    }

    #[test]
    fn test_log1p_invalid_apply_keys() {
        assert!(Log1p::<CpuBackend>::new::<&str>(1.0, &[]).is_err());
        assert!(Log1p::<CpuBackend>::new(1.0, &["input", "extra"]).is_err());
    }

    #[test]
    fn test_log1p_config_defaults() {
        let config: Log1pConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, Log1pConfig::default());

        let log1p = Log1p::<CpuBackend>::from_config(&config).unwrap();
        assert_eq!(log1p.scale(), 1.0);
        assert_eq!(log1p.apply_keys(), ApplyKeys::BOTH);
    }

    #[test]
    fn test_log1p_inverse() {
        let inputs = tensor_dict([("x", Tensor::<CpuBackend>::vector(vec![0.5, 20.0]))]);
        let log1p = Log1p::<CpuBackend>::new(2.0, &["input"]).unwrap();
        let out = log1p.apply(&inputs, &TensorDict::new(), None).unwrap();
        let back = log1p.inverse(&out.inputs, &out.labels, None).unwrap();

        for (a, b) in back.inputs["x"].to_vec().iter().zip([0.5, 20.0]) {
            assert!((a - b).abs() < 1e-9);
        }
    }
}
