//! Scale - multiplies named inputs by a per-variable factor.

use crate::backend::Backend;
use crate::preprocessing::error::TransformError;
use crate::preprocessing::traits::{Sample, TensorDict, Transform};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::marker::PhantomData;
use tracing::trace;

/// Configuration for Scale.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ScaleConfig {
    /// Factor applied to each named input.
    pub scale: BTreeMap<String, f64>,
}

/// Multiplies selected entries of the input mapping by a scalar factor.
///
/// Names missing from the inputs are skipped; labels and weights pass through.
#[derive(Clone, Debug)]
pub struct Scale<B: Backend> {
    scale: BTreeMap<String, f64>,
    _backend: PhantomData<B>,
}

impl<B: Backend> Scale<B> {
    pub fn new<I, K>(scale: I) -> Self
    where
        I: IntoIterator<Item = (K, f64)>,
        K: Into<String>,
    {
        Self::from_config(ScaleConfig {
            scale: scale.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        })
    }

    pub fn from_config(config: ScaleConfig) -> Self {
        Self {
            scale: config.scale,
            _backend: PhantomData,
        }
    }

    pub fn scale(&self) -> &BTreeMap<String, f64> {
        &self.scale
    }

    fn rescale(&self, inputs: &TensorDict<B>, invert: bool) -> TensorDict<B> {
        let mut scaled = inputs.clone();
        for (key, &factor) in &self.scale {
            let Some(value) = inputs.get(key) else {
                trace!(key = %key, "scale: variable not in inputs, skipped");
                continue;
            };
            let value = if invert {
                value.map(|x| x / factor)
            } else {
                value.mul_scalar(factor)
            };
            scaled.insert(key.clone(), value);
        }
        scaled
    }
}

impl<B: Backend> Transform<B> for Scale<B> {
    fn apply(
        &self,
        inputs: &TensorDict<B>,
        labels: &TensorDict<B>,
        weights: Option<&TensorDict<B>>,
    ) -> Result<Sample<B>, TransformError> {
        Ok(Sample::new(
            self.rescale(inputs, false),
            labels.clone(),
            weights.cloned().unwrap_or_default(),
        ))
    }

    /// Divides by the factor; a zero factor yields inf/NaN.
    fn inverse(
        &self,
        inputs: &TensorDict<B>,
        labels: &TensorDict<B>,
        weights: Option<&TensorDict<B>>,
    ) -> Result<Sample<B>, TransformError> {
        Ok(Sample::new(
            self.rescale(inputs, true),
            labels.clone(),
            weights.cloned().unwrap_or_default(),
        ))
    }

    fn supports_inverse(&self) -> bool {
        true
    }

    fn name(&self) -> &'static str {
        "Scale"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{CpuBackend, Tensor};
    use crate::preprocessing::traits::tensor_dict;

    #[test]
    fn test_scale_configured_key() {
        let inputs = tensor_dict([("x", Tensor::<CpuBackend>::scalar(2.0))]);
        let scale = Scale::<CpuBackend>::new([("x", 1.5)]);
        let out = scale.apply(&inputs, &TensorDict::new(), None).unwrap();

        assert!((out.inputs["x"].to_vec()[0] - 3.0).abs() < 1e-12);
        assert_eq!(inputs["x"].to_vec(), vec![2.0]);
    }

    #[test]
    fn test_scale_missing_and_unconfigured_keys() {
        let inputs = tensor_dict([
            ("x", Tensor::<CpuBackend>::vector(vec![1.0, 2.0])),
            ("y", Tensor::<CpuBackend>::vector(vec![3.0])),
        ]);
        let scale = Scale::<CpuBackend>::new([("x", 2.0), ("missing", 10.0)]);
        let out = scale.apply(&inputs, &TensorDict::new(), None).unwrap();

        assert_eq!(out.inputs.len(), 2);
        assert_eq!(out.inputs["x"].to_vec(), vec![2.0, 4.0]);
        assert!(out.inputs["y"].shares_storage(&inputs["y"]));
    }

    #[test]
    fn test_scale_keeps_labels_and_weights() {
        let inputs = tensor_dict([("x", Tensor::<CpuBackend>::scalar(2.0))]);
        let labels = tensor_dict([("x", Tensor::<CpuBackend>::scalar(2.0))]);
        let weights = tensor_dict([("x", Tensor::<CpuBackend>::scalar(0.5))]);
        let scale = Scale::<CpuBackend>::new([("x", 3.0)]);
        let out = scale.apply(&inputs, &labels, Some(&weights)).unwrap();

        assert_eq!(out.labels["x"].to_vec(), vec![2.0]);
        assert!(out.weights["x"].shares_storage(&weights["x"]));
    }

    #[test]
    fn test_scale_inverse() {
        let inputs = tensor_dict([("x", Tensor::<CpuBackend>::vector(vec![1.0, -4.0]))]);
        let scale = Scale::<CpuBackend>::new([("x", 4.0)]);
        let out = scale.apply(&inputs, &TensorDict::new(), None).unwrap();
        let back = scale.inverse(&out.inputs, &out.labels, None).unwrap();

        assert_eq!(back.inputs["x"].to_vec(), vec![1.0, -4.0]);
        assert!(scale.supports_inverse());
    }
}
