//! Translate - shifts named inputs by a per-variable offset.
//!
//! # Example
//! ```
//! use sciprep::backend::{CpuBackend, Tensor};
//! use sciprep::preprocessing::{tensor_dict, Transform, Translate, TensorDict};
//!
//! let translate = Translate::<CpuBackend>::new([("x", 1.0), ("y", -1.0)]);
//! let inputs = tensor_dict([("x", Tensor::scalar(1.0))]);
//! let out = translate.apply(&inputs, &TensorDict::new(), None).unwrap();
//! assert_eq!(out.inputs["x"].to_vec(), vec![2.0]);
//! ```

use crate::backend::Backend;
use crate::preprocessing::error::TransformError;
use crate::preprocessing::traits::{Sample, TensorDict, Transform};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::marker::PhantomData;
use tracing::trace;

/// Configuration for Translate.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TranslateConfig {
    /// Offset added to each named input.
    pub offset: BTreeMap<String, f64>,
}

/// Adds a scalar offset to selected entries of the input mapping.
///
/// Names in the offset table that are missing from the inputs are skipped.
/// Labels and weights pass through untouched.
#[derive(Clone, Debug)]
pub struct Translate<B: Backend> {
    offset: BTreeMap<String, f64>,
    _backend: PhantomData<B>,
}

impl<B: Backend> Translate<B> {
    pub fn new<I, K>(offset: I) -> Self
    where
        I: IntoIterator<Item = (K, f64)>,
        K: Into<String>,
    {
        Self::from_config(TranslateConfig {
            offset: offset.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        })
    }

    pub fn from_config(config: TranslateConfig) -> Self {
        Self {
            offset: config.offset,
            _backend: PhantomData,
        }
    }

    /// Get the configured offsets.
    pub fn offset(&self) -> &BTreeMap<String, f64> {
        &self.offset
    }

    fn shift(&self, inputs: &TensorDict<B>, sign: f64) -> TensorDict<B> {
        let mut shifted = inputs.clone();
        for (key, offset) in &self.offset {
            match inputs.get(key) {
                Some(value) => {
                    shifted.insert(key.clone(), value.add_scalar(sign * offset));
                }
                None => trace!(key = %key, "translate: variable not in inputs, skipped"),
            }
        }
        shifted
    }
}

impl<B: Backend> Transform<B> for Translate<B> {
    fn apply(
        &self,
        inputs: &TensorDict<B>,
        labels: &TensorDict<B>,
        weights: Option<&TensorDict<B>>,
    ) -> Result<Sample<B>, TransformError> {
        Ok(Sample::new(
            self.shift(inputs, 1.0),
            labels.clone(),
            weights.cloned().unwrap_or_default(),
        ))
    }

    fn inverse(
        &self,
        inputs: &TensorDict<B>,
        labels: &TensorDict<B>,
        weights: Option<&TensorDict<B>>,
    ) -> Result<Sample<B>, TransformError> {
        Ok(Sample::new(
            self.shift(inputs, -1.0),
            labels.clone(),
            weights.cloned().unwrap_or_default(),
        ))
    }

    fn supports_inverse(&self) -> bool {
        true
    }

    fn name(&self) -> &'static str {
        "Translate"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{CpuBackend, Tensor};
    use crate::preprocessing::traits::tensor_dict;

    fn create_inputs() -> TensorDict<CpuBackend> {
        tensor_dict([
            ("x", Tensor::scalar(1.0)),
            ("t", Tensor::vector(vec![0.0, 0.5])),
        ])
    }

    #[test]
    fn test_translate_configured_key() {
        let inputs = create_inputs();
        let translate = Translate::<CpuBackend>::new([("x", 2.0)]);
        let out = translate.apply(&inputs, &TensorDict::new(), None).unwrap();

        assert!((out.inputs["x"].to_vec()[0] - 3.0).abs() < 1e-12);
        // Not configured: same tensor, untouched
        assert!(out.inputs["t"].shares_storage(&inputs["t"]));
    }

    #[test]
    fn test_translate_missing_key_skipped() {
        let inputs = create_inputs();
        let translate = Translate::<CpuBackend>::new([("x", 2.0), ("z", 5.0)]);
        let out = translate.apply(&inputs, &TensorDict::new(), None).unwrap();

        assert_eq!(out.inputs.len(), inputs.len());
        assert!(!out.inputs.contains_key("z"));
    }

    #[test]
    fn test_translate_does_not_mutate_inputs() {
        let inputs = create_inputs();
        let labels = tensor_dict([("x", Tensor::<CpuBackend>::scalar(1.0))]);
        let translate = Translate::<CpuBackend>::new([("x", 2.0)]);
        let out = translate.apply(&inputs, &labels, None).unwrap();

        assert_eq!(inputs["x"].to_vec(), vec![1.0]);
        // Labels are never translated, even when names collide
        assert_eq!(out.labels["x"].to_vec(), vec![1.0]);
        assert!(out.weights.is_empty());
    }

    #[test]
    fn test_translate_inverse() {
        let inputs = create_inputs();
        let translate = Translate::<CpuBackend>::new([("t", -0.25)]);
        let shifted = translate.apply(&inputs, &TensorDict::new(), None).unwrap();
        let twice = translate.apply_sample(&shifted).unwrap();
        assert_eq!(twice.inputs["t"].to_vec(), vec![-0.5, 0.0]);

        let back = translate
            .inverse(&shifted.inputs, &shifted.labels, Some(&shifted.weights))
            .unwrap();
        assert_eq!(back.inputs["t"].to_vec(), vec![0.0, 0.5]);
    }
}
