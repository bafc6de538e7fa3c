//! SqueezeData - folds `[B, C, H, W]` tensors into `[B*C, H, W]`.
//!
//! Despite the name this is not a singleton-axis squeeze: rank-4 tensors are
//! reshaped first, then anything that is still not rank 3 is rejected.

use crate::backend::{Backend, Tensor};
use crate::preprocessing::apply_keys::{default_apply_keys, ApplyKeys};
use crate::preprocessing::error::TransformError;
use crate::preprocessing::traits::{apply_selected, Sample, TensorDict, Transform};
use serde::{Deserialize, Serialize};
use std::marker::PhantomData;

/// Configuration for SqueezeData.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SqueezeDataConfig {
    /// Which mappings to squeeze.
    #[serde(default = "default_apply_keys")]
    pub apply_keys: Vec<String>,
}

impl Default for SqueezeDataConfig {
    fn default() -> Self {
        Self {
            apply_keys: default_apply_keys(),
        }
    }
}

/// SqueezeData transformer.
#[derive(Clone, Debug)]
pub struct SqueezeData<B: Backend> {
    apply_keys: ApplyKeys,
    _backend: PhantomData<B>,
}

impl<B: Backend> Default for SqueezeData<B> {
    fn default() -> Self {
        Self::with_keys(ApplyKeys::BOTH)
    }
}

impl<B: Backend> SqueezeData<B> {
    /// Create a new SqueezeData transform.
    ///
    /// # Errors
    /// Returns [`TransformError::InvalidApplyKeys`] on an invalid key list.
    pub fn new<S: AsRef<str>>(apply_keys: &[S]) -> Result<Self, TransformError> {
        Ok(Self::with_keys(ApplyKeys::new(apply_keys)?))
    }

    pub fn with_keys(apply_keys: ApplyKeys) -> Self {
        Self {
            apply_keys,
            _backend: PhantomData,
        }
    }

    pub fn from_config(config: &SqueezeDataConfig) -> Result<Self, TransformError> {
        Self::new(config.apply_keys.as_slice())
    }
}

fn squeeze<B: Backend>(value: &Tensor<B>) -> Result<Tensor<B>, TransformError> {
    let shape = value.shape();
    let value = match *shape.as_slice() {
        [b, c, h, w] => value.reshape(&[b * c, h, w])?,
        _ => value.clone(),
    };
    if value.ndim() != 3 {
        return Err(TransformError::UnsupportedRank(value.ndim()));
    }
    Ok(value)
}

impl<B: Backend> Transform<B> for SqueezeData<B> {
    fn apply(
        &self,
        inputs: &TensorDict<B>,
        labels: &TensorDict<B>,
        weights: Option<&TensorDict<B>>,
    ) -> Result<Sample<B>, TransformError> {
        apply_selected(self.apply_keys, inputs, labels, weights, squeeze::<B>)
    }

    fn name(&self) -> &'static str {
        "SqueezeData"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::CpuBackend;
    use crate::preprocessing::traits::tensor_dict;

    #[test]
    fn test_squeeze_rank4() {
        let inputs = tensor_dict([("x", Tensor::<CpuBackend>::full(&[2, 3, 4, 5], 1.0))]);
        let out = SqueezeData::<CpuBackend>::default()
            .apply(&inputs, &TensorDict::new(), None)
            .unwrap();

        assert_eq!(out.inputs["x"].shape(), vec![6, 4, 5]);
        assert_eq!(inputs["x"].shape(), vec![2, 3, 4, 5]);
    }

    #[test]
    fn test_squeeze_rank3_passthrough() {
        let labels = tensor_dict([("y", Tensor::<CpuBackend>::full(&[3, 4, 5], 1.0))]);
        let out = SqueezeData::<CpuBackend>::new(&["label"])
            .unwrap()
            .apply(&TensorDict::new(), &labels, None)
            .unwrap();

        assert!(out.labels["y"].shares_storage(&labels["y"]));
    }

    #[test]
    fn test_squeeze_rejects_other_ranks() {
        for shape in [vec![2, 3], vec![1, 2, 3, 4, 5]] {
            let inputs = tensor_dict([("x", Tensor::<CpuBackend>::full(&shape, 0.0))]);
            let result = SqueezeData::<CpuBackend>::default().apply(&inputs, &TensorDict::new(), None);
            match result {
                Err(TransformError::UnsupportedRank(ndim)) => assert_eq!(ndim, shape.len()),
                other => panic!("expected rank error, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_squeeze_unselected_mapping_not_checked() {
        let inputs = tensor_dict([("x", Tensor::<CpuBackend>::full(&[2, 3], 0.0))]);
        let out = SqueezeData::<CpuBackend>::new(&["label"])
            .unwrap()
            .apply(&inputs, &TensorDict::new(), None)
            .unwrap();

        assert_eq!(out.inputs["x"].shape(), vec![2, 3]);
    }

    #[test]
    fn test_squeeze_invalid_apply_keys() {
        assert!(SqueezeData::<CpuBackend>::new::<&str>(&[]).is_err());
        assert!(SqueezeData::<CpuBackend>::new(&["input", "extra"]).is_err());
    }
}
