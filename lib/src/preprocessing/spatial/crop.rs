//! CropData - crops `[C, H, W]` tensors to a bounding box.
//!
//! # Example
//! ```
//! use sciprep::backend::{CpuBackend, Tensor};
//! use sciprep::preprocessing::{tensor_dict, CropData, Transform};
//!
//! let crop = CropData::<CpuBackend>::new([0, 0], [256, 512], &["input", "label"]).unwrap();
//! let inputs = tensor_dict([("input", Tensor::full(&[3, 720, 1440], 0.0))]);
//! let labels = tensor_dict([("label", Tensor::full(&[3, 720, 1440], 0.0))]);
//! let weights = tensor_dict([("weight", Tensor::full(&[3, 720, 1440], 1.0))]);
//!
//! let out = crop.apply(&inputs, &labels, Some(&weights)).unwrap();
//! assert_eq!(out.inputs["input"].shape(), vec![3, 256, 512]);
//! assert_eq!(out.labels["label"].shape(), vec![3, 256, 512]);
//! assert_eq!(out.weights["weight"].shape(), vec![3, 720, 1440]);
//! ```

use crate::backend::{format_shape, resolve_slice, Backend, Tensor};
use crate::preprocessing::apply_keys::{default_apply_keys, ApplyKeys};
use crate::preprocessing::error::TransformError;
use crate::preprocessing::traits::{apply_selected, Sample, TensorDict, Transform};
use serde::{Deserialize, Serialize};
use std::marker::PhantomData;

/// Configuration for CropData.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CropDataConfig {
    /// Lower corner `[x0, y0]`.
    pub xmin: [i64; 2],
    /// Upper corner `[x1, y1]`, exclusive.
    pub xmax: [i64; 2],
    /// Which mappings to crop.
    #[serde(default = "default_apply_keys")]
    pub apply_keys: Vec<String>,
}

/// Crops every selected tensor to `value[:, x0:x1, y0:y1]`.
///
/// Bounds behave like array slices: negative values count from the end and
/// out-of-range values clamp to the axis. Tensors need at least three axes;
/// axes after the third are kept whole.
#[derive(Clone, Debug)]
pub struct CropData<B: Backend> {
    xmin: [i64; 2],
    xmax: [i64; 2],
    apply_keys: ApplyKeys,
    _backend: PhantomData<B>,
}

impl<B: Backend> CropData<B> {
    /// Create a new CropData transform.
    ///
    /// # Errors
    /// Returns [`TransformError::InvalidApplyKeys`] on an invalid key list.
    pub fn new<S: AsRef<str>>(
        xmin: [i64; 2],
        xmax: [i64; 2],
        apply_keys: &[S],
    ) -> Result<Self, TransformError> {
        Ok(Self::with_keys(xmin, xmax, ApplyKeys::new(apply_keys)?))
    }

    pub fn with_keys(xmin: [i64; 2], xmax: [i64; 2], apply_keys: ApplyKeys) -> Self {
        Self {
            xmin,
            xmax,
            apply_keys,
            _backend: PhantomData,
        }
    }

    pub fn from_config(config: &CropDataConfig) -> Result<Self, TransformError> {
        Self::new(config.xmin, config.xmax, config.apply_keys.as_slice())
    }

    pub fn xmin(&self) -> [i64; 2] {
        self.xmin
    }

    pub fn xmax(&self) -> [i64; 2] {
        self.xmax
    }

    fn crop(&self, value: &Tensor<B>) -> Result<Tensor<B>, TransformError> {
        let shape = value.shape();
        if shape.len() < 3 {
            return Err(TransformError::InvalidShape {
                expected: "tensor of shape [C, H, W]".to_string(),
                got: format!("ndim={} with shape {}", shape.len(), format_shape(&shape)),
            });
        }
        let ranges = [
            0..shape[0],
            resolve_slice(self.xmin[0], self.xmax[0], shape[1]),
            resolve_slice(self.xmin[1], self.xmax[1], shape[2]),
        ];
        value.slice_leading(&ranges)
    }
}

impl<B: Backend> Transform<B> for CropData<B> {
    fn apply(
        &self,
        inputs: &TensorDict<B>,
        labels: &TensorDict<B>,
        weights: Option<&TensorDict<B>>,
    ) -> Result<Sample<B>, TransformError> {
        apply_selected(self.apply_keys, inputs, labels, weights, |v| self.crop(v))
    }

    fn name(&self) -> &'static str {
        "CropData"
    }
}
