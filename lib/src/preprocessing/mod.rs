//! Sample preprocessing transforms.
//!
//! A sample is three mappings from variable name to tensor: `inputs`,
//! `labels` and `weights`. Transforms read them by reference and return new
//! mappings, so the caller's sample is never modified.
//!
//! # Core Types
//!
//! - [`Transform`]: the single `apply` capability every transform exposes
//! - [`Sample`] / [`TensorDict`]: the data a transform consumes and produces
//! - [`ApplyKeys`]: which of `inputs` / `labels` a transform touches
//!
//! # Available Transforms
//!
//! ## Elementwise
//! - [`Translate`]: add a per-variable offset to inputs
//! - [`Scale`]: multiply inputs by a per-variable factor
//! - [`Normalize`]: `(v - mean) / std` with broadcast statistics
//! - [`Log1p`]: `ln(1 + v / scale)`
//!
//! ## Spatial
//! - [`CropData`]: crop `[C, H, W]` tensors to a bounding box
//! - [`SqueezeData`]: fold `[B, C, H, W]` into `[B*C, H, W]`
//!
//! ## Composition
//! - [`FunctionalTransform`]: delegate to a user function
//! - [`Compose`]: chain transforms
//! - [`TransformRegistry`]: build transforms from a [`ComposeConfig`]
//!
//! # Example
//!
//! ```
//! use sciprep::backend::{CpuBackend, Tensor};
//! use sciprep::preprocessing::{tensor_dict, Compose, CropData, Normalize, Transform};
//!
//! let pipeline = Compose::<CpuBackend>::new()
//!     .add(Normalize::new(Tensor::vector(vec![1.0]), Tensor::vector(vec![2.0]), &["input"]).unwrap())
//!     .add(CropData::new([0, 0], [2, 2], &["input", "label"]).unwrap());
//!
//! let inputs = tensor_dict([("t2m", Tensor::full(&[1, 4, 4], 5.0))]);
//! let labels = tensor_dict([("tp", Tensor::full(&[1, 4, 4], 0.5))]);
//! let out = pipeline.apply(&inputs, &labels, None).unwrap();
//!
//! assert_eq!(out.inputs["t2m"].shape(), vec![1, 2, 2]);
//! assert_eq!(out.inputs["t2m"].to_vec(), vec![2.0; 4]);
//! assert_eq!(out.labels["tp"].to_vec(), vec![0.5; 4]);
//! ```

pub mod apply_keys;
pub mod config;
pub mod elementwise;
pub mod error;
pub mod functional;
pub mod pipeline;
pub mod registry;
pub mod spatial;
pub mod traits;

// Re-export main types
pub use apply_keys::{ApplyKeys, Target};
pub use config::{ComposeConfig, TransformConfig};
pub use elementwise::{
    Log1p, Log1pConfig, Normalize, NormalizeConfig, Scale, ScaleConfig, Translate,
    TranslateConfig,
};
pub use error::TransformError;
pub use functional::{FunctionalConfig, FunctionalTransform, TransformFn};
pub use pipeline::Compose;
pub use registry::{AnyTransform, TransformRegistry};
pub use spatial::{CropData, CropDataConfig, SqueezeData, SqueezeDataConfig};
pub use traits::{tensor_dict, Sample, TensorDict, Transform};
