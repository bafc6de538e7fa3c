//! Building transforms from configuration.
//!
//! Built-in transforms are constructed directly from their config. A
//! `FunctionalTransform` entry names a user function, which must be
//! registered beforehand.
//!
//! # Example
//! ```
//! use sciprep::backend::{CpuBackend, Tensor};
//! use sciprep::preprocessing::{tensor_dict, ComposeConfig, Sample, Transform, TransformRegistry, TensorDict};
//!
//! let mut registry = TransformRegistry::<CpuBackend>::new();
//! registry.register("drop_labels", |inputs, _labels, weights| {
//!     Ok(Sample::new(inputs, TensorDict::new(), weights))
//! });
//!
//! let config = ComposeConfig::from_json_str(r#"{"transforms": [
//!     {"Scale": {"scale": {"x": 2.0}}},
//!     {"FunctionalTransform": {"transform_func": "drop_labels"}}
//! ]}"#).unwrap();
//! let pipeline = registry.build_compose(&config).unwrap();
//!
//! let inputs = tensor_dict([("x", Tensor::scalar(1.5))]);
//! let labels = tensor_dict([("y", Tensor::scalar(0.0))]);
//! let out = pipeline.apply(&inputs, &labels, None).unwrap();
//! assert_eq!(out.inputs["x"].to_vec(), vec![3.0]);
//! assert!(out.labels.is_empty());
//! ```

use crate::backend::Backend;
use crate::preprocessing::config::{ComposeConfig, TransformConfig};
use crate::preprocessing::elementwise::{Log1p, Normalize, Scale, Translate};
use crate::preprocessing::error::TransformError;
use crate::preprocessing::functional::{FunctionalTransform, TransformFn};
use crate::preprocessing::pipeline::Compose;
use crate::preprocessing::spatial::{CropData, SqueezeData};
use crate::preprocessing::traits::{Sample, TensorDict, Transform};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Any transform a configuration can describe.
#[derive(Clone, Debug)]
pub enum AnyTransform<B: Backend> {
    Translate(Translate<B>),
    Scale(Scale<B>),
    Normalize(Normalize<B>),
    Log1p(Log1p<B>),
    CropData(CropData<B>),
    SqueezeData(SqueezeData<B>),
    Functional(FunctionalTransform<B>),
}

impl<B: Backend> Transform<B> for AnyTransform<B> {
    fn apply(
        &self,
        inputs: &TensorDict<B>,
        labels: &TensorDict<B>,
        weights: Option<&TensorDict<B>>,
    ) -> Result<Sample<B>, TransformError> {
        match self {
            AnyTransform::Translate(t) => t.apply(inputs, labels, weights),
            AnyTransform::Scale(t) => t.apply(inputs, labels, weights),
            AnyTransform::Normalize(t) => t.apply(inputs, labels, weights),
            AnyTransform::Log1p(t) => t.apply(inputs, labels, weights),
            AnyTransform::CropData(t) => t.apply(inputs, labels, weights),
            AnyTransform::SqueezeData(t) => t.apply(inputs, labels, weights),
            AnyTransform::Functional(t) => t.apply(inputs, labels, weights),
        }
    }

    fn inverse(
        &self,
        inputs: &TensorDict<B>,
        labels: &TensorDict<B>,
        weights: Option<&TensorDict<B>>,
    ) -> Result<Sample<B>, TransformError> {
        match self {
            AnyTransform::Translate(t) => t.inverse(inputs, labels, weights),
            AnyTransform::Scale(t) => t.inverse(inputs, labels, weights),
            AnyTransform::Normalize(t) => t.inverse(inputs, labels, weights),
            AnyTransform::Log1p(t) => t.inverse(inputs, labels, weights),
            AnyTransform::CropData(t) => t.inverse(inputs, labels, weights),
            AnyTransform::SqueezeData(t) => t.inverse(inputs, labels, weights),
            AnyTransform::Functional(t) => t.inverse(inputs, labels, weights),
        }
    }

    fn supports_inverse(&self) -> bool {
        match self {
            AnyTransform::Translate(t) => t.supports_inverse(),
            AnyTransform::Scale(t) => t.supports_inverse(),
            AnyTransform::Normalize(t) => t.supports_inverse(),
            AnyTransform::Log1p(t) => t.supports_inverse(),
            AnyTransform::CropData(t) => t.supports_inverse(),
            AnyTransform::SqueezeData(t) => t.supports_inverse(),
            AnyTransform::Functional(t) => t.supports_inverse(),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            AnyTransform::Translate(t) => t.name(),
            AnyTransform::Scale(t) => t.name(),
            AnyTransform::Normalize(t) => t.name(),
            AnyTransform::Log1p(t) => t.name(),
            AnyTransform::CropData(t) => t.name(),
            AnyTransform::SqueezeData(t) => t.name(),
            AnyTransform::Functional(t) => t.name(),
        }
    }
}

/// Named user functions for `FunctionalTransform` configs.
pub struct TransformRegistry<B: Backend> {
    functions: HashMap<String, Arc<TransformFn<B>>>,
}

impl<B: Backend> Default for TransformRegistry<B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: Backend> fmt::Debug for TransformRegistry<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.functions.keys().collect();
        names.sort();
        f.debug_struct("TransformRegistry")
            .field("functions", &names)
            .finish()
    }
}

impl<B: Backend> TransformRegistry<B> {
    pub fn new() -> Self {
        Self {
            functions: HashMap::new(),
        }
    }

    /// Register `func` under `name`, replacing any previous entry.
    pub fn register<F>(&mut self, name: impl Into<String>, func: F) -> &mut Self
    where
        F: Fn(TensorDict<B>, TensorDict<B>, TensorDict<B>) -> Result<Sample<B>, TransformError>
            + Send
            + Sync
            + 'static,
    {
        let name = name.into();
        debug!(name = %name, "registering transform function");
        self.functions.insert(name, Arc::new(func));
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    /// Build one transform.
    ///
    /// # Errors
    /// Returns [`TransformError::UnknownFunction`] for an unregistered
    /// function name, or the construction error of the transform.
    pub fn build(&self, config: &TransformConfig) -> Result<AnyTransform<B>, TransformError> {
        let transform = match config {
            TransformConfig::Translate(c) => AnyTransform::Translate(Translate::from_config(c.clone())),
            TransformConfig::Scale(c) => AnyTransform::Scale(Scale::from_config(c.clone())),
            TransformConfig::Normalize(c) => AnyTransform::Normalize(Normalize::from_config(c)?),
            TransformConfig::Log1p(c) => AnyTransform::Log1p(Log1p::from_config(c)?),
            TransformConfig::CropData(c) => AnyTransform::CropData(CropData::from_config(c)?),
            TransformConfig::SqueezeData(c) => AnyTransform::SqueezeData(SqueezeData::from_config(c)?),
            TransformConfig::FunctionalTransform(c) => {
                let func = self
                    .functions
                    .get(&c.transform_func)
                    .ok_or_else(|| TransformError::UnknownFunction(c.transform_func.clone()))?;
                AnyTransform::Functional(FunctionalTransform::from_shared(Arc::clone(func)))
            }
        };
        Ok(transform)
    }

    /// Build a pipeline; fails on the first invalid entry.
    pub fn build_compose(&self, config: &ComposeConfig) -> Result<Compose<B>, TransformError> {
        let mut compose = Compose::new();
        for entry in &config.transforms {
            compose = compose.add(self.build(entry)?);
        }
        debug!(steps = compose.len(), "built compose from config");
        Ok(compose)
    }
}
