//! Core types shared by every transform.
//!
//! - [`TensorDict`]: named tensors, one mapping per role.
//! - [`Sample`]: the `(inputs, labels, weights)` triple flowing through a pipeline.
//! - [`Transform`]: the single `apply` capability every transform exposes.

use crate::backend::{Backend, Tensor};
use crate::preprocessing::apply_keys::ApplyKeys;
use crate::preprocessing::error::TransformError;
use std::collections::BTreeMap;

/// Mapping from variable name to tensor.
pub type TensorDict<B> = BTreeMap<String, Tensor<B>>;

/// Builds a [`TensorDict`] from `(name, tensor)` pairs.
///
/// # Example
/// ```
/// use sciprep::backend::{CpuBackend, Tensor};
/// use sciprep::preprocessing::tensor_dict;
///
/// let inputs = tensor_dict([("x", Tensor::<CpuBackend>::scalar(1.0))]);
/// assert_eq!(inputs.len(), 1);
/// ```
pub fn tensor_dict<B, I, K>(entries: I) -> TensorDict<B>
where
    B: Backend,
    I: IntoIterator<Item = (K, Tensor<B>)>,
    K: Into<String>,
{
    entries.into_iter().map(|(k, v)| (k.into(), v)).collect()
}

/// The `(inputs, labels, weights)` triple a transform returns.
#[derive(Clone, Debug)]
pub struct Sample<B: Backend> {
    pub inputs: TensorDict<B>,
    pub labels: TensorDict<B>,
    pub weights: TensorDict<B>,
}

impl<B: Backend> Default for Sample<B> {
    fn default() -> Self {
        Self {
            inputs: TensorDict::new(),
            labels: TensorDict::new(),
            weights: TensorDict::new(),
        }
    }
}

impl<B: Backend> Sample<B> {
    pub fn new(inputs: TensorDict<B>, labels: TensorDict<B>, weights: TensorDict<B>) -> Self {
        Self {
            inputs,
            labels,
            weights,
        }
    }

    /// Copies the three mappings; an absent `weights` becomes an empty mapping.
    ///
    /// Tensors inside are shared, not duplicated.
    pub fn copied(
        inputs: &TensorDict<B>,
        labels: &TensorDict<B>,
        weights: Option<&TensorDict<B>>,
    ) -> Self {
        Self::new(
            inputs.clone(),
            labels.clone(),
            weights.cloned().unwrap_or_default(),
        )
    }

    pub fn into_parts(self) -> (TensorDict<B>, TensorDict<B>, TensorDict<B>) {
        (self.inputs, self.labels, self.weights)
    }
}

/// A stateless preprocessing step over a [`Sample`].
///
/// Implementations hold only construction-time configuration. `apply` takes
/// the three mappings by shared reference and returns new mappings, so the
/// caller's mappings are never modified.
///
/// # Example
/// ```
/// use sciprep::backend::{CpuBackend, Tensor};
/// use sciprep::preprocessing::{tensor_dict, Scale, Transform, TensorDict};
///
/// let scale = Scale::<CpuBackend>::new([("x", 1.5)]);
/// let inputs = tensor_dict([("x", Tensor::scalar(2.0))]);
/// let out = scale.apply(&inputs, &TensorDict::new(), None).unwrap();
/// assert_eq!(out.inputs["x"].to_vec(), vec![3.0]);
/// ```
pub trait Transform<B: Backend>: Send + Sync {
    /// Runs the transform.
    ///
    /// A missing `weights` mapping is treated as empty.
    ///
    /// # Errors
    /// Returns [`TransformError`] on shape errors; numeric domain problems
    /// surface as NaN/inf values instead.
    fn apply(
        &self,
        inputs: &TensorDict<B>,
        labels: &TensorDict<B>,
        weights: Option<&TensorDict<B>>,
    ) -> Result<Sample<B>, TransformError>;

    /// Runs the transform on a whole sample.
    fn apply_sample(&self, sample: &Sample<B>) -> Result<Sample<B>, TransformError> {
        self.apply(&sample.inputs, &sample.labels, Some(&sample.weights))
    }

    /// Undoes `apply`, for transforms where that is possible.
    ///
    /// # Errors
    /// Returns [`TransformError::NotInvertible`] by default.
    fn inverse(
        &self,
        _inputs: &TensorDict<B>,
        _labels: &TensorDict<B>,
        _weights: Option<&TensorDict<B>>,
    ) -> Result<Sample<B>, TransformError> {
        Err(TransformError::NotInvertible(self.name()))
    }

    /// Whether [`Transform::inverse`] is implemented.
    fn supports_inverse(&self) -> bool {
        false
    }

    /// Transform name, as used in configuration.
    fn name(&self) -> &'static str;
}

/// Rewrites every tensor of a mapping with `f`.
pub(crate) fn map_values<B, F>(dict: &TensorDict<B>, f: &F) -> Result<TensorDict<B>, TransformError>
where
    B: Backend,
    F: Fn(&Tensor<B>) -> Result<Tensor<B>, TransformError>,
{
    dict.iter()
        .map(|(key, value)| Ok((key.clone(), f(value)?)))
        .collect()
}

/// Applies `f` to every tensor of the mappings selected by `keys`.
///
/// Unselected mappings and the weights are copied through unchanged.
pub(crate) fn apply_selected<B, F>(
    keys: ApplyKeys,
    inputs: &TensorDict<B>,
    labels: &TensorDict<B>,
    weights: Option<&TensorDict<B>>,
    f: F,
) -> Result<Sample<B>, TransformError>
where
    B: Backend,
    F: Fn(&Tensor<B>) -> Result<Tensor<B>, TransformError>,
{
    use crate::preprocessing::apply_keys::Target;

    let inputs = if keys.contains(Target::Input) {
        map_values(inputs, &f)?
    } else {
        inputs.clone()
    };
    let labels = if keys.contains(Target::Label) {
        map_values(labels, &f)?
    } else {
        labels.clone()
    };
    Ok(Sample::new(inputs, labels, weights.cloned().unwrap_or_default()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::CpuBackend;

    #[test]
    fn test_sample_copied_shares_tensors() {
        let inputs = tensor_dict([("x", Tensor::<CpuBackend>::scalar(1.0))]);
        let labels = TensorDict::new();
        let sample = Sample::copied(&inputs, &labels, None);

        assert!(sample.weights.is_empty());
        assert!(sample.inputs["x"].shares_storage(&inputs["x"]));
    }

    #[test]
    fn test_apply_selected_only_touches_selected() {
        let inputs = tensor_dict([("x", Tensor::<CpuBackend>::scalar(1.0))]);
        let labels = tensor_dict([("y", Tensor::<CpuBackend>::scalar(1.0))]);
        let weights = tensor_dict([("w", Tensor::<CpuBackend>::scalar(1.0))]);

        let out = apply_selected(ApplyKeys::LABEL, &inputs, &labels, Some(&weights), |t| {
            Ok(t.add_scalar(1.0))
        })
        .unwrap();

        assert_eq!(out.inputs["x"].to_vec(), vec![1.0]);
        assert_eq!(out.labels["y"].to_vec(), vec![2.0]);
        assert!(out.weights["w"].shares_storage(&weights["w"]));
    }

    #[test]
    fn test_default_inverse_not_supported() {
        struct Identity;
        impl Transform<CpuBackend> for Identity {
            fn apply(
                &self,
                inputs: &TensorDict<CpuBackend>,
                labels: &TensorDict<CpuBackend>,
                weights: Option<&TensorDict<CpuBackend>>,
            ) -> Result<Sample<CpuBackend>, TransformError> {
                Ok(Sample::copied(inputs, labels, weights))
            }
            fn name(&self) -> &'static str {
                "Identity"
            }
        }

        let empty = TensorDict::new();
        let result = Identity.inverse(&empty, &empty, None);
        assert!(matches!(result, Err(TransformError::NotInvertible("Identity"))));
        assert!(!Identity.supports_inverse());
    }
}
