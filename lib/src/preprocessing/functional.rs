//! FunctionalTransform - wraps a user function for cases the built-ins miss.
//!
//! # Example
//! ```
//! use sciprep::backend::{CpuBackend, Tensor};
//! use sciprep::preprocessing::{tensor_dict, FunctionalTransform, Sample, Transform, TensorDict};
//!
//! let halve = FunctionalTransform::<CpuBackend>::new(|mut inputs, labels, weights| {
//!     for value in inputs.values_mut() {
//!         *value = value.mul_scalar(0.5);
//!     }
//!     Ok(Sample::new(inputs, labels, weights))
//! });
//!
//! let inputs = tensor_dict([("x", Tensor::scalar(3.0))]);
//! let out = halve.apply(&inputs, &TensorDict::new(), None).unwrap();
//! assert_eq!(out.inputs["x"].to_vec(), vec![1.5]);
//! assert_eq!(inputs["x"].to_vec(), vec![3.0]);
//! ```

use crate::backend::Backend;
use crate::preprocessing::error::TransformError;
use crate::preprocessing::traits::{Sample, TensorDict, Transform};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Signature of a user transform: owned copies in, sample out.
pub type TransformFn<B> = dyn Fn(TensorDict<B>, TensorDict<B>, TensorDict<B>) -> Result<Sample<B>, TransformError>
    + Send
    + Sync;

/// Configuration for FunctionalTransform: the name a function was registered under.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FunctionalConfig {
    pub transform_func: String,
}

/// Delegates to a user function.
///
/// The function receives copies of the three mappings, so it may insert,
/// remove or replace entries freely without affecting the caller. Tensors
/// inside the copies share storage with the originals. An absent weights
/// mapping is passed as an empty one. The result is returned as is.
#[derive(Clone)]
pub struct FunctionalTransform<B: Backend> {
    func: Arc<TransformFn<B>>,
}

impl<B: Backend> fmt::Debug for FunctionalTransform<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionalTransform").finish_non_exhaustive()
    }
}

impl<B: Backend> FunctionalTransform<B> {
    pub fn new<F>(func: F) -> Self
    where
        F: Fn(TensorDict<B>, TensorDict<B>, TensorDict<B>) -> Result<Sample<B>, TransformError>
            + Send
            + Sync
            + 'static,
    {
        Self {
            func: Arc::new(func),
        }
    }

    /// Wraps a function already shared elsewhere, e.g. by a registry.
    pub fn from_shared(func: Arc<TransformFn<B>>) -> Self {
        Self { func }
    }
}

impl<B: Backend> Transform<B> for FunctionalTransform<B> {
    fn apply(
        &self,
        inputs: &TensorDict<B>,
        labels: &TensorDict<B>,
        weights: Option<&TensorDict<B>>,
    ) -> Result<Sample<B>, TransformError> {
        let (inputs, labels, weights) = Sample::copied(inputs, labels, weights).into_parts();
        (self.func)(inputs, labels, weights)
    }

    fn name(&self) -> &'static str {
        "FunctionalTransform"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{CpuBackend, Tensor};
    use crate::preprocessing::traits::tensor_dict;
    use std::sync::Mutex;

    #[test]
    fn test_functional_receives_copies() {
        let inputs = tensor_dict([("x", Tensor::<CpuBackend>::scalar(1.0))]);
        let labels = tensor_dict([("y", Tensor::<CpuBackend>::scalar(2.0))]);

        let transform = FunctionalTransform::<CpuBackend>::new(|mut inputs, mut labels, weights| {
            inputs.insert("extra".to_string(), Tensor::scalar(0.0));
            labels.remove("y");
            Ok(Sample::new(inputs, labels, weights))
        });
        let out = transform.apply(&inputs, &labels, None).unwrap();

        assert_eq!(out.inputs.len(), 2);
        assert!(out.labels.is_empty());
        // Caller's mappings untouched
        assert_eq!(inputs.len(), 1);
        assert_eq!(labels.len(), 1);
        // Shallow: tensors are shared, not duplicated
        assert!(out.inputs["x"].shares_storage(&inputs["x"]));
    }

    #[test]
    fn test_functional_absent_weights_become_empty() {
        let seen = Arc::new(Mutex::new(None));
        let recorder = Arc::clone(&seen);
        let transform = FunctionalTransform::<CpuBackend>::new(move |inputs, labels, weights| {
            *recorder.lock().unwrap() = Some(weights.len());
            Ok(Sample::new(inputs, labels, weights))
        });

        let empty = TensorDict::new();
        let out = transform.apply(&empty, &empty, None).unwrap();
        assert_eq!(*seen.lock().unwrap(), Some(0));
        assert!(out.weights.is_empty());

        let weights = tensor_dict([("w", Tensor::<CpuBackend>::scalar(1.0))]);
        transform.apply(&empty, &empty, Some(&weights)).unwrap();
        assert_eq!(*seen.lock().unwrap(), Some(1));
    }

    #[test]
    fn test_functional_result_returned_verbatim() {
        let transform = FunctionalTransform::<CpuBackend>::new(|_, _, _| {
            Ok(Sample::new(
                tensor_dict([("new", Tensor::scalar(9.0))]),
                TensorDict::new(),
                TensorDict::new(),
            ))
        });
        let inputs = tensor_dict([("x", Tensor::<CpuBackend>::scalar(1.0))]);
        let out = transform.apply(&inputs, &TensorDict::new(), None).unwrap();

        assert_eq!(out.inputs.keys().collect::<Vec<_>>(), vec!["new"]);
    }

    #[test]
    fn test_functional_error_propagates() {
        let transform = FunctionalTransform::<CpuBackend>::new(|_, _, _| {
            Err(TransformError::InvalidParameter("rejected".to_string()))
        });
        let empty = TensorDict::new();
        assert!(matches!(
            transform.apply(&empty, &empty, None),
            Err(TransformError::InvalidParameter(_))
        ));
    }
}
