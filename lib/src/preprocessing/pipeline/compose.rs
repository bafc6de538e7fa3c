//! Compose - chains transforms into a single one.
//!
//! The sample returned by one step is the input of the next.
//!
//! # Example
//! ```
//! use sciprep::backend::{CpuBackend, Tensor};
//! use sciprep::preprocessing::{tensor_dict, Compose, Scale, Transform, Translate, TensorDict};
//!
//! let pipeline = Compose::<CpuBackend>::new()
//!     .add(Translate::new([("t2m", -273.15)]))
//!     .add(Scale::new([("t2m", 0.1)]));
//!
//! let inputs = tensor_dict([("t2m", Tensor::scalar(283.15))]);
//! let out = pipeline.apply(&inputs, &TensorDict::new(), None).unwrap();
//! assert!((out.inputs["t2m"].to_vec()[0] - 1.0).abs() < 1e-12);
//! ```

use crate::backend::Backend;
use crate::preprocessing::error::TransformError;
use crate::preprocessing::traits::{Sample, TensorDict, Transform};
use std::fmt;
use tracing::{debug, trace};

/// An ordered chain of transforms.
pub struct Compose<B: Backend> {
    steps: Vec<Box<dyn Transform<B>>>,
}

impl<B: Backend> Default for Compose<B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: Backend> fmt::Debug for Compose<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Compose")
            .field("steps", &self.step_names())
            .finish()
    }
}

impl<B: Backend> Compose<B> {
    /// Create a new empty pipeline.
    pub fn new() -> Self {
        Self { steps: Vec::new() }
    }

    /// Append a step.
    pub fn add<T: Transform<B> + 'static>(mut self, step: T) -> Self {
        self.steps.push(Box::new(step));
        self
    }

    /// Append an already boxed step.
    pub fn push_boxed(&mut self, step: Box<dyn Transform<B>>) {
        self.steps.push(step);
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn step_names(&self) -> Vec<&'static str> {
        self.steps.iter().map(|s| s.name()).collect()
    }
}

impl<B: Backend> Transform<B> for Compose<B> {
    /// Runs every step in order, stopping at the first error.
    fn apply(
        &self,
        inputs: &TensorDict<B>,
        labels: &TensorDict<B>,
        weights: Option<&TensorDict<B>>,
    ) -> Result<Sample<B>, TransformError> {
        debug!(steps = self.steps.len(), "applying compose");
        let mut sample = Sample::copied(inputs, labels, weights);
        for (index, step) in self.steps.iter().enumerate() {
            trace!(index, step = step.name(), "apply step");
            sample = step.apply_sample(&sample)?;
        }
        Ok(sample)
    }

    /// Undoes every step, last one first.
    fn inverse(
        &self,
        inputs: &TensorDict<B>,
        labels: &TensorDict<B>,
        weights: Option<&TensorDict<B>>,
    ) -> Result<Sample<B>, TransformError> {
        if let Some(step) = self.steps.iter().find(|s| !s.supports_inverse()) {
            return Err(TransformError::NotInvertible(step.name()));
        }
        let mut sample = Sample::copied(inputs, labels, weights);
        for (index, step) in self.steps.iter().enumerate().rev() {
            trace!(index, step = step.name(), "inverse step");
            sample = step.inverse(&sample.inputs, &sample.labels, Some(&sample.weights))?;
        }
        Ok(sample)
    }

    fn supports_inverse(&self) -> bool {
        self.steps.iter().all(|s| s.supports_inverse())
    }

    fn name(&self) -> &'static str {
        "Compose"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{CpuBackend, Tensor};
    use crate::preprocessing::elementwise::{Log1p, Normalize, Scale, Translate};
    use crate::preprocessing::spatial::{CropData, SqueezeData};
    use crate::preprocessing::traits::tensor_dict;

    fn create_test_sample() -> Sample<CpuBackend> {
        let x = Tensor::new((0..16).map(|v| v as f64).collect(), &[1, 1, 4, 4]).unwrap();
        let y = Tensor::full(&[1, 4, 4], 2.0);
        Sample::new(
            tensor_dict([("x", x)]),
            tensor_dict([("y", y)]),
            tensor_dict([("w", Tensor::scalar(1.0))]),
        )
    }

    #[test]
    fn test_empty_compose_is_identity() {
        let sample = create_test_sample();
        let pipeline = Compose::<CpuBackend>::new();
        let out = pipeline.apply_sample(&sample).unwrap();

        assert!(pipeline.is_empty());
        assert!(out.inputs["x"].shares_storage(&sample.inputs["x"]));
        assert!(out.weights["w"].shares_storage(&sample.weights["w"]));
    }

    #[test]
    fn test_compose_runs_steps_in_order() {
        let pipeline = Compose::<CpuBackend>::new()
            .add(Translate::new([("x", 1.0)]))
            .add(Scale::new([("x", 2.0)]));
        let inputs = tensor_dict([("x", Tensor::<CpuBackend>::scalar(3.0))]);
        let out = pipeline.apply(&inputs, &TensorDict::new(), None).unwrap();

        // (3 + 1) * 2, not 3 * 2 + 1
        assert_eq!(out.inputs["x"].to_vec(), vec![8.0]);
        assert_eq!(pipeline.step_names(), vec!["Translate", "Scale"]);
        assert_eq!(pipeline.len(), 2);
    }

    #[test]
    fn test_compose_spatial_chain() {
        let sample = create_test_sample();
        let pipeline = Compose::<CpuBackend>::new()
            .add(SqueezeData::new(&["input"]).unwrap())
            .add(CropData::new([1, 1], [3, 3], &["input", "label"]).unwrap());
        let out = pipeline.apply_sample(&sample).unwrap();

        assert_eq!(out.inputs["x"].shape(), vec![1, 2, 2]);
        assert_eq!(out.inputs["x"].to_vec(), vec![5.0, 6.0, 9.0, 10.0]);
        assert_eq!(out.labels["y"].shape(), vec![1, 2, 2]);
        assert_eq!(sample.inputs["x"].shape(), vec![1, 1, 4, 4]);
    }

    #[test]
    fn test_compose_stops_at_first_error() {
        let inputs = tensor_dict([("x", Tensor::<CpuBackend>::full(&[4, 4], 1.0))]);
        let failing = Compose::<CpuBackend>::new()
            .add(SqueezeData::new(&["input"]).unwrap())
            .add(Translate::new([("x", 1.0)]));
        assert!(matches!(
            failing.apply(&inputs, &TensorDict::new(), None),
            Err(TransformError::UnsupportedRank(2))
        ));
    }

    #[test]
    fn test_compose_inverse_runs_in_reverse() {
        let pipeline = Compose::<CpuBackend>::new()
            .add(Translate::new([("x", 1.0)]))
            .add(Log1p::new(1.0, &["input"]).unwrap())
            .add(
                Normalize::new(
                    Tensor::vector(vec![0.5]),
                    Tensor::vector(vec![2.0]),
                    &["input"],
                )
                .unwrap(),
            );
        let inputs = tensor_dict([("x", Tensor::<CpuBackend>::vector(vec![0.0, 3.0, 10.0]))]);

        assert!(pipeline.supports_inverse());
        let out = pipeline.apply(&inputs, &TensorDict::new(), None).unwrap();
        let back = pipeline.inverse(&out.inputs, &out.labels, None).unwrap();

        for (a, b) in back.inputs["x"].to_vec().iter().zip(inputs["x"].to_vec()) {
            assert!((a - b).abs() < 1e-9);
        }
    }

    #[test]
    fn test_compose_inverse_not_supported() {
        let pipeline = Compose::<CpuBackend>::new()
            .add(Scale::new([("x", 2.0)]))
            .add(SqueezeData::default());
        let empty = TensorDict::new();

        assert!(!pipeline.supports_inverse());
        assert!(matches!(
            pipeline.inverse(&empty, &empty, None),
            Err(TransformError::NotInvertible("SqueezeData"))
        ));
    }
}
