use crate::backend::Backend;
use crate::preprocessing::TransformError;
use std::fmt;
use std::marker::PhantomData;
use std::ops::Range;
use std::sync::Arc;

/// Backend-typed, immutable n-dimensional tensor.
///
/// Wraps a backend's native tensor (`B::TensorND`) behind an `Arc` and carries
/// the backend as a phantom type, so tensors from different backends cannot be
/// mixed by accident.
///
/// # Sharing semantics
/// Cloning a `Tensor` is cheap: the clone shares storage with the original.
/// Every operation allocates a new tensor and never writes through the shared
/// storage, which is what lets transforms copy whole mappings without copying
/// the arrays inside them.
///
/// # Example
/// ```
/// use sciprep::backend::{CpuBackend, Tensor};
///
/// let x: Tensor<CpuBackend> = Tensor::new(vec![1.0, 2.0, 3.0], &[3]).unwrap();
/// let y = x.add_scalar(1.0).mul_scalar(2.0);
/// assert_eq!(y.to_vec(), vec![4.0, 6.0, 8.0]);
///
/// let alias = x.clone();
/// assert!(alias.shares_storage(&x));
/// ```
pub struct Tensor<B: Backend> {
    pub(crate) data: Arc<B::TensorND>,
    pub(crate) backend: PhantomData<B>,
}

impl<B: Backend> Clone for Tensor<B> {
    fn clone(&self) -> Self {
        Self {
            data: Arc::clone(&self.data),
            backend: PhantomData,
        }
    }
}

impl<B: Backend> fmt::Debug for Tensor<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tensor")
            .field("shape", &self.shape())
            .field("data", &self.data)
            .finish()
    }
}

impl<B: Backend> Tensor<B> {
    /// Creates a tensor of `shape` from row-major `data`.
    ///
    /// # Errors
    /// Returns [`TransformError::InvalidShape`] if `data` does not fill `shape`.
    pub fn new(data: Vec<f64>, shape: &[usize]) -> Result<Self, TransformError> {
        B::from_shape_vec(shape, data).map(Self::from_backend)
    }

    /// Creates a one-dimensional tensor.
    pub fn vector(data: Vec<f64>) -> Self {
        Self::from_backend(B::from_vec_1d(data))
    }

    /// Creates a zero-dimensional tensor holding `value`.
    pub fn scalar(value: f64) -> Self {
        Self::full(&[], value)
    }

    /// Creates a tensor of `shape` filled with `value`.
    pub fn full(shape: &[usize], value: f64) -> Self {
        Self::from_backend(B::full(shape, value))
    }

    /// Wraps a backend-native tensor.
    pub fn from_backend(data: B::TensorND) -> Self {
        Self {
            data: Arc::new(data),
            backend: PhantomData,
        }
    }

    /// Borrows the backend-native tensor.
    pub fn backend_tensor(&self) -> &B::TensorND {
        &self.data
    }

    pub fn shape(&self) -> Vec<usize> {
        B::shape(&self.data)
    }

    pub fn ndim(&self) -> usize {
        self.shape().len()
    }

    /// Total number of elements.
    pub fn len(&self) -> usize {
        self.shape().iter().product()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Elements in row-major order.
    pub fn to_vec(&self) -> Vec<f64> {
        B::to_vec(&self.data)
    }

    /// Returns `true` if both tensors point at the same storage.
    pub fn shares_storage(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.data, &other.data)
    }

    /// Applies `f` to every element.
    pub fn map<F: Fn(f64) -> f64>(&self, f: F) -> Self {
        Self::from_backend(B::map(&self.data, f))
    }

    pub fn add_scalar(&self, value: f64) -> Self {
        self.map(|x| x + value)
    }

    pub fn mul_scalar(&self, value: f64) -> Self {
        self.map(|x| x * value)
    }

    /// Elementwise `self + other` with broadcasting.
    pub fn add(&self, other: &Self) -> Result<Self, TransformError> {
        self.zip_with(other, |a, b| a + b)
    }

    /// Elementwise `self - other` with broadcasting.
    pub fn sub(&self, other: &Self) -> Result<Self, TransformError> {
        self.zip_with(other, |a, b| a - b)
    }

    /// Elementwise `self * other` with broadcasting.
    pub fn mul(&self, other: &Self) -> Result<Self, TransformError> {
        self.zip_with(other, |a, b| a * b)
    }

    /// Elementwise `self / other` with broadcasting. Division by zero yields inf/NaN.
    pub fn div(&self, other: &Self) -> Result<Self, TransformError> {
        self.zip_with(other, |a, b| a / b)
    }

    /// Combines two tensors elementwise after numpy-style broadcasting.
    ///
    /// # Errors
    /// Returns [`TransformError::Broadcast`] when the shapes are incompatible.
    pub fn zip_with<F: Fn(f64, f64) -> f64>(&self, other: &Self, f: F) -> Result<Self, TransformError> {
        B::zip_broadcast(&self.data, &other.data, f).map(Self::from_backend)
    }

    /// Restricts the leading axes to `ranges`, keeping the remaining axes whole.
    ///
    /// # Errors
    /// Returns [`TransformError::InvalidShape`] if more ranges than axes are
    /// given or a range falls outside its axis.
    pub fn slice_leading(&self, ranges: &[Range<usize>]) -> Result<Self, TransformError> {
        let shape = self.shape();
        let fits = ranges.len() <= shape.len()
            && ranges
                .iter()
                .zip(&shape)
                .all(|(r, &len)| r.start <= r.end && r.end <= len);
        if !fits {
            return Err(TransformError::InvalidShape {
                expected: format!("slice ranges within {}", super::format_shape(&shape)),
                got: format!("{:?}", ranges),
            });
        }
        Ok(Self::from_backend(B::slice_leading(&self.data, ranges)))
    }

    /// Reinterprets the elements under a new shape with the same element count.
    pub fn reshape(&self, shape: &[usize]) -> Result<Self, TransformError> {
        B::reshape(&self.data, shape).map(Self::from_backend)
    }
}
