//! # Backend Abstraction
//!
//! Transforms never touch array storage directly. They go through the
//! [`Backend`] trait, which names a concrete n-dimensional tensor type and the
//! handful of operations the preprocessing layer needs: elementwise maps,
//! numpy-style broadcasting binary ops, leading-axis slicing and reshaping.
//!
//! ## Available Backends
//!
//! | Backend          | Feature   | Storage                          |
//! |------------------|-----------|----------------------------------|
//! | `CpuBackend`     | `cpu`     | Flat row-major `Vec<f64>` + shape |
//! | `NdarrayBackend` | `ndarray` | `ndarray::ArrayD<f64>`           |
//!
//! ## Example
//!
//! ```rust
//! use sciprep::backend::{CpuBackend, Tensor};
//!
//! let x: Tensor<CpuBackend> = Tensor::new(vec![1.0, 2.0, 3.0, 4.0], &[2, 2]).unwrap();
//! let mean: Tensor<CpuBackend> = Tensor::vector(vec![1.0, 2.0]);
//!
//! // Broadcasts along the leading axis
//! let centered = x.sub(&mean).unwrap();
//! assert_eq!(centered.to_vec(), vec![0.0, 0.0, 2.0, 2.0]);
//! ```

use crate::preprocessing::TransformError;
use std::fmt::Debug;
use std::ops::Range;

#[cfg(feature = "cpu")]
pub mod cpu;
#[cfg(feature = "cpu")]
/// Pure-Rust CPU backend with no external dependencies.
pub use cpu::{CpuBackend, CpuTensor};

#[cfg(feature = "ndarray")]
mod ndarray_backend;
#[cfg(feature = "ndarray")]
/// Backend backed by the `ndarray` crate for ecosystem interoperability.
pub use ndarray_backend::NdarrayBackend;

/// Backend-typed n-dimensional tensor.
pub mod tensor;

pub use tensor::Tensor;

/// Abstraction over the array library that stores and computes tensors.
///
/// All operations are pure: they take shared references and return freshly
/// allocated tensors. Shape errors are reported through [`TransformError`];
/// implementations must not panic on user-supplied shapes.
pub trait Backend: Clone + Copy + Debug + Send + Sync + 'static {
    /// Native n-dimensional tensor type, `f64` elements, row-major logical order.
    type TensorND: Clone + Debug + Send + Sync;

    /// Builds a tensor of `shape` from row-major `data`.
    ///
    /// Fails when `data.len()` differs from the product of `shape`.
    fn from_shape_vec(shape: &[usize], data: Vec<f64>) -> Result<Self::TensorND, TransformError>;

    /// Builds a one-dimensional tensor.
    fn from_vec_1d(data: Vec<f64>) -> Self::TensorND;

    /// Builds a tensor of `shape` with every element set to `value`.
    fn full(shape: &[usize], value: f64) -> Self::TensorND;

    /// Shape of the tensor, outermost axis first.
    fn shape(t: &Self::TensorND) -> Vec<usize>;

    /// Elements in row-major order.
    fn to_vec(t: &Self::TensorND) -> Vec<f64>;

    /// Applies `f` to every element.
    fn map<F: Fn(f64) -> f64>(t: &Self::TensorND, f: F) -> Self::TensorND;

    /// Combines two tensors elementwise after numpy-style broadcasting.
    fn zip_broadcast<F: Fn(f64, f64) -> f64>(
        lhs: &Self::TensorND,
        rhs: &Self::TensorND,
        f: F,
    ) -> Result<Self::TensorND, TransformError>;

    /// Restricts the leading axes to `ranges`; remaining axes are kept whole.
    ///
    /// Callers guarantee `ranges.len() <= ndim` and that every range lies
    /// within its axis (see [`resolve_slice`]).
    fn slice_leading(t: &Self::TensorND, ranges: &[Range<usize>]) -> Self::TensorND;

    /// Reinterprets the row-major elements under a new shape.
    fn reshape(t: &Self::TensorND, shape: &[usize]) -> Result<Self::TensorND, TransformError>;
}

/// Result shape of broadcasting `lhs` against `rhs`, or `None` when incompatible.
///
/// Follows numpy rules: shapes are aligned on their trailing axes and each
/// pair of dimensions must be equal or contain a 1.
pub fn broadcast_shape(lhs: &[usize], rhs: &[usize]) -> Option<Vec<usize>> {
    let ndim = lhs.len().max(rhs.len());
    let mut out = vec![0; ndim];
    for (axis, slot) in out.iter_mut().enumerate() {
        let l = dim_from_end(lhs, ndim - axis);
        let r = dim_from_end(rhs, ndim - axis);
        *slot = match (l, r) {
            (a, b) if a == b => a,
            (1, b) => b,
            (a, 1) => a,
            _ => return None,
        };
    }
    Some(out)
}

fn dim_from_end(shape: &[usize], pos: usize) -> usize {
    if pos > shape.len() {
        1
    } else {
        shape[shape.len() - pos]
    }
}

/// Resolves a `start:stop` slice against an axis of length `len`.
///
/// Negative bounds count from the end, out-of-range bounds clamp, and
/// `start >= stop` yields an empty range.
pub fn resolve_slice(start: i64, stop: i64, len: usize) -> Range<usize> {
    let len = len as i64;
    let clamp = |i: i64| if i < 0 { (i + len).max(0) } else { i.min(len) };
    let (start, stop) = (clamp(start), clamp(stop));
    start as usize..stop.max(start) as usize
}

/// Formats a shape the way error messages print it, e.g. `(3, 5, 5)`.
pub fn format_shape(shape: &[usize]) -> String {
    match shape {
        [only] => format!("({},)", only),
        _ => {
            let dims: Vec<String> = shape.iter().map(|d| d.to_string()).collect();
            format!("({})", dims.join(", "))
        }
    }
}

pub(crate) fn broadcast_error(lhs: &[usize], rhs: &[usize]) -> TransformError {
    TransformError::Broadcast {
        lhs: format_shape(lhs),
        rhs: format_shape(rhs),
    }
}
