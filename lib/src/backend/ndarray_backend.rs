use super::{broadcast_error, broadcast_shape, format_shape, Backend, Tensor};
use crate::preprocessing::TransformError;
use ndarray::{Array1, ArrayD, IxDyn, Slice, Zip};
use std::ops::Range;

/// Tensor backend implemented on top of the `ndarray` crate.
///
/// # Type mappings
/// - `TensorND`: `ndarray::ArrayD<f64>`
///
/// Arrays produced by this backend are always in standard (row-major)
/// layout, so `to_vec` and `reshape` agree with [`CpuBackend`](super::CpuBackend).
#[derive(Clone, Debug, Copy)]
pub struct NdarrayBackend;

impl Backend for NdarrayBackend {
    type TensorND = ArrayD<f64>;

    fn from_shape_vec(shape: &[usize], data: Vec<f64>) -> Result<Self::TensorND, TransformError> {
        let len = data.len();
        ArrayD::from_shape_vec(IxDyn(shape), data).map_err(|e| TransformError::InvalidShape {
            expected: format!("data for shape {}", format_shape(shape)),
            got: format!("{} elements ({})", len, e),
        })
    }

    fn from_vec_1d(data: Vec<f64>) -> Self::TensorND {
        Array1::from(data).into_dyn()
    }

    fn full(shape: &[usize], value: f64) -> Self::TensorND {
        ArrayD::from_elem(IxDyn(shape), value)
    }

    fn shape(t: &Self::TensorND) -> Vec<usize> {
        t.shape().to_vec()
    }

    fn to_vec(t: &Self::TensorND) -> Vec<f64> {
        t.iter().copied().collect()
    }

    fn map<F: Fn(f64) -> f64>(t: &Self::TensorND, f: F) -> Self::TensorND {
        t.mapv(f)
    }

    fn zip_broadcast<F: Fn(f64, f64) -> f64>(
        lhs: &Self::TensorND,
        rhs: &Self::TensorND,
        f: F,
    ) -> Result<Self::TensorND, TransformError> {
        let out_shape = broadcast_shape(lhs.shape(), rhs.shape())
            .ok_or_else(|| broadcast_error(lhs.shape(), rhs.shape()))?;
        let dim = IxDyn(&out_shape);
        let l = lhs
            .broadcast(dim.clone())
            .ok_or_else(|| broadcast_error(lhs.shape(), rhs.shape()))?;
        let r = rhs
            .broadcast(dim)
            .ok_or_else(|| broadcast_error(lhs.shape(), rhs.shape()))?;
        Ok(Zip::from(&l).and(&r).map_collect(|&a, &b| f(a, b)))
    }

    fn slice_leading(t: &Self::TensorND, ranges: &[Range<usize>]) -> Self::TensorND {
        t.slice_each_axis(|ax| match ranges.get(ax.axis.index()) {
            Some(r) => Slice::from(r.clone()),
            None => Slice::from(..),
        })
        .to_owned()
    }

    fn reshape(t: &Self::TensorND, shape: &[usize]) -> Result<Self::TensorND, TransformError> {
        let expected: usize = shape.iter().product();
        if expected != t.len() {
            return Err(TransformError::InvalidShape {
                expected: format!("{} elements for shape {}", expected, format_shape(shape)),
                got: format!("{} elements in shape {}", t.len(), format_shape(t.shape())),
            });
        }
        Self::from_shape_vec(shape, t.iter().copied().collect())
    }
}

impl From<ArrayD<f64>> for Tensor<NdarrayBackend> {
    fn from(array: ArrayD<f64>) -> Self {
        Tensor::from_backend(array)
    }
}

impl Tensor<NdarrayBackend> {
    /// Borrows the underlying `ndarray` array.
    pub fn as_array(&self) -> &ArrayD<f64> {
        self.backend_tensor()
    }
}
