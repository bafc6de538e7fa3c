use super::{broadcast_error, broadcast_shape, format_shape, Backend};
use crate::preprocessing::TransformError;
use std::ops::Range;

/// Pure-Rust backend storing tensors as flat row-major buffers.
#[derive(Clone, Debug, Copy)]
pub struct CpuBackend;

/// Row-major n-dimensional tensor: `data.len()` always equals the product of `shape`.
#[derive(Debug, Clone, PartialEq)]
pub struct CpuTensor {
    pub(crate) data: Vec<f64>,
    pub(crate) shape: Vec<usize>,
}

impl CpuTensor {
    /// Creates a tensor, checking that `data` fills `shape` exactly.
    pub fn new(data: Vec<f64>, shape: Vec<usize>) -> Result<Self, TransformError> {
        let expected: usize = shape.iter().product();
        if data.len() != expected {
            return Err(TransformError::InvalidShape {
                expected: format!("{} elements for shape {}", expected, format_shape(&shape)),
                got: format!("{} elements", data.len()),
            });
        }
        Ok(Self { data, shape })
    }

    /// Underlying row-major buffer.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Shape of the tensor.
    pub fn dims(&self) -> &[usize] {
        &self.shape
    }
}

fn contiguous_strides(shape: &[usize]) -> Vec<usize> {
    let mut strides = vec![1; shape.len()];
    for axis in (0..shape.len().saturating_sub(1)).rev() {
        strides[axis] = strides[axis + 1] * shape[axis + 1];
    }
    strides
}

/// Strides of `shape` viewed as `out`: broadcast axes get stride 0.
fn broadcast_strides(shape: &[usize], out: &[usize]) -> Vec<usize> {
    let own = contiguous_strides(shape);
    let offset = out.len() - shape.len();
    (0..out.len())
        .map(|axis| {
            if axis < offset || shape[axis - offset] == 1 {
                0
            } else {
                own[axis - offset]
            }
        })
        .collect()
}

impl Backend for CpuBackend {
    type TensorND = CpuTensor;

    fn from_shape_vec(shape: &[usize], data: Vec<f64>) -> Result<Self::TensorND, TransformError> {
        CpuTensor::new(data, shape.to_vec())
    }

    fn from_vec_1d(data: Vec<f64>) -> Self::TensorND {
        let len = data.len();
        CpuTensor {
            data,
            shape: vec![len],
        }
    }

    fn full(shape: &[usize], value: f64) -> Self::TensorND {
        CpuTensor {
            data: vec![value; shape.iter().product()],
            shape: shape.to_vec(),
        }
    }

    fn shape(t: &Self::TensorND) -> Vec<usize> {
        t.shape.clone()
    }

    fn to_vec(t: &Self::TensorND) -> Vec<f64> {
        t.data.clone()
    }

    fn map<F: Fn(f64) -> f64>(t: &Self::TensorND, f: F) -> Self::TensorND {
        CpuTensor {
            data: t.data.iter().map(|&x| f(x)).collect(),
            shape: t.shape.clone(),
        }
    }

    fn zip_broadcast<F: Fn(f64, f64) -> f64>(
        lhs: &Self::TensorND,
        rhs: &Self::TensorND,
        f: F,
    ) -> Result<Self::TensorND, TransformError> {
        let out_shape = broadcast_shape(&lhs.shape, &rhs.shape)
            .ok_or_else(|| broadcast_error(&lhs.shape, &rhs.shape))?;

        // Fast path: identical shapes need no index bookkeeping
        if lhs.shape == rhs.shape {
            return Ok(CpuTensor {
                data: lhs.data.iter().zip(&rhs.data).map(|(&a, &b)| f(a, b)).collect(),
                shape: out_shape,
            });
        }

        let ls = broadcast_strides(&lhs.shape, &out_shape);
        let rs = broadcast_strides(&rhs.shape, &out_shape);
        let n: usize = out_shape.iter().product();
        let mut data = Vec::with_capacity(n);
        let mut index = vec![0usize; out_shape.len()];
        let (mut li, mut ri) = (0usize, 0usize);

        for _ in 0..n {
            data.push(f(lhs.data[li], rhs.data[ri]));
            for axis in (0..out_shape.len()).rev() {
                index[axis] += 1;
                li += ls[axis];
                ri += rs[axis];
                if index[axis] < out_shape[axis] {
                    break;
                }
                li -= ls[axis] * out_shape[axis];
                ri -= rs[axis] * out_shape[axis];
                index[axis] = 0;
            }
        }

        Ok(CpuTensor {
            data,
            shape: out_shape,
        })
    }

    fn slice_leading(t: &Self::TensorND, ranges: &[Range<usize>]) -> Self::TensorND {
        let strides = contiguous_strides(&t.shape);
        let out_shape: Vec<usize> = t
            .shape
            .iter()
            .enumerate()
            .map(|(axis, &len)| ranges.get(axis).map_or(len, |r| r.len()))
            .collect();
        let n: usize = out_shape.iter().product();
        let mut data = Vec::with_capacity(n);
        let mut offset: usize = ranges
            .iter()
            .zip(&strides)
            .map(|(r, stride)| r.start * stride)
            .sum();
        let mut index = vec![0usize; out_shape.len()];

        for _ in 0..n {
            data.push(t.data[offset]);
            for axis in (0..out_shape.len()).rev() {
                index[axis] += 1;
                offset += strides[axis];
                if index[axis] < out_shape[axis] {
                    break;
                }
                offset -= strides[axis] * out_shape[axis];
                index[axis] = 0;
            }
        }

        CpuTensor {
            data,
            shape: out_shape,
        }
    }

    fn reshape(t: &Self::TensorND, shape: &[usize]) -> Result<Self::TensorND, TransformError> {
        let expected: usize = shape.iter().product();
        if expected != t.data.len() {
            return Err(TransformError::InvalidShape {
                expected: format!("{} elements for shape {}", expected, format_shape(shape)),
                got: format!("{} elements in shape {}", t.data.len(), format_shape(&t.shape)),
            });
        }
        Ok(CpuTensor {
            data: t.data.clone(),
            shape: shape.to_vec(),
        })
    }
}
