//! # sciprep
//!
//! Composable preprocessing transforms for scientific training samples with
//! pluggable tensor backends.
//!
//! ## Core Design Principles
//!
//! - **Stateless Transforms**: A transform holds only its construction-time
//!   configuration and can be shared freely across threads.
//! - **Non-mutating**: `apply` borrows the input mappings and returns new
//!   ones; tensors that are not rewritten are shared, never copied.
//! - **Backend Agnosticism**: The `Backend` trait abstracts tensor storage and
//!   arithmetic; a flat `Vec` backend and an `ndarray` backend are provided.
//! - **Declarative Pipelines**: Pipelines can be described in JSON and stored
//!   in bincode form.
//!
//! ## Quick Start
//!
//! ```rust
//! use sciprep::backend::{CpuBackend, Tensor};
//! use sciprep::preprocessing::{tensor_dict, Compose, Log1p, Translate, Transform, TensorDict};
//!
//! let pipeline = Compose::<CpuBackend>::new()
//!     .add(Translate::new([("tp", 1.0)]))
//!     .add(Log1p::new(1.0, &["input"]).unwrap());
//!
//! let inputs = tensor_dict([("tp", Tensor::vector(vec![0.0, 1.0]))]);
//! let out = pipeline.apply(&inputs, &TensorDict::new(), None).unwrap();
//! assert_eq!(out.inputs["tp"].to_vec(), vec![1f64.ln_1p(), 2f64.ln_1p()]);
//! ```
//!
//! ## Module Structure
//!
//! - `backend`: Tensor abstraction and computation primitives
//! - `preprocessing`: Transforms, composition and configuration
//! - `serialization`: Binary persistence of plain-data configuration

pub mod backend;

/// Sample preprocessing transforms.
pub mod preprocessing;

/// Binary persistence of configurations.
pub mod serialization;

/// Re-export of core backend types for convenient usage.
pub use backend::{Backend, Tensor};

#[cfg(feature = "cpu")]
pub use backend::CpuBackend;

#[cfg(feature = "ndarray")]
pub use backend::NdarrayBackend;
