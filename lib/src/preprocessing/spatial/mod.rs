//! Shape-changing transforms over image-like `[C, H, W]` tensors.

pub mod crop;
pub mod squeeze;

pub use crop::{CropData, CropDataConfig};
pub use squeeze::{SqueezeData, SqueezeDataConfig};
