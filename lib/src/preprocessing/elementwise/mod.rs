//! Elementwise transforms: value changes, shapes preserved.
//!
//! | Transform     | Operation                  | Applies to            |
//! |---------------|----------------------------|-----------------------|
//! | [`Translate`] | `v + offset[name]`         | named inputs          |
//! | [`Scale`]     | `v * scale[name]`          | named inputs          |
//! | [`Normalize`] | `(v - mean) / std`         | `apply_keys` mappings |
//! | [`Log1p`]     | `ln(1 + v / scale)`        | `apply_keys` mappings |

pub mod log1p;
pub mod normalize;
pub mod scale;
pub mod translate;

pub use log1p::{Log1p, Log1pConfig};
pub use normalize::{Normalize, NormalizeConfig};
pub use scale::{Scale, ScaleConfig};
pub use translate::{Translate, TranslateConfig};
