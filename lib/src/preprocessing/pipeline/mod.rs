//! Chaining transforms.
//!
//! | Component | Description |
//! |-----------|-------------|
//! | [`Compose`] | Apply transforms sequentially |

pub mod compose;

pub use compose::Compose;
