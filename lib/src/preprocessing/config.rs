//! Declarative transform configuration.
//!
//! A pipeline is described as a list of `{TransformName: {params}}` entries:
//!
//! ```json
//! {
//!   "transforms": [
//!     {"Translate": {"offset": {"t2m": -273.15}}},
//!     {"Normalize": {"mean": [0.0], "std": [10.0], "apply_keys": ["input"]}},
//!     {"CropData": {"xmin": [0, 0], "xmax": [256, 512]}}
//!   ]
//! }
//! ```
//!
//! Configurations parse from JSON and persist in bincode form; turning them
//! into transforms is the job of [`TransformRegistry`](super::TransformRegistry).

use crate::preprocessing::elementwise::{Log1pConfig, NormalizeConfig, ScaleConfig, TranslateConfig};
use crate::preprocessing::error::TransformError;
use crate::preprocessing::functional::FunctionalConfig;
use crate::preprocessing::spatial::{CropDataConfig, SqueezeDataConfig};
use crate::serialization::SerializableParams;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration of a single transform, tagged by transform name.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum TransformConfig {
    Translate(TranslateConfig),
    Scale(ScaleConfig),
    Normalize(NormalizeConfig),
    Log1p(Log1pConfig),
    CropData(CropDataConfig),
    SqueezeData(SqueezeDataConfig),
    FunctionalTransform(FunctionalConfig),
}

impl TransformConfig {
    /// Name of the configured transform.
    pub fn name(&self) -> &'static str {
        match self {
            TransformConfig::Translate(_) => "Translate",
            TransformConfig::Scale(_) => "Scale",
            TransformConfig::Normalize(_) => "Normalize",
            TransformConfig::Log1p(_) => "Log1p",
            TransformConfig::CropData(_) => "CropData",
            TransformConfig::SqueezeData(_) => "SqueezeData",
            TransformConfig::FunctionalTransform(_) => "FunctionalTransform",
        }
    }
}

/// Configuration of a [`Compose`](super::Compose) pipeline.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ComposeConfig {
    pub transforms: Vec<TransformConfig>,
}

impl ComposeConfig {
    pub fn new(transforms: Vec<TransformConfig>) -> Self {
        Self { transforms }
    }

    /// Parse a configuration from JSON.
    pub fn from_json_str(json: &str) -> Result<Self, TransformError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json_string(&self) -> Result<String, TransformError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Save in bincode form.
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), TransformError> {
        let bytes = self.to_bytes()?;
        std::fs::write(path, bytes)?;
        Ok(())
    }

    /// Load a configuration written by [`ComposeConfig::save_to_file`].
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, TransformError> {
        let bytes = std::fs::read(path)?;
        Ok(Self::from_bytes(&bytes)?)
    }
}
