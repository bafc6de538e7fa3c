//! Shared fixtures for the sciprep benchmarks.
//!
//! Provides synthetic gridded samples of configurable size so that every
//! backend is measured on the same data.

use sciprep::backend::{Backend, Tensor};
use sciprep::preprocessing::{tensor_dict, ComposeConfig, Sample, TensorDict};

/// Grid sizes used across benchmarks, as `(channels, height, width)`.
pub const GRID_SIZES: [(usize, usize, usize); 3] = [(2, 32, 64), (4, 128, 256), (8, 360, 720)];

/// Pipeline measured end to end.
pub const PIPELINE_JSON: &str = r#"{
    "transforms": [
        {"Translate": {"offset": {"t2m": -273.15}}},
        {"Scale": {"scale": {"tp": 1000.0}}},
        {"Normalize": {"mean": [0.0], "std": [10.0], "apply_keys": ["input"]}},
        {"Log1p": {"apply_keys": ["label"]}},
        {"CropData": {"xmin": [0, 0], "xmax": [256, 512]}}
    ]
}"#;

/// Deterministic values in a fixed range, so runs are comparable.
fn synthetic_values(n: usize, offset: f64, amplitude: f64) -> Vec<f64> {
    (0..n)
        .map(|i| offset + amplitude * ((i % 97) as f64 / 97.0 - 0.5))
        .collect()
}

/// Sample with inputs `t2m`, `tp` and label `tp_next`, all `[C, H, W]`.
pub fn create_sample<B: Backend>(channels: usize, height: usize, width: usize) -> Sample<B> {
    let shape = [channels, height, width];
    let n = channels * height * width;
    let grid = |offset, amplitude| {
        Tensor::<B>::new(synthetic_values(n, offset, amplitude), &shape)
            .unwrap_or_else(|_| Tensor::full(&shape, offset))
    };

    Sample::new(
        tensor_dict([("t2m", grid(283.15, 20.0)), ("tp", grid(5.0e-4, 5.0e-4))]),
        tensor_dict([("tp_next", grid(5.0e-4, 5.0e-4))]),
        TensorDict::new(),
    )
}

pub fn pipeline_config() -> ComposeConfig {
    ComposeConfig::from_json_str(PIPELINE_JSON).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use sciprep::backend::CpuBackend;

    #[test]
    fn test_create_sample_shapes() {
        let sample = create_sample::<CpuBackend>(2, 3, 4);
        assert_eq!(sample.inputs["t2m"].shape(), vec![2, 3, 4]);
        assert_eq!(sample.labels["tp_next"].len(), 24);
    }

    #[test]
    fn test_pipeline_config_parses() {
        assert_eq!(pipeline_config().transforms.len(), 5);
    }
}
