//! Preprocessing a synthetic weather sample with a config-driven pipeline.
//!
//! This example demonstrates:
//! - Describing a pipeline in JSON
//! - Registering a user function for `FunctionalTransform`
//! - Applying the pipeline and undoing the invertible part
//! - Storing the configuration in bincode form
//!
//! Run with `RUST_LOG=sciprep=trace` to see every step.

use sciprep::backend::{CpuBackend, Tensor};
use sciprep::preprocessing::{
    tensor_dict, Compose, ComposeConfig, Sample, TensorDict, Transform, TransformRegistry,
    Translate,
};
use std::error::Error;
use tracing_subscriber::EnvFilter;

type Backend = CpuBackend;

const PIPELINE: &str = r#"{
    "transforms": [
        {"SqueezeData": {"apply_keys": ["input"]}},
        {"Translate": {"offset": {"t2m": -273.15}}},
        {"Scale": {"scale": {"tp": 1000.0}}},
        {"Normalize": {"mean": [10.0, 0.5], "std": [8.0, 0.25], "shape": [2, 1, 1], "apply_keys": ["input"]}},
        {"Log1p": {"scale": 1.0e-3, "apply_keys": ["label"]}},
        {"CropData": {"xmin": [8, 16], "xmax": [40, 80]}},
        {"FunctionalTransform": {"transform_func": "land_mask_weights"}}
    ]
}"#;

/// Create a synthetic sample on a 48 x 96 grid.
///
/// Inputs (one batch, two channels):
/// - t2m: 2m temperature in kelvin
/// - tp: total precipitation in metres
///
/// Labels:
/// - tp_next: precipitation six hours later
fn create_weather_sample() -> Result<Sample<Backend>, Box<dyn Error>> {
    let (h, w) = (48, 96);
    let wave = |i: usize, amplitude: f64| amplitude * ((i % w) as f64 / w as f64 * 6.28).sin();

    let t2m: Vec<f64> = (0..2 * h * w).map(|i| 283.15 + wave(i, 5.0)).collect();
    let tp: Vec<f64> = (0..2 * h * w).map(|i| 5.0e-4 + wave(i, 2.5e-4)).collect();
    let tp_next: Vec<f64> = (0..h * w).map(|i| 4.0e-4 + wave(i + 7, 2.0e-4)).collect();

    let inputs = tensor_dict([
        ("t2m", Tensor::new(t2m, &[1, 2, h, w])?),
        ("tp", Tensor::new(tp, &[1, 2, h, w])?),
    ]);
    let labels = tensor_dict([("tp_next", Tensor::new(tp_next, &[1, h, w])?)]);
    Ok(Sample::new(inputs, labels, TensorDict::new()))
}

fn summarize(title: &str, dict: &TensorDict<Backend>) {
    println!("{title}:");
    for (name, value) in dict {
        let values = value.to_vec();
        let mean = values.iter().sum::<f64>() / values.len().max(1) as f64;
        println!("  {name:<8} shape={:?} mean={mean:.4}", value.shape());
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Config-driven Pipeline ===\n");

    let mut registry = TransformRegistry::<Backend>::new();
    registry.register("land_mask_weights", |inputs, labels, mut weights| {
        for (name, label) in &labels {
            weights.insert(name.clone(), Tensor::full(&label.shape(), 1.0));
        }
        Ok(Sample::new(inputs, labels, weights))
    });

    let config = ComposeConfig::from_json_str(PIPELINE)?;
    let pipeline = registry.build_compose(&config)?;
    println!("Steps: {:?}\n", pipeline.step_names());

    let sample = create_weather_sample()?;
    summarize("Raw inputs", &sample.inputs);
    summarize("Raw labels", &sample.labels);

    let out = pipeline.apply_sample(&sample)?;
    println!();
    summarize("Processed inputs", &out.inputs);
    summarize("Processed labels", &out.labels);
    summarize("Weights", &out.weights);

    println!("\n=== Inverse ===\n");
    let units = Compose::<Backend>::new().add(Translate::new([("t2m", -273.15)]));
    let celsius = units.apply_sample(&sample)?;
    let kelvin = units.inverse(&celsius.inputs, &celsius.labels, None)?;
    summarize("Celsius", &celsius.inputs);
    summarize("Back to kelvin", &kelvin.inputs);

    println!("\n=== Saving Configuration ===\n");
    let path = std::env::temp_dir().join("weather_pipeline.bin");
    config.save_to_file(&path)?;
    let loaded = ComposeConfig::load_from_file(&path)?;
    println!(
        "Reloaded {} transforms from {}",
        loaded.transforms.len(),
        path.display()
    );
    std::fs::remove_file(path).ok();

    Ok(())
}
