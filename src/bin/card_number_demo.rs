use card_number_detector::config::{load_config, DemoConfig};
use card_number_detector::image::io::{load_grayscale_image, save_grayscale_f32, write_json_file};
use card_number_detector::{CardNumberDetector, CharacterCrop};
use serde::Serialize;
use std::env;
use std::path::Path;

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let config_path = env::args().nth(1).ok_or_else(usage)?;
    let config: DemoConfig = load_config(Path::new(&config_path)).map_err(|e| e.to_string())?;

    let gray = load_grayscale_image(&config.input_path).map_err(|e| e.to_string())?;
    let detector = CardNumberDetector::new(config.detector.clone());
    let report = detector.detect(gray.as_view());
    let result = &report.result;

    println!(
        "found={} pattern={} digits={} latency_ms={:.3}",
        result.found,
        result
            .pattern
            .map(|p| format!("{p:?}"))
            .unwrap_or_else(|| "-".to_string()),
        result.digit_count(),
        result.latency_ms
    );
    for stage in &report.trace.timings.stages {
        println!("  {:<10} {:>8.3} ms", stage.label, stage.elapsed_ms);
    }

    if let Some(path) = &config.output.json_out {
        write_json_file(path, &report).map_err(|e| e.to_string())?;
        println!("Saved detection report to {}", path.display());
    }

    if config.output.crops_json.is_some() || config.output.debug_dir.is_some() {
        let crops = detector.crop_characters(gray.as_view(), &result.boxes);
        if let Some(path) = &config.output.crops_json {
            let summary = CropSummary {
                train_char_size: config.detector.train_char_size,
                feature_dim: crops.first().map_or(0, |c| c.features.len()),
                crops: &crops,
            };
            write_json_file(path, &summary).map_err(|e| e.to_string())?;
            println!("Saved {} digit crops to {}", crops.len(), path.display());
        }
        if let Some(dir) = &config.output.debug_dir {
            for (i, crop) in crops.iter().enumerate() {
                let path = dir.join(format!("digit_{i:02}.png"));
                save_grayscale_f32(&crop.patch, &path).map_err(|e| e.to_string())?;
            }
            println!("Saved {} digit patches under {}", crops.len(), dir.display());
        }
    }

    Ok(())
}

fn usage() -> String {
    "Usage: card_number_demo <config.json>".to_string()
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CropSummary<'a> {
    train_char_size: (usize, usize),
    feature_dim: usize,
    crops: &'a [CharacterCrop],
}
