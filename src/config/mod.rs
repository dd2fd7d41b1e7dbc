//! JSON configuration of the command-line demo.
pub mod demo;

pub use demo::{load_config, DemoConfig, OutputConfig};
