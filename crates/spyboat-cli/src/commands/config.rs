use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use spyboat_core::pipeline::config::{PipelineConfig, PreprocessConfig};

#[derive(Args)]
pub struct ConfigArgs {
    /// Write config to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Print or save a full default PipelineConfig as TOML.
pub fn run(args: &ConfigArgs) -> Result<()> {
    let mut config = PipelineConfig::new(PathBuf::from("movie.npy"));
    config.preprocess = PreprocessConfig {
        scale_factor: Some(1.0),
        blur_sigma: Some(1.0),
    };
    let toml_str = toml::to_string_pretty(&config)?;

    if let Some(ref path) = args.output {
        std::fs::write(path, &toml_str)
            .with_context(|| format!("Failed to write config to {}", path.display()))?;
        println!("Default config saved to {}", path.display());
    } else {
        print!("{}", toml_str);
    }

    Ok(())
}
