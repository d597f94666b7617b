use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;
use spyboat_core::io::tiff_stack::read_stack_info;
use spyboat_core::io::{detect_format, load_movie};
use spyboat_core::movie::SourceFormat;

#[derive(Args)]
pub struct InfoArgs {
    /// Input movie (TIFF stack, NPY array or directory of frames)
    pub file: PathBuf,
}

pub fn run(args: &InfoArgs) -> Result<()> {
    if !args.file.exists() {
        bail!("{} does not exist", args.file.display());
    }
    let format = detect_format(&args.file)?;

    if format == SourceFormat::TiffStack {
        let info = read_stack_info(&args.file)
            .with_context(|| format!("Failed to open {}", args.file.display()))?;
        println!("File:        {}", args.file.display());
        println!("Format:      {}", format);
        println!("Frames:      {}", info.pages);
        println!("Dimensions:  {}x{}", info.width, info.height);
        println!("Bit depth:   {}", info.bits_per_sample);
        return Ok(());
    }

    let (_, info) = load_movie(&args.file)
        .with_context(|| format!("Failed to load {}", args.file.display()))?;
    let shape = info.shape;

    println!("File:        {}", info.source.display());
    println!("Format:      {}", info.format);
    println!("Frames:      {}", shape.frames);
    println!("Dimensions:  {}x{}", shape.width, shape.height);
    println!("Pixels:      {}", shape.pixel_count());

    Ok(())
}
