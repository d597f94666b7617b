use console::Style;
use spyboat_core::pipeline::config::PipelineConfig;
use spyboat_core::pipeline::PipelineOutput;
use spyboat_core::transform::{Detrending, Normalization};

struct Styles {
    title: Style,
    header: Style,
    label: Style,
    value: Style,
    method: Style,
    disabled: Style,
    path: Style,
}

impl Styles {
    fn new() -> Self {
        Self {
            title: Style::new().cyan().bold(),
            header: Style::new().cyan().bold(),
            label: Style::new().dim(),
            value: Style::new().bold().white(),
            method: Style::new().green(),
            disabled: Style::new().dim().yellow(),
            path: Style::new().underlined(),
        }
    }
}

pub fn print_run_summary(config: &PipelineConfig) {
    let s = Styles::new();
    let params = &config.transform;

    println!();
    println!("  {}", s.title.apply_to("SpyBOAT Analysis"));
    println!("  {}", s.title.apply_to("\u{2550}".repeat(16)));
    println!();

    println!(
        "  {:<14}{}",
        s.label.apply_to("Input"),
        s.path.apply_to(config.input.display())
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Output"),
        s.path.apply_to(config.output_dir.display())
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Format"),
        s.value.apply_to(config.output_format)
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Workers"),
        s.value.apply_to(config.workers)
    );
    println!();

    println!("  {}", s.header.apply_to("Preprocessing"));
    match config.preprocess.scale_factor {
        Some(scale) => println!(
            "    {:<12}{}",
            s.label.apply_to("Scale"),
            s.value.apply_to(format!("{:.0}%", scale * 100.0))
        ),
        None => println!(
            "    {:<12}{}",
            s.label.apply_to("Scale"),
            s.disabled.apply_to("disabled")
        ),
    }
    match config.preprocess.blur_sigma {
        Some(sigma) => println!(
            "    {:<12}{}",
            s.label.apply_to("Blur"),
            s.value.apply_to(format!("sigma {sigma} px"))
        ),
        None => println!(
            "    {:<12}{}",
            s.label.apply_to("Blur"),
            s.disabled.apply_to("disabled")
        ),
    }
    println!();

    println!("  {}", s.header.apply_to("Wavelet Transform"));
    println!(
        "    {:<12}{}",
        s.label.apply_to("dt"),
        s.value.apply_to(params.dt)
    );
    println!(
        "    {:<12}{}",
        s.label.apply_to("Periods"),
        s.value.apply_to(format!(
            "{} .. {} ({} steps)",
            params.periods.t_min, params.periods.t_max, params.periods.n_periods
        ))
    );
    match params.detrend {
        Detrending::Sinc { cutoff } => println!(
            "    {:<12}{}",
            s.label.apply_to("Detrend"),
            s.method.apply_to(format!("sinc, cut-off {cutoff}"))
        ),
        Detrending::Disabled => println!(
            "    {:<12}{}",
            s.label.apply_to("Detrend"),
            s.disabled.apply_to("disabled")
        ),
    }
    match params.normalization {
        Normalization::Envelope { window } => println!(
            "    {:<12}{}",
            s.label.apply_to("Normalize"),
            s.method.apply_to(format!("envelope, window {window}"))
        ),
        Normalization::Disabled => println!(
            "    {:<12}{}",
            s.label.apply_to("Normalize"),
            s.disabled.apply_to("disabled")
        ),
    }
    println!();
}

pub fn print_outputs(output: &PipelineOutput) {
    let s = Styles::new();

    println!();
    println!(
        "  {:<14}{}",
        s.label.apply_to("Movie"),
        s.value.apply_to(output.preprocessed_shape)
    );
    println!("  {}", s.header.apply_to("Written"));
    for path in &output.written {
        println!("    {}", s.path.apply_to(path.display()));
    }
    println!();
}
