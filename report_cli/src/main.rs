//! # beam-report
//!
//! Command line front end for `report_core`. Reads a beam analysis table,
//! renders the report and prints where it went.
//!
//! ```text
//! beam-report --input data/Force.xlsx --output output/report.pdf
//! beam-report --config report.toml --format json -v
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use report_core::config::{OutputFormat, ReportConfig};
use report_core::errors::{RenderError, ReportError};
use report_core::pipeline::{generate, ReportRun};

#[derive(Parser, Debug)]
#[command(
    name = "beam-report",
    version,
    about = "Generate a beam analysis report from shear force and bending moment data."
)]
struct Cli {
    /// TOML configuration file; flags override its values
    #[arg(long, value_name = "TOML")]
    config: Option<PathBuf>,

    /// Analysis table (.xlsx, .xls, .ods, .csv, .tsv, .json)
    #[arg(short, long, value_name = "PATH")]
    input: Option<PathBuf>,

    /// Beam diagram included in the introduction when the file exists
    #[arg(long, value_name = "PATH", conflicts_with = "no_image")]
    image: Option<PathBuf>,

    /// Leave the beam diagram out
    #[arg(long)]
    no_image: bool,

    /// Output path; the extension follows --format
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    #[arg(short, long, value_enum)]
    format: Option<FormatArg>,

    #[arg(long)]
    title: Option<String>,

    #[arg(long)]
    author: Option<String>,

    /// Remove the intermediate .typ file after a successful PDF build
    #[arg(long)]
    no_keep_source: bool,

    /// Debug logging (RUST_LOG takes precedence)
    #[arg(short, long)]
    verbose: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum FormatArg {
    Pdf,
    Typst,
    Json,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Pdf => OutputFormat::Pdf,
            FormatArg::Typst => OutputFormat::Typst,
            FormatArg::Json => OutputFormat::Json,
        }
    }
}

impl Cli {
    /// Config file (or defaults) with the flags applied on top.
    fn resolve_config(&self) -> Result<ReportConfig, ReportError> {
        let mut config = match &self.config {
            Some(path) => ReportConfig::load(path)?,
            None => ReportConfig::default(),
        };

        if let Some(input) = &self.input {
            config.input_path = input.clone();
        }
        if self.no_image {
            config.image_path = None;
        } else if let Some(image) = &self.image {
            config.image_path = Some(image.clone());
        }
        if let Some(output) = &self.output {
            config.output_path = output.clone();
        }
        if let Some(format) = self.format {
            config.format = format.into();
        }
        if let Some(title) = &self.title {
            config.title = title.clone();
        }
        if let Some(author) = &self.author {
            config.author = author.clone();
        }
        if self.no_keep_source {
            config.keep_source = false;
        }

        Ok(config)
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn report_failure(err: &ReportError) {
    eprintln!("Error: {}", err);
    eprintln!("  code: {}", err.error_code());

    if let ReportError::Render(render) = err {
        if let Some(source) = render.retained_source() {
            eprintln!("  typst source kept at: {}", source);
        }
        if let RenderError::Compile { diagnostics, .. } = render {
            for diagnostic in diagnostics {
                eprintln!("    {}", diagnostic);
            }
        }
    }

    if let Ok(json) = serde_json::to_string(err) {
        tracing::debug!("{}", json);
    }
}

fn report_success(run: &ReportRun) {
    println!("Report successfully generated: {}", run.outcome.artifact.display());
    if let Some(intermediate) = &run.outcome.intermediate {
        println!("Typst source: {}", intermediate.display());
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = cli.resolve_config().and_then(|config| generate(&config));
    match result {
        Ok(run) => {
            report_success(&run);
            ExitCode::SUCCESS
        }
        Err(err) => {
            report_failure(&err);
            ExitCode::FAILURE
        }
    }
}
