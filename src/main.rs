use anyhow::{Context, Result};
use clap::Parser;
use modus_convert::{ConversionResult, ConvertConfig, Converter, InputFile};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing_subscriber::EnvFilter;
use walkdir::WalkDir;

const DEFAULT_LOG_FILTER: &str = "modus_convert=info";

#[derive(Parser, Debug)]
#[command(name = "modus-convert")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Convert agronomic lab reports (XML, CSV, XLSX, JSON, ZIP) into modus JSON")]
#[command(arg_required_else_help = true)]
struct Cli {
    /// Files or directories to convert; directories are walked recursively
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Table format applied to every input (e.g. tomkat, generic)
    #[arg(short, long)]
    format: Option<String>,

    /// Write each report to this directory instead of printing to stdout
    #[arg(short, long)]
    out_dir: Option<PathBuf>,

    /// Path to a JSON converter configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let start_time = Instant::now();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ConvertConfig::default(),
    };

    let inputs = collect_inputs(&cli.inputs, cli.format.as_deref())?;
    let input_count = inputs.len();

    let converter = Converter::with_config(config);
    let results = converter.convert(inputs);

    match &cli.out_dir {
        Some(out_dir) => {
            let written = write_results(out_dir, &results)?;
            for path in &written {
                println!("{}", path.display());
            }
        }
        None => {
            let json = serde_json::to_string_pretty(&results)
                .context("Failed to serialize conversion results")?;
            println!("{json}");
        }
    }

    eprintln!(
        "Converted {} input file(s) into {} report(s) [{:.2}s]",
        input_count,
        results.len(),
        start_time.elapsed().as_secs_f64()
    );

    Ok(())
}

fn load_config(path: &Path) -> Result<ConvertConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    ConvertConfig::from_json_str(&text)
        .with_context(|| format!("Invalid config file {}", path.display()))
}

/// Expand the command-line paths into batch inputs, in a stable order
fn collect_inputs(paths: &[PathBuf], format: Option<&str>) -> Result<Vec<InputFile>> {
    let mut inputs = Vec::new();

    for path in paths {
        if path.is_dir() {
            for entry in WalkDir::new(path).sort_by_file_name() {
                let entry = entry
                    .with_context(|| format!("Failed to walk directory {}", path.display()))?;
                if !entry.file_type().is_file() {
                    continue;
                }
                let relative = entry.path().strip_prefix(path).unwrap_or(entry.path());
                inputs.push(read_input(entry.path(), &display_name(relative), format)?);
            }
        } else {
            inputs.push(read_input(path, &display_name(path), format)?);
        }
    }

    Ok(inputs)
}

fn read_input(path: &Path, filename: &str, format: Option<&str>) -> Result<InputFile> {
    let contents =
        fs::read(path).with_context(|| format!("Failed to read input {}", path.display()))?;
    let input = InputFile::from_contents(filename, contents);
    Ok(match format {
        Some(format) => input.with_format(format),
        None => input,
    })
}

/// Forward-slash form of a path, used as the input filename
fn display_name(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Write each report as pretty JSON under `out_dir`, named by the basename
/// of its output filename. Later results overwrite earlier ones of the same
/// name.
fn write_results(out_dir: &Path, results: &[ConversionResult]) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create output directory {}", out_dir.display()))?;

    let mut written = Vec::with_capacity(results.len());
    for result in results {
        let name = Path::new(&result.output_filename)
            .file_name()
            .with_context(|| format!("No file name in {}", result.output_filename))?;
        let target = out_dir.join(name);

        let json = serde_json::to_string_pretty(&result.structured_report)?;
        fs::write(&target, json)
            .with_context(|| format!("Failed to write {}", target.display()))?;
        written.push(target);
    }

    Ok(written)
}
