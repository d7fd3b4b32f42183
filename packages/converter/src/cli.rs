//! Command-line interface for the converter.

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::config::{ConverterConfig, ERROR_SUFFIX, OUTPUT_SUFFIX};
use crate::converter::Converter;
use crate::error::{ConverterError, Result};
use crate::model::Program;

/// QPP Converter - Convert QRDA Category III documents to QPP submission JSON.
#[derive(Parser)]
#[command(name = "qpp-converter")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Convert QRDA III files to QPP JSON.
    Convert {
        /// QRDA III XML files
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Program scope: ALL, MIPS or CPCPLUS (default: $QPP_PROGRAM or ALL)
        #[arg(short, long)]
        program: Option<String>,

        /// Do not apply the default decoder to unrecognised templates
        #[arg(long)]
        skip_defaults: bool,

        /// Do not run validation
        #[arg(long)]
        skip_validation: bool,

        /// Output directory (default: current directory)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// What happened to one input file.
#[derive(Debug)]
pub enum Outcome {
    /// Converted; the QPP JSON was written here.
    Converted(PathBuf),
    /// Failed; the error report was written here.
    Failed(PathBuf),
}

/// Run the CLI.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Convert {
            files,
            program,
            skip_defaults,
            skip_validation,
            output,
        } => {
            let mut config = ConverterConfig::from_env()?;
            if let Some(program) = program {
                config = config.with_program(program.parse::<Program>()?);
            }
            if skip_defaults {
                config = config.with_defaults(false);
            }
            if skip_validation {
                config = config.with_validation(false);
            }
            convert_command(&files, config, output.as_deref())
        }
    }
}

/// Execute the convert command.
fn convert_command(files: &[PathBuf], config: ConverterConfig, output: Option<&Path>) -> Result<()> {
    let output_dir = output.unwrap_or_else(|| Path::new("."));
    if !output_dir.is_dir() {
        return Err(ConverterError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("Output directory does not exist: {}", output_dir.display()),
        )));
    }

    println!(
        "{} {} file(s) for program {}",
        style("Converting").bold(),
        style(files.len()).cyan(),
        style(config.program).green()
    );

    let pb = ProgressBar::new(files.len() as u64);
    #[allow(clippy::expect_used)] // Static template string that is guaranteed to be valid
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{bar:30.green} {pos}/{len} {msg}")
            .expect("valid template"),
    );

    let mut failed = 0;
    for file in files {
        pb.set_message(file.display().to_string());
        let outcome = match convert_file(file, config, output_dir) {
            Ok(outcome) => outcome,
            Err(e) => {
                pb.finish_and_clear();
                return Err(e);
            }
        };
        match outcome {
            Outcome::Converted(path) => pb.println(format!(
                "  {} {}",
                style("✓").green().bold(),
                path.display()
            )),
            Outcome::Failed(path) => {
                failed += 1;
                pb.println(format!(
                    "  {} {}",
                    style("✗").red().bold(),
                    path.display()
                ));
            }
        }
        pb.inc(1);
    }
    pb.finish_and_clear();

    println!();
    if failed > 0 {
        println!(
            "{} {} of {} file(s)",
            style("Failed:").red().bold(),
            failed,
            files.len()
        );
        return Err(ConverterError::BatchFailed {
            failed,
            total: files.len(),
        });
    }
    println!("{} {} file(s)", style("Converted:").green().bold(), files.len());
    Ok(())
}

/// Convert one file and write its JSON or error report into `output_dir`.
///
/// # Errors
/// Returns an error only if the result could not be written; a failed
/// conversion is an [`Outcome::Failed`].
pub fn convert_file(file: &Path, config: ConverterConfig, output_dir: &Path) -> Result<Outcome> {
    let stem = file
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());

    let mut converter = Converter::from_path(file).with_context(config.into_context());
    match converter.transform() {
        Ok(wrapper) => {
            let path = output_dir.join(format!("{stem}{OUTPUT_SUFFIX}"));
            fs::write(&path, wrapper.to_json_pretty()?)?;
            Ok(Outcome::Converted(path))
        }
        Err(e) => {
            tracing::warn!(file = %file.display(), error = %e, "Conversion failed");
            let path = output_dir.join(format!("{stem}{ERROR_SUFFIX}"));
            fs::write(&path, e.details().to_json_pretty()?)?;
            Ok(Outcome::Failed(path))
        }
    }
}
