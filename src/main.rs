//! # Space Image Converter - Main Entry Point
//!
//! Questo è il punto di ingresso principale dell'applicazione.
//!
//! ## Responsabilità:
//! - Parsing degli argomenti della command line con `clap`
//! - Inizializzazione del sistema di logging con `tracing`
//! - Richiesta interattiva della qualità se `--quality` non è passato
//! - Creazione della configurazione e avvio del converter
//!
//! ## Flusso di esecuzione:
//! 1. Parsa gli argomenti CLI (cartelle, quality, policy errori, etc.)
//! 2. Configura il logging (INFO o DEBUG a seconda del flag verbose)
//! 3. Ottiene la qualità (argomento o prompt su stdin)
//! 4. Crea un oggetto Config con tutti i parametri
//! 5. Istanzia BatchConverter e avvia la conversione
//!
//! Qualsiasi errore arriva fino a `main`, che termina con exit code 1.
//!
//! ## Esempio di utilizzo:
//! ```bash
//! image-converter --input ./input --output ./output --quality 85 --verbose
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing::info;

use space_image_converter::{BatchConverter, Config, ConversionStats, FailurePolicy};

#[derive(Parser)]
#[command(name = "image-converter")]
#[command(about = "Convert PNG images to JPEG and recompress JPEG images")]
struct Args {
    /// Folder containing the images to convert
    #[arg(short, long, default_value = "./input")]
    input: PathBuf,

    /// Folder receiving the converted images
    #[arg(short, long, default_value = "./output")]
    output: PathBuf,

    /// JPEG quality (0-100); asked interactively when omitted
    #[arg(short, long, value_parser = parse_quality, allow_negative_numbers = true)]
    quality: Option<u8>,

    /// Log failed files and keep converting the rest
    #[arg(long)]
    keep_going: bool,

    /// Save converted PNG files with a .jpg extension
    #[arg(long)]
    jpg_extension: bool,

    /// Output progress and status as JSON lines on stdout
    #[arg(long)]
    json: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(if args.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .with_writer(io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("******* Image Processing - Convert PNG to JPEG or Compress JPEG *******");

    let quality = match args.quality {
        Some(quality) => quality,
        None => prompt_quality(io::stdin().lock(), io::stderr())?,
    };

    let config = Config {
        input_dir: args.input,
        output_dir: args.output,
        quality,
        failure_policy: if args.keep_going {
            FailurePolicy::Continue
        } else {
            FailurePolicy::Abort
        },
        jpg_extension: args.jpg_extension,
        json_output: args.json,
    };

    let converter = BatchConverter::new(config)?;
    check_run_result(converter.run())
}

/// Turns the outcome of a run into the process result.
///
/// Files counted as failed under `--keep-going` still make the run fail, so the
/// process exits with status 1 either way.
fn check_run_result(result: Result<ConversionStats>) -> Result<()> {
    let stats = result?;

    if stats.has_errors() {
        return Err(anyhow::anyhow!(
            "{} of {} files failed to convert",
            stats.errors,
            stats.files_processed
        ));
    }

    Ok(())
}

/// Ask for the quality on `input`, writing the prompt to `prompt`.
///
/// `main` passes stderr as `prompt`, so stdout carries only JSON lines in `--json` mode.
fn prompt_quality(mut input: impl BufRead, mut prompt: impl Write) -> Result<u8> {
    write!(prompt, "Enter Image Output quality between 0 to 100: ")?;
    prompt.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    parse_quality(&line)
}

/// Parse an integer quality without range validation.
///
/// Shared by `--quality` and the prompt. Values outside 0-255 are saturated to
/// fit the encoder's `u8`; anything above 100 is clamped again by the encoder and
/// reported by `Config::validate`.
fn parse_quality(input: &str) -> Result<u8> {
    let trimmed = input.trim();
    let value: i64 = trimmed
        .parse()
        .with_context(|| format!("Invalid quality value: {:?}", trimmed))?;

    Ok(value.clamp(0, u8::MAX as i64) as u8)
}
