use clap::{Parser, Subcommand};
use qrdetect::{PixelBuffer, Scanner};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser)]
#[command(name = "qrdetect", version, about = "Decode QR codes from raw RGBA dumps")]
struct Cli {
    /// Default log filter when RUST_LOG is unset
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Detect symbols in a headerless RGBA file
    Detect {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        width: u32,
        #[arg(long)]
        height: u32,
        /// Bytes to skip before the first pixel
        #[arg(long, default_value_t = 0)]
        offset: usize,
    },
    /// Print the decoding engine's version
    EngineVersion,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    match cli.command {
        Command::Detect {
            input,
            width,
            height,
            offset,
        } => detect_cmd(&input, width, height, offset),
        Command::EngineVersion => {
            println!("{}", qrdetect::version());
            ExitCode::SUCCESS
        }
    }
}

fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact().with_writer(std::io::stderr))
        .init();
}

fn detect_cmd(input: &Path, width: u32, height: u32, offset: usize) -> ExitCode {
    let bytes = match std::fs::read(input) {
        Ok(bytes) => bytes,
        Err(err) => {
            eprintln!("Failed to read {}: {}", input.display(), err);
            return ExitCode::FAILURE;
        }
    };
    let length = bytes.len().saturating_sub(offset);
    let pixels = match PixelBuffer::with_window(&bytes, offset, length, width, height) {
        Ok(pixels) => pixels,
        Err(err) => {
            eprintln!("{}: {}", input.display(), err);
            return ExitCode::FAILURE;
        }
    };

    let mut scanner = match Scanner::open() {
        Ok(scanner) => scanner,
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::FAILURE;
        }
    };

    let start = Instant::now();
    let records = match scanner.detect_pixels(&pixels) {
        Ok(records) => records,
        Err(err) => {
            eprintln!("{}: {}", input.display(), err);
            return ExitCode::FAILURE;
        }
    };
    info!(elapsed = ?start.elapsed(), symbols = records.len(), "detection finished");

    for record in &records {
        let points: Vec<String> = record
            .locations
            .iter()
            .map(|l| format!("{},{}", l.x, l.y))
            .collect();
        println!(
            "{} orientation={} quality={} at [{}]: {}",
            record.symbol_type,
            record.orientation.code(),
            record.quality,
            points.join(" "),
            record.text()
        );
    }
    ExitCode::SUCCESS
}
