//! Averaged spectrum of a multi-channel I/Q capture
//!
//! Writes one CSV row per frequency bin: `frequency_mhz,ch0_db,ch1_db,...`,
//! ready for any plotting tool.

use anyhow::{Context, Result};
use clap::Parser;
use iq_psd::{AnalysisConfig, AveragingEngine, FileSource, PsdReport};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "iq-psd")]
#[command(author, version, about = "Averaged PSD of an interleaved int16 I/Q capture", long_about = None)]
struct Cli {
    /// Raw capture file (interleaved int16 I/Q, no header)
    file_path: PathBuf,

    /// Number of interleaved channels
    #[arg(short, long, default_value_t = 8)]
    channels: usize,

    /// Per-channel sample rate in Hz
    #[arg(short = 'r', long, default_value_t = 250e6)]
    sample_rate: f64,

    /// FFT size (samples per segment)
    #[arg(short = 'n', long, default_value_t = 2048)]
    fft_size: usize,

    /// Number of segments to average
    #[arg(short, long, default_value_t = 50)]
    averages: usize,

    /// Output CSV file (stdout if omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Analyze channels one at a time instead of in parallel
    #[arg(long)]
    sequential: bool,

    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let config = AnalysisConfig {
        channel_count: cli.channels,
        sample_rate_hz: cli.sample_rate,
        fft_size: cli.fft_size,
        requested_averages: cli.averages,
    };
    let engine = AveragingEngine::new(config)
        .context("Invalid analysis parameters")?
        .sequential(cli.sequential);

    let source = FileSource::open(&cli.file_path)
        .with_context(|| format!("Failed to open capture {}", cli.file_path.display()))?;

    let report = engine
        .analyze(&source)
        .with_context(|| format!("Failed to analyze {}", cli.file_path.display()))?;

    log::info!("{}", report.title());

    match &cli.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            write_csv(&report, BufWriter::new(file))?;
            log::info!(
                "Wrote {} bins x {} channels to {}",
                report.frequencies_mhz.len(),
                report.curves.len(),
                path.display()
            );
        }
        None => {
            let stdout = io::stdout();
            write_csv(&report, BufWriter::new(stdout.lock()))?;
        }
    }

    Ok(())
}

fn write_csv<W: Write>(report: &PsdReport, mut writer: W) -> io::Result<()> {
    write!(writer, "frequency_mhz")?;
    for curve in &report.curves {
        write!(writer, ",ch{}_db", curve.channel)?;
    }
    writeln!(writer)?;

    for (bin, frequency) in report.frequencies_mhz.iter().enumerate() {
        write!(writer, "{:.6}", frequency)?;
        for curve in &report.curves {
            write!(writer, ",{:.3}", curve.points[bin].power_db)?;
        }
        writeln!(writer)?;
    }

    writer.flush()
}
