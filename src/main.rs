//! frc-filter-tool - Command-line entry point
//!
//! Decodes a WPILOG file, runs one channel through a single filter node and
//! prints the result (or its spectrum) as CSV.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::Parser;
use frc_filter_tool::{
    analysis::{self, SpectrumAnalyzer, WindowFunction},
    config::{default_config_path, LoggingConfig, ToolConfig},
    filter::{linear_filter_code, FilterKind, FilterParameter, ParameterMap},
    pipeline::{NodeKind, PipelineGraph},
    wpilog::LogChannels,
};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "frc-filter-tool")]
#[command(author, version, about = "Decode WPILOG telemetry and filter a channel", long_about = None)]
struct Cli {
    /// WPILOG file to decode
    log: PathBuf,

    /// List numeric channels and exit
    #[arg(short, long)]
    list: bool,

    /// Channel to filter (defaults to the first numeric channel)
    #[arg(short, long)]
    channel: Option<String>,

    /// Filter design: butterworth or lowpass
    #[arg(short, long, default_value = "lowpass")]
    filter: FilterKind,

    /// Filter order
    #[arg(long)]
    order: Option<usize>,

    /// Cutoff frequency in Hz
    #[arg(long)]
    cutoff: Option<f64>,

    /// Sample rate in Hz
    #[arg(long)]
    sample_rate: Option<f64>,

    /// Print frc::LinearFilter coefficients instead of CSV
    #[arg(long)]
    code: bool,

    /// Print designed vs measured magnitude (dB) instead of CSV
    #[arg(long)]
    response: bool,

    /// Print the magnitude spectrum of the input and filtered channel
    #[arg(long)]
    spectrum: bool,

    /// Window applied before the FFT: rectangular, hann, hamming or blackman
    #[arg(long, default_value = "hann")]
    window: WindowFunction,

    /// Config file (TOML or JSON)
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => ToolConfig::load(path)?,
        None => ToolConfig::load_default_location(),
    };
    let _guard = init_logging(&config.logging)?;

    tracing::debug!("Config path: {:?}", cli.config.clone().or_else(default_config_path));

    let bytes =
        std::fs::read(&cli.log).with_context(|| format!("Failed to read {:?}", cli.log))?;
    let log = LogChannels::from_bytes(&bytes)
        .with_context(|| format!("Failed to decode {:?}", cli.log))?;
    tracing::info!(
        "Decoded {} channels from {:?} ({} records skipped)",
        log.len(),
        cli.log,
        log.skipped_records()
    );

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    if cli.list {
        for channel in log.channels() {
            let entry_type = log
                .catalog()
                .id_of(&channel.name)
                .and_then(|id| log.catalog().get(id))
                .map(|info| info.entry_type.to_string())
                .unwrap_or_default();
            writeln!(out, "{}\t{}\t{}", channel.name, entry_type, channel.len())?;
        }
        return Ok(());
    }

    let mut design = config.filter.clone();
    if let Some(order) = cli.order {
        design.set(FilterParameter::Order, order as f64)?;
    }
    if let Some(cutoff) = cli.cutoff {
        design.set(FilterParameter::CutoffFreq, cutoff)?;
    }
    if let Some(rate) = cli.sample_rate {
        design.set(FilterParameter::SampleRate, rate)?;
    }

    let mut graph = PipelineGraph::with_defaults(design.clone());
    let node = graph.add_filter_node(NodeKind::from(cli.filter), ParameterMap::new())?;

    if cli.code {
        let filter = graph
            .filter(&node)
            .context("Filter node has no attached filter")?;
        write!(out, "{}", linear_filter_code(filter))?;
        return Ok(());
    }

    if cli.response {
        let filter = graph
            .filter_mut(&node)
            .context("Filter node has no attached filter")?;
        let comparison = analysis::compare(filter, 1024);
        writeln!(out, "frequency_hz,designed_db,measured_db")?;
        for i in 0..comparison.frequencies.len() {
            writeln!(
                out,
                "{},{},{}",
                comparison.frequencies[i], comparison.designed_db[i], comparison.measured_db[i]
            )?;
        }
        tracing::info!(
            "Max designed/measured deviation: {:.3} dB",
            comparison.max_deviation_db()
        );
        return Ok(());
    }

    let channel = match &cli.channel {
        Some(name) => log
            .channel(name)
            .with_context(|| format!("Unknown channel: {}", name))?,
        None => match log.channels().first() {
            Some(channel) => channel,
            None => bail!("{:?} contains no numeric channels", cli.log),
        },
    };

    let input = channel.values();
    let filtered = cli
        .filter
        .build_with(&design, &ParameterMap::new())?
        .process_block(&input);

    if cli.spectrum {
        let sample_rate = design.get(FilterParameter::SampleRate);
        let mut analyzer = SpectrumAnalyzer::new().with_window(cli.window);
        let before = analyzer.compute(&input, sample_rate);
        let after = analyzer.compute(&filtered, sample_rate);
        writeln!(out, "frequency_hz,input,filtered")?;
        for ((frequency, a), b) in before
            .frequencies
            .iter()
            .zip(&before.magnitudes)
            .zip(&after.magnitudes)
        {
            writeln!(out, "{},{},{}", frequency, a, b)?;
        }
        if let Some((frequency, magnitude)) = before.peak() {
            tracing::info!(
                "{} window: input peak {:.4} at {:.3} Hz ({:.3} Hz bins)",
                cli.window,
                magnitude,
                frequency,
                before.frequency_resolution
            );
        }
        return Ok(());
    }

    // `pipeline` is the graph's merged output: the node's result summed with
    // the caller input it started from.
    let pipeline = graph.process_data(input.clone());
    writeln!(out, "timestamp_us,input,filtered,pipeline")?;
    for ((point, f), p) in channel.points.iter().zip(&filtered).zip(&pipeline) {
        writeln!(out, "{},{},{},{}", point.timestamp, point.value, f, p)?;
    }

    Ok(())
}

/// Console logging to stderr plus an optional log file. `RUST_LOG` overrides
/// the configured filter.
fn init_logging(config: &LoggingConfig) -> anyhow::Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.filter))
        .with_context(|| format!("Invalid log filter {:?}", config.filter))?;

    let (file_layer, guard) = match &config.file {
        Some(path) => {
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or(Path::new("."));
            let name = path
                .file_name()
                .with_context(|| format!("Log file {:?} has no file name", path))?;
            let (writer, guard) =
                tracing_appender::non_blocking(tracing_appender::rolling::never(dir, name));
            (
                Some(fmt::layer().with_ansi(false).with_writer(writer)),
                Some(guard),
            )
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .init();

    Ok(guard)
}
