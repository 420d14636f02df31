//! ChanLab CLI — structural analysis, batch recomputation and selection queries.
//!
//! Commands:
//! - `analyze` — recompute one instrument and print its structure summary
//! - `batch` — recompute many instruments in parallel into the store
//! - `scan` — list instruments carrying a signal kind on a date
//! - `position` — report a price against an instrument's latest pivot

mod logging;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use chanlab_core::domain::{InstrumentId, SignalKind};
use chanlab_core::indicators::MacdHistogram;
use chanlab_core::query::{latest_signal_date, Zone};
use chanlab_core::Analysis;
use chanlab_runner::{
    discover_instruments, load_bars, position_report, run_batch, scan_signals,
    JsonFileRepository, LoadOptions, Recomputer, RunnerConfig, StructureRepository,
};

#[derive(Parser)]
#[command(
    name = "chanlab",
    about = "ChanLab CLI — fractal, stroke, segment and pivot analysis of daily bars"
)]
struct Cli {
    /// Path to a TOML config file. Defaults apply when omitted.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Emit logs as JSON.
    #[arg(long, global = true, default_value_t = false)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Recompute one instrument and print its structure summary.
    Analyze {
        /// Instrument to analyze (reads {data_dir}/{INSTRUMENT}.csv).
        instrument: String,

        /// Use synthetic data when no CSV exists.
        #[arg(long, default_value_t = false)]
        synthetic: bool,

        /// Print the full analysis as JSON instead of a summary.
        #[arg(long, default_value_t = false)]
        dump: bool,
    },
    /// Recompute many instruments in parallel.
    Batch {
        /// Instruments to recompute. Defaults to every CSV in the data dir.
        instruments: Vec<String>,

        /// Use synthetic data when no CSV exists.
        #[arg(long, default_value_t = false)]
        synthetic: bool,

        /// Worker threads. Overrides runner.workers.
        #[arg(long)]
        workers: Option<usize>,
    },
    /// List instruments with a signal of the given kind on a date.
    Scan {
        /// Signal kind, e.g. first_buy, third_sell, bottom_divergence.
        #[arg(long, value_parser = parse_kind)]
        kind: SignalKind,

        /// Signal date (YYYY-MM-DD).
        #[arg(long, value_parser = parse_date)]
        date: NaiveDate,
    },
    /// Report a price's position relative to the latest pivot band.
    Position {
        instrument: String,

        /// Price to place. Defaults to the last close in the data dir.
        #[arg(long)]
        price: Option<f64>,
    },
}

fn parse_kind(s: &str) -> Result<SignalKind, String> {
    s.parse()
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| format!("invalid date '{s}': {e}"))
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.json);

    let config = match &cli.config {
        Some(path) => RunnerConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => RunnerConfig::default(),
    };
    tracing::debug!(
        data_dir = %config.runner.data_dir.display(),
        store_dir = %config.runner.store_dir.display(),
        workers = config.runner.workers,
        "config loaded"
    );

    match cli.command {
        Commands::Analyze {
            instrument,
            synthetic,
            dump,
        } => run_analyze(&config, InstrumentId::new(instrument), synthetic, dump),
        Commands::Batch {
            instruments,
            synthetic,
            workers,
        } => run_batch_cmd(&config, instruments, synthetic, workers),
        Commands::Scan { kind, date } => run_scan(&config, kind, date),
        Commands::Position { instrument, price } => {
            run_position(&config, InstrumentId::new(instrument), price)
        }
    }
}

fn recomputer(config: &RunnerConfig) -> Recomputer {
    Recomputer::new(
        Arc::new(JsonFileRepository::new(&config.runner.store_dir)),
        Arc::new(MacdHistogram::new(config.momentum.clone())),
        config.analysis(),
    )
}

fn load_options(synthetic: bool) -> LoadOptions {
    LoadOptions {
        synthetic,
        ..LoadOptions::default()
    }
}

fn run_analyze(
    config: &RunnerConfig,
    instrument: InstrumentId,
    synthetic: bool,
    dump: bool,
) -> Result<()> {
    let loaded = load_bars(&instrument, &config.runner.data_dir, &load_options(synthetic))?;
    let recomputer = recomputer(config);
    recomputer.recompute(&instrument, &loaded.bars)?;

    let analysis = recomputer
        .repository()
        .load(&instrument)?
        .with_context(|| format!("analysis for {instrument} missing after recompute"))?;

    if dump {
        println!("{}", serde_json::to_string_pretty(&analysis)?);
    } else {
        print_summary(&analysis, loaded.bars.len(), loaded.is_synthetic());
    }
    Ok(())
}

fn run_batch_cmd(
    config: &RunnerConfig,
    instruments: Vec<String>,
    synthetic: bool,
    workers: Option<usize>,
) -> Result<()> {
    let ids: Vec<InstrumentId> = if instruments.is_empty() {
        discover_instruments(&config.runner.data_dir)?
    } else {
        instruments.into_iter().map(InstrumentId::new).collect()
    };
    if ids.is_empty() {
        bail!(
            "no instruments given and no CSV files in {}",
            config.runner.data_dir.display()
        );
    }

    let outcome = run_batch(
        &recomputer(config),
        &ids,
        &config.runner.data_dir,
        &load_options(synthetic),
        workers.unwrap_or(config.runner.workers),
    )?;

    println!(
        "{:<12} {:>6} {:>8} {:>8} {:>7} {:>8}",
        "instrument", "bars", "strokes", "segments", "pivots", "signals"
    );
    for s in &outcome.succeeded {
        println!(
            "{:<12} {:>6} {:>8} {:>8} {:>7} {:>8}",
            s.instrument.as_str(),
            s.bars,
            s.strokes,
            s.segments,
            s.pivots,
            s.signals
        );
    }
    for f in &outcome.failed {
        eprintln!("FAILED {}: {}", f.instrument, f.error);
    }
    if !outcome.synthetic.is_empty() {
        println!(
            "synthetic data used for: {}",
            outcome
                .synthetic
                .iter()
                .map(InstrumentId::as_str)
                .collect::<Vec<_>>()
                .join(", ")
        );
    }

    if !outcome.failed.is_empty() {
        std::process::exit(1);
    }
    Ok(())
}

fn run_scan(config: &RunnerConfig, kind: SignalKind, date: NaiveDate) -> Result<()> {
    let store = JsonFileRepository::new(&config.runner.store_dir);
    let hits = scan_signals(&store, kind, date)?;
    if hits.is_empty() {
        println!("no instruments with {kind} on {date}");
    }
    for id in hits {
        println!("{id}");
    }
    Ok(())
}

fn run_position(config: &RunnerConfig, instrument: InstrumentId, price: Option<f64>) -> Result<()> {
    let price = match price {
        Some(p) => p,
        None => load_bars(&instrument, &config.runner.data_dir, &LoadOptions::default())?
            .last_close()
            .with_context(|| format!("no bars for {instrument}"))?,
    };

    let store = JsonFileRepository::new(&config.runner.store_dir);
    match position_report(&store, &instrument, price)? {
        Some(pos) => {
            let zone = match pos.zone {
                Zone::Below => "below band",
                Zone::Inside => "inside band",
                Zone::Above => "above band",
            };
            println!(
                "{instrument}: price {:.2} is {:.1}% of pivot #{} [zd {:.2}, zg {:.2}] ({zone})",
                pos.price, pos.position_pct, pos.pivot_index, pos.zd, pos.zg
            );
        }
        None => println!("{instrument}: no pivot formed yet"),
    }
    Ok(())
}

fn print_summary(analysis: &Analysis, bars: usize, synthetic: bool) {
    println!("=== {} ===", analysis.instrument);
    if synthetic {
        println!("(synthetic data)");
    }
    println!("Bars:          {bars}");
    println!("Merged bars:   {}", analysis.merged_bars.len());
    println!("Fractals:      {}", analysis.fractals.len());
    println!("Strokes:       {}", analysis.strokes.len());
    println!("Segments:      {}", analysis.segments.len());
    println!("Pivots:        {}", analysis.pivots.len());
    println!("Seg. pivots:   {}", analysis.segment_pivots.len());
    if let Some(stage) = analysis.insufficient {
        println!("Stopped at:    {stage} (not enough input)");
    }

    if let Some(p) = analysis.latest_pivot() {
        println!(
            "Latest pivot:  #{} {}..{} zg {:.2} zd {:.2}",
            p.index, p.start_date, p.end_date, p.zg, p.zd
        );
    }

    let recent: Vec<_> = analysis.signals.iter().rev().take(10).collect();
    if let Some(date) = latest_signal_date(analysis) {
        println!("Recent signals (last on {date}):");
        for s in recent.into_iter().rev() {
            println!("  {}  {:<18} {:.2}", s.date, s.kind.as_str(), s.price);
        }
    }
}
