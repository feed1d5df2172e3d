use anyhow::{Context, Result};
use chrono_tz::Tz;
use clap::{Parser, Subcommand};
use rayon::prelude::*;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use session_levels::bars::load_bars;
use session_levels::session::{replay, BarOutput, LevelTable, DEFAULT_LEVEL_TEXT};
use session_levels::CalculatorConfig;

#[derive(Parser, Debug)]
#[command(name = "session-levels")]
#[command(about = "Replay OHLCV bars through the session levels calculator")]
struct Args {
    #[command(subcommand)]
    command: Commands,

    /// Print verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Calculator parameters shared by every command. Omitted values fall back
/// to `CalculatorConfig::default()`.
#[derive(clap::Args, Debug, Clone)]
struct CalculatorArgs {
    /// New York Open hour (chart-local) [default: 9]
    #[arg(long, env = "NYO_HOUR")]
    nyo_hour: Option<u32>,

    /// New York Open minute [default: 30]
    #[arg(long, env = "NYO_MINUTE")]
    nyo_minute: Option<u32>,

    /// Bars right of the last bar for static level labels [default: 50]
    #[arg(long, env = "LABEL_OFFSET")]
    label_offset: Option<usize>,

    /// Round every displayed price to a whole number
    #[arg(long, env = "HIDE_DECIMALS")]
    hide_decimals: Option<bool>,

    /// Static level label color [default: #FFD700]
    #[arg(long, env = "LEVEL_COLOR")]
    level_color: Option<String>,

    /// VWAP label color [default: #6699FF]
    #[arg(long, env = "VWAP_COLOR")]
    vwap_color: Option<String>,

    /// Only re-anchor VWAP at NYO when the market is active
    #[arg(long, env = "GATE_VWAP_ON_ACTIVITY")]
    gate_vwap_on_activity: Option<bool>,

    /// Static level file (`label, price` per line); embedded table if omitted
    #[arg(short, long)]
    levels: Option<PathBuf>,

    /// Chart timezone for RFC 3339 timestamps
    #[arg(long, default_value = "America/New_York", value_parser = parse_tz)]
    tz: Tz,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Replay one bar file, one JSON line per bar
    Replay {
        /// CSV file with timestamp,open,high,low,close,volume
        #[arg(short, long)]
        bars: PathBuf,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        calculator: CalculatorArgs,
    },

    /// Replay several bar files in parallel, one independent calculator each
    Batch {
        /// CSV files to replay
        #[arg(short, long, num_args = 1.., required = true)]
        bars: Vec<PathBuf>,

        /// Directory for <stem>.jsonl outputs
        #[arg(short, long, default_value = "output")]
        output_dir: PathBuf,

        #[command(flatten)]
        calculator: CalculatorArgs,
    },
}

fn parse_tz(s: &str) -> Result<Tz, String> {
    s.parse::<Tz>().map_err(|e| e.to_string())
}

impl CalculatorArgs {
    fn config(&self) -> Result<CalculatorConfig> {
        let defaults = CalculatorConfig::default();
        let config = CalculatorConfig {
            nyo_hour: self.nyo_hour.unwrap_or(defaults.nyo_hour),
            nyo_minute: self.nyo_minute.unwrap_or(defaults.nyo_minute),
            label_offset: self.label_offset.unwrap_or(defaults.label_offset),
            hide_decimals: self.hide_decimals.unwrap_or(defaults.hide_decimals),
            level_color: self.level_color.clone().unwrap_or(defaults.level_color),
            vwap_color: self.vwap_color.clone().unwrap_or(defaults.vwap_color),
            gate_vwap_on_activity: self.gate_vwap_on_activity.unwrap_or(defaults.gate_vwap_on_activity),
        };
        config.validate().context("Invalid calculator parameters")?;
        Ok(config)
    }

    fn level_table(&self) -> Result<LevelTable> {
        let table = match &self.levels {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read levels file: {:?}", path))?;
                LevelTable::parse(&text)
            }
            None => LevelTable::parse(DEFAULT_LEVEL_TEXT),
        };
        if table.skipped() > 0 {
            warn!("Skipped {} malformed level lines", table.skipped());
        }
        Ok(table)
    }
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(if args.verbose { Level::DEBUG } else { Level::INFO })
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match args.command {
        Commands::Replay { bars, output, calculator } => {
            run_replay(&bars, output.as_deref(), &calculator)?;
        }
        Commands::Batch { bars, output_dir, calculator } => {
            run_batch(&bars, &output_dir, &calculator)?;
        }
    }

    Ok(())
}

fn run_replay(bars_path: &Path, output: Option<&Path>, args: &CalculatorArgs) -> Result<()> {
    let config = args.config()?;
    let levels = args.level_table()?;
    info!("NYO {:02}:{:02}, {} static levels", config.nyo_hour, config.nyo_minute, levels.len());

    let bars = load_bars(bars_path, args.tz)?;
    info!("Loaded {} bars from {:?}", bars.len(), bars_path);

    let outputs = replay(config, levels, &bars)?;

    match output {
        Some(path) => {
            let file = File::create(path).with_context(|| format!("Failed to create {:?}", path))?;
            write_jsonl(BufWriter::new(file), &outputs)?;
            info!("Wrote {} records to {:?}", outputs.len(), path);
        }
        None => write_jsonl(std::io::stdout().lock(), &outputs)?,
    }

    Ok(())
}

fn run_batch(files: &[PathBuf], output_dir: &Path, args: &CalculatorArgs) -> Result<()> {
    let config = args.config()?;
    let levels = args.level_table()?;
    std::fs::create_dir_all(output_dir)?;

    info!("Replaying {} files into {:?}", files.len(), output_dir);

    let results: Vec<Result<usize>> = files
        .par_iter()
        .map(|path| {
            let bars = load_bars(path, args.tz)?;
            let outputs = replay(config.clone(), levels.clone(), &bars)?;

            let stem = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| "bars".to_string());
            let out_path = output_dir.join(format!("{}.jsonl", stem));
            let file = File::create(&out_path)
                .with_context(|| format!("Failed to create {:?}", out_path))?;
            write_jsonl(BufWriter::new(file), &outputs)?;

            info!("Processed {:?}: {} bars", path, bars.len());
            Ok(bars.len())
        })
        .collect();

    let mut failed = 0;
    for (path, result) in files.iter().zip(&results) {
        if let Err(e) = result {
            warn!("Failed {:?}: {:#}", path, e);
            failed += 1;
        }
    }

    let total: usize = results.iter().filter_map(|r| r.as_ref().ok()).sum();
    info!("Done: {} bars across {} files, {} failed", total, files.len() - failed, failed);

    if failed > 0 {
        anyhow::bail!("{} of {} files failed", failed, files.len());
    }
    Ok(())
}

fn write_jsonl<W: Write>(mut writer: W, outputs: &[BarOutput]) -> Result<()> {
    for out in outputs {
        serde_json::to_writer(&mut writer, out)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(())
}
