//! osr CLI
//!
//! Inspect replay captures from the command line.

#![warn(missing_docs)]
#![warn(clippy::all)]

use bytes::Bytes;
use clap::{Parser, Subcommand};
use color_eyre::Result;
use color_eyre::eyre::WrapErr;
use osr_codec::{FrameContext, FrameSection, InputFrame};
use osr_core::{FormatVersion, GameMode, Mods, decode_mods};
use osr_replay::{DecodeConfig, ReplayDecoder, ReplayHeader, read_replay_file};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "osr")]
#[command(about = "Decode rhythm-game replay captures", long_about = None)]
struct Cli {
    /// Decoder config file (JSON)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// LZMA decoder memory limit in bytes
    #[arg(long, global = true)]
    memory_limit: Option<usize>,
    /// Read a lone 0x00 in place of a header string as empty
    #[arg(long, global = true)]
    allow_absent_strings: bool,
    /// More log output (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the replay header
    Info {
        /// Replay file
        file: PathBuf,
        /// Print JSON
        #[arg(long)]
        json: bool,
    },
    /// Decode the frame section
    Frames {
        /// Replay file
        file: PathBuf,
        /// Print at most this many frames
        #[arg(short, long)]
        limit: Option<usize>,
        /// Print JSON
        #[arg(long)]
        json: bool,
    },
    /// Decode a file holding only a compressed frame block
    Stream {
        /// Compressed frame block
        file: PathBuf,
        /// Game mode byte (0 standard, 1 taiko, 2 catch, 3 mania)
        #[arg(short, long, default_value_t = 0)]
        mode: u8,
        /// Format version
        #[arg(long, default_value_t = 0)]
        format_version: i32,
        /// Print at most this many frames
        #[arg(short, long)]
        limit: Option<usize>,
        /// Print JSON
        #[arg(long)]
        json: bool,
    },
    /// Decode a mods bitmask
    Mods {
        /// Mods value as stored in the header
        bits: u32,
    },
}

#[derive(Serialize)]
struct HeaderReport<'a> {
    #[serde(flatten)]
    header: &'a ReplayHeader,
    accuracy: f64,
    mod_names: Vec<&'static str>,
}

#[derive(Serialize)]
struct FramesReport<'a> {
    frame_count: usize,
    duration_ms: i64,
    seed: Option<i32>,
    score_id: Option<i64>,
    target_practice_hits: Option<f64>,
    frames: &'a [InputFrame],
}

impl<'a> FramesReport<'a> {
    fn new(section: &'a FrameSection, limit: Option<usize>) -> Self {
        let shown = limit.unwrap_or(section.len()).min(section.len());
        Self {
            frame_count: section.len(),
            duration_ms: section.duration_ms(),
            seed: section.seed,
            score_id: section.score_id,
            target_practice_hits: section.target_practice_hits,
            frames: &section.frames[..shown],
        }
    }
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = load_config(&cli)?;

    match cli.command {
        Commands::Info { file, json } => {
            let record = ReplayDecoder::new(read(&file)?)
                .with_config(config)
                .parse()
                .wrap_err_with(|| format!("decoding header of {}", file.display()))?;
            let header = record.header();
            let report = HeaderReport {
                header,
                accuracy: header.accuracy(),
                mod_names: header.mod_abbreviations(),
            };
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_header(&report);
            }
            Ok(())
        }
        Commands::Frames { file, limit, json } => {
            let mut record = ReplayDecoder::new(read(&file)?)
                .with_config(config)
                .parse()
                .wrap_err_with(|| format!("decoding header of {}", file.display()))?;
            let section = record
                .parse_frames()
                .wrap_err_with(|| format!("decoding frames of {}", file.display()))?;
            print_frames(&FramesReport::new(section, limit), json)
        }
        Commands::Stream {
            file,
            mode,
            format_version,
            limit,
            json,
        } => {
            let ctx = FrameContext::new(
                GameMode::try_from(mode)?,
                FormatVersion::new(format_version),
                Mods::empty(),
            );
            let section = ReplayDecoder::new(read(&file)?)
                .with_config(config)
                .parse_frames_only(&ctx)
                .wrap_err_with(|| format!("decoding frame stream {}", file.display()))?;
            print_frames(&FramesReport::new(&section, limit), json)
        }
        Commands::Mods { bits } => {
            let names = decode_mods(bits);
            if names.is_empty() {
                println!("NM");
            } else {
                println!("{}", names.join(" "));
            }
            Ok(())
        }
    }
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(cli: &Cli) -> Result<DecodeConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .wrap_err_with(|| format!("reading config {}", path.display()))?;
            serde_json::from_str(&text)
                .wrap_err_with(|| format!("parsing config {}", path.display()))?
        }
        None => DecodeConfig::default(),
    };
    if let Some(limit) = cli.memory_limit {
        config.memory_limit = Some(limit);
    }
    if cli.allow_absent_strings {
        config.allow_absent_strings = true;
    }
    tracing::debug!(?config, "decoder config");
    Ok(config)
}

fn read(path: &Path) -> Result<Bytes> {
    read_replay_file(path).wrap_err_with(|| format!("reading {}", path.display()))
}

fn print_header(report: &HeaderReport<'_>) {
    let h = report.header;
    println!("Player:     {}", h.player_name);
    println!("Mode:       {}", h.mode);
    println!("Version:    {}", h.version);
    println!("Map hash:   {}", h.map_hash);
    println!("Replay:     {}", h.replay_hash);
    println!("Played at:  {}", h.timestamp.to_rfc3339());
    println!("Score:      {}", h.score);
    println!("Max combo:  {}{}", h.max_combo, if h.perfect { " (perfect)" } else { "" });
    println!(
        "Hits:       300 x{} | 100 x{} | 50 x{} | geki x{} | katu x{} | miss x{}",
        h.hits.n300, h.hits.n100, h.hits.n50, h.hits.ngeki, h.hits.nkatu, h.hits.nmiss
    );
    println!("Accuracy:   {:.2}%", report.accuracy);
    println!("Mods:       {} ({})", h.mods, h.mods.bits());
}

fn print_frames(report: &FramesReport<'_>, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }

    println!("Frames:     {}", report.frame_count);
    println!("Duration:   {} ms", report.duration_ms);
    if let Some(seed) = report.seed {
        println!("Seed:       {}", seed);
    }
    if let Some(id) = report.score_id {
        println!("Score id:   {}", id);
    }
    if let Some(hits) = report.target_practice_hits {
        println!("TP hits:    {}", hits);
    }
    for frame in report.frames {
        match frame {
            InputFrame::Standard(f) => {
                println!("{:>6} {:>8.2} {:>8.2} keys={}", f.delta, f.x, f.y, f.keys)
            }
            InputFrame::Taiko(f) => println!("{:>6} {:>8.2} keys={}", f.delta, f.x, f.keys),
            InputFrame::Catch(f) => {
                println!("{:>6} {:>8.2}{}", f.delta, f.x, if f.dashing { " dash" } else { "" })
            }
            InputFrame::Mania(f) => println!("{:>6} keys={:#b}", f.delta, f.keys),
        }
    }
    Ok(())
}
