//! Translate stenotype strokes from the command line.
//!
//! Usage:
//!   cargo run -p stenotype -- --strokes "KPA KAT/-S TP-PL"
//!   echo "TEFT -G * -S" | cargo run -p stenotype -- --dict main.json --show-edits
//!   cargo run -p stenotype -- --config steno.toml < strokes.txt

use std::io::{self, BufRead};
use std::path::PathBuf;
use std::thread;

use anyhow::Context;
use clap::Parser;
use libsteno_core::{spawn_translator, TextBuffer};
use stenotype::{build_engine, LineDecoder, StenotypeConfig};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "stenotype")]
#[command(about = "Translate stenotype strokes into text")]
struct Args {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Dictionary (JSON or compiled .fst); repeat for more, highest priority first
    #[arg(short, long)]
    dict: Vec<PathBuf>,

    /// redb user dictionary stacked above the others
    #[arg(long)]
    user_dict: Option<PathBuf>,

    /// Strokes to translate instead of reading stdin
    #[arg(short, long)]
    strokes: Option<String>,

    /// Print every edit as JSON
    #[arg(long)]
    show_edits: bool,

    /// Debug logging (overridden by RUST_LOG)
    #[arg(short, long)]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .with_target(false)
        .compact()
        .init();
}

fn load_config(args: &Args) -> anyhow::Result<StenotypeConfig> {
    let mut config = match &args.config {
        Some(path) => StenotypeConfig::load_toml(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => StenotypeConfig::default(),
    };
    if !args.dict.is_empty() {
        config.dictionaries = args.dict.clone();
    }
    if args.user_dict.is_some() {
        config.user_dictionary = args.user_dict.clone();
    }
    config.show_edits |= args.show_edits;
    Ok(config)
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let config = load_config(&args)?;
    let engine = build_engine(&config).context("failed to build engine")?;
    let handle = spawn_translator(engine, config.base().channel_capacity).context("failed to start translator")?;

    let decoder = LineDecoder::new(config.undo_token.clone());
    let events = handle.events.clone();
    let inline = args.strokes.clone();
    let producer = thread::Builder::new()
        .name("steno-input".to_string())
        .spawn(move || -> io::Result<()> {
            let send_line = |line: &str| {
                decoder
                    .decode_line(line)
                    .into_iter()
                    .all(|event| events.send(event).is_ok())
            };
            match inline {
                Some(strokes) => {
                    send_line(&strokes);
                }
                None => {
                    for line in io::stdin().lock().lines() {
                        if !send_line(&line?) {
                            break;
                        }
                    }
                }
            }
            Ok(())
        })
        .context("failed to start input thread")?;

    let mut buffer = TextBuffer::new();
    let show_edits = config.show_edits;
    let engine = handle.finish_with(|edit| {
        if show_edits {
            match serde_json::to_string(&edit) {
                Ok(json) => println!("{}", json),
                Err(e) => tracing::warn!("cannot print edit: {}", e),
            }
        }
        buffer.apply(&edit);
    })?;

    match producer.join() {
        Ok(result) => result.context("failed to read strokes")?,
        Err(_) => anyhow::bail!("input thread panicked"),
    }

    let (hits, misses) = engine.cache_stats();
    tracing::debug!(
        "translation cache: {} hits, {} misses ({:.0}%)",
        hits,
        misses,
        engine.cache_hit_rate() * 100.0
    );
    println!("{}", buffer.text());
    Ok(())
}
