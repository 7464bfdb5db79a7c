//! Find the outlines that write a word
//!
//! Usage:
//!   cargo run -p find_strokes -- --dict main.json --word cats
//!   cargo run -p find_strokes -- --dict main.json        (interactive)

use clap::Parser;
use libsteno_core::MemoryDictionary;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "find_strokes")]
#[command(about = "Reverse lookup: list the outlines for a translation")]
struct Args {
    /// Plover JSON dictionary
    #[arg(short, long)]
    dict: PathBuf,

    /// Translation to look up; reads lines from stdin when omitted
    #[arg(short, long)]
    word: Option<String>,

    /// Show at most this many outlines
    #[arg(short, long, default_value_t = 10)]
    limit: usize,
}

fn print_outlines(dict: &MemoryDictionary, word: &str, limit: usize) {
    let found = dict.reverse_lookup(word);
    if found.is_empty() {
        println!("  → (no outlines for {:?})", word);
        return;
    }
    for outline in found.iter().take(limit) {
        println!("  {}", outline);
    }
    if found.len() > limit {
        println!("  ... and {} more", found.len() - limit);
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let dict = MemoryDictionary::load_json(&args.dict)
        .map_err(|e| anyhow::anyhow!("Failed to load {}: {}", args.dict.display(), e))?;

    if let Some(word) = &args.word {
        print_outlines(&dict, word, args.limit);
        return Ok(());
    }

    println!("Loaded {} entries. Type a word and press Enter.", dict.len());
    let stdin = io::stdin();
    loop {
        print!("> ");
        io::stdout().flush()?;
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let word = line.trim();
        if word.is_empty() {
            continue;
        }
        print_outlines(&dict, word, args.limit);
    }
    Ok(())
}
