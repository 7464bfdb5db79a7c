//! Import Plover JSON entries into the user dictionary
//!
//! Usage:
//!   cargo run -p import_entries -- --db data/user.redb --input additions.json
//!   cargo run -p import_entries -- --db data/user.redb --input additions.json --dry-run

use clap::Parser;
use libsteno_core::{StrokeSequence, UserDictionary};
use std::collections::BTreeMap;
use std::path::PathBuf;

#[derive(clap::Parser, Debug)]
#[command(name = "import_entries")]
#[command(about = "Import Plover JSON entries into the user dictionary")]
struct Args {
    /// Path to the user dictionary database
    #[arg(short, long)]
    db: PathBuf,

    /// Plover JSON file ({"OUTLINE": "translation", ...})
    #[arg(short, long)]
    input: PathBuf,

    /// Show what would be imported without writing
    #[arg(long)]
    dry_run: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let content = std::fs::read_to_string(&args.input)
        .map_err(|e| anyhow::anyhow!("Failed to read input file: {}", e))?;
    let raw: BTreeMap<String, String> =
        serde_json::from_str(&content).map_err(|e| anyhow::anyhow!("Failed to parse JSON: {}", e))?;

    let mut entries = Vec::with_capacity(raw.len());
    for (key, translation) in raw {
        match key.parse::<StrokeSequence>() {
            Ok(outline) => entries.push((outline, translation)),
            Err(e) => eprintln!("⚠ Skipping {:?}: {}", key, e),
        }
    }
    println!("Parsed {} entries from {}", entries.len(), args.input.display());

    if args.dry_run {
        println!("\n[DRY RUN] Would import:");
        for (outline, translation) in entries.iter().take(10) {
            println!("  {} → {}", outline, translation);
        }
        if entries.len() > 10 {
            println!("  ... and {} more", entries.len() - 10);
        }
        return Ok(());
    }

    let userdict = UserDictionary::new(&args.db)
        .map_err(|e| anyhow::anyhow!("Failed to open user dict: {}", e))?;
    for (outline, translation) in &entries {
        userdict
            .add(outline, translation)
            .map_err(|e| anyhow::anyhow!("Failed to import '{}': {}", outline, e))?;
    }

    println!("✓ Import complete! {} entries in {}", userdict.len()?, args.db.display());
    Ok(())
}
