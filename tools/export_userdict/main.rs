//! Export the user dictionary as Plover JSON
//!
//! Usage:
//!   cargo run -p export_userdict -- --db data/user.redb
//!   cargo run -p export_userdict -- --db data/user.redb --output user.json

use clap::Parser;
use libsteno_core::UserDictionary;
use std::collections::BTreeMap;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "export_userdict")]
#[command(about = "Export the user dictionary as Plover JSON")]
struct Args {
    /// Path to the user dictionary database
    #[arg(short, long)]
    db: PathBuf,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let userdict = UserDictionary::new(&args.db)
        .map_err(|e| anyhow::anyhow!("Failed to open user dict: {}", e))?;

    let entries: BTreeMap<String, String> = userdict.iter_all()?.into_iter().collect();
    let json = serde_json::to_string_pretty(&entries)?;

    if let Some(path) = args.output {
        std::fs::write(&path, json)?;
        eprintln!("✓ Exported {} entries to {}", entries.len(), path.display());
    } else {
        println!("{}", json);
    }

    Ok(())
}
