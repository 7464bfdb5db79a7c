//! Compile a Plover JSON dictionary into FST + bincode artifacts
//!
//! Several inputs are merged in order; a later file overrides earlier ones
//! for the same outline.
//!
//! Usage:
//!   cargo run -p compile_dict -- --input main.json --out-dir data
//!   cargo run -p compile_dict -- --input main.json --input fixes.json --out-dir data --name steno

use clap::Parser;
use libsteno_core::{CompiledDictionary, Dictionary, MemoryDictionary};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "compile_dict")]
#[command(about = "Compile Plover JSON dictionaries into dict.fst + dict.bincode")]
struct Args {
    /// Plover JSON dictionary; repeat to merge several
    #[arg(short, long, required = true)]
    input: Vec<PathBuf>,

    /// Output directory
    #[arg(short, long, default_value = "data")]
    out_dir: PathBuf,

    /// Base name of the output files
    #[arg(short, long, default_value = "dict")]
    name: String,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut merged = MemoryDictionary::new();
    for path in &args.input {
        let dict = MemoryDictionary::load_json(path)
            .map_err(|e| anyhow::anyhow!("Failed to load {}: {}", path.display(), e))?;
        println!("Loaded {} entries from {}", dict.len(), path.display());
        for (outline, translation) in dict.iter() {
            merged.insert(outline.clone(), translation);
        }
    }

    let compiled = CompiledDictionary::compile(&merged)?;

    std::fs::create_dir_all(&args.out_dir)?;
    let fst_path = args.out_dir.join(format!("{}.fst", args.name));
    let bincode_path = args.out_dir.join(format!("{}.bincode", args.name));
    compiled.save(&fst_path, &bincode_path)?;

    println!(
        "✓ Wrote {} entries (longest outline {} strokes) to {} and {}",
        compiled.len(),
        compiled.max_key_length(),
        fst_path.display(),
        bincode_path.display()
    );
    Ok(())
}
