//! stenotype crate root
//!
//! This crate provides the command-line front end for `libsteno-core`: a
//! TOML configuration that extends the core `Config`, a line-oriented stroke
//! decoder, and helpers that assemble a layered dictionary and engine from
//! that configuration.
//!
//! Public API exported here:
//! - `StenotypeConfig` from `config`
//! - `LineDecoder` from `decoder`
//! - `build_dictionary`, `build_engine`, `load_store`

pub mod config;
pub mod decoder;

use std::path::Path;

use libsteno_core::{
    CompiledDictionary, Dictionary, Engine, LayeredDictionary, MemoryDictionary, StenoError, UserDictionary,
    WordList,
};
use tracing::{debug, info};

pub use config::StenotypeConfig;
pub use decoder::{LineDecoder, RESET_TOKEN};

/// Open one dictionary file: Plover `.json`, or a compiled `.fst` with its
/// `.bincode` payload next to it.
pub fn load_store(path: &Path) -> Result<Box<dyn Dictionary + Send>, StenoError> {
    let is_compiled = path.extension().is_some_and(|ext| ext == "fst");
    if is_compiled {
        let payload = path.with_extension("bincode");
        let dict = CompiledDictionary::load(path, payload.as_path())?;
        debug!("loaded compiled dictionary {} ({} entries)", path.display(), dict.len());
        Ok(Box::new(dict))
    } else {
        let dict = MemoryDictionary::load_json(path)?;
        debug!("loaded JSON dictionary {} ({} entries)", path.display(), dict.len());
        Ok(Box::new(dict))
    }
}

/// Stack the configured stores: user dictionary first, then `dictionaries`
/// in order. With no dictionaries configured the demo dictionary is used.
pub fn build_dictionary(config: &StenotypeConfig) -> Result<LayeredDictionary, StenoError> {
    let mut stack = LayeredDictionary::new();
    for path in &config.dictionaries {
        stack.push_back(load_store(path)?);
    }
    if stack.is_empty() {
        info!("no dictionaries configured; using the demo dictionary");
        stack.push_back(MemoryDictionary::load_demo());
    }
    if let Some(path) = &config.user_dictionary {
        let user = UserDictionary::new(path)?;
        debug!("user dictionary {} stacked on top", path.display());
        stack.push_front(user);
    }
    Ok(stack)
}

/// Build an engine from the configuration, including the word list.
pub fn build_engine(config: &StenotypeConfig) -> Result<Engine<LayeredDictionary>, StenoError> {
    let dictionary = build_dictionary(config)?;
    let mut rules = config.base().orthography_rules();
    if let Some(path) = &config.word_list {
        let words = WordList::load(path)?;
        debug!("loaded {} words from {}", words.len(), path.display());
        rules = rules.with_word_list(words);
    }
    let engine = Engine::with_config(dictionary, config.base().clone()).with_orthography(rules);
    info!(
        "engine ready: {} dictionary layers, window {}",
        engine.store().len(),
        engine.window_capacity()
    );
    Ok(engine)
}
