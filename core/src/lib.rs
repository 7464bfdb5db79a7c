//! libsteno-core
//!
//! Stroke-to-text translation for stenotype input: stroke notation,
//! dictionary stores, translation directives, orthography and the windowed
//! translation engine that turns a stream of strokes into minimal edits.
//!
//! Dictionaries load from Plover JSON, compile to FST + bincode, and user
//! entries persist in redb.
//!
//! Public API:
//! - `Stroke` / `StrokeSequence` - Key chords and dictionary outlines
//! - `Dictionary` - Store trait, with memory, compiled, user and layered stores
//! - `Translation` - Parsed dictionary value with formatting directives
//! - `OrthographyRules` - Suffix spelling rules (`try` + `{^s}` → `tries`)
//! - `Engine` - Event in, `OutputEdit` out
//! - `Config` - Configuration and feature flags
use serde::{Deserialize, Serialize};

pub mod error;
pub use error::{Result, StenoError, StrokeParseError};

pub mod stroke;
pub use stroke::{canonical_key, Stroke, StrokeSequence};

pub mod translation;
pub use translation::{Command, Directive, Punctuation, RawTranslation, Segment, Translation};

pub mod orthography;
pub use orthography::{OrthographyPolicy, OrthographyRule, OrthographyRules, Rewrite, WordList};

pub mod dictionary;
pub use dictionary::{Dictionary, LayeredDictionary, MemoryDictionary};

pub mod compiled;
pub use compiled::CompiledDictionary;

pub mod userdict;
pub use userdict::UserDictionary;

pub mod numbers;

// Engine modules
pub mod grouping;
pub use grouping::{group_strokes, GroupingOptions, Resolved};

pub mod render;
pub use render::{Case, FormatState, Group, RenderContext, Rendering};

pub mod state;
pub use state::{ConfirmedText, EngineState};

pub mod output;
pub use output::{OutputEdit, TextBuffer};

pub mod engine;
pub use engine::{Engine, Event};

pub mod pipeline;
pub use pipeline::{spawn_translator, TranslatorHandle};

/// Engine configuration.
///
/// Front ends embed this with `#[serde(flatten)]` and add their own
/// dictionary paths and I/O options.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    // Window Settings
    /// Smallest live window, whatever the store's longest key
    pub window_floor: usize,
    /// Largest live window; bounds the cost of regrouping
    pub window_ceiling: usize,

    // Grouping
    /// Retry misses with `-G -S -D -Z` folded off the last stroke
    pub fold_suffix_keys: bool,
    /// Render unmatched number-bar strokes as digits
    pub numbers: bool,

    // Orthography
    /// Built-in rule table
    pub orthography: OrthographyPolicy,
    /// Extra rules (`"stem+suffix=replacement"`) tried before the table
    pub orthography_rules: Vec<String>,

    /// Chars of confirmed text kept as orthography and case context
    pub confirmed_tail_chars: usize,

    // Cache Management
    /// Maximum number of entries in the outline -> translation cache
    pub max_cache_size: usize,

    /// Capacity of each pipeline channel
    pub channel_capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            window_floor: 1,
            window_ceiling: 32,
            fold_suffix_keys: true,
            numbers: true,
            orthography: OrthographyPolicy::Minimal,
            orthography_rules: vec![],
            confirmed_tail_chars: 256,
            max_cache_size: 1024,
            channel_capacity: 64,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load_toml<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a TOML file.
    pub fn save_toml<P: AsRef<std::path::Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Load configuration from TOML string.
    pub fn from_toml_str(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Serialize configuration to TOML string.
    pub fn to_toml_string(&self) -> std::result::Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    // ========== Derived Settings ==========

    /// `(floor, ceiling)` with `1 <= floor <= ceiling`.
    pub fn window_bounds(&self) -> (usize, usize) {
        let floor = self.window_floor.max(1);
        (floor, self.window_ceiling.max(floor))
    }

    /// The configured orthography table with the extra rules in front.
    pub fn orthography_rules(&self) -> OrthographyRules {
        OrthographyRules::from_policy(self.orthography).with_rules(&self.orthography_rules)
    }
}

/// Utility helpers.
pub mod utils {
    use unicode_normalization::UnicodeNormalization;

    /// Compose to NFC without trimming.
    pub fn nfc(s: &str) -> String {
        s.nfc().collect()
    }

    /// Normalize input strings (NFC) and trim whitespace.
    pub fn normalize(s: &str) -> String {
        nfc(s).trim().to_string()
    }
}
