use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Front-end configuration that extends the base `Config` from core.
///
/// This configuration includes:
/// - All engine options from `libsteno_core::Config` (flattened via serde)
/// - Dictionary paths, highest priority first
/// - An optional redb user dictionary and word list
/// - The text decoder's undo token
///
/// # Example
///
/// ```rust
/// use stenotype::StenotypeConfig;
///
/// let config = StenotypeConfig::from_toml_str("window_ceiling = 8\nundo_token = \"**\"\n").unwrap();
/// assert_eq!(config.base().window_ceiling, 8);
/// assert_eq!(config.undo_token, "**");
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct StenotypeConfig {
    /// Engine options (window, orthography, cache, ...)
    #[serde(flatten)]
    pub base: libsteno_core::Config,

    /// Plover JSON or compiled `.fst` dictionaries, highest priority first.
    /// A compiled dictionary's payload is the sibling `.bincode` file.
    pub dictionaries: Vec<PathBuf>,

    /// redb user dictionary stacked above `dictionaries`
    pub user_dictionary: Option<PathBuf>,

    /// One word per line; suppresses orthography for known words
    pub word_list: Option<PathBuf>,

    /// Input token that undoes the last stroke
    pub undo_token: String,

    /// Print each edit as it is applied
    pub show_edits: bool,
}

impl Default for StenotypeConfig {
    fn default() -> Self {
        Self {
            base: libsteno_core::Config::default(),
            dictionaries: vec![],
            user_dictionary: None,
            word_list: None,
            undo_token: "*".to_string(),
            show_edits: false,
        }
    }
}

impl StenotypeConfig {
    /// Convert this config into the base config for use with `Engine::with_config()`
    pub fn into_base(self) -> libsteno_core::Config {
        self.base
    }

    /// Get a reference to the base config
    pub fn base(&self) -> &libsteno_core::Config {
        &self.base
    }

    /// Get a mutable reference to the base config
    pub fn base_mut(&mut self) -> &mut libsteno_core::Config {
        &mut self.base
    }

    pub fn load_toml<P: AsRef<Path>>(path: P) -> libsteno_core::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = StenotypeConfig::default();
        assert_eq!(config.undo_token, "*");
        assert!(config.dictionaries.is_empty());
        assert_eq!(config.base(), &libsteno_core::Config::default());
    }

    #[test]
    fn flattened_fields_parse() {
        let text = r#"
            dictionaries = ["main.json", "compiled/dict.fst"]
            user_dictionary = "user.redb"
            orthography = "extended"
            numbers = false
        "#;
        let config = StenotypeConfig::from_toml_str(text).unwrap();
        assert_eq!(config.dictionaries.len(), 2);
        assert_eq!(config.user_dictionary, Some(PathBuf::from("user.redb")));
        assert_eq!(config.base.orthography, libsteno_core::OrthographyPolicy::Extended);
        assert!(!config.base.numbers);
        assert!(config.base.fold_suffix_keys);
    }

    #[test]
    fn serialized_config_reloads() {
        let mut config = StenotypeConfig::default();
        config.base_mut().window_floor = 3;
        config.word_list = Some(PathBuf::from("words.txt"));
        let text = config.to_toml_string().unwrap();
        assert_eq!(StenotypeConfig::from_toml_str(&text).unwrap(), config);

        let base = config.into_base();
        assert_eq!(base.window_floor, 3);
        assert_eq!(base.window_bounds(), (3, 32));
    }
}
