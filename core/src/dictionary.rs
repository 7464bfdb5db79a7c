//! Dictionary stores.
//!
//! The engine only needs exact-match lookup of a stroke slice and the length
//! of the longest key, expressed by the [`Dictionary`] trait. This module
//! provides the in-memory store loaded from Plover-style JSON and a layered
//! stack that combines several stores by priority. The compiled `fst` store
//! lives in `compiled.rs` and the persistent user store in `userdict.rs`.
//!
//! JSON format: a single object mapping slash-joined outlines to raw
//! translations, e.g. `{"KAT": "cat", "KAT/-S": "cats", "-S": "{^s}"}`.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use ahash::AHashMap;

use crate::error::StenoError;
use crate::stroke::{Stroke, StrokeSequence};
use crate::translation::RawTranslation;
use crate::utils::nfc;

/// Exact-match lookup from a stroke sequence to a raw translation.
pub trait Dictionary {
    /// Look up the translation for exactly this sequence of strokes.
    fn lookup(&self, strokes: &[Stroke]) -> Option<RawTranslation>;

    /// Number of strokes in the longest key; zero for an empty store.
    fn max_key_length(&self) -> usize;
}

impl<D: Dictionary + ?Sized> Dictionary for &D {
    fn lookup(&self, strokes: &[Stroke]) -> Option<RawTranslation> {
        (**self).lookup(strokes)
    }

    fn max_key_length(&self) -> usize {
        (**self).max_key_length()
    }
}

impl<D: Dictionary + ?Sized> Dictionary for Box<D> {
    fn lookup(&self, strokes: &[Stroke]) -> Option<RawTranslation> {
        (**self).lookup(strokes)
    }

    fn max_key_length(&self) -> usize {
        (**self).max_key_length()
    }
}

impl<D: Dictionary + ?Sized> Dictionary for Arc<D> {
    fn lookup(&self, strokes: &[Stroke]) -> Option<RawTranslation> {
        (**self).lookup(strokes)
    }

    fn max_key_length(&self) -> usize {
        (**self).max_key_length()
    }
}

/// In-memory dictionary keyed by stroke sequence.
#[derive(Debug, Clone, Default)]
pub struct MemoryDictionary {
    map: AHashMap<StrokeSequence, RawTranslation>,
    max_key_length: usize,
}

impl MemoryDictionary {
    /// Create an empty dictionary.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an entry. The translation is NFC-normalized.
    pub fn insert(&mut self, outline: StrokeSequence, translation: &str) -> Option<RawTranslation> {
        self.max_key_length = self.max_key_length.max(outline.len());
        self.map.insert(outline, nfc(translation))
    }

    /// Insert an entry given in Plover notation.
    pub fn insert_str(&mut self, outline: &str, translation: &str) -> Result<(), StenoError> {
        let outline: StrokeSequence = outline.parse()?;
        self.insert(outline, translation);
        Ok(())
    }

    /// Remove an entry, returning its translation.
    pub fn remove(&mut self, outline: &[Stroke]) -> Option<RawTranslation> {
        let removed = self.map.remove(outline)?;
        if outline.len() == self.max_key_length {
            self.max_key_length = self.map.keys().map(|k| k.len()).max().unwrap_or(0);
        }
        Some(removed)
    }

    pub fn get(&self, outline: &[Stroke]) -> Option<&str> {
        self.map.get(outline).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Iterate over all entries in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&StrokeSequence, &str)> {
        self.map.iter().map(|(k, v)| (k, v.as_str()))
    }

    /// Entries sorted by canonical key, as written to JSON.
    pub fn sorted_entries(&self) -> BTreeMap<String, String> {
        self.map
            .iter()
            .map(|(k, v)| (k.canonical(), v.clone()))
            .collect()
    }

    /// Parse a Plover JSON dictionary.
    ///
    /// Outlines that fail to parse are skipped with a warning.
    pub fn from_json_str(json: &str) -> Result<Self, StenoError> {
        let raw: BTreeMap<String, String> = serde_json::from_str(json)?;
        let mut dict = Self::new();
        let mut skipped = 0usize;

        for (key, value) in raw {
            let outline: StrokeSequence = match key.parse() {
                Ok(outline) => outline,
                Err(e) => {
                    tracing::warn!("skipping dictionary entry: {}", e);
                    skipped += 1;
                    continue;
                }
            };
            if let Some(previous) = dict.insert(outline, &value) {
                tracing::debug!("{:?} replaces {:?} for outline {:?}", value, previous, key);
            }
        }

        tracing::debug!(
            "loaded {} dictionary entries ({} skipped)",
            dict.len(),
            skipped
        );
        Ok(dict)
    }

    /// Load a Plover JSON dictionary from disk.
    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Self, StenoError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Serialize to pretty Plover JSON with sorted keys.
    pub fn to_json_string(&self) -> Result<String, StenoError> {
        Ok(serde_json::to_string_pretty(&self.sorted_entries())?)
    }

    /// Write the dictionary as Plover JSON.
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<(), StenoError> {
        std::fs::write(path, self.to_json_string()?)?;
        Ok(())
    }

    /// All outlines whose translation is exactly `text`, shortest first.
    pub fn reverse_lookup(&self, text: &str) -> Vec<StrokeSequence> {
        let text = nfc(text);
        let mut found: Vec<(String, &StrokeSequence)> = self
            .map
            .iter()
            .filter(|(_, v)| **v == text)
            .map(|(k, _)| (k.canonical(), k))
            .collect();
        found.sort_by(|(a_key, a), (b_key, b)| {
            a.len()
                .cmp(&b.len())
                .then(a_key.len().cmp(&b_key.len()))
                .then(a_key.cmp(b_key))
        });
        found.into_iter().map(|(_, k)| k.clone()).collect()
    }

    /// Small demo dictionary for smoke-testing.
    pub fn load_demo() -> Self {
        let mut dict = Self::new();
        let entries = [
            ("TEFT", "test"),
            ("KAT", "cat"),
            ("KAT/-S", "cats"),
            ("-S", "{^s}"),
            ("-G", "{^ing}"),
            ("TP-PL", "{.}"),
            ("KW-BG", "{,}"),
            ("KPA", "{-|}"),
            ("TRAOEU", "try"),
            ("PHAEUBG", "make"),
        ];
        for (outline, translation) in entries {
            if let Err(e) = dict.insert_str(outline, translation) {
                tracing::warn!("demo entry {:?}: {}", outline, e);
            }
        }
        dict
    }
}

impl Dictionary for MemoryDictionary {
    fn lookup(&self, strokes: &[Stroke]) -> Option<RawTranslation> {
        self.map.get(strokes).cloned()
    }

    fn max_key_length(&self) -> usize {
        self.max_key_length
    }
}

/// A stack of stores searched in priority order.
#[derive(Default)]
pub struct LayeredDictionary {
    layers: Vec<Box<dyn Dictionary + Send>>,
}

impl LayeredDictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a store below the existing ones.
    pub fn with_layer<D: Dictionary + Send + 'static>(mut self, layer: D) -> Self {
        self.push_back(layer);
        self
    }

    /// Add a store with the lowest priority.
    pub fn push_back<D: Dictionary + Send + 'static>(&mut self, layer: D) {
        self.layers.push(Box::new(layer));
    }

    /// Add a store with the highest priority.
    pub fn push_front<D: Dictionary + Send + 'static>(&mut self, layer: D) {
        self.layers.insert(0, Box::new(layer));
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

impl Dictionary for LayeredDictionary {
    fn lookup(&self, strokes: &[Stroke]) -> Option<RawTranslation> {
        self.layers.iter().find_map(|layer| layer.lookup(strokes))
    }

    fn max_key_length(&self) -> usize {
        self.layers
            .iter()
            .map(|layer| layer.max_key_length())
            .max()
            .unwrap_or(0)
    }
}
