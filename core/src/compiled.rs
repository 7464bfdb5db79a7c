//! Compiled dictionary: an `fst` key index plus a `bincode` payload.
//!
//! Keys are canonical outline strings (`KAT/-S`) mapped to an index into the
//! payload's translation vector. The pair of files is produced by the
//! `compile_dict` tool and loads without parsing JSON.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read};
use std::path::Path;

use fst::{Map, MapBuilder};
use serde::{Deserialize, Serialize};

use crate::dictionary::{Dictionary, MemoryDictionary};
use crate::error::StenoError;
use crate::stroke::{canonical_key, Stroke};
use crate::translation::RawTranslation;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct Payload {
    max_key_length: usize,
    translations: Vec<String>,
}

/// Read-only dictionary backed by an `fst::Map`.
pub struct CompiledDictionary {
    index: Map<Vec<u8>>,
    payload: Payload,
}

impl CompiledDictionary {
    /// Build the index in memory from a loaded dictionary.
    pub fn compile(dict: &MemoryDictionary) -> Result<Self, StenoError> {
        // fst requires keys in lexicographic order.
        let entries = dict.sorted_entries();
        let mut builder = MapBuilder::memory();
        let mut translations = Vec::with_capacity(entries.len());
        for (i, (key, translation)) in entries.into_iter().enumerate() {
            builder.insert(&key, i as u64)?;
            translations.push(translation);
        }
        let index = Map::new(builder.into_inner()?)?;

        Ok(Self {
            index,
            payload: Payload {
                max_key_length: dict.max_key_length(),
                translations,
            },
        })
    }

    /// Write `dict.fst` and `dict.bincode` style artifacts.
    pub fn save<P: AsRef<Path>>(&self, fst_path: P, bincode_path: P) -> Result<(), StenoError> {
        std::fs::write(fst_path, self.index.as_fst().as_bytes())?;
        let writer = BufWriter::new(File::create(bincode_path)?);
        bincode::serialize_into(writer, &self.payload)?;
        Ok(())
    }

    /// Load artifacts written by [`CompiledDictionary::save`].
    pub fn load<P: AsRef<Path>>(fst_path: P, bincode_path: P) -> Result<Self, StenoError> {
        let mut buf = Vec::new();
        File::open(fst_path.as_ref())?.read_to_end(&mut buf)?;
        let index = Map::new(buf)?;

        let reader = BufReader::new(File::open(bincode_path.as_ref())?);
        let payload: Payload = bincode::deserialize_from(reader)?;

        if index.len() != payload.translations.len() {
            return Err(StenoError::Corrupt(format!(
                "{} keys but {} translations",
                index.len(),
                payload.translations.len()
            )));
        }
        tracing::debug!(
            "loaded compiled dictionary {} ({} entries)",
            fst_path.as_ref().display(),
            index.len()
        );
        Ok(Self { index, payload })
    }

    pub fn len(&self) -> usize {
        self.payload.translations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.payload.translations.is_empty()
    }
}

impl Dictionary for CompiledDictionary {
    fn lookup(&self, strokes: &[Stroke]) -> Option<RawTranslation> {
        let index = self.index.get(canonical_key(strokes))?;
        self.payload.translations.get(index as usize).cloned()
    }

    fn max_key_length(&self) -> usize {
        self.payload.max_key_length
    }
}
