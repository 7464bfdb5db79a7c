//! Persistent user dictionary stored in `redb`.
//!
//! Entries the user adds at runtime live in a single table, `user_entries`,
//! mapping canonical outline strings (`KAT/-S`) to raw translations. The store
//! is usually stacked above the main dictionaries in a `LayeredDictionary`.
//!
//! The longest key length is recomputed when the database is opened and
//! updated on every mutation, so an engine using this store picks up a
//! longer window as soon as a longer outline is added.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use redb::{Database, ReadableTable, TableDefinition};

use crate::dictionary::Dictionary;
use crate::stroke::{canonical_key, Stroke, StrokeSequence};
use crate::translation::RawTranslation;
use crate::utils::nfc;

const TABLE_DEF: TableDefinition<&'static str, &'static str> = TableDefinition::new("user_entries");

fn stroke_count(key: &str) -> usize {
    key.split('/').count()
}

/// redb-backed dictionary of user-defined entries.
pub struct UserDictionary {
    db: Database,
    path: PathBuf,
    max_key_length: AtomicUsize,
}

impl UserDictionary {
    /// Create or open the database at `path`.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, redb::Error> {
        if let Some(parent) = path.as_ref().parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        let db = Database::create(path.as_ref())?;

        // Make sure the table exists so read transactions can open it.
        let write_txn = db.begin_write()?;
        write_txn.open_table(TABLE_DEF)?;
        write_txn.commit()?;

        let dict = UserDictionary {
            db,
            path: path.as_ref().to_path_buf(),
            max_key_length: AtomicUsize::new(0),
        };
        dict.recompute_max_key_length()?;
        tracing::debug!(
            "opened user dictionary {} (max key length {})",
            dict.path.display(),
            dict.max_key_length.load(Ordering::Relaxed)
        );
        Ok(dict)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Add or replace an entry.
    pub fn add(&self, outline: &StrokeSequence, translation: &str) -> Result<(), redb::Error> {
        let key = outline.canonical();
        let value = nfc(translation);
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(TABLE_DEF)?;
            table.insert(key.as_str(), value.as_str())?;
        }
        write_txn.commit()?;
        self.max_key_length.fetch_max(outline.len(), Ordering::Relaxed);
        Ok(())
    }

    /// Remove an entry. Returns true if it existed.
    pub fn remove(&self, outline: &StrokeSequence) -> Result<bool, redb::Error> {
        let key = outline.canonical();
        let write_txn = self.db.begin_write()?;
        let existed = {
            let mut table = write_txn.open_table(TABLE_DEF)?;
            let removed = table.remove(key.as_str())?;
            removed.is_some()
        };
        write_txn.commit()?;
        if existed && outline.len() >= self.max_key_length.load(Ordering::Relaxed) {
            self.recompute_max_key_length()?;
        }
        Ok(existed)
    }

    /// Get the raw translation for an outline.
    pub fn get(&self, outline: &[Stroke]) -> Result<Option<RawTranslation>, redb::Error> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(TABLE_DEF)?;
        let value = table.get(canonical_key(outline).as_str())?;
        Ok(value.map(|v| v.value().to_string()))
    }

    /// All entries as `(canonical outline, translation)` pairs, sorted by key.
    pub fn iter_all(&self) -> Result<Vec<(String, String)>, redb::Error> {
        let mut out = Vec::new();
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(TABLE_DEF)?;
        for item in table.iter()? {
            let (k, v) = item?;
            out.push((k.value().to_string(), v.value().to_string()));
        }
        Ok(out)
    }

    pub fn len(&self) -> Result<usize, redb::Error> {
        Ok(self.iter_all()?.len())
    }

    fn recompute_max_key_length(&self) -> Result<(), redb::Error> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(TABLE_DEF)?;
        let mut longest = 0;
        for item in table.iter()? {
            let (k, _) = item?;
            longest = longest.max(stroke_count(k.value()));
        }
        self.max_key_length.store(longest, Ordering::Relaxed);
        Ok(())
    }
}

impl Dictionary for UserDictionary {
    fn lookup(&self, strokes: &[Stroke]) -> Option<RawTranslation> {
        match self.get(strokes) {
            Ok(found) => found,
            Err(e) => {
                tracing::warn!("user dictionary lookup failed: {}", e);
                None
            }
        }
    }

    fn max_key_length(&self) -> usize {
        self.max_key_length.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_db(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("libsteno_{}_{}.redb", name, std::process::id()))
    }

    fn seq(s: &str) -> StrokeSequence {
        s.parse().unwrap()
    }

    #[test]
    fn add_get_remove() {
        let path = temp_db("userdict_basic");
        let _ = std::fs::remove_file(&path);
        let dict = UserDictionary::new(&path).unwrap();
        assert_eq!(dict.max_key_length(), 0);

        dict.add(&seq("STPH/KWRAO"), "snowy").unwrap();
        assert_eq!(dict.lookup(&seq("STPH/KWRAO")), Some("snowy".to_string()));
        assert_eq!(dict.max_key_length(), 2);
        assert_eq!(dict.len().unwrap(), 1);

        assert!(dict.remove(&seq("STPH/KWRAO")).unwrap());
        assert!(!dict.remove(&seq("STPH/KWRAO")).unwrap());
        assert_eq!(dict.lookup(&seq("STPH/KWRAO")), None);
        assert_eq!(dict.max_key_length(), 0);

        drop(dict);
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn entries_survive_reopen() {
        let path = temp_db("userdict_reopen");
        let _ = std::fs::remove_file(&path);
        {
            let dict = UserDictionary::new(&path).unwrap();
            dict.add(&seq("KAT/-S/-S"), "catses").unwrap();
            dict.add(&seq("KAT"), "Kat").unwrap();
        }
        let dict = UserDictionary::new(&path).unwrap();
        assert_eq!(dict.max_key_length(), 3);
        assert_eq!(
            dict.iter_all().unwrap(),
            vec![
                ("KAT".to_string(), "Kat".to_string()),
                ("KAT/-S/-S".to_string(), "catses".to_string())
            ]
        );
        drop(dict);
        let _ = std::fs::remove_file(path);
    }
}
