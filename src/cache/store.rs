use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::models::Artifact;

const CACHE_FILE: &str = "quote_cache.json";

/// Single-record store for the most recent quote.
///
/// Every save replaces the whole file through a temp file in the same
/// directory, so a reader sees either the old record or the new one.
pub struct CacheStore {
    path: PathBuf,
}

impl CacheStore {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(CACHE_FILE),
        }
    }

    #[cfg(test)]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the stored quote. Missing or unreadable files count as empty.
    pub fn load(&self) -> Option<Artifact> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return None,
            Err(e) => {
                tracing::debug!("Failed to read quote cache: {}", e);
                return None;
            }
        };

        match serde_json::from_str(&content) {
            Ok(artifact) => Some(artifact),
            Err(e) => {
                tracing::debug!("Ignoring unreadable quote cache: {}", e);
                None
            }
        }
    }

    pub fn save(&self, artifact: &Artifact) -> io::Result<()> {
        let dir = self.path.parent().unwrap_or_else(|| Path::new("."));
        std::fs::create_dir_all(dir)?;

        let content = serde_json::to_vec_pretty(artifact)?;

        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(&content)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }

    pub fn clear(&self) -> io::Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Mode;
    use chrono::{DateTime, Utc};

    fn artifact(quote: &str, created_secs: i64) -> Artifact {
        Artifact {
            day_key: "2026-01-04".to_string(),
            mode: Mode::Economy,
            quote: quote.to_string(),
            context: format!("context for {}", quote),
            created_at: DateTime::<Utc>::from_timestamp(created_secs, 123_456_789).unwrap(),
        }
    }

    #[test]
    fn empty_store_loads_nothing() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(CacheStore::new(dir.path()).load(), None);
    }

    #[test]
    fn save_then_load_round_trips_exactly() {
        let dir = tempfile::tempdir().unwrap();
        let store = CacheStore::new(dir.path());
        let saved = artifact("q", 1_700_000_000);

        store.save(&saved).unwrap();

        assert_eq!(store.load(), Some(saved));
    }

    #[test]
    fn last_write_wins() {
        let dir = tempfile::tempdir().unwrap();
        let store = CacheStore::new(dir.path());

        store.save(&artifact("q1", 1)).unwrap();
        store.save(&artifact("q2", 2)).unwrap();

        assert_eq!(store.load(), Some(artifact("q2", 2)));
    }

    #[test]
    fn survives_a_new_store_instance() {
        let dir = tempfile::tempdir().unwrap();
        CacheStore::new(dir.path()).save(&artifact("q", 5)).unwrap();

        assert_eq!(CacheStore::new(dir.path()).load(), Some(artifact("q", 5)));
    }

    #[test]
    fn creates_missing_directory_on_save() {
        let dir = tempfile::tempdir().unwrap();
        let store = CacheStore::new(dir.path().join("a").join("b"));

        store.save(&artifact("q", 1)).unwrap();

        assert!(store.path().exists());
    }

    #[test]
    fn corrupt_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = CacheStore::new(dir.path());
        std::fs::write(store.path(), "{ \"dayKey\": ").unwrap();

        assert_eq!(store.load(), None);
    }

    #[test]
    fn unknown_mode_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = CacheStore::new(dir.path());
        std::fs::write(
            store.path(),
            r#"{"dayKey":"2026-01-04","mode":"deluxe","quote":"q","context":"c","createdAt":"2026-01-04T00:00:00Z"}"#,
        )
        .unwrap();

        assert_eq!(store.load(), None);
    }

    #[test]
    fn file_uses_camel_case_keys() {
        let dir = tempfile::tempdir().unwrap();
        let store = CacheStore::new(dir.path());
        store.save(&artifact("q", 1)).unwrap();

        let raw = std::fs::read_to_string(store.path()).unwrap();
        assert!(raw.contains("\"dayKey\": \"2026-01-04\""));
        assert!(raw.contains("\"mode\": \"economy\""));
        assert!(raw.contains("\"createdAt\""));
    }

    #[test]
    fn clear_removes_and_tolerates_absence() {
        let dir = tempfile::tempdir().unwrap();
        let store = CacheStore::new(dir.path());

        store.clear().unwrap();

        store.save(&artifact("q", 1)).unwrap();
        store.clear().unwrap();
        assert_eq!(store.load(), None);
        assert!(!store.path().exists());
    }
}
