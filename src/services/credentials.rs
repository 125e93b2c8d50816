use std::path::PathBuf;

use crate::config::Config;
use crate::error::Result;

/// Where the generation API key lives.
///
/// The quote client only ever calls `load_credential`; saving and deleting
/// are for the `key` commands.
pub trait CredentialStore: Send + Sync {
    fn load_credential(&self) -> Result<Option<String>>;
    fn save_credential(&self, value: &str) -> Result<()>;
    fn delete_credential(&self) -> Result<()>;

    fn has_credential(&self) -> bool {
        matches!(self.load_credential(), Ok(Some(key)) if !key.trim().is_empty())
    }
}

/// Keeps the API key in the `api_key` field of the config file.
pub struct ConfigCredentialStore {
    path: PathBuf,
}

impl ConfigCredentialStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl CredentialStore for ConfigCredentialStore {
    fn load_credential(&self) -> Result<Option<String>> {
        Ok(Config::read_from(&self.path)?.and_then(|config| config.api_key))
    }

    fn save_credential(&self, value: &str) -> Result<()> {
        let mut config = Config::load_from(&self.path)?;
        config.api_key = Some(value.trim().to_string());
        config.save_to(&self.path)
    }

    fn delete_credential(&self) -> Result<()> {
        let Some(mut config) = Config::read_from(&self.path)? else {
            return Ok(());
        };
        if config.api_key.take().is_some() {
            config.save_to(&self.path)?;
        }
        Ok(())
    }
}

#[cfg(test)]
pub struct MemoryCredentialStore {
    key: std::sync::Mutex<Option<String>>,
}

#[cfg(test)]
impl MemoryCredentialStore {
    pub fn new(key: Option<&str>) -> Self {
        Self {
            key: std::sync::Mutex::new(key.map(str::to_string)),
        }
    }
}

#[cfg(test)]
impl CredentialStore for MemoryCredentialStore {
    fn load_credential(&self) -> Result<Option<String>> {
        Ok(self.key.lock().unwrap().clone())
    }

    fn save_credential(&self, value: &str) -> Result<()> {
        *self.key.lock().unwrap() = Some(value.to_string());
        Ok(())
    }

    fn delete_credential(&self) -> Result<()> {
        *self.key.lock().unwrap() = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_store_round_trips_the_key() {
        let dir = tempfile::tempdir().unwrap();
        let store = ConfigCredentialStore::new(dir.path().join("config.toml"));

        assert_eq!(store.load_credential().unwrap(), None);
        assert!(!store.has_credential());

        store.save_credential("  sk-live \n").unwrap();
        assert_eq!(store.load_credential().unwrap().as_deref(), Some("sk-live"));
        assert!(store.has_credential());

        store.delete_credential().unwrap();
        assert_eq!(store.load_credential().unwrap(), None);
    }

    #[test]
    fn reading_a_missing_config_leaves_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let store = ConfigCredentialStore::new(path.clone());

        assert_eq!(store.load_credential().unwrap(), None);
        assert!(!store.has_credential());
        store.delete_credential().unwrap();

        assert!(!path.exists());
    }

    #[test]
    fn saving_the_key_keeps_other_settings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "mode = \"premium\"\nuser_prompt = \"be brief\"\n").unwrap();

        ConfigCredentialStore::new(path.clone())
            .save_credential("sk-live")
            .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.api_key.as_deref(), Some("sk-live"));
        assert_eq!(config.user_prompt, "be brief");
    }

    #[test]
    fn blank_key_does_not_count() {
        let store = MemoryCredentialStore::new(Some("   "));
        assert!(!store.has_credential());
    }
}
