//! Active-user identity management
//!
//! Scrawl commands act on behalf of one user at a time. The active
//! user's id is persisted as a small file under the data directory and
//! resolved once per invocation; owner-scoped operations and the
//! "my posts" filter both read it from here.

use anyhow::{Context, Result};
use std::path::PathBuf;
use uuid::Uuid;

use crate::config::Config;

/// Identity manager for Scrawl
///
/// Resolves and switches the active user.
pub struct Identity {
    config: Config,
}

impl Identity {
    /// Create a new identity manager with default configuration
    pub fn new() -> Result<Self> {
        let config = Config::load().context("Failed to load configuration")?;
        Ok(Self::with_config(config))
    }

    /// Create a new identity manager with specific configuration
    pub fn with_config(config: Config) -> Self {
        Self { config }
    }

    /// Whether an active user has been selected
    pub fn is_initialized(&self) -> bool {
        self.config.active_user_path().exists()
    }

    /// Get the active user's id, if one is selected
    ///
    /// A file holding something other than a UUID is reported as an
    /// error rather than silently treated as "no user".
    pub fn current_user(&self) -> Result<Option<Uuid>> {
        let path = self.config.active_user_path();
        if !path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read active-user file: {:?}", path))?;
        let id = Uuid::parse_str(content.trim())
            .with_context(|| format!("Active-user file is corrupt: {:?}", path))?;
        Ok(Some(id))
    }

    /// Make `id` the active user
    pub fn set_current_user(&self, id: Uuid) -> Result<()> {
        let path = self.config.active_user_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create data directory: {:?}", parent))?;
        }
        std::fs::write(&path, id.to_string())
            .with_context(|| format!("Failed to write active-user file: {:?}", path))?;
        Ok(())
    }

    /// Clear the active user selection
    pub fn clear_current_user(&self) -> Result<()> {
        let path = self.config.active_user_path();
        if path.exists() {
            std::fs::remove_file(&path)
                .with_context(|| format!("Failed to remove active-user file: {:?}", path))?;
        }
        Ok(())
    }

    /// Get the config file path (for display purposes)
    pub fn config_path(&self) -> PathBuf {
        Config::config_file_path()
    }

    /// Get the data directory path (for display purposes)
    pub fn data_dir(&self) -> &PathBuf {
        &self.config.data_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_config(temp_dir: &TempDir) -> Config {
        Config {
            data_dir: temp_dir.path().to_path_buf(),
            ..Config::default()
        }
    }

    #[test]
    fn test_no_active_user_initially() {
        let temp_dir = TempDir::new().unwrap();
        let identity = Identity::with_config(test_config(&temp_dir));

        assert!(!identity.is_initialized());
        assert!(identity.current_user().unwrap().is_none());
    }

    #[test]
    fn test_set_and_get_current_user() {
        let temp_dir = TempDir::new().unwrap();
        let identity = Identity::with_config(test_config(&temp_dir));

        let id = Uuid::new_v4();
        identity.set_current_user(id).unwrap();

        assert!(identity.is_initialized());
        assert_eq!(identity.current_user().unwrap(), Some(id));
    }

    #[test]
    fn test_switching_users_overwrites() {
        let temp_dir = TempDir::new().unwrap();
        let identity = Identity::with_config(test_config(&temp_dir));

        let first = Uuid::new_v4();
        let second = Uuid::new_v4();
        identity.set_current_user(first).unwrap();
        identity.set_current_user(second).unwrap();

        assert_eq!(identity.current_user().unwrap(), Some(second));
    }

    #[test]
    fn test_clear_current_user() {
        let temp_dir = TempDir::new().unwrap();
        let identity = Identity::with_config(test_config(&temp_dir));

        identity.set_current_user(Uuid::new_v4()).unwrap();
        identity.clear_current_user().unwrap();

        assert!(!identity.is_initialized());
        assert!(identity.current_user().unwrap().is_none());

        // Clearing twice is fine
        identity.clear_current_user().unwrap();
    }

    #[test]
    fn test_corrupt_active_user_file_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let config = test_config(&temp_dir);
        std::fs::write(config.active_user_path(), "not-a-uuid").unwrap();

        let identity = Identity::with_config(config);
        assert!(identity.current_user().is_err());
    }

    #[test]
    fn test_active_user_persists_across_instances() {
        let temp_dir = TempDir::new().unwrap();
        let config = test_config(&temp_dir);

        let id = Uuid::new_v4();
        Identity::with_config(config.clone())
            .set_current_user(id)
            .unwrap();

        let identity = Identity::with_config(config);
        assert_eq!(identity.current_user().unwrap(), Some(id));
    }
}
