use pressing_config::{CONFIG_BACKEND, ConfigBackend, ConfigError, PATHS};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct StorageConfig {
  /// Directorio donde se guarda un JSON por clave de borrador.
  pub drafts_dir: PathBuf,
}

impl Default for StorageConfig {
  fn default() -> Self {
    StorageConfig { drafts_dir: PATHS.cache_dir.join("drafts") }
  }
}

impl StorageConfig {
  pub fn load() -> Result<Self, ConfigError> {
    CONFIG_BACKEND.load_or_init_section("storage")
  }

  pub fn save(&self) -> Result<(), ConfigError> {
    CONFIG_BACKEND.save_section("storage", self)
  }
}
