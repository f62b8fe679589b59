use pressing_config::{CONFIG_BACKEND, ConfigBackend, ConfigError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct MediaConfig {
  /// Decodificar imágenes y audio en el pool bloqueante de tokio.
  #[serde(default = "default_blocking_pool")]
  pub decode_on_blocking_pool: bool,
}

fn default_blocking_pool() -> bool {
  true
}

impl Default for MediaConfig {
  fn default() -> Self {
    MediaConfig { decode_on_blocking_pool: default_blocking_pool() }
  }
}

impl MediaConfig {
  pub fn load() -> Result<Self, ConfigError> {
    CONFIG_BACKEND.load_or_init_section("media")
  }

  pub fn save(&self) -> Result<(), ConfigError> {
    CONFIG_BACKEND.save_section("media", self)
  }
}
