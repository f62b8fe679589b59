use std::time::Duration;

use pressing_config::{CONFIG_BACKEND, ConfigBackend, ConfigError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct RemoteConfig {
  /// Raíz del API, sin `/` final (p. ej. `https://api.example.com/v1`).
  pub base_url: String,

  /// Límite de las llamadas de registros; la subida por lotes la acota el orquestador.
  pub request_timeout_secs: u64,

  /// Vigencia de la lista de artistas memorizada por usuario.
  pub artist_cache_ttl_secs: u64,
}

impl Default for RemoteConfig {
  fn default() -> Self {
    RemoteConfig {
      base_url: "http://localhost:8080/api".to_string(),
      request_timeout_secs: 30,
      artist_cache_ttl_secs: 300,
    }
  }
}

impl RemoteConfig {
  pub fn load() -> Result<Self, ConfigError> {
    CONFIG_BACKEND.load_or_init_section("remote")
  }

  pub fn save(&self) -> Result<(), ConfigError> {
    CONFIG_BACKEND.save_section("remote", self)
  }

  pub fn request_timeout(&self) -> Duration {
    Duration::from_secs(self.request_timeout_secs)
  }

  pub fn artist_cache_ttl(&self) -> Duration {
    Duration::from_secs(self.artist_cache_ttl_secs)
  }

  pub fn endpoint(&self, path: &str) -> String {
    format!("{}/{}", self.base_url.trim_end_matches('/'), path.trim_start_matches('/'))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn endpoint_joins_with_single_slash() {
    let cfg = RemoteConfig { base_url: "https://api.test/v1/".into(), ..Default::default() };
    assert_eq!(cfg.endpoint("/releases"), "https://api.test/v1/releases");
    assert_eq!(cfg.endpoint("artists"), "https://api.test/v1/artists");
  }
}
