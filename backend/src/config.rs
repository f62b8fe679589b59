use std::time::Duration;

use pressing_config::{CONFIG_BACKEND, ConfigBackend, ConfigError};
use pressing_core::services::ValidationRules;
use serde::{Deserialize, Serialize};

/// Section `[submission]` of `pressing.toml`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct SubmissionConfig {
  pub max_file_bytes: u64,
  pub min_audio_bytes: u64,
  pub cover_size_px: u32,
  pub header_probe_bytes: usize,
  pub image_probe_timeout_secs: u64,
  pub batch_timeout_secs: u64,
  pub draft_debounce_ms: u64,
  pub draft_key: String,
}

impl Default for SubmissionConfig {
  fn default() -> Self {
    let rules = ValidationRules::default();
    SubmissionConfig {
      max_file_bytes: rules.max_file_bytes,
      min_audio_bytes: rules.min_audio_bytes,
      cover_size_px: rules.cover_size_px,
      header_probe_bytes: rules.header_probe_bytes,
      image_probe_timeout_secs: rules.probe_timeout.as_secs(),
      batch_timeout_secs: pressing_core::services::DEFAULT_BATCH_TIMEOUT.as_secs(),
      draft_debounce_ms: pressing_core::services::DEFAULT_QUIET_WINDOW.as_millis() as u64,
      draft_key: pressing_core::services::DEFAULT_DRAFT_KEY.to_string(),
    }
  }
}

impl SubmissionConfig {
  pub fn load() -> Result<Self, ConfigError> {
    CONFIG_BACKEND.load_or_init_section("submission")
  }

  pub fn rules(&self) -> ValidationRules {
    ValidationRules {
      max_file_bytes: self.max_file_bytes,
      min_audio_bytes: self.min_audio_bytes,
      cover_size_px: self.cover_size_px,
      header_probe_bytes: self.header_probe_bytes,
      probe_timeout: Duration::from_secs(self.image_probe_timeout_secs),
    }
  }

  pub fn batch_timeout(&self) -> Duration {
    Duration::from_secs(self.batch_timeout_secs)
  }

  pub fn quiet_window(&self) -> Duration {
    Duration::from_millis(self.draft_debounce_ms)
  }
}
