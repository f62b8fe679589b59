pub mod config;

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use pressing_core::ports::{DraftStore, StoreError};

pub use config::StorageConfig;

/// `DraftStore` respaldado por archivos: `<drafts_dir>/<key>.json`.
///
/// Las escrituras son atómicas (tmp + rename), así que un lector nunca ve
/// un snapshot a medias. Un archivo borrado desde fuera se lee como ausente.
#[derive(Debug, Clone)]
pub struct FileDraftStore {
  dir: PathBuf,
}

impl FileDraftStore {
  pub fn new(dir: impl Into<PathBuf>) -> Self {
    Self { dir: dir.into() }
  }

  pub fn from_config(config: &StorageConfig) -> Self {
    Self::new(&config.drafts_dir)
  }

  pub fn dir(&self) -> &Path {
    &self.dir
  }

  /// Sólo alfanuméricos, `-` y `_`; el resto se sustituye para no salir del directorio.
  pub fn path_for(&self, key: &str) -> PathBuf {
    let safe: String =
      key.chars().map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' }).collect();
    self.dir.join(format!("{safe}.json"))
  }
}

fn io_error(path: &Path, e: std::io::Error) -> StoreError {
  StoreError::Io(format!("{}: {e}", path.display()))
}

#[async_trait]
impl DraftStore for FileDraftStore {
  async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
    let path = self.path_for(key);
    match tokio::fs::read_to_string(&path).await {
      Ok(raw) => Ok(Some(raw)),
      Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
      // Contenido no UTF-8: lo tratamos como corrupto, no como error de E/S.
      Err(e) if e.kind() == ErrorKind::InvalidData => {
        debug!(path = %path.display(), "draft file is not text");
        Ok(Some(String::new()))
      }
      Err(e) => Err(io_error(&path, e)),
    }
  }

  async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
    let path = self.path_for(key);
    pressing_fs::atomic_write(&path, value.as_bytes()).await.map_err(|e| io_error(&path, e))
  }

  async fn remove(&self, key: &str) -> Result<(), StoreError> {
    let path = self.path_for(key);
    pressing_fs::remove_if_exists(&path).await.map_err(|e| io_error(&path, e))
  }
}
