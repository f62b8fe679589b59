use std::path::{Path, PathBuf};

use async_trait::async_trait;
use image::{ImageError, ImageReader};
use lofty::prelude::*;
use lofty::probe::Probe;
use tracing::debug;

use pressing_core::domain::{MediaFile, TrackDuration};
use pressing_core::ports::{MediaError, MediaProbe, PixelSize};

use crate::config::MediaConfig;

/// `MediaProbe` sobre el sistema de archivos local.
///
/// Las dimensiones se leen sólo de la cabecera de la imagen; la duración
/// sale de las propiedades del contenedor, sin decodificar muestras.
#[derive(Debug, Clone)]
pub struct LocalMediaProbe {
  blocking_pool: bool,
}

impl LocalMediaProbe {
  pub fn new(config: &MediaConfig) -> Self {
    Self { blocking_pool: config.decode_on_blocking_pool }
  }

  async fn run_decoder<T, F>(&self, path: &Path, decode: F) -> Result<T, MediaError>
  where
    T: Send + 'static,
    F: FnOnce(&Path) -> Result<T, MediaError> + Send + 'static,
  {
    if !self.blocking_pool {
      return decode(path);
    }
    let owned = PathBuf::from(path);
    tokio::task::spawn_blocking(move || decode(&owned))
      .await
      .map_err(|e| MediaError::Internal(format!("decoder task failed: {e}")))?
  }
}

impl Default for LocalMediaProbe {
  fn default() -> Self {
    Self::new(&MediaConfig::default())
  }
}

fn map_image_error(e: ImageError) -> MediaError {
  match e {
    ImageError::IoError(io) => MediaError::Io(io.to_string()),
    ImageError::Unsupported(u) => MediaError::Unsupported(u.to_string()),
    other => MediaError::Corrupt(other.to_string()),
  }
}

fn image_dimensions(path: &Path) -> Result<PixelSize, MediaError> {
  let reader = ImageReader::open(path)
    .map_err(|e| MediaError::Io(e.to_string()))?
    .with_guessed_format()
    .map_err(|e| MediaError::Io(e.to_string()))?;
  let (width, height) = reader.into_dimensions().map_err(map_image_error)?;
  Ok(PixelSize { width, height })
}

fn audio_seconds(path: &Path) -> Result<f64, MediaError> {
  let tagged = Probe::open(path)
    .map_err(|e| MediaError::Io(e.to_string()))?
    .read()
    .map_err(|e| MediaError::Corrupt(e.to_string()))?;
  Ok(tagged.properties().duration().as_secs_f64())
}

#[async_trait]
impl MediaProbe for LocalMediaProbe {
  async fn read_header(&self, file: &MediaFile, max_len: usize) -> Result<Vec<u8>, MediaError> {
    pressing_fs::read_head(&file.path, max_len).await.map_err(|e| MediaError::Io(e.to_string()))
  }

  async fn image_size(&self, file: &MediaFile) -> Result<PixelSize, MediaError> {
    self.run_decoder(&file.path, image_dimensions).await
  }

  async fn audio_duration(&self, file: &MediaFile) -> TrackDuration {
    match self.run_decoder(&file.path, audio_seconds).await {
      Ok(secs) => TrackDuration::from_secs_f64(secs),
      Err(e) => {
        debug!(file = %file.file_name, error = %e, "duration unavailable");
        TrackDuration::Unknown
      }
    }
  }
}
