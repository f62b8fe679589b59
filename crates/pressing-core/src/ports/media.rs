use async_trait::async_trait;

use crate::domain::{MediaFile, TrackDuration};

#[derive(Debug, thiserror::Error)]
pub enum MediaError {
  #[error("io error: {0}")]
  Io(String),

  #[error("unsupported format: {0}")]
  Unsupported(String),

  #[error("corrupt file: {0}")]
  Corrupt(String),

  #[error("internal error: {0}")]
  Internal(String),
}

/// Dimensiones en píxeles de una imagen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelSize {
  pub width: u32,
  pub height: u32,
}

/// Port que abstrae el acceso al contenido de los archivos adjuntos.
///
/// Implementaciones posibles:
/// - archivos locales (`pressing-media`)
/// - fakes en memoria para tests
#[async_trait]
pub trait MediaProbe: Send + Sync {
  /// Primeros `max_len` bytes del archivo (menos si es más corto).
  async fn read_header(&self, file: &MediaFile, max_len: usize) -> Result<Vec<u8>, MediaError>;

  /// Decodifica sólo lo necesario para conocer ancho y alto.
  async fn image_size(&self, file: &MediaFile) -> Result<PixelSize, MediaError>;

  /// Duración de reproducción. Nunca falla: lo ilegible es `Unknown`.
  async fn audio_duration(&self, file: &MediaFile) -> TrackDuration;
}
