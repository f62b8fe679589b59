use std::sync::Arc;
use std::time::Duration;

use tokio::time::timeout;
use tracing::{debug, warn};

use crate::domain::{MediaFile, TrackDuration};
use crate::ports::{MediaProbe, PixelSize};

/// Lado exigido para la portada (cuadrada).
pub const REQUIRED_COVER_PX: u32 = 3000;
/// Cota para decodificaciones que nunca contestan.
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(10);

/// Resultado detallado de la comprobación de la portada.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageCheck {
  Valid,
  WrongSize(PixelSize),
  Undecodable(String),
  TimedOut,
}

impl ImageCheck {
  pub fn is_valid(&self) -> bool {
    matches!(self, ImageCheck::Valid)
  }
}

/// Comprueba que una imagen mida exactamente `required_px` × `required_px`.
///
/// Nunca propaga errores ni se queda colgado: un fallo de decodificación o
/// un probe que no responde a tiempo se traducen en "no válida".
pub struct ImageDimensionValidator<P: MediaProbe> {
  probe: Arc<P>,
  required_px: u32,
  timeout: Duration,
}

impl<P: MediaProbe> ImageDimensionValidator<P> {
  pub fn new(probe: Arc<P>, required_px: u32, timeout: Duration) -> Self {
    Self { probe, required_px, timeout }
  }

  pub fn required_px(&self) -> u32 {
    self.required_px
  }

  pub async fn check(&self, file: &MediaFile) -> ImageCheck {
    match timeout(self.timeout, self.probe.image_size(file)).await {
      Ok(Ok(size)) if size.width == self.required_px && size.height == self.required_px => ImageCheck::Valid,
      Ok(Ok(size)) => {
        debug!(file = %file.file_name, width = size.width, height = size.height, "cover has wrong dimensions");
        ImageCheck::WrongSize(size)
      }
      Ok(Err(e)) => {
        debug!(file = %file.file_name, error = %e, "cover could not be decoded");
        ImageCheck::Undecodable(e.to_string())
      }
      Err(_) => {
        warn!(file = %file.file_name, timeout_ms = self.timeout.as_millis() as u64, "image probe timed out");
        ImageCheck::TimedOut
      }
    }
  }

  pub async fn is_valid(&self, file: &MediaFile) -> bool {
    self.check(file).await.is_valid()
  }
}

/// Obtiene la duración de una pista; lo que no se pueda leer queda `Unknown`.
pub struct AudioDurationExtractor<P: MediaProbe> {
  probe: Arc<P>,
  timeout: Duration,
}

impl<P: MediaProbe> AudioDurationExtractor<P> {
  pub fn new(probe: Arc<P>, timeout: Duration) -> Self {
    Self { probe, timeout }
  }

  pub async fn extract(&self, file: &MediaFile) -> TrackDuration {
    match timeout(self.timeout, self.probe.audio_duration(file)).await {
      Ok(duration) => duration,
      Err(_) => {
        warn!(file = %file.file_name, "audio duration probe timed out");
        TrackDuration::Unknown
      }
    }
  }
}
