use thiserror::Error;

use crate::domain::TrackId;

/// Error genérico del núcleo.
///
/// Las capas superiores (CLI, UI) deberían mapear este error a mensajes
/// de usuario o logs.
#[derive(Debug, Error)]
pub enum CoreError {
  #[error("draft store error: {0}")]
  DraftStore(String),

  #[error("track {0} not found in draft")]
  TrackNotFound(TrackId),
}
