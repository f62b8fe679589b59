use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Archivo local adjuntado al formulario (audio o portada).
///
/// Es el "handle" que viaja por validación y subida; el contenido se lee
/// bajo demanda a través de [`crate::ports::MediaProbe`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaFile {
  /// Ruta absoluta en el sistema de archivos.
  pub path: PathBuf,

  /// Nombre tal como lo eligió el usuario (se usa en los mensajes).
  pub file_name: String,

  /// MIME declarado o adivinado (p. ej. `"audio/wav"`, `"image/jpeg"`).
  pub mime_type: String,

  /// Tamaño en bytes.
  pub size_bytes: u64,
}

impl MediaFile {
  pub fn new(path: impl Into<PathBuf>, mime_type: impl Into<String>, size_bytes: u64) -> Self {
    let path = path.into();
    let file_name = path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
    Self { path, file_name, mime_type: mime_type.into(), size_bytes }
  }

  /// Extensión en minúsculas, sin el punto.
  pub fn extension(&self) -> Option<String> {
    Path::new(&self.file_name).extension().and_then(|e| e.to_str()).map(|e| e.to_ascii_lowercase())
  }

  /// Nombre sin extensión; sirve de título inicial para una pista.
  pub fn stem(&self) -> String {
    Path::new(&self.file_name).file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_default()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn derives_name_extension_and_stem() {
    let f = MediaFile::new("/music/My Song.WAV", "audio/wav", 10);
    assert_eq!(f.file_name, "My Song.WAV");
    assert_eq!(f.extension().as_deref(), Some("wav"));
    assert_eq!(f.stem(), "My Song");
  }
}
