use serde::{Deserialize, Serialize};

use crate::domain::media_file::MediaFile;

/// Referencia a una vista previa generada localmente (miniatura, URL de objeto...).
///
/// Es un recurso efímero: no se persiste en el borrador y el dueño debe
/// liberarla al reemplazar la portada.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewRef(pub String);

/// La portada del lanzamiento. Exactamente una por envío.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverArt {
  pub file: MediaFile,

  #[serde(skip)]
  pub preview: Option<PreviewRef>,

  /// Resultado cacheado de la comprobación de dimensiones.
  #[serde(default)]
  pub dimensions_valid: bool,
}

impl CoverArt {
  pub fn new(file: MediaFile, dimensions_valid: bool) -> Self {
    Self { file, preview: None, dimensions_valid }
  }

  pub fn with_preview(mut self, preview: PreviewRef) -> Self {
    self.preview = Some(preview);
    self
  }
}
