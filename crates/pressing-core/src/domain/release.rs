use serde::{Deserialize, Serialize};

use crate::domain::extension::MetadataBag;
use crate::domain::genre::Genre;
use crate::domain::release_type::ReleaseType;

/// Metadatos a nivel de lanzamiento que el usuario rellena en el formulario.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReleaseMetadata {
  pub title: String,

  /// Artista principal; se resuelve contra los artistas remotos del usuario.
  pub artist: String,

  pub release_type: ReleaseType,

  pub primary_genre: Option<Genre>,

  pub secondary_genre: Option<Genre>,

  /// Fecha de publicación deseada.
  ///
  /// [todo]: `String` hasta fijar el formato que acepta el servicio remoto
  /// (hoy `YYYY-MM-DD`).
  pub release_date: String,

  /// Sello discográfico (o el nombre del artista si es autoeditado).
  pub label: String,

  /// Línea ℗: titular de los derechos de la grabación.
  pub phonographic_line: String,

  /// Línea ©: titular de los derechos de la obra / arte.
  pub copyright_line: String,

  pub upc: Option<String>,

  pub language: Option<String>,

  pub extra: MetadataBag,
}
