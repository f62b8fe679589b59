use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Identificador local de una pista pendiente de envío.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TrackId(Uuid);

impl TrackId {
  /// Genera un nuevo identificador único.
  pub fn new() -> Self {
    TrackId(Uuid::new_v4())
  }

  pub fn from_uuid(u: Uuid) -> Self {
    TrackId(u)
  }

  pub fn as_uuid(&self) -> Uuid {
    self.0
  }
}

impl Default for TrackId {
  fn default() -> Self {
    Self::new()
  }
}

impl From<Uuid> for TrackId {
  fn from(u: Uuid) -> Self {
    TrackId(u)
  }
}

impl fmt::Display for TrackId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    self.0.fmt(f)
  }
}

/// Identificador de un borrador de envío.
///
/// También sirve como carpeta de destino por defecto en el almacenamiento
/// remoto, de modo que reintentos del mismo borrador caen en el mismo sitio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DraftId(Uuid);

impl DraftId {
  pub fn new() -> Self {
    DraftId(Uuid::new_v4())
  }

  pub fn as_uuid(&self) -> Uuid {
    self.0
  }
}

impl Default for DraftId {
  fn default() -> Self {
    Self::new()
  }
}

impl fmt::Display for DraftId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    self.0.fmt(f)
  }
}

/// Identificador de un artista generado por el servicio remoto.
///
/// Su formato es decisión del servidor; aquí es opaco.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArtistId(String);

impl ArtistId {
  pub fn new(raw: impl Into<String>) -> Self {
    ArtistId(raw.into())
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl fmt::Display for ArtistId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

/// Identificador de un lanzamiento generado por el servicio remoto.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReleaseId(String);

impl ReleaseId {
  pub fn new(raw: impl Into<String>) -> Self {
    ReleaseId(raw.into())
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl fmt::Display for ReleaseId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}
