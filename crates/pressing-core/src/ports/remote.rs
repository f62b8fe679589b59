use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::{ArtistId, Genre, MediaFile, MetadataBag, ReleaseId, ReleaseType};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RemoteError {
  /// No hubo respuesta utilizable (DNS, conexión, TLS...).
  #[error("network error: {0}")]
  Transport(String),

  /// El servidor respondió con error; `message` es su texto.
  #[error("{message} (status {status})")]
  Server { status: u16, message: String },

  #[error("unexpected response: {0}")]
  Decode(String),
}

/// Una única petición con la portada y todas las pistas.
#[derive(Debug, Clone)]
pub struct UploadBatch {
  /// Carpeta de destino elegida por el llamador.
  pub folder: String,
  pub bearer_token: String,
  pub cover: MediaFile,
  /// En orden de envío.
  pub tracks: Vec<MediaFile>,
}

/// Ubicaciones devueltas por el almacenamiento remoto.
///
/// `track_urls[i]` corresponde a `UploadBatch::tracks[i]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredLocations {
  pub cover_url: String,
  pub track_urls: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtistRecord {
  pub id: ArtistId,
  pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewReleaseRecord {
  pub user_id: String,
  pub artist_id: ArtistId,
  pub title: String,
  pub release_type: ReleaseType,
  pub primary_genre: Option<Genre>,
  pub secondary_genre: Option<Genre>,
  pub release_date: String,
  pub label: String,
  pub phonographic_line: String,
  pub copyright_line: String,
  pub upc: Option<String>,
  pub language: Option<String>,
  pub cover_url: String,
  pub distribution_targets: Vec<String>,
  pub territories: Vec<String>,
  pub exclusive: bool,
  pub extra: MetadataBag,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewTrackRecord {
  pub release_id: ReleaseId,
  /// Posición 1..n dentro del lanzamiento.
  pub position: u32,
  pub title: String,
  pub audio_url: String,
  pub duration_secs: u64,
  pub explicit: bool,
  pub isrc: Option<String>,
  pub artist: String,
  pub featured_artist: Option<String>,
  pub primary_genre: Option<Genre>,
  pub secondary_genre: Option<Genre>,
  pub lyricist: Option<String>,
  pub composer: Option<String>,
  pub lyrics: Option<String>,
  pub extra: MetadataBag,
}

/// Port del almacenamiento de archivos remoto.
#[async_trait]
pub trait RemoteStorage: Send + Sync {
  async fn upload_batch(&self, batch: &UploadBatch) -> Result<StoredLocations, RemoteError>;
}

/// Port de los registros remotos que dependen de una subida exitosa.
#[async_trait]
pub trait ReleaseRecords: Send + Sync {
  /// Artistas ya registrados por el usuario.
  async fn list_artists(&self, user_id: &str) -> Result<Vec<ArtistRecord>, RemoteError>;

  async fn create_artist(&self, user_id: &str, name: &str) -> Result<ArtistRecord, RemoteError>;

  async fn create_release(&self, release: &NewReleaseRecord) -> Result<ReleaseId, RemoteError>;

  /// Alta en bloque de todas las pistas de un lanzamiento.
  async fn create_tracks(&self, tracks: &[NewTrackRecord]) -> Result<(), RemoteError>;
}
