use async_trait::async_trait;
use reqwest::Client;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use tracing::{debug, info};

use pressing_core::domain::MediaFile;
use pressing_core::ports::{RemoteError, RemoteStorage, StoredLocations, UploadBatch};

use crate::config::RemoteConfig;
use crate::error::{ensure_success, transport_error};

const UPLOAD_PATH: &str = "storage/upload";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UploadResponse {
  cover_url: String,
  #[serde(default)]
  track_urls: Vec<String>,
}

impl From<UploadResponse> for StoredLocations {
  fn from(r: UploadResponse) -> Self {
    StoredLocations { cover_url: r.cover_url, track_urls: r.track_urls }
  }
}

/// Subida por lotes: una sola petición multipart con la portada y todas las pistas.
///
/// El cliente no lleva timeout propio; lo impone el orquestador y al
/// expirar suelta el futuro, lo que cancela la petición.
pub struct HttpRemoteStorage {
  client: Client,
  url: String,
}

impl HttpRemoteStorage {
  pub fn new(config: &RemoteConfig) -> Result<Self, RemoteError> {
    let client = Client::builder().build().map_err(transport_error)?;
    Ok(Self { client, url: config.endpoint(UPLOAD_PATH) })
  }
}

async fn file_part(file: &MediaFile) -> Result<Part, RemoteError> {
  let bytes = tokio::fs::read(&file.path)
    .await
    .map_err(|e| RemoteError::Transport(format!("could not read {}: {e}", file.file_name)))?;
  Part::bytes(bytes)
    .file_name(file.file_name.clone())
    .mime_str(&file.mime_type)
    .map_err(|e| RemoteError::Transport(format!("invalid content type for {}: {e}", file.file_name)))
}

#[async_trait]
impl RemoteStorage for HttpRemoteStorage {
  async fn upload_batch(&self, batch: &UploadBatch) -> Result<StoredLocations, RemoteError> {
    let mut form = Form::new().text("folder", batch.folder.clone()).part("cover", file_part(&batch.cover).await?);
    for track in &batch.tracks {
      form = form.part("tracks", file_part(track).await?);
    }

    info!(url = %self.url, tracks = batch.tracks.len(), "sending upload batch");
    let response = self
      .client
      .post(&self.url)
      .bearer_auth(&batch.bearer_token)
      .multipart(form)
      .send()
      .await
      .map_err(transport_error)?;

    let body: UploadResponse = ensure_success(response).await?.json().await.map_err(transport_error)?;
    debug!(tracks = body.track_urls.len(), "upload batch stored");
    Ok(body.into())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn decodes_upload_response() {
    let raw = r#"{"coverUrl":"https://cdn/c.jpg","trackUrls":["https://cdn/1.wav","https://cdn/2.wav"]}"#;
    let locations: StoredLocations = serde_json::from_str::<UploadResponse>(raw).unwrap().into();
    assert_eq!(locations.cover_url, "https://cdn/c.jpg");
    assert_eq!(locations.track_urls, vec!["https://cdn/1.wav", "https://cdn/2.wav"]);
  }

  #[tokio::test]
  async fn unreadable_file_fails_before_sending() {
    let storage = HttpRemoteStorage::new(&RemoteConfig::default()).unwrap();
    let batch = UploadBatch {
      folder: "draft".into(),
      bearer_token: "t".into(),
      cover: MediaFile::new("/nonexistent/cover.jpg", "image/jpeg", 1),
      tracks: vec![],
    };
    let err = storage.upload_batch(&batch).await.unwrap_err();
    assert!(matches!(err, RemoteError::Transport(m) if m.contains("cover.jpg")));
  }
}
