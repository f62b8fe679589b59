use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use pressing_core::cache::TtlCache;
use pressing_core::domain::ReleaseId;
use pressing_core::ports::{ArtistRecord, NewReleaseRecord, NewTrackRecord, ReleaseRecords, RemoteError};

use crate::config::RemoteConfig;
use crate::error::{ensure_success, transport_error};

#[derive(Debug, Serialize)]
struct NewArtistBody<'a> {
  user_id: &'a str,
  name: &'a str,
}

#[derive(Debug, Deserialize)]
struct CreatedRelease {
  id: ReleaseId,
}

#[derive(Debug, Serialize)]
struct TrackBatchBody<'a> {
  tracks: &'a [NewTrackRecord],
}

/// Cliente de los endpoints de artistas, lanzamientos y pistas.
///
/// La lista de artistas de cada usuario se memoriza en un [`TtlCache`]
/// inyectado; crear un artista invalida la entrada de ese usuario.
pub struct HttpReleaseRecords {
  client: Client,
  config: RemoteConfig,
  bearer_token: String,
  artists: Arc<TtlCache<String, Vec<ArtistRecord>>>,
}

impl HttpReleaseRecords {
  pub fn new(
    config: RemoteConfig,
    bearer_token: impl Into<String>,
    artists: Arc<TtlCache<String, Vec<ArtistRecord>>>,
  ) -> Result<Self, RemoteError> {
    let client = Client::builder().timeout(config.request_timeout()).build().map_err(transport_error)?;
    Ok(Self { client, config, bearer_token: bearer_token.into(), artists })
  }

  async fn post_json<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<reqwest::Response, RemoteError> {
    let response = self
      .client
      .post(self.config.endpoint(path))
      .bearer_auth(&self.bearer_token)
      .json(body)
      .send()
      .await
      .map_err(transport_error)?;
    ensure_success(response).await
  }
}

#[async_trait]
impl ReleaseRecords for HttpReleaseRecords {
  async fn list_artists(&self, user_id: &str) -> Result<Vec<ArtistRecord>, RemoteError> {
    let key = user_id.to_string();
    if let Some(cached) = self.artists.get(&key) {
      debug!(user_id, artists = cached.len(), "artist list from cache");
      return Ok(cached);
    }

    let response = self
      .client
      .get(self.config.endpoint("artists"))
      .bearer_auth(&self.bearer_token)
      .query(&[("user_id", user_id)])
      .send()
      .await
      .map_err(transport_error)?;
    let artists: Vec<ArtistRecord> = ensure_success(response).await?.json().await.map_err(transport_error)?;

    self.artists.insert(key, artists.clone());
    Ok(artists)
  }

  async fn create_artist(&self, user_id: &str, name: &str) -> Result<ArtistRecord, RemoteError> {
    let response = self.post_json("artists", &NewArtistBody { user_id, name }).await?;
    let created: ArtistRecord = response.json().await.map_err(transport_error)?;
    self.artists.invalidate(&user_id.to_string());
    Ok(created)
  }

  async fn create_release(&self, release: &NewReleaseRecord) -> Result<ReleaseId, RemoteError> {
    let response = self.post_json("releases", release).await?;
    let created: CreatedRelease = response.json().await.map_err(transport_error)?;
    Ok(created.id)
  }

  async fn create_tracks(&self, tracks: &[NewTrackRecord]) -> Result<(), RemoteError> {
    self.post_json("tracks", &TrackBatchBody { tracks }).await?;
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use std::time::Duration;

  use super::*;
  use pressing_core::domain::ArtistId;

  fn unreachable_config() -> RemoteConfig {
    RemoteConfig { base_url: "http://127.0.0.1:9".into(), request_timeout_secs: 1, ..Default::default() }
  }

  #[tokio::test]
  async fn cached_artist_list_skips_the_network() {
    let cache = Arc::new(TtlCache::new(Duration::from_secs(300)));
    let known = vec![ArtistRecord { id: ArtistId::new("a-1"), name: "Nadia".into() }];
    cache.insert("user-1".to_string(), known.clone());

    let records = HttpReleaseRecords::new(unreachable_config(), "t", cache).unwrap();
    assert_eq!(records.list_artists("user-1").await.unwrap(), known);
  }

  #[tokio::test]
  async fn unreachable_server_is_a_transport_error() {
    let cache = Arc::new(TtlCache::new(Duration::from_secs(300)));
    let records = HttpReleaseRecords::new(unreachable_config(), "t", cache).unwrap();
    assert!(matches!(records.list_artists("user-2").await, Err(RemoteError::Transport(_))));
  }

  #[tokio::test]
  async fn artist_cache_is_keyed_by_user() {
    let cache = Arc::new(TtlCache::new(Duration::from_secs(300)));
    cache.insert("user-1".to_string(), vec![ArtistRecord { id: ArtistId::new("a-1"), name: "Nadia".into() }]);

    let records = HttpReleaseRecords::new(unreachable_config(), "t", Arc::clone(&cache)).unwrap();
    assert!(matches!(records.list_artists("user-2").await, Err(RemoteError::Transport(_))));
    assert!(cache.get(&"user-2".to_string()).is_none());
    assert!(cache.get(&"user-1".to_string()).is_some());
  }

  #[test]
  fn release_id_decodes_from_plain_string() {
    let created: CreatedRelease = serde_json::from_str(r#"{"id":"rel-42"}"#).unwrap();
    assert_eq!(created.id, ReleaseId::new("rel-42"));
  }
}
