//! Dobles de prueba para los puertos del núcleo.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::domain::{
  ArtistId, CoverArt, Genre, MediaFile, ReleaseId, SubmissionDraft, Track, TrackDuration, UploadPhase, UploadProgress,
};
use crate::format::wav::tests::wav_header;
use crate::ports::{
  ArtistRecord, DraftStore, MediaError, MediaProbe, NewReleaseRecord, NewTrackRecord, PixelSize, ProgressReporter,
  ReleaseRecords, RemoteError, RemoteStorage, StoreError, StoredLocations, UploadBatch,
};

#[derive(Debug, Clone)]
enum ImageBehavior {
  Size(u32, u32),
  Corrupt,
  Hang,
}

#[derive(Debug, Clone)]
pub struct FakeProbe {
  header: Vec<u8>,
  headers_by_path: HashMap<PathBuf, Vec<u8>>,
  image: ImageBehavior,
  duration: TrackDuration,
}

impl Default for FakeProbe {
  fn default() -> Self {
    Self {
      header: wav_header(48_000, 24, None),
      headers_by_path: HashMap::new(),
      image: ImageBehavior::Size(3000, 3000),
      duration: TrackDuration::Known(180),
    }
  }
}

impl FakeProbe {
  pub fn with_header(mut self, header: Vec<u8>) -> Self {
    self.header = header;
    self
  }

  pub fn with_header_for(mut self, path: impl Into<PathBuf>, header: Vec<u8>) -> Self {
    self.headers_by_path.insert(path.into(), header);
    self
  }

  pub fn with_image(mut self, width: u32, height: u32) -> Self {
    self.image = ImageBehavior::Size(width, height);
    self
  }

  pub fn with_corrupt_image(mut self) -> Self {
    self.image = ImageBehavior::Corrupt;
    self
  }

  pub fn with_hanging_image(mut self) -> Self {
    self.image = ImageBehavior::Hang;
    self
  }

  pub fn with_duration(mut self, duration: TrackDuration) -> Self {
    self.duration = duration;
    self
  }
}

#[async_trait]
impl MediaProbe for FakeProbe {
  async fn read_header(&self, file: &MediaFile, max_len: usize) -> Result<Vec<u8>, MediaError> {
    let header = self.headers_by_path.get(&file.path).unwrap_or(&self.header);
    Ok(header.iter().take(max_len).copied().collect())
  }

  async fn image_size(&self, _file: &MediaFile) -> Result<PixelSize, MediaError> {
    match self.image {
      ImageBehavior::Size(width, height) => Ok(PixelSize { width, height }),
      ImageBehavior::Corrupt => Err(MediaError::Corrupt("not a jpeg".into())),
      ImageBehavior::Hang => std::future::pending().await,
    }
  }

  async fn audio_duration(&self, _file: &MediaFile) -> TrackDuration {
    self.duration
  }
}

#[derive(Debug, Clone)]
pub enum StorageBehavior {
  Succeed,
  Fail(RemoteError),
  /// Devuelve una URL de pista menos de las enviadas.
  DropOneTrack,
  Hang,
}

pub struct FakeStorage {
  behavior: StorageBehavior,
  pub batches: Mutex<Vec<UploadBatch>>,
}

impl FakeStorage {
  pub fn new(behavior: StorageBehavior) -> Self {
    Self { behavior, batches: Mutex::new(Vec::new()) }
  }

  pub fn calls(&self) -> usize {
    self.batches.lock().unwrap().len()
  }
}

#[async_trait]
impl RemoteStorage for FakeStorage {
  async fn upload_batch(&self, batch: &UploadBatch) -> Result<StoredLocations, RemoteError> {
    self.batches.lock().unwrap().push(batch.clone());
    let url = |f: &MediaFile| format!("https://cdn.test/{}/{}", batch.folder, f.file_name);
    match &self.behavior {
      StorageBehavior::Succeed => {
        Ok(StoredLocations { cover_url: url(&batch.cover), track_urls: batch.tracks.iter().map(url).collect() })
      }
      StorageBehavior::DropOneTrack => Ok(StoredLocations {
        cover_url: url(&batch.cover),
        track_urls: batch.tracks.iter().skip(1).map(url).collect(),
      }),
      StorageBehavior::Fail(e) => Err(e.clone()),
      StorageBehavior::Hang => std::future::pending().await,
    }
  }
}

#[derive(Default)]
pub struct FakeRecords {
  pub artists: Mutex<Vec<ArtistRecord>>,
  pub created_artists: AtomicUsize,
  pub releases: Mutex<Vec<NewReleaseRecord>>,
  pub tracks: Mutex<Vec<NewTrackRecord>>,
  pub fail_artists: Option<RemoteError>,
  pub fail_release: Option<RemoteError>,
  pub fail_tracks: Option<RemoteError>,
  /// Orden de las llamadas recibidas.
  pub calls: Mutex<Vec<&'static str>>,
}

impl FakeRecords {
  pub fn with_artist(self, id: &str, name: &str) -> Self {
    self.artists.lock().unwrap().push(ArtistRecord { id: ArtistId::new(id), name: name.into() });
    self
  }

  pub fn call_log(&self) -> Vec<&'static str> {
    self.calls.lock().unwrap().clone()
  }

  fn record_call(&self, name: &'static str) {
    self.calls.lock().unwrap().push(name);
  }
}

#[async_trait]
impl ReleaseRecords for FakeRecords {
  async fn list_artists(&self, _user_id: &str) -> Result<Vec<ArtistRecord>, RemoteError> {
    self.record_call("list_artists");
    if let Some(e) = &self.fail_artists {
      return Err(e.clone());
    }
    Ok(self.artists.lock().unwrap().clone())
  }

  async fn create_artist(&self, _user_id: &str, name: &str) -> Result<ArtistRecord, RemoteError> {
    self.record_call("create_artist");
    let n = self.created_artists.fetch_add(1, Ordering::SeqCst);
    let record = ArtistRecord { id: ArtistId::new(format!("artist-{n}")), name: name.into() };
    self.artists.lock().unwrap().push(record.clone());
    Ok(record)
  }

  async fn create_release(&self, release: &NewReleaseRecord) -> Result<ReleaseId, RemoteError> {
    self.record_call("create_release");
    if let Some(e) = &self.fail_release {
      return Err(e.clone());
    }
    self.releases.lock().unwrap().push(release.clone());
    Ok(ReleaseId::new("release-1"))
  }

  async fn create_tracks(&self, tracks: &[NewTrackRecord]) -> Result<(), RemoteError> {
    self.record_call("create_tracks");
    if let Some(e) = &self.fail_tracks {
      return Err(e.clone());
    }
    self.tracks.lock().unwrap().extend_from_slice(tracks);
    Ok(())
  }
}

/// Almacén en memoria que cuenta escrituras y borrados.
#[derive(Default)]
pub struct MemoryStore {
  pub entries: Mutex<HashMap<String, String>>,
  pub writes: AtomicUsize,
  pub removes: AtomicUsize,
}

impl MemoryStore {
  pub fn writes(&self) -> usize {
    self.writes.load(Ordering::SeqCst)
  }

  pub fn removes(&self) -> usize {
    self.removes.load(Ordering::SeqCst)
  }

  pub fn raw(&self, key: &str) -> Option<String> {
    self.entries.lock().unwrap().get(key).cloned()
  }

  pub fn put_raw(&self, key: &str, value: &str) {
    self.entries.lock().unwrap().insert(key.into(), value.into());
  }
}

#[async_trait]
impl DraftStore for MemoryStore {
  async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
    Ok(self.raw(key))
  }

  async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
    self.writes.fetch_add(1, Ordering::SeqCst);
    self.put_raw(key, value);
    Ok(())
  }

  async fn remove(&self, key: &str) -> Result<(), StoreError> {
    self.removes.fetch_add(1, Ordering::SeqCst);
    self.entries.lock().unwrap().remove(key);
    Ok(())
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportEvent {
  Start(u64),
  Phase(UploadPhase),
  Progress(u8),
  Warning(String),
}

#[derive(Default)]
pub struct RecordingReporter {
  pub events: Mutex<Vec<ReportEvent>>,
}

impl RecordingReporter {
  pub fn progress_trace(&self) -> Vec<u8> {
    self
      .events
      .lock()
      .unwrap()
      .iter()
      .filter_map(|e| match e {
        ReportEvent::Progress(p) => Some(*p),
        _ => None,
      })
      .collect()
  }

  pub fn phases(&self) -> Vec<UploadPhase> {
    self
      .events
      .lock()
      .unwrap()
      .iter()
      .filter_map(|e| match e {
        ReportEvent::Phase(p) => Some(*p),
        _ => None,
      })
      .collect()
  }

  pub fn warnings(&self) -> Vec<String> {
    self
      .events
      .lock()
      .unwrap()
      .iter()
      .filter_map(|e| match e {
        ReportEvent::Warning(w) => Some(w.clone()),
        _ => None,
      })
      .collect()
  }
}

#[async_trait]
impl ProgressReporter for RecordingReporter {
  async fn start(&self, total_bytes: u64) {
    self.events.lock().unwrap().push(ReportEvent::Start(total_bytes));
  }

  async fn on_phase(&self, phase: UploadPhase) {
    self.events.lock().unwrap().push(ReportEvent::Phase(phase));
  }

  async fn on_progress(&self, progress: UploadProgress) {
    self.events.lock().unwrap().push(ReportEvent::Progress(progress.percent()));
  }

  async fn on_warning(&self, message: &str) {
    self.events.lock().unwrap().push(ReportEvent::Warning(message.into()));
  }
}

/// Borrador que supera todas las etapas.
pub fn complete_draft() -> SubmissionDraft {
  let mut draft = SubmissionDraft::new();
  draft.release.title = "Night Drive".into();
  draft.release.artist = "Nadia".into();
  draft.release.release_date = "2026-11-20".into();
  draft.release.label = "Self-released".into();
  draft.release.phonographic_line = "2026 Nadia".into();
  draft.release.copyright_line = "2026 Nadia".into();
  draft.release.primary_genre = Some(Genre::Electronic);

  let mut track = Track::from_file(MediaFile::new("/music/night.wav", "audio/wav", 3_000_000), TrackDuration::Known(201));
  track.artist = "Nadia".into();
  draft.tracks.push(track);

  draft.replace_cover(CoverArt::new(MediaFile::new("/art/cover.jpg", "image/jpeg", 2_000_000), true));
  draft.distribution_targets.push("spotify".into());
  draft.terms_accepted = true;
  draft
}
