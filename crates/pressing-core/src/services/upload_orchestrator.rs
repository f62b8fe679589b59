//! Orquestación de un envío: validación, subida por lotes y creación de registros.
//!
//! Máquina de estados:
//! `Idle → Validating → Uploading → CreatingRecords → Succeeded | Failed`.
//!
//! El progreso es sintético y se mueve sólo en puntos de control:
//! 10 % al iniciar la transferencia, 50 % con los archivos subidos,
//! 50–85 % repartido a partes iguales entre las pistas, 100 % al terminar.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::domain::{
  ArtistId, MediaFile, ReleaseId, SubmissionDraft, Track, UploadPhase, UploadProgress, ValidationResult,
};
use crate::ports::{
  NewReleaseRecord, NewTrackRecord, ProgressReporter, ReleaseRecords, RemoteError, RemoteStorage, StoredLocations,
  UploadBatch,
};
use crate::services::submission_validator::validate_draft;

pub const TRANSFER_STARTED: u8 = 10;
pub const FILES_TRANSFERRED: u8 = 50;
pub const RECORDS_PROCESSED: u8 = 85;
pub const COMPLETE: u8 = 100;

/// Límite duro de la petición de subida por lotes.
pub const DEFAULT_BATCH_TIMEOUT: Duration = Duration::from_secs(119);

/// Punto de control tras procesar `done` de `total` pistas.
pub fn track_checkpoint(done: usize, total: usize) -> u8 {
  if total == 0 {
    return RECORDS_PROCESSED;
  }
  let band = (RECORDS_PROCESSED - FILES_TRANSFERRED) as usize;
  FILES_TRANSFERRED + (band * done.min(total) / total) as u8
}

/// Datos del llamador que no forman parte del borrador.
#[derive(Debug, Clone)]
pub struct SubmissionContext {
  pub user_id: String,
  pub bearer_token: String,
  /// Carpeta de destino en el almacenamiento remoto.
  pub folder: String,
}

impl SubmissionContext {
  /// Usa el identificador del borrador como carpeta de destino.
  pub fn for_draft(user_id: impl Into<String>, bearer_token: impl Into<String>, draft: &SubmissionDraft) -> Self {
    Self { user_id: user_id.into(), bearer_token: bearer_token.into(), folder: draft.id.to_string() }
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionReceipt {
  pub artist_id: ArtistId,
  pub release_id: ReleaseId,
  pub cover_url: String,
  pub track_urls: Vec<String>,
  /// Fallo no fatal de la creación de pistas: el lanzamiento ya existe.
  pub track_warning: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UploadFailure {
  #[error("submission is not valid: {0}")]
  Invalid(ValidationResult),

  #[error("upload failed: {0}")]
  Transfer(String),

  #[error("upload timed out after {} seconds", .0.as_secs())]
  TimedOut(Duration),

  #[error("could not resolve artist: {0}")]
  Artist(String),

  #[error("could not create release: {0}")]
  Release(String),
}

impl UploadFailure {
  /// Los fallos de transporte se pueden reintentar tal cual; el resto no.
  pub fn is_retryable(&self) -> bool {
    matches!(self, UploadFailure::Transfer(_) | UploadFailure::TimedOut(_))
  }
}

fn same_artist(a: &str, b: &str) -> bool {
  a.trim().to_lowercase() == b.trim().to_lowercase()
}

pub struct UploadOrchestrator<S, R, P>
where
  S: RemoteStorage,
  R: ReleaseRecords,
  P: ProgressReporter,
{
  storage: Arc<S>,
  records: Arc<R>,
  reporter: Arc<P>,
  batch_timeout: Duration,
  phase: UploadPhase,
  progress: UploadProgress,
}

impl<S, R, P> UploadOrchestrator<S, R, P>
where
  S: RemoteStorage,
  R: ReleaseRecords,
  P: ProgressReporter,
{
  pub fn new(storage: Arc<S>, records: Arc<R>, reporter: Arc<P>) -> Self {
    Self {
      storage,
      records,
      reporter,
      batch_timeout: DEFAULT_BATCH_TIMEOUT,
      phase: UploadPhase::Idle,
      progress: UploadProgress::default(),
    }
  }

  pub fn with_batch_timeout(mut self, batch_timeout: Duration) -> Self {
    self.batch_timeout = batch_timeout;
    self
  }

  pub fn phase(&self) -> UploadPhase {
    self.phase
  }

  pub fn progress(&self) -> UploadProgress {
    self.progress
  }

  async fn enter(&mut self, next: UploadPhase) {
    if !self.phase.can_transition_to(next) {
      warn!(from = %self.phase, to = %next, "unexpected phase transition");
    }
    info!(from = %self.phase, to = %next, "upload phase");
    self.phase = next;
    self.reporter.on_phase(next).await;
  }

  async fn advance(&mut self, percent: u8) {
    if self.progress.advance_to(percent) {
      debug!(progress = %self.progress, "upload progress");
      self.reporter.on_progress(self.progress).await;
    }
  }

  async fn fail(&mut self, failure: UploadFailure) -> UploadFailure {
    warn!(phase = %self.phase, error = %failure, "submission failed");
    self.enter(UploadPhase::Failed).await;
    failure
  }

  /// Ejecuta un envío completo.
  ///
  /// No limpia el borrador ni la caché: eso queda en manos del llamador.
  pub async fn run(
    &mut self,
    draft: &SubmissionDraft,
    ctx: &SubmissionContext,
  ) -> Result<SubmissionReceipt, UploadFailure> {
    if self.phase.is_active() {
      // Una ejecución anterior se abandonó a medias.
      warn!(phase = %self.phase, "discarding abandoned run");
      self.phase = UploadPhase::Idle;
    }
    self.progress.reset();

    self.enter(UploadPhase::Validating).await;
    let verdict = validate_draft(draft);
    if !verdict.passed() {
      return Err(self.fail(UploadFailure::Invalid(verdict)).await);
    }
    let (cover, track_files) = match batch_files(draft) {
      Ok(files) => files,
      Err(verdict) => return Err(self.fail(UploadFailure::Invalid(verdict)).await),
    };

    self.enter(UploadPhase::Uploading).await;
    let total_bytes = draft.total_upload_bytes();
    info!(total_bytes, tracks = track_files.len(), folder = %ctx.folder, "upload started");
    self.reporter.start(total_bytes).await;
    self.advance(TRANSFER_STARTED).await;

    let batch = UploadBatch {
      folder: ctx.folder.clone(),
      bearer_token: ctx.bearer_token.clone(),
      cover,
      tracks: track_files,
    };
    let locations = match self.transfer(&batch).await {
      Ok(l) => l,
      Err(failure) => return Err(self.fail(failure).await),
    };
    self.advance(FILES_TRANSFERRED).await;

    self.enter(UploadPhase::CreatingRecords).await;

    let artist_id = match self.resolve_artist(&ctx.user_id, &draft.release.artist).await {
      Ok(id) => id,
      Err(e) => return Err(self.fail(UploadFailure::Artist(e.to_string())).await),
    };

    let release_record = release_record(draft, &ctx.user_id, &artist_id, &locations.cover_url);
    let release_id = match self.records.create_release(&release_record).await {
      Ok(id) => id,
      Err(e) => return Err(self.fail(UploadFailure::Release(e.to_string())).await),
    };
    info!(release_id = %release_id, artist_id = %artist_id, "release record created");

    let total = draft.tracks.len();
    let mut track_records = Vec::with_capacity(total);
    for (idx, (track, url)) in draft.tracks.iter().zip(&locations.track_urls).enumerate() {
      track_records.push(track_record(track, draft, &release_id, idx, url));
      self.advance(track_checkpoint(idx + 1, total)).await;
    }

    let track_warning = match self.records.create_tracks(&track_records).await {
      Ok(()) => None,
      Err(e) => {
        let message = format!("release was created but its tracks could not be saved: {e}");
        warn!(release_id = %release_id, error = %e, "track records failed");
        self.reporter.on_warning(&message).await;
        Some(message)
      }
    };

    self.advance(COMPLETE).await;
    self.enter(UploadPhase::Succeeded).await;

    Ok(SubmissionReceipt {
      artist_id,
      release_id,
      cover_url: locations.cover_url,
      track_urls: locations.track_urls,
      track_warning,
    })
  }

  async fn transfer(&self, batch: &UploadBatch) -> Result<StoredLocations, UploadFailure> {
    let locations = match timeout(self.batch_timeout, self.storage.upload_batch(batch)).await {
      Ok(Ok(l)) => l,
      Ok(Err(RemoteError::Server { message, .. })) => return Err(UploadFailure::Transfer(message)),
      Ok(Err(e)) => return Err(UploadFailure::Transfer(e.to_string())),
      Err(_) => return Err(UploadFailure::TimedOut(self.batch_timeout)),
    };

    if locations.track_urls.len() != batch.tracks.len() {
      return Err(UploadFailure::Transfer(format!(
        "storage returned {} track locations for {} tracks",
        locations.track_urls.len(),
        batch.tracks.len()
      )));
    }
    Ok(locations)
  }

  /// Busca el artista del usuario por nombre sin distinguir mayúsculas; si no existe lo crea.
  async fn resolve_artist(&self, user_id: &str, name: &str) -> Result<ArtistId, RemoteError> {
    let existing = self.records.list_artists(user_id).await?;
    if let Some(found) = existing.into_iter().find(|a| same_artist(&a.name, name)) {
      debug!(artist_id = %found.id, "reusing artist record");
      return Ok(found.id);
    }
    let created = self.records.create_artist(user_id, name.trim()).await?;
    info!(artist_id = %created.id, "artist record created");
    Ok(created.id)
  }
}

fn batch_files(draft: &SubmissionDraft) -> Result<(MediaFile, Vec<MediaFile>), ValidationResult> {
  let cover = draft.cover.as_ref().ok_or_else(|| ValidationResult::fail("cover art", "a cover image is required"))?;
  let tracks = draft
    .tracks
    .iter()
    .map(|t| t.file.clone())
    .collect::<Option<Vec<_>>>()
    .ok_or_else(|| ValidationResult::fail("tracks", "audio file is missing"))?;
  Ok((cover.file.clone(), tracks))
}

fn release_record(draft: &SubmissionDraft, user_id: &str, artist_id: &ArtistId, cover_url: &str) -> NewReleaseRecord {
  let release = &draft.release;
  NewReleaseRecord {
    user_id: user_id.to_string(),
    artist_id: artist_id.clone(),
    title: release.title.trim().to_string(),
    release_type: release.release_type.clone(),
    primary_genre: release.primary_genre,
    secondary_genre: release.secondary_genre,
    release_date: release.release_date.clone(),
    label: release.label.clone(),
    phonographic_line: release.phonographic_line.clone(),
    copyright_line: release.copyright_line.clone(),
    upc: release.upc.clone(),
    language: release.language.clone(),
    cover_url: cover_url.to_string(),
    distribution_targets: draft.distribution_targets.clone(),
    territories: draft.territories.clone(),
    exclusive: draft.exclusive,
    extra: release.extra.clone(),
  }
}

fn track_record(track: &Track, draft: &SubmissionDraft, release_id: &ReleaseId, idx: usize, url: &str) -> NewTrackRecord {
  let artist = if track.artist.trim().is_empty() { draft.release.artist.clone() } else { track.artist.clone() };
  NewTrackRecord {
    release_id: release_id.clone(),
    position: idx as u32 + 1,
    title: track.title.trim().to_string(),
    audio_url: url.to_string(),
    duration_secs: track.duration.seconds(),
    explicit: track.explicit,
    isrc: track.isrc.clone(),
    artist,
    featured_artist: track.featured_artist.clone(),
    primary_genre: track.primary_genre.or(draft.release.primary_genre),
    secondary_genre: track.secondary_genre,
    lyricist: track.lyricist.clone(),
    composer: track.composer.clone(),
    lyrics: track.lyrics.clone(),
    extra: track.extra.clone(),
  }
}
