//! Coordinador de alto nivel: dueño del borrador, de la validación, del
//! orquestador y de la caché de borradores.

use tracing::{debug, info, warn};

use crate::domain::{
  CoverArt, MediaFile, Stage, SubmissionDraft, Track, TrackId, UploadPhase, UploadProgress, ValidationResult,
};
use crate::errors::CoreError;
use crate::ports::{DraftStore, MediaProbe, ProgressReporter, ReleaseRecords, RemoteStorage};
use crate::services::draft_cache::DraftCache;
use crate::services::submission_validator::{SubmissionValidator, stage_issues};
use crate::services::upload_orchestrator::{SubmissionContext, SubmissionReceipt, UploadFailure, UploadOrchestrator};

pub struct SubmissionFlow<P, S, R, Rep, D>
where
  P: MediaProbe,
  S: RemoteStorage,
  R: ReleaseRecords,
  Rep: ProgressReporter,
  D: DraftStore + 'static,
{
  draft: SubmissionDraft,
  stage: Stage,
  validator: SubmissionValidator<P>,
  orchestrator: UploadOrchestrator<S, R, Rep>,
  cache: DraftCache<D>,
}

impl<P, S, R, Rep, D> SubmissionFlow<P, S, R, Rep, D>
where
  P: MediaProbe,
  S: RemoteStorage,
  R: ReleaseRecords,
  Rep: ProgressReporter,
  D: DraftStore + 'static,
{
  pub fn new(
    validator: SubmissionValidator<P>,
    orchestrator: UploadOrchestrator<S, R, Rep>,
    cache: DraftCache<D>,
  ) -> Self {
    Self { draft: SubmissionDraft::new(), stage: Stage::Release, validator, orchestrator, cache }
  }

  /// Recupera el borrador guardado, si lo hay, y salta a la primera etapa incompleta.
  pub async fn hydrate(&mut self) -> bool {
    match self.cache.load().await {
      Some(draft) => {
        self.stage = self.validator.first_incomplete_stage(&draft).unwrap_or(Stage::Review);
        info!(draft_id = %draft.id, stage = ?self.stage, "draft restored");
        self.draft = draft;
        true
      }
      None => false,
    }
  }

  pub fn draft(&self) -> &SubmissionDraft {
    &self.draft
  }

  pub fn stage(&self) -> Stage {
    self.stage
  }

  pub fn phase(&self) -> UploadPhase {
    self.orchestrator.phase()
  }

  pub fn progress(&self) -> UploadProgress {
    self.orchestrator.progress()
  }

  fn persist(&self) {
    if let Err(e) = self.cache.save(&self.draft) {
      warn!(error = %e, "draft snapshot not scheduled");
    }
  }

  /// Aplica un cambio de formulario y programa el guardado.
  pub fn edit<F>(&mut self, change: F)
  where
    F: FnOnce(&mut SubmissionDraft),
  {
    change(&mut self.draft);
    self.persist();
  }

  pub async fn attach_tracks(&mut self, files: Vec<MediaFile>) -> ValidationResult {
    let result = self.validator.admit_tracks(&mut self.draft, files).await;
    if result.passed() {
      self.persist();
    }
    result
  }

  pub async fn attach_cover(&mut self, file: MediaFile) -> Result<Option<CoverArt>, ValidationResult> {
    let previous = self.validator.attach_cover(&mut self.draft, file).await?;
    self.persist();
    Ok(previous)
  }

  pub fn remove_track(&mut self, id: TrackId) -> Result<Track, CoreError> {
    let track = self.draft.remove_track(id).ok_or(CoreError::TrackNotFound(id))?;
    self.persist();
    Ok(track)
  }

  /// Cambia de etapa; avanzar exige que todas las anteriores al destino estén completas.
  pub fn navigate(&mut self, to: Stage) -> Result<(), ValidationResult> {
    if self.validator.can_navigate(&self.draft, self.stage, to) {
      debug!(from = ?self.stage, to = ?to, "stage change");
      self.stage = to;
      return Ok(());
    }
    let issues = to.predecessors().flat_map(|s| stage_issues(&self.draft, s)).collect();
    Err(ValidationResult::from_issues(issues))
  }

  pub fn validate(&self) -> ValidationResult {
    self.validator.validate_submission(&self.draft)
  }

  /// Envía el borrador. Si sale bien se borra la caché (una vez) y el
  /// formulario vuelve a empezar; si falla, ambos quedan intactos.
  pub async fn submit(
    &mut self,
    user_id: &str,
    bearer_token: &str,
  ) -> Result<SubmissionReceipt, UploadFailure> {
    let ctx = SubmissionContext::for_draft(user_id, bearer_token, &self.draft);
    let receipt = self.orchestrator.run(&self.draft, &ctx).await?;

    if let Err(e) = self.cache.clear().await {
      warn!(error = %e, "submitted draft could not be cleared");
    }
    self.draft.reset();
    self.stage = Stage::Release;
    Ok(receipt)
  }

  /// Vacía el formulario y la caché; devuelve la portada anterior.
  pub async fn reset(&mut self) -> Result<Option<CoverArt>, CoreError> {
    self.cache.clear().await?;
    self.stage = Stage::Release;
    Ok(self.draft.reset())
  }

  pub async fn flush(&self) -> Result<(), CoreError> {
    self.cache.flush().await
  }
}
