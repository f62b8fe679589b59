//! Validación por archivo y por envío.
//!
//! Por archivo se corta en el primer fallo (tipo → tamaño → contenido).
//! A nivel de envío se acumulan todos los motivos, en orden de etapa.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info};

use crate::domain::{
  CoverArt, MediaFile, Stage, SubmissionDraft, Track, ValidationIssue, ValidationResult,
};
use crate::format::wav::{self, HEADER_PROBE_LEN};
use crate::ports::MediaProbe;
use crate::services::media_checks::{
  AudioDurationExtractor, DEFAULT_PROBE_TIMEOUT, ImageCheck, ImageDimensionValidator, REQUIRED_COVER_PX,
};

pub const AUDIO_MIME_TYPES: &[&str] = &["audio/wav", "audio/x-wav", "audio/wave", "audio/vnd.wave"];
pub const AUDIO_EXTENSIONS: &[&str] = &["wav"];
pub const IMAGE_MIME_TYPES: &[&str] = &["image/jpeg", "image/pjpeg"];
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg"];

const MB: u64 = 1024 * 1024;

/// Límites configurables de la validación.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationRules {
  /// Tamaño máximo de cualquier archivo (audio o imagen).
  pub max_file_bytes: u64,
  /// Tamaño mínimo de un audio; por debajo es un archivo vacío o roto.
  pub min_audio_bytes: u64,
  pub cover_size_px: u32,
  pub header_probe_bytes: usize,
  pub probe_timeout: Duration,
}

impl Default for ValidationRules {
  fn default() -> Self {
    Self {
      max_file_bytes: 100 * MB,
      min_audio_bytes: 1000,
      cover_size_px: REQUIRED_COVER_PX,
      header_probe_bytes: HEADER_PROBE_LEN,
      probe_timeout: DEFAULT_PROBE_TIMEOUT,
    }
  }
}

fn track_field(file: &MediaFile) -> String {
  format!("track \"{}\"", file.file_name)
}

const COVER_FIELD: &str = "cover art";

fn accepted(value: &str, list: &[&str]) -> bool {
  list.iter().any(|v| v.eq_ignore_ascii_case(value.trim()))
}

fn describe_size(bytes: u64) -> String {
  if bytes >= MB { format!("{:.1} MB", bytes as f64 / MB as f64) } else { format!("{bytes} bytes") }
}

pub struct SubmissionValidator<P: MediaProbe> {
  probe: Arc<P>,
  rules: ValidationRules,
  images: ImageDimensionValidator<P>,
  durations: AudioDurationExtractor<P>,
}

impl<P: MediaProbe> SubmissionValidator<P> {
  pub fn new(probe: Arc<P>, rules: ValidationRules) -> Self {
    let images = ImageDimensionValidator::new(Arc::clone(&probe), rules.cover_size_px, rules.probe_timeout);
    let durations = AudioDurationExtractor::new(Arc::clone(&probe), rules.probe_timeout);
    Self { probe, rules, images, durations }
  }

  pub fn rules(&self) -> &ValidationRules {
    &self.rules
  }

  fn check_size(&self, field: &str, file: &MediaFile, min_bytes: u64) -> Option<ValidationResult> {
    if file.size_bytes > self.rules.max_file_bytes {
      return Some(ValidationResult::fail(
        field,
        format!("file exceeds the {} limit ({} bytes)", describe_size(self.rules.max_file_bytes), file.size_bytes),
      ));
    }
    if file.size_bytes < min_bytes {
      return Some(ValidationResult::fail(
        field,
        format!("file is too small ({} bytes) to be a valid recording", file.size_bytes),
      ));
    }
    None
  }

  /// Tipo → tamaño → contenedor WAV.
  pub async fn check_audio_file(&self, file: &MediaFile) -> ValidationResult {
    let field = track_field(file);

    let ext_ok = file.extension().is_some_and(|e| accepted(&e, AUDIO_EXTENSIONS));
    if !ext_ok || !accepted(&file.mime_type, AUDIO_MIME_TYPES) {
      return ValidationResult::fail(field, "only WAV audio files are accepted");
    }

    if let Some(failed) = self.check_size(&field, file, self.rules.min_audio_bytes) {
      return failed;
    }

    let header = match self.probe.read_header(file, self.rules.header_probe_bytes).await {
      Ok(h) => h,
      Err(e) => return ValidationResult::fail(field, format!("file could not be read ({e})")),
    };

    match wav::inspect_wav(&header) {
      Ok(format) => {
        debug!(file = %file.file_name, sample_rate = format.sample_rate_hz, bits = format.bits_per_sample, "wav accepted");
        ValidationResult::pass()
      }
      Err(e) => ValidationResult::fail(field, e.to_string()),
    }
  }

  /// Tipo → tamaño → dimensiones exactas.
  pub async fn check_cover_file(&self, file: &MediaFile) -> ValidationResult {
    let ext_ok = file.extension().is_some_and(|e| accepted(&e, IMAGE_EXTENSIONS));
    if !ext_ok || !accepted(&file.mime_type, IMAGE_MIME_TYPES) {
      return ValidationResult::fail(COVER_FIELD, "only JPEG images are accepted");
    }

    if let Some(failed) = self.check_size(COVER_FIELD, file, 0) {
      return failed;
    }

    let px = self.images.required_px();
    match self.images.check(file).await {
      ImageCheck::Valid => ValidationResult::pass(),
      ImageCheck::WrongSize(size) => ValidationResult::fail(
        COVER_FIELD,
        format!("image is {}x{} pixels; it must be exactly {px}x{px}", size.width, size.height),
      ),
      ImageCheck::Undecodable(e) => ValidationResult::fail(COVER_FIELD, format!("image could not be decoded ({e})")),
      ImageCheck::TimedOut => ValidationResult::fail(COVER_FIELD, "image could not be decoded in time"),
    }
  }

  /// Valida todos los archivos y, sólo si todos pasan, los añade como pistas.
  ///
  /// El primer archivo inválido detiene la operación y el borrador queda intacto.
  pub async fn admit_tracks(&self, draft: &mut SubmissionDraft, files: Vec<MediaFile>) -> ValidationResult {
    for file in &files {
      let result = self.check_audio_file(file).await;
      if !result.passed() {
        info!(file = %file.file_name, reasons = %result, "audio file rejected");
        return result;
      }
    }

    for file in files {
      let duration = self.durations.extract(&file).await;
      let mut track = Track::from_file(file, duration);
      track.artist = draft.release.artist.clone();
      track.primary_genre = draft.release.primary_genre;
      draft.tracks.push(track);
    }

    ValidationResult::pass()
  }

  /// Valida y coloca la portada; devuelve la anterior para liberar su vista previa.
  pub async fn attach_cover(
    &self,
    draft: &mut SubmissionDraft,
    file: MediaFile,
  ) -> Result<Option<CoverArt>, ValidationResult> {
    let result = self.check_cover_file(&file).await;
    if !result.passed() {
      info!(file = %file.file_name, reasons = %result, "cover rejected");
      return Err(result);
    }
    Ok(draft.replace_cover(CoverArt::new(file, true)))
  }

  /// Comprobación completa a partir de los flags cacheados (sin I/O).
  pub fn validate_submission(&self, draft: &SubmissionDraft) -> ValidationResult {
    validate_draft(draft)
  }

  pub fn stage_complete(&self, draft: &SubmissionDraft, stage: Stage) -> bool {
    stage_issues(draft, stage).is_empty()
  }

  pub fn first_incomplete_stage(&self, draft: &SubmissionDraft) -> Option<Stage> {
    Stage::ALL.into_iter().find(|s| !self.stage_complete(draft, *s))
  }

  /// Retroceder siempre se permite; avanzar sólo si todas las etapas
  /// anteriores al destino están completas.
  pub fn can_navigate(&self, draft: &SubmissionDraft, from: Stage, to: Stage) -> bool {
    to <= from || to.predecessors().all(|s| self.stage_complete(draft, s))
  }
}

fn blank(value: &str) -> bool {
  value.trim().is_empty()
}

fn file_issues(draft: &SubmissionDraft) -> Vec<ValidationIssue> {
  let mut issues = Vec::new();
  for (idx, track) in draft.tracks.iter().enumerate() {
    if track.file.is_none() {
      issues.push(ValidationIssue::new(format!("track {} \"{}\"", idx + 1, track.title), "audio file is missing"));
    }
  }
  if draft.cover.as_ref().is_some_and(|c| !c.dimensions_valid) {
    issues.push(ValidationIssue::new(COVER_FIELD, "image dimensions have not been verified"));
  }
  issues
}

/// Motivos que impiden dar por completa una etapa.
pub fn stage_issues(draft: &SubmissionDraft, stage: Stage) -> Vec<ValidationIssue> {
  let mut issues = Vec::new();
  match stage {
    Stage::Release => {
      let release = &draft.release;
      let required = [
        ("release title", release.title.as_str()),
        ("release artist", release.artist.as_str()),
        ("release date", release.release_date.as_str()),
        ("label", release.label.as_str()),
        ("℗ line", release.phonographic_line.as_str()),
        ("© line", release.copyright_line.as_str()),
      ];
      for (field, value) in required {
        if blank(value) {
          issues.push(ValidationIssue::new(field, "is required"));
        }
      }
      if release.primary_genre.is_none() {
        issues.push(ValidationIssue::new("primary genre", "is required"));
      }
    }
    Stage::Tracks => {
      if draft.tracks.is_empty() {
        issues.push(ValidationIssue::new("tracks", "at least one track is required"));
      }
      for (idx, track) in draft.tracks.iter().enumerate() {
        let field = format!("track {}", idx + 1);
        if blank(&track.title) {
          issues.push(ValidationIssue::new(&field, "title is required"));
        }
        if blank(&track.artist) {
          issues.push(ValidationIssue::new(&field, "artist is required"));
        }
        if track.file.is_none() {
          issues.push(ValidationIssue::new(&field, "audio file is missing"));
        }
      }
    }
    Stage::Artwork => match &draft.cover {
      None => issues.push(ValidationIssue::new(COVER_FIELD, "a cover image is required")),
      Some(c) if !c.dimensions_valid => {
        issues.push(ValidationIssue::new(COVER_FIELD, "image dimensions have not been verified"))
      }
      Some(_) => {}
    },
    Stage::Distribution => {
      if draft.distribution_targets.is_empty() {
        issues.push(ValidationIssue::new("distribution", "select at least one distribution target"));
      }
    }
    Stage::Review => {
      if !draft.terms_accepted {
        issues.push(ValidationIssue::new("terms", "the distribution terms must be accepted"));
      }
    }
  }
  issues
}

/// Validación completa de un borrador.
///
/// Primero los flags de archivos; si alguno falla no se evalúa el resto.
pub fn validate_draft(draft: &SubmissionDraft) -> ValidationResult {
  let files = file_issues(draft);
  if !files.is_empty() {
    return ValidationResult::from_issues(files);
  }
  ValidationResult::from_issues(Stage::ALL.into_iter().flat_map(|s| stage_issues(draft, s)).collect())
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::Genre;
  use crate::format::wav::tests::wav_header;
  use crate::services::testing::{FakeProbe, complete_draft};

  fn validator(probe: FakeProbe) -> SubmissionValidator<FakeProbe> {
    SubmissionValidator::new(Arc::new(probe), ValidationRules::default())
  }

  fn wav(name: &str, size: u64) -> MediaFile {
    MediaFile::new(format!("/music/{name}"), "audio/wav", size)
  }

  #[tokio::test]
  async fn rejects_non_wav_before_reading() {
    let v = validator(FakeProbe::default());
    let mp3 = MediaFile::new("/music/song.mp3", "audio/mpeg", 5_000_000);
    let result = v.check_audio_file(&mp3).await;
    assert_eq!(result.reasons(), vec!["track \"song.mp3\": only WAV audio files are accepted"]);

    let renamed = MediaFile::new("/music/song.wav", "audio/mpeg", 5_000_000);
    assert!(!v.check_audio_file(&renamed).await.passed());
  }

  #[tokio::test]
  async fn enforces_size_bounds() {
    let v = validator(FakeProbe::default());
    let tiny = v.check_audio_file(&wav("tiny.wav", 999)).await;
    assert!(tiny.reasons()[0].contains("too small"));

    let huge = v.check_audio_file(&wav("huge.wav", 100 * MB + 1)).await;
    assert!(huge.reasons()[0].contains("exceeds the 100.0 MB limit"));

    assert!(v.check_audio_file(&wav("edge.wav", 100 * MB)).await.passed());
    assert!(v.check_audio_file(&wav("edge.wav", 1000)).await.passed());
  }

  #[tokio::test]
  async fn reports_wav_format_problem() {
    let v = validator(FakeProbe::default().with_header(wav_header(22_050, 16, None)));
    let result = v.check_audio_file(&wav("lofi.wav", 3 * MB)).await;
    assert_eq!(
      result.reasons(),
      vec!["track \"lofi.wav\": sample rate 22050 Hz is not supported (expected 44100 or 48000)"]
    );
  }

  #[tokio::test]
  async fn cover_checks_type_and_dimensions() {
    let v = validator(FakeProbe::default().with_image(2999, 3000));
    let png = MediaFile::new("/art/cover.png", "image/png", 10_000);
    assert_eq!(v.check_cover_file(&png).await.reasons(), vec!["cover art: only JPEG images are accepted"]);

    let jpg = MediaFile::new("/art/cover.jpg", "image/jpeg", 10_000);
    let result = v.check_cover_file(&jpg).await;
    assert!(result.reasons()[0].contains("2999x3000"));
  }

  #[tokio::test]
  async fn admit_tracks_is_all_or_nothing() {
    let probe = FakeProbe::default().with_header_for("/music/bad.wav", wav_header(44_100, 8, None));
    let v = validator(probe);
    let mut draft = SubmissionDraft::new();
    draft.release.artist = "Nadia".into();
    draft.release.primary_genre = Some(Genre::Electronic);

    let result = v.admit_tracks(&mut draft, vec![wav("good.wav", 2 * MB), wav("bad.wav", 2 * MB)]).await;
    assert!(!result.passed());
    assert!(draft.tracks.is_empty());

    let result = v.admit_tracks(&mut draft, vec![wav("one.wav", 2 * MB), wav("two.wav", 2 * MB)]).await;
    assert!(result.passed());
    let titles: Vec<_> = draft.tracks.iter().map(|t| t.title.as_str()).collect();
    assert_eq!(titles, vec!["one", "two"]);
    assert_eq!(draft.tracks[0].artist, "Nadia");
    assert_eq!(draft.tracks[0].primary_genre, Some(Genre::Electronic));
  }

  #[tokio::test]
  async fn attach_cover_returns_previous() {
    let v = validator(FakeProbe::default());
    let mut draft = SubmissionDraft::new();
    let first = MediaFile::new("/art/a.jpg", "image/jpeg", 10_000);
    let second = MediaFile::new("/art/b.jpg", "image/jpeg", 10_000);

    assert_eq!(v.attach_cover(&mut draft, first).await, Ok(None));
    let previous = v.attach_cover(&mut draft, second).await.unwrap().unwrap();
    assert_eq!(previous.file.file_name, "a.jpg");
    assert!(draft.cover.as_ref().unwrap().dimensions_valid);
  }

  #[test]
  fn missing_terms_alone_blocks_submission() {
    let v = validator(FakeProbe::default());
    let mut draft = complete_draft();
    assert!(v.validate_submission(&draft).passed());

    draft.terms_accepted = false;
    let result = v.validate_submission(&draft);
    assert!(!result.passed());
    assert_eq!(result.reasons().len(), 1);
    assert!(result.reasons()[0].contains("terms"));
  }

  #[test]
  fn empty_draft_lists_every_reason_in_stage_order() {
    let v = validator(FakeProbe::default());
    let result = v.validate_submission(&SubmissionDraft::new());
    let fields: Vec<_> = result.issues().iter().map(|i| i.field.as_str()).collect();
    assert_eq!(
      fields,
      vec![
        "release title",
        "release artist",
        "release date",
        "label",
        "℗ line",
        "© line",
        "primary genre",
        "tracks",
        "cover art",
        "distribution",
        "terms"
      ]
    );
  }

  #[test]
  fn file_flags_are_checked_before_submission_rules() {
    let v = validator(FakeProbe::default());
    let mut draft = complete_draft();
    draft.tracks[0].file = None;
    draft.terms_accepted = false;

    let result = v.validate_submission(&draft);
    assert_eq!(result.issues().len(), 1);
    assert_eq!(result.issues()[0].message, "audio file is missing");
  }

  #[test]
  fn navigation_gates_forward_only() {
    let v = validator(FakeProbe::default());
    let mut draft = complete_draft();
    draft.distribution_targets.clear();

    assert!(v.can_navigate(&draft, Stage::Release, Stage::Distribution));
    assert!(!v.can_navigate(&draft, Stage::Distribution, Stage::Review));
    assert!(v.can_navigate(&draft, Stage::Review, Stage::Release));
    assert_eq!(v.first_incomplete_stage(&draft), Some(Stage::Distribution));

    draft.release.title.clear();
    assert!(!v.can_navigate(&draft, Stage::Release, Stage::Tracks));
    assert!(v.can_navigate(&draft, Stage::Release, Stage::Release));
  }
}
