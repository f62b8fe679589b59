use serde::{Deserialize, Serialize};

use crate::domain::cover_art::CoverArt;
use crate::domain::ids::{DraftId, TrackId};
use crate::domain::release::ReleaseMetadata;
use crate::domain::track::Track;

/// Estado completo del formulario de envío.
///
/// Se hidrata desde la caché de borradores al arrancar, lo muta sólo el
/// hilo de la UI y se limpia tras un envío exitoso o un reinicio explícito.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubmissionDraft {
  pub id: DraftId,

  pub release: ReleaseMetadata,

  /// Pistas en orden de envío; la posición define el número de pista.
  pub tracks: Vec<Track>,

  pub cover: Option<CoverArt>,

  /// Plataformas de distribución seleccionadas.
  pub distribution_targets: Vec<String>,

  /// Territorios (códigos ISO 3166) donde se publicará.
  pub territories: Vec<String>,

  pub exclusive: bool,

  pub terms_accepted: bool,
}

impl SubmissionDraft {
  pub fn new() -> Self {
    Self::default()
  }

  /// Reemplaza la portada y devuelve la anterior para que el llamador
  /// libere su vista previa.
  pub fn replace_cover(&mut self, cover: CoverArt) -> Option<CoverArt> {
    self.cover.replace(cover)
  }

  pub fn remove_track(&mut self, id: TrackId) -> Option<Track> {
    let idx = self.tracks.iter().position(|t| t.id == id)?;
    Some(self.tracks.remove(idx))
  }

  /// Bytes que viajarán en la subida: portada + todas las pistas.
  pub fn total_upload_bytes(&self) -> u64 {
    let cover = self.cover.as_ref().map_or(0, |c| c.file.size_bytes);
    cover + self.tracks.iter().map(Track::size_bytes).sum::<u64>()
  }

  /// Vuelve al formulario vacío con un identificador nuevo.
  pub fn reset(&mut self) -> Option<CoverArt> {
    let previous_cover = self.cover.take();
    *self = Self::new();
    previous_cover
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::media_file::MediaFile;
  use crate::domain::track::TrackDuration;

  #[test]
  fn total_bytes_sums_cover_and_tracks() {
    let mut draft = SubmissionDraft::new();
    draft.replace_cover(CoverArt::new(MediaFile::new("/c.jpg", "image/jpeg", 500), true));
    draft.tracks.push(Track::from_file(MediaFile::new("/a.wav", "audio/wav", 1_000), TrackDuration::Unknown));
    draft.tracks.push(Track::from_file(MediaFile::new("/b.wav", "audio/wav", 2_000), TrackDuration::Unknown));

    assert_eq!(draft.total_upload_bytes(), 3_500);
  }

  #[test]
  fn replacing_cover_hands_back_previous() {
    let mut draft = SubmissionDraft::new();
    assert!(draft.replace_cover(CoverArt::new(MediaFile::new("/1.jpg", "image/jpeg", 1), true)).is_none());
    let old = draft.replace_cover(CoverArt::new(MediaFile::new("/2.jpg", "image/jpeg", 1), true)).unwrap();
    assert_eq!(old.file.file_name, "1.jpg");
  }

  #[test]
  fn reset_generates_new_identity() {
    let mut draft = SubmissionDraft::new();
    let before = draft.id;
    draft.release.title = "Old".into();
    draft.reset();
    assert_ne!(draft.id, before);
    assert!(draft.release.title.is_empty());
  }
}
