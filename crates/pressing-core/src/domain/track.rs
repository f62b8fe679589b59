use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::extension::MetadataBag;
use crate::domain::genre::Genre;
use crate::domain::ids::TrackId;
use crate::domain::media_file::MediaFile;

/// Duración de una pista tal como la conoce el cliente.
///
/// `Unknown` significa "no se pudo leer": se muestra como `0:00` y queda
/// marcada para revisión, pero no se confunde con una duración real de cero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrackDuration {
  /// Segundos enteros, redondeados.
  Known(u64),
  #[default]
  Unknown,
}

impl TrackDuration {
  pub fn from_secs_f64(secs: f64) -> Self {
    if secs.is_finite() && secs >= 0.0 { TrackDuration::Known(secs.round() as u64) } else { TrackDuration::Unknown }
  }

  /// Valor enviado a los registros remotos; `Unknown` cuenta como 0.
  pub fn seconds(&self) -> u64 {
    match self {
      TrackDuration::Known(s) => *s,
      TrackDuration::Unknown => 0,
    }
  }

  pub fn is_known(&self) -> bool {
    matches!(self, TrackDuration::Known(_))
  }

  /// La UI debería invitar a editarla a mano.
  pub fn needs_review(&self) -> bool {
    !self.is_known()
  }
}

impl fmt::Display for TrackDuration {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let secs = self.seconds();
    write!(f, "{}:{:02}", secs / 60, secs % 60)
  }
}

/// Una pista del lanzamiento en preparación.
///
/// Se crea cuando el validador acepta su archivo y se destruye al quitarla
/// de la lista o al reiniciar el formulario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
  pub id: TrackId,

  /// Título visible; inicialmente el nombre del archivo sin extensión.
  pub title: String,

  /// Archivo de audio. `None` una vez subido o si se perdió el acceso.
  pub file: Option<MediaFile>,

  pub duration: TrackDuration,

  /// Contenido explícito (parental advisory).
  #[serde(default)]
  pub explicit: bool,

  /// International Standard Recording Code, si ya existe.
  #[serde(default)]
  pub isrc: Option<String>,

  #[serde(default)]
  pub artist: String,

  #[serde(default)]
  pub featured_artist: Option<String>,

  #[serde(default)]
  pub primary_genre: Option<Genre>,

  #[serde(default)]
  pub secondary_genre: Option<Genre>,

  #[serde(default)]
  pub lyricist: Option<String>,

  #[serde(default)]
  pub composer: Option<String>,

  #[serde(default)]
  pub lyrics: Option<String>,

  /// Campos extra reenviados tal cual al registro remoto.
  #[serde(default)]
  pub extra: MetadataBag,
}

impl Track {
  pub fn from_file(file: MediaFile, duration: TrackDuration) -> Self {
    Self {
      id: TrackId::new(),
      title: file.stem(),
      file: Some(file),
      duration,
      explicit: false,
      isrc: None,
      artist: String::new(),
      featured_artist: None,
      primary_genre: None,
      secondary_genre: None,
      lyricist: None,
      composer: None,
      lyrics: None,
      extra: MetadataBag::new(),
    }
  }

  pub fn size_bytes(&self) -> u64 {
    self.file.as_ref().map_or(0, |f| f.size_bytes)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn unknown_duration_renders_as_zero_but_is_flagged() {
    assert_eq!(TrackDuration::Unknown.to_string(), "0:00");
    assert!(TrackDuration::Unknown.needs_review());
    assert!(!TrackDuration::Known(0).needs_review());
    assert_eq!(TrackDuration::Known(0).to_string(), "0:00");
  }

  #[test]
  fn durations_round_to_whole_seconds() {
    assert_eq!(TrackDuration::from_secs_f64(185.5), TrackDuration::Known(186));
    assert_eq!(TrackDuration::from_secs_f64(185.4), TrackDuration::Known(185));
    assert_eq!(TrackDuration::from_secs_f64(f64::NAN), TrackDuration::Unknown);
    assert_eq!(TrackDuration::Known(186).to_string(), "3:06");
  }

  #[test]
  fn title_comes_from_file_stem() {
    let track = Track::from_file(MediaFile::new("/tmp/Intro.wav", "audio/wav", 2048), TrackDuration::Known(60));
    assert_eq!(track.title, "Intro");
    assert_eq!(track.size_bytes(), 2048);
  }
}
