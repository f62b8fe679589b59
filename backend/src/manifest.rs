use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use serde::Deserialize;

use pressing_core::domain::{Genre, MediaFile, MetadataBag, ReleaseMetadata, ReleaseType, SubmissionDraft, Track};

/// TOML description of a release, as written by the user.
///
/// Paths are resolved relative to the manifest's own directory.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
  pub release: ReleaseSection,
  pub cover: PathBuf,
  #[serde(default)]
  pub tracks: Vec<TrackSection>,
  #[serde(default)]
  pub distribution_targets: Vec<String>,
  #[serde(default)]
  pub territories: Vec<String>,
  #[serde(default)]
  pub exclusive: bool,
  #[serde(default)]
  pub terms_accepted: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReleaseSection {
  pub title: String,
  pub artist: String,
  pub release_type: Option<String>,
  pub primary_genre: Option<String>,
  pub secondary_genre: Option<String>,
  pub release_date: String,
  pub label: String,
  pub phonographic_line: String,
  pub copyright_line: String,
  pub upc: Option<String>,
  pub language: Option<String>,
  pub extra: MetadataBag,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TrackSection {
  pub path: PathBuf,
  pub title: Option<String>,
  #[serde(default)]
  pub explicit: bool,
  pub isrc: Option<String>,
  pub artist: Option<String>,
  pub featured_artist: Option<String>,
  pub primary_genre: Option<String>,
  pub secondary_genre: Option<String>,
  pub lyricist: Option<String>,
  pub composer: Option<String>,
  pub lyrics: Option<String>,
  /// Overrides the duration read from the file, in seconds.
  pub duration_secs: Option<u64>,
  #[serde(default)]
  pub extra: MetadataBag,
}

fn parse_genre(raw: Option<&str>) -> Result<Option<Genre>> {
  raw.map(|g| g.parse::<Genre>().map_err(|e| anyhow!(e))).transpose()
}

impl Manifest {
  pub fn load(path: &Path) -> Result<(Self, PathBuf)> {
    let raw = std::fs::read_to_string(path).with_context(|| format!("reading manifest {}", path.display()))?;
    let manifest: Manifest = toml::from_str(&raw).with_context(|| format!("parsing manifest {}", path.display()))?;
    let base = path.parent().map(Path::to_path_buf).unwrap_or_default();
    Ok((manifest, base))
  }

  pub fn release_metadata(&self) -> Result<ReleaseMetadata> {
    let r = &self.release;
    let release_type = match r.release_type.as_deref() {
      Some(raw) => raw.parse::<ReleaseType>().map_err(|e| anyhow!("release_type: {e}"))?,
      None => ReleaseType::default(),
    };
    Ok(ReleaseMetadata {
      title: r.title.clone(),
      artist: r.artist.clone(),
      release_type,
      primary_genre: parse_genre(r.primary_genre.as_deref()).context("release primary_genre")?,
      secondary_genre: parse_genre(r.secondary_genre.as_deref()).context("release secondary_genre")?,
      release_date: r.release_date.clone(),
      label: r.label.clone(),
      phonographic_line: r.phonographic_line.clone(),
      copyright_line: r.copyright_line.clone(),
      upc: r.upc.clone(),
      language: r.language.clone(),
      extra: r.extra.clone(),
    })
  }

  pub fn track_paths(&self, base: &Path) -> Vec<PathBuf> {
    self.tracks.iter().map(|t| base.join(&t.path)).collect()
  }

  pub fn cover_path(&self, base: &Path) -> PathBuf {
    base.join(&self.cover)
  }

  /// Copies the selections that live outside release metadata and tracks.
  pub fn apply_selections(&self, draft: &mut SubmissionDraft) {
    draft.distribution_targets = self.distribution_targets.clone();
    draft.territories = self.territories.clone();
    draft.exclusive = self.exclusive;
    draft.terms_accepted = self.terms_accepted;
  }
}

impl TrackSection {
  /// Applies the per-track fields over a track admitted from `self.path`.
  pub fn apply_to(&self, track: &mut Track) -> Result<()> {
    if let Some(title) = &self.title {
      track.title = title.clone();
    }
    if let Some(artist) = &self.artist {
      track.artist = artist.clone();
    }
    if let Some(genre) = parse_genre(self.primary_genre.as_deref()).context("track primary_genre")? {
      track.primary_genre = Some(genre);
    }
    track.secondary_genre = parse_genre(self.secondary_genre.as_deref()).context("track secondary_genre")?;
    if let Some(secs) = self.duration_secs {
      track.duration = pressing_core::domain::TrackDuration::Known(secs);
    }
    track.explicit = self.explicit;
    track.isrc = self.isrc.clone();
    track.featured_artist = self.featured_artist.clone();
    track.lyricist = self.lyricist.clone();
    track.composer = self.composer.clone();
    track.lyrics = self.lyrics.clone();
    track.extra = self.extra.clone();
    Ok(())
  }
}

/// Matches admitted tracks back to their manifest entries by path.
pub fn section_for<'a>(sections: &'a [TrackSection], base: &Path, file: &MediaFile) -> Option<&'a TrackSection> {
  sections.iter().find(|s| base.join(&s.path) == file.path)
}
