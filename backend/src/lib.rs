mod config;
mod infrastructure;
mod manifest;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use pressing_core::cache::TtlCache;
use pressing_core::domain::{MediaFile, ValidationResult};
use pressing_core::services::{DraftCache, SubmissionFlow, SubmissionValidator, UploadOrchestrator};
use pressing_media::{LocalMediaProbe, MediaConfig, media_file_from_path};
use pressing_remote::{HttpReleaseRecords, HttpRemoteStorage, RemoteConfig};
use pressing_storage::{FileDraftStore, StorageConfig};

use crate::config::SubmissionConfig;
use crate::manifest::{Manifest, section_for};
use infrastructure::reporter::TracingReporter;

/// Type alias to simplify the generic signature of the flow.
type AppFlow = SubmissionFlow<LocalMediaProbe, HttpRemoteStorage, HttpReleaseRecords, TracingReporter, FileDraftStore>;

#[derive(Debug, Parser)]
#[command(name = "pressing", version, about = "Assemble, validate and submit music releases")]
struct Cli {
  #[command(subcommand)]
  command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
  /// Check a release manifest and save it as the current draft.
  Validate { manifest: PathBuf },

  /// Validate and upload a release manifest.
  Submit {
    manifest: PathBuf,

    /// Account that will own the artist and release records.
    #[arg(long)]
    user: String,

    #[arg(long, env = "PRESSING_TOKEN", hide_env_values = true)]
    token: String,
  },

  /// Inspect or discard the saved draft.
  Draft {
    #[command(subcommand)]
    action: DraftAction,
  },
}

impl Command {
  fn name(&self) -> &'static str {
    match self {
      Command::Validate { .. } => "validate",
      Command::Submit { .. } => "submit",
      Command::Draft { action: DraftAction::Show } => "draft show",
      Command::Draft { action: DraftAction::Clear } => "draft clear",
    }
  }
}

#[derive(Debug, Subcommand)]
enum DraftAction {
  Show,
  Clear,
}

fn init_tracing() {
  tracing_subscriber::registry()
    .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "pressing=info,pressing_lib=info,pressing_core=info".into()))
    .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
    .init();
}

/// Settings from every section of `pressing.toml`.
struct Settings {
  submission: SubmissionConfig,
  media: MediaConfig,
  remote: RemoteConfig,
  storage: StorageConfig,
}

impl Settings {
  fn load() -> Result<Self> {
    Ok(Self {
      submission: SubmissionConfig::load().context("loading [submission] config")?,
      media: MediaConfig::load().context("loading [media] config")?,
      remote: RemoteConfig::load().context("loading [remote] config")?,
      storage: StorageConfig::load().context("loading [storage] config")?,
    })
  }

  fn draft_cache(&self) -> DraftCache<FileDraftStore> {
    let store = Arc::new(FileDraftStore::from_config(&self.storage));
    DraftCache::with_options(store, &self.submission.draft_key, self.submission.quiet_window())
  }

  // --- Dependency Injection Phase ---
  fn flow(&self, bearer_token: &str) -> Result<AppFlow> {
    let probe = Arc::new(LocalMediaProbe::new(&self.media));
    let validator = SubmissionValidator::new(probe, self.submission.rules());

    let artists = Arc::new(TtlCache::new(self.remote.artist_cache_ttl()));
    let storage = Arc::new(HttpRemoteStorage::new(&self.remote)?);
    let records = Arc::new(HttpReleaseRecords::new(self.remote.clone(), bearer_token, artists)?);
    let orchestrator = UploadOrchestrator::new(storage, records, Arc::new(TracingReporter))
      .with_batch_timeout(self.submission.batch_timeout());

    Ok(SubmissionFlow::new(validator, orchestrator, self.draft_cache()))
  }
}

fn print_reasons(result: &ValidationResult) {
  for reason in result.reasons() {
    println!("  - {reason}");
  }
}

/// Builds the draft from the manifest through the same checks the form uses.
///
/// Returns the first file rejection, or the full submission check.
async fn assemble(flow: &mut AppFlow, manifest_path: &Path) -> Result<ValidationResult> {
  let (manifest, base) = Manifest::load(manifest_path)?;
  let release = manifest.release_metadata()?;
  flow.edit(|d| d.release = release);

  let mut files: Vec<MediaFile> = Vec::with_capacity(manifest.tracks.len());
  for path in manifest.track_paths(&base) {
    files.push(media_file_from_path(&path).await.with_context(|| format!("opening {}", path.display()))?);
  }
  let admitted = flow.attach_tracks(files).await;
  if !admitted.passed() {
    return Ok(admitted);
  }

  let mut section_error = None;
  flow.edit(|d| {
    for track in &mut d.tracks {
      let Some(file) = track.file.clone() else { continue };
      let Some(section) = section_for(&manifest.tracks, &base, &file) else { continue };
      if let Err(e) = section.apply_to(track) {
        section_error = Some(e.context(format!("track {}", file.file_name)));
        return;
      }
    }
    manifest.apply_selections(d);
  });
  if let Some(e) = section_error {
    return Err(e);
  }

  let cover_path = manifest.cover_path(&base);
  let cover = media_file_from_path(&cover_path).await.with_context(|| format!("opening {}", cover_path.display()))?;
  if let Err(rejected) = flow.attach_cover(cover).await {
    return Ok(rejected);
  }

  Ok(flow.validate())
}

async fn validate(settings: &Settings, manifest: &Path) -> Result<()> {
  let mut flow = settings.flow("")?;
  let result = assemble(&mut flow, manifest).await?;
  flow.flush().await.context("saving draft")?;

  if !result.passed() {
    println!("{} is not ready to submit:", manifest.display());
    print_reasons(&result);
    bail!("validation failed");
  }
  println!("{} is ready to submit", manifest.display());
  Ok(())
}

async fn submit(settings: &Settings, manifest: &Path, user: &str, token: &str) -> Result<()> {
  let mut flow = settings.flow(token)?;
  let result = assemble(&mut flow, manifest).await?;
  if !result.passed() {
    flow.flush().await.context("saving draft")?;
    println!("{} is not ready to submit:", manifest.display());
    print_reasons(&result);
    bail!("validation failed");
  }

  match flow.submit(user, token).await {
    Ok(receipt) => {
      println!("release {} created for artist {}", receipt.release_id, receipt.artist_id);
      if let Some(warning) = receipt.track_warning {
        println!("warning: {warning}");
      }
      Ok(())
    }
    Err(failure) => {
      flow.flush().await.context("saving draft")?;
      let hint = if failure.is_retryable() { " (the draft was kept; try again)" } else { "" };
      bail!("{failure}{hint}")
    }
  }
}

async fn draft(settings: &Settings, action: DraftAction) -> Result<()> {
  let cache = settings.draft_cache();
  match action {
    DraftAction::Show => match cache.load().await {
      Some(draft) => println!("{}", serde_json::to_string_pretty(&draft).context("rendering draft")?),
      None => println!("no saved draft"),
    },
    DraftAction::Clear => {
      cache.clear().await.context("clearing draft")?;
      println!("draft cleared");
    }
  }
  Ok(())
}

pub async fn run() -> Result<()> {
  init_tracing();
  let cli = Cli::parse();
  let settings = Settings::load()?;
  info!(command = cli.command.name(), "pressing starting");

  match cli.command {
    Command::Validate { manifest } => validate(&settings, &manifest).await,
    Command::Submit { manifest, user, token } => submit(&settings, &manifest, &user, &token).await,
    Command::Draft { action } => draft(&settings, action).await,
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use clap::CommandFactory;

  #[test]
  fn cli_definition_is_consistent() {
    Cli::command().debug_assert();
  }

  #[test]
  fn parses_submit_arguments() {
    let cli = Cli::try_parse_from(["pressing", "submit", "release.toml", "--user", "u-1", "--token", "t"]).unwrap();
    match cli.command {
      Command::Submit { manifest, user, token } => {
        assert_eq!(manifest, PathBuf::from("release.toml"));
        assert_eq!(user, "u-1");
        assert_eq!(token, "t");
      }
      other => panic!("unexpected command {other:?}"),
    }
  }
}
