use async_trait::async_trait;
use pressing_core::domain::{UploadPhase, UploadProgress};
use pressing_core::ports::ProgressReporter;
use tracing::{info, warn};

/// A `ProgressReporter` that turns orchestrator events into log lines.
///
/// The CLI has no progress bar; the subscriber installed in `run` decides
/// where these events end up.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

#[async_trait]
impl ProgressReporter for TracingReporter {
  async fn start(&self, total_bytes: u64) {
    info!(total_bytes, "submission transfer starting");
  }

  async fn on_phase(&self, phase: UploadPhase) {
    info!(%phase, "submission phase");
  }

  async fn on_progress(&self, progress: UploadProgress) {
    info!(%progress, "submission progress");
  }

  async fn on_warning(&self, message: &str) {
    warn!(message, "submission warning");
  }
}
