use async_trait::async_trait;

use crate::domain::{UploadPhase, UploadProgress};

/// Port de salida para que la UI siga un envío en curso.
#[async_trait]
pub trait ProgressReporter: Send + Sync {
  /// Inicio de la transferencia con el total de bytes a enviar.
  async fn start(&self, total_bytes: u64);
  async fn on_phase(&self, phase: UploadPhase);
  async fn on_progress(&self, progress: UploadProgress);
  /// Problemas no fatales (p. ej. fallo al registrar las pistas).
  async fn on_warning(&self, message: &str);
}
