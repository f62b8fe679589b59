use std::fmt;

use serde::{Deserialize, Serialize};

/// Porcentaje de avance de un envío (0–100).
///
/// Dentro de una misma ejecución sólo puede crecer; `reset` lo devuelve a 0
/// al empezar la siguiente.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UploadProgress(u8);

impl UploadProgress {
  pub const MAX: u8 = 100;

  pub fn percent(&self) -> u8 {
    self.0
  }

  pub fn reset(&mut self) {
    self.0 = 0;
  }

  /// Avanza hasta `percent` (saturado a 100). Valores menores se ignoran.
  ///
  /// Devuelve `true` si el valor cambió.
  pub fn advance_to(&mut self, percent: u8) -> bool {
    let next = percent.min(Self::MAX);
    if next > self.0 {
      self.0 = next;
      true
    } else {
      false
    }
  }

  pub fn is_complete(&self) -> bool {
    self.0 == Self::MAX
  }
}

impl fmt::Display for UploadProgress {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}%", self.0)
  }
}

/// Fases del orquestador de subida.
///
/// `Idle → Validating → Uploading → CreatingRecords → Succeeded | Failed`.
/// Desde cualquier fase activa se puede caer a `Failed`; desde las finales
/// sólo se vuelve a `Validating` (nueva ejecución).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UploadPhase {
  #[default]
  Idle,
  Validating,
  Uploading,
  CreatingRecords,
  Succeeded,
  Failed,
}

impl UploadPhase {
  pub fn can_transition_to(self, next: UploadPhase) -> bool {
    use UploadPhase::*;
    matches!(
      (self, next),
      (Idle | Succeeded | Failed, Validating)
        | (Validating, Uploading)
        | (Uploading, CreatingRecords)
        | (CreatingRecords, Succeeded)
        | (Validating | Uploading | CreatingRecords, Failed)
    )
  }

  pub fn is_active(self) -> bool {
    matches!(self, UploadPhase::Validating | UploadPhase::Uploading | UploadPhase::CreatingRecords)
  }
}

impl fmt::Display for UploadPhase {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let text = match self {
      UploadPhase::Idle => "idle",
      UploadPhase::Validating => "validating",
      UploadPhase::Uploading => "uploading",
      UploadPhase::CreatingRecords => "creating records",
      UploadPhase::Succeeded => "succeeded",
      UploadPhase::Failed => "failed",
    };
    f.write_str(text)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn progress_never_decreases_within_a_run() {
    let mut p = UploadProgress::default();
    assert!(p.advance_to(50));
    assert!(!p.advance_to(10));
    assert_eq!(p.percent(), 50);
    assert!(p.advance_to(250));
    assert!(p.is_complete());
    p.reset();
    assert_eq!(p.percent(), 0);
  }

  #[test]
  fn phase_machine_rejects_skips() {
    assert!(UploadPhase::Idle.can_transition_to(UploadPhase::Validating));
    assert!(!UploadPhase::Idle.can_transition_to(UploadPhase::Uploading));
    assert!(!UploadPhase::Validating.can_transition_to(UploadPhase::Succeeded));
    assert!(UploadPhase::Uploading.can_transition_to(UploadPhase::Failed));
    assert!(!UploadPhase::Succeeded.can_transition_to(UploadPhase::Failed));
    assert!(UploadPhase::Failed.can_transition_to(UploadPhase::Validating));
  }
}
