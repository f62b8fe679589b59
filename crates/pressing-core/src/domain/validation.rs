use std::fmt;

use serde::{Deserialize, Serialize};

/// Un motivo de rechazo asociado a un campo concreto del formulario.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
  /// Campo afectado (`"release title"`, `"track \"intro.wav\""`, `"terms"`...).
  pub field: String,
  pub message: String,
}

impl ValidationIssue {
  pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
    Self { field: field.into(), message: message.into() }
  }
}

impl fmt::Display for ValidationIssue {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}: {}", self.field, self.message)
  }
}

/// Resultado inmutable de una pasada de validación.
///
/// Pasa si y sólo si no hay motivos. Cada pasada produce uno nuevo.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
  issues: Vec<ValidationIssue>,
}

impl ValidationResult {
  pub fn pass() -> Self {
    Self::default()
  }

  pub fn fail(field: impl Into<String>, message: impl Into<String>) -> Self {
    Self { issues: vec![ValidationIssue::new(field, message)] }
  }

  pub fn from_issues(issues: Vec<ValidationIssue>) -> Self {
    Self { issues }
  }

  pub fn passed(&self) -> bool {
    self.issues.is_empty()
  }

  pub fn issues(&self) -> &[ValidationIssue] {
    &self.issues
  }

  /// Motivos legibles, en orden.
  pub fn reasons(&self) -> Vec<String> {
    self.issues.iter().map(ToString::to_string).collect()
  }
}

impl fmt::Display for ValidationResult {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if self.passed() {
      return write!(f, "ok");
    }
    write!(f, "{}", self.reasons().join("; "))
  }
}
