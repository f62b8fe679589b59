use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Formato comercial del lanzamiento que se envía.
///
/// Los servicios de distribución suelen aceptar sólo estos tres más
/// compilaciones; cualquier otra etiqueta se conserva en [`ReleaseType::Custom`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReleaseType {
  Album,
  EP,
  #[default]
  Single,
  Compilation,
  /// Valor no estándar definido por el usuario.
  Custom(String),
}

impl FromStr for ReleaseType {
  type Err = std::convert::Infallible;

  /// Parsear nunca falla: lo desconocido termina en `Custom`.
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let normalized = s.trim().to_lowercase();

    let rt = match normalized.as_str() {
      "album" | "lp" => ReleaseType::Album,
      "ep" => ReleaseType::EP,
      "single" => ReleaseType::Single,
      "compilation" => ReleaseType::Compilation,
      _ => ReleaseType::Custom(s.trim().to_string()),
    };

    Ok(rt)
  }
}

impl fmt::Display for ReleaseType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ReleaseType::Album => write!(f, "Album"),
      ReleaseType::EP => write!(f, "EP"),
      ReleaseType::Single => write!(f, "Single"),
      ReleaseType::Compilation => write!(f, "Compilation"),
      ReleaseType::Custom(s) => write!(f, "{s}"),
    }
  }
}
