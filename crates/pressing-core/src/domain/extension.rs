use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Valor de un campo de metadatos abierto.
///
/// Unión cerrada a propósito: los registros remotos aceptan campos extra,
/// pero sólo de estos cuatro tipos.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetadataValue {
  Flag(bool),
  Number(f64),
  Text(String),
  List(Vec<String>),
}

/// Campos de extensión clave → valor, ordenados por clave.
pub type MetadataBag = BTreeMap<String, MetadataValue>;

impl From<&str> for MetadataValue {
  fn from(s: &str) -> Self {
    MetadataValue::Text(s.to_string())
  }
}

impl From<String> for MetadataValue {
  fn from(s: String) -> Self {
    MetadataValue::Text(s)
  }
}

impl From<f64> for MetadataValue {
  fn from(n: f64) -> Self {
    MetadataValue::Number(n)
  }
}

impl From<bool> for MetadataValue {
  fn from(b: bool) -> Self {
    MetadataValue::Flag(b)
  }
}

impl From<Vec<String>> for MetadataValue {
  fn from(items: Vec<String>) -> Self {
    MetadataValue::List(items)
  }
}
