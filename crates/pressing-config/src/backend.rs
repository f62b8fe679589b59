use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;
use toml_edit::{DocumentMut, Item};

use crate::paths::{ConfigError, PressingPaths};

/// Acceso por secciones (`[submission]`, `[remote]`, ...) al archivo de configuración.
pub trait ConfigBackend {
  fn load_section<T: DeserializeOwned>(&self, section: &str) -> Result<T, ConfigError>;
  fn save_section<T: Serialize>(&self, section: &str, value: &T) -> Result<(), ConfigError>;

  /// Carga la sección o su `Default` si falta, y la reescribe para que el
  /// usuario vea todas las claves disponibles.
  fn load_or_init_section<T>(&self, section: &str) -> Result<T, ConfigError>
  where
    T: DeserializeOwned + Serialize + Default;
}

pub struct TomlConfigBackend {
  paths: PressingPaths,
}

impl TomlConfigBackend {
  pub fn new(paths: PressingPaths) -> Self {
    Self { paths }
  }

  pub fn paths(&self) -> &PressingPaths {
    &self.paths
  }

  pub fn load_section_with_default<T>(&self, section: &str) -> Result<T, ConfigError>
  where
    T: DeserializeOwned + Default,
  {
    let Some(root) = read_root(&self.paths.config_file())? else {
      return Ok(T::default());
    };

    match root.get(section) {
      Some(table) => decode_section(section, table),
      None => Ok(T::default()),
    }
  }
}

/// `None` cuando el archivo todavía no existe.
fn read_root(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
  match fs::read_to_string(path) {
    Ok(content) => Ok(Some(toml::from_str(&content)?)),
    Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
    Err(e) => Err(e.into()),
  }
}

fn decode_section<T: DeserializeOwned>(section: &str, table: &toml::Value) -> Result<T, ConfigError> {
  table.clone().try_into().map_err(|e| ConfigError::Other(format!("decode section [{section}]: {e}")))
}

impl ConfigBackend for TomlConfigBackend {
  fn load_section<T: DeserializeOwned>(&self, section: &str) -> Result<T, ConfigError> {
    let path = self.paths.config_file();
    let root = read_root(&path)?.ok_or_else(|| ConfigError::Other(format!("missing config file {:?}", path)))?;

    let table =
      root.get(section).ok_or_else(|| ConfigError::Other(format!("missing section [{section}] in {:?}", path)))?;

    decode_section(section, table)
  }

  fn save_section<T: Serialize>(&self, section: &str, value: &T) -> Result<(), ConfigError> {
    let path = self.paths.config_file();

    // toml_edit conserva comentarios y orden del resto del documento.
    let mut doc: DocumentMut = match fs::read_to_string(&path) {
      Ok(content) => {
        content.parse::<DocumentMut>().map_err(|e| ConfigError::Other(format!("parse toml_edit doc: {e}")))?
      }
      Err(e) if e.kind() == ErrorKind::NotFound => DocumentMut::new(),
      Err(e) => return Err(e.into()),
    };

    let section_str =
      toml::to_string(value).map_err(|e| ConfigError::Other(format!("encode section [{section}]: {e}")))?;

    let section_item: Item = section_str
      .parse::<DocumentMut>()
      .map_err(|e| ConfigError::Other(format!("parse section as doc: {e}")))?
      .into_item();

    doc[section] = section_item;

    pressing_fs::atomic_write_str(&path, &doc.to_string())?;

    Ok(())
  }

  fn load_or_init_section<T>(&self, section: &str) -> Result<T, ConfigError>
  where
    T: DeserializeOwned + Serialize + Default,
  {
    let cfg: T = self.load_section_with_default(section)?;
    self.save_section(section, &cfg)?;
    Ok(cfg)
  }
}
