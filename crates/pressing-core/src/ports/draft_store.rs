use async_trait::async_trait;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
  #[error("io error: {0}")]
  Io(String),

  #[error("storage error: {0}")]
  Storage(String),
}

/// Almacén clave → valor opaco donde se persisten los borradores.
///
/// El contenido puede desaparecer desde fuera (usuario que borra la caché):
/// `get` devuelve `None` en ese caso, no un error.
#[async_trait]
pub trait DraftStore: Send + Sync {
  async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
  async fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
  /// Idempotente: borrar una clave inexistente no es un error.
  async fn remove(&self, key: &str) -> Result<(), StoreError>;
}
