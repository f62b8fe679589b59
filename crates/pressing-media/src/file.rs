use std::path::Path;

use pressing_core::domain::MediaFile;
use pressing_core::ports::MediaError;

/// Construye el handle de un archivo local: MIME por extensión y tamaño real.
pub async fn media_file_from_path(path: impl AsRef<Path>) -> Result<MediaFile, MediaError> {
  let path = path.as_ref();
  let meta = tokio::fs::metadata(path).await.map_err(|e| MediaError::Io(format!("{}: {e}", path.display())))?;
  if !meta.is_file() {
    return Err(MediaError::Unsupported(format!("{} is not a regular file", path.display())));
  }

  let mime = mime_guess::from_path(path).first_or_octet_stream();
  Ok(MediaFile::new(path, mime.essence_str(), meta.len()))
}
