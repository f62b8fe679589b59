use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tokio::io::AsyncReadExt;

fn tmp_path_for(path: &Path) -> PathBuf {
  path.with_extension("tmp")
}

/// Escritura atómica síncrona: se escribe a `<path>.tmp` y luego se renombra.
pub fn atomic_write_str(path: &Path, contents: &str) -> io::Result<()> {
  let tmp_path = tmp_path_for(path);

  {
    let mut tmp_file = fs::File::create(&tmp_path)?;
    tmp_file.write_all(contents.as_bytes())?;
    tmp_file.sync_all()?;
  }

  fs::rename(&tmp_path, path)?;
  Ok(())
}

/// Variante async de [`atomic_write_str`] para usar desde el runtime de Tokio.
///
/// Crea el directorio padre si no existe.
pub async fn atomic_write(path: &Path, contents: &[u8]) -> io::Result<()> {
  if let Some(parent) = path.parent() {
    tokio::fs::create_dir_all(parent).await?;
  }

  let tmp_path = tmp_path_for(path);

  {
    let mut tmp_file = tokio::fs::File::create(&tmp_path).await?;
    tokio::io::AsyncWriteExt::write_all(&mut tmp_file, contents).await?;
    tmp_file.sync_all().await?;
  }

  tokio::fs::rename(&tmp_path, path).await
}

/// Lee como máximo `max_len` bytes desde el inicio del archivo.
///
/// Si el archivo es más corto se devuelve lo que haya; nunca falla por EOF.
pub async fn read_head(path: &Path, max_len: usize) -> io::Result<Vec<u8>> {
  let file = tokio::fs::File::open(path).await?;
  let mut buf = Vec::with_capacity(max_len);
  file.take(max_len as u64).read_to_end(&mut buf).await?;
  Ok(buf)
}

/// Borra el archivo; que no exista no es un error.
pub async fn remove_if_exists(path: &Path) -> io::Result<()> {
  match tokio::fs::remove_file(path).await {
    Ok(()) => Ok(()),
    Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
    Err(e) => Err(e),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::tempdir;

  #[tokio::test]
  async fn read_head_truncates_to_requested_length() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("long.bin");
    std::fs::write(&path, vec![7u8; 4096]).unwrap();

    let head = read_head(&path, 1024).await.unwrap();
    assert_eq!(head.len(), 1024);

    let short = tmp.path().join("short.bin");
    std::fs::write(&short, [1u8, 2, 3]).unwrap();
    assert_eq!(read_head(&short, 1024).await.unwrap(), vec![1, 2, 3]);
  }

  #[tokio::test]
  async fn atomic_write_creates_parent_and_leaves_no_tmp() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("nested").join("draft.json");

    atomic_write(&path, b"{\"a\":1}").await.unwrap();

    assert_eq!(std::fs::read_to_string(&path).unwrap(), "{\"a\":1}");
    assert!(!tmp_path_for(&path).exists());
  }

  #[tokio::test]
  async fn remove_missing_file_is_ok() {
    let tmp = tempdir().unwrap();
    remove_if_exists(&tmp.path().join("nope.json")).await.unwrap();
  }
}
