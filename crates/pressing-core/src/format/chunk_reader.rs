//! Lectura de campos de ancho fijo sobre un buffer de bytes.
//!
//! Todas las lecturas devuelven `Option`: leer fuera del buffer es `None`,
//! nunca un pánico.

/// Vista de solo lectura sobre un buffer, con acceso por offset.
#[derive(Debug, Clone, Copy)]
pub struct ChunkReader<'a> {
  buf: &'a [u8],
}

impl<'a> ChunkReader<'a> {
  pub fn new(buf: &'a [u8]) -> Self {
    Self { buf }
  }

  pub fn len(&self) -> usize {
    self.buf.len()
  }

  pub fn is_empty(&self) -> bool {
    self.buf.is_empty()
  }

  pub fn bytes(&self, offset: usize, len: usize) -> Option<&'a [u8]> {
    let end = offset.checked_add(len)?;
    self.buf.get(offset..end)
  }

  fn array<const N: usize>(&self, offset: usize) -> Option<[u8; N]> {
    self.bytes(offset, N)?.try_into().ok()
  }

  /// Etiqueta de 4 bytes (`RIFF`, `WAVE`, `fmt `...).
  pub fn tag(&self, offset: usize) -> Option<[u8; 4]> {
    self.array(offset)
  }

  pub fn tag_eq(&self, offset: usize, expected: &[u8; 4]) -> bool {
    self.tag(offset).is_some_and(|t| &t == expected)
  }

  pub fn u16_le(&self, offset: usize) -> Option<u16> {
    self.array(offset).map(u16::from_le_bytes)
  }

  pub fn u16_be(&self, offset: usize) -> Option<u16> {
    self.array(offset).map(u16::from_be_bytes)
  }

  pub fn u32_le(&self, offset: usize) -> Option<u32> {
    self.array(offset).map(u32::from_le_bytes)
  }

  pub fn u32_be(&self, offset: usize) -> Option<u32> {
    self.array(offset).map(u32::from_be_bytes)
  }

  /// Recorre pares `(id, tamaño)` a partir de `start`.
  ///
  /// Ver [`Chunks`] para las garantías de terminación.
  pub fn chunks(&self, start: usize, max_chunks: usize) -> Chunks<'a> {
    Chunks { reader: *self, offset: start, remaining: max_chunks, done: false }
  }
}

/// Cabecera de un sub-chunk RIFF.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RiffChunk {
  pub id: [u8; 4],
  /// Tamaño declarado del cuerpo (little-endian en el archivo).
  pub size: u32,
  /// Offset de la cabecera (`id`) dentro del buffer.
  pub offset: usize,
}

impl RiffChunk {
  pub const HEADER_LEN: usize = 8;

  /// Offset del primer byte del cuerpo.
  pub fn body_offset(&self) -> usize {
    self.offset + Self::HEADER_LEN
  }
}

/// Un chunk con tamaño 0 detiene el recorrido como malformado.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZeroSizedChunk {
  pub offset: usize,
}

/// Iterador perezoso sobre las cabeceras de chunk.
///
/// Termina cuando:
/// - la siguiente cabecera no cabe en el buffer,
/// - se alcanzó `max_chunks`,
/// - un chunk declara tamaño 0 (se emite `Err` y el iterador se agota),
/// - el siguiente offset desbordaría `usize`.
#[derive(Debug, Clone)]
pub struct Chunks<'a> {
  reader: ChunkReader<'a>,
  offset: usize,
  remaining: usize,
  done: bool,
}

impl Iterator for Chunks<'_> {
  type Item = Result<RiffChunk, ZeroSizedChunk>;

  fn next(&mut self) -> Option<Self::Item> {
    if self.done || self.remaining == 0 {
      return None;
    }
    self.remaining -= 1;

    let size_offset = self.offset.checked_add(4);
    let (Some(id), Some(size)) = (self.reader.tag(self.offset), size_offset.and_then(|o| self.reader.u32_le(o)))
    else {
      self.done = true;
      return None;
    };

    let chunk = RiffChunk { id, size, offset: self.offset };

    if size == 0 {
      self.done = true;
      return Some(Err(ZeroSizedChunk { offset: self.offset }));
    }

    match self.offset.checked_add(RiffChunk::HEADER_LEN).and_then(|o| o.checked_add(size as usize)) {
      Some(next) => self.offset = next,
      None => self.done = true,
    }

    Some(Ok(chunk))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn reads_both_endiannesses() {
    let buf = [0x01, 0x02, 0x03, 0x04];
    let r = ChunkReader::new(&buf);
    assert_eq!(r.u16_le(0), Some(0x0201));
    assert_eq!(r.u16_be(0), Some(0x0102));
    assert_eq!(r.u32_le(0), Some(0x0403_0201));
    assert_eq!(r.u32_be(0), Some(0x0102_0304));
  }

  #[test]
  fn out_of_bounds_reads_are_none() {
    let buf = [0u8; 6];
    let r = ChunkReader::new(&buf);
    assert_eq!(r.u32_le(3), None);
    assert_eq!(r.u16_le(5), None);
    assert_eq!(r.tag(usize::MAX - 1), None);
    assert!(r.bytes(6, 0).is_some());
  }

  #[test]
  fn walk_stops_at_buffer_end() {
    let mut buf = Vec::new();
    buf.extend_from_slice(b"abcd");
    buf.extend_from_slice(&4u32.to_le_bytes());
    buf.extend_from_slice(&[0; 4]);
    buf.extend_from_slice(b"efgh");
    buf.extend_from_slice(&1000u32.to_le_bytes());

    let ids: Vec<_> = ChunkReader::new(&buf).chunks(0, 16).map(|c| c.unwrap().id).collect();
    assert_eq!(ids, vec![*b"abcd", *b"efgh"]);
  }

  #[test]
  fn zero_sized_chunk_ends_walk_with_error() {
    let mut buf = Vec::new();
    buf.extend_from_slice(b"junk");
    buf.extend_from_slice(&0u32.to_le_bytes());
    buf.extend_from_slice(&[0; 32]);

    let items: Vec<_> = ChunkReader::new(&buf).chunks(0, 16).collect();
    assert_eq!(items, vec![Err(ZeroSizedChunk { offset: 0 })]);
  }

  #[test]
  fn walk_is_bounded_by_max_chunks() {
    let mut buf = Vec::new();
    for _ in 0..10 {
      buf.extend_from_slice(b"pad ");
      buf.extend_from_slice(&1u32.to_le_bytes());
      buf.push(0);
    }
    assert_eq!(ChunkReader::new(&buf).chunks(0, 3).count(), 3);
  }

  #[test]
  fn huge_declared_size_does_not_overflow() {
    let mut buf = Vec::new();
    buf.extend_from_slice(b"big ");
    buf.extend_from_slice(&u32::MAX.to_le_bytes());
    let items: Vec<_> = ChunkReader::new(&buf).chunks(0, 8).collect();
    assert_eq!(items.len(), 1);
  }
}
