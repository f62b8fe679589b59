//! Validación del contenedor RIFF/WAVE a partir de los primeros bytes del archivo.

use thiserror::Error;

use super::chunk_reader::{ChunkReader, RiffChunk};

const RIFF_TAG: &[u8; 4] = b"RIFF";
const WAVE_TAG: &[u8; 4] = b"WAVE";
const FMT_TAG: &[u8; 4] = b"fmt ";

/// Los sub-chunks empiezan tras `RIFF<size>WAVE`.
const FIRST_CHUNK_OFFSET: usize = 12;
/// Más que suficiente para un header de 1 KiB; acota el recorrido.
const MAX_CHUNKS: usize = 64;

// Offsets relativos al inicio del cuerpo del chunk `fmt `.
const FMT_SAMPLE_RATE: usize = 4;
const FMT_BITS_PER_SAMPLE: usize = 14;
/// Cuerpo mínimo de un `fmt ` PCM.
const FMT_MIN_BODY: usize = 16;

pub const ACCEPTED_SAMPLE_RATES: [u32; 2] = [44_100, 48_000];
pub const ACCEPTED_BIT_DEPTHS: [u16; 2] = [16, 24];

/// Cantidad de bytes iniciales que bastan para validar un WAV.
pub const HEADER_PROBE_LEN: usize = 1024;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WavError {
  #[error("missing RIFF header")]
  NotRiff,
  #[error("RIFF container is not WAVE")]
  NotWave,
  #[error("malformed chunk of size 0 at byte {0}")]
  ZeroSizedChunk(usize),
  #[error("no fmt chunk found in file header")]
  MissingFmtChunk,
  #[error("fmt chunk is truncated")]
  TruncatedFmtChunk,
  #[error("sample rate {0} Hz is not supported (expected 44100 or 48000)")]
  UnsupportedSampleRate(u32),
  #[error("bit depth {0} is not supported (expected 16 or 24)")]
  UnsupportedBitDepth(u16),
}

/// Campos del chunk `fmt ` que nos interesan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavFormat {
  pub sample_rate_hz: u32,
  pub bits_per_sample: u16,
}

/// Inspecciona el header y devuelve el formato si cumple los requisitos.
///
/// Función pura: no hace I/O y nunca entra en pánico, sea cual sea el buffer.
pub fn inspect_wav(buf: &[u8]) -> Result<WavFormat, WavError> {
  let reader = ChunkReader::new(buf);

  if !reader.tag_eq(0, RIFF_TAG) {
    return Err(WavError::NotRiff);
  }
  if !reader.tag_eq(8, WAVE_TAG) {
    return Err(WavError::NotWave);
  }

  let fmt = find_fmt_chunk(&reader)?;
  if (fmt.size as usize) < FMT_MIN_BODY {
    return Err(WavError::TruncatedFmtChunk);
  }
  // Las lecturas no pueden salir del cuerpo declarado del chunk.
  let body = reader.bytes(fmt.body_offset(), FMT_MIN_BODY).map(ChunkReader::new).ok_or(WavError::TruncatedFmtChunk)?;

  let sample_rate_hz = body.u32_le(FMT_SAMPLE_RATE).ok_or(WavError::TruncatedFmtChunk)?;
  let bits_per_sample = body.u16_le(FMT_BITS_PER_SAMPLE).ok_or(WavError::TruncatedFmtChunk)?;

  if !ACCEPTED_SAMPLE_RATES.contains(&sample_rate_hz) {
    return Err(WavError::UnsupportedSampleRate(sample_rate_hz));
  }
  if !ACCEPTED_BIT_DEPTHS.contains(&bits_per_sample) {
    return Err(WavError::UnsupportedBitDepth(bits_per_sample));
  }

  Ok(WavFormat { sample_rate_hz, bits_per_sample })
}

fn find_fmt_chunk(reader: &ChunkReader<'_>) -> Result<RiffChunk, WavError> {
  for chunk in reader.chunks(FIRST_CHUNK_OFFSET, MAX_CHUNKS) {
    let chunk = chunk.map_err(|z| WavError::ZeroSizedChunk(z.offset))?;
    if &chunk.id == FMT_TAG {
      return Ok(chunk);
    }
  }
  Err(WavError::MissingFmtChunk)
}

pub fn is_compliant_wav(buf: &[u8]) -> bool {
  inspect_wav(buf).is_ok()
}
