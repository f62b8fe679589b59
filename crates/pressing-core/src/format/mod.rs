pub mod chunk_reader;
pub mod wav;

pub use chunk_reader::{ChunkReader, Chunks, RiffChunk};
pub use wav::{WavError, WavFormat, inspect_wav, is_compliant_wav};
