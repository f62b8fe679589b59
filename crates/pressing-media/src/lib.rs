//! Adaptadores de inspección de medios locales para `pressing-core`.

mod config;
mod file;
mod probe;

pub use config::MediaConfig;
pub use file::media_file_from_path;
pub use probe::LocalMediaProbe;
