//! Adaptadores HTTP para el almacenamiento remoto y los registros de lanzamientos.

mod config;
mod error;
mod records;
mod storage;

pub use config::RemoteConfig;
pub use records::HttpReleaseRecords;
pub use storage::HttpRemoteStorage;
