pub mod cache;
pub mod domain;
pub mod errors;
pub mod format;
pub mod ports;
pub mod services;

pub use errors::CoreError;
