pub mod io;

pub use io::{atomic_write, atomic_write_str, read_head, remove_if_exists};
