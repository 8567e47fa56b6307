//! Parsing and serialization of the INI-style config format.

pub mod ini;

// Re-export commonly used functions
pub use ini::{parse_ini_file, parse_ini_str, write_ini_file, write_ini_string};
