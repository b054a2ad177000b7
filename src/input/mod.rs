mod config;
mod labor_entry;

pub mod toml_input;

pub use config::*;
pub use labor_entry::*;
