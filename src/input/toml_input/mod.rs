//! The raw shape of a `details.toml` file.
//!
//! Every key is optional at this level, so that the validation in
//! [`crate::input::PersonConfig`] can report exactly which key is missing.

mod details;
mod labor;
mod person;

pub use details::*;
pub use labor::*;
pub use person::*;
