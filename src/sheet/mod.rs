//! Writing a [`crate::input::PersonConfig`] into the timesheet template.

mod cell;
mod filler;
mod layout;

pub use cell::*;
pub use filler::*;
pub use layout::*;
