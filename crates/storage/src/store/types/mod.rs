#![forbid(unsafe_code)]

mod catalog;
mod directory;

pub use catalog::*;
pub use directory::*;
