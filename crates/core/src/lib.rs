#![forbid(unsafe_code)]

pub mod clock;
pub mod ids;
pub mod model;
pub mod sticker;
