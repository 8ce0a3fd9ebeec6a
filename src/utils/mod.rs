//! Utility modules

pub mod encoding;
pub mod time;
