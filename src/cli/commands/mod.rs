//! CLI command modules

pub mod inspect;
pub mod patch;
