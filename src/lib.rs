//! Hammurabi - Ten-year kingdom stewardship simulation

pub mod core;
pub mod kingdom;
