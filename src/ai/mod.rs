//! Bot policies: pure strategies over an explicit game view. §4.7, §9.
pub mod advanced;
pub mod baseline;
pub mod registry;
pub mod trait_def;
