//! Per-ecosystem detectables: thin parsers of one manifest or lock-file
//! format each, plus the registry wiring them into the engine's rule set.

pub mod cargo;
pub mod factory;
pub mod gomod;
pub mod gradle;
pub mod maven;
pub mod npm;
pub mod pip;

pub use factory::{create_rules, DetectableFactory};
