//! Core building blocks shared across bomscan crates: the filesystem
//! abstraction, the dependency graph model, executable resolution, and the
//! exit-code taxonomy.

pub mod executable;
pub mod exit_code;
pub mod fs;
pub mod graph;

pub use exit_code::ExitCodeType;
