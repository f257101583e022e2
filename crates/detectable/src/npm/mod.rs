//! npm detectables: package.json parse, package-lock.json parse, and the
//! `npm ls` CLI variant.

mod cli;
mod package_json;
mod package_lock;

pub use cli::NpmCliDetectable;
pub use package_json::PackageJsonDetectable;
pub use package_lock::PackageLockDetectable;
