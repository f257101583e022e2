mod cli;
mod go_mod;

pub use cli::GoModCliDetectable;
pub use go_mod::GoModDetectable;
