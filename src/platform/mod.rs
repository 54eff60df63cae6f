pub mod detection;
pub mod env;
pub mod package_manager;
pub mod runner;

pub use detection::{detect_environment, Environment};
pub use env::ProcessEnv;
pub use package_manager::{Apt, Homebrew, PackageManager};
pub use runner::{CommandRunner, Invocation, SystemRunner};

#[cfg(test)]
pub use runner::CommandOutput;
