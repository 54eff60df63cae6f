pub mod bootstrap;
pub mod demo;
pub mod guidance;
pub mod output;
pub mod picker;
pub mod prompt;
pub mod setup;
pub mod signal;

use std::path::PathBuf;

use clap::Parser;

use crate::config::SetupConfig;
use crate::platform::CommandRunner;

/// Interactive installer for pyenv, pyenv-virtualenv and a CPython version
#[derive(Parser)]
#[command(name = "pyenv-setup", version, about, long_about = None)]
pub struct Cli {
    /// Logging verbosity for stderr: off, error, warn, info, debug.
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to the configuration file.
    #[arg(long, env = "PYENV_SETUP_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Shared collaborators for one run.
pub struct Context<'a> {
    pub runner: &'a dyn CommandRunner,
    pub config: &'a SetupConfig,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn about_comes_from_doc_comment() {
        let about = Cli::command()
            .get_about()
            .map(|s| s.to_string())
            .unwrap_or_default();
        assert!(about.starts_with("Interactive installer for pyenv"), "{about}");
    }
}
