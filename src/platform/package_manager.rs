use anyhow::{Context, Result};

use super::env::ProcessEnv;
use super::runner::{CommandRunner, Invocation};

/// Trait for package manager operations. Object-safe.
pub trait PackageManager {
    /// Check if this package manager is available in `env`.
    fn is_available(&self, env: &ProcessEnv) -> bool;

    /// Refresh package metadata (`brew update`, `apt update`).
    fn refresh(&self, runner: &dyn CommandRunner, env: &ProcessEnv) -> Result<()>;

    /// Install one or more packages in a single invocation.
    fn install(&self, runner: &dyn CommandRunner, env: &ProcessEnv, packages: &[&str])
        -> Result<()>;
}

// -------------------------------------------------------------------
// Homebrew
// -------------------------------------------------------------------

/// Homebrew, used on macOS. Runs as the current user; brew asks for a
/// password itself when it needs one.
pub struct Homebrew;

impl PackageManager for Homebrew {
    fn is_available(&self, env: &ProcessEnv) -> bool {
        env.command_exists("brew")
    }

    fn refresh(&self, runner: &dyn CommandRunner, env: &ProcessEnv) -> Result<()> {
        runner
            .run(&Invocation::new("brew", ["update"]), env)
            .context("brew update failed")?;
        Ok(())
    }

    fn install(
        &self,
        runner: &dyn CommandRunner,
        env: &ProcessEnv,
        packages: &[&str],
    ) -> Result<()> {
        let mut args = vec!["install"];
        args.extend_from_slice(packages);
        runner
            .run(&Invocation::new("brew", args), env)
            .with_context(|| format!("brew install {} failed", packages.join(" ")))?;
        Ok(())
    }
}

// -------------------------------------------------------------------
// Apt
// -------------------------------------------------------------------

/// Apt on Ubuntu (bare metal or WSL). Every call goes through `sudo`, which
/// prompts on the inherited terminal when credentials aren't cached.
pub struct Apt;

impl PackageManager for Apt {
    fn is_available(&self, env: &ProcessEnv) -> bool {
        env.command_exists("apt")
    }

    fn refresh(&self, runner: &dyn CommandRunner, env: &ProcessEnv) -> Result<()> {
        runner
            .run(&Invocation::new("sudo", ["apt", "update"]), env)
            .context("sudo apt update failed")?;
        Ok(())
    }

    fn install(
        &self,
        runner: &dyn CommandRunner,
        env: &ProcessEnv,
        packages: &[&str],
    ) -> Result<()> {
        let mut args = vec!["apt", "install", "-y"];
        args.extend_from_slice(packages);
        runner
            .run(&Invocation::new("sudo", args), env)
            .with_context(|| {
                format!(
                    "apt install failed. Run manually: sudo apt install -y {}",
                    packages.join(" ")
                )
            })?;
        Ok(())
    }
}

// -------------------------------------------------------------------
// Tests
// -------------------------------------------------------------------
