pub mod shell_rc;
pub mod version;

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};

use crate::platform::{CommandRunner, Invocation, ProcessEnv};

pub use version::PythonVersion;

/// What happened when a version was requested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallAction {
    /// Already present in `pyenv versions --bare`; nothing was run.
    AlreadyInstalled,
    /// Newly installed.
    Installed,
    /// Installation failed.
    Failed(String),
}

/// Thin wrapper over the `pyenv` CLI, bound to one environment snapshot.
pub struct PyenvManager<'a> {
    runner: &'a dyn CommandRunner,
    env: &'a ProcessEnv,
}

impl<'a> PyenvManager<'a> {
    pub fn new(runner: &'a dyn CommandRunner, env: &'a ProcessEnv) -> Self {
        Self { runner, env }
    }

    /// Check if pyenv is on the snapshot's `PATH`.
    pub fn is_available(&self) -> bool {
        self.env.command_exists("pyenv")
    }

    /// Probe for the pyenv-virtualenv plugin. Any failure, including pyenv
    /// itself being missing, counts as "not available".
    pub fn has_virtualenv(&self) -> bool {
        let probe = Invocation::new("pyenv", ["virtualenv", "--help"])
            .capture()
            .unchecked();
        match self.runner.run(&probe, self.env) {
            Ok(out) => {
                tracing::debug!(code = ?out.code, "pyenv virtualenv probe finished");
                out.success
            }
            Err(e) => {
                tracing::debug!(error = %e, "pyenv virtualenv probe failed");
                false
            }
        }
    }

    /// Raw `pyenv install --list` output.
    pub fn install_list(&self) -> Result<String> {
        let out = self
            .runner
            .run(&Invocation::new("pyenv", ["install", "--list"]).capture(), self.env)
            .context("failed to list versions from pyenv")?;
        Ok(out.stdout)
    }

    /// Versions pyenv already has. Empty when the listing fails.
    pub fn installed_versions(&self) -> HashSet<String> {
        self.bare_listing(&["versions", "--bare"])
    }

    /// Virtualenvs created by pyenv-virtualenv. Empty when the listing fails.
    pub fn virtualenvs(&self) -> HashSet<String> {
        self.bare_listing(&["virtualenvs", "--bare"])
    }

    pub fn install(&self, version: &PythonVersion) -> Result<()> {
        self.runner
            .run(&Invocation::new("pyenv", ["install", version.as_str()]), self.env)
            .with_context(|| format!("pyenv failed to install Python {}", version))?;
        Ok(())
    }

    pub fn set_global(&self, version: &PythonVersion) -> Result<()> {
        self.runner
            .run(&Invocation::new("pyenv", ["global", version.as_str()]), self.env)
            .context("failed to set global pyenv version")?;
        Ok(())
    }

    pub fn create_virtualenv(&self, version: &PythonVersion, name: &str) -> Result<()> {
        self.runner
            .run(
                &Invocation::new("pyenv", ["virtualenv", version.as_str(), name]),
                self.env,
            )
            .context("failed to create virtualenv via pyenv-virtualenv")?;
        Ok(())
    }

    /// Pin `dir` to `name` by writing its `.python-version`.
    pub fn set_local(&self, dir: &Path, name: &str) -> Result<()> {
        self.runner
            .run(
                &Invocation::new("pyenv", ["local", name]).current_dir(dir),
                self.env,
            )
            .with_context(|| format!("failed to set local pyenv version in {}", dir.display()))?;
        Ok(())
    }

    /// Install `version` unless pyenv already has it. Never returns an
    /// error; failures come back as [`InstallAction::Failed`].
    pub fn ensure_installed(&self, version: &PythonVersion) -> InstallAction {
        if self.installed_versions().contains(version.as_str()) {
            return InstallAction::AlreadyInstalled;
        }
        match self.install(version) {
            Ok(()) => InstallAction::Installed,
            Err(e) => InstallAction::Failed(format!("{e:#}")),
        }
    }

    fn bare_listing(&self, args: &[&str]) -> HashSet<String> {
        let inv = Invocation::new("pyenv", args.iter().copied()).capture();
        match self.runner.run(&inv, self.env) {
            Ok(out) => out
                .stdout
                .lines()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .map(str::to_string)
                .collect(),
            Err(e) => {
                tracing::debug!(command = %inv.display(), error = %e, "listing failed");
                HashSet::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::runner::testing::FakeRunner;
    use crate::platform::CommandOutput;

    fn version(s: &str) -> PythonVersion {
        s.parse().expect("valid version")
    }

    #[test]
    fn already_installed_short_circuits() {
        let runner = FakeRunner::new(|inv: &Invocation, _: &ProcessEnv| {
            if inv.display() == "pyenv versions --bare" {
                CommandOutput::ok("3.11.9\n3.12.4\ndemo-env\n")
            } else {
                CommandOutput::ok("")
            }
        });
        let env = ProcessEnv::default();
        let pyenv = PyenvManager::new(&runner, &env);

        assert_eq!(
            pyenv.ensure_installed(&version("3.12.4")),
            InstallAction::AlreadyInstalled
        );
        assert_eq!(runner.calls(), ["pyenv versions --bare"]);
        assert!(!runner.ran("pyenv install 3.12.4"));
    }

    #[test]
    fn missing_version_is_installed() {
        let runner = FakeRunner::new(|inv: &Invocation, _: &ProcessEnv| {
            if inv.display() == "pyenv versions --bare" {
                CommandOutput::ok("3.11.9\n")
            } else {
                CommandOutput::ok("")
            }
        });
        let env = ProcessEnv::default();
        let pyenv = PyenvManager::new(&runner, &env);

        assert_eq!(
            pyenv.ensure_installed(&version("3.12.4")),
            InstallAction::Installed
        );
        assert!(runner.ran("pyenv install 3.12.4"));
    }

    #[test]
    fn failed_listing_still_attempts_install() {
        let runner = FakeRunner::new(|inv: &Invocation, _: &ProcessEnv| {
            if inv.args().first().map(String::as_str) == Some("versions") {
                CommandOutput::failed(1)
            } else {
                CommandOutput::ok("")
            }
        });
        let env = ProcessEnv::default();
        let pyenv = PyenvManager::new(&runner, &env);
        assert_eq!(
            pyenv.ensure_installed(&version("3.13.0")),
            InstallAction::Installed
        );
    }

    #[test]
    fn failed_install_is_reported_not_raised() {
        let runner = FakeRunner::new(|inv: &Invocation, _: &ProcessEnv| {
            if inv.display() == "pyenv install 3.12.4" {
                CommandOutput::failed(1)
            } else {
                CommandOutput::ok("")
            }
        });
        let env = ProcessEnv::default();
        let pyenv = PyenvManager::new(&runner, &env);
        match pyenv.ensure_installed(&version("3.12.4")) {
            InstallAction::Failed(msg) => assert!(msg.contains("3.12.4"), "{msg}"),
            other => panic!("expected failure, got {other:?}"),
        }
    }

    #[test]
    fn virtualenv_probe_uses_exit_status() {
        let env = ProcessEnv::default();
        let present = FakeRunner::new(|_: &Invocation, _: &ProcessEnv| CommandOutput::ok("Usage"));
        let absent = FakeRunner::new(|_: &Invocation, _: &ProcessEnv| CommandOutput::failed(1));
        assert!(PyenvManager::new(&present, &env).has_virtualenv());
        assert!(!PyenvManager::new(&absent, &env).has_virtualenv());
        assert_eq!(present.calls(), ["pyenv virtualenv --help"]);
    }

    #[test]
    fn set_local_runs_in_directory() {
        let dir = tempfile::tempdir().expect("tempdir");
        let expected = dir.path().to_path_buf();
        let runner = FakeRunner::new(move |inv: &Invocation, _: &ProcessEnv| {
            assert_eq!(inv.cwd(), Some(expected.as_path()));
            CommandOutput::ok("")
        });
        let env = ProcessEnv::default();
        PyenvManager::new(&runner, &env)
            .set_local(dir.path(), "demo-env")
            .expect("local");
        assert_eq!(runner.calls(), ["pyenv local demo-env"]);
    }

    #[cfg(unix)]
    #[test]
    fn availability_follows_snapshot_path() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().expect("tempdir");
        let bin = dir.path().join("pyenv");
        std::fs::write(&bin, "#!/bin/sh\n").expect("write");
        std::fs::set_permissions(&bin, std::fs::Permissions::from_mode(0o755)).expect("chmod");

        let runner = FakeRunner::new(|_: &Invocation, _: &ProcessEnv| CommandOutput::ok(""));
        let with = ProcessEnv::from_vars([("PATH", dir.path().to_string_lossy().into_owned())]);
        let without = ProcessEnv::from_vars([("PATH", "/nonexistent-dir-xyz")]);
        assert!(PyenvManager::new(&runner, &with).is_available());
        assert!(!PyenvManager::new(&runner, &without).is_available());
        assert!(runner.calls().is_empty());
    }

    #[test]
    fn virtualenvs_listing_trims_blank_lines() {
        let runner =
            FakeRunner::new(|_: &Invocation, _: &ProcessEnv| CommandOutput::ok("demo-env\n\n  web \n"));
        let env = ProcessEnv::default();
        let envs = PyenvManager::new(&runner, &env).virtualenvs();
        assert_eq!(envs.len(), 2);
        assert!(envs.contains("demo-env"));
        assert!(envs.contains("web"));
    }
}
