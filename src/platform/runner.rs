use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::error::SetupError;

use super::env::ProcessEnv;

/// One external command to run.
///
/// Defaults to checked mode with inherited stdio; use [`Invocation::capture`]
/// and [`Invocation::unchecked`] to change that.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    program: String,
    args: Vec<String>,
    shell: bool,
    cwd: Option<PathBuf>,
    capture: bool,
    check: bool,
}

impl Invocation {
    pub fn new<I, S>(program: &str, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.to_string(),
            args: args.into_iter().map(Into::into).collect(),
            shell: false,
            cwd: None,
            capture: false,
            check: true,
        }
    }

    /// A script for `sh -c`. Only used where a pipeline is required.
    pub fn shell(script: &str) -> Self {
        Self {
            shell: true,
            ..Self::new(script, Vec::<String>::new())
        }
    }

    pub fn current_dir(mut self, dir: &Path) -> Self {
        self.cwd = Some(dir.to_path_buf());
        self
    }

    /// Capture stdout (and stderr, for diagnostics) instead of inheriting.
    pub fn capture(mut self) -> Self {
        self.capture = true;
        self
    }

    /// Report a non-zero exit through [`CommandOutput::success`] instead of
    /// an error.
    pub fn unchecked(mut self) -> Self {
        self.check = false;
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn cwd(&self) -> Option<&Path> {
        self.cwd.as_deref()
    }

    pub fn is_shell(&self) -> bool {
        self.shell
    }

    pub fn is_captured(&self) -> bool {
        self.capture
    }

    pub fn is_checked(&self) -> bool {
        self.check
    }

    /// The command line as a user would type it.
    pub fn display(&self) -> String {
        if self.shell || self.args.is_empty() {
            return self.program.clone();
        }
        format!("{} {}", self.program, self.args.join(" "))
    }
}

/// What a finished command produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub success: bool,
    pub code: Option<i32>,
    /// Captured stdout; empty when the invocation inherited stdio.
    pub stdout: String,
}

#[cfg(test)]
impl CommandOutput {
    pub fn ok(stdout: &str) -> Self {
        Self {
            success: true,
            code: Some(0),
            stdout: stdout.to_string(),
        }
    }

    pub fn failed(code: i32) -> Self {
        Self {
            success: false,
            code: Some(code),
            stdout: String::new(),
        }
    }
}

/// Runs external commands. Object-safe so the flow can be driven by a fake in
/// tests.
pub trait CommandRunner {
    fn run(&self, invocation: &Invocation, env: &ProcessEnv) -> Result<CommandOutput, SetupError>;
}

/// Runs commands as real child processes.
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, invocation: &Invocation, env: &ProcessEnv) -> Result<CommandOutput, SetupError> {
        let command_line = invocation.display();
        tracing::debug!(command = %command_line, cwd = ?invocation.cwd(), "running command");

        let mut cmd = if invocation.is_shell() {
            let mut cmd = Command::new("sh");
            cmd.args(["-c", invocation.program()]);
            cmd
        } else {
            // Resolve against the snapshot's PATH, not the parent's.
            let program = env
                .which(invocation.program())
                .unwrap_or_else(|| PathBuf::from(invocation.program()));
            let mut cmd = Command::new(program);
            cmd.args(invocation.args());
            cmd
        };
        cmd.env_clear().envs(env.child_vars());
        if let Some(dir) = invocation.cwd() {
            cmd.current_dir(dir);
        }

        let spawn_err = |source| SetupError::Spawn {
            command: command_line.clone(),
            source,
        };

        let (status, stdout, stderr) = if invocation.is_captured() {
            let output = cmd
                .stdin(Stdio::null())
                .stdout(Stdio::piped())
                .stderr(Stdio::piped())
                .output()
                .map_err(spawn_err)?;
            (
                output.status,
                String::from_utf8_lossy(&output.stdout).into_owned(),
                String::from_utf8_lossy(&output.stderr).into_owned(),
            )
        } else {
            let status = cmd.status().map_err(spawn_err)?;
            (status, String::new(), String::new())
        };

        tracing::debug!(command = %command_line, code = ?status.code(), "command finished");

        if invocation.is_checked() && !status.success() {
            return Err(SetupError::CommandFailed {
                command: command_line,
                code: status.code(),
                stderr,
            });
        }

        Ok(CommandOutput {
            success: status.success(),
            code: status.code(),
            stdout,
        })
    }
}

// ---------------------------------------------------------------------------
// Test support
// ---------------------------------------------------------------------------


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_joins_program_and_args() {
        let inv = Invocation::new("pyenv", ["install", "--list"]);
        assert_eq!(inv.display(), "pyenv install --list");
        assert_eq!(Invocation::new("brew", Vec::<String>::new()).display(), "brew");
        assert_eq!(
            Invocation::shell("curl https://pyenv.run | bash").display(),
            "curl https://pyenv.run | bash"
        );
    }

    #[test]
    fn builder_defaults_to_checked_and_inherited() {
        let inv = Invocation::new("git", ["clone"]);
        assert!(inv.is_checked());
        assert!(!inv.is_captured());
        assert!(!inv.is_shell());
        assert!(inv.cwd().is_none());

        let inv = inv.capture().unchecked().current_dir(Path::new("/tmp"));
        assert!(!inv.is_checked());
        assert!(inv.is_captured());
        assert_eq!(inv.cwd(), Some(Path::new("/tmp")));
    }

    #[cfg(unix)]
    #[test]
    fn captures_stdout() {
        let out = SystemRunner
            .run(
                &Invocation::new("echo", ["3.12.4"]).capture(),
                &ProcessEnv::capture(),
            )
            .expect("echo runs");
        assert!(out.success);
        assert_eq!(out.stdout.trim(), "3.12.4");
    }

    #[cfg(unix)]
    #[test]
    fn checked_non_zero_exit_is_an_error() {
        let err = SystemRunner
            .run(
                &Invocation::shell("echo boom >&2; exit 3").capture(),
                &ProcessEnv::capture(),
            )
            .unwrap_err();
        match err {
            SetupError::CommandFailed {
                command,
                code,
                stderr,
            } => {
                assert_eq!(command, "echo boom >&2; exit 3");
                assert_eq!(code, Some(3));
                assert_eq!(stderr.trim(), "boom");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn unchecked_non_zero_exit_is_reported() {
        let out = SystemRunner
            .run(
                &Invocation::shell("exit 2").capture().unchecked(),
                &ProcessEnv::capture(),
            )
            .expect("unchecked run");
        assert!(!out.success);
        assert_eq!(out.code, Some(2));
    }

    #[cfg(unix)]
    #[test]
    fn child_sees_only_the_snapshot() {
        let mut env = ProcessEnv::capture();
        env.set("PYENV_SETUP_TEST_MARKER", "from-snapshot");
        let out = SystemRunner
            .run(
                &Invocation::shell("printf %s \"$PYENV_SETUP_TEST_MARKER\"").capture(),
                &env,
            )
            .expect("shell runs");
        assert_eq!(out.stdout, "from-snapshot");
        assert!(std::env::var("PYENV_SETUP_TEST_MARKER").is_err());
    }

    #[cfg(unix)]
    #[test]
    fn runs_in_requested_directory() {
        let dir = tempfile::tempdir().expect("tempdir");
        let out = SystemRunner
            .run(
                &Invocation::new("pwd", Vec::<String>::new())
                    .capture()
                    .current_dir(dir.path()),
                &ProcessEnv::capture(),
            )
            .expect("pwd runs");
        let reported = std::fs::canonicalize(out.stdout.trim()).expect("canonical");
        assert_eq!(reported, std::fs::canonicalize(dir.path()).expect("canonical"));
    }

    #[test]
    fn missing_program_is_a_spawn_error() {
        let err = SystemRunner
            .run(
                &Invocation::new("nonexistent_command_xyz_12345", ["--help"])
                    .capture()
                    .unchecked(),
                &ProcessEnv::capture(),
            )
            .unwrap_err();
        match err {
            SetupError::Spawn { command, .. } => {
                assert_eq!(command, "nonexistent_command_xyz_12345 --help");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
