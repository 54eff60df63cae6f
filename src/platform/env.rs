use std::collections::BTreeMap;
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

/// Snapshot of the process environment handed to every child process.
///
/// Taken once at startup and threaded through the flow as a value. Changes
/// (such as putting `$PYENV_ROOT/bin` on `PATH`) produce a new snapshot and
/// never touch the real process environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessEnv {
    vars: BTreeMap<String, String>,
    /// Inherited variables that aren't valid UTF-8. Never inspected, only
    /// handed on to children.
    opaque: BTreeMap<OsString, OsString>,
}

impl ProcessEnv {
    /// Copy the current process environment.
    pub fn capture() -> Self {
        Self::from_os_vars(std::env::vars_os())
    }

    fn from_os_vars<I>(vars: I) -> Self
    where
        I: IntoIterator<Item = (OsString, OsString)>,
    {
        let mut env = Self::default();
        for (key, value) in vars {
            match (key.into_string(), value.into_string()) {
                (Ok(key), Ok(value)) => {
                    env.vars.insert(key, value);
                }
                (key, value) => {
                    let key = key.map_or_else(|raw| raw, OsString::from);
                    let value = value.map_or_else(|raw| raw, OsString::from);
                    tracing::debug!(
                        name = %key.to_string_lossy(),
                        "non-UTF-8 variable passed through to children as-is"
                    );
                    env.opaque.insert(key, value);
                }
            }
        }
        env
    }

    pub fn from_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: vars
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            opaque: BTreeMap::new(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        self.opaque.remove(OsStr::new(&name));
        self.vars.insert(name, value.into());
    }

    /// Everything a child process should see, including the opaque entries.
    pub fn child_vars(&self) -> impl Iterator<Item = (&OsStr, &OsStr)> {
        self.opaque
            .iter()
            .map(|(k, v)| (k.as_os_str(), v.as_os_str()))
            .chain(self.vars.iter().map(|(k, v)| (OsStr::new(k), OsStr::new(v))))
    }

    pub fn path(&self) -> Option<&str> {
        self.get("PATH")
    }

    pub fn shell(&self) -> Option<&str> {
        self.get("SHELL")
    }

    /// `$HOME` from the snapshot, falling back to the platform's idea of the
    /// home directory.
    pub fn home(&self) -> Option<PathBuf> {
        self.get("HOME")
            .filter(|h| !h.is_empty())
            .map(PathBuf::from)
            .or_else(dirs::home_dir)
    }

    /// `$PYENV_ROOT` if set, otherwise `~/.pyenv`.
    pub fn pyenv_root(&self) -> Option<PathBuf> {
        match self.get("PYENV_ROOT").filter(|r| !r.is_empty()) {
            Some(root) => Some(PathBuf::from(root)),
            None => self.home().map(|h| default_pyenv_root(&h)),
        }
    }

    /// Return a copy with `PYENV_ROOT` set and `$PYENV_ROOT/bin` prepended to
    /// `PATH`, provided the root directory exists. The `bin` entry is only
    /// added once.
    pub fn with_pyenv_root(&self) -> ProcessEnv {
        let mut env = self.clone();
        let Some(root) = self.pyenv_root().filter(|r| r.is_dir()) else {
            return env;
        };

        env.set("PYENV_ROOT", root.to_string_lossy());
        let bin_dir = root.join("bin");
        let current: Vec<PathBuf> = self
            .path()
            .map(|p| std::env::split_paths(p).collect())
            .unwrap_or_default();

        if !current.iter().any(|entry| entry == &bin_dir) {
            let mut entries = vec![bin_dir.clone()];
            entries.extend(current);
            match std::env::join_paths(entries) {
                Ok(joined) => env.set("PATH", os_to_string(joined)),
                Err(e) => tracing::warn!(error = %e, "could not add {} to PATH", bin_dir.display()),
            }
        }
        env
    }

    /// Look `name` up on this snapshot's `PATH`.
    pub fn which(&self, name: &str) -> Option<PathBuf> {
        if name.is_empty() {
            return None;
        }
        let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        which::which_in(name, self.path(), cwd).ok()
    }

    pub fn command_exists(&self, name: &str) -> bool {
        self.which(name).is_some()
    }
}

/// Where pyenv's git-based installer puts it.
pub fn default_pyenv_root(home: &Path) -> PathBuf {
    home.join(".pyenv")
}

fn os_to_string(s: OsString) -> String {
    s.into_string()
        .unwrap_or_else(|raw| raw.to_string_lossy().into_owned())
}
