//! Shell startup file integration.
//!
//! Appends pyenv's init block to `~/.bashrc` or `~/.zshrc`. The append is
//! guarded by [`INIT_MARKER`], so re-running never duplicates it.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Any existing pyenv setup in an rc file contains this.
pub const INIT_MARKER: &str = "pyenv init";

pub const INIT_SNIPPET: &str = r#"# pyenv configuration
export PYENV_ROOT="$HOME/.pyenv"
command -v pyenv >/dev/null || export PATH="$PYENV_ROOT/bin:$PATH"
eval "$(pyenv init -)"
if command -v pyenv-virtualenv-init >/dev/null 2>&1; then
  eval "$(pyenv virtualenv-init -)"
fi
"#;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppendOutcome {
    Appended,
    AlreadyPresent,
}

/// `~/.zshrc` for zsh users, `~/.bashrc` for everyone else.
pub fn rc_path(shell: Option<&str>, home: &Path) -> PathBuf {
    match shell {
        Some(s) if s.ends_with("zsh") => home.join(".zshrc"),
        _ => home.join(".bashrc"),
    }
}

/// The text to append to `content`, or `None` when pyenv init is already there.
pub fn addition_for(content: &str, snippet: &str) -> Option<String> {
    if content.contains(INIT_MARKER) {
        return None;
    }
    let mut addition = String::new();
    if !content.is_empty() && !content.ends_with('\n') {
        addition.push('\n');
    }
    addition.push('\n');
    addition.push_str(snippet.trim_matches('\n'));
    addition.push('\n');
    Some(addition)
}

/// Append `snippet` to the rc file at `path` unless it already sets up pyenv.
/// A missing file is created.
pub fn append_if_missing(path: &Path, snippet: &str) -> Result<AppendOutcome> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
        Err(e) => return Err(e).with_context(|| format!("could not read {}", path.display())),
    };

    let Some(addition) = addition_for(&content, snippet) else {
        tracing::debug!(path = %path.display(), "pyenv init already present");
        return Ok(AppendOutcome::AlreadyPresent);
    };

    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("could not open {}", path.display()))?;
    file.write_all(addition.as_bytes())
        .with_context(|| format!("could not write {}", path.display()))?;

    Ok(AppendOutcome::Appended)
}
