//! Interactive CPython version selection.
//!
//! `pyenv install --list` prints versions oldest first, so the tail of the
//! filtered list is treated as the most recent releases. That ordering is a
//! precondition: it is checked and logged, never corrected.

use anyhow::Result;

use crate::cli::prompt::Prompt;
use crate::cli::{output, Context};
use crate::platform::ProcessEnv;
use crate::pyenv::version::{self, PythonVersion};
use crate::pyenv::PyenvManager;

/// How one line of user input resolves against the menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Choice {
    /// Nothing typed; ask again.
    Blank,
    Quit,
    /// A listed entry, by number or by exact version.
    Pick(PythonVersion),
    /// A well-formed version pyenv didn't list; needs confirmation.
    Unlisted(PythonVersion),
    /// A number outside the displayed menu.
    OutOfRange,
    Invalid,
}

/// The last `size` entries of `versions`: the menu that gets shown.
pub fn menu_slice(versions: &[PythonVersion], size: usize) -> &[PythonVersion] {
    &versions[versions.len().saturating_sub(size)..]
}

/// Menu lines, numbered from 1.
pub fn render_menu(shown: &[PythonVersion]) -> Vec<String> {
    shown
        .iter()
        .enumerate()
        .map(|(i, v)| format!("  {:2}) {}", i + 1, v))
        .collect()
}

/// Resolve `input` against the displayed menu (`shown`) and the full fetched
/// list (`all`).
pub fn resolve_choice(input: &str, shown: &[PythonVersion], all: &[PythonVersion]) -> Choice {
    let input = input.trim();
    if input.is_empty() {
        return Choice::Blank;
    }
    if matches!(input.to_lowercase().as_str(), "q" | "quit" | "exit") {
        return Choice::Quit;
    }
    if input.chars().all(|c| c.is_ascii_digit()) {
        return match input.parse::<usize>() {
            Ok(n) if (1..=shown.len()).contains(&n) => Choice::Pick(shown[n - 1].clone()),
            _ => Choice::OutOfRange,
        };
    }
    match input.parse::<PythonVersion>() {
        Ok(v) if all.contains(&v) => Choice::Pick(v),
        Ok(v) => Choice::Unlisted(v),
        Err(_) => Choice::Invalid,
    }
}

/// Fetch installable CPython versions. Soft failure: on error the diagnostic
/// is printed and the list is empty.
pub fn list_available_versions(ctx: &Context, env: &ProcessEnv) -> Vec<PythonVersion> {
    let spinner = output::spinner(
        "Retrieving available CPython versions from pyenv (this may take a few seconds)...",
    );
    let listing = PyenvManager::new(ctx.runner, env).install_list();
    spinner.finish_and_clear();

    let versions = match listing {
        Ok(out) => version::parse_available(&out),
        Err(e) => {
            output::error(&format!("{e:#}"));
            return Vec::new();
        }
    };

    if versions.is_empty() {
        output::warning("No CPython versions found in pyenv output.");
    } else if !version::is_ascending(&versions) {
        tracing::warn!(
            count = versions.len(),
            "pyenv listed versions out of order; the menu may not show the newest releases"
        );
    }
    versions
}

/// Show the menu and read a choice. `None` means the user quit (or stdin
/// closed) without picking anything.
pub fn prompt_for_version(
    ctx: &Context,
    env: &ProcessEnv,
    prompt: &mut dyn Prompt,
) -> Result<Option<PythonVersion>> {
    let versions = list_available_versions(ctx, env);
    if versions.is_empty() {
        return Ok(None);
    }
    choose_version(&versions, ctx.config.picker.menu_size, prompt)
}

/// The read loop over an already-fetched list.
pub fn choose_version(
    versions: &[PythonVersion],
    menu_size: usize,
    prompt: &mut dyn Prompt,
) -> Result<Option<PythonVersion>> {
    let shown = menu_slice(versions, menu_size);

    prompt.tell("\nSelect a Python version to install:")?;
    for line in render_menu(shown) {
        prompt.tell(&line)?;
    }
    prompt.tell("\nYou can choose by number, or type an exact version (e.g. 3.12.4).")?;

    loop {
        let Some(input) = prompt.ask("Your choice (or 'q' to quit)")? else {
            return Ok(None);
        };
        match resolve_choice(&input, shown, versions) {
            Choice::Blank => {}
            Choice::Quit => return Ok(None),
            Choice::Pick(v) => return Ok(Some(v)),
            Choice::Unlisted(v) => {
                let question = format!(
                    "Version {} was not in the recent list, but pyenv may still support it. Try installing it?",
                    v
                );
                if prompt.confirm(&question, true)? {
                    return Ok(Some(v));
                }
            }
            Choice::OutOfRange => prompt.tell("Please enter a number from the list above.")?,
            Choice::Invalid => {
                prompt.tell("Please choose a valid number or a version like '3.12.4'.")?;
            }
        }
    }
}
