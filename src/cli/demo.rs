use std::path::Path;

use crate::cli::{guidance, output, Context};
use crate::platform::{Invocation, ProcessEnv};
use crate::pyenv::{PyenvManager, PythonVersion};

/// Shell script that activates the demo env, shows which interpreter is live,
/// and deactivates again. Run under `bash -lc` so the user's login profile
/// (and with it `pyenv init`) is loaded.
pub fn demo_script(dir: &Path, env_name: &str) -> String {
    let dir = dir.to_string_lossy();
    let name = shell_words::quote(env_name);
    format!(
        "cd {dir} && pyenv activate {name} && echo {banner} && python -V && which python && pyenv deactivate",
        dir = shell_words::quote(&dir),
        name = name,
        banner = shell_words::quote(&format!("Inside {}:", env_name)),
    )
}

/// Create a virtualenv on `version`, pin the demo directory to it, and show it
/// working. Every failure is reported; none of them ends the run.
pub fn create_demo_virtualenv(ctx: &Context, version: &PythonVersion, env: &ProcessEnv) {
    output::header("Demo project");

    let pyenv = PyenvManager::new(ctx.runner, env);
    if !pyenv.has_virtualenv() {
        output::warning("pyenv-virtualenv is not available; skipping the virtualenv demo.");
        return;
    }

    let Some(home) = env.home() else {
        output::error("Could not determine your home directory; skipping the demo.");
        return;
    };
    let demo = &ctx.config.demo;
    let dir = demo.resolve_dir(&home);
    let name = demo.env_name.as_str();

    if let Err(e) = std::fs::create_dir_all(&dir) {
        output::error(&format!("Could not create {}: {e}", dir.display()));
        return;
    }
    output::info(&format!("Using demo directory: {}", dir.display()));

    if pyenv.virtualenvs().contains(name) {
        output::info(&format!("Virtualenv '{}' already exists; reusing it.", name));
    } else {
        output::info(&format!(
            "Creating virtualenv '{}' based on Python {}...",
            name, version
        ));
        if let Err(e) = pyenv.create_virtualenv(version, name) {
            output::error(&format!("{e:#}"));
            return;
        }
        output::success(&format!("{} — virtualenv created", name));
    }

    match pyenv.set_local(&dir, name) {
        Ok(()) => output::success(&format!(
            "{} — pinned to '{}' via .python-version",
            dir.display(),
            name
        )),
        Err(e) => output::error(&format!("{e:#}")),
    }

    output::info("Running a short activation demo...");
    let script = demo_script(&dir, name);
    tracing::debug!(%script, "demo script");
    if let Err(e) = ctx
        .runner
        .run(&Invocation::new("bash", ["-lc", script.as_str()]), env)
    {
        output::error(&format!(
            "Demo activation failed ({e}). This can happen if pyenv-virtualenv isn't \
             initialized in your login shell yet."
        ));
    }

    output::block(&guidance::manual_demo_steps(&dir.to_string_lossy(), name));
}
