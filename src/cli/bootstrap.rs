use std::path::Path;

use anyhow::Result;

use crate::cli::prompt::Prompt;
use crate::cli::{guidance, output, Context};
use crate::platform::env::default_pyenv_root;
use crate::platform::{Apt, Environment, Homebrew, Invocation, PackageManager, ProcessEnv};
use crate::pyenv::shell_rc::{self, AppendOutcome};
use crate::pyenv::PyenvManager;

/// Native packages pyenv needs to compile CPython on Ubuntu.
pub const UBUNTU_BUILD_DEPS: [&str; 16] = [
    "build-essential",
    "curl",
    "git",
    "libssl-dev",
    "zlib1g-dev",
    "libbz2-dev",
    "libreadline-dev",
    "libsqlite3-dev",
    "llvm",
    "libncursesw5-dev",
    "xz-utils",
    "tk-dev",
    "libxml2-dev",
    "libxmlsec1-dev",
    "libffi-dev",
    "liblzma-dev",
];

/// Where the tooling stands once the installer flow is done.
#[derive(Debug, Clone)]
pub struct ToolStatus {
    /// Snapshot with `PYENV_ROOT` and `$PYENV_ROOT/bin` merged in, for every
    /// later step.
    pub env: ProcessEnv,
    pub has_pyenv: bool,
    pub has_virtualenv: bool,
}

/// Make sure pyenv is installed, offering to install it (and the virtualenv
/// plugin) the native way for `environment`.
pub fn ensure_pyenv(
    ctx: &Context,
    environment: Environment,
    env: ProcessEnv,
    prompt: &mut dyn Prompt,
) -> Result<ToolStatus> {
    let env = match environment {
        Environment::MacOS => install_macos(ctx, env, prompt)?,
        Environment::Ubuntu | Environment::WslUbuntu => {
            install_ubuntu_like(ctx, env, environment == Environment::WslUbuntu, prompt)?
        }
        Environment::Windows | Environment::Other => {
            output::warning("Unsupported environment for automatic pyenv installation.");
            env
        }
    };

    let env = env.with_pyenv_root();
    if !PyenvManager::new(ctx.runner, &env).is_available() {
        output::error(
            "pyenv still not found in PATH. Please install/configure it manually and re-run this tool.",
        );
        return Ok(ToolStatus {
            env,
            has_pyenv: false,
            has_virtualenv: false,
        });
    }

    let has_virtualenv = ensure_virtualenv_plugin(ctx, environment, &env, prompt)?;
    Ok(ToolStatus {
        env,
        has_pyenv: true,
        has_virtualenv,
    })
}

// ── macOS ───────────────────────────────────────────────────────────────

fn install_macos(ctx: &Context, env: ProcessEnv, prompt: &mut dyn Prompt) -> Result<ProcessEnv> {
    output::header("pyenv");

    if PyenvManager::new(ctx.runner, &env).is_available() {
        output::success("pyenv — already installed");
        return Ok(env);
    }

    output::info("pyenv is not installed.");
    if !prompt.confirm("Install pyenv using Homebrew or the official installer?", true)? {
        output::info("Skipping pyenv installation at your request.");
        return Ok(env);
    }

    if Homebrew.is_available(&env) {
        output::info(
            "Installing pyenv and pyenv-virtualenv with Homebrew (you may be prompted for your password)...",
        );
        let result = Homebrew.refresh(ctx.runner, &env).and_then(|()| {
            Homebrew.install(ctx.runner, &env, &["pyenv", "pyenv-virtualenv"])
        });
        match result {
            Ok(()) => output::success("pyenv and pyenv-virtualenv installed via Homebrew"),
            Err(e) => output::error(&format!("Homebrew installation failed: {e:#}")),
        }
    } else {
        let command = installer_command(&ctx.config.pyenv.installer_url);
        output::block(&guidance::official_installer_notice(&command));
        if prompt.confirm("Run the official pyenv installer now?", true)? {
            match ctx.runner.run(&Invocation::shell(&command), &env) {
                Ok(_) => output::success("pyenv installer completed"),
                Err(e) => output::error(&format!("pyenv installer failed: {e}")),
            }
        } else {
            output::info("Skipping pyenv installation.");
        }
    }

    Ok(env.with_pyenv_root())
}

/// `curl <url> | bash`, the bootstrap installer pipeline.
pub fn installer_command(url: &str) -> String {
    format!("curl {} | bash", url)
}

// ── Ubuntu / WSL ────────────────────────────────────────────────────────

fn install_ubuntu_like(
    ctx: &Context,
    env: ProcessEnv,
    is_wsl: bool,
    prompt: &mut dyn Prompt,
) -> Result<ProcessEnv> {
    output::header("pyenv");

    if PyenvManager::new(ctx.runner, &env).is_available() {
        output::success("pyenv — already installed");
        return Ok(env.with_pyenv_root());
    }

    output::info("pyenv is not installed.");
    if !prompt.confirm("Install pyenv using git + apt (requires sudo)?", true)? {
        output::info("Skipping pyenv installation at your request.");
        return Ok(env);
    }

    install_build_deps(ctx, &env);

    let Some(home) = env.home() else {
        output::error("Could not determine your home directory; cannot install pyenv.");
        return Ok(env);
    };
    let root = default_pyenv_root(&home);

    if root.is_dir() {
        output::info(&format!("{} already exists; skipping git clone.", root.display()));
    } else {
        output::info("Cloning pyenv into ~/.pyenv...");
        clone(ctx, &env, &ctx.config.pyenv.repo, &root, "pyenv");
    }

    if prompt.confirm("Install pyenv-virtualenv plugin as well?", true)? {
        install_virtualenv_plugin(ctx, &env, &root);
    }

    let rc = shell_rc::rc_path(env.shell(), &home);
    match shell_rc::append_if_missing(&rc, shell_rc::INIT_SNIPPET) {
        Ok(AppendOutcome::Appended) => {
            output::success(&format!("Appended pyenv init snippet to {}", rc.display()));
        }
        Ok(AppendOutcome::AlreadyPresent) => {
            output::info(&format!("{} already initializes pyenv", rc.display()));
        }
        Err(e) => output::warning(&format!("Could not update {}: {e:#}", rc.display())),
    }

    output::info(
        "pyenv installation steps finished. You may need to restart your shell \
         or run 'exec $SHELL' for pyenv to be fully available in new terminals.",
    );
    if is_wsl {
        output::info(
            "Detected Ubuntu under WSL. Make sure you always run this tool *inside* \
             your WSL/Ubuntu terminal (not in regular cmd.exe/PowerShell).",
        );
    }

    Ok(env.with_pyenv_root())
}

/// Install the compiler toolchain and headers. Advisory: a failure is
/// reported and installation carries on.
fn install_build_deps(ctx: &Context, env: &ProcessEnv) {
    if !Apt.is_available(env) {
        output::warning("apt not found; skipping build dependency installation.");
        return;
    }

    output::info("Installing build dependencies via apt (you may be prompted for your password)...");
    let result = Apt
        .refresh(ctx.runner, env)
        .and_then(|()| Apt.install(ctx.runner, env, &UBUNTU_BUILD_DEPS));
    match result {
        Ok(()) => output::success("build dependencies — installed via apt"),
        Err(e) => output::warning(&format!("apt installation failed: {e:#}")),
    }
}

fn install_virtualenv_plugin(ctx: &Context, env: &ProcessEnv, root: &Path) {
    let plugins_dir = root.join("plugins");
    if let Err(e) = std::fs::create_dir_all(&plugins_dir) {
        output::error(&format!("Could not create {}: {e}", plugins_dir.display()));
        return;
    }

    let dest = plugins_dir.join("pyenv-virtualenv");
    if dest.is_dir() {
        output::info("pyenv-virtualenv plugin directory already exists; skipping clone.");
    } else {
        output::info("Cloning pyenv-virtualenv plugin...");
        clone(ctx, env, &ctx.config.pyenv.virtualenv_repo, &dest, "pyenv-virtualenv");
    }
}

fn clone(ctx: &Context, env: &ProcessEnv, url: &str, dest: &Path, name: &str) {
    let dest_arg = dest.to_string_lossy();
    let inv = Invocation::new("git", ["clone", url, &*dest_arg]);
    match ctx.runner.run(&inv, env) {
        Ok(_) => output::success(&format!("{} — cloned into {}", name, dest.display())),
        Err(e) => output::error(&format!("Git clone for {} failed: {}", name, e)),
    }
}

// ── Plugin check ────────────────────────────────────────────────────────

/// Probe for pyenv-virtualenv and, when missing, offer the platform's way of
/// getting it. Returns whether the plugin is usable afterwards.
fn ensure_virtualenv_plugin(
    ctx: &Context,
    environment: Environment,
    env: &ProcessEnv,
    prompt: &mut dyn Prompt,
) -> Result<bool> {
    let pyenv = PyenvManager::new(ctx.runner, env);
    if pyenv.has_virtualenv() {
        output::success("pyenv-virtualenv — available");
        return Ok(true);
    }

    output::warning("pyenv-virtualenv does not appear to be available.");
    if environment == Environment::MacOS && Homebrew.is_available(env) {
        if prompt.confirm("Install pyenv-virtualenv with Homebrew now?", true)? {
            match Homebrew.install(ctx.runner, env, &["pyenv-virtualenv"]) {
                Ok(()) => {
                    output::success("pyenv-virtualenv — installed via Homebrew");
                    return Ok(true);
                }
                Err(e) => output::error(&format!(
                    "Failed to install pyenv-virtualenv via Homebrew: {e:#}"
                )),
            }
        }
    } else if environment.is_ubuntu_like() {
        output::block(&guidance::manual_plugin_install(&ctx.config.pyenv.virtualenv_repo));
    }
    Ok(false)
}

// ── Tests ───────────────────────────────────────────────────────────────
