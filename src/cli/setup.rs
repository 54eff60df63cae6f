use anyhow::Result;

use crate::cli::prompt::{Prompt, Prompter};
use crate::cli::{bootstrap, demo, guidance, output, picker, Cli, Context};
use crate::config;
use crate::platform::{detect_environment, Environment, ProcessEnv, SystemRunner};
use crate::pyenv::{InstallAction, PyenvManager, PythonVersion};

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Completed,
    NoVersionSelected,
    WindowsGuidance,
    Unsupported,
    PyenvUnavailable,
    InstallFailed,
}

impl Outcome {
    pub fn exit_code(self) -> u8 {
        match self {
            Outcome::Completed | Outcome::NoVersionSelected | Outcome::WindowsGuidance => 0,
            Outcome::Unsupported | Outcome::PyenvUnavailable | Outcome::InstallFailed => 1,
        }
    }
}

/// Entry point for the interactive flow against the real system.
pub fn run(cli: Cli) -> Result<Outcome> {
    output::banner();

    let config = config::load(cli.config.as_deref())?;
    let environment = detect_environment();
    tracing::info!(%environment, "detected environment");

    let runner = SystemRunner;
    let ctx = Context {
        runner: &runner,
        config: &config,
    };
    let mut prompt = Prompter::stdio();
    run_with(&ctx, environment, ProcessEnv::capture(), &mut prompt)
}

/// The whole flow over injected collaborators: install tooling, pick a
/// version, install it, then the optional global default and demo.
pub fn run_with(
    ctx: &Context,
    environment: Environment,
    env: ProcessEnv,
    prompt: &mut dyn Prompt,
) -> Result<Outcome> {
    output::info(&format!("Detected environment: {}", environment.describe()));

    match environment {
        Environment::Windows => {
            output::block(&guidance::windows_wsl_instructions());
            return Ok(Outcome::WindowsGuidance);
        }
        Environment::Other => {
            output::error(
                "Unsupported or unrecognized environment. This tool supports macOS, \
                 Ubuntu, and Ubuntu under WSL.",
            );
            return Ok(Outcome::Unsupported);
        }
        Environment::MacOS | Environment::Ubuntu | Environment::WslUbuntu => {}
    }

    let status = bootstrap::ensure_pyenv(ctx, environment, env, prompt)?;
    if !status.has_pyenv {
        return Ok(Outcome::PyenvUnavailable);
    }
    tracing::debug!(has_virtualenv = status.has_virtualenv, "tooling ready");
    let env = status.env;

    let Some(version) = picker::prompt_for_version(ctx, &env, prompt)? else {
        output::info("No version selected. Exiting.");
        return Ok(Outcome::NoVersionSelected);
    };

    output::header(&format!("Python {}", version));
    match PyenvManager::new(ctx.runner, &env).ensure_installed(&version) {
        InstallAction::AlreadyInstalled => {
            output::success(&format!("Python {} — already installed in pyenv", version));
        }
        InstallAction::Installed => output::success(&format!("Python {} — installed", version)),
        InstallAction::Failed(msg) => {
            output::error(&msg);
            return Ok(Outcome::InstallFailed);
        }
    }

    maybe_set_global(ctx, &version, &env, prompt)?;

    if prompt.confirm("Create a demo project using pyenv-virtualenv?", true)? {
        demo::create_demo_virtualenv(ctx, &version, &env);
    }

    output::header("Done");
    output::success("Setup complete. Open a new terminal (or run 'exec $SHELL') to pick up the changes.");
    Ok(Outcome::Completed)
}

fn maybe_set_global(
    ctx: &Context,
    version: &PythonVersion,
    env: &ProcessEnv,
    prompt: &mut dyn Prompt,
) -> Result<()> {
    let question = format!(
        "Do you want to set Python {} as your *global* default pyenv version?",
        version
    );
    if !prompt.confirm(&question, false)? {
        output::info("Leaving the global pyenv version unchanged.");
        return Ok(());
    }
    match PyenvManager::new(ctx.runner, env).set_global(version) {
        Ok(()) => output::success(&format!("pyenv global — set to {}", version)),
        Err(e) => output::error(&format!("{e:#}")),
    }
    Ok(())
}
