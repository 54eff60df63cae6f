mod cli;
mod config;
mod error;
mod platform;
mod pyenv;

use std::process::ExitCode;

use clap::Parser;

use cli::{output, setup, signal, Cli};

fn main() -> ExitCode {
    let mut cli = Cli::parse();
    init_tracing(cli.log_level.take());

    if let Err(e) = signal::install_interrupt_handler() {
        tracing::warn!(error = %e, "could not install interrupt handler");
    }

    match setup::run(cli) {
        Ok(outcome) => {
            tracing::debug!(?outcome, "finished");
            ExitCode::from(outcome.exit_code())
        }
        Err(e) => {
            output::error(&format!("{e:#}"));
            ExitCode::FAILURE
        }
    }
}

/// Tracing goes to stderr so it never mixes with prompts on a redirected
/// stdout. `try_init` keeps a second init from panicking.
fn init_tracing(log_level: Option<String>) {
    let log_level = log_level.unwrap_or_else(|| "warn".to_string());
    let filter = match log_level.as_str() {
        "off" => "off",
        "error" => "error",
        "warn" => "warn",
        "info" => "info",
        "debug" => "debug",
        other => {
            eprintln!(
                "warning: unknown log level '{}', defaulting to 'warn'",
                other
            );
            "warn"
        }
    };
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .try_init();
}
