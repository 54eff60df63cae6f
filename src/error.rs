use thiserror::Error;

#[derive(Error, Debug)]
pub enum SetupError {
    #[error("`{command}` exited with status {}{}", display_code(.code), display_stderr(.stderr))]
    CommandFailed {
        command: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("failed to launch `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid version '{0}': expected MAJOR.MINOR.PATCH (e.g. 3.12.4)")]
    InvalidVersion(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("toml parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

fn display_code(code: &Option<i32>) -> String {
    match code {
        Some(c) => c.to_string(),
        None => "unknown (terminated by signal)".to_string(),
    }
}

fn display_stderr(stderr: &str) -> String {
    let stderr = stderr.trim();
    if stderr.is_empty() {
        String::new()
    } else {
        format!(": {}", stderr)
    }
}
