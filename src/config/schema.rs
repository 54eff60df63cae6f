use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// User configuration. Every field has a default, so an absent or empty file
/// is valid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SetupConfig {
    pub pyenv: PyenvConfig,
    pub picker: PickerConfig,
    pub demo: DemoConfig,
}

/// Where pyenv and its plugin are fetched from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PyenvConfig {
    pub repo: String,
    pub virtualenv_repo: String,
    /// Official bootstrap installer, piped into bash when Homebrew is absent.
    pub installer_url: String,
}

impl Default for PyenvConfig {
    fn default() -> Self {
        Self {
            repo: "https://github.com/pyenv/pyenv.git".to_string(),
            virtualenv_repo: "https://github.com/pyenv/pyenv-virtualenv.git".to_string(),
            installer_url: "https://pyenv.run".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PickerConfig {
    /// How many of the most recent versions to list.
    pub menu_size: usize,
}

impl Default for PickerConfig {
    fn default() -> Self {
        Self { menu_size: 15 }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DemoConfig {
    /// Relative paths are resolved against the home directory.
    pub dir: PathBuf,
    pub env_name: String,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("pyenv_virtualenv_demo"),
            env_name: "demo-env".to_string(),
        }
    }
}

impl DemoConfig {
    pub fn resolve_dir(&self, home: &Path) -> PathBuf {
        if self.dir.is_absolute() {
            self.dir.clone()
        } else {
            home.join(&self.dir)
        }
    }
}

/// A validation finding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigMessage {
    Warning(String),
    Error(String),
}

impl SetupConfig {
    pub fn validate(&self) -> Vec<ConfigMessage> {
        let mut messages = Vec::new();

        for (key, url) in [
            ("pyenv.repo", &self.pyenv.repo),
            ("pyenv.virtualenv_repo", &self.pyenv.virtualenv_repo),
            ("pyenv.installer_url", &self.pyenv.installer_url),
        ] {
            if url.trim().is_empty() {
                messages.push(ConfigMessage::Error(format!("{} must not be empty", key)));
            }
        }

        match self.picker.menu_size {
            0 => messages.push(ConfigMessage::Error(
                "picker.menu_size must be at least 1".to_string(),
            )),
            n if n > 100 => messages.push(ConfigMessage::Warning(format!(
                "picker.menu_size = {} will print a very long menu",
                n
            ))),
            _ => {}
        }

        let name = &self.demo.env_name;
        if name.is_empty() {
            messages.push(ConfigMessage::Error(
                "demo.env_name must not be empty".to_string(),
            ));
        } else if name.chars().any(|c| c.is_whitespace() || c == '/') {
            messages.push(ConfigMessage::Error(format!(
                "demo.env_name '{}' must not contain whitespace or '/'",
                name
            )));
        }

        if self.demo.dir.as_os_str().is_empty() {
            messages.push(ConfigMessage::Error("demo.dir must not be empty".to_string()));
        }

        messages
    }
}
