//! Long-form instructions printed when the tool can't do something itself.

/// Steps for getting from native Windows into an Ubuntu shell under WSL.
pub fn windows_wsl_instructions() -> String {
    let bin = env!("CARGO_PKG_NAME");
    format!(
        r#"Detected Windows (non-WSL) environment.

This helper is intended to run *inside* a Unix-like shell
(macOS, Ubuntu, or Ubuntu under Windows Subsystem for Linux - WSL).

To use it from Windows, follow these steps:

1. Enable WSL (Windows Subsystem for Linux)

   - Open PowerShell **as Administrator** and run:

       wsl --install -d Ubuntu

   - If you're on an older Windows 10 build and the above fails, try:

       dism.exe /online /enable-feature /featurename:Microsoft-Windows-Subsystem-Linux /all /norestart
       dism.exe /online /enable-feature /featurename:VirtualMachinePlatform /all /norestart

   - Restart your computer if prompted.

2. Install an Ubuntu distribution from the Microsoft Store (if it
   wasn't installed automatically by 'wsl --install').

3. Launch the Ubuntu (WSL) terminal, set up your Unix username, and
   then run this tool **inside that Ubuntu shell**:

       {bin}

Once you're inside Ubuntu/WSL, it will be treated like a regular
Ubuntu system and can install pyenv and pyenv-virtualenv for you."#
    )
}

/// Explanation shown before offering to run the official installer.
pub fn official_installer_notice(command: &str) -> String {
    format!(
        r#"
Homebrew was not found on this system.

The official pyenv installer can be run instead. It will:
- Download and install pyenv under ~/.pyenv
- Print instructions for updating your shell configuration

Command to be executed:
  {command}
"#
    )
}

/// How to add pyenv-virtualenv by hand on a git-based pyenv install.
pub fn manual_plugin_install(repo: &str) -> String {
    format!(
        "If you previously declined the plugin installation, you can install it later with:\n  \
         git clone {repo} ~/.pyenv/plugins/pyenv-virtualenv\n"
    )
}

/// Commands for trying the demo virtualenv outside this tool.
pub fn manual_demo_steps(demo_dir: &str, env_name: &str) -> String {
    format!(
        r#"
Manual steps you can try now (outside of this tool):

  cd {demo_dir}
  pyenv activate {env_name}
  python -V
  which python
  pyenv deactivate

When you 'cd' into {demo_dir}, pyenv will automatically select the
'{env_name}' environment because of the .python-version file created there.
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wsl_instructions_cover_install_and_fallback() {
        let text = windows_wsl_instructions();
        assert!(text.contains("wsl --install -d Ubuntu"));
        assert!(text.contains("dism.exe"));
        assert!(text.contains("pyenv-setup"));
    }

    #[test]
    fn installer_notice_shows_command() {
        assert!(official_installer_notice("curl https://pyenv.run | bash")
            .contains("  curl https://pyenv.run | bash"));
    }

    #[test]
    fn manual_plugin_install_targets_plugins_dir() {
        let text = manual_plugin_install("https://github.com/pyenv/pyenv-virtualenv.git");
        assert!(text.contains(
            "git clone https://github.com/pyenv/pyenv-virtualenv.git ~/.pyenv/plugins/pyenv-virtualenv"
        ));
    }

    #[test]
    fn demo_steps_name_dir_and_env() {
        let text = manual_demo_steps("/home/dev/pyenv_virtualenv_demo", "demo-env");
        assert!(text.contains("cd /home/dev/pyenv_virtualenv_demo"));
        assert!(text.contains("pyenv activate demo-env"));
    }
}
