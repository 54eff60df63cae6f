/// Host classification that drives the installer flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Environment {
    MacOS,
    Ubuntu,
    /// Ubuntu running under Windows Subsystem for Linux.
    WslUbuntu,
    /// Native Windows (not inside WSL).
    Windows,
    Other,
}

impl Environment {
    /// Ubuntu on bare metal or under WSL; both install pyenv via apt + git.
    pub fn is_ubuntu_like(self) -> bool {
        matches!(self, Environment::Ubuntu | Environment::WslUbuntu)
    }

    /// Human-readable description used in the "Detected ..." banner line.
    pub fn describe(self) -> &'static str {
        match self {
            Environment::MacOS => "macOS",
            Environment::Ubuntu => "Ubuntu",
            Environment::WslUbuntu => "Ubuntu running under Windows Subsystem for Linux (WSL)",
            Environment::Windows => "Windows",
            Environment::Other => "an unsupported environment",
        }
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::MacOS => write!(f, "macos"),
            Environment::Ubuntu => write!(f, "ubuntu"),
            Environment::WslUbuntu => write!(f, "wsl_ubuntu"),
            Environment::Windows => write!(f, "windows"),
            Environment::Other => write!(f, "other"),
        }
    }
}

pub const PROC_VERSION: &str = "/proc/version";
pub const OS_RELEASE: &str = "/etc/os-release";

/// Source of the facts detection depends on. Lets tests supply file contents
/// without touching the real `/proc` and `/etc`.
pub trait OsProbe {
    /// Operating system identifier in `std::env::consts::OS` form.
    fn os(&self) -> &str;

    /// File contents, or `None` when the file is missing or unreadable.
    fn read_file(&self, path: &str) -> Option<String>;
}

/// Probe backed by the running system.
pub struct SystemProbe;

impl OsProbe for SystemProbe {
    fn os(&self) -> &str {
        std::env::consts::OS
    }

    fn read_file(&self, path: &str) -> Option<String> {
        match std::fs::read_to_string(path) {
            Ok(content) => Some(content),
            Err(e) => {
                tracing::debug!(path, error = %e, "could not read detection file");
                None
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Classify the running host.
pub fn detect_environment() -> Environment {
    detect_with_probe(&SystemProbe)
}

/// Classify the host described by `probe`. Never fails: anything that cannot
/// be read or recognised ends up as [`Environment::Other`].
pub fn detect_with_probe(probe: &dyn OsProbe) -> Environment {
    let environment = match probe.os() {
        "macos" => Environment::MacOS,
        "windows" => Environment::Windows,
        "linux" => classify_linux(
            probe.read_file(PROC_VERSION).as_deref(),
            probe.read_file(OS_RELEASE).as_deref(),
        ),
        _ => Environment::Other,
    };
    tracing::debug!(os = probe.os(), %environment, "detected environment");
    environment
}

/// Classify a Linux host from the contents of `/proc/version` and
/// `/etc/os-release`.
///
/// A WSL kernel takes priority: under WSL only an Ubuntu userland is
/// supported, anything else is `Other`.
pub fn classify_linux(proc_version: Option<&str>, os_release: Option<&str>) -> Environment {
    let ubuntu = os_release.is_some_and(mentions_ubuntu);

    match (proc_version.is_some_and(is_wsl_kernel), ubuntu) {
        (true, true) => Environment::WslUbuntu,
        (false, true) => Environment::Ubuntu,
        _ => Environment::Other,
    }
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn is_wsl_kernel(proc_version: &str) -> bool {
    let lower = proc_version.to_lowercase();
    lower.contains("microsoft") || lower.contains("wsl")
}

fn mentions_ubuntu(os_release: &str) -> bool {
    os_release.to_lowercase().contains("ubuntu")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const UBUNTU_RELEASE: &str =
        "NAME=\"Ubuntu\"\nVERSION_ID=\"24.04\"\nID=ubuntu\nID_LIKE=debian\n";
    const FEDORA_RELEASE: &str = "NAME=\"Fedora Linux\"\nID=fedora\nVERSION_ID=40\n";
    const PLAIN_KERNEL: &str = "Linux version 6.8.0-45-generic (buildd@lcy02-amd64-075)";
    const WSL_KERNEL: &str = "Linux version 5.15.153.1-microsoft-standard-WSL2 (root@1c602f52c2e4)";

    struct MockProbe {
        os: &'static str,
        files: HashMap<String, String>,
    }

    impl MockProbe {
        fn linux() -> Self {
            Self {
                os: "linux",
                files: HashMap::new(),
            }
        }

        fn with_file(mut self, path: &str, content: &str) -> Self {
            self.files.insert(path.into(), content.into());
            self
        }
    }

    impl OsProbe for MockProbe {
        fn os(&self) -> &str {
            self.os
        }

        fn read_file(&self, path: &str) -> Option<String> {
            self.files.get(path).cloned()
        }
    }

    #[test]
    fn ubuntu_without_wsl_marker() {
        let probe = MockProbe::linux()
            .with_file(PROC_VERSION, PLAIN_KERNEL)
            .with_file(OS_RELEASE, UBUNTU_RELEASE);
        assert_eq!(detect_with_probe(&probe), Environment::Ubuntu);
    }

    #[test]
    fn microsoft_kernel_turns_ubuntu_into_wsl_ubuntu() {
        let probe = MockProbe::linux()
            .with_file(PROC_VERSION, WSL_KERNEL)
            .with_file(OS_RELEASE, UBUNTU_RELEASE);
        assert_eq!(detect_with_probe(&probe), Environment::WslUbuntu);
    }

    #[test]
    fn wsl_marker_alone_is_enough() {
        assert_eq!(
            classify_linux(Some("Linux version 4.4.0-19041-WSL"), Some(UBUNTU_RELEASE)),
            Environment::WslUbuntu
        );
    }

    #[test]
    fn wsl_with_other_distro_is_other() {
        assert_eq!(
            classify_linux(Some(WSL_KERNEL), Some(FEDORA_RELEASE)),
            Environment::Other
        );
    }

    #[test]
    fn wsl_without_os_release_is_other() {
        assert_eq!(classify_linux(Some(WSL_KERNEL), None), Environment::Other);
    }

    #[test]
    fn missing_proc_version_still_detects_ubuntu() {
        let probe = MockProbe::linux().with_file(OS_RELEASE, UBUNTU_RELEASE);
        assert_eq!(detect_with_probe(&probe), Environment::Ubuntu);
    }

    #[test]
    fn unrecognised_contents_are_other() {
        assert_eq!(
            classify_linux(Some(PLAIN_KERNEL), Some(FEDORA_RELEASE)),
            Environment::Other
        );
        assert_eq!(classify_linux(Some(""), Some("")), Environment::Other);
        assert_eq!(
            classify_linux(Some("\u{fffd}garbage"), Some("not=an\nos-release")),
            Environment::Other
        );
    }

    #[test]
    fn unreadable_files_are_other() {
        let probe = MockProbe::linux();
        assert_eq!(detect_with_probe(&probe), Environment::Other);
    }

    #[test]
    fn macos_and_windows_by_os_identifier() {
        let mac = MockProbe {
            os: "macos",
            files: HashMap::new(),
        };
        let win = MockProbe {
            os: "windows",
            files: HashMap::new(),
        };
        assert_eq!(detect_with_probe(&mac), Environment::MacOS);
        assert_eq!(detect_with_probe(&win), Environment::Windows);
    }

    #[test]
    fn unknown_os_is_other() {
        let probe = MockProbe {
            os: "freebsd",
            files: HashMap::new(),
        }
        .with_file(OS_RELEASE, UBUNTU_RELEASE);
        assert_eq!(detect_with_probe(&probe), Environment::Other);
    }

    #[test]
    fn ubuntu_like_covers_both_ubuntu_variants() {
        assert!(Environment::Ubuntu.is_ubuntu_like());
        assert!(Environment::WslUbuntu.is_ubuntu_like());
        assert!(!Environment::MacOS.is_ubuntu_like());
        assert!(!Environment::Other.is_ubuntu_like());
    }

    #[test]
    fn display_matches_classification_names() {
        let names: Vec<String> = [
            Environment::MacOS,
            Environment::Ubuntu,
            Environment::WslUbuntu,
            Environment::Windows,
            Environment::Other,
        ]
        .iter()
        .map(|e| e.to_string())
        .collect();
        assert_eq!(names, ["macos", "ubuntu", "wsl_ubuntu", "windows", "other"]);
    }

    #[test]
    fn detect_environment_on_this_machine_does_not_panic() {
        let _ = detect_environment();
    }
}
