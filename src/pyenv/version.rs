use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;

use crate::error::SetupError;

fn version_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d+\.\d+\.\d+$").expect("valid regex"))
}

/// Whether `s` is a plain `MAJOR.MINOR.PATCH` CPython version.
pub fn is_version(s: &str) -> bool {
    version_regex().is_match(s)
}

/// A CPython release identifier such as `3.12.4`.
///
/// The original text is kept verbatim so it compares equal to what `pyenv
/// versions --bare` prints.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PythonVersion {
    text: String,
    parts: (u64, u64, u64),
}

impl PythonVersion {
    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl FromStr for PythonVersion {
    type Err = SetupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if !is_version(s) {
            return Err(SetupError::InvalidVersion(s.to_string()));
        }
        let mut nums = s.split('.').map(str::parse::<u64>);
        match (nums.next(), nums.next(), nums.next()) {
            (Some(Ok(major)), Some(Ok(minor)), Some(Ok(patch))) => Ok(Self {
                text: s.to_string(),
                parts: (major, minor, patch),
            }),
            _ => Err(SetupError::InvalidVersion(s.to_string())),
        }
    }
}

impl fmt::Display for PythonVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Pull CPython versions out of `pyenv install --list` output, in the order
/// pyenv printed them. Headers, pre-releases and other implementations
/// (`3.13.0rc1`, `pypy3.10-7.3.16`, `miniconda3-latest`, ...) are dropped.
pub fn parse_available(output: &str) -> Vec<PythonVersion> {
    output
        .lines()
        .filter_map(|line| line.trim().parse().ok())
        .collect()
}

/// Whether `versions` is in non-decreasing order. The picker relies on this
/// to treat the tail of the list as the most recent releases.
pub fn is_ascending(versions: &[PythonVersion]) -> bool {
    versions.windows(2).all(|w| w[0].parts <= w[1].parts)
}
