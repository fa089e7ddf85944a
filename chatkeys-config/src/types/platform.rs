//! Host platform families that affect modifier resolution.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Platform family of the machine the engine runs for.
///
/// macOS uses Cmd as its canonical accelerator; every other family uses Ctrl.
/// Windows is tracked separately because a few chords are reserved there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Mac,
    Windows,
    Linux,
}

impl Platform {
    /// Platform of the current compile target.
    pub fn current() -> Self {
        if cfg!(target_os = "macos") {
            Platform::Mac
        } else if cfg!(target_os = "windows") {
            Platform::Windows
        } else {
            Platform::Linux
        }
    }

    pub fn is_mac(self) -> bool {
        self == Platform::Mac
    }

    pub fn is_windows(self) -> bool {
        self == Platform::Windows
    }
}

impl Default for Platform {
    fn default() -> Self {
        Self::current()
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Platform::Mac => "mac",
            Platform::Windows => "windows",
            Platform::Linux => "linux",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for Platform {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mac" | "macos" | "darwin" => Ok(Platform::Mac),
            "windows" | "win" => Ok(Platform::Windows),
            "linux" | "other" => Ok(Platform::Linux),
            _ => Err(ConfigError::UnknownValue {
                kind: "platform",
                value: s.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_aliases() {
        assert_eq!("macOS".parse::<Platform>().unwrap(), Platform::Mac);
        assert_eq!("win".parse::<Platform>().unwrap(), Platform::Windows);
        assert_eq!("linux".parse::<Platform>().unwrap(), Platform::Linux);
        assert!("beos".parse::<Platform>().is_err());
    }

    #[test]
    fn test_only_mac_is_mac() {
        assert!(Platform::Mac.is_mac());
        assert!(!Platform::Windows.is_mac());
        assert!(!Platform::Linux.is_mac());
        assert!(Platform::Windows.is_windows());
    }
}
