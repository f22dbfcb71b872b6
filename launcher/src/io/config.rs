//! Launcher configuration stored in `launcher.toml`.
//!
//! The file carries tuning knobs and the installed-interpreter registry. The
//! registry is produced by whatever installs interpreters; the launcher only
//! reads it.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

use crate::core::version::{InstalledInterpreter, Registry};
use crate::io::platform::{self, Platform};

/// File looked up next to the launcher executable.
pub const CONFIG_FILE_NAME: &str = "launcher.toml";
/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "LAUNCHER_CONFIG";

/// Launcher configuration (TOML).
///
/// Missing fields default to values suitable for a typical install.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LauncherConfig {
    /// Bytes read from the start of a script; also the line scan window.
    pub header_bytes: usize,

    /// Directive lines must be strictly shorter than this many characters.
    /// Kept below `header_bytes` so an oversized line is seen, not cut off.
    pub max_directive_chars: usize,

    /// Interpreter path, relative to the install root, used when a script has
    /// no directive.
    pub fallback_interpreter: String,

    /// Suffixes tried for each search-path directory, in order. `PATHEXT`
    /// replaces this list when set.
    pub search_extensions: Vec<String>,

    /// How often the supervisor checks for signals to relay while waiting.
    pub poll_interval_ms: u64,

    pub interpreters: Vec<InterpreterEntry>,
}

/// One installed interpreter, e.g. `{ tag = "3.8-64", path = "C:/Py38/python.exe" }`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct InterpreterEntry {
    pub tag: String,
    pub path: PathBuf,
}

impl Default for LauncherConfig {
    fn default() -> Self {
        Self {
            header_bytes: 8192,
            max_directive_chars: 4096,
            fallback_interpreter: platform::DEFAULT_FALLBACK_INTERPRETER.to_string(),
            search_extensions: platform::DEFAULT_SEARCH_EXTENSIONS
                .iter()
                .map(|ext| ext.to_string())
                .collect(),
            poll_interval_ms: 50,
            interpreters: Vec::new(),
        }
    }
}

impl LauncherConfig {
    pub fn validate(&self) -> Result<()> {
        if self.header_bytes == 0 {
            return Err(anyhow!("header_bytes must be > 0"));
        }
        if self.max_directive_chars == 0 {
            return Err(anyhow!("max_directive_chars must be > 0"));
        }
        if self.fallback_interpreter.trim().is_empty() {
            return Err(anyhow!("fallback_interpreter must be non-empty"));
        }
        if self.poll_interval_ms == 0 {
            return Err(anyhow!("poll_interval_ms must be > 0"));
        }
        let mut seen = HashSet::new();
        for entry in &self.interpreters {
            if InstalledInterpreter::new(&entry.tag, entry.path.clone()).is_none() {
                return Err(anyhow!(
                    "interpreter tag {:?} must look like MAJOR.MINOR[-32|-64]",
                    entry.tag
                ));
            }
            if !seen.insert(entry.tag.as_str()) {
                return Err(anyhow!("duplicate interpreter tag {:?}", entry.tag));
            }
        }
        Ok(())
    }

    /// Build the installed-interpreter registry from the configured entries.
    pub fn registry(&self) -> Result<Registry> {
        let entries = self
            .interpreters
            .iter()
            .map(|entry| {
                InstalledInterpreter::new(&entry.tag, entry.path.clone())
                    .ok_or_else(|| anyhow!("invalid interpreter tag {:?}", entry.tag))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Registry::new(entries))
    }
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `LauncherConfig::default()`.
pub fn load_config(path: &Path) -> Result<LauncherConfig> {
    if !path.exists() {
        let cfg = LauncherConfig::default();
        cfg.validate()?;
        return Ok(cfg);
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: LauncherConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()
        .with_context(|| format!("validate {}", path.display()))?;
    Ok(cfg)
}

/// Pick the config file: explicit path, then `LAUNCHER_CONFIG`, then
/// `launcher.toml` beside the launcher executable.
pub fn config_path(explicit: Option<&Path>, platform: &dyn Platform) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    if let Some(path) = platform.read_env(CONFIG_ENV).filter(|v| !v.is_empty()) {
        return Some(PathBuf::from(path));
    }
    let launcher = platform.launcher_path().ok()?;
    Some(launcher.parent()?.join(CONFIG_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::FakePlatform;

    #[test]
    fn load_missing_returns_default() {
        let temp = tempfile::tempdir().expect("tempdir");
        let cfg = load_config(&temp.path().join("missing.toml")).expect("load");
        assert_eq!(cfg, LauncherConfig::default());
    }

    #[test]
    fn default_line_limit_fits_inside_header_window() {
        let cfg = LauncherConfig::default();
        assert!(cfg.max_directive_chars < cfg.header_bytes);
    }

    #[test]
    fn parses_registry_entries() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join(CONFIG_FILE_NAME);
        fs::write(
            &path,
            r#"
max_directive_chars = 4096

[[interpreters]]
tag = "3.6-32"
path = "/opt/py36-32/python"

[[interpreters]]
tag = "3.8"
path = "/opt/py38/python"
"#,
        )
        .expect("write");
        let cfg = load_config(&path).expect("load");
        assert_eq!(cfg.max_directive_chars, 4096);
        assert_eq!(cfg.header_bytes, 8192);
        let registry = cfg.registry().expect("registry");
        let tags: Vec<&str> = registry
            .entries()
            .iter()
            .map(|entry| entry.tag.as_str())
            .collect();
        assert_eq!(tags, vec!["3.8", "3.6-32"]);
    }

    #[test]
    fn rejects_bad_and_duplicate_tags() {
        let mut cfg = LauncherConfig::default();
        cfg.interpreters.push(InterpreterEntry {
            tag: "python3".to_string(),
            path: PathBuf::from("x"),
        });
        assert!(cfg.validate().is_err());

        cfg.interpreters = vec![
            InterpreterEntry {
                tag: "3.8".to_string(),
                path: PathBuf::from("a"),
            },
            InterpreterEntry {
                tag: "3.8".to_string(),
                path: PathBuf::from("b"),
            },
        ];
        let err = cfg.validate().expect_err("duplicate");
        assert!(err.to_string().contains("duplicate"));
    }

    #[test]
    fn rejects_zero_sizes() {
        let cfg = LauncherConfig {
            header_bytes: 0,
            ..LauncherConfig::default()
        };
        assert!(cfg.validate().is_err());
        let cfg = LauncherConfig {
            poll_interval_ms: 0,
            ..LauncherConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn config_path_precedence() {
        let platform = FakePlatform::new("/opt/env/scripts/launcher", "/work");
        assert_eq!(
            config_path(None, &platform),
            Some(PathBuf::from("/opt/env/scripts").join(CONFIG_FILE_NAME))
        );

        let platform = platform.with_env(CONFIG_ENV, "/etc/launcher.toml");
        assert_eq!(
            config_path(None, &platform),
            Some(PathBuf::from("/etc/launcher.toml"))
        );
        assert_eq!(
            config_path(Some(Path::new("cli.toml")), &platform),
            Some(PathBuf::from("cli.toml"))
        );
    }
}
