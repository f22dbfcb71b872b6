//! Turn a directive's command token into a concrete executable path.
//!
//! Resolution order:
//! 1. A version tag (`3`, `3.8`, `3.6-32`) is looked up in the registry.
//! 2. A token containing a path separator is checked on disk as-is.
//! 3. Anything else is searched for in each `PATH` directory with each
//!    recognized executable suffix, directory-major. Files that are not
//!    executable are skipped.
//!
//! Each branch has its own failure; nothing falls through to a default.

use std::env;
use std::path::{Path, PathBuf};

use tracing::{debug, instrument};

use crate::core::types::ParsedDirective;
use crate::core::version::{Registry, VersionTag};
use crate::error::LaunchError;
use crate::io::config::LauncherConfig;
use crate::io::platform::Platform;

/// Directories and executable suffixes searched for bare command names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchPath {
    pub dirs: Vec<PathBuf>,
    pub extensions: Vec<String>,
}

impl SearchPath {
    /// `PATH` directories in order; suffixes from `PATHEXT` when set, else
    /// from config. With `PATHEXT` the bare name is always tried first.
    pub fn from_platform(platform: &dyn Platform, config: &LauncherConfig) -> Self {
        let dirs = platform
            .read_env("PATH")
            .map(|path| {
                env::split_paths(&path)
                    .filter(|dir| !dir.as_os_str().is_empty())
                    .collect()
            })
            .unwrap_or_default();
        let extensions = match platform.read_env("PATHEXT") {
            Some(pathext) if !pathext.is_empty() => {
                let mut extensions = vec![String::new()];
                extensions.extend(
                    pathext
                        .to_string_lossy()
                        .split(';')
                        .filter(|ext| !ext.is_empty())
                        .map(str::to_string),
                );
                extensions
            }
            _ => config.search_extensions.clone(),
        };
        Self { dirs, extensions }
    }
}

pub struct Resolver<'a> {
    registry: &'a Registry,
    search: SearchPath,
    cwd: PathBuf,
}

impl<'a> Resolver<'a> {
    pub fn new(registry: &'a Registry, search: SearchPath, cwd: PathBuf) -> Self {
        Self {
            registry,
            search,
            cwd,
        }
    }

    #[instrument(skip_all, fields(command = %directive.command, search = directive.search))]
    pub fn resolve(&self, directive: &ParsedDirective) -> Result<PathBuf, LaunchError> {
        let command = directive.command.as_str();

        if VersionTag::parse(command).is_some() {
            let entry =
                self.registry
                    .select(command)
                    .ok_or_else(|| LaunchError::InterpreterNotFound {
                        tag: command.to_string(),
                    })?;
            debug!(tag = %entry.tag, path = %entry.path.display(), "registry match");
            return Ok(self.cwd.join(&entry.path));
        }

        if is_path(command) {
            let path = self.cwd.join(command);
            if path.exists() {
                return Ok(path);
            }
            return Err(LaunchError::PathNotFound { path });
        }

        self.search_dirs(command)
    }

    fn search_dirs(&self, command: &str) -> Result<PathBuf, LaunchError> {
        for dir in &self.search.dirs {
            for ext in &self.search.extensions {
                let name = format!("{command}{ext}");
                if let Ok(found) = which::which_in(name, Some(dir), &self.cwd) {
                    debug!(path = %found.display(), "found on search path");
                    return Ok(self.cwd.join(found));
                }
            }
        }
        Err(LaunchError::SearchExhausted {
            command: command.to_string(),
            searched: self.search.dirs.len(),
        })
    }
}

fn is_path(command: &str) -> bool {
    Path::new(command).is_absolute() || command.chars().any(std::path::is_separator)
}
