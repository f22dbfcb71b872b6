//! Test-only helpers: a scriptable platform and throwaway install layouts.

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Child, ExitStatus};

use anyhow::{Context, Result};
use tempfile::TempDir;

use crate::core::compose::ChildInvocation;
use crate::core::version::{InstalledInterpreter, Registry};
use crate::io::platform::{PendingSignals, Platform, SystemPlatform};

/// Platform with a fixed launcher location, working directory, and environment.
///
/// Spawning and exit-code mapping go to the real system; intercepted signals
/// come from a preset list instead of the operating system.
#[derive(Debug, Clone)]
pub struct FakePlatform {
    launcher: PathBuf,
    cwd: PathBuf,
    env: HashMap<String, OsString>,
    signals: Vec<i32>,
}

impl FakePlatform {
    pub fn new(launcher: impl Into<PathBuf>, cwd: impl Into<PathBuf>) -> Self {
        Self {
            launcher: launcher.into(),
            cwd: cwd.into(),
            env: HashMap::new(),
            signals: Vec::new(),
        }
    }

    pub fn with_env(mut self, key: &str, value: impl Into<OsString>) -> Self {
        self.env.insert(key.to_string(), value.into());
        self
    }

    /// Signals reported as pending, in order, once the child is running.
    pub fn with_signals(mut self, signals: &[i32]) -> Self {
        self.signals = signals.to_vec();
        self
    }
}

struct ScriptedSignals(RefCell<VecDeque<i32>>);

impl PendingSignals for ScriptedSignals {
    fn take(&self) -> Option<i32> {
        self.0.borrow_mut().pop_front()
    }
}

impl Platform for FakePlatform {
    fn launcher_path(&self) -> io::Result<PathBuf> {
        Ok(self.launcher.clone())
    }

    fn current_dir(&self) -> io::Result<PathBuf> {
        Ok(self.cwd.clone())
    }

    fn read_env(&self, key: &str) -> Option<OsString> {
        self.env.get(key).cloned()
    }

    fn spawn(&self, invocation: &ChildInvocation) -> io::Result<Child> {
        SystemPlatform.spawn(invocation)
    }

    fn intercept_signals(&self) -> io::Result<Box<dyn PendingSignals>> {
        Ok(Box::new(ScriptedSignals(RefCell::new(
            self.signals.iter().copied().collect(),
        ))))
    }

    fn forward_signal(&self, child: &Child, signal: i32) -> io::Result<()> {
        SystemPlatform.forward_signal(child, signal)
    }

    fn exit_code(&self, status: ExitStatus) -> i32 {
        SystemPlatform.exit_code(status)
    }
}

/// A temporary install: `<root>/scripts/launcher` and `<root>/bin/python`.
pub struct TempInstall {
    pub dir: TempDir,
    pub launcher: PathBuf,
    pub interpreter: PathBuf,
}

impl TempInstall {
    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Platform whose launcher lives in this install and whose cwd is the root.
    pub fn platform(&self) -> FakePlatform {
        FakePlatform::new(&self.launcher, self.root())
    }

    /// Write a script under the install root and return its path.
    pub fn script(&self, name: &str, contents: &[u8]) -> Result<PathBuf> {
        write_script(self.root(), name, contents)
    }
}

/// Create a [`TempInstall`] with empty launcher and interpreter files.
pub fn temp_install() -> Result<TempInstall> {
    let dir = tempfile::tempdir().context("create temp install")?;
    let launcher = write_script(dir.path(), "scripts/launcher", b"")?;
    let interpreter = write_script(dir.path(), "bin/python", b"")?;
    Ok(TempInstall {
        dir,
        launcher,
        interpreter,
    })
}

/// Write `contents` to `dir/name`, creating parent directories.
pub fn write_script(dir: &Path, name: &str, contents: &[u8]) -> Result<PathBuf> {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
    }
    fs::write(&path, contents).with_context(|| format!("write {}", path.display()))?;
    Ok(path)
}

/// Build a registry from `(tag, path)` pairs.
pub fn registry(entries: &[(&str, &Path)]) -> Registry {
    Registry::new(
        entries
            .iter()
            .filter_map(|(tag, path)| InstalledInterpreter::new(tag, path.to_path_buf()))
            .collect(),
    )
}
