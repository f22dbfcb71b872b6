//! Version tags and selection from the installed-interpreter registry.
//!
//! Tag grammar: `MAJOR[.MINOR][-32|-64]`. Selection rules:
//!
//! 1. An entry whose tag equals the requested text wins outright.
//! 2. Otherwise candidates must match the requested major (and minor, when
//!    given) and the requested bitness (when given).
//! 3. Among candidates the highest minor wins; at equal versions 64-bit is
//!    preferred over 32-bit.

use std::path::PathBuf;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+)(?:\.(\d+))?(?:-(32|64))?$").expect("version tag pattern")
});

/// Pointer width of an installed interpreter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum Bitness {
    #[serde(rename = "32")]
    X32,
    #[serde(rename = "64")]
    X64,
}

/// A parsed version tag, e.g. `3`, `3.8`, or `3.6-32`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VersionTag {
    pub major: u32,
    pub minor: Option<u32>,
    pub bits: Option<Bitness>,
}

impl VersionTag {
    /// Parse `text` against the tag grammar. Anything else is not a tag.
    pub fn parse(text: &str) -> Option<Self> {
        let caps = TAG_RE.captures(text)?;
        let major = caps.get(1)?.as_str().parse().ok()?;
        let minor = match caps.get(2) {
            Some(m) => Some(m.as_str().parse().ok()?),
            None => None,
        };
        let bits = caps.get(3).map(|m| match m.as_str() {
            "32" => Bitness::X32,
            _ => Bitness::X64,
        });
        Some(Self { major, minor, bits })
    }
}

/// One registry entry: a fully specified version and its executable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstalledInterpreter {
    pub tag: String,
    pub major: u32,
    pub minor: u32,
    pub bits: Bitness,
    pub path: PathBuf,
}

impl InstalledInterpreter {
    /// Build an entry from a `MAJOR.MINOR[-32|-64]` tag. A missing bitness means 64-bit.
    pub fn new(tag: &str, path: PathBuf) -> Option<Self> {
        let parsed = VersionTag::parse(tag)?;
        Some(Self {
            tag: tag.to_string(),
            major: parsed.major,
            minor: parsed.minor?,
            bits: parsed.bits.unwrap_or(Bitness::X64),
            path,
        })
    }

    fn version_key(&self) -> (u32, u32, Bitness) {
        (self.major, self.minor, self.bits)
    }
}

/// Read-only set of installed interpreters, supplied from outside the launcher.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Registry {
    entries: Vec<InstalledInterpreter>,
}

impl Registry {
    pub fn new(mut entries: Vec<InstalledInterpreter>) -> Self {
        entries.sort_by_key(|entry| std::cmp::Reverse(entry.version_key()));
        Self { entries }
    }

    /// Entries ordered highest version first, 64-bit before 32-bit.
    pub fn entries(&self) -> &[InstalledInterpreter] {
        &self.entries
    }

    /// Select the interpreter for a requested tag string.
    pub fn select(&self, requested: &str) -> Option<&InstalledInterpreter> {
        if let Some(exact) = self.entries.iter().find(|entry| entry.tag == requested) {
            return Some(exact);
        }
        let wanted = VersionTag::parse(requested)?;
        // Entries are sorted descending, so the first candidate is the best.
        self.entries.iter().find(|entry| {
            entry.major == wanted.major
                && wanted.minor.is_none_or(|minor| entry.minor == minor)
                && wanted.bits.is_none_or(|bits| entry.bits == bits)
        })
    }
}
