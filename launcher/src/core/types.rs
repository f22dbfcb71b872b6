//! Shared deterministic types for launcher core logic.
//!
//! These types define stable contracts between pipeline stages. They should not
//! depend on external state or I/O and must remain deterministic across runs.

use serde::Serialize;

/// One decoded header line, without its terminator.
///
/// The character count is always strictly below the limit the line was
/// constructed with. Oversized lines are rejected, never truncated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShebangLine {
    text: String,
    chars: usize,
}

impl ShebangLine {
    /// Wrap `text`, rejecting it unless its character count is below `max_chars`.
    pub fn bounded(text: String, max_chars: usize) -> Result<Self, DirectiveTooLong> {
        let chars = text.chars().count();
        if chars >= max_chars {
            return Err(DirectiveTooLong {
                chars,
                max: max_chars,
            });
        }
        Ok(Self { text, chars })
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn char_count(&self) -> usize {
        self.chars
    }
}

/// A directive line did not fit under the configured character limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("directive is {chars} characters, limit is {max}")]
pub struct DirectiveTooLong {
    pub chars: usize,
    pub max: usize,
}

/// The fallback directive for a launcher location could not be built.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FallbackError {
    #[error(transparent)]
    TooLong(#[from] DirectiveTooLong),
    /// A path holding both quote characters cannot be written as one token.
    #[error("interpreter path {path} contains both ' and \"")]
    Unquotable { path: String },
}

/// Interpreter directive extracted from (or synthesized for) a script.
///
/// Produced once per launch and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedDirective {
    /// Interpreter token: a version tag, a path, or a bare command name.
    pub command: String,
    /// Free-text arguments following the command, leading whitespace trimmed.
    pub suffix: Option<String>,
    /// Set by the `/usr/bin/env <command>` form.
    pub search: bool,
    /// True when the directive came from the launcher's install location
    /// rather than the script itself.
    pub synthesized: bool,
}
