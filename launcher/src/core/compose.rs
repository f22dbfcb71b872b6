//! Child command composition and argument quoting.

use std::borrow::Cow;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use serde::{Serialize, Serializer};

use crate::core::directive::split_arguments;

/// Characters that force a token to be quoted in a rendered command line.
const SIGNIFICANT: &[char] = &[
    '"', '\'', '&', '|', '<', '>', '^', '(', ')', '%', '!', ';', '`', '$', '*', '?',
];

/// The exact argument vector handed to the child process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChildInvocation {
    pub program: PathBuf,
    pub args: Vec<OsString>,
}

impl ChildInvocation {
    /// Program followed by arguments, as display strings.
    pub fn argv(&self) -> Vec<String> {
        std::iter::once(self.program.as_os_str())
            .chain(self.args.iter().map(OsString::as_os_str))
            .map(|arg| arg.to_string_lossy().into_owned())
            .collect()
    }

    /// Render a single command line with every token quoted as needed.
    pub fn command_line(&self) -> String {
        self.argv()
            .iter()
            .map(|arg| quote_arg(arg))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Serialize for ChildInvocation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct Rendered {
            argv: Vec<String>,
            command_line: String,
        }
        Rendered {
            argv: self.argv(),
            command_line: self.command_line(),
        }
        .serialize(serializer)
    }
}

/// Build `[interpreter, <suffix tokens>, script, <args>]`.
pub fn compose(
    interpreter: &Path,
    suffix: Option<&str>,
    script: &Path,
    args: &[OsString],
) -> ChildInvocation {
    let mut child_args: Vec<OsString> = suffix
        .map(split_arguments)
        .unwrap_or_default()
        .into_iter()
        .map(OsString::from)
        .collect();
    child_args.push(script.as_os_str().to_owned());
    child_args.extend(args.iter().cloned());
    ChildInvocation {
        program: interpreter.to_path_buf(),
        args: child_args,
    }
}

/// Run the target itself with the caller's arguments.
pub fn pass_through(script: &Path, args: &[OsString]) -> ChildInvocation {
    ChildInvocation {
        program: script.to_path_buf(),
        args: args.to_vec(),
    }
}

/// Quote `arg` if it is empty or contains whitespace or shell-significant characters.
///
/// Inside quotes, `"` becomes `\"` and backslashes that precede a quote (or the
/// closing quote) are doubled, so the token parses back to exactly `arg`.
pub fn quote_arg(arg: &str) -> Cow<'_, str> {
    let needs_quotes =
        arg.is_empty() || arg.contains(char::is_whitespace) || arg.contains(SIGNIFICANT);
    if !needs_quotes {
        return Cow::Borrowed(arg);
    }

    let mut quoted = String::with_capacity(arg.len() + 2);
    quoted.push('"');
    let mut backslashes = 0usize;
    for c in arg.chars() {
        match c {
            '\\' => backslashes += 1,
            '"' => {
                quoted.extend(std::iter::repeat_n('\\', backslashes * 2 + 1));
                quoted.push('"');
                backslashes = 0;
            }
            _ => {
                quoted.extend(std::iter::repeat_n('\\', backslashes));
                quoted.push(c);
                backslashes = 0;
            }
        }
    }
    quoted.extend(std::iter::repeat_n('\\', backslashes * 2));
    quoted.push('"');
    Cow::Owned(quoted)
}
