//! Interpreter directive parsing and fallback synthesis.
//!
//! A directive is `#!` at offset 0 followed by a command token (quoted or a
//! run of non-whitespace) and optional free-text arguments. Scripts without
//! one get a synthetic directive naming the interpreter installed one level
//! above the launcher's own directory.

use std::path::Path;

use crate::core::types::{FallbackError, ParsedDirective, ShebangLine};

/// Commands that request a search-path lookup of the token that follows them.
const SEARCH_MARKERS: &[&str] = &["/usr/bin/env", "/bin/env"];

/// A token split off the front of a directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Token<'a> {
    pub text: &'a str,
    pub rest: &'a str,
    /// False when a quoted token ran to the end of input without its closing quote.
    pub closed: bool,
}

/// Split the next token off `input`, skipping leading whitespace.
pub(crate) fn next_token(input: &str) -> Option<Token<'_>> {
    let input = input.trim_start();
    let first = input.chars().next()?;
    if first == '"' || first == '\'' {
        let body = &input[1..];
        return Some(match body.find(first) {
            Some(end) => Token {
                text: &body[..end],
                rest: &body[end + 1..],
                closed: true,
            },
            None => Token {
                text: body,
                rest: "",
                closed: false,
            },
        });
    }
    let end = input.find(char::is_whitespace).unwrap_or(input.len());
    Some(Token {
        text: &input[..end],
        rest: &input[end..],
        closed: true,
    })
}

fn command_token(input: &str) -> Option<Token<'_>> {
    next_token(input).filter(|token| token.closed && !token.text.is_empty())
}

/// Parse `line` as `#!command [args]`.
///
/// Returns `None` when the line is not a usable directive: no `#!` prefix, no
/// command, or an unterminated quoted command.
pub fn parse_directive(line: &ShebangLine) -> Option<ParsedDirective> {
    let body = line.as_str().strip_prefix("#!")?;
    let mut token = command_token(body)?;
    let mut search = false;
    if SEARCH_MARKERS.contains(&token.text) {
        token = command_token(token.rest)?;
        search = true;
    }
    let suffix = token.rest.trim_start();
    Some(ParsedDirective {
        command: token.text.to_string(),
        suffix: (!suffix.is_empty()).then(|| suffix.to_string()),
        search,
        synthesized: false,
    })
}

/// Split directive arguments into tokens using the command-token rules.
///
/// An unterminated quote swallows the rest of the text into one token.
pub fn split_arguments(suffix: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut rest = suffix;
    while let Some(token) = next_token(rest) {
        tokens.push(token.text.to_string());
        rest = token.rest;
    }
    tokens
}

/// Build the synthetic `#!<install-root>/<interpreter>` line for a launcher.
///
/// The install root is the parent of the directory holding the launcher.
/// Returns `Ok(None)` when the launcher path has no such grandparent. Fails
/// when the line would not fit under `max_chars`, or when the path contains
/// both quote characters and so cannot be read back as a single token.
pub fn synthesize_fallback(
    launcher: &Path,
    interpreter: &str,
    max_chars: usize,
) -> Result<Option<ShebangLine>, FallbackError> {
    let Some(root) = launcher
        .parent()
        .and_then(Path::parent)
        .filter(|root| !root.as_os_str().is_empty())
    else {
        return Ok(None);
    };
    let target = root.join(interpreter);
    let target = target.to_string_lossy();
    let text = if target.contains('"') {
        if target.contains('\'') {
            return Err(FallbackError::Unquotable {
                path: target.into_owned(),
            });
        }
        format!("#!'{target}'")
    } else if target.contains(char::is_whitespace) || target.contains('\'') {
        format!("#!\"{target}\"")
    } else {
        format!("#!{target}")
    };
    Ok(Some(ShebangLine::bounded(text, max_chars)?))
}

/// Synthesize and parse the fallback directive for `launcher`.
pub fn fallback_directive(
    launcher: &Path,
    interpreter: &str,
    max_chars: usize,
) -> Result<Option<ParsedDirective>, FallbackError> {
    let Some(line) = synthesize_fallback(launcher, interpreter, max_chars)? else {
        return Ok(None);
    };
    Ok(parse_directive(&line).map(|directive| ParsedDirective {
        synthesized: true,
        ..directive
    }))
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn line(text: &str) -> ShebangLine {
        ShebangLine::bounded(text.to_string(), 8192).expect("line")
    }

    #[test]
    fn parses_command_and_suffix() {
        let directive = parse_directive(&line("#!cmd arg1 arg2")).expect("directive");
        assert_eq!(directive.command, "cmd");
        assert_eq!(directive.suffix.as_deref(), Some("arg1 arg2"));
        assert!(!directive.search);
        assert!(!directive.synthesized);
    }

    #[test]
    fn quoted_command_keeps_spaces() {
        let directive =
            parse_directive(&line(r#"#!"C:\Program Files\Python\python.exe" -u -E"#))
                .expect("directive");
        assert_eq!(directive.command, r"C:\Program Files\Python\python.exe");
        assert_eq!(directive.suffix.as_deref(), Some("-u -E"));
    }

    #[test]
    fn whitespace_after_marker_is_skipped() {
        let directive = parse_directive(&line("#!   /bin/sh\t-e")).expect("directive");
        assert_eq!(directive.command, "/bin/sh");
        assert_eq!(directive.suffix.as_deref(), Some("-e"));
    }

    #[test]
    fn bare_command_has_no_suffix() {
        let directive = parse_directive(&line("#!3.8-64")).expect("directive");
        assert_eq!(directive.command, "3.8-64");
        assert_eq!(directive.suffix, None);
    }

    #[test]
    fn env_form_sets_search_flag() {
        let directive = parse_directive(&line("#!/usr/bin/env python3 -O")).expect("directive");
        assert_eq!(directive.command, "python3");
        assert_eq!(directive.suffix.as_deref(), Some("-O"));
        assert!(directive.search);
    }

    #[test]
    fn non_directives_are_rejected() {
        assert_eq!(parse_directive(&line("import sys")), None);
        assert_eq!(parse_directive(&line("# !python")), None);
        assert_eq!(parse_directive(&line("#!")), None);
        assert_eq!(parse_directive(&line("#!   ")), None);
        assert_eq!(parse_directive(&line("#!\"\" -u")), None);
        assert_eq!(parse_directive(&line("#!\"C:\\Py\\python.exe -u")), None);
        assert_eq!(parse_directive(&line("#!/usr/bin/env")), None);
    }

    #[test]
    fn split_arguments_honours_quotes() {
        assert_eq!(
            split_arguments(r#"-X "dev mode" -W 'ignore'  -u"#),
            vec!["-X", "dev mode", "-W", "ignore", "-u"]
        );
        assert_eq!(split_arguments("   "), Vec::<String>::new());
        assert_eq!(split_arguments("-c \"open"), vec!["-c", "open"]);
    }

    #[test]
    fn fallback_uses_parent_of_launcher_directory() {
        let launcher = PathBuf::from("/opt/env/scripts/tool");
        let directive = fallback_directive(&launcher, "bin/python", 8192)
            .expect("fits")
            .expect("directive");
        assert_eq!(
            PathBuf::from(&directive.command),
            PathBuf::from("/opt/env/bin/python")
        );
        assert!(directive.synthesized);
        assert_eq!(directive.suffix, None);
    }

    #[test]
    fn fallback_is_deterministic() {
        let launcher = Path::new("/srv/app/Scripts/run");
        let first = synthesize_fallback(launcher, "python.exe", 8192).expect("fits");
        let second = synthesize_fallback(launcher, "python.exe", 8192).expect("fits");
        assert_eq!(first, second);
    }

    #[test]
    fn fallback_quotes_paths_with_spaces() {
        let launcher = Path::new("/home/me/My Env/scripts/tool");
        let directive = fallback_directive(launcher, "python", 8192)
            .expect("fits")
            .expect("directive");
        assert_eq!(
            PathBuf::from(&directive.command),
            PathBuf::from("/home/me/My Env/python")
        );
    }

    #[test]
    fn fallback_rejects_oversized_paths() {
        let deep = format!("/{}/scripts/tool", "a".repeat(100));
        let err = synthesize_fallback(Path::new(&deep), "python", 64).expect_err("too long");
        let FallbackError::TooLong(err) = err else {
            panic!("expected length failure, got {err:?}");
        };
        assert_eq!(err.max, 64);
        assert!(err.chars >= 64);
    }

    #[test]
    fn fallback_keeps_single_quote_inside_double_quotes() {
        let launcher = Path::new("/opt/o'neil env/scripts/tool");
        let directive = fallback_directive(launcher, "python", 8192)
            .expect("fits")
            .expect("directive");
        assert_eq!(
            PathBuf::from(&directive.command),
            PathBuf::from("/opt/o'neil env/python")
        );
        assert_eq!(directive.suffix, None);
    }

    #[test]
    fn fallback_rejects_root_with_both_quote_kinds() {
        let launcher = Path::new("/opt/a'b \"c/scripts/tool");
        let err = fallback_directive(launcher, "python", 8192).expect_err("unquotable");
        assert_eq!(
            err,
            FallbackError::Unquotable {
                path: "/opt/a'b \"c/python".to_string()
            }
        );
    }

    #[test]
    fn fallback_without_install_root_is_absent() {
        assert_eq!(synthesize_fallback(Path::new("tool"), "python", 8192), Ok(None));
        assert_eq!(
            synthesize_fallback(Path::new("scripts/tool"), "python", 8192),
            Ok(None)
        );
    }
}
