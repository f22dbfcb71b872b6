//! Launch orchestration for `launcher run` and `launcher resolve`.
//!
//! Pipeline: read header → detect encoding → extract first line → parse or
//! synthesize a directive → resolve the interpreter → compose the child
//! command. Files without a line terminator in the header are run directly.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::core::bom::{self, Encoding};
use crate::core::compose::{ChildInvocation, compose, pass_through};
use crate::core::directive::{fallback_directive, parse_directive};
use crate::core::line::extract_line;
use crate::core::types::{ParsedDirective, ShebangLine};
use crate::core::version::Registry;
use crate::error::LaunchError;
use crate::io::config::LauncherConfig;
use crate::io::header::read_header;
use crate::io::platform::Platform;
use crate::io::resolver::{Resolver, SearchPath};
use crate::io::supervisor::supervise;

/// Target script plus the caller's arguments, forwarded verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchRequest {
    pub script: PathBuf,
    pub args: Vec<OsString>,
}

/// What the launcher will execute for a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LaunchPlan {
    /// Script routed through the interpreter its directive names.
    Interpreted {
        encoding: Encoding,
        directive: ParsedDirective,
        interpreter: PathBuf,
        invocation: ChildInvocation,
    },
    /// Not a text script; the target runs as-is.
    PassThrough { invocation: ChildInvocation },
}

impl LaunchPlan {
    pub fn invocation(&self) -> &ChildInvocation {
        match self {
            LaunchPlan::Interpreted { invocation, .. } | LaunchPlan::PassThrough { invocation } => {
                invocation
            }
        }
    }
}

pub struct Launcher<'a> {
    config: &'a LauncherConfig,
    registry: &'a Registry,
    platform: &'a dyn Platform,
}

impl<'a> Launcher<'a> {
    pub fn new(
        config: &'a LauncherConfig,
        registry: &'a Registry,
        platform: &'a dyn Platform,
    ) -> Self {
        Self {
            config,
            registry,
            platform,
        }
    }

    /// Work out the child invocation without starting anything.
    #[instrument(skip_all, fields(script = %request.script.display()))]
    pub fn plan(&self, request: &LaunchRequest) -> Result<LaunchPlan, LaunchError> {
        let cwd = self.platform.current_dir().unwrap_or_else(|err| {
            warn!(err = %err, "current directory unavailable; keeping paths relative");
            PathBuf::new()
        });

        let header = read_header(&request.script, self.config.header_bytes).map_err(|source| {
            LaunchError::ScriptUnreadable {
                path: request.script.clone(),
                source,
            }
        })?;
        let detected = bom::detect(header.bytes());
        debug!(encoding = ?detected.encoding, skip = detected.skip, "detected encoding");

        let Some(text) = extract_line(&header.bytes()[detected.skip..], detected.encoding) else {
            info!("no line terminator in header; running target directly");
            return Ok(self.pass_through(request, &cwd));
        };
        let line = ShebangLine::bounded(text, self.config.max_directive_chars).map_err(
            |source| LaunchError::MalformedHeader {
                path: request.script.clone(),
                source,
            },
        )?;
        debug!(chars = line.char_count(), "extracted first line");

        let directive = match parse_directive(&line) {
            Some(directive) => directive,
            None => match self.fallback()? {
                Some(directive) => directive,
                None => {
                    info!("no directive and no install root; running target directly");
                    return Ok(self.pass_through(request, &cwd));
                }
            },
        };
        debug!(
            command = %directive.command,
            suffix = ?directive.suffix,
            search = directive.search,
            synthesized = directive.synthesized,
            "parsed directive"
        );

        let search = SearchPath::from_platform(self.platform, self.config);
        let interpreter = Resolver::new(self.registry, search, cwd).resolve(&directive)?;
        let invocation = compose(
            &interpreter,
            directive.suffix.as_deref(),
            &request.script,
            &request.args,
        );
        Ok(LaunchPlan::Interpreted {
            encoding: detected.encoding,
            directive,
            interpreter,
            invocation,
        })
    }

    /// Plan, run, and return the exit code the launcher should exit with.
    pub fn run(&self, request: &LaunchRequest) -> Result<i32, LaunchError> {
        let plan = self.plan(request)?;
        info!(command_line = %plan.invocation().command_line(), "launching");
        supervise(
            self.platform,
            plan.invocation(),
            Duration::from_millis(self.config.poll_interval_ms),
        )
    }

    fn fallback(&self) -> Result<Option<ParsedDirective>, LaunchError> {
        let launcher = match self.platform.launcher_path() {
            Ok(path) => path,
            Err(err) => {
                warn!(err = %err, "launcher location unavailable; no fallback directive");
                return Ok(None);
            }
        };
        debug!(launcher = %launcher.display(), "synthesizing fallback directive");
        fallback_directive(
            &launcher,
            &self.config.fallback_interpreter,
            self.config.max_directive_chars,
        )
        .map_err(|source| LaunchError::Fallback { launcher, source })
    }

    fn pass_through(&self, request: &LaunchRequest, cwd: &Path) -> LaunchPlan {
        LaunchPlan::PassThrough {
            invocation: pass_through(&cwd.join(&request.script), &request.args),
        }
    }
}
