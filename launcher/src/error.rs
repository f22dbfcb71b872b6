//! Typed launch failures, one variant per user-visible failure class.

use std::io;
use std::path::PathBuf;

use crate::core::types::{DirectiveTooLong, FallbackError};
use crate::exit_codes;

#[derive(Debug, thiserror::Error)]
pub enum LaunchError {
    #[error("cannot read script {}", path.display())]
    ScriptUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed directive in {}", path.display())]
    MalformedHeader {
        path: PathBuf,
        #[source]
        source: DirectiveTooLong,
    },

    #[error("cannot build fallback directive for launcher {}", launcher.display())]
    Fallback {
        launcher: PathBuf,
        #[source]
        source: FallbackError,
    },

    #[error("no installed interpreter matches version tag {tag:?}")]
    InterpreterNotFound { tag: String },

    #[error("interpreter {} does not exist", path.display())]
    PathNotFound { path: PathBuf },

    #[error("{command:?} not found in {searched} search path directories")]
    SearchExhausted { command: String, searched: usize },

    #[error("failed to start {}", program.display())]
    ProcessCreation {
        program: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to supervise child process")]
    Supervise {
        #[source]
        source: io::Error,
    },
}

impl LaunchError {
    /// Stable process exit code for this failure class.
    pub fn exit_code(&self) -> i32 {
        match self {
            LaunchError::ScriptUnreadable { .. } => exit_codes::SCRIPT_UNREADABLE,
            LaunchError::MalformedHeader { .. } | LaunchError::Fallback { .. } => {
                exit_codes::MALFORMED_HEADER
            }
            LaunchError::InterpreterNotFound { .. } => exit_codes::INTERPRETER_NOT_FOUND,
            LaunchError::PathNotFound { .. } => exit_codes::PATH_NOT_FOUND,
            LaunchError::SearchExhausted { .. } => exit_codes::SEARCH_EXHAUSTED,
            LaunchError::ProcessCreation { .. } | LaunchError::Supervise { .. } => {
                exit_codes::PROCESS_CREATION_FAILED
            }
        }
    }
}
