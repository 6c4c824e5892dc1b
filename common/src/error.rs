//! Error types for each setup step.
//!
//! Input validation problems never show up here; the collector handles them
//! by asking again. These cover the failures that end a run.

use std::io;
use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum InputError {
    #[error("failed to read from the terminal")]
    Io(#[from] io::Error),

    #[error("input closed while waiting for {field}")]
    Closed { field: &'static str },

    #[error("could not determine the current directory")]
    CurrentDir(#[source] io::Error),
}

#[derive(Debug, Error)]
pub enum HashError {
    #[error(
        "could not run '{bin}', this is probably because htpasswd is not installed. \
         Please install htpasswd and try again"
    )]
    NotFound {
        bin: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to run '{bin}'")]
    Spawn {
        bin: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("'{bin}' exited with {status}: {stderr}")]
    Failed {
        bin: PathBuf,
        status: ExitStatus,
        stderr: String,
    },

    #[error("unexpected output from '{bin}': {reason}")]
    MalformedOutput { bin: PathBuf, reason: String },
}

#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("template {path} is missing")]
    MissingTemplate { path: PathBuf },

    #[error("{path} already exists, rerun with --force or confirm the reset")]
    AlreadyExists { path: PathBuf },

    #[error("failed to {action} {path}")]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, Error)]
pub enum PatchError {
    #[error("failed to read {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Any failure that aborts a setup run.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Hash(#[from] HashError),

    #[error(transparent)]
    Layout(#[from] LayoutError),

    #[error(transparent)]
    Patch(#[from] PatchError),
}

impl LayoutError {
    pub fn io(action: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            action,
            path: path.into(),
            source,
        }
    }
}
