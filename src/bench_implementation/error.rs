use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, MolecError>;

#[derive(Error, Debug)]
pub enum MolecError {
    /// The molec executable is not where we looked for it
    #[error("no such file or directory: {}", .0.display())]
    ExecutableNotFound(PathBuf),

    #[error("failed to spawn {}: {source}", .path.display())]
    Spawn {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// molec ran but exited with a non-zero status (`None` if killed by a signal)
    #[error("molec exited with status {status:?}: {}", .args.join(" "))]
    ProcessFailed { status: Option<i32>, args: Vec<String> },

    #[error("malformed molec output, expected at least {expected} tab separated fields but got {found}: {output:?}")]
    MalformedOutput {
        expected: usize,
        found: usize,
        output: String,
    },

    #[error("timing field {field} is not a non-negative integer: {value:?}")]
    ParseTiming {
        field: usize,
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("cache error: {0}")]
    Cache(#[from] bincode::Error),

    #[error("plotting failed: {0}")]
    Plot(String),
}

impl MolecError {
    pub fn exit_code(&self) -> ExitCode {
        match self {
            Self::ExecutableNotFound(_) => ExitCode::from(3),
            Self::Spawn { .. } | Self::ProcessFailed { .. } => ExitCode::from(4),
            Self::MalformedOutput { .. } | Self::ParseTiming { .. } => ExitCode::from(5),
            Self::Io(_) | Self::Json(_) | Self::Cache(_) => ExitCode::from(6),
            Self::Plot(_) => ExitCode::from(7),
        }
    }
}
