use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("required environment value {0} is not set")]
    MissingEnvironment(&'static str),

    #[error("working directory {} is not an absolute path", .0.display())]
    RelativeWorkingDirectory(PathBuf),

    #[error("invalid environment entry `{0}`, expected KEY=VALUE")]
    InvalidEnvironmentEntry(String),

    #[error("{field} `{value}` cannot go into a unit file: no whitespace, control characters, quotes, backslashes or `%`")]
    UnsafeUnitValue { field: String, value: String },

    #[error("unit file {} does not exist, uninstall could not complete", .0.display())]
    PersistedFileMissing(PathBuf),

    #[error("failed to write unit file {}: {source}", path.display())]
    WriteUnit {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to remove unit file {}: {source}", path.display())]
    RemoveUnit {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
