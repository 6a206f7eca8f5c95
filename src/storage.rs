mod definitions_file;
/// A planning project rooted in a directory.
pub mod project;
/// Transcripts of completed courses.
pub mod transcript;

use std::{io, path::PathBuf};

pub use definitions_file::{load_definitions, load_merged_definitions};
pub use project::Project;
pub use transcript::{TranscriptError, load_transcript, parse_transcript};

use crate::domain::FormatError;

/// Errors that can occur when loading planning data from disk.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The file could not be read.
    #[error("failed to read {}", path.display())]
    Io {
        /// The file.
        path: PathBuf,
        /// The underlying error.
        source: io::Error,
    },

    /// The project configuration file is malformed.
    #[error("{}: {message}", path.display())]
    Config {
        /// The configuration file.
        path: PathBuf,
        /// What was wrong with it.
        message: String,
    },

    /// A requirement definitions file is malformed.
    #[error("{}: {source}", path.display())]
    Definitions {
        /// The file.
        path: PathBuf,
        /// The malformed line.
        source: FormatError,
    },

    /// A transcript file is malformed.
    #[error("{}: {source}", path.display())]
    Transcript {
        /// The file.
        path: PathBuf,
        /// The malformed entry.
        source: TranscriptError,
    },
}
