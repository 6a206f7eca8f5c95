//! Transcript parsing.
//!
//! A transcript lists completed courses in the order they should be
//! credited. Course ids may be separated by commas, whitespace or newlines,
//! and `#` starts a comment that runs to the end of the line:
//!
//! ```text
//! # autumn
//! 30000, 41901
//! # winter
//! 41902 33501
//! ```

use std::path::Path;

use tracing::instrument;

use crate::{
    domain::{CourseId, ParseCourseIdError},
    storage::LoadError,
};

/// Parse the course ids in a transcript.
///
/// # Errors
///
/// Returns an error naming the line of the first token that is not a valid
/// course id.
pub fn parse_transcript(source: &str) -> Result<Vec<CourseId>, TranscriptError> {
    let mut courses = Vec::new();

    for (index, line) in source.lines().enumerate() {
        let content = line.split_once('#').map_or(line, |(before, _)| before);
        for token in content
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|token| !token.is_empty())
        {
            let course = token.parse::<CourseId>().map_err(|source| TranscriptError {
                line: index + 1,
                source,
            })?;
            courses.push(course);
        }
    }

    Ok(courses)
}

/// Read a transcript file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or contains an invalid
/// course id.
#[instrument(level = "debug")]
pub fn load_transcript(path: &Path) -> Result<Vec<CourseId>, LoadError> {
    let content = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    parse_transcript(&content).map_err(|source| LoadError::Transcript {
        path: path.to_path_buf(),
        source,
    })
}

/// An invalid entry in a transcript.
#[derive(Debug, thiserror::Error, PartialEq, Eq, Clone)]
#[error("line {line}: {source}")]
pub struct TranscriptError {
    line: usize,
    source: ParseCourseIdError,
}

impl TranscriptError {
    /// The 1-based line number of the invalid entry.
    #[must_use]
    pub const fn line(&self) -> usize {
        self.line
    }
}
