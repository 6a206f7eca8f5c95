use std::path::{Path, PathBuf};

use nonempty::NonEmpty;
use tracing::{info, instrument};

use crate::{
    domain::{Definitions, MergePolicy},
    storage::LoadError,
};

/// Read requirement definitions from a file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is malformed.
#[instrument(level = "debug")]
pub fn load_definitions(path: &Path) -> Result<Definitions, LoadError> {
    info!("Reading requirements from {}", path.display());

    let content = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    Definitions::parse(&content).map_err(|source| LoadError::Definitions {
        path: path.to_path_buf(),
        source,
    })
}

/// Read several definitions files and merge them in order.
///
/// Later files take precedence according to `policy`.
///
/// # Errors
///
/// Returns the first error encountered reading or parsing a file.
pub fn load_merged_definitions(
    paths: &NonEmpty<PathBuf>,
    policy: MergePolicy,
) -> Result<Definitions, LoadError> {
    let mut merged = load_definitions(&paths.head)?;
    for path in &paths.tail {
        merged = merged.merge(load_definitions(path)?, policy);
    }
    Ok(merged)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::domain::CourseId;

    fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn loads_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write(tmp.path(), "degree.txt", "Financial Accounting:30000,30116\n");

        let definitions = load_definitions(&path).unwrap();
        assert!(definitions.contains("Financial Accounting"));
    }

    #[test]
    fn missing_file_is_io_error() {
        let tmp = tempfile::tempdir().unwrap();
        let error = load_definitions(&tmp.path().join("missing.txt")).unwrap_err();
        assert!(matches!(error, LoadError::Io { .. }));
    }

    #[test]
    fn malformed_file_names_path_and_line() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write(tmp.path(), "bad.txt", "A:1\nB 2\n");

        let error = load_definitions(&path).unwrap_err();
        let LoadError::Definitions { path: error_path, source } = &error else {
            panic!("unexpected error: {error}");
        };
        assert_eq!(error_path, &path);
        assert_eq!(source.line(), 2);
    }

    #[test]
    fn later_file_overwrites() {
        let tmp = tempfile::tempdir().unwrap();
        let degree = write(tmp.path(), "degree.txt", "Shared:1\nDegree:2\n");
        let concentration = write(tmp.path(), "conc.txt", "Shared:3\n");

        let paths = NonEmpty::from((degree, vec![concentration]));
        let definitions = load_merged_definitions(&paths, MergePolicy::Overwrite).unwrap();

        let shared: Vec<_> = definitions.get("Shared").unwrap().iter().map(CourseId::get).collect();
        assert_eq!(shared, vec![3]);
        assert!(definitions.contains("Degree"));
    }

    #[test]
    fn union_policy_combines() {
        let tmp = tempfile::tempdir().unwrap();
        let degree = write(tmp.path(), "degree.txt", "Shared:1\n");
        let concentration = write(tmp.path(), "conc.txt", "Shared:3\n");

        let paths = NonEmpty::from((degree, vec![concentration]));
        let definitions = load_merged_definitions(&paths, MergePolicy::Union).unwrap();

        assert_eq!(definitions.get("Shared").unwrap().len(), 2);
    }
}
