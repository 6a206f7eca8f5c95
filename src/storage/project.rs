//! A planning project on disk.
//!
//! A project is a directory containing an optional `planner.toml` and the
//! requirement definitions files it refers to.

use std::path::{Path, PathBuf};

use nonempty::NonEmpty;
use tracing::debug;

use crate::{
    domain::{Config, Definitions},
    storage::{LoadError, load_merged_definitions},
};

/// The name of the configuration file in the project root.
pub const CONFIG_FILE: &str = "planner.toml";

/// A directory of planning data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    root: PathBuf,
    config: Config,
}

impl Project {
    /// Opens the project at `root`.
    ///
    /// If there is no configuration file, the default configuration is used.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file exists but cannot be read
    /// or is malformed.
    pub fn open(root: PathBuf) -> Result<Self, LoadError> {
        let config = load_config(&root)?;
        Ok(Self { root, config })
    }

    /// Creates a project with an explicit configuration.
    #[must_use]
    pub const fn with_config(root: PathBuf, config: Config) -> Self {
        Self { root, config }
    }

    /// The project root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The project configuration.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// The definitions files, in load order.
    #[must_use]
    pub fn definition_paths(&self) -> NonEmpty<PathBuf> {
        NonEmpty::from((
            self.root.join(self.config.degree_requirements()),
            vec![self.root.join(self.config.concentration_requirements())],
        ))
    }

    /// Load the degree and concentration requirements and merge them.
    ///
    /// # Errors
    ///
    /// Returns an error if either file cannot be read or is malformed.
    pub fn load_definitions(&self) -> Result<Definitions, LoadError> {
        load_merged_definitions(&self.definition_paths(), self.config.merge)
    }
}

fn load_config(root: &Path) -> Result<Config, LoadError> {
    let path = root.join(CONFIG_FILE);
    match path.try_exists() {
        Ok(true) => Config::load(&path).map_err(|message| LoadError::Config { path, message }),
        Ok(false) => {
            debug!("No {CONFIG_FILE} found; using the default configuration");
            Ok(Config::default())
        }
        Err(source) => Err(LoadError::Io { path, source }),
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::domain::{CourseId, MergePolicy};

    fn seed(root: &Path, degree: &str, concentration: &str) {
        let data = root.join("data");
        fs::create_dir_all(&data).unwrap();
        fs::write(data.join("degree_requirements.txt"), degree).unwrap();
        fs::write(data.join("concentration_requirements.txt"), concentration).unwrap();
    }

    #[test]
    fn open_without_config_uses_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let project = Project::open(tmp.path().to_path_buf()).unwrap();
        assert_eq!(project.config(), &Config::default());
    }

    #[test]
    fn loads_default_files() {
        let tmp = tempfile::tempdir().unwrap();
        seed(
            tmp.path(),
            "Financial Accounting:30000,30116\nShared:1\n",
            "Econometrics:41901,41902\nShared:2\n",
        );

        let definitions = Project::open(tmp.path().to_path_buf())
            .unwrap()
            .load_definitions()
            .unwrap();

        assert_eq!(
            definitions.names().collect::<Vec<_>>(),
            vec!["Econometrics", "Financial Accounting", "Shared"]
        );
        assert_eq!(definitions.get("Shared").unwrap().len(), 1);
    }

    #[test]
    fn config_selects_merge_policy() {
        let tmp = tempfile::tempdir().unwrap();
        seed(tmp.path(), "Shared:1\n", "Shared:2\n");

        let mut config = Config::default();
        config.merge = MergePolicy::Union;
        config.save(&tmp.path().join(CONFIG_FILE)).unwrap();

        let definitions = Project::open(tmp.path().to_path_buf())
            .unwrap()
            .load_definitions()
            .unwrap();
        assert_eq!(definitions.get("Shared").unwrap().len(), 2);
    }

    #[test]
    fn demo_project_evaluates() {
        let root = Path::new(env!("CARGO_MANIFEST_DIR")).join("demos");
        let project = Project::open(root.clone()).unwrap();
        let definitions = project.load_definitions().unwrap();
        let transcript =
            crate::storage::load_transcript(&root.join("transcripts/first_year.txt")).unwrap();

        let mut plan = project
            .config()
            .template(&definitions)
            .instantiate(&definitions)
            .unwrap();
        let report = plan.credit_all(transcript).unwrap();

        assert!(plan.area("Financial Accounting").unwrap().completed());
        assert!(plan.area("International Business").unwrap().completed());
        assert_eq!(
            plan.area("Econometrics").unwrap().to_string(),
            "Econometrics: 2/3 completed"
        );
        assert_eq!(report.unapplied.len(), 1);
        assert!(plan.area("Microeconomics").is_none());
    }

    #[test]
    fn malformed_config_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        seed(tmp.path(), "Econometrics:41901,41902,41903\n", "");
        fs::write(
            tmp.path().join(CONFIG_FILE),
            "_version = \"1\"\n\n[[areas]]\nname = \"Econometrics\"\nrequired = \"3\"\n",
        )
        .unwrap();

        let error = Project::open(tmp.path().to_path_buf()).unwrap_err();
        assert!(matches!(&error, LoadError::Config { path, .. } if path.ends_with(CONFIG_FILE)));
    }

    #[test]
    fn configured_areas_are_honoured() {
        let tmp = tempfile::tempdir().unwrap();
        seed(tmp.path(), "Econometrics:41901,41902,41903\n", "");
        fs::write(
            tmp.path().join(CONFIG_FILE),
            "_version = \"1\"\n\n[[areas]]\nname = \"Econometrics\"\nrequired = 3\n",
        )
        .unwrap();

        let project = Project::open(tmp.path().to_path_buf()).unwrap();
        let definitions = project.load_definitions().unwrap();
        let mut plan = project
            .config()
            .template(&definitions)
            .instantiate(&definitions)
            .unwrap();
        plan.credit(CourseId::try_from(41901).unwrap()).unwrap();

        assert_eq!(
            plan.area("Econometrics").unwrap().to_string(),
            "Econometrics: 1/3 completed"
        );
        assert!(!plan.is_complete());
    }

    #[test]
    fn missing_concentration_file_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        seed(tmp.path(), "A:1\n", "");
        fs::remove_file(tmp.path().join("data/concentration_requirements.txt")).unwrap();

        let error = Project::open(tmp.path().to_path_buf())
            .unwrap()
            .load_definitions()
            .unwrap_err();
        assert!(matches!(error, LoadError::Io { .. }));
    }
}
