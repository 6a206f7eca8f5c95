use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::{AreaSpec, Definitions, MergePolicy, PlanTemplate};

/// Configuration for a course planning project.
///
/// This struct says where the requirement definitions live, how the degree
/// and concentration definitions are combined, and which requirements are
/// tracked for each student.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Versions", into = "Versions")]
pub struct Config {
    /// Degree-wide requirement definitions, relative to the project root.
    degree_requirements: PathBuf,

    /// Concentration requirement definitions, relative to the project root.
    ///
    /// These are loaded after the degree requirements.
    concentration_requirements: PathBuf,

    /// How a requirement defined in both files is resolved.
    pub merge: MergePolicy,

    /// The requirements tracked for each student, in the order courses are
    /// offered to them.
    ///
    /// If this is empty, every defined requirement is tracked and satisfied
    /// by any one of its offerings.
    areas: Vec<AreaSpec>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            degree_requirements: default_degree_requirements(),
            concentration_requirements: default_concentration_requirements(),
            merge: MergePolicy::default(),
            areas: Vec::new(),
        }
    }
}

impl Config {
    /// Loads the configuration from a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the TOML content is
    /// invalid.
    pub fn load(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file: {e}"))?;
        toml::from_str(&content).map_err(|e| format!("Failed to parse config file: {e}"))
    }

    /// Saves the configuration to a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be serialized to TOML or if
    /// the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), String> {
        let content =
            toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize config: {e}"))?;
        std::fs::write(path, content).map_err(|e| format!("Failed to write config file: {e}"))
    }

    /// Path of the degree requirements file, relative to the project root.
    #[must_use]
    pub fn degree_requirements(&self) -> &Path {
        &self.degree_requirements
    }

    /// Path of the concentration requirements file, relative to the project
    /// root.
    #[must_use]
    pub fn concentration_requirements(&self) -> &Path {
        &self.concentration_requirements
    }

    /// The explicitly configured areas.
    #[must_use]
    pub fn areas(&self) -> &[AreaSpec] {
        &self.areas
    }

    /// Adds an area to track.
    ///
    /// If an area with the same name is already configured it is replaced.
    pub fn set_area(&mut self, area: AreaSpec) {
        if let Some(existing) = self.areas.iter_mut().find(|a| a.name == area.name) {
            *existing = area;
        } else {
            self.areas.push(area);
        }
    }

    /// The plan template for these definitions.
    ///
    /// Uses the configured areas, or every definition if none are configured.
    #[must_use]
    pub fn template(&self, definitions: &Definitions) -> PlanTemplate {
        if self.areas.is_empty() {
            PlanTemplate::from_definitions(definitions)
        } else {
            PlanTemplate::new(self.areas.clone())
        }
    }
}

fn default_degree_requirements() -> PathBuf {
    PathBuf::from("data").join("degree_requirements.txt")
}

fn default_concentration_requirements() -> PathBuf {
    PathBuf::from("data").join("concentration_requirements.txt")
}

/// The serialized versions of the configuration.
/// This allows for future changes to the configuration format and to the domain
/// type without breaking compatibility.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "_version")]
enum Versions {
    #[serde(rename = "1")]
    V1 {
        #[serde(default = "default_degree_requirements")]
        degree_requirements: PathBuf,

        #[serde(default = "default_concentration_requirements")]
        concentration_requirements: PathBuf,

        #[serde(default)]
        merge: MergePolicy,

        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        areas: Vec<AreaSpec>,
    },
}

impl From<Versions> for super::Config {
    fn from(versions: Versions) -> Self {
        match versions {
            Versions::V1 {
                degree_requirements,
                concentration_requirements,
                merge,
                areas,
            } => Self {
                degree_requirements,
                concentration_requirements,
                merge,
                areas,
            },
        }
    }
}

impl From<super::Config> for Versions {
    fn from(config: super::Config) -> Self {
        Self::V1 {
            degree_requirements: config.degree_requirements,
            concentration_requirements: config.concentration_requirements,
            merge: config.merge,
            areas: config.areas,
        }
    }
}
