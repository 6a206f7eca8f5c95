use std::{fmt::Write as _, path::PathBuf};

use anyhow::Context;
use clap::Parser;
use course_planner::{CourseId, Project};
use serde::Serialize;
use tracing::instrument;

use super::terminal::{Colorize, is_narrow};

#[derive(Debug, Parser, Default)]
#[command(about = "List the loaded requirements and their offerings")]
pub struct List {
    /// Output format (table, json)
    #[arg(long, value_name = "FORMAT", default_value = "table")]
    output: OutputFormat,

    /// Show every eligible course, not just the count
    #[arg(long)]
    courses: bool,

    /// Suppress headers and format for scripting
    #[arg(long)]
    quiet: bool,
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Table,
    Json,
}

#[derive(Debug, Serialize)]
struct Entry<'a> {
    name: &'a str,
    count: usize,
    offerings: Vec<CourseId>,
}

impl List {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, root: PathBuf) -> anyhow::Result<()> {
        let project = Project::open(root).context("failed to open planning project")?;
        let definitions = project
            .load_definitions()
            .context("failed to load requirement definitions")?;

        let entries: Vec<Entry<'_>> = definitions
            .iter()
            .map(|(name, offerings)| Entry {
                name,
                count: offerings.len(),
                offerings: offerings.iter().collect(),
            })
            .collect();

        match self.output {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(&entries)?);
            }
            OutputFormat::Table if self.quiet => {
                for entry in &entries {
                    println!("{}\t{}", entry.name, entry.count);
                }
            }
            OutputFormat::Table => print!("{}", self.render_table(&entries, is_narrow())),
        }

        Ok(())
    }

    fn render_table(&self, entries: &[Entry<'_>], narrow: bool) -> String {
        let mut out = String::new();
        if entries.is_empty() {
            out.push_str("No requirements defined yet.\n");
            return out;
        }

        if narrow {
            for entry in entries {
                let _ = writeln!(out, "{}: {}", entry.name, entry.count);
                if self.courses {
                    let _ = writeln!(out, "  {}", join(&entry.offerings).dim());
                }
            }
            return out;
        }

        let width = entries
            .iter()
            .map(|entry| entry.name.chars().count())
            .max()
            .unwrap_or_default()
            .max("Requirement".len());

        let _ = writeln!(out, "{:<width$}  Courses", "Requirement");
        let _ = writeln!(out, "{}", "─".repeat(width + 9).dim());
        for entry in entries {
            if self.courses {
                let _ = writeln!(out, "{:<width$}  {}", entry.name, join(&entry.offerings));
            } else {
                let _ = writeln!(out, "{:<width$}  {}", entry.name, entry.count);
            }
        }
        let _ = writeln!(out);
        let _ = writeln!(out, "{} requirements", entries.len());
        out
    }
}

fn join(courses: &[CourseId]) -> String {
    courses
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use super::*;

    fn course(id: u32) -> CourseId {
        CourseId::try_from(id).unwrap()
    }

    fn entry<'a>(name: &'a str, offerings: &[u32]) -> Entry<'a> {
        Entry {
            name,
            count: offerings.len(),
            offerings: offerings.iter().copied().map(course).collect(),
        }
    }

    #[test]
    fn run_on_seeded_project() {
        let tmp = tempdir().unwrap();
        let data = tmp.path().join("data");
        fs::create_dir_all(&data).unwrap();
        fs::write(data.join("degree_requirements.txt"), "Microeconomics:33001,33002\n").unwrap();
        fs::write(data.join("concentration_requirements.txt"), "").unwrap();

        List::default()
            .run(tmp.path().to_path_buf())
            .expect("list command should succeed");
    }

    #[test]
    fn run_rejects_malformed_definitions() {
        let tmp = tempdir().unwrap();
        let data = tmp.path().join("data");
        fs::create_dir_all(&data).unwrap();
        fs::write(data.join("degree_requirements.txt"), "Microeconomics 33001\n").unwrap();
        fs::write(data.join("concentration_requirements.txt"), "").unwrap();

        let error = List::default().run(tmp.path().to_path_buf()).unwrap_err();
        assert_eq!(error.to_string(), "failed to load requirement definitions");
    }

    #[test]
    fn table_counts_offerings() {
        let entries = [entry("Financial Accounting", &[30000, 30116]), entry("Micro", &[33001])];

        let table = List::default().render_table(&entries, false);
        let lines: Vec<_> = table.lines().collect();

        assert_eq!(lines[0], format!("{:<20}  Courses", "Requirement"));
        assert_eq!(lines[2], "Financial Accounting  2");
        assert_eq!(lines[3], format!("{:<20}  1", "Micro"));
        assert_eq!(lines[5], "2 requirements");
    }

    #[test]
    fn table_pads_non_ascii_names_by_character() {
        let entries = [entry("Économie appliquée", &[1]), entry("Finance", &[1, 2])];

        let table = List::default().render_table(&entries, false);
        let lines: Vec<_> = table.lines().collect();

        assert_eq!(lines[2], "Économie appliquée  1");
        assert_eq!(lines[3], format!("Finance{}  2", " ".repeat(11)));
    }

    #[test]
    fn narrow_table_lists_courses() {
        let list = List {
            courses: true,
            ..List::default()
        };
        let table = list.render_table(&[entry("Micro", &[33001, 33002])], true);
        let lines: Vec<_> = table.lines().collect();

        assert_eq!(lines[0], "Micro: 2");
        assert!(lines[1].contains("33001, 33002"));
    }

    #[test]
    fn empty_table() {
        assert_eq!(
            List::default().render_table(&[], false),
            "No requirements defined yet.\n"
        );
    }
}
