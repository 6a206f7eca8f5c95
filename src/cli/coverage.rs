use std::{fmt::Write as _, path::PathBuf};

use anyhow::Context;
use clap::Parser;
use course_planner::{CourseId, Project, domain};
use tracing::instrument;

use super::terminal::{Colorize, is_narrow};

/// Width of one course column in the table layout.
const COLUMN: usize = 7;

#[derive(Debug, Parser)]
#[command(about = "Show which requirements each course counts toward")]
pub struct Coverage {
    /// Course ids to look up
    #[arg(required = true, value_name = "COURSE")]
    courses: Vec<CourseId>,

    /// Output format (table, json)
    #[arg(long, value_name = "FORMAT", default_value = "table")]
    output: OutputFormat,
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Table,
    Json,
}

impl Coverage {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, root: PathBuf) -> anyhow::Result<()> {
        let definitions = Project::open(root)
            .context("failed to open planning project")?
            .load_definitions()
            .context("failed to load requirement definitions")?;

        let coverage = domain::Coverage::build(self.courses, &definitions);

        match self.output {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&coverage)?),
            OutputFormat::Table if is_narrow() => print!("{}", render_stacked(&coverage)),
            OutputFormat::Table => print!("{}", render_table(&coverage)),
        }

        Ok(())
    }
}

/// Render a check mark or dot for a boolean cell.
fn mark(value: bool) -> String {
    if value { "✓".success() } else { "·".dim() }
}

fn render_stacked(coverage: &domain::Coverage) -> String {
    let mut out = String::new();
    for row in coverage.rows() {
        let names: Vec<_> = coverage
            .requirements()
            .iter()
            .zip(&row.satisfies)
            .filter(|(_, satisfies)| **satisfies)
            .map(|(name, _)| name.as_str())
            .collect();
        if names.is_empty() {
            let _ = writeln!(out, "{}: -", row.course);
        } else {
            let _ = writeln!(out, "{}: {}", row.course, names.join(", "));
        }
    }
    out
}

fn render_table(coverage: &domain::Coverage) -> String {
    let width = coverage
        .requirements()
        .iter()
        .map(|name| name.chars().count())
        .max()
        .unwrap_or_default();

    let mut out = String::new();

    let header: String = coverage
        .rows()
        .iter()
        .map(|row| format!("{:>COLUMN$}", row.course))
        .collect();
    let _ = writeln!(out, "{:<width$} {header}", "");

    for (column, requirement) in coverage.requirements().iter().enumerate() {
        // The mark may carry colour codes, so pad before it rather than
        // through the format width.
        let cells: String = coverage
            .rows()
            .iter()
            .map(|row| format!("{}{}", " ".repeat(COLUMN - 1), mark(row.satisfies[column])))
            .collect();
        let _ = writeln!(out, "{requirement:<width$} {cells}");
    }
    out
}
