use std::{path::PathBuf, process};

use anyhow::Context;
use clap::Parser;
use course_planner::{
    CourseId, Project,
    domain::{Evaluation, Status},
    storage::load_transcript,
};
use serde::Serialize;
use tracing::instrument;

use super::terminal::Colorize;

#[derive(Debug, Parser)]
#[command(about = "Credit transcripts against the tracked requirements")]
pub struct Progress {
    /// Transcript files listing completed courses, in the order taken
    #[arg(required = true, value_name = "TRANSCRIPT")]
    transcripts: Vec<PathBuf>,

    /// Output format (table, json)
    #[arg(long, value_name = "FORMAT", default_value = "table")]
    output: OutputFormat,

    /// Exit with code 2 if any plan is incomplete
    #[arg(long)]
    check: bool,
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Table,
    Json,
}

#[derive(Debug, Serialize)]
struct Report<'a> {
    transcript: String,
    complete: bool,
    areas: Vec<AreaReport<'a>>,
    unapplied: &'a [CourseId],
}

#[derive(Debug, Serialize)]
struct AreaReport<'a> {
    name: &'a str,
    status: Status,
    progress: usize,
    required: usize,
    taken: &'a [CourseId],
}

impl<'a> Report<'a> {
    fn new(transcript: &std::path::Path, evaluation: &'a Evaluation) -> Self {
        Self {
            transcript: transcript.display().to_string(),
            complete: evaluation.plan.is_complete(),
            areas: evaluation
                .plan
                .areas()
                .iter()
                .map(|area| AreaReport {
                    name: area.name(),
                    status: area.status(),
                    progress: area.progress_count(),
                    required: area.n_required(),
                    taken: area.taken(),
                })
                .collect(),
            unapplied: &evaluation.report.unapplied,
        }
    }
}

impl Progress {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, root: PathBuf) -> anyhow::Result<()> {
        let project = Project::open(root).context("failed to open planning project")?;
        let definitions = project
            .load_definitions()
            .context("failed to load requirement definitions")?;
        let template = project.config().template(&definitions);

        let transcripts = self
            .transcripts
            .iter()
            .map(|path| load_transcript(path))
            .collect::<Result<Vec<_>, _>>()?;

        let results = template.evaluate(&definitions, &transcripts)?;

        let mut evaluations = Vec::with_capacity(results.len());
        let mut failures = 0;
        for (path, result) in self.transcripts.iter().zip(&results) {
            match result {
                Ok(evaluation) => evaluations.push(Report::new(path, evaluation)),
                Err(e) => {
                    eprintln!("{}: {e}", path.display());
                    failures += 1;
                }
            }
        }

        match self.output {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&evaluations)?),
            OutputFormat::Table => Self::output_table(&evaluations),
        }

        if failures > 0 {
            anyhow::bail!("{failures} transcript(s) credited a course more than once");
        }

        if self.check && evaluations.iter().any(|report| !report.complete) {
            process::exit(2);
        }

        Ok(())
    }

    fn output_table(reports: &[Report<'_>]) {
        for (i, report) in reports.iter().enumerate() {
            if i > 0 {
                println!();
            }
            println!("{}", report.transcript);
            println!("{}", "─".repeat(report.transcript.chars().count()).dim());

            for area in &report.areas {
                let line = format!(
                    "{}: {}/{} completed",
                    area.name, area.progress, area.required
                );
                match area.status {
                    Status::Completed => println!("  ✅ {}", line.success()),
                    Status::Incomplete => println!("  ⚠️  {}", line.warning()),
                }
            }

            if !report.unapplied.is_empty() {
                let courses: Vec<_> = report.unapplied.iter().map(ToString::to_string).collect();
                println!("{}", format!("  Not credited: {}", courses.join(", ")).dim());
            }
        }
    }
}
