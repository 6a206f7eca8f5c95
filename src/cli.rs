use std::path::{Path, PathBuf};

mod coverage;
mod list;
mod progress;
mod terminal;

use clap::ArgAction;
use course_planner::{Config, Project, storage::project::CONFIG_FILE};
use coverage::Coverage;
use list::List;
use progress::Progress;
use tracing::instrument;

#[derive(Debug, clap::Parser)]
#[command(version, about)]
pub struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// The path to the root of the planning project
    #[arg(short, long, default_value = ".", global = true)]
    root: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        Self::setup_logging(self.verbose);

        self.command
            .unwrap_or_else(|| Command::List(List::default()))
            .run(self.root)
    }

    fn setup_logging(verbosity: u8) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let level = match verbosity {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };

        let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_thread_names(false)
            .with_line_number(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

#[derive(Debug, clap::Parser)]
pub enum Command {
    /// List the loaded requirements (default)
    List(List),

    /// Initialize a new planning project
    Init(Init),

    /// Credit transcripts against the tracked requirements
    ///
    /// Each transcript is evaluated independently against a fresh plan.
    Progress(Progress),

    /// Show which requirements each course counts toward
    Coverage(Coverage),
}

impl Command {
    fn run(self, root: PathBuf) -> anyhow::Result<()> {
        match self {
            Self::List(command) => command.run(root)?,
            Self::Init(command) => command.run(&root)?,
            Self::Progress(command) => command.run(root)?,
            Self::Coverage(command) => command.run(root)?,
        }
        Ok(())
    }
}

#[derive(Debug, clap::Parser)]
pub struct Init {}

impl Init {
    #[instrument(skip(self))]
    fn run(self, root: &Path) -> anyhow::Result<()> {
        use std::fs;

        let config_path = root.join(CONFIG_FILE);
        if config_path.exists() {
            anyhow::bail!("Project already initialized (found existing {CONFIG_FILE})");
        }

        fs::create_dir_all(root)
            .map_err(|e| anyhow::anyhow!("Failed to create project directory: {e}"))?;

        let config = Config::default();
        config
            .save(&config_path)
            .map_err(|e| anyhow::anyhow!("Failed to create {CONFIG_FILE}: {e}"))?;

        let project = Project::with_config(root.to_path_buf(), config);

        println!("Initialized planning project in {}", root.display());
        println!("  Created: {CONFIG_FILE}");
        println!();
        println!("Next steps:");
        for path in project.definition_paths().iter() {
            println!("  add requirement definitions to {}", path.display());
        }
        println!("  planner progress <TRANSCRIPT>");

        Ok(())
    }
}
