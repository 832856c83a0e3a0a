mod cmd;
mod output;
mod root;

use clap::{Parser, Subcommand};
use cmd::{
    config::ConfigSubcommand, employee::EmployeeSubcommand, project::ProjectSubcommand,
};
use roster_core::project::Viewer;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "roster",
    about = "Manage project teams, member roles and project details for a company",
    version,
    propagate_version = true
)]
struct Cli {
    /// Workspace root (default: auto-detect from .roster/)
    #[arg(long, global = true, env = "ROSTER_ROOT")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    /// Email of the acting user
    #[arg(long, global = true, env = "ROSTER_USER")]
    user: Option<String>,

    /// Act with admin rights (see and edit every project)
    #[arg(long, global = true)]
    admin: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a roster workspace for a company
    Init {
        /// Company identifier (lowercase slug)
        #[arg(long)]
        company: String,
        /// Display name for the company
        #[arg(long)]
        name: Option<String>,
    },

    /// List project types and the roles each allows
    Types,

    /// List, show and edit projects
    Project {
        #[command(subcommand)]
        subcommand: ProjectSubcommand,
    },

    /// Inspect the employee directory
    Employee {
        #[command(subcommand)]
        subcommand: EmployeeSubcommand,
    },

    /// Inspect the workspace configuration
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let root = root::resolve_root(cli.root.as_deref());
    let viewer = Viewer::new(cli.user.unwrap_or_default(), cli.admin);

    let result = match cli.command {
        Commands::Init { company, name } => cmd::init::run(&root, &company, name.as_deref()),
        Commands::Types => cmd::types::run(&root, cli.json),
        Commands::Project { subcommand } => cmd::project::run(&root, &viewer, subcommand, cli.json),
        Commands::Employee { subcommand } => cmd::employee::run(&root, subcommand, cli.json),
        Commands::Config { subcommand } => cmd::config::run(&root, subcommand, cli.json),
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
