use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use databricks_cli::commands::{self, JobCreateOptions, RunNowOptions};
use databricks_cli::core::{load_config, ApiClient};
use databricks_cli::error::DatabricksError;
use databricks_cli::models::OutputFormat;

/// Exit code for validation, configuration and request failures
const FAILURE_EXIT_CODE: i32 = -1;

/// databricks - command-line client for the Databricks REST API
#[derive(Parser)]
#[command(name = "databricks")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file (defaults to ./databricks.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Workspace URL
    #[arg(long, global = true, env = "DATABRICKS_HOST")]
    host: Option<String>,

    /// Personal access token
    #[arg(long, global = true, env = "DATABRICKS_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Override the request timeout in seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Output format of read commands
    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    output: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create, run and inspect jobs
    #[command(subcommand)]
    Jobs(JobsCommand),

    /// Inspect and cancel job runs
    #[command(subcommand)]
    Runs(RunsCommand),

    /// Work with files on DBFS
    #[command(subcommand)]
    Fs(FsCommand),

    /// Inspect clusters
    #[command(subcommand)]
    Clusters(ClustersCommand),

    /// Work with notebooks and folders in the workspace
    #[command(subcommand)]
    Workspace(WorkspaceCommand),
}

#[derive(Subcommand)]
enum JobsCommand {
    /// Create a job running a JAR or a notebook
    Create(JobCreateOptions),

    /// Trigger a run of a job
    RunNow(RunNowOptions),

    /// Show a job
    Get {
        #[arg(long)]
        job_id: i64,
    },

    /// List jobs
    List,

    /// Delete a job
    Delete {
        #[arg(long)]
        job_id: i64,
    },
}

#[derive(Subcommand)]
enum RunsCommand {
    /// Show the state of a run
    Get {
        #[arg(long)]
        run_id: i64,
    },

    /// Cancel a run
    Cancel {
        #[arg(long)]
        run_id: i64,
    },
}

#[derive(Subcommand)]
enum FsCommand {
    /// List a directory
    Ls {
        /// Show type, size and modification time
        #[arg(short, long)]
        long: bool,

        #[arg(default_value = "dbfs:/")]
        path: String,
    },

    /// Create a directory and its parents
    Mkdirs { path: String },

    /// Delete a file or directory
    Rm {
        /// Delete a directory and its contents
        #[arg(short, long)]
        recursive: bool,

        /// Do not ask before a recursive delete
        #[arg(short, long)]
        yes: bool,

        path: String,
    },

    /// Move a file or directory within DBFS
    Mv { source: String, destination: String },

    /// Copy a file to or from DBFS (prefix the remote side with dbfs:)
    Cp {
        /// Replace the destination if it exists
        #[arg(long)]
        overwrite: bool,

        source: String,
        destination: String,
    },

    /// Write a file of at most 1 MiB in a single call
    Put {
        /// Replace the destination if it exists
        #[arg(long)]
        overwrite: bool,

        source: PathBuf,
        destination: String,
    },

    /// Print a file to stdout
    Cat { path: String },
}

#[derive(Subcommand)]
enum ClustersCommand {
    /// List clusters
    List,

    /// Show a cluster
    Get {
        #[arg(long)]
        cluster_id: String,
    },
}

#[derive(Subcommand)]
enum WorkspaceCommand {
    /// List a workspace folder
    Ls {
        #[arg(default_value = "/")]
        path: String,
    },

    /// Create a folder and its parents
    Mkdirs { path: String },

    /// Delete a notebook or folder
    Rm {
        /// Delete a folder and its contents
        #[arg(short, long)]
        recursive: bool,

        path: String,
    },
}

async fn run(cli: Cli) -> Result<(), DatabricksError> {
    let working_dir = std::env::current_dir()?;
    let config = load_config(
        &working_dir,
        cli.config.as_deref(),
        cli.host,
        cli.token,
        cli.timeout,
    )?;
    let client = ApiClient::from_config(&config.api)?;
    let format = cli.output;

    match cli.command {
        Commands::Jobs(command) => match command {
            JobsCommand::Create(options) => commands::create_job(&client, &options, format).await,
            JobsCommand::RunNow(options) => commands::run_job(&client, &options, format).await,
            JobsCommand::Get { job_id } => commands::show_job(&client, job_id, format).await,
            JobsCommand::List => commands::list_jobs(&client, format).await,
            JobsCommand::Delete { job_id } => commands::delete_job(&client, job_id).await,
        },

        Commands::Runs(command) => match command {
            RunsCommand::Get { run_id } => commands::show_run(&client, run_id, format).await,
            RunsCommand::Cancel { run_id } => commands::cancel_run(&client, run_id).await,
        },

        Commands::Fs(command) => match command {
            FsCommand::Ls { long, path } => commands::fs_ls(&client, &path, long, format).await,
            FsCommand::Mkdirs { path } => commands::fs_mkdirs(&client, &path).await,
            FsCommand::Rm { recursive, yes, path } => {
                commands::fs_rm(&client, &path, recursive, yes).await
            }
            FsCommand::Mv { source, destination } => {
                commands::fs_mv(&client, &source, &destination).await
            }
            FsCommand::Cp { overwrite, source, destination } => {
                commands::fs_cp(&client, &source, &destination, overwrite).await
            }
            FsCommand::Put { overwrite, source, destination } => {
                commands::fs_put(&client, &source, &destination, overwrite).await
            }
            FsCommand::Cat { path } => commands::fs_cat(&client, &path).await,
        },

        Commands::Clusters(command) => match command {
            ClustersCommand::List => commands::list_clusters(&client, format).await,
            ClustersCommand::Get { cluster_id } => {
                commands::show_cluster(&client, &cluster_id, format).await
            }
        },

        Commands::Workspace(command) => match command {
            WorkspaceCommand::Ls { path } => commands::workspace_ls(&client, &path, format).await,
            WorkspaceCommand::Mkdirs { path } => commands::workspace_mkdirs(&client, &path).await,
            WorkspaceCommand::Rm { recursive, path } => {
                commands::workspace_rm(&client, &path, recursive).await
            }
        },
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Set up logging; stdout is reserved for command output
    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(FAILURE_EXIT_CODE);
    }
}
