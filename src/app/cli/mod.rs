//! CLI Adapter.

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use dialoguer::Confirm;

use crate::adapters::config_file;
use crate::app::api::{self, ConfigureOptions, GlobalOptions, RepositoryStatus};
use crate::app::logging;
use crate::domain::dashboard::format_timestamp;
use crate::domain::{AppError, ScheduleTime};

#[derive(Parser)]
#[command(name = "dbnomics-ci")]
#[command(version)]
#[command(about = "Configure and drive the GitLab CI of DBnomics providers", long_about = None)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct GlobalArgs {
    /// Base URL of the GitLab instance
    #[arg(long, env = "GITLAB_URL", global = true)]
    gitlab_url: Option<String>,
    /// Configuration file (default: ./dbnomics-ci.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Log from debug level
    #[arg(short, long, global = true)]
    verbose: bool,
    /// Log HTTP requests and responses
    #[arg(long, global = true)]
    debug_http: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Configure the CI settings of a provider
    #[clap(visible_alias = "c")]
    Configure {
        /// Provider slug
        provider_slug: String,
        /// Delete existing variables, triggers, schedules, webhooks and deploy keys first
        #[arg(long)]
        purge: bool,
        /// Do not create the daily download schedule
        #[arg(long, conflicts_with = "schedule_time")]
        no_schedule: bool,
        /// Daily download time as HOUR:MINUTE
        #[arg(long, value_name = "H:MM")]
        schedule_time: Option<String>,
        /// Private key file stored as SSH_PRIVATE_KEY on the fetcher project
        #[arg(long, value_name = "FILE")]
        ssh_private_key: Option<PathBuf>,
        /// Public key file registered as deploy key on the data projects
        #[arg(long, value_name = "FILE")]
        deploy_key: Option<PathBuf>,
    },
    /// Give the CI jobs of a provider push access to its development data repositories
    ConfigureDevData {
        /// Provider slug
        provider_slug: String,
    },
    /// Trigger a job (download, convert or index) for a provider
    #[clap(visible_alias = "t")]
    Trigger {
        /// Job kind: download, convert or index
        job_kind: String,
        /// Provider slug
        provider_slug: String,
        /// Git ref on which the pipeline runs
        #[arg(long = "ref", value_name = "REF")]
        git_ref: Option<String>,
    },
    /// List (and optionally open) the URLs to check for a provider
    OpenUrls {
        /// Provider slug
        provider_slug: String,
        /// Open each URL in the system browser
        #[arg(long)]
        open: bool,
    },
    /// Create the source data and JSON data repositories of a provider
    CreateRepositories {
        /// Provider slug
        provider_slug: String,
    },
    /// Delete every document of a provider from the search index
    DeleteProvider {
        /// Provider slug
        provider_slug: String,
        /// Do not ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },
    /// Print the slugs of all providers
    #[clap(visible_alias = "ls")]
    LsProviders {
        /// Only providers with an active download schedule
        #[arg(long)]
        only_scheduled: bool,
    },
    /// Show the schedule and latest jobs of each fetcher
    Dashboard {
        /// Only these providers
        #[arg(long, value_name = "PROVIDER_SLUG", num_args = 1..)]
        fetchers: Vec<String>,
        /// Output format
        #[arg(long, default_value = "markdown", value_parser = ["markdown", "json"])]
        format: String,
    },
    /// Cancel running and pending pipelines of a project
    CancelPipelines {
        /// Project path (group/project) or numeric id
        project: String,
    },
    /// Print the reference .gitlab-ci.yml of a fetcher
    GenerateCiYml {
        /// Provider slug
        provider_slug: String,
    },
}

/// Entry point for the CLI.
pub fn run() {
    // Before parsing, so that `.env` can provide GITLAB_URL.
    let dotenv = config_file::load_dotenv();
    let cli = Cli::parse();
    logging::init(cli.global.verbose, cli.global.debug_http);
    match dotenv {
        Ok(Some(path)) => tracing::debug!("loaded environment from {}", path.display()),
        Ok(None) => {}
        Err(e) => tracing::warn!("ignoring {}", e),
    }

    let options = GlobalOptions {
        config_path: cli.global.config.clone(),
        gitlab_url: cli.global.gitlab_url.clone(),
    };

    let result: Result<(), AppError> = match cli.command {
        Commands::Configure {
            provider_slug,
            purge,
            no_schedule,
            schedule_time,
            ssh_private_key,
            deploy_key,
        } => run_configure(
            &options,
            &provider_slug,
            purge,
            no_schedule,
            schedule_time.as_deref(),
            ssh_private_key.as_deref(),
            deploy_key.as_deref(),
        ),
        Commands::ConfigureDevData { provider_slug } => {
            run_configure_dev_data(&options, &provider_slug)
        }
        Commands::Trigger { job_kind, provider_slug, git_ref } => {
            run_trigger(&options, &job_kind, &provider_slug, git_ref.as_deref())
        }
        Commands::OpenUrls { provider_slug, open } => run_open_urls(&options, &provider_slug, open),
        Commands::CreateRepositories { provider_slug } => {
            run_create_repositories(&options, &provider_slug)
        }
        Commands::DeleteProvider { provider_slug, yes } => {
            run_delete_provider(&options, &provider_slug, yes)
        }
        Commands::LsProviders { only_scheduled } => run_ls_providers(&options, only_scheduled),
        Commands::Dashboard { fetchers, format } => {
            api::dashboard(&options, &fetchers, &format).map(|report| print!("{}", report))
        }
        Commands::CancelPipelines { project } => run_cancel_pipelines(&options, &project),
        Commands::GenerateCiYml { provider_slug } => {
            api::generate_ci_yml(&options, &provider_slug).map(|yaml| print!("{}", yaml))
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn read_key_file(path: &Path) -> Result<String, AppError> {
    fs::read_to_string(path).map_err(|e| {
        AppError::config_error(format!("Failed to read key file {}: {}", path.display(), e))
    })
}

fn run_configure(
    options: &GlobalOptions,
    provider_slug: &str,
    purge: bool,
    no_schedule: bool,
    schedule_time: Option<&str>,
    ssh_private_key: Option<&Path>,
    deploy_key: Option<&Path>,
) -> Result<(), AppError> {
    let configure_options = ConfigureOptions {
        purge,
        no_schedule,
        schedule_time: schedule_time.map(str::parse::<ScheduleTime>).transpose()?,
        ssh_private_key: ssh_private_key.map(read_key_file).transpose()?,
        deploy_public_key: deploy_key.map(read_key_file).transpose()?,
    };

    let outcome = api::configure(options, provider_slug, &configure_options)?;
    if outcome.changes.is_empty() {
        println!("✅ CI settings of {} are up to date", provider_slug);
    } else {
        println!("✅ Applied {} change(s) to {}", outcome.changes.len(), provider_slug);
    }
    print!("{}", outcome.snapshot);
    Ok(())
}

fn run_configure_dev_data(options: &GlobalOptions, provider_slug: &str) -> Result<(), AppError> {
    let changes = api::configure_dev_data(options, provider_slug)?;
    for change in &changes {
        println!("{}", change);
    }
    if changes.is_empty() {
        println!("✅ Development data repositories of {} are up to date", provider_slug);
    } else {
        println!("✅ Applied {} change(s) to the development data repositories", changes.len());
    }
    Ok(())
}

fn run_trigger(
    options: &GlobalOptions,
    job_kind: &str,
    provider_slug: &str,
    git_ref: Option<&str>,
) -> Result<(), AppError> {
    let run = api::trigger(options, job_kind, provider_slug, git_ref)?;
    println!("✅ {} pipeline #{} {} for {}", run.kind, run.pipeline_id, run.status, provider_slug);
    println!("Pipeline: {}", run.web_url);
    println!("Jobs: {}", run.jobs_url);
    Ok(())
}

fn run_open_urls(options: &GlobalOptions, provider_slug: &str, open: bool) -> Result<(), AppError> {
    for (label, url) in api::open_urls(options, provider_slug, open)? {
        println!("{}: {}", label, url);
    }
    Ok(())
}

fn run_create_repositories(options: &GlobalOptions, provider_slug: &str) -> Result<(), AppError> {
    for status in api::create_repositories(options, provider_slug)? {
        match status {
            RepositoryStatus::Created(project) => {
                println!("✅ Created {}", project.web_url);
            }
            RepositoryStatus::Existing(project) => {
                println!("Exists: {}", project.web_url);
            }
        }
    }
    Ok(())
}

fn run_delete_provider(
    options: &GlobalOptions,
    provider_slug: &str,
    yes: bool,
) -> Result<(), AppError> {
    if !yes {
        let confirmed = Confirm::new()
            .with_prompt(format!("Delete every indexed document of provider '{}'?", provider_slug))
            .default(false)
            .interact()
            .map_err(|e| AppError::config_error(format!("Confirmation prompt failed: {}", e)))?;
        if !confirmed {
            return Err(AppError::Aborted);
        }
    }

    api::delete_provider(options, provider_slug)?;
    println!("✅ Deleted {} from the search index", provider_slug);
    Ok(())
}

fn run_ls_providers(options: &GlobalOptions, only_scheduled: bool) -> Result<(), AppError> {
    for slug in api::ls_providers(options, only_scheduled)? {
        println!("{}", slug);
    }
    Ok(())
}

fn run_cancel_pipelines(options: &GlobalOptions, project: &str) -> Result<(), AppError> {
    let cancelled = api::cancel_pipelines(options, project)?;
    for pipeline in &cancelled {
        println!(
            "Cancelled pipeline #{} ({}, created {})",
            pipeline.id,
            pipeline.git_ref,
            format_timestamp(pipeline.created_at)
        );
    }
    println!("✅ Cancelled {} pipeline(s) of {}", cancelled.len(), project);
    Ok(())
}
