//! CLI command definitions and execution
//!
//! One module per subcommand, each with an `Args` struct and an `execute`
//! function. Commands that talk to the object store receive a [`Session`]
//! holding the connected client and the configured default bucket.

use anyhow::Context as _;
use bkt_core::config::ColorMode;
use bkt_core::{Config, ConfigManager, DEFAULT_PROFILE, ObjectStore, ProfileManager};
use bkt_s3::S3Client;
use clap::{Parser, Subcommand};

use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

mod completions;
mod create_bucket;
mod delete_objects;
mod download_object;
mod profile;
mod remove_bucket;
mod set_canned_acl;
mod show_object;
mod upload_file;

#[cfg(test)]
pub(crate) mod test_support;

/// bkt - manage buckets and objects in S3-compatible object storage
///
/// Paths use the form `bucket:key`. `bucket` or `bucket:` names a bucket,
/// and `:key` names a key in the default bucket.
#[derive(Parser, Debug)]
#[command(name = "bkt")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Connection profile to use
    #[arg(long, global = true, env = "BKT_PROFILE", default_value = DEFAULT_PROFILE)]
    pub profile: String,

    /// Output format: human-readable or JSON
    #[arg(long, global = true, default_value = "false")]
    pub json: bool,

    /// Disable colored output
    #[arg(long, global = true, default_value = "false")]
    pub no_color: bool,

    /// Disable progress spinners
    #[arg(long, global = true, default_value = "false")]
    pub no_progress: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true, default_value = "false")]
    pub quiet: bool,

    /// Log each action taken
    #[arg(short, long, global = true, default_value = "false")]
    pub verbose: bool,

    /// Enable debug logging
    #[arg(long, global = true, default_value = "false")]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Log filter used when `RUST_LOG` is not set
    pub fn log_filter(&self) -> &'static str {
        if self.debug {
            "debug"
        } else if self.verbose {
            "info"
        } else {
            "warn"
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Change a bucket or object's ACL to the specified canned value
    SetCannedAcl(set_canned_acl::SetCannedAclArgs),

    /// Create a new bucket
    CreateBucket(create_bucket::CreateBucketArgs),

    /// Delete an existing bucket
    RemoveBucket(remove_bucket::RemoveBucketArgs),

    /// Delete existing objects
    DeleteObjects(delete_objects::DeleteObjectsArgs),

    /// Upload a local file to an object
    UploadFile(upload_file::UploadFileArgs),

    /// Download an object to a local file
    DownloadObject(download_object::DownloadObjectArgs),

    /// Show information about an object
    ShowObject(show_object::ShowObjectArgs),

    /// Manage connection profiles
    #[command(subcommand)]
    Profile(profile::ProfileCommands),

    /// Generate shell completion scripts
    Completions(completions::CompletionsArgs),
}

/// A connected object store plus the configured default bucket
pub struct Session {
    store: Box<dyn ObjectStore>,
    default_bucket: Option<String>,
}

impl Session {
    pub fn new(store: Box<dyn ObjectStore>, default_bucket: Option<String>) -> Self {
        Self {
            store,
            default_bucket,
        }
    }

    /// Connect using the named profile from the configuration
    pub async fn connect(config: &Config, profile_name: &str) -> anyhow::Result<Self> {
        let profile = config
            .profile(profile_name)
            .cloned()
            .with_context(|| {
                format!("run `bkt profile set {profile_name} <endpoint> <access-key> <secret-key>` first")
            })?;

        let client = S3Client::new(profile)
            .await
            .with_context(|| format!("failed to create S3 client for profile '{profile_name}'"))?;

        Ok(Self::new(Box::new(client), config.defaults.bucket.clone()))
    }

    pub fn store(&self) -> &dyn ObjectStore {
        self.store.as_ref()
    }

    /// Bucket to use when a path omits one: the `--bucket` flag, else the config default
    pub fn default_bucket(&self, flag: Option<&str>) -> Option<String> {
        flag.map(str::to_string)
            .or_else(|| self.default_bucket.clone())
    }
}

/// Execute the CLI command and return an exit code
pub async fn execute(cli: Cli) -> ExitCode {
    let output_config = OutputConfig {
        json: cli.json,
        no_color: cli.no_color,
        no_progress: cli.no_progress,
        quiet: cli.quiet,
    };

    match ConfigManager::new() {
        Ok(config_manager) => run(cli, output_config, config_manager).await,
        Err(e) => {
            Formatter::new(output_config).error(&format!("Failed to locate configuration: {e}"));
            ExitCode::GeneralError
        }
    }
}

async fn run(cli: Cli, output_config: OutputConfig, config_manager: ConfigManager) -> ExitCode {
    let config = match config_manager.load() {
        Ok(config) => config,
        Err(e) => {
            Formatter::new(output_config).error(&format!("Failed to load configuration: {e}"));
            return ExitCode::GeneralError;
        }
    };

    let formatter = Formatter::new(output_config.with_defaults(&config.defaults));
    if config.defaults.color == ColorMode::Always && formatter.colors_enabled() {
        console::set_colors_enabled(true);
    }

    let command = match cli.command {
        Commands::Profile(cmd) => {
            let manager = ProfileManager::with_config_manager(config_manager);
            return profile::execute(cmd, &manager, &formatter);
        }
        Commands::Completions(args) => return completions::execute(args),
        command => command,
    };

    let session = match Session::connect(&config, &cli.profile).await {
        Ok(session) => session,
        Err(e) => {
            formatter.error(&format!("{e:#}"));
            return ExitCode::GeneralError;
        }
    };

    match command {
        Commands::SetCannedAcl(args) => set_canned_acl::execute(args, &session, &formatter).await,
        Commands::CreateBucket(args) => create_bucket::execute(args, &session, &formatter).await,
        Commands::RemoveBucket(args) => remove_bucket::execute(args, &session, &formatter).await,
        Commands::DeleteObjects(args) => delete_objects::execute(args, &session, &formatter).await,
        Commands::UploadFile(args) => upload_file::execute(args, &session, &formatter).await,
        Commands::DownloadObject(args) => {
            download_object::execute(args, &session, &formatter).await
        }
        Commands::ShowObject(args) => show_object::execute(args, &session, &formatter).await,
        Commands::Profile(_) | Commands::Completions(_) => ExitCode::Success,
    }
}
