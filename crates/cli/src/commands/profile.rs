//! Profile management commands
//!
//! Profiles are named connection settings for an S3-compatible endpoint,
//! stored in the configuration file.

use bkt_core::{Profile, ProfileManager};
use clap::Subcommand;
use serde::Serialize;

use crate::exit_code::ExitCode;
use crate::output::Formatter;

/// Profile subcommands for managing storage connections
#[derive(Subcommand, Debug)]
pub enum ProfileCommands {
    /// Add or update a profile
    Set(SetArgs),

    /// List all configured profiles
    List(ListArgs),

    /// Remove a profile
    Remove(RemoveArgs),
}

/// Arguments for the `profile set` command
#[derive(clap::Args, Debug)]
pub struct SetArgs {
    /// Profile name (e.g., "default", "local", "backup")
    pub name: String,

    /// S3 endpoint URL (e.g., "http://localhost:9000", "https://s3.amazonaws.com")
    pub endpoint: String,

    /// Access key ID
    pub access_key: String,

    /// Secret access key
    pub secret_key: String,

    /// Region
    #[arg(long, default_value = "us-east-1")]
    pub region: String,

    /// Bucket lookup style: auto, path, or dns
    #[arg(long, default_value = "auto")]
    pub bucket_lookup: String,
}

/// Arguments for the `profile list` command
#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Show full details including region and lookup style
    #[arg(short, long)]
    pub long: bool,
}

/// Arguments for the `profile remove` command
#[derive(clap::Args, Debug)]
pub struct RemoveArgs {
    /// Name of the profile to remove
    pub name: String,
}

/// JSON output for profile list
#[derive(Serialize)]
struct ProfileListOutput {
    profiles: Vec<ProfileInfo>,
}

/// Profile information for JSON output (without credentials)
#[derive(Serialize)]
struct ProfileInfo {
    name: String,
    endpoint: String,
    region: String,
    bucket_lookup: String,
}

impl From<&Profile> for ProfileInfo {
    fn from(profile: &Profile) -> Self {
        Self {
            name: profile.name.clone(),
            endpoint: profile.endpoint.clone(),
            region: profile.region.clone(),
            bucket_lookup: profile.bucket_lookup.clone(),
        }
    }
}

/// JSON output for profile set/remove operations
#[derive(Serialize)]
struct ProfileOperationOutput {
    success: bool,
    profile: String,
    message: String,
}

/// Execute a profile subcommand
pub fn execute(cmd: ProfileCommands, manager: &ProfileManager, formatter: &Formatter) -> ExitCode {
    match cmd {
        ProfileCommands::Set(args) => execute_set(args, manager, formatter),
        ProfileCommands::List(args) => execute_list(args, manager, formatter),
        ProfileCommands::Remove(args) => execute_remove(args, manager, formatter),
    }
}

fn execute_set(args: SetArgs, manager: &ProfileManager, formatter: &Formatter) -> ExitCode {
    let mut profile = Profile::new(
        &args.name,
        &args.endpoint,
        &args.access_key,
        &args.secret_key,
    );
    profile.region = args.region;
    profile.bucket_lookup = args.bucket_lookup;

    if let Err(e) = profile.validate() {
        formatter.error(&e.to_string());
        return ExitCode::UsageError;
    }

    match manager.set(profile) {
        Ok(()) => {
            let message = format!("Profile '{}' configured successfully", args.name);
            if formatter.is_json() {
                formatter.json(&ProfileOperationOutput {
                    success: true,
                    profile: args.name,
                    message,
                });
            } else {
                formatter.success(&format!("{message}."));
            }
            ExitCode::Success
        }
        Err(e) => {
            formatter.error(&e.to_string());
            ExitCode::from(&e)
        }
    }
}

fn execute_list(args: ListArgs, manager: &ProfileManager, formatter: &Formatter) -> ExitCode {
    match manager.list() {
        Ok(profiles) => {
            if formatter.is_json() {
                formatter.json(&ProfileListOutput {
                    profiles: profiles.iter().map(ProfileInfo::from).collect(),
                });
            } else if profiles.is_empty() {
                formatter.println("No profiles configured.");
            } else {
                for profile in &profiles {
                    formatter.println(&list_line(profile, args.long));
                }
            }
            ExitCode::Success
        }
        Err(e) => {
            formatter.error(&e.to_string());
            ExitCode::from(&e)
        }
    }
}

fn execute_remove(args: RemoveArgs, manager: &ProfileManager, formatter: &Formatter) -> ExitCode {
    match manager.remove(&args.name) {
        Ok(()) => {
            let message = format!("Profile '{}' removed successfully", args.name);
            if formatter.is_json() {
                formatter.json(&ProfileOperationOutput {
                    success: true,
                    profile: args.name,
                    message,
                });
            } else {
                formatter.success(&format!("{message}."));
            }
            ExitCode::Success
        }
        Err(e) => {
            formatter.error(&e.to_string());
            ExitCode::from(&e)
        }
    }
}

fn list_line(profile: &Profile, long: bool) -> String {
    if long {
        format!(
            "{:<12} {} (region: {}, lookup: {})",
            profile.name, profile.endpoint, profile.region, profile.bucket_lookup
        )
    } else {
        format!("{:<12} {}", profile.name, profile.endpoint)
    }
}
