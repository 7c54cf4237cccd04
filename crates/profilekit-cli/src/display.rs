//! Display formatting for CLI output
//!
//! Profiles print as an aligned table by default, or as the full JSON/YAML
//! document for scripting.

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use console::style;
use profilekit_core::{Profile, ProfileList};

use crate::error::{CliError, Result};

/// Output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Yaml,
}

/// Print one profile
pub fn print_profile(profile: &Profile, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => {
            print_header();
            print_row(profile, Utc::now());
        }
        OutputFormat::Json => println!("{}", to_json(profile)?),
        OutputFormat::Yaml => print!("{}", to_yaml(profile)?),
    }
    Ok(())
}

/// Print a list of profiles
pub fn print_list(list: &ProfileList, namespace: &str, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => {
            if list.is_empty() {
                println!("No profiles found in namespace {}", namespace);
                return Ok(());
            }
            print_header();
            let now = Utc::now();
            for profile in &list.items {
                print_row(profile, now);
            }
        }
        OutputFormat::Json => println!("{}", to_json(list)?),
        OutputFormat::Yaml => print!("{}", to_yaml(list)?),
    }
    Ok(())
}

/// Print a one-line status after a mutation
pub fn print_status(name: &str, namespace: &str, action: &str) {
    println!(
        "{} profile {} {} in namespace {}",
        style("✓").green().bold(),
        style(name).cyan(),
        action,
        namespace
    );
}

fn print_header() {
    println!(
        "{:<24} {:<12} {:<16} {:<8}",
        style("NAME").bold(),
        style("TYPE").bold(),
        style("LOCATION").bold(),
        style("AGE").bold()
    );
}

fn print_row(profile: &Profile, now: DateTime<Utc>) {
    let location = profile
        .spec
        .location_spec
        .get("type")
        .and_then(|v| v.as_str())
        .unwrap_or("-");
    let age = profile
        .metadata
        .creation_timestamp
        .as_ref()
        .map(|created| format_age(now, created.0))
        .unwrap_or_else(|| "-".to_string());

    println!(
        "{:<24} {:<12} {:<16} {:<8}",
        profile.metadata.name.as_deref().unwrap_or("-"),
        profile.spec.type_,
        location,
        age
    );
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).map_err(|e| CliError::internal(e.to_string()))
}

fn to_yaml<T: serde::Serialize>(value: &T) -> Result<String> {
    serde_yaml::to_string(value).map_err(|e| CliError::internal(e.to_string()))
}

/// Render the time since `created` the way kubectl does (`45s`, `12m`, `3h`, `9d`)
pub fn format_age(now: DateTime<Utc>, created: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(created);
    if elapsed.num_seconds() < 0 {
        return "0s".to_string();
    }

    if elapsed.num_days() > 0 {
        format!("{}d", elapsed.num_days())
    } else if elapsed.num_hours() > 0 {
        format!("{}h", elapsed.num_hours())
    } else if elapsed.num_minutes() > 0 {
        format!("{}m", elapsed.num_minutes())
    } else {
        format!("{}s", elapsed.num_seconds())
    }
}
