//! CLI commands and argument parsing

use crate::types::ResourceKind;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Resilient listing client for cursor-paginated REST APIs
#[derive(Parser, Debug)]
#[command(name = "listguard")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (YAML)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Upstream base URL (overrides the config file)
    #[arg(long, global = true, env = "LISTGUARD_BASE_URL")]
    pub base_url: Option<String>,

    /// Bearer token (overrides the config file)
    #[arg(long, global = true, env = "LISTGUARD_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List resources, reporting whether the listing was cut short
    List {
        /// Resource kind (e.g. tasks, projects, custom-fields)
        kind: ResourceKind,

        /// Scope parameter as key=value; repeatable
        #[arg(short, long = "scope", value_parser = parse_scope_param)]
        scopes: Vec<(String, String)>,

        /// List each workspace separately and merge the results in order
        #[arg(short, long = "workspace")]
        workspaces: Vec<String>,

        /// Maximum items to return
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Fetch one resource by id
    Get {
        /// Resource kind
        kind: ResourceKind,

        /// Resource id
        id: String,
    },

    /// Print the effective configuration as YAML
    Config,
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Compact JSON on one line
    Json,
    /// Indented JSON
    Pretty,
}

fn parse_scope_param(raw: &str) -> std::result::Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected key=value, got '{raw}'")),
    }
}
