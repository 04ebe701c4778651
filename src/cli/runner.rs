//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::config::ListguardConfig;
use crate::error::{Error, Result};
use crate::resource::{ResourceClient, Scope};
use crate::types::{JsonValue, ResourceKind};
use serde::Serialize;
use std::time::Instant;
use tracing::info;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        let config = self.load_config()?;
        match &self.cli.command {
            Commands::List {
                kind,
                scopes,
                workspaces,
                limit,
            } => self.list(config, *kind, scopes, workspaces, *limit).await,
            Commands::Get { kind, id } => self.get(config, *kind, id).await,
            Commands::Config => {
                let mut shown = config;
                if shown.http.token.is_some() {
                    shown.http.token = Some("***".to_string());
                }
                let yaml = serde_yaml::to_string(&shown)?;
                print!("{yaml}");
                Ok(())
            }
        }
    }

    /// Load the config file (if any) and apply command-line overrides
    fn load_config(&self) -> Result<ListguardConfig> {
        let mut config = match &self.cli.config {
            Some(path) => ListguardConfig::from_file(path)?,
            None => ListguardConfig::default(),
        };
        if let Some(base_url) = &self.cli.base_url {
            config.http.base_url = Some(base_url.clone());
        }
        if let Some(token) = &self.cli.token {
            config.http.token = Some(token.clone());
        }
        config.validate()?;
        Ok(config)
    }

    fn client(config: ListguardConfig) -> Result<ResourceClient> {
        if config.http.base_url.is_none() {
            return Err(Error::config(
                "No upstream base URL (use --base-url or http.base_url)",
            ));
        }
        ResourceClient::new(config)
    }

    async fn list(
        &self,
        config: ListguardConfig,
        kind: ResourceKind,
        params: &[(String, String)],
        workspaces: &[String],
        limit: Option<usize>,
    ) -> Result<()> {
        let base = params
            .iter()
            .fold(Scope::all(), |scope, (key, value)| scope.with(key, value));
        let accessor = Self::client(config)?.accessor::<JsonValue>(kind);

        let start = Instant::now();
        let result = if workspaces.is_empty() {
            accessor.list(&base, limit).await?
        } else {
            let scopes: Vec<Scope> = workspaces
                .iter()
                .map(|workspace| base.clone().with("workspace", workspace))
                .collect();
            accessor.list_across(&scopes, limit).await?
        };

        info!(
            kind = %kind,
            items = result.len(),
            truncated = result.is_truncated(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "listing complete"
        );
        if let Some(info) = result.truncation() {
            eprintln!("{}", info.reason().notice());
        }
        self.output(&result)
    }

    async fn get(&self, config: ListguardConfig, kind: ResourceKind, id: &str) -> Result<()> {
        let accessor = Self::client(config)?.accessor::<JsonValue>(kind);
        let record = accessor.get(id).await?;
        self.output(&record)
    }

    fn output<T: Serialize>(&self, value: &T) -> Result<()> {
        let text = match self.cli.format {
            OutputFormat::Json => serde_json::to_string(value)?,
            OutputFormat::Pretty => serde_json::to_string_pretty(value)?,
        };
        println!("{text}");
        Ok(())
    }
}
