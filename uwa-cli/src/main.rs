//! uwa: command-line host for Universal Wallet Address synthesis
//!
//! Provides:
//! - Catalog and default profile inspection
//! - One-off token synthesis from `name=value` fields
//! - Bulk import of JSON rows into an in-memory record store
//!
//! Output is JSON on stdout; logs go to stderr.

use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::info;

use uwa_core::{
    ComponentCatalog, EntityType, ImportRow, InclusionMatrix, RawFieldSet, RecordStore,
    UwaConfig,
};

#[derive(Parser)]
#[command(name = "uwa")]
#[command(about = "Synthesize Universal Wallet Addresses from identity fields")]
struct Cli {
    /// Path to a YAML configuration file
    #[arg(short, long, env = "UWA_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List the identity component catalog
    Catalog {
        /// Only components eligible for tokens
        #[arg(long)]
        eligible: bool,
    },

    /// Show the resolved inclusion profile for an entity type
    Profile {
        /// Entity type (e.g. machine-vm, human, api)
        entity: EntityType,
    },

    /// Synthesize a token from raw fields
    Synthesize {
        /// Entity type (e.g. machine-vm, human, api)
        entity: EntityType,

        /// Raw field as name=value, repeatable
        #[arg(short, long = "field", value_parser = parse_field)]
        fields: Vec<(String, String)>,

        /// Print the unchunked token only
        #[arg(long)]
        raw: bool,
    },

    /// Import a JSON array of rows and report per-row results
    Import {
        /// JSON file with `[{"entityType": ..., "fields": {...}}]`
        file: PathBuf,
    },

    /// Print the effective configuration as YAML
    Config,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SynthesisOutput<'a> {
    entity_type: EntityType,
    token: &'a str,
    display: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ImportOutcome {
    row: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

fn parse_field(s: &str) -> Result<(String, String), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected name=value, got '{s}'"))?;
    Ok((name.trim().to_string(), value.to_string()))
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<UwaConfig> {
    let Some(path) = path else {
        return Ok(UwaConfig::default());
    };
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    let config = UwaConfig::from_yaml(&content)?;
    info!(path = %path.display(), "Loaded config");
    Ok(config)
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("uwa=info".parse()?)
                .add_directive("uwa_core=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_ref())?;
    let matrix = InclusionMatrix::standard();

    match cli.command {
        Commands::Catalog { eligible } => {
            let catalog = ComponentCatalog::standard();
            let components: Vec<_> = if eligible {
                catalog.eligible().collect()
            } else {
                catalog.list().iter().collect()
            };
            print_json(&components)?;
        }

        Commands::Profile { entity } => {
            let profiles = config.profiles(&matrix)?;
            let Some(profile) = profiles.get(entity) else {
                bail!("no profile for {entity}");
            };
            print_json(profile)?;
        }

        Commands::Synthesize {
            entity,
            fields,
            raw,
        } => {
            let profiles = config.profiles(&matrix)?;
            let Some(profile) = profiles.get(entity) else {
                bail!("no profile for {entity}");
            };
            let fields = RawFieldSet::from_pairs(fields, config.unknown_fields)?;
            let token = config.synthesizer().synthesize(entity, &fields, profile)?;

            if raw {
                println!("{token}");
            } else {
                print_json(&SynthesisOutput {
                    entity_type: entity,
                    display: config.formatter().format(&token),
                    token: &token,
                })?;
            }
        }

        Commands::Import { file } => {
            let content = std::fs::read_to_string(&file)
                .with_context(|| format!("reading rows {}", file.display()))?;
            let rows: Vec<ImportRow> = serde_json::from_str(&content)
                .with_context(|| format!("parsing rows {}", file.display()))?;

            let profiles = config.profiles(&matrix)?;
            let store = RecordStore::from_config(&config);
            let outcomes: Vec<ImportOutcome> = store
                .import_rows(rows, &profiles, config.unknown_fields)
                .into_iter()
                .enumerate()
                .map(|(row, result)| match result {
                    Ok(record) => ImportOutcome {
                        row,
                        token: Some(record.token),
                        error: None,
                    },
                    Err(e) => ImportOutcome {
                        row,
                        token: None,
                        error: Some(e.to_string()),
                    },
                })
                .collect();
            print_json(&outcomes)?;
        }

        Commands::Config => {
            print!("{}", config.to_yaml()?);
        }
    }

    Ok(())
}
