//! Policy definition management commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use crate::output::{self, OutputFormat};
use pwguard_core::config::AppConfig;
use pwguard_core::error::AppError;
use pwguard_database::repositories::PolicyRepository;
use pwguard_entity::policy::{PolicyDefinition, PolicyKey};

/// Arguments for policy commands
#[derive(Debug, Args)]
pub struct PoliciesArgs {
    /// Policy subcommand
    #[command(subcommand)]
    pub command: PoliciesCommand,
}

/// Policy subcommands
#[derive(Debug, Subcommand)]
pub enum PoliciesCommand {
    /// List the loaded chain in evaluation order
    List {
        /// List every stored definition instead, including optional ones
        #[arg(long)]
        all: bool,
    },
    /// Create or replace a policy definition
    Set {
        /// Policy key (e.g. size, complexity, special_characters)
        key: String,
        /// Evaluation priority; lower runs first
        #[arg(short, long, default_value = "100")]
        priority: i32,
        /// Rule map as a JSON object
        #[arg(short, long, default_value = "{}")]
        rules: String,
        /// Store the definition without adding it to the chain
        #[arg(long)]
        optional: bool,
    },
    /// Delete a policy definition
    Remove {
        /// Policy key
        key: String,
    },
}

/// Loaded chain row for table output
#[derive(Debug, Serialize, Tabled)]
struct ChainRow {
    /// Evaluation position
    position: usize,
    /// Policy key
    key: String,
}

/// Stored definition row for table output
#[derive(Debug, Serialize, Tabled)]
struct DefinitionRow {
    /// Priority
    priority: i32,
    /// Policy key
    key: String,
    /// Required flag
    required: bool,
    /// Rule map
    rules: String,
    /// Last updated
    last_updated: String,
}

impl From<&PolicyDefinition> for DefinitionRow {
    fn from(d: &PolicyDefinition) -> Self {
        Self {
            priority: d.priority,
            key: d.key.clone(),
            required: d.required,
            rules: d.validation_rules.to_string(),
            last_updated: d.last_updated.to_rfc3339(),
        }
    }
}

/// Execute policy commands
pub async fn execute(
    args: &PoliciesArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let pool = super::create_db_pool(config).await?;
    let policy_repo = PolicyRepository::new(pool.clone());

    match &args.command {
        PoliciesCommand::List { all: true } => {
            let definitions = policy_repo.find_all().await?;
            let rows: Vec<DefinitionRow> = definitions.iter().map(DefinitionRow::from).collect();
            output::print_list(&rows, format);
        }
        PoliciesCommand::List { all: false } => {
            let engine = super::build_engine(config, &pool)?;
            let chain = engine.reload().await?;

            let rows: Vec<ChainRow> = chain
                .keys()
                .iter()
                .enumerate()
                .map(|(i, key)| ChainRow {
                    position: i + 1,
                    key: key.to_string(),
                })
                .collect();
            output::print_list(&rows, format);
        }
        PoliciesCommand::Set {
            key,
            priority,
            rules,
            optional,
        } => {
            let key: PolicyKey = key.parse()?;
            let rules: serde_json::Value = serde_json::from_str(rules)
                .map_err(|e| AppError::validation(format!("Invalid JSON rules: {}", e)))?;
            if !rules.is_object() {
                return Err(AppError::validation("Rules must be a JSON object"));
            }

            let mut definition = PolicyDefinition::new(key.as_str(), *priority, rules);
            if *optional {
                definition = definition.optional();
            }

            let saved = policy_repo.upsert(&definition).await?;
            output::print_success(&format!(
                "Policy '{}' saved (priority {})",
                saved.key, saved.priority
            ));
        }
        PoliciesCommand::Remove { key } => {
            if policy_repo.delete_by_key(key).await? {
                output::print_success(&format!("Policy '{}' removed", key));
            } else {
                return Err(AppError::not_found(format!("Policy '{}' not found", key)));
            }
        }
    }

    Ok(())
}
