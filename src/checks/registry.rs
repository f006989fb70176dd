//! Metadata-registry checker
//!
//! Looks up the dataset's row in the meta table that maps table names to a
//! web item id and published display name. The outcome gates which
//! downstream checks the orchestrator may attempt.

use crate::checks::{db, queries, CheckOutcome, RegistryOutcome};
use crate::config::PgConfig;
use crate::error::{ConductorError, ConductorResult};

pub struct RegistryChecker {
    /// Unqualified table name; the registry keys rows without schema
    table: String,
    config: Option<PgConfig>,
}

impl RegistryChecker {
    pub fn new(table: &str, config: Option<PgConfig>) -> Self {
        Self {
            table: table.to_string(),
            config,
        }
    }

    /// Check whether the registry row exists and which fields it carries
    pub async fn exists(&self) -> ConductorResult<CheckOutcome> {
        let config = self
            .config
            .as_ref()
            .ok_or(ConductorError::MissingConfiguration("metadata registry"))?;

        let client = db::connect(config).await?;
        let row = client
            .query_opt(queries::REGISTRY_ITEM, &[&self.table])
            .await?;

        let outcome = match row {
            None => RegistryOutcome::Absent,
            Some(row) => {
                let item_id: Option<String> = row.get(0);
                let item_name: Option<String> = row.get(1);

                RegistryOutcome::classify(item_id.as_deref(), item_name.as_deref())
            }
        };

        Ok(CheckOutcome::Registry(outcome))
    }
}
