//! Relational existence checkers
//!
//! Two dialects over the same capability: the internal store is probed
//! through the catalog tables, the mirrors through the information schema.

use crate::checks::{db, queries, CheckOutcome};
use crate::config::PgConfig;
use crate::error::{ConductorError, ConductorResult};
use crate::identity::TableIdentity;

/// Internal-store checker; catalog-table dialect
pub struct CatalogTableChecker {
    identity: TableIdentity,
    config: Option<PgConfig>,
    backend: &'static str,
}

impl CatalogTableChecker {
    pub fn new(identity: TableIdentity, config: Option<PgConfig>, backend: &'static str) -> Self {
        Self {
            identity,
            config,
            backend,
        }
    }

    /// Check whether the table exists in the backend's catalog
    pub async fn exists(&self) -> ConductorResult<CheckOutcome> {
        let config = self
            .config
            .as_ref()
            .ok_or(ConductorError::MissingConfiguration(self.backend))?;

        let client = db::connect(config).await?;
        let row = client
            .query_one(
                queries::CATALOG_TABLE_EXISTS,
                &[&self.identity.schema, &self.identity.table],
            )
            .await?;
        let count: i64 = row.get(0);

        Ok(CheckOutcome::Exists(count > 0))
    }
}

/// Mirror checker; information-schema dialect
pub struct InfoSchemaTableChecker {
    identity: TableIdentity,
    config: Option<PgConfig>,
    backend: &'static str,
}

impl InfoSchemaTableChecker {
    pub fn new(identity: TableIdentity, config: Option<PgConfig>, backend: &'static str) -> Self {
        Self {
            identity,
            config,
            backend,
        }
    }

    /// Check whether the table exists in the mirror
    pub async fn exists(&self) -> ConductorResult<CheckOutcome> {
        let config = self
            .config
            .as_ref()
            .ok_or(ConductorError::MissingConfiguration(self.backend))?;

        let client = db::connect(config).await?;
        let row = client
            .query_one(
                queries::INFO_SCHEMA_TABLE_EXISTS,
                &[&self.identity.schema, &self.identity.table],
            )
            .await?;
        let exists: bool = row.get(0);

        Ok(CheckOutcome::Exists(exists))
    }
}

/// Derive the open mirror's expected table name from the registry's
/// published display name: lowercase, drop one leading `utah ` prefix,
/// spaces to underscores. Idempotent.
pub fn normalize_mirror_name(name: &str) -> String {
    let lowered = name.to_lowercase();
    let stripped = lowered.strip_prefix("utah ").unwrap_or(&lowered);

    stripped.replace(' ', "_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_published_name() {
        assert_eq!(normalize_mirror_name("Utah Some Layer"), "some_layer");
        assert_eq!(normalize_mirror_name("Utah Counties"), "counties");
    }

    #[test]
    fn normalization_is_idempotent() {
        let once = normalize_mirror_name("Utah Address Points");
        assert_eq!(normalize_mirror_name(&once), once);
    }

    #[test]
    fn strips_only_a_leading_prefix() {
        assert_eq!(
            normalize_mirror_name("Southern Utah Trails"),
            "southern_utah_trails"
        );
    }

    #[test]
    fn leaves_unprefixed_names_alone() {
        assert_eq!(normalize_mirror_name("County Boundaries"), "county_boundaries");
    }
}
