//! Backend existence checks
//!
//! One module per backend family, all exposing the same capability:
//! `exists()` returning a tagged [`CheckOutcome`]. Each checker owns its
//! configuration and connection lifecycle; nothing is shared or pooled.

pub mod db;
pub mod queries;
pub mod registry;
pub mod relational;
pub mod sheet;
pub mod web;

use crate::config::Settings;
use crate::error::ConductorResult;
use crate::identity::TableIdentity;
use crate::sheets::WorksheetSource;

/// The checks the orchestrator can dispatch, in no particular order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckKind {
    InternalStore,
    PublicMirror,
    Registry,
    OpenMirror,
    WebItem,
    OpenData,
    Stewardship,
}

impl CheckKind {
    /// Name used in the published report
    pub fn name(&self) -> &'static str {
        match self {
            CheckKind::InternalStore => "internal store",
            CheckKind::PublicMirror => "public mirror",
            CheckKind::Registry => "metadata registry",
            CheckKind::OpenMirror => "open mirror",
            CheckKind::WebItem => "web item",
            CheckKind::OpenData => "open data page",
            CheckKind::Stewardship => "stewardship sheet",
        }
    }
}

/// Result of the metadata-registry lookup.
///
/// The registry row is the join key that supplies the display name and the
/// item id consumed by the downstream checks, so a partially filled row is
/// a first-class state rather than an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryOutcome {
    Absent,
    MissingItemId { item_name: String },
    MissingItemName { item_id: String },
    Present { item_id: String, item_name: String },
}

impl RegistryOutcome {
    /// Classify a registry row; blank fields count as missing
    pub fn classify(item_id: Option<&str>, item_name: Option<&str>) -> Self {
        let item_id = item_id.map(str::trim).filter(|value| !value.is_empty());
        let item_name = item_name.map(str::trim).filter(|value| !value.is_empty());

        match (item_id, item_name) {
            (None, None) => RegistryOutcome::Absent,
            (None, Some(name)) => RegistryOutcome::MissingItemId {
                item_name: name.to_string(),
            },
            (Some(id), None) => RegistryOutcome::MissingItemName {
                item_id: id.to_string(),
            },
            (Some(id), Some(name)) => RegistryOutcome::Present {
                item_id: id.to_string(),
                item_name: name.to_string(),
            },
        }
    }

    /// The item id, when the row supplies one
    pub fn item_id(&self) -> Option<&str> {
        match self {
            RegistryOutcome::MissingItemName { item_id }
            | RegistryOutcome::Present { item_id, .. } => Some(item_id),
            _ => None,
        }
    }

    /// The published display name, when the row supplies one
    pub fn item_name(&self) -> Option<&str> {
        match self {
            RegistryOutcome::MissingItemId { item_name }
            | RegistryOutcome::Present { item_name, .. } => Some(item_name),
            _ => None,
        }
    }

    /// Human-readable reason for a partial row
    pub fn missing_reason(&self) -> Option<&'static str> {
        match self {
            RegistryOutcome::MissingItemId { .. } => Some("missing item id"),
            RegistryOutcome::MissingItemName { .. } => Some("missing item name"),
            _ => None,
        }
    }
}

/// Result of the stewardship-sheet scan
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SheetOutcome {
    /// Exactly one row matched; field order follows the required-field list
    Row { field_status: Vec<(String, bool)> },
    /// No match, or duplicate matches (a data-integrity problem)
    Invalid { duplicate: bool, message: String },
}

impl SheetOutcome {
    pub fn all_fields_present(&self) -> bool {
        match self {
            SheetOutcome::Row { field_status } => {
                field_status.iter().all(|(_, present)| *present)
            }
            SheetOutcome::Invalid { .. } => false,
        }
    }
}

/// Backend-specific check result
#[derive(Debug, Clone, PartialEq)]
pub enum CheckOutcome {
    Exists(bool),
    Registry(RegistryOutcome),
    Sheet(SheetOutcome),
}

/// The uniform capability the orchestrator dispatches against.
///
/// One method per backend check; the production implementation constructs
/// a fresh checker (and connection) per call. Tests swap in a recording
/// suite to assert dispatch gating.
#[allow(async_fn_in_trait)]
pub trait CheckSuite {
    async fn internal_store(&self, identity: &TableIdentity) -> ConductorResult<CheckOutcome>;
    async fn public_mirror(&self, identity: &TableIdentity) -> ConductorResult<CheckOutcome>;
    async fn registry(&self, table: &str) -> ConductorResult<CheckOutcome>;
    async fn open_mirror(&self, identity: &TableIdentity) -> ConductorResult<CheckOutcome>;
    async fn web_item(&self, item_id: &str) -> ConductorResult<CheckOutcome>;
    async fn open_data(&self, item_name: &str) -> ConductorResult<CheckOutcome>;
    async fn stewardship(&self, table: &str) -> ConductorResult<CheckOutcome>;
}

/// Production [`CheckSuite`] wired to the real backends
pub struct BackendSuite<'a, S: WorksheetSource> {
    settings: &'a Settings,
    sheets: &'a S,
}

impl<'a, S: WorksheetSource> BackendSuite<'a, S> {
    pub fn new(settings: &'a Settings, sheets: &'a S) -> Self {
        Self { settings, sheets }
    }
}

impl<S: WorksheetSource> CheckSuite for BackendSuite<'_, S> {
    async fn internal_store(&self, identity: &TableIdentity) -> ConductorResult<CheckOutcome> {
        relational::CatalogTableChecker::new(
            identity.clone(),
            self.settings.internal.clone(),
            CheckKind::InternalStore.name(),
        )
        .exists()
        .await
    }

    /// The public mirror shares the internal store's engine, so it is
    /// probed with the same catalog-table dialect
    async fn public_mirror(&self, identity: &TableIdentity) -> ConductorResult<CheckOutcome> {
        relational::CatalogTableChecker::new(
            identity.clone(),
            self.settings.mirror.clone(),
            CheckKind::PublicMirror.name(),
        )
        .exists()
        .await
    }

    /// The registry meta table lives in the internal store
    async fn registry(&self, table: &str) -> ConductorResult<CheckOutcome> {
        registry::RegistryChecker::new(table, self.settings.internal.clone())
            .exists()
            .await
    }

    async fn open_mirror(&self, identity: &TableIdentity) -> ConductorResult<CheckOutcome> {
        relational::InfoSchemaTableChecker::new(
            identity.clone(),
            self.settings.open.clone(),
            CheckKind::OpenMirror.name(),
        )
        .exists()
        .await
    }

    async fn web_item(&self, item_id: &str) -> ConductorResult<CheckOutcome> {
        web::WebItemChecker::new(&self.settings.web.item_url, item_id)
            .exists()
            .await
    }

    async fn open_data(&self, item_name: &str) -> ConductorResult<CheckOutcome> {
        web::OpenDataChecker::new(&self.settings.web.open_data_url, item_name)
            .exists()
            .await
    }

    async fn stewardship(&self, table: &str) -> ConductorResult<CheckOutcome> {
        sheet::StewardshipChecker::new(table, self.sheets)
            .exists()
            .await
    }
}
