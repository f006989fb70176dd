//! Dataset identity parsing
//!
//! A dataset is addressed by a dotted identifier: `schema.table` or
//! `database.schema.table`. Case is preserved as given; every backend
//! compares case-insensitively in its own query.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::ConductorError;

static SEGMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z_][a-zA-Z0-9_]*$").expect("segment pattern is valid"));

/// Parsed dataset identifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableIdentity {
    pub database: Option<String>,
    pub schema: String,
    pub table: String,
}

impl TableIdentity {
    /// Parse a dotted dataset name into its parts.
    ///
    /// Accepts exactly two segments (`schema.table`) or three
    /// (`database.schema.table`); anything else is an invalid identifier.
    pub fn parse(raw: &str) -> Result<Self, ConductorError> {
        if !raw.contains('.') {
            return Err(ConductorError::InvalidIdentifier(raw.to_string()));
        }

        let parts: Vec<&str> = raw.split('.').collect();

        if parts.len() < 2 || parts.len() > 3 {
            return Err(ConductorError::InvalidIdentifier(raw.to_string()));
        }

        if parts.iter().any(|part| !SEGMENT.is_match(part)) {
            return Err(ConductorError::InvalidIdentifier(raw.to_string()));
        }

        let (database, schema, table) = match parts.as_slice() {
            [schema, table] => (None, schema.to_string(), table.to_string()),
            [database, schema, table] => (
                Some(database.to_string()),
                schema.to_string(),
                table.to_string(),
            ),
            _ => unreachable!("length checked above"),
        };

        Ok(Self {
            database,
            schema,
            table,
        })
    }
}

impl fmt::Display for TableIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.database {
            Some(database) => write!(f, "{}.{}.{}", database, self.schema, self.table),
            None => write!(f, "{}.{}", self.schema, self.table),
        }
    }
}
