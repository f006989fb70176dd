//! SQL query constants
//!
//! Contains all SQL queries used by the checkers. Name comparisons are
//! case-insensitive on both sides; identifiers arrive as parameters, never
//! interpolated.

/// Count matching relations in the catalog tables (internal store dialect)
pub const CATALOG_TABLE_EXISTS: &str = r#"
    SELECT COUNT(*)
    FROM pg_catalog.pg_class c
        JOIN pg_catalog.pg_namespace n ON n.oid = c.relnamespace
    WHERE c.relkind IN ('r', 'p')
        AND LOWER(n.nspname) = LOWER($1)
        AND LOWER(c.relname) = LOWER($2)
"#;

/// Probe for a table through the information schema (mirror dialect)
pub const INFO_SCHEMA_TABLE_EXISTS: &str = r#"
    SELECT EXISTS (
        SELECT FROM
            information_schema.tables
        WHERE
            LOWER(table_schema) = LOWER($1)
            AND LOWER(table_name) = LOWER($2)
    )
"#;

/// Item id and published name for a dataset in the metadata registry
pub const REGISTRY_ITEM: &str = r#"
    SELECT agol_item_id, agol_published_name
    FROM
        meta.agolitems
    WHERE
        LOWER(tablename) = LOWER($1)
"#;
