//! Stewardship-sheet checker
//!
//! Looks for the dataset's row in the stewardship worksheet and reports
//! which of the required documentation fields are filled in. Column
//! positions are discovered from the live header row, never hard-coded.

use crate::checks::{CheckOutcome, SheetOutcome};
use crate::error::ConductorResult;
use crate::sheets::{Worksheet, WorksheetSource};

/// Documentation fields every stewardship row must carry
pub const REQUIRED_FIELDS: [&str; 6] = [
    "Description",
    "Data Source",
    "Website URL",
    "Data Type",
    "Endpoint",
    "Deprecated",
];

pub struct StewardshipChecker<'a, S: WorksheetSource> {
    table: String,
    source: &'a S,
}

impl<'a, S: WorksheetSource> StewardshipChecker<'a, S> {
    pub fn new(table: &str, source: &'a S) -> Self {
        Self {
            table: table.to_string(),
            source,
        }
    }

    /// Fetch the worksheet and scan it for the dataset's row
    pub async fn exists(&self) -> ConductorResult<CheckOutcome> {
        let sheet = self.source.fetch().await?;

        Ok(CheckOutcome::Sheet(scan(&sheet, &self.table)))
    }
}

/// Scan a worksheet grid for exactly one cell matching the dataset name.
///
/// Duplicate matches are a data-integrity error and are reported, not
/// silently resolved. Row numbers in messages are 1-based to match what a
/// steward sees in the spreadsheet UI.
pub fn scan(sheet: &Worksheet, table: &str) -> SheetOutcome {
    let field_columns: Vec<(String, Option<usize>)> = REQUIRED_FIELDS
        .iter()
        .map(|field| {
            let column = sheet.header().iter().position(|title| title == field);
            (field.to_string(), column)
        })
        .collect();

    let mut matches = Vec::new();
    for (row_index, row) in sheet.rows.iter().enumerate() {
        for cell in row {
            if cell == table {
                matches.push(row_index);
            }
        }
    }

    if matches.is_empty() {
        return SheetOutcome::Invalid {
            duplicate: false,
            message: format!("Did not find {} in the worksheet", table),
        };
    }

    if matches.len() > 1 {
        let rows = matches
            .iter()
            .map(|row| (row + 1).to_string())
            .collect::<Vec<_>>()
            .join(", ");

        return SheetOutcome::Invalid {
            duplicate: true,
            message: format!(
                "There are multiple items with this name on rows {}. Please remove the duplicates.",
                rows
            ),
        };
    }

    let row = matches[0];
    let field_status = field_columns
        .into_iter()
        .map(|(field, column)| {
            let present = column
                .map(|column| !sheet.cell(row, column).trim().is_empty())
                .unwrap_or(false);
            (field, present)
        })
        .collect();

    SheetOutcome::Row { field_status }
}
