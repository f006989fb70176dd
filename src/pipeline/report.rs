//! Report rendering and publishing
//!
//! Renders each dataset's graded checks into a single Markdown comment and
//! posts it on the originating issue.

use tracing::info;

use crate::checks::{CheckKind, CheckOutcome};
use crate::error::ConductorResult;
use crate::github::IssueTracker;
use crate::pipeline::grade::{grade, Grade};

/// One dispatched check and its raw result
#[derive(Debug, Clone)]
pub struct ReportEntry {
    pub check: CheckKind,
    pub issue_number: u64,
    pub outcome: CheckOutcome,
}

/// All check results for one dataset, in dispatch order
#[derive(Debug, Clone)]
pub struct DatasetReport {
    pub table: String,
    pub is_introduction: bool,
    /// The issue the dataset was tracked on
    pub issue_number: u64,
    pub entries: Vec<ReportEntry>,
    /// Set when a transport failure cut the dataset's checks short
    pub error: Option<String>,
}

impl DatasetReport {
    /// The issue the comment is posted on: the first issue referenced by
    /// the dataset's grades, falling back to the originating issue when no
    /// check completed.
    pub fn target_issue(&self) -> u64 {
        self.entries
            .first()
            .map(|entry| entry.issue_number)
            .unwrap_or(self.issue_number)
    }

    /// Grades in dispatch order
    pub fn grades(&self) -> Vec<(CheckKind, Grade)> {
        self.entries
            .iter()
            .map(|entry| (entry.check, grade(self.is_introduction, &entry.outcome)))
            .collect()
    }
}

/// Render a dataset's report as the published Markdown comment
pub fn render(report: &DatasetReport) -> String {
    let mut lines = vec![
        "## conductor results".to_string(),
        String::new(),
        "| check | status |".to_string(),
        "| - | - |".to_string(),
    ];

    for (check, verdict) in report.grades() {
        lines.push(format!("| {} | {} |", check.name(), verdict));
    }

    if let Some(error) = &report.error {
        lines.push(format!("| pipeline | {} |", Grade::Ambiguous(error.clone())));
    }

    lines.join("\n")
}

/// Post one comment per dataset report
pub async fn publish<T: IssueTracker>(
    tracker: &T,
    reports: &[DatasetReport],
) -> ConductorResult<()> {
    for report in reports {
        let issue = report.target_issue();
        tracker.post_comment(issue, &render(report)).await?;
        info!("published results for {} on issue #{}", report.table, issue);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::{RegistryOutcome, SheetOutcome};
    use pretty_assertions::assert_eq;

    fn entry(check: CheckKind, outcome: CheckOutcome) -> ReportEntry {
        ReportEntry {
            check,
            issue_number: 7,
            outcome,
        }
    }

    #[test]
    fn renders_rows_in_dispatch_order() {
        let report = DatasetReport {
            table: "boundaries.counties".to_string(),
            is_introduction: true,
            issue_number: 7,
            entries: vec![
                entry(CheckKind::InternalStore, CheckOutcome::Exists(true)),
                entry(CheckKind::PublicMirror, CheckOutcome::Exists(true)),
                entry(
                    CheckKind::Registry,
                    CheckOutcome::Registry(RegistryOutcome::Present {
                        item_id: "abc123".to_string(),
                        item_name: "Utah Counties".to_string(),
                    }),
                ),
            ],
            error: None,
        };

        let expected = "## conductor results\n\
                        \n\
                        | check | status |\n\
                        | - | - |\n\
                        | internal store | pass |\n\
                        | public mirror | pass |\n\
                        | metadata registry | pass |";
        assert_eq!(render(&report), expected);
    }

    #[test]
    fn ambiguous_detail_lands_in_status_column() {
        let report = DatasetReport {
            table: "boundaries.counties".to_string(),
            is_introduction: true,
            issue_number: 7,
            entries: vec![entry(
                CheckKind::Registry,
                CheckOutcome::Registry(RegistryOutcome::MissingItemId {
                    item_name: "Utah Counties".to_string(),
                }),
            )],
            error: None,
        };

        assert!(render(&report).contains("| metadata registry | ambiguous: missing item id |"));
    }

    #[test]
    fn deprecation_inverts_existence_rows() {
        let report = DatasetReport {
            table: "boundaries.counties".to_string(),
            is_introduction: false,
            issue_number: 7,
            entries: vec![entry(CheckKind::InternalStore, CheckOutcome::Exists(true))],
            error: None,
        };

        assert!(render(&report).contains("| internal store | fail |"));
    }

    #[test]
    fn operational_error_renders_as_trailing_ambiguous_row() {
        let report = DatasetReport {
            table: "boundaries.counties".to_string(),
            is_introduction: true,
            issue_number: 7,
            entries: vec![entry(CheckKind::InternalStore, CheckOutcome::Exists(true))],
            error: Some("database error: connection refused".to_string()),
        };

        let rendered = render(&report);
        assert!(rendered
            .lines()
            .last()
            .unwrap()
            .starts_with("| pipeline | ambiguous: database error"));
    }

    #[test]
    fn sheet_rows_render_like_any_other_check() {
        let report = DatasetReport {
            table: "boundaries.counties".to_string(),
            is_introduction: true,
            issue_number: 7,
            entries: vec![entry(
                CheckKind::Stewardship,
                CheckOutcome::Sheet(SheetOutcome::Row {
                    field_status: vec![
                        ("Description".to_string(), true),
                        ("Endpoint".to_string(), false),
                    ],
                }),
            )],
            error: None,
        };

        assert!(render(&report).contains("| stewardship sheet | ambiguous: blank fields: Endpoint |"));
    }

    #[test]
    fn target_issue_falls_back_when_no_check_completed() {
        let report = DatasetReport {
            table: "boundaries.counties".to_string(),
            is_introduction: true,
            issue_number: 11,
            entries: Vec::new(),
            error: Some("database error: timeout".to_string()),
        };

        assert_eq!(report.target_issue(), 11);
    }
}
