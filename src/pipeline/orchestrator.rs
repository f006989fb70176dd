//! Pipeline orchestration
//!
//! Classifies open tracking issues, extracts their conductor tags, and
//! dispatches the per-dataset checks in a fixed order. The registry lookup
//! is the hinge: its row supplies the display name and item id the later
//! checks key on, so a partial row narrows what can meaningfully run.

use tracing::{debug, info, warn};

use crate::checks::relational::normalize_mirror_name;
use crate::checks::{CheckKind, CheckOutcome, CheckSuite, RegistryOutcome};
use crate::error::ConductorResult;
use crate::github::{Issue, IssueTracker, MISSING_METADATA_LABEL};
use crate::identity::TableIdentity;
use crate::metadata::{self, IssueMetadata};
use crate::pipeline::report::{DatasetReport, ReportEntry};

/// A classified tracking issue
#[derive(Debug, Clone)]
pub struct ConductorIssue {
    pub issue: Issue,
    pub is_introduction: bool,
}

/// Sort open issues into introductions and deprecations.
///
/// Issues carrying `reminder` or `scheduled` are someone else's turn;
/// issues with neither lifecycle label are not conductor's business.
pub fn classify(issues: Vec<Issue>) -> Vec<ConductorIssue> {
    issues
        .into_iter()
        .filter_map(|issue| {
            if issue.has_label("reminder") || issue.has_label("scheduled") {
                return None;
            }

            if issue.has_label("introduction") {
                Some(ConductorIssue {
                    issue,
                    is_introduction: true,
                })
            } else if issue.has_label("deprecation") {
                Some(ConductorIssue {
                    issue,
                    is_introduction: false,
                })
            } else {
                None
            }
        })
        .collect()
}

/// Downstream checks permitted by the registry outcome, in dispatch order.
///
/// The mirror and open-data checks key on the published display name; the
/// web-item check keys on the item id. A check whose key is missing is
/// skipped, not failed. The stewardship check always runs.
pub fn plan_downstream(registry: &RegistryOutcome) -> Vec<CheckKind> {
    let mut plan = Vec::new();

    if registry.item_name().is_some() {
        plan.push(CheckKind::OpenMirror);
        plan.push(CheckKind::OpenData);
    }

    if registry.item_id().is_some() {
        plan.push(CheckKind::WebItem);
    }

    plan.push(CheckKind::Stewardship);
    plan
}

/// Drives the verification pipeline for one run
pub struct Orchestrator<'a, T: IssueTracker, C: CheckSuite> {
    tracker: &'a T,
    checks: &'a C,
}

impl<'a, T: IssueTracker, C: CheckSuite> Orchestrator<'a, T, C> {
    pub fn new(tracker: &'a T, checks: &'a C) -> Self {
        Self { tracker, checks }
    }

    /// Fetch, classify, and check every tracked dataset.
    ///
    /// Failures inside one dataset's checks are recorded on that dataset's
    /// report and do not stop the remaining datasets.
    pub async fn run(&self) -> ConductorResult<Vec<DatasetReport>> {
        let issues = self.tracker.open_issues().await?;
        info!("found {} open issues", issues.len());

        let mut reports = Vec::new();

        for conductor_issue in classify(issues) {
            let number = conductor_issue.issue.number;

            let Some(issue_metadata) = metadata::extract(conductor_issue.issue.body()) else {
                warn!("issue #{} has no parsable conductor tag", number);
                self.tracker
                    .add_label(number, MISSING_METADATA_LABEL)
                    .await?;
                continue;
            };

            let mut report = DatasetReport {
                table: issue_metadata.table.clone(),
                is_introduction: conductor_issue.is_introduction,
                issue_number: number,
                entries: Vec::new(),
                error: None,
            };

            if let Err(e) = self
                .check_dataset(&conductor_issue, &issue_metadata, &mut report)
                .await
            {
                warn!("checks for {} stopped early: {}", report.table, e);
                report.error = Some(e.to_string());
            }

            reports.push(report);
        }

        Ok(reports)
    }

    /// Run one dataset's checks in dispatch order, appending entries as
    /// they complete so a mid-dataset failure keeps what finished.
    async fn check_dataset(
        &self,
        conductor_issue: &ConductorIssue,
        issue_metadata: &IssueMetadata,
        report: &mut DatasetReport,
    ) -> ConductorResult<()> {
        let identity = TableIdentity::parse(&issue_metadata.table)?;
        let number = conductor_issue.issue.number;

        info!("checking dataset {} from issue #{}", identity, number);
        if let Some(when) = issue_metadata.when {
            // advisory only; conductor never waits for the scheduled date
            debug!("change is scheduled for {}", when);
        }

        let outcome = self.checks.internal_store(&identity).await?;
        report.entries.push(ReportEntry {
            check: CheckKind::InternalStore,
            issue_number: number,
            outcome,
        });

        let outcome = self.checks.public_mirror(&identity).await?;
        report.entries.push(ReportEntry {
            check: CheckKind::PublicMirror,
            issue_number: number,
            outcome,
        });

        let outcome = self.checks.registry(&identity.table).await?;
        let registry = match &outcome {
            CheckOutcome::Registry(registry) => registry.clone(),
            other => {
                warn!("registry check returned unexpected outcome {:?}", other);
                RegistryOutcome::Absent
            }
        };
        report.entries.push(ReportEntry {
            check: CheckKind::Registry,
            issue_number: number,
            outcome,
        });

        for check in plan_downstream(&registry) {
            let outcome = match check {
                CheckKind::OpenMirror => {
                    let Some(name) = registry.item_name() else {
                        continue;
                    };
                    let mirror_identity = TableIdentity {
                        database: None,
                        schema: identity.schema.clone(),
                        table: normalize_mirror_name(name),
                    };
                    self.checks.open_mirror(&mirror_identity).await?
                }
                CheckKind::OpenData => {
                    let Some(name) = registry.item_name() else {
                        continue;
                    };
                    self.checks.open_data(name).await?
                }
                CheckKind::WebItem => {
                    let Some(item_id) = registry.item_id() else {
                        continue;
                    };
                    self.checks.web_item(item_id).await?
                }
                CheckKind::Stewardship => self.checks.stewardship(&issue_metadata.table).await?,
                _ => continue,
            };

            report.entries.push(ReportEntry {
                check,
                issue_number: number,
                outcome,
            });
        }

        Ok(())
    }
}
