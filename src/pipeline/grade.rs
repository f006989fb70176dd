//! Grading state machine
//!
//! Turns raw existence facts into verdicts conditioned on whether the
//! change is an introduction or a deprecation. For existence-style checks
//! the polarity inverts for deprecations (absence is the desired end
//! state); stewardship documentation is judged the same way in both
//! lifecycles.

use std::fmt;

use crate::checks::{CheckOutcome, RegistryOutcome, SheetOutcome};

/// Verdict for one check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Grade {
    Pass,
    Fail,
    /// Carries the detail string rendered in the report
    Ambiguous(String),
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Grade::Pass => write!(f, "pass"),
            Grade::Fail => write!(f, "fail"),
            Grade::Ambiguous(detail) => write!(f, "ambiguous: {}", detail),
        }
    }
}

/// Grade a single check outcome against the lifecycle expectation
pub fn grade(is_introduction: bool, outcome: &CheckOutcome) -> Grade {
    match outcome {
        CheckOutcome::Exists(exists) => grade_existence(is_introduction, *exists),

        CheckOutcome::Registry(registry) => match registry {
            RegistryOutcome::Present { .. } => grade_existence(is_introduction, true),
            RegistryOutcome::Absent => grade_existence(is_introduction, false),
            partial => Grade::Ambiguous(
                partial
                    .missing_reason()
                    .unwrap_or("incomplete registry row")
                    .to_string(),
            ),
        },

        CheckOutcome::Sheet(sheet) => match sheet {
            SheetOutcome::Invalid {
                duplicate: true,
                message,
            } => Grade::Ambiguous(message.clone()),
            SheetOutcome::Invalid {
                duplicate: false, ..
            } => Grade::Fail,
            SheetOutcome::Row { .. } if sheet.all_fields_present() => Grade::Pass,
            SheetOutcome::Row { field_status } => {
                let blank: Vec<&str> = field_status
                    .iter()
                    .filter(|(_, present)| !present)
                    .map(|(field, _)| field.as_str())
                    .collect();

                Grade::Ambiguous(format!("blank fields: {}", blank.join(", ")))
            }
        },
    }
}

/// An introduction expects presence, a deprecation expects absence
fn grade_existence(is_introduction: bool, exists: bool) -> Grade {
    if exists == is_introduction {
        Grade::Pass
    } else {
        Grade::Fail
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn existence_truth_table() {
        assert_eq!(grade(true, &CheckOutcome::Exists(true)), Grade::Pass);
        assert_eq!(grade(true, &CheckOutcome::Exists(false)), Grade::Fail);
        assert_eq!(grade(false, &CheckOutcome::Exists(true)), Grade::Fail);
        assert_eq!(grade(false, &CheckOutcome::Exists(false)), Grade::Pass);
    }

    #[test]
    fn registry_presence_follows_existence_polarity() {
        let present = CheckOutcome::Registry(RegistryOutcome::Present {
            item_id: "abc123".to_string(),
            item_name: "Utah Counties".to_string(),
        });
        let absent = CheckOutcome::Registry(RegistryOutcome::Absent);

        assert_eq!(grade(true, &present), Grade::Pass);
        assert_eq!(grade(false, &present), Grade::Fail);
        assert_eq!(grade(true, &absent), Grade::Fail);
        assert_eq!(grade(false, &absent), Grade::Pass);
    }

    #[test]
    fn partial_registry_rows_are_ambiguous_in_both_lifecycles() {
        let missing_id = CheckOutcome::Registry(RegistryOutcome::MissingItemId {
            item_name: "Utah Counties".to_string(),
        });
        let missing_name = CheckOutcome::Registry(RegistryOutcome::MissingItemName {
            item_id: "abc123".to_string(),
        });

        for is_introduction in [true, false] {
            assert_eq!(
                grade(is_introduction, &missing_id),
                Grade::Ambiguous("missing item id".to_string())
            );
            assert_eq!(
                grade(is_introduction, &missing_name),
                Grade::Ambiguous("missing item name".to_string())
            );
        }
    }

    #[test]
    fn sheet_grades_ignore_lifecycle() {
        let complete = CheckOutcome::Sheet(SheetOutcome::Row {
            field_status: vec![("Description".to_string(), true)],
        });
        let partial = CheckOutcome::Sheet(SheetOutcome::Row {
            field_status: vec![
                ("Description".to_string(), true),
                ("Endpoint".to_string(), false),
            ],
        });
        let missing = CheckOutcome::Sheet(SheetOutcome::Invalid {
            duplicate: false,
            message: "Did not find boundaries.counties in the worksheet".to_string(),
        });
        let duplicated = CheckOutcome::Sheet(SheetOutcome::Invalid {
            duplicate: true,
            message: "There are multiple items with this name on rows 2, 4.".to_string(),
        });

        for is_introduction in [true, false] {
            assert_eq!(grade(is_introduction, &complete), Grade::Pass);
            assert_eq!(
                grade(is_introduction, &partial),
                Grade::Ambiguous("blank fields: Endpoint".to_string())
            );
            assert_eq!(grade(is_introduction, &missing), Grade::Fail);
            assert!(matches!(
                grade(is_introduction, &duplicated),
                Grade::Ambiguous(_)
            ));
        }
    }

    #[test]
    fn display_carries_ambiguous_detail() {
        assert_eq!(Grade::Pass.to_string(), "pass");
        assert_eq!(Grade::Fail.to_string(), "fail");
        assert_eq!(
            Grade::Ambiguous("missing item id".to_string()).to_string(),
            "ambiguous: missing item id"
        );
    }
}
