use crate::session::EditFormState;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

// ---------------------------------------------------------------------------
// Field
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Field {
    #[serde(rename = "projectTitle")]
    Title,
    #[serde(rename = "projectType")]
    Type,
    #[serde(rename = "startDate")]
    StartDate,
    #[serde(rename = "endDate")]
    EndDate,
    #[serde(rename = "teamMembers")]
    TeamMembers,
}

impl Field {
    pub fn all() -> &'static [Field] {
        &[
            Field::Title,
            Field::Type,
            Field::StartDate,
            Field::EndDate,
            Field::TeamMembers,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Field::Title => "projectTitle",
            Field::Type => "projectType",
            Field::StartDate => "startDate",
            Field::EndDate => "endDate",
            Field::TeamMembers => "teamMembers",
        }
    }

    fn required_message(self) -> &'static str {
        match self {
            Field::Title => "Project title is required.",
            Field::Type => "Project type is required.",
            Field::StartDate => "Start date is required.",
            Field::EndDate => "End date is required.",
            Field::TeamMembers => "At least one team member is required.",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ValidationErrors
// ---------------------------------------------------------------------------

/// Field-keyed validation messages. Empty means the form is valid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<Field, String>);

impl ValidationErrors {
    pub fn is_valid(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn clear(&mut self, field: Field) {
        self.0.remove(&field);
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.0.iter().map(|(f, m)| (*f, m.as_str()))
    }

    fn require(&mut self, field: Field, ok: bool) {
        if !ok {
            self.0.insert(field, field.required_message().to_string());
        }
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Check an edit form before it is submitted. Every failing rule is
/// reported; nothing short-circuits. Start and end dates are not compared.
pub fn validate(form: &EditFormState) -> ValidationErrors {
    let mut errors = ValidationErrors::default();
    errors.require(Field::Title, !form.title.trim().is_empty());
    errors.require(
        Field::Type,
        form.project_type.as_deref().is_some_and(|t| !t.is_empty()),
    );
    errors.require(Field::StartDate, form.start_date.is_some());
    errors.require(Field::EndDate, form.end_date.is_some());
    errors.require(Field::TeamMembers, !form.roster.is_empty());
    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::{EmployeeIndex, TeamAssignment};
    use crate::roster::TeamRoster;
    use chrono::NaiveDate;

    fn complete_form() -> EditFormState {
        let mut roster = TeamRoster::new();
        roster.toggle("ana@acme.io", &EmployeeIndex::default());
        EditFormState {
            title: "Apollo".to_string(),
            project_type: Some("Web Development".to_string()),
            start_date: NaiveDate::from_ymd_opt(2025, 1, 1),
            end_date: NaiveDate::from_ymd_opt(2025, 2, 1),
            description: String::new(),
            roster,
        }
    }

    #[test]
    fn complete_form_is_valid() {
        assert!(validate(&complete_form()).is_valid());
    }

    #[test]
    fn empty_form_reports_every_field() {
        let form = EditFormState {
            title: "   ".to_string(),
            project_type: None,
            start_date: None,
            end_date: None,
            description: String::new(),
            roster: TeamRoster::new(),
        };
        let errors = validate(&form);
        assert_eq!(errors.len(), 5);
        for field in Field::all() {
            assert!(errors.get(*field).is_some(), "missing error for {field}");
        }
        assert_eq!(errors.get(Field::Title), Some("Project title is required."));
        assert_eq!(
            errors.get(Field::TeamMembers),
            Some("At least one team member is required.")
        );
    }

    #[test]
    fn blank_type_counts_as_unset() {
        let mut form = complete_form();
        form.project_type = Some(String::new());
        let errors = validate(&form);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get(Field::Type), Some("Project type is required."));
    }

    #[test]
    fn end_before_start_is_accepted() {
        let mut form = complete_form();
        form.start_date = NaiveDate::from_ymd_opt(2025, 12, 31);
        form.end_date = NaiveDate::from_ymd_opt(2025, 1, 1);
        assert!(validate(&form).is_valid());
    }

    #[test]
    fn roster_from_leads_drives_team_error() {
        let cases: [(&[TeamAssignment], bool); 3] = [
            (&[], true),
            (&[TeamAssignment::new("", "Backend Developer")], true),
            (&[TeamAssignment::new("bo@acme.io", "")], false),
        ];
        for (leads, expect_error) in cases {
            let mut form = complete_form();
            form.roster.initialize_from(leads, &EmployeeIndex::default());
            let errors = validate(&form);
            assert_eq!(errors.get(Field::TeamMembers).is_some(), expect_error);
        }
    }

    #[test]
    fn errors_serialize_with_form_keys() {
        let mut form = complete_form();
        form.title.clear();
        let json = serde_json::to_value(validate(&form)).unwrap();
        assert_eq!(json["projectTitle"], "Project title is required.");
    }
}
