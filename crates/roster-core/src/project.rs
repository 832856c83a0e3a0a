use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Sentinel role for members without a catalog role.
pub const UNASSIGNED: &str = "Unassigned";

/// Placeholder photo used when an employee is missing from the directory.
pub const DEFAULT_PHOTO_URL: &str = "/default-profile.png";

// ---------------------------------------------------------------------------
// TeamAssignment
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamAssignment {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub role: String,
}

impl TeamAssignment {
    pub fn new(email: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            role: role.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Project
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(rename = "type", default)]
    pub project_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub team_leads: Vec<TeamAssignment>,
    #[serde(default)]
    pub created_by: String,
    /// Record fields this crate does not model (tasks, timestamps, ...).
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl Project {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        created_by: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            project_type: String::new(),
            start_date: None,
            end_date: None,
            description: String::new(),
            team_leads: Vec::new(),
            created_by: created_by.into(),
            extra: BTreeMap::new(),
        }
    }

    /// Number of entries in the record's `tasks` array, 0 if absent.
    pub fn task_count(&self) -> usize {
        self.extra
            .get("tasks")
            .and_then(|v| v.as_array())
            .map(|a| a.len())
            .unwrap_or(0)
    }

    /// Up to three lead emails for a card preview, skipping malformed entries.
    pub fn preview_leads(&self) -> Vec<&str> {
        self.team_leads
            .iter()
            .map(|lead| lead.email.as_str())
            .filter(|email| !email.is_empty())
            .take(3)
            .collect()
    }

    pub fn is_led_by(&self, email: &str) -> bool {
        self.team_leads.iter().any(|lead| lead.email == email)
    }
}

// ---------------------------------------------------------------------------
// ProjectUpdate
// ---------------------------------------------------------------------------

/// Payload sent to the store when an edit is submitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectUpdate {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub project_type: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub description: String,
    pub team_leads: Vec<TeamAssignment>,
}

impl ProjectUpdate {
    /// Overlay the edited fields onto `project`, keeping everything else.
    pub fn apply_to(&self, project: &mut Project) {
        project.title = self.title.clone();
        project.project_type = self.project_type.clone();
        project.start_date = self.start_date;
        project.end_date = self.end_date;
        project.description = self.description.clone();
        project.team_leads = self.team_leads.clone();
    }
}

/// Merge `update` into the matching project by id. Returns false if no
/// project carries that id.
pub fn merge_update(projects: &mut [Project], update: &ProjectUpdate) -> bool {
    match projects.iter_mut().find(|p| p.id == update.id) {
        Some(project) => {
            update.apply_to(project);
            true
        }
        None => false,
    }
}

// ---------------------------------------------------------------------------
// Employee directory
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub email: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub photo_url: String,
    #[serde(default)]
    pub designation: String,
}

/// Resolve an employee record by email.
pub trait DirectoryLookup {
    fn find(&self, email: &str) -> Option<&Employee>;

    /// Photo for `email`, or `fallback` when the employee is unknown or has
    /// no photo on file.
    fn photo_url_or(&self, email: &str, fallback: &str) -> String {
        self.find(email)
            .map(|e| e.photo_url.as_str())
            .filter(|url| !url.is_empty())
            .unwrap_or(fallback)
            .to_string()
    }
}

impl DirectoryLookup for [Employee] {
    fn find(&self, email: &str) -> Option<&Employee> {
        self.iter().find(|e| e.email == email)
    }
}

/// Email-keyed employee index built once per load.
#[derive(Debug, Clone, Default)]
pub struct EmployeeIndex {
    employees: Vec<Employee>,
    by_email: HashMap<String, usize>,
}

impl EmployeeIndex {
    pub fn new(employees: Vec<Employee>) -> Self {
        let mut by_email = HashMap::with_capacity(employees.len());
        for (i, employee) in employees.iter().enumerate() {
            by_email.entry(employee.email.clone()).or_insert(i);
        }
        Self {
            employees,
            by_email,
        }
    }

    pub fn all(&self) -> &[Employee] {
        &self.employees
    }

    pub fn len(&self) -> usize {
        self.employees.len()
    }

    pub fn is_empty(&self) -> bool {
        self.employees.is_empty()
    }
}

impl DirectoryLookup for EmployeeIndex {
    fn find(&self, email: &str) -> Option<&Employee> {
        self.by_email.get(email).map(|&i| &self.employees[i])
    }
}

// ---------------------------------------------------------------------------
// Viewer
// ---------------------------------------------------------------------------

/// The user operating the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Viewer {
    pub email: String,
    pub is_admin: bool,
}

impl Viewer {
    pub fn new(email: impl Into<String>, is_admin: bool) -> Self {
        Self {
            email: email.into(),
            is_admin,
        }
    }

    /// Admins edit anything; everyone else only what they created.
    pub fn can_edit(&self, project: &Project) -> bool {
        self.is_admin || project.created_by == self.email
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
