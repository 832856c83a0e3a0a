//! Collaborator interfaces for project and employee data, plus a YAML
//! file-backed implementation used by the CLI.
//!
//! Layout under the workspace root:
//!
//! ```text
//! .roster/companies/<company>/projects.yaml   list of Project records
//! .roster/companies/<company>/employees.yaml  list of Employee records
//! ```

use crate::error::{Result, RosterError};
use crate::paths;
use crate::project::{merge_update, Employee, Project, ProjectUpdate};
use async_trait::async_trait;
use std::path::{Path, PathBuf};

#[async_trait]
pub trait ProjectStore: Send + Sync {
    /// Projects visible to `requester_email`. Admins see every project.
    async fn fetch_projects(
        &self,
        company_id: &str,
        requester_email: &str,
        is_admin: bool,
    ) -> Result<Vec<Project>>;

    async fn update_project(
        &self,
        company_id: &str,
        project_id: &str,
        update: &ProjectUpdate,
    ) -> Result<()>;
}

#[async_trait]
pub trait EmployeeDirectory: Send + Sync {
    async fn fetch_all(&self, company_id: &str) -> Result<Vec<Employee>>;
}

// ---------------------------------------------------------------------------
// YamlStore
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct YamlStore {
    root: PathBuf,
}

impl YamlStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn load_projects(&self, company_id: &str) -> Result<Vec<Project>> {
        paths::validate_company_id(company_id)?;
        read_list(&paths::projects_path(&self.root, company_id))
    }

    pub fn save_projects(&self, company_id: &str, projects: &[Project]) -> Result<()> {
        paths::validate_company_id(company_id)?;
        let data = serde_yaml::to_string(projects)?;
        crate::io::atomic_write(&paths::projects_path(&self.root, company_id), data.as_bytes())
    }

    pub fn load_employees(&self, company_id: &str) -> Result<Vec<Employee>> {
        paths::validate_company_id(company_id)?;
        read_list(&paths::employees_path(&self.root, company_id))
    }

    pub fn save_employees(&self, company_id: &str, employees: &[Employee]) -> Result<()> {
        paths::validate_company_id(company_id)?;
        let data = serde_yaml::to_string(employees)?;
        crate::io::atomic_write(&paths::employees_path(&self.root, company_id), data.as_bytes())
    }

    /// Create empty data files for `company_id`. Existing files are kept.
    pub fn init_company(&self, company_id: &str) -> Result<()> {
        paths::validate_company_id(company_id)?;
        crate::io::write_if_missing(&paths::projects_path(&self.root, company_id), b"[]\n")?;
        crate::io::write_if_missing(&paths::employees_path(&self.root, company_id), b"[]\n")?;
        Ok(())
    }
}

fn read_list<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    if !path.exists() {
        return Err(RosterError::NotInitialized);
    }
    let data = std::fs::read_to_string(path)?;
    if data.trim().is_empty() {
        return Ok(Vec::new());
    }
    Ok(serde_yaml::from_str(&data)?)
}

#[async_trait]
impl ProjectStore for YamlStore {
    async fn fetch_projects(
        &self,
        company_id: &str,
        requester_email: &str,
        is_admin: bool,
    ) -> Result<Vec<Project>> {
        let projects = self
            .load_projects(company_id)
            .map_err(|e| RosterError::Fetch(e.to_string()))?;
        if is_admin {
            return Ok(projects);
        }
        Ok(projects
            .into_iter()
            .filter(|p| p.created_by == requester_email || p.is_led_by(requester_email))
            .collect())
    }

    async fn update_project(
        &self,
        company_id: &str,
        project_id: &str,
        update: &ProjectUpdate,
    ) -> Result<()> {
        let mut projects = self
            .load_projects(company_id)
            .map_err(|e| RosterError::Update(e.to_string()))?;
        if update.id != project_id || !merge_update(&mut projects, update) {
            return Err(RosterError::Update(format!(
                "project '{project_id}' does not exist"
            )));
        }
        self.save_projects(company_id, &projects)
            .map_err(|e| RosterError::Update(e.to_string()))?;
        tracing::debug!(company = company_id, project = project_id, "project saved");
        Ok(())
    }
}

#[async_trait]
impl EmployeeDirectory for YamlStore {
    async fn fetch_all(&self, company_id: &str) -> Result<Vec<Employee>> {
        self.load_employees(company_id)
            .map_err(|e| RosterError::Fetch(e.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::TeamAssignment;
    use tempfile::TempDir;

    fn seeded() -> (YamlStore, TempDir) {
        let dir = TempDir::new().unwrap();
        let store = YamlStore::new(dir.path());
        store.init_company("acme").unwrap();

        let mut mine = Project::new("p1", "Mine", "ana@acme.io");
        mine.extra
            .insert("tasks".to_string(), serde_json::json!(["t1", "t2"]));
        let mut led = Project::new("p2", "Led", "root@acme.io");
        led.team_leads = vec![TeamAssignment::new("ana@acme.io", "QA Tester")];
        let other = Project::new("p3", "Other", "bo@acme.io");
        store.save_projects("acme", &[mine, led, other]).unwrap();
        (store, dir)
    }

    #[tokio::test]
    async fn admin_sees_everything() {
        let (store, _dir) = seeded();
        let projects = store.fetch_projects("acme", "root@acme.io", true).await.unwrap();
        assert_eq!(projects.len(), 3);
    }

    #[tokio::test]
    async fn non_admin_sees_created_and_led_projects() {
        let (store, _dir) = seeded();
        let projects = store.fetch_projects("acme", "ana@acme.io", false).await.unwrap();
        let ids: Vec<&str> = projects.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["p1", "p2"]);
    }

    #[tokio::test]
    async fn missing_company_is_a_fetch_error() {
        let (store, _dir) = seeded();
        let err = store.fetch_projects("globex", "a@b", true).await.unwrap_err();
        assert!(matches!(err, RosterError::Fetch(_)));
        let err = store.fetch_all("globex").await.unwrap_err();
        assert!(matches!(err, RosterError::Fetch(_)));
    }

    #[tokio::test]
    async fn update_persists_and_keeps_extra_fields() {
        let (store, _dir) = seeded();
        let update = ProjectUpdate {
            id: "p1".to_string(),
            title: "Renamed".to_string(),
            project_type: "Mobile App".to_string(),
            start_date: None,
            end_date: None,
            description: "d".to_string(),
            team_leads: vec![TeamAssignment::new("bo@acme.io", "QA Tester")],
        };
        store.update_project("acme", "p1", &update).await.unwrap();

        let projects = store.load_projects("acme").unwrap();
        assert_eq!(projects[0].title, "Renamed");
        assert_eq!(projects[0].created_by, "ana@acme.io");
        assert_eq!(projects[0].task_count(), 2);
    }

    #[tokio::test]
    async fn update_unknown_project_fails() {
        let (store, _dir) = seeded();
        let mut update = ProjectUpdate {
            id: "p9".to_string(),
            title: "x".to_string(),
            project_type: String::new(),
            start_date: None,
            end_date: None,
            description: String::new(),
            team_leads: Vec::new(),
        };
        let err = store.update_project("acme", "p9", &update).await.unwrap_err();
        assert!(matches!(err, RosterError::Update(_)));

        update.id = "p1".to_string();
        let err = store.update_project("acme", "p2", &update).await.unwrap_err();
        assert!(matches!(err, RosterError::Update(_)));
    }

    #[test]
    fn init_company_is_idempotent() {
        let (store, _dir) = seeded();
        store.init_company("acme").unwrap();
        assert_eq!(store.load_projects("acme").unwrap().len(), 3);
        assert!(store.load_employees("acme").unwrap().is_empty());
    }

    #[test]
    fn invalid_company_id_is_rejected_before_touching_disk() {
        let (store, _dir) = seeded();
        assert!(matches!(
            store.load_projects("../acme"),
            Err(RosterError::InvalidCompanyId(_))
        ));
    }
}
