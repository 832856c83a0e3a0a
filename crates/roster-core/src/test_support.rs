use crate::error::{Result, RosterError};
use crate::project::{merge_update, Employee, Project, ProjectUpdate, TeamAssignment};
use crate::store::{EmployeeDirectory, ProjectStore};
use async_trait::async_trait;
use chrono::NaiveDate;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

pub fn sample_project(id: &str, created_by: &str) -> Project {
    let mut project = Project::new(id, "Apollo", created_by);
    project.project_type = "Web Development".to_string();
    project.start_date = NaiveDate::from_ymd_opt(2025, 1, 6);
    project.end_date = NaiveDate::from_ymd_opt(2025, 3, 28);
    project.description = "Customer portal rebuild".to_string();
    project.team_leads = vec![TeamAssignment::new(created_by, "Backend Developer")];
    project
}

pub fn employee(email: &str, name: &str) -> Employee {
    Employee {
        email: email.to_string(),
        name: name.to_string(),
        photo_url: format!("/photos/{name}.png"),
        designation: "Engineer".to_string(),
    }
}

/// In-memory collaborator that records calls and can be told to fail.
#[derive(Default)]
pub struct MemoryStore {
    projects: Mutex<Vec<Project>>,
    employees: Vec<Employee>,
    update_calls: AtomicUsize,
    fail_updates: AtomicBool,
    fail_fetches: AtomicBool,
}

impl MemoryStore {
    pub fn new(projects: Vec<Project>) -> Self {
        Self {
            projects: Mutex::new(projects),
            ..Default::default()
        }
    }

    pub fn with_employees(mut self, employees: Vec<Employee>) -> Self {
        self.employees = employees;
        self
    }

    pub fn fail_updates(&self, fail: bool) {
        self.fail_updates.store(fail, Ordering::SeqCst);
    }

    pub fn fail_fetches(&self, fail: bool) {
        self.fail_fetches.store(fail, Ordering::SeqCst);
    }

    pub fn update_calls(&self) -> usize {
        self.update_calls.load(Ordering::SeqCst)
    }

    pub fn stored(&self) -> Vec<Project> {
        self.projects.lock().unwrap().clone()
    }
}

#[async_trait]
impl ProjectStore for MemoryStore {
    async fn fetch_projects(
        &self,
        _company_id: &str,
        requester_email: &str,
        is_admin: bool,
    ) -> Result<Vec<Project>> {
        if self.fail_fetches.load(Ordering::SeqCst) {
            return Err(RosterError::Fetch("connection reset".to_string()));
        }
        let projects = self.projects.lock().unwrap();
        Ok(projects
            .iter()
            .filter(|p| is_admin || p.created_by == requester_email || p.is_led_by(requester_email))
            .cloned()
            .collect())
    }

    async fn update_project(
        &self,
        _company_id: &str,
        _project_id: &str,
        update: &ProjectUpdate,
    ) -> Result<()> {
        self.update_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_updates.load(Ordering::SeqCst) {
            return Err(RosterError::Update("503 from upstream".to_string()));
        }
        merge_update(&mut self.projects.lock().unwrap(), update);
        Ok(())
    }
}

#[async_trait]
impl EmployeeDirectory for MemoryStore {
    async fn fetch_all(&self, _company_id: &str) -> Result<Vec<Employee>> {
        if self.fail_fetches.load(Ordering::SeqCst) {
            return Err(RosterError::Fetch("connection reset".to_string()));
        }
        Ok(self.employees.clone())
    }
}
