//! Host-facing facade over a company's project listing and its edit session.
//!
//! A host (UI, CLI) holds one [`ProjectBoard`], calls [`ProjectBoard::load`]
//! once, and then drives the caller operations: open, edit, submit, close
//! and page navigation. Everything a renderer needs is readable from the
//! board after each call.

use crate::catalog::RoleCatalog;
use crate::config::Config;
use crate::error::{Result, RosterError};
use crate::notice::Notice;
use crate::pager::PageState;
use crate::project::{EmployeeIndex, Project, Viewer};
use crate::roster::Toggled;
use crate::session::{ProjectEditSession, SubmitOutcome};
use crate::store::{EmployeeDirectory, ProjectStore};
use chrono::NaiveDate;
use std::sync::Arc;

#[derive(Debug)]
pub struct ProjectBoard {
    company_id: String,
    viewer: Viewer,
    projects: Vec<Project>,
    employees: EmployeeIndex,
    pager: PageState,
    session: ProjectEditSession,
    notice: Option<Notice>,
}

impl ProjectBoard {
    pub fn new(config: &Config, viewer: Viewer) -> Self {
        let catalog = Arc::new(config.role_catalog.clone());
        Self {
            company_id: config.company.id.clone(),
            viewer,
            projects: Vec::new(),
            employees: EmployeeIndex::default(),
            pager: PageState::new(),
            session: ProjectEditSession::new(catalog, config.session_settings()),
            notice: None,
        }
    }

    // -----------------------------------------------------------------------
    // Loading
    // -----------------------------------------------------------------------

    /// Fetch the viewer's projects and the employee directory.
    pub async fn load<S, D>(&mut self, store: &S, directory: &D) -> Result<()>
    where
        S: ProjectStore + ?Sized,
        D: EmployeeDirectory + ?Sized,
    {
        match self.fetch(store, directory).await {
            Ok(()) => {
                self.pager.clamp(self.projects.len());
                tracing::debug!(
                    company = %self.company_id,
                    projects = self.projects.len(),
                    employees = self.employees.len(),
                    "board loaded"
                );
                Ok(())
            }
            Err(e) => {
                tracing::warn!(company = %self.company_id, error = %e, "board load failed");
                self.notice = Some(Notice::fetch_failed(load_failure_message(&e)));
                Err(e)
            }
        }
    }

    async fn fetch<S, D>(&mut self, store: &S, directory: &D) -> Result<()>
    where
        S: ProjectStore + ?Sized,
        D: EmployeeDirectory + ?Sized,
    {
        if self.viewer.email.trim().is_empty() {
            return Err(RosterError::NotLoggedIn);
        }
        self.projects = store
            .fetch_projects(&self.company_id, &self.viewer.email, self.viewer.is_admin)
            .await?;
        self.employees = EmployeeIndex::new(directory.fetch_all(&self.company_id).await?);
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Read access
    // -----------------------------------------------------------------------

    pub fn company_id(&self) -> &str {
        &self.company_id
    }

    pub fn viewer(&self) -> &Viewer {
        &self.viewer
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn project(&self, id: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id)
    }

    pub fn employees(&self) -> &EmployeeIndex {
        &self.employees
    }

    pub fn catalog(&self) -> &RoleCatalog {
        self.session.catalog()
    }

    pub fn session(&self) -> &ProjectEditSession {
        &self.session
    }

    pub fn page_state(&self) -> PageState {
        self.pager
    }

    pub fn total_pages(&self) -> usize {
        self.pager.total_pages(self.projects.len())
    }

    /// Projects on the current page.
    pub fn visible(&self) -> &[Project] {
        self.pager.page(&self.projects)
    }

    /// Page-level notice (load failures, permission refusals).
    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    // -----------------------------------------------------------------------
    // Caller operations
    // -----------------------------------------------------------------------

    pub fn goto_page(&mut self, page: usize) -> bool {
        self.pager.goto(page, self.projects.len())
    }

    pub fn next_page(&mut self) -> bool {
        self.pager.next(self.projects.len())
    }

    pub fn previous_page(&mut self) -> bool {
        self.pager.previous(self.projects.len())
    }

    pub fn open_edit(&mut self, project_id: &str) -> Result<()> {
        let project = self
            .projects
            .iter()
            .find(|p| p.id == project_id)
            .ok_or_else(|| RosterError::ProjectNotFound(project_id.to_string()))?;
        match self.session.open(project, &self.viewer, &self.employees) {
            Ok(_) => Ok(()),
            Err(e @ RosterError::PermissionDenied { .. }) => {
                self.notice = Some(Notice::permission_denied());
                Err(e)
            }
            Err(e) => Err(e),
        }
    }

    pub fn change_type(&mut self, project_type: Option<&str>) -> Result<Vec<String>> {
        self.session.change_type(project_type)
    }

    pub fn toggle_member(&mut self, email: &str) -> Result<Toggled> {
        self.session.toggle_member(email, &self.employees)
    }

    pub fn set_member_role(&mut self, email: &str, role: &str) -> Result<bool> {
        self.session.set_member_role(email, role)
    }

    pub fn set_title(&mut self, title: impl Into<String>) -> Result<()> {
        self.session.set_title(title)
    }

    pub fn set_start_date(&mut self, date: Option<NaiveDate>) -> Result<()> {
        self.session.set_start_date(date)
    }

    pub fn set_end_date(&mut self, date: Option<NaiveDate>) -> Result<()> {
        self.session.set_end_date(date)
    }

    pub fn set_description(&mut self, description: impl Into<String>) -> Result<()> {
        self.session.set_description(description)
    }

    /// Submit the open edit. On success the listing is refreshed at once and
    /// the form closes after the configured display delay.
    pub async fn submit_edit<S>(&mut self, store: &S) -> Result<SubmitOutcome>
    where
        S: ProjectStore + ?Sized,
    {
        let outcome = self
            .session
            .submit(store, &self.company_id, &mut self.projects)
            .await?;
        if let SubmitOutcome::Updated {
            token, close_after, ..
        } = &outcome
        {
            self.pager.clamp(self.projects.len());
            tokio::time::sleep(*close_after).await;
            self.session.finish(*token);
        }
        Ok(outcome)
    }

    pub fn close_edit(&mut self) {
        self.session.close();
    }
}

/// Notice text for a failed load: the collaborator's own message when it
/// has one, a generic line otherwise.
fn load_failure_message(e: &RosterError) -> String {
    let message = match e {
        RosterError::NotLoggedIn => return "Please log in to view projects".to_string(),
        RosterError::Fetch(message) => message.clone(),
        other => other.to_string(),
    };
    if message.trim().is_empty() {
        "Unable to load project or employee list.".to_string()
    } else {
        message
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::{TeamAssignment, UNASSIGNED};
    use crate::session::SessionState;
    use crate::test_support::{employee, sample_project, MemoryStore};
    use crate::validate::Field;
    use std::time::Duration;

    fn many_projects(n: usize, owner: &str) -> Vec<Project> {
        (1..=n)
            .map(|i| sample_project(&format!("p{i}"), owner))
            .collect()
    }

    async fn loaded(store: &MemoryStore, viewer: Viewer) -> ProjectBoard {
        let mut board = ProjectBoard::new(&Config::new("acme"), viewer);
        board.load(store, store).await.unwrap();
        board
    }

    #[tokio::test]
    async fn load_requires_a_viewer_email() {
        let store = MemoryStore::new(many_projects(2, "ana@acme.io"));
        let mut board = ProjectBoard::new(&Config::new("acme"), Viewer::new("", false));
        let err = board.load(&store, &store).await.unwrap_err();
        assert!(matches!(err, RosterError::NotLoggedIn));
        let notice = board.notice().unwrap();
        assert_eq!(notice.header, "Fetch Failed");
        assert_eq!(notice.content, "Please log in to view projects");
    }

    #[tokio::test]
    async fn load_failure_is_reported() {
        let store = MemoryStore::new(many_projects(2, "ana@acme.io"));
        store.fail_fetches(true);
        let mut board = ProjectBoard::new(&Config::new("acme"), Viewer::new("ana@acme.io", false));
        assert!(board.load(&store, &store).await.is_err());
        let notice = board.notice().unwrap();
        assert_eq!(notice.header, "Fetch Failed");
        assert_eq!(notice.content, "connection reset");
        board.dismiss_notice();
        assert!(board.notice().is_none());
    }

    #[test]
    fn load_failure_without_message_uses_generic_text() {
        assert_eq!(
            load_failure_message(&RosterError::Fetch("  ".to_string())),
            "Unable to load project or employee list."
        );
        assert_eq!(
            load_failure_message(&RosterError::NotInitialized),
            "not initialized: run 'roster init'"
        );
    }

    #[tokio::test]
    async fn paging_over_thirteen_projects() {
        let store = MemoryStore::new(many_projects(13, "ana@acme.io"));
        let mut board = loaded(&store, Viewer::new("ana@acme.io", false)).await;
        assert_eq!(board.total_pages(), 3);
        assert_eq!(board.visible().len(), 6);

        assert!(board.goto_page(3));
        assert_eq!(board.visible().len(), 1);
        assert!(!board.goto_page(4));
        assert_eq!(board.page_state().current_page(), 3);
        assert!(board.previous_page());
        assert_eq!(board.page_state().current_page(), 2);
    }

    #[tokio::test]
    async fn non_owner_is_denied_with_notice() {
        let store = MemoryStore::new(vec![{
            let mut p = sample_project("p1", "ana@acme.io");
            p.team_leads.push(TeamAssignment::new("bo@acme.io", "Frontend Developer"));
            p
        }]);
        let mut board = loaded(&store, Viewer::new("bo@acme.io", false)).await;
        assert_eq!(board.projects().len(), 1);

        let err = board.open_edit("p1").unwrap_err();
        assert!(matches!(err, RosterError::PermissionDenied { .. }));
        assert_eq!(board.session().state(), SessionState::Closed);
        assert!(board.session().form().is_none());
        assert_eq!(board.notice().unwrap().header, "Permission Denied");
    }

    #[tokio::test]
    async fn unknown_project_id() {
        let store = MemoryStore::new(many_projects(1, "ana@acme.io"));
        let mut board = loaded(&store, Viewer::new("ana@acme.io", true)).await;
        assert!(matches!(
            board.open_edit("nope"),
            Err(RosterError::ProjectNotFound(id)) if id == "nope"
        ));
    }

    #[tokio::test]
    async fn toggle_uses_directory_photos() {
        let store = MemoryStore::new(many_projects(1, "ana@acme.io"))
            .with_employees(vec![employee("cy@acme.io", "cy")]);
        let mut board = loaded(&store, Viewer::new("ana@acme.io", false)).await;
        board.open_edit("p1").unwrap();
        board.toggle_member("cy@acme.io").unwrap();
        board.toggle_member("dee@acme.io").unwrap();

        let roster = &board.session().form().unwrap().roster;
        assert_eq!(roster.get("cy@acme.io").unwrap().photo_url, "/photos/cy.png");
        assert_eq!(roster.get("dee@acme.io").unwrap().photo_url, "/default-profile.png");
    }

    #[tokio::test(start_paused = true)]
    async fn full_edit_flow_updates_listing_and_closes_after_delay() {
        let store = MemoryStore::new(many_projects(3, "ana@acme.io"))
            .with_employees(vec![employee("cy@acme.io", "cy")]);
        let mut board = loaded(&store, Viewer::new("ana@acme.io", false)).await;

        board.open_edit("p2").unwrap();
        board.set_title("Hermes").unwrap();
        board.change_type(Some("Mobile App")).unwrap();
        board.toggle_member("cy@acme.io").unwrap();
        assert!(board.set_member_role("cy@acme.io", "QA Tester").unwrap());
        board
            .set_end_date(NaiveDate::from_ymd_opt(2025, 9, 30))
            .unwrap();

        let started = tokio::time::Instant::now();
        let outcome = board.submit_edit(&store).await.unwrap();
        assert!(matches!(outcome, SubmitOutcome::Updated { .. }));
        assert!(started.elapsed() >= Duration::from_millis(1500));

        assert_eq!(board.session().state(), SessionState::Closed);
        let p2 = board.project("p2").unwrap();
        assert_eq!(p2.title, "Hermes");
        assert_eq!(p2.project_type, "Mobile App");
        assert_eq!(
            p2.team_leads,
            vec![
                TeamAssignment::new("ana@acme.io", UNASSIGNED),
                TeamAssignment::new("cy@acme.io", "QA Tester"),
            ]
        );
        assert_eq!(store.stored()[1].title, "Hermes");
        assert_eq!(board.project("p1").unwrap().title, "Apollo");
    }

    #[tokio::test]
    async fn invalid_submit_keeps_session_open() {
        let store = MemoryStore::new(many_projects(1, "ana@acme.io"));
        let mut board = loaded(&store, Viewer::new("ana@acme.io", false)).await;
        board.open_edit("p1").unwrap();
        board.set_title("   ").unwrap();
        board.toggle_member("ana@acme.io").unwrap();

        let outcome = board.submit_edit(&store).await.unwrap();
        let SubmitOutcome::Invalid(errors) = outcome else {
            panic!("expected Invalid")
        };
        assert_eq!(errors.len(), 2);
        assert!(errors.get(Field::Title).is_some());
        assert!(errors.get(Field::TeamMembers).is_some());
        assert_eq!(store.update_calls(), 0);
        assert_eq!(board.session().state(), SessionState::Open);
    }

    #[tokio::test]
    async fn close_edit_discards_form() {
        let store = MemoryStore::new(many_projects(1, "ana@acme.io"));
        let mut board = loaded(&store, Viewer::new("ana@acme.io", false)).await;
        board.open_edit("p1").unwrap();
        board.set_description("scratch").unwrap();
        board.close_edit();
        assert!(board.session().form().is_none());
        assert!(matches!(
            board.set_description("again"),
            Err(RosterError::SessionNotOpen)
        ));
    }
}
