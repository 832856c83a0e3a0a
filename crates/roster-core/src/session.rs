//! Edit session for a single project.
//!
//! ```text
//!            open                begin_submit (valid)
//! Closed ───────────▶ Open ─────────────────────────▶ Submitting
//!   ▲                  ▲ │                               │   │
//!   │                  │ └ begin_submit (invalid): stays │   │
//!   │                  └──────── update failed ──────────┘   │
//!   └──────────── finish after the display delay ────────────┘
//! ```
//!
//! `close` returns to `Closed` from any state. Every open and close issues a
//! fresh [`SessionToken`]; results or delayed closes carrying an older token
//! are ignored so they cannot touch a form that was discarded or replaced.

use crate::catalog::RoleCatalog;
use crate::error::{Result, RosterError};
use crate::notice::Notice;
use crate::project::{
    merge_update, DirectoryLookup, Project, ProjectUpdate, Viewer, DEFAULT_PHOTO_URL,
};
use crate::roster::{TeamRoster, Toggled};
use crate::store::ProjectStore;
use crate::validate::{self, Field, ValidationErrors};
use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

pub const DEFAULT_CLOSE_DELAY: Duration = Duration::from_millis(1500);

// ---------------------------------------------------------------------------
// SessionState
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Closed,
    Open,
    Submitting,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SessionState::Closed => "closed",
            SessionState::Open => "open",
            SessionState::Submitting => "submitting",
        };
        f.write_str(s)
    }
}

// ---------------------------------------------------------------------------
// EditFormState
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EditFormState {
    pub title: String,
    #[serde(rename = "type")]
    pub project_type: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub description: String,
    pub roster: TeamRoster,
}

impl EditFormState {
    pub fn from_project<D>(project: &Project, directory: &D, default_photo: &str) -> Self
    where
        D: DirectoryLookup + ?Sized,
    {
        let mut roster = TeamRoster::with_default_photo(default_photo);
        roster.initialize_from(&project.team_leads, directory);
        Self {
            title: project.title.clone(),
            project_type: non_empty(&project.project_type),
            start_date: project.start_date,
            end_date: project.end_date,
            description: project.description.clone(),
            roster,
        }
    }

    pub fn to_update(&self, project_id: &str) -> ProjectUpdate {
        ProjectUpdate {
            id: project_id.to_string(),
            title: self.title.clone(),
            project_type: self.project_type.clone().unwrap_or_default(),
            start_date: self.start_date,
            end_date: self.end_date,
            description: self.description.clone(),
            team_leads: self.roster.to_assignments(),
        }
    }
}

fn non_empty(s: &str) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

// ---------------------------------------------------------------------------
// Tokens, tickets, outcomes
// ---------------------------------------------------------------------------

/// Identifies one open/close cycle of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SessionToken(u64);

/// An update that passed validation and is waiting on the store.
#[derive(Debug, Clone)]
pub struct SubmitTicket {
    pub token: SessionToken,
    pub update: ProjectUpdate,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Validation failed; the session stays open with these errors.
    Invalid(ValidationErrors),
    /// The store accepted the update. Call [`ProjectEditSession::finish`]
    /// with `token` once `close_after` has elapsed.
    Updated {
        token: SessionToken,
        close_after: Duration,
        notice: Notice,
    },
    /// The store rejected the update; the form is kept for a retry.
    Failed,
    /// The session was closed or reopened while the update was in flight.
    Stale,
}

#[derive(Debug, Clone)]
pub struct SessionSettings {
    pub close_delay: Duration,
    pub default_photo_url: String,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            close_delay: DEFAULT_CLOSE_DELAY,
            default_photo_url: DEFAULT_PHOTO_URL.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// ProjectEditSession
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct ProjectEditSession {
    catalog: Arc<RoleCatalog>,
    settings: SessionSettings,
    state: SessionState,
    token: u64,
    project_id: Option<String>,
    form: Option<EditFormState>,
    errors: ValidationErrors,
    notice: Option<Notice>,
    close_pending: bool,
}

impl ProjectEditSession {
    pub fn new(catalog: Arc<RoleCatalog>, settings: SessionSettings) -> Self {
        Self {
            catalog,
            settings,
            state: SessionState::Closed,
            token: 0,
            project_id: None,
            form: None,
            errors: ValidationErrors::default(),
            notice: None,
            close_pending: false,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state != SessionState::Closed
    }

    pub fn is_busy(&self) -> bool {
        self.state == SessionState::Submitting
    }

    pub fn token(&self) -> SessionToken {
        SessionToken(self.token)
    }

    pub fn project_id(&self) -> Option<&str> {
        self.project_id.as_deref()
    }

    pub fn form(&self) -> Option<&EditFormState> {
        self.form.as_ref()
    }

    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn catalog(&self) -> &RoleCatalog {
        &self.catalog
    }

    /// Roles selectable for the current form type.
    pub fn role_options(&self) -> &[String] {
        self.form
            .as_ref()
            .and_then(|f| f.project_type.as_deref())
            .map(|t| self.catalog.roles_or_empty(t))
            .unwrap_or(&[])
    }

    // -----------------------------------------------------------------------
    // Lifecycle
    // -----------------------------------------------------------------------

    /// Open `project` for editing on behalf of `viewer`.
    ///
    /// Only admins and the project's creator may edit. On refusal the
    /// session is left exactly as it was.
    pub fn open<D>(&mut self, project: &Project, viewer: &Viewer, directory: &D) -> Result<SessionToken>
    where
        D: DirectoryLookup + ?Sized,
    {
        if !viewer.can_edit(project) {
            tracing::warn!(project = %project.id, user = %viewer.email, "edit refused");
            return Err(RosterError::PermissionDenied {
                project: project.id.clone(),
                user: viewer.email.clone(),
            });
        }
        if self.is_busy() {
            return Err(self.busy_error());
        }

        self.reset();
        let mut form =
            EditFormState::from_project(project, directory, &self.settings.default_photo_url);
        // The stored roles are checked against the stored type once on load.
        let reset = form
            .roster
            .reconcile_for_type(form.project_type.as_deref(), &self.catalog);
        if !reset.is_empty() {
            tracing::debug!(project = %project.id, ?reset, "stale roles unassigned on open");
        }

        self.project_id = Some(project.id.clone());
        self.form = Some(form);
        self.state = SessionState::Open;
        tracing::debug!(project = %project.id, token = self.token, "edit session opened");
        Ok(self.token())
    }

    /// Discard the form, errors and notices. Allowed from any state; an
    /// in-flight update keeps running but its result will be ignored.
    pub fn close(&mut self) {
        if self.state == SessionState::Submitting && !self.close_pending {
            tracing::debug!(project = ?self.project_id, "closing with an update in flight");
        }
        self.reset();
    }

    /// Close after a successful update, unless the session has moved on.
    pub fn finish(&mut self, token: SessionToken) -> bool {
        if token != self.token() || !self.close_pending {
            return false;
        }
        self.reset();
        true
    }

    fn reset(&mut self) {
        self.token += 1;
        self.state = SessionState::Closed;
        self.project_id = None;
        self.form = None;
        self.errors = ValidationErrors::default();
        self.notice = None;
        self.close_pending = false;
    }

    // -----------------------------------------------------------------------
    // Edits
    // -----------------------------------------------------------------------

    /// Change the project type and unassign members whose role the new type
    /// does not offer. Returns the emails that were unassigned.
    pub fn change_type(&mut self, project_type: Option<&str>) -> Result<Vec<String>> {
        let catalog = Arc::clone(&self.catalog);
        let form = self.form_mut()?;
        form.project_type = project_type.and_then(non_empty);
        let reset = form
            .roster
            .reconcile_for_type(form.project_type.as_deref(), &catalog);
        tracing::debug!(project_type = ?form.project_type, ?reset, "project type changed");
        Ok(reset)
    }

    pub fn toggle_member<D>(&mut self, email: &str, directory: &D) -> Result<Toggled>
    where
        D: DirectoryLookup + ?Sized,
    {
        let toggled = self
            .form_mut()?
            .roster
            .toggle(email, directory)
            .ok_or(RosterError::BlankEmail)?;
        self.errors.clear(Field::TeamMembers);
        Ok(toggled)
    }

    /// Returns false if `email` is not on the roster.
    pub fn set_member_role(&mut self, email: &str, role: &str) -> Result<bool> {
        Ok(self.form_mut()?.roster.set_role(email, role))
    }

    pub fn set_title(&mut self, title: impl Into<String>) -> Result<()> {
        self.form_mut()?.title = title.into();
        Ok(())
    }

    pub fn set_start_date(&mut self, date: Option<NaiveDate>) -> Result<()> {
        self.form_mut()?.start_date = date;
        Ok(())
    }

    pub fn set_end_date(&mut self, date: Option<NaiveDate>) -> Result<()> {
        self.form_mut()?.end_date = date;
        Ok(())
    }

    pub fn set_description(&mut self, description: impl Into<String>) -> Result<()> {
        self.form_mut()?.description = description.into();
        Ok(())
    }

    fn form_mut(&mut self) -> Result<&mut EditFormState> {
        match self.state {
            SessionState::Closed => Err(RosterError::SessionNotOpen),
            SessionState::Submitting => Err(self.busy_error()),
            SessionState::Open => self.form.as_mut().ok_or(RosterError::SessionNotOpen),
        }
    }

    fn busy_error(&self) -> RosterError {
        RosterError::SessionBusy(self.project_id.clone().unwrap_or_default())
    }

    // -----------------------------------------------------------------------
    // Submission
    // -----------------------------------------------------------------------

    /// Validate the form and, if it passes, move to `Submitting`.
    ///
    /// Returns `Ok(None)` when validation fails; the errors are then
    /// available from [`ProjectEditSession::errors`]. A second call while an
    /// update is in flight is rejected with [`RosterError::SessionBusy`].
    pub fn begin_submit(&mut self) -> Result<Option<SubmitTicket>> {
        let project_id = match (self.state, self.project_id.as_deref()) {
            (SessionState::Submitting, _) => return Err(self.busy_error()),
            (SessionState::Open, Some(id)) => id.to_string(),
            _ => return Err(RosterError::SessionNotOpen),
        };
        let form = self.form.as_ref().ok_or(RosterError::SessionNotOpen)?;

        self.errors = validate::validate(form);
        if !self.errors.is_valid() {
            tracing::debug!(project = %project_id, errors = self.errors.len(), "edit rejected by validation");
            return Ok(None);
        }

        let update = form.to_update(&project_id);
        self.state = SessionState::Submitting;
        self.notice = None;
        Ok(Some(SubmitTicket {
            token: self.token(),
            update,
        }))
    }

    /// Apply the store's answer to a ticket from [`begin_submit`].
    ///
    /// A success is merged into `projects` even when the ticket is stale,
    /// since the store already holds the new record.
    ///
    /// [`begin_submit`]: ProjectEditSession::begin_submit
    pub fn complete_submit(
        &mut self,
        ticket: SubmitTicket,
        result: Result<()>,
        projects: &mut [Project],
    ) -> SubmitOutcome {
        if result.is_ok() {
            merge_update(projects, &ticket.update);
        }

        let current = ticket.token == self.token() && self.state == SessionState::Submitting;
        if !current {
            tracing::debug!(project = %ticket.update.id, "discarding result for a closed session");
            return SubmitOutcome::Stale;
        }

        match result {
            Ok(()) => {
                tracing::info!(project = %ticket.update.id, "project updated");
                let notice = Notice::project_updated(&ticket.update.title);
                self.notice = Some(notice.clone());
                self.close_pending = true;
                SubmitOutcome::Updated {
                    token: ticket.token,
                    close_after: self.settings.close_delay,
                    notice,
                }
            }
            Err(e) => {
                tracing::warn!(project = %ticket.update.id, error = %e, "project update failed");
                self.notice = Some(Notice::update_failed());
                self.state = SessionState::Open;
                SubmitOutcome::Failed
            }
        }
    }

    /// Validate, send the update to `store` and apply the result.
    pub async fn submit<S>(
        &mut self,
        store: &S,
        company_id: &str,
        projects: &mut [Project],
    ) -> Result<SubmitOutcome>
    where
        S: ProjectStore + ?Sized,
    {
        let Some(ticket) = self.begin_submit()? else {
            return Ok(SubmitOutcome::Invalid(self.errors.clone()));
        };
        let result = store
            .update_project(company_id, &ticket.update.id, &ticket.update)
            .await;
        Ok(self.complete_submit(ticket, result, projects))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
