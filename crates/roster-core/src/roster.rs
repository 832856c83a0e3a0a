use crate::catalog::RoleCatalog;
use crate::project::{DirectoryLookup, TeamAssignment, DEFAULT_PHOTO_URL, UNASSIGNED};
use serde::{Deserialize, Serialize};

/// A selected team member as shown in the edit form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterMember {
    pub email: String,
    pub role: String,
    pub photo_url: String,
}

impl RosterMember {
    pub fn is_unassigned(&self) -> bool {
        self.role == UNASSIGNED
    }
}

/// Whether a toggle added or removed the member.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggled {
    Added,
    Removed,
}

/// Insertion-ordered set of team members keyed by email.
///
/// Role eligibility is not checked on [`TeamRoster::set_role`]; the roster is
/// brought back in line with the catalog by [`TeamRoster::reconcile_for_type`]
/// whenever the project type changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamRoster {
    members: Vec<RosterMember>,
    #[serde(skip, default = "default_photo")]
    default_photo: String,
}

fn default_photo() -> String {
    DEFAULT_PHOTO_URL.to_string()
}

impl Default for TeamRoster {
    fn default() -> Self {
        Self::new()
    }
}

impl TeamRoster {
    pub fn new() -> Self {
        Self::with_default_photo(DEFAULT_PHOTO_URL)
    }

    pub fn with_default_photo(url: impl Into<String>) -> Self {
        Self {
            members: Vec::new(),
            default_photo: url.into(),
        }
    }

    /// Replace the roster wholesale from stored team leads. Entries without an
    /// email are dropped and repeated emails keep their first occurrence.
    pub fn initialize_from<D>(&mut self, leads: &[TeamAssignment], directory: &D)
    where
        D: DirectoryLookup + ?Sized,
    {
        self.members.clear();
        for lead in leads {
            if lead.email.trim().is_empty() || self.contains(&lead.email) {
                continue;
            }
            let role = if lead.role.is_empty() {
                UNASSIGNED.to_string()
            } else {
                lead.role.clone()
            };
            self.members.push(RosterMember {
                email: lead.email.clone(),
                role,
                photo_url: directory.photo_url_or(&lead.email, &self.default_photo),
            });
        }
    }

    /// Remove `email` if selected, otherwise append it as unassigned.
    /// A blank email changes nothing and returns `None`.
    pub fn toggle<D>(&mut self, email: &str, directory: &D) -> Option<Toggled>
    where
        D: DirectoryLookup + ?Sized,
    {
        if email.trim().is_empty() {
            return None;
        }
        if let Some(pos) = self.position(email) {
            self.members.remove(pos);
            return Some(Toggled::Removed);
        }
        self.members.push(RosterMember {
            email: email.to_string(),
            role: UNASSIGNED.to_string(),
            photo_url: directory.photo_url_or(email, &self.default_photo),
        });
        Some(Toggled::Added)
    }

    /// Set the role for `email`. Returns false (and changes nothing) if the
    /// email is not on the roster.
    pub fn set_role(&mut self, email: &str, role: impl Into<String>) -> bool {
        match self.members.iter_mut().find(|m| m.email == email) {
            Some(member) => {
                member.role = role.into();
                true
            }
            None => false,
        }
    }

    /// Reset every role not eligible under `project_type` to unassigned.
    /// Membership and order are untouched. An unknown type has no eligible
    /// roles; an unset (or empty) type leaves every role as it is. Returns
    /// the emails whose role was reset.
    pub fn reconcile_for_type(
        &mut self,
        project_type: Option<&str>,
        catalog: &RoleCatalog,
    ) -> Vec<String> {
        let Some(project_type) = project_type.filter(|t| !t.is_empty()) else {
            return Vec::new();
        };
        let eligible = catalog.roles_or_empty(project_type);
        let mut reset = Vec::new();
        for member in &mut self.members {
            if member.is_unassigned() || eligible.iter().any(|r| *r == member.role) {
                continue;
            }
            member.role = UNASSIGNED.to_string();
            reset.push(member.email.clone());
        }
        reset
    }

    pub fn to_assignments(&self) -> Vec<TeamAssignment> {
        self.members
            .iter()
            .map(|m| TeamAssignment::new(m.email.clone(), m.role.clone()))
            .collect()
    }

    pub fn contains(&self, email: &str) -> bool {
        self.position(email).is_some()
    }

    pub fn get(&self, email: &str) -> Option<&RosterMember> {
        self.members.iter().find(|m| m.email == email)
    }

    pub fn members(&self) -> &[RosterMember] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    fn position(&self, email: &str) -> Option<usize> {
        self.members.iter().position(|m| m.email == email)
    }
}
