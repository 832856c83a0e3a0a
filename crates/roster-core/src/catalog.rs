use crate::error::{Result, RosterError};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// The roles a single project type may staff.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleSet {
    pub project_type: String,
    pub roles: Vec<String>,
}

impl RoleSet {
    pub fn new(project_type: impl Into<String>, roles: &[&str]) -> Self {
        Self {
            project_type: project_type.into(),
            roles: roles.iter().map(|r| r.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogWarning {
    pub project_type: String,
    pub message: String,
}

/// Ordered mapping from project type to its eligible role labels.
///
/// Declaration order is kept so hosts can present types and roles in a
/// stable sequence. The catalog is immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleCatalog {
    sets: Vec<RoleSet>,
}

impl Default for RoleCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl RoleCatalog {
    pub fn new(sets: Vec<RoleSet>) -> Self {
        Self { sets }
    }

    pub fn builtin() -> Self {
        Self::new(vec![
            RoleSet::new(
                "Web Development",
                &[
                    "Frontend Developer",
                    "Backend Developer",
                    "Full Stack Developer",
                    "UI/UX Designer",
                ],
            ),
            RoleSet::new(
                "Mobile App",
                &[
                    "iOS Developer",
                    "Android Developer",
                    "Mobile UI Designer",
                    "QA Tester",
                ],
            ),
            RoleSet::new(
                "Data Analysis",
                &[
                    "Data Analyst",
                    "Data Engineer",
                    "Business Analyst",
                    "Data Scientist",
                ],
            ),
            RoleSet::new(
                "Research & Development",
                &[
                    "Research Scientist",
                    "Lab Technician",
                    "Project Coordinator",
                    "Technical Writer",
                ],
            ),
            RoleSet::new(
                "Marketing Campaign",
                &[
                    "Marketing Manager",
                    "Content Writer",
                    "SEO Specialist",
                    "Social Media Manager",
                ],
            ),
        ])
    }

    /// Roles for `project_type`, in declaration order.
    ///
    /// Projects may carry legacy free-form types, so callers usually treat
    /// [`RosterError::UnknownType`] as "no roles available" via
    /// [`RoleCatalog::roles_or_empty`].
    pub fn roles_for(&self, project_type: &str) -> Result<&[String]> {
        self.sets
            .iter()
            .find(|s| s.project_type == project_type)
            .map(|s| s.roles.as_slice())
            .ok_or_else(|| RosterError::UnknownType(project_type.to_string()))
    }

    pub fn roles_or_empty(&self, project_type: &str) -> &[String] {
        self.roles_for(project_type).unwrap_or(&[])
    }

    pub fn allows(&self, project_type: &str, role: &str) -> bool {
        self.roles_or_empty(project_type).iter().any(|r| r == role)
    }

    pub fn project_types(&self) -> impl Iterator<Item = &str> {
        self.sets.iter().map(|s| s.project_type.as_str())
    }

    pub fn sets(&self) -> &[RoleSet] {
        &self.sets
    }

    pub fn validate(&self) -> Vec<CatalogWarning> {
        let mut warnings = Vec::new();
        let mut seen_types = HashSet::new();

        for set in &self.sets {
            if set.project_type.trim().is_empty() {
                warnings.push(CatalogWarning {
                    project_type: set.project_type.clone(),
                    message: "project type name is blank".to_string(),
                });
            }
            if !seen_types.insert(set.project_type.as_str()) {
                warnings.push(CatalogWarning {
                    project_type: set.project_type.clone(),
                    message: "project type is declared more than once; later entries are ignored"
                        .to_string(),
                });
            }
            if set.roles.is_empty() {
                warnings.push(CatalogWarning {
                    project_type: set.project_type.clone(),
                    message: "no roles declared; every member will stay Unassigned".to_string(),
                });
            }
            let mut seen_roles = HashSet::new();
            for role in &set.roles {
                if !seen_roles.insert(role.as_str()) {
                    warnings.push(CatalogWarning {
                        project_type: set.project_type.clone(),
                        message: format!("role '{role}' is listed more than once"),
                    });
                }
                if role == crate::project::UNASSIGNED {
                    warnings.push(CatalogWarning {
                        project_type: set.project_type.clone(),
                        message: format!("role '{role}' collides with the unassigned sentinel"),
                    });
                }
            }
        }

        warnings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_roles_keep_declaration_order() {
        let catalog = RoleCatalog::builtin();
        let roles = catalog.roles_for("Mobile App").unwrap();
        assert_eq!(roles[0], "iOS Developer");
        assert_eq!(roles[3], "QA Tester");
        assert_eq!(catalog.project_types().count(), 5);
        assert_eq!(catalog.project_types().next(), Some("Web Development"));
    }

    #[test]
    fn unknown_type_is_an_error_but_has_an_empty_fallback() {
        let catalog = RoleCatalog::builtin();
        let err = catalog.roles_for("Underwater Basket Weaving").unwrap_err();
        assert!(matches!(err, RosterError::UnknownType(t) if t == "Underwater Basket Weaving"));
        assert!(catalog.roles_or_empty("Underwater Basket Weaving").is_empty());
        assert!(!catalog.allows("Underwater Basket Weaving", "Lab Technician"));
    }

    #[test]
    fn allows_is_scoped_to_type() {
        let catalog = RoleCatalog::builtin();
        assert!(catalog.allows("Data Analysis", "Data Engineer"));
        assert!(!catalog.allows("Web Development", "Data Engineer"));
    }

    #[test]
    fn builtin_catalog_is_clean() {
        assert!(RoleCatalog::builtin().validate().is_empty());
    }

    #[test]
    fn validate_flags_duplicates_and_empty_sets() {
        let catalog = RoleCatalog::new(vec![
            RoleSet::new("Ops", &["SRE", "SRE"]),
            RoleSet::new("Ops", &["DBA"]),
            RoleSet::new("Empty", &[]),
            RoleSet::new("Odd", &["Unassigned"]),
        ]);
        let warnings = catalog.validate();
        assert_eq!(warnings.len(), 4);
        assert!(warnings.iter().any(|w| w.message.contains("'SRE'")));
        assert!(warnings.iter().any(|w| w.message.contains("more than once;")));
        assert!(warnings.iter().any(|w| w.project_type == "Empty"));
        assert!(warnings.iter().any(|w| w.message.contains("sentinel")));
    }

    #[test]
    fn catalog_yaml_is_a_plain_list() {
        let yaml = "- project_type: Ops\n  roles: [SRE, DBA]\n";
        let catalog: RoleCatalog = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(catalog.roles_for("Ops").unwrap().len(), 2);
    }
}
