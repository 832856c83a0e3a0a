use crate::error::{Result, RosterError};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// Directory constants
// ---------------------------------------------------------------------------

pub const ROSTER_DIR: &str = ".roster";
pub const COMPANIES_DIR: &str = ".roster/companies";
pub const CONFIG_FILE: &str = ".roster/config.yaml";

pub const PROJECTS_FILE: &str = "projects.yaml";
pub const EMPLOYEES_FILE: &str = "employees.yaml";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn roster_dir(root: &Path) -> PathBuf {
    root.join(ROSTER_DIR)
}

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

pub fn company_dir(root: &Path, company_id: &str) -> PathBuf {
    root.join(COMPANIES_DIR).join(company_id)
}

pub fn projects_path(root: &Path, company_id: &str) -> PathBuf {
    company_dir(root, company_id).join(PROJECTS_FILE)
}

pub fn employees_path(root: &Path, company_id: &str) -> PathBuf {
    company_dir(root, company_id).join(EMPLOYEES_FILE)
}

// ---------------------------------------------------------------------------
// Company id validation
// ---------------------------------------------------------------------------

static COMPANY_RE: OnceLock<Regex> = OnceLock::new();

fn company_re() -> &'static Regex {
    COMPANY_RE.get_or_init(|| Regex::new(r"^[a-z0-9][a-z0-9\-]*[a-z0-9]$|^[a-z0-9]$").unwrap())
}

/// Company ids become directory names, so they are restricted to slugs.
pub fn validate_company_id(id: &str) -> Result<()> {
    if id.is_empty() || id.len() > 64 || !company_re().is_match(id) {
        return Err(RosterError::InvalidCompanyId(id.to_string()));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
