use crate::catalog::RoleCatalog;
use crate::error::{Result, RosterError};
use crate::paths;
use crate::project::DEFAULT_PHOTO_URL;
use crate::session::{SessionSettings, DEFAULT_CLOSE_DELAY};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

// ---------------------------------------------------------------------------
// SessionConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// How long the success notice stays up before the edit form closes.
    #[serde(default = "default_close_delay_ms")]
    pub close_delay_ms: u64,
}

fn default_close_delay_ms() -> u64 {
    DEFAULT_CLOSE_DELAY.as_millis() as u64
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            close_delay_ms: default_close_delay_ms(),
        }
    }
}

// ---------------------------------------------------------------------------
// CompanyConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyConfig {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

// ---------------------------------------------------------------------------
// Config (top-level)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_version")]
    pub version: u32,
    pub company: CompanyConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default = "default_photo_url")]
    pub default_photo_url: String,
    #[serde(default)]
    pub role_catalog: RoleCatalog,
}

fn default_version() -> u32 {
    1
}

fn default_photo_url() -> String {
    DEFAULT_PHOTO_URL.to_string()
}

impl Config {
    pub fn new(company_id: impl Into<String>) -> Self {
        Self {
            version: 1,
            company: CompanyConfig {
                id: company_id.into(),
                name: None,
            },
            session: SessionConfig::default(),
            default_photo_url: default_photo_url(),
            role_catalog: RoleCatalog::builtin(),
        }
    }

    pub fn session_settings(&self) -> SessionSettings {
        SessionSettings {
            close_delay: Duration::from_millis(self.session.close_delay_ms),
            default_photo_url: self.default_photo_url.clone(),
        }
    }

    pub fn load(root: &Path) -> Result<Self> {
        let path = paths::config_path(root);
        if !path.exists() {
            return Err(RosterError::NotInitialized);
        }
        let data = std::fs::read_to_string(&path)?;
        let cfg: Config = serde_yaml::from_str(&data)?;
        Ok(cfg)
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let path = paths::config_path(root);
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(&path, data.as_bytes())
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();

        if let Err(e) = paths::validate_company_id(&self.company.id) {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: e.to_string(),
            });
        }

        if self.role_catalog.sets().is_empty() {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: "role_catalog is empty: no project type can be selected".to_string(),
            });
        }
        for w in self.role_catalog.validate() {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: format!("role_catalog '{}': {}", w.project_type, w.message),
            });
        }

        if self.session.close_delay_ms > 10_000 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: format!(
                    "session.close_delay_ms={} keeps the edit form locked for over 10s",
                    self.session.close_delay_ms
                ),
            });
        }

        if self.default_photo_url.trim().is_empty() {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: "default_photo_url is blank; members without a photo render nothing"
                    .to_string(),
            });
        }

        warnings
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
