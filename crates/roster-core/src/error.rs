use thiserror::Error;

#[derive(Debug, Error)]
pub enum RosterError {
    #[error("not initialized: run 'roster init'")]
    NotInitialized,

    #[error("please log in to view projects")]
    NotLoggedIn,

    #[error("invalid company id '{0}': must be lowercase alphanumeric with hyphens")]
    InvalidCompanyId(String),

    #[error("unknown project type: {0}")]
    UnknownType(String),

    #[error("project not found: {0}")]
    ProjectNotFound(String),

    #[error("permission denied: {user} cannot edit project '{project}'")]
    PermissionDenied { project: String, user: String },

    #[error("team member email must not be blank")]
    BlankEmail,

    #[error("no project is open for editing")]
    SessionNotOpen,

    #[error("an update for project '{0}' is already in flight")]
    SessionBusy(String),

    #[error("fetch failed: {0}")]
    Fetch(String),

    #[error("update failed: {0}")]
    Update(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, RosterError>;
