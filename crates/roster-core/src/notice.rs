use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Success,
    Error,
}

/// A dismissible message for the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub header: String,
    pub content: String,
}

const TITLE_PREVIEW_CHARS: usize = 30;

impl Notice {
    pub fn error(header: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            header: header.into(),
            content: content.into(),
        }
    }

    pub fn success(header: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            header: header.into(),
            content: content.into(),
        }
    }

    pub fn project_updated(title: &str) -> Self {
        Self::success(
            "Project updated!",
            format!(
                "Project \"{}\" has been updated successfully.",
                preview_title(title)
            ),
        )
    }

    pub fn update_failed() -> Self {
        Self::error(
            "Update Failed",
            "Something went wrong while updating the project.",
        )
    }

    pub fn permission_denied() -> Self {
        Self::error("Permission Denied", "You can only edit projects you created.")
    }

    pub fn fetch_failed(content: impl Into<String>) -> Self {
        Self::error("Fetch Failed", content)
    }

    pub fn is_error(&self) -> bool {
        self.level == NoticeLevel::Error
    }
}

fn preview_title(title: &str) -> String {
    let mut chars = title.chars();
    let head: String = chars.by_ref().take(TITLE_PREVIEW_CHARS).collect();
    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}
