//! One-shot notices carried on redirects.
//!
//! A redirect appends `?notice=<kind>&id=<id>`, plus `&name=<name>` for
//! deletions since the record is gone afterwards. The target page turns
//! that back into a user-visible message. Unknown kinds and unparseable
//! ids are ignored.

use serde::{Deserialize, Serialize};

use crate::domain::student::StudentId;

/// Severity of a notice, used as its CSS class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
}

impl NoticeLevel {
    pub const fn css_class(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

/// A rendered message shown at the top of a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

/// What happened before the redirect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Added,
    Updated,
    Deleted,
    NotFound,
}

impl NoticeKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Added => "added",
            Self::Updated => "updated",
            Self::Deleted => "deleted",
            Self::NotFound => "not_found",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "added" => Some(Self::Added),
            "updated" => Some(Self::Updated),
            "deleted" => Some(Self::Deleted),
            "not_found" => Some(Self::NotFound),
            _ => None,
        }
    }

    /// Build the message. `name` is the affected student's name when it
    /// is still known.
    pub fn message(self, id: Option<StudentId>, name: Option<&str>) -> Notice {
        let who = match (name, id) {
            (Some(name), _) => name.to_string(),
            (None, Some(id)) => format!("#{id}"),
            (None, None) => String::new(),
        };
        match self {
            Self::Added => Notice::success(format!("Student {who} added successfully!")),
            Self::Updated => Notice::success(format!("Student {who} updated successfully!")),
            Self::Deleted => Notice::success(format!("Student {who} deleted successfully!")),
            Self::NotFound => Notice::error("Student not found!"),
        }
    }
}

/// Notice parameters shared by every page that can be redirected to.
///
/// Every field stays text so a hand-edited query never fails extraction.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NoticeQuery {
    pub notice: Option<String>,
    pub id: Option<String>,
    pub name: Option<String>,
}

impl NoticeQuery {
    pub fn kind(&self) -> Option<NoticeKind> {
        self.notice.as_deref().and_then(NoticeKind::parse)
    }

    pub fn id(&self) -> Option<StudentId> {
        self.id.as_deref().and_then(|raw| raw.trim().parse().ok())
    }

    pub fn name(&self) -> Option<&str> {
        self.name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }
}

#[derive(Serialize)]
struct NoticeParams<'a> {
    notice: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<StudentId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
}

/// Redirect target with a notice attached. `name` is percent-encoded.
pub fn with_notice(
    path: &str,
    kind: NoticeKind,
    id: Option<StudentId>,
    name: Option<&str>,
) -> String {
    let params = NoticeParams {
        notice: kind.as_str(),
        id,
        name,
    };
    // Flat strings and integers always encode; fall back to the bare kind.
    serde_urlencoded::to_string(&params).map_or_else(
        |_| format!("{path}?notice={}", kind.as_str()),
        |query| format!("{path}?{query}"),
    )
}
