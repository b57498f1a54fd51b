use super::newtypes::{CommentId, PostId, UserId};
use crate::error::CommentError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use smart_default::SmartDefault;
use std::{
    fmt::{Display, Formatter},
    str::FromStr,
};

/// Number of parent comments the replies endpoint returns per page unless told otherwise.
pub const DEFAULT_PARENTS_PER_PAGE: u32 = 20;

/// A comment as the server last reported it. Built fresh from every response.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct RemoteComment {
    pub id: CommentId,
    pub post_id: PostId,
    pub post_title: Option<String>,
    /// `None` for top level comments on the post
    pub parent_id: Option<CommentId>,
    pub author: CommentAuthor,
    /// Rendered html content
    pub content: String,
    /// Content as typed by the author, only present with edit context
    pub raw_content: Option<String>,
    pub status: CommentStatus,
    pub published: Option<DateTime<Utc>>,
    pub link: Option<String>,
    pub comment_type: String,
    pub like_count: u32,
    pub liked: bool,
    pub can_moderate: bool,
}

impl RemoteComment {
    pub fn is_parent(&self) -> bool {
        self.parent_id.is_none()
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Default)]
pub struct CommentAuthor {
    /// Anonymous commenters have no account
    pub id: Option<UserId>,
    pub login: Option<String>,
    pub name: String,
    pub email: Option<String>,
    pub url: Option<String>,
    pub avatar_url: Option<String>,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum CommentStatus {
    Approved,
    Unapproved,
    Spam,
    Trash,
    /// Any status this client doesn't know about. Can't be used for moderation.
    #[serde(other)]
    Unknown,
}

impl CommentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CommentStatus::Approved => "approved",
            CommentStatus::Unapproved => "unapproved",
            CommentStatus::Spam => "spam",
            CommentStatus::Trash => "trash",
            CommentStatus::Unknown => "unknown",
        }
    }
}

impl Display for CommentStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CommentStatus {
    type Err = CommentError;

    /// Accepts the REST names as well as the moderation verbs `approve` and `hold`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "approved" | "approve" => Ok(CommentStatus::Approved),
            "unapproved" | "hold" => Ok(CommentStatus::Unapproved),
            "spam" => Ok(CommentStatus::Spam),
            "trash" => Ok(CommentStatus::Trash),
            other => Err(CommentError::validation(format!(
                "Unknown comment status {other}"
            ))),
        }
    }
}

/// Pagination for hierarchical comment sync. Pages count parent comments only.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq, SmartDefault)]
pub struct SyncCommentsParams {
    /// First page is 1
    #[default(1)]
    pub page: u32,
    #[default(DEFAULT_PARENTS_PER_PAGE)]
    pub number: u32,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, SmartDefault)]
pub struct GetCommentsParams {
    #[default(100)]
    pub number: u32,
    pub status: Option<CommentStatus>,
    pub before: Option<DateTime<Utc>>,
    pub after: Option<DateTime<Utc>>,
}
