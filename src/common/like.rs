use super::newtypes::{SiteId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The likes endpoint never returns more than this many users, whatever count was requested.
pub const MAX_LIKES_PER_REQUEST: u32 = 90;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct RemoteLikeUser {
    pub id: UserId,
    pub username: String,
    pub display_name: String,
    pub avatar_url: Option<String>,
    pub profile_url: Option<String>,
    pub bio: Option<String>,
    pub date_liked: Option<DateTime<Utc>>,
    pub preferred_blog: Option<PreferredBlog>,
}

/// Blog the liking user chose to be represented by.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct PreferredBlog {
    pub id: SiteId,
    pub name: String,
    pub url: String,
    pub icon_url: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Default)]
pub struct CommentLikes {
    pub users: Vec<RemoteLikeUser>,
    /// Total likes the server reports, capped like the user list
    pub found: u32,
}
