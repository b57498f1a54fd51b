//! JSON shapes used by the REST API, converted into the types in [crate::common] right after
//! decoding.

use crate::common::{
    comment::{CommentAuthor, CommentStatus, RemoteComment},
    like::{PreferredBlog, RemoteLikeUser},
    newtypes::{CommentId, PostId, SiteId, UserId},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};

#[derive(Deserialize, Debug)]
pub(super) struct ApiErrorBody {
    #[serde(default)]
    pub error: String,
    pub message: String,
}

#[derive(Deserialize, Debug)]
pub(super) struct ApiCommentList {
    #[serde(default)]
    pub found: u32,
    pub comments: Vec<ApiComment>,
}

#[derive(Deserialize, Debug)]
pub(super) struct ApiComment {
    #[serde(rename = "ID")]
    id: CommentId,
    post: ApiPostRef,
    #[serde(default)]
    author: ApiAuthor,
    #[serde(default)]
    date: Option<DateTime<Utc>>,
    #[serde(rename = "URL", default)]
    url: Option<String>,
    #[serde(default)]
    content: String,
    #[serde(default)]
    raw_content: Option<String>,
    #[serde(default = "unknown_status")]
    status: CommentStatus,
    #[serde(default)]
    parent: Option<ApiParent>,
    #[serde(rename = "type", default)]
    comment_type: Option<String>,
    #[serde(default)]
    like_count: u32,
    #[serde(default)]
    i_like: bool,
    #[serde(default)]
    can_moderate: bool,
}

fn unknown_status() -> CommentStatus {
    CommentStatus::Unknown
}

#[derive(Deserialize, Debug)]
struct ApiPostRef {
    #[serde(rename = "ID")]
    id: PostId,
    #[serde(default)]
    title: Option<String>,
}

/// The API sends `false` for top level comments.
#[derive(Deserialize, Debug)]
#[serde(untagged)]
enum ApiParent {
    Comment {
        #[serde(rename = "ID")]
        id: CommentId,
    },
    TopLevel(bool),
}

#[derive(Deserialize, Debug, Default)]
struct ApiAuthor {
    #[serde(rename = "ID", default)]
    id: Option<UserId>,
    #[serde(default, deserialize_with = "string_or_false")]
    login: Option<String>,
    #[serde(default)]
    name: String,
    #[serde(default, deserialize_with = "string_or_false")]
    email: Option<String>,
    #[serde(rename = "URL", default, deserialize_with = "string_or_false")]
    url: Option<String>,
    #[serde(rename = "avatar_URL", default, deserialize_with = "string_or_false")]
    avatar_url: Option<String>,
}

/// Hidden or absent strings are sent as `false`, and sometimes as empty strings.
fn string_or_false<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrBool {
        String(String),
        Bool(bool),
    }
    Ok(
        match Option::<StringOrBool>::deserialize(deserializer)? {
            Some(StringOrBool::String(s)) if !s.is_empty() => Some(s),
            _ => None,
        },
    )
}

impl From<ApiComment> for RemoteComment {
    fn from(c: ApiComment) -> Self {
        let parent_id = match c.parent {
            Some(ApiParent::Comment { id }) => Some(id),
            Some(ApiParent::TopLevel(_)) | None => None,
        };
        RemoteComment {
            id: c.id,
            post_id: c.post.id,
            post_title: c.post.title,
            parent_id,
            author: CommentAuthor {
                // anonymous commenters have ID 0
                id: c.author.id.filter(|id| id.0 != 0),
                login: c.author.login,
                name: c.author.name,
                email: c.author.email,
                url: c.author.url,
                avatar_url: c.author.avatar_url,
            },
            content: c.content,
            raw_content: c.raw_content,
            status: c.status,
            published: c.date,
            link: c.url,
            comment_type: c.comment_type.unwrap_or_else(|| "comment".to_string()),
            like_count: c.like_count,
            liked: c.i_like,
            can_moderate: c.can_moderate,
        }
    }
}

#[derive(Deserialize, Debug)]
pub(super) struct ApiLikes {
    #[serde(default)]
    pub found: u32,
    pub likes: Vec<ApiLikeUser>,
}

#[derive(Deserialize, Debug)]
pub(super) struct ApiLikeUser {
    #[serde(rename = "ID")]
    id: UserId,
    #[serde(default)]
    login: String,
    #[serde(default)]
    name: String,
    #[serde(rename = "avatar_URL", default, deserialize_with = "string_or_false")]
    avatar_url: Option<String>,
    #[serde(rename = "URL", default, deserialize_with = "string_or_false")]
    url: Option<String>,
    #[serde(default, deserialize_with = "string_or_false")]
    bio: Option<String>,
    #[serde(default)]
    date_liked: Option<DateTime<Utc>>,
    #[serde(default)]
    preferred_blog: Option<ApiPreferredBlog>,
}

#[derive(Deserialize, Debug)]
struct ApiPreferredBlog {
    #[serde(rename = "ID")]
    id: SiteId,
    #[serde(default)]
    name: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    icon: Option<ApiBlogIcon>,
}

#[derive(Deserialize, Debug)]
struct ApiBlogIcon {
    #[serde(default)]
    img: Option<String>,
}

impl From<ApiLikeUser> for RemoteLikeUser {
    fn from(u: ApiLikeUser) -> Self {
        RemoteLikeUser {
            id: u.id,
            display_name: if u.name.is_empty() {
                u.login.clone()
            } else {
                u.name
            },
            username: u.login,
            avatar_url: u.avatar_url,
            profile_url: u.url,
            bio: u.bio,
            date_liked: u.date_liked,
            preferred_blog: u.preferred_blog.map(|b| PreferredBlog {
                id: b.id,
                name: b.name,
                url: b.url,
                icon_url: b.icon.and_then(|i| i.img),
            }),
        }
    }
}
