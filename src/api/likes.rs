use super::{wire::ApiLikes, ApiClient};
use crate::{
    common::{
        like::{CommentLikes, RemoteLikeUser, MAX_LIKES_PER_REQUEST},
        newtypes::CommentId,
        ApiVersion,
    },
    error::{CommentError, CommentResult},
};
use chrono::{DateTime, NaiveDateTime, Utc};
use log::{debug, warn};
use serde::Serialize;

#[derive(Serialize, Debug)]
struct LikesQuery<'a> {
    number: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    before: Option<&'a str>,
}

impl ApiClient {
    pub async fn like_comment(&self, comment_id: CommentId) -> CommentResult<()> {
        self.post_ack(
            ApiVersion::V1_1,
            &format!("comments/{comment_id}/likes/new"),
            None::<()>,
        )
        .await
    }

    pub async fn unlike_comment(&self, comment_id: CommentId) -> CommentResult<()> {
        self.post_ack(
            ApiVersion::V1_1,
            &format!("comments/{comment_id}/likes/mine/delete"),
            None::<()>,
        )
        .await
    }

    /// Users who liked a comment, most recent first. At most [MAX_LIKES_PER_REQUEST] users are
    /// returned regardless of `count`. With `before` only likes strictly earlier than that time
    /// are included.
    pub async fn get_comment_likes(
        &self,
        comment_id: CommentId,
        count: u32,
        before: Option<&str>,
    ) -> CommentResult<CommentLikes> {
        if count == 0 {
            return Err(CommentError::validation("Like count must not be zero"));
        }
        let number = count.min(MAX_LIKES_PER_REQUEST);
        let query = LikesQuery { number, before };
        let likes: ApiLikes = self
            .get(
                ApiVersion::V1_2,
                &format!("comments/{comment_id}/likes"),
                Some(query),
            )
            .await?;
        Ok(collect_likes(likes, number, before))
    }
}

/// Accepts RFC 3339, ISO 8601 with a `+0000` style offset, and `YYYY-MM-DD HH:MM:SS` with either
/// a space or `T` separator. Times without an offset are UTC.
fn parse_cursor(before: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(before)
        .or_else(|_| DateTime::parse_from_str(before, "%Y-%m-%dT%H:%M:%S%z"))
        .map(|d| d.with_timezone(&Utc))
        .or_else(|_| {
            NaiveDateTime::parse_from_str(before, "%Y-%m-%d %H:%M:%S").map(|n| n.and_utc())
        })
        .or_else(|_| {
            NaiveDateTime::parse_from_str(before, "%Y-%m-%dT%H:%M:%S").map(|n| n.and_utc())
        })
        .ok()
}

fn collect_likes(likes: ApiLikes, limit: u32, before: Option<&str>) -> CommentLikes {
    let cutoff = before.and_then(|b| {
        let cutoff = parse_cursor(b);
        if cutoff.is_none() {
            debug!("Can't parse likes cursor {b}, leaving filtering to the server");
        }
        cutoff
    });
    let received = likes.likes.len();
    let mut users: Vec<RemoteLikeUser> = likes
        .likes
        .into_iter()
        .map(RemoteLikeUser::from)
        .filter(|u| match (cutoff, u.date_liked) {
            (Some(cutoff), Some(date)) => date < cutoff,
            // undated likes can't be placed before the cursor
            (Some(_), None) => false,
            (None, _) => true,
        })
        .collect();
    let dropped = received - users.len();
    if dropped > 0 {
        warn!("Dropped {dropped} likes which are not before {before:?}");
    }
    if users.len() > limit as usize {
        warn!("Received {} likes but only {limit} were requested", users.len());
        users.truncate(limit as usize);
    }
    let found = likes
        .found
        .saturating_sub(u32::try_from(dropped).unwrap_or(u32::MAX))
        .min(MAX_LIKES_PER_REQUEST);
    CommentLikes { users, found }
}
