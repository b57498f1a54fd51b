use super::{
    wire::{ApiComment, ApiCommentList},
    ApiClient,
};
use crate::{
    common::{
        comment::{CommentStatus, GetCommentsParams, RemoteComment, SyncCommentsParams},
        newtypes::{CommentId, PostId},
        ApiVersion,
    },
    error::{CommentError, CommentResult, ErrorKind},
    hierarchy::order_by_nesting,
};
use chrono::{DateTime, Utc};
use log::debug;
use serde::Serialize;

#[derive(Serialize, Debug)]
struct RepliesQuery {
    order: &'static str,
    hierarchical: u8,
    page: u32,
    number: u32,
    force: &'static str,
}

#[derive(Serialize, Debug)]
struct CommentsQuery {
    number: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    status: Option<CommentStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    before: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    after: Option<DateTime<Utc>>,
    force: &'static str,
    context: &'static str,
}

#[derive(Serialize, Debug)]
struct EditContext {
    context: &'static str,
}

impl Default for EditContext {
    fn default() -> Self {
        Self { context: "edit" }
    }
}

#[derive(Serialize, Debug)]
struct ContentForm<'a> {
    content: &'a str,
    context: &'static str,
}

impl<'a> ContentForm<'a> {
    fn new(content: &'a str) -> CommentResult<Self> {
        if content.trim().is_empty() {
            return Err(CommentError::validation("Comment content must not be empty"));
        }
        Ok(Self {
            content,
            context: "edit",
        })
    }
}

#[derive(Serialize, Debug)]
struct StatusForm {
    status: CommentStatus,
    context: &'static str,
}

impl ApiClient {
    /// Fetch one page of comments for a post in nesting order: every comment is directly
    /// followed by all of its replies. Pagination counts top level comments only, so the result
    /// can be longer than `params.number`.
    pub async fn sync_hierarchical_comments(
        &self,
        post_id: PostId,
        params: &SyncCommentsParams,
    ) -> CommentResult<Vec<RemoteComment>> {
        if params.page == 0 {
            return Err(CommentError::validation("Page numbers start at 1"));
        }
        if params.number == 0 {
            return Err(CommentError::validation("Page size must not be zero"));
        }
        let query = RepliesQuery {
            order: "ASC",
            hierarchical: 1,
            page: params.page,
            number: params.number,
            force: "wpcom",
        };
        let list: ApiCommentList = self
            .get(
                ApiVersion::V1_1,
                &format!("posts/{post_id}/replies"),
                Some(query),
            )
            .await?;
        debug!(
            "Post {post_id} page {} returned {} comments, {} found",
            params.page,
            list.comments.len(),
            list.found
        );
        let comments = list.comments.into_iter().map(RemoteComment::from).collect();
        Ok(order_by_nesting(comments))
    }

    pub async fn update_comment(&self, comment_id: CommentId, content: &str) -> CommentResult<()> {
        let form = ContentForm::new(content)?;
        self.post_ack(ApiVersion::V1_1, &format!("comments/{comment_id}"), Some(form))
            .await
    }

    /// Add a top level comment to a post.
    pub async fn reply_to_post(
        &self,
        post_id: PostId,
        content: &str,
    ) -> CommentResult<RemoteComment> {
        let form = ContentForm::new(content)?;
        let reply: ApiComment = self
            .post(
                ApiVersion::V1_1,
                &format!("posts/{post_id}/replies/new"),
                Some(form),
            )
            .await?;
        let reply = RemoteComment::from(reply);
        if reply.post_id != post_id || reply.parent_id.is_some() {
            return Err(misattached(&reply, format!("post {post_id}")));
        }
        Ok(reply)
    }

    pub async fn reply_to_comment(
        &self,
        comment_id: CommentId,
        content: &str,
    ) -> CommentResult<RemoteComment> {
        let form = ContentForm::new(content)?;
        let reply: ApiComment = self
            .post(
                ApiVersion::V1_1,
                &format!("comments/{comment_id}/replies/new"),
                Some(form),
            )
            .await?;
        let reply = RemoteComment::from(reply);
        if reply.parent_id != Some(comment_id) {
            return Err(misattached(&reply, format!("comment {comment_id}")));
        }
        Ok(reply)
    }

    /// Reply to `parent_id` if given, otherwise add a top level comment to the post.
    pub async fn create_comment(
        &self,
        post_id: PostId,
        parent_id: Option<CommentId>,
        content: &str,
    ) -> CommentResult<RemoteComment> {
        match parent_id {
            Some(parent_id) => self.reply_to_comment(parent_id, content).await,
            None => self.reply_to_post(post_id, content).await,
        }
    }

    pub async fn moderate_comment(
        &self,
        comment_id: CommentId,
        status: CommentStatus,
    ) -> CommentResult<()> {
        if status == CommentStatus::Unknown {
            return Err(CommentError::validation(
                "Can't moderate a comment to an unknown status",
            ));
        }
        let form = StatusForm {
            status,
            context: "edit",
        };
        self.post_ack(ApiVersion::V1_1, &format!("comments/{comment_id}"), Some(form))
            .await
    }

    pub async fn trash_comment(&self, comment_id: CommentId) -> CommentResult<()> {
        self.post_ack(
            ApiVersion::V1_1,
            &format!("comments/{comment_id}/delete"),
            None::<()>,
        )
        .await
    }

    pub async fn get_comment(&self, comment_id: CommentId) -> CommentResult<RemoteComment> {
        let comment: ApiComment = self
            .get(
                ApiVersion::V1_1,
                &format!("comments/{comment_id}"),
                Some(EditContext::default()),
            )
            .await?;
        Ok(comment.into())
    }

    /// Latest comments across the whole site, newest first.
    pub async fn get_comments(
        &self,
        params: &GetCommentsParams,
    ) -> CommentResult<Vec<RemoteComment>> {
        if params.number == 0 {
            return Err(CommentError::validation("Comment count must not be zero"));
        }
        let query = CommentsQuery {
            number: params.number,
            status: params.status,
            before: params.before,
            after: params.after,
            force: "wpcom",
            context: "edit",
        };
        let list: ApiCommentList = self
            .get(ApiVersion::V1_1, "comments", Some(query))
            .await?;
        Ok(list.comments.into_iter().map(RemoteComment::from).collect())
    }
}

fn misattached(reply: &RemoteComment, target: String) -> CommentError {
    let parent = reply
        .parent_id
        .map(|p| format!("comment {p}"))
        .unwrap_or_else(|| "no parent".to_string());
    CommentError::new(
        ErrorKind::Server,
        format!(
            "Reply to {target} was created as comment {} on post {} with {parent}",
            reply.id, reply.post_id
        ),
    )
}
