#![expect(clippy::unwrap_used)]
#![allow(dead_code)]

use anyhow::Result;
use axum::{
    extract::State,
    http::{header::AUTHORIZATION, HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json, Router,
};
use chrono::{DateTime, Duration, TimeZone, Utc};
use log::LevelFilter;
use serde_json::{json, Value};
use std::{
    collections::{HashMap, HashSet},
    sync::{Arc, Mutex, Once},
};
use tokio::{net::TcpListener, task::JoinHandle};
use url::form_urlencoded;
use wpcom_comments::{config::ClientConfig, ApiClient};

pub const SITE_ID: i64 = 1234;
pub const TOKEN: &str = "secret-token";
/// Comment with more likes than the API ever returns at once
pub const POPULAR_COMMENT: i64 = 42;
/// Comment with five likes, one per minute starting at [base_time]
pub const LIKED_COMMENT: i64 = 43;

pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
}

#[derive(Clone, Debug)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: HashMap<String, String>,
    pub form: HashMap<String, String>,
    pub auth: Option<String>,
}

#[derive(Clone, Debug)]
pub struct FakeComment {
    pub id: i64,
    pub post_id: i64,
    pub parent_id: Option<i64>,
    pub content: String,
    pub status: String,
    pub date: DateTime<Utc>,
    pub likes: Vec<FakeLike>,
    pub i_like: bool,
}

#[derive(Clone, Debug)]
pub struct FakeLike {
    pub user_id: i64,
    pub date: DateTime<Utc>,
}

#[derive(Default)]
pub struct FakeState {
    pub comments: Vec<FakeComment>,
    pub requests: Vec<RecordedRequest>,
    /// Respond to the next request with this status and body instead
    pub fail_next: Option<(u16, String)>,
    /// Return every like instead of honoring `number`
    pub ignore_like_number: bool,
    /// Attach new replies to the wrong parent
    pub misattach_replies: bool,
}

impl FakeState {
    /// Post 1 has three threads, in date order:
    /// 1, 2, 3 (reply to 1), 4 (reply to 2), 5 (reply to 3), 6 (reply to 1), 7.
    /// Post 2 has the two liked comments.
    fn seeded() -> Self {
        let t = base_time();
        let comment = |id, post_id, parent_id, minute| FakeComment {
            id,
            post_id,
            parent_id,
            content: format!("Comment {id}"),
            status: "approved".to_string(),
            date: t + Duration::minutes(minute),
            likes: vec![],
            i_like: false,
        };
        let mut comments = vec![
            comment(1, 1, None, 0),
            comment(2, 1, None, 1),
            comment(3, 1, Some(1), 2),
            comment(4, 1, Some(2), 3),
            comment(5, 1, Some(3), 4),
            comment(6, 1, Some(1), 5),
            comment(7, 1, None, 6),
            comment(POPULAR_COMMENT, 2, None, 7),
            comment(LIKED_COMMENT, 2, None, 8),
        ];
        comments[7].likes = (0..500)
            .map(|i| FakeLike {
                user_id: 1000 + i,
                date: t + Duration::minutes(i),
            })
            .collect();
        comments[8].likes = (0..5)
            .map(|i| FakeLike {
                user_id: 2000 + i,
                date: t + Duration::minutes(i),
            })
            .collect();
        Self {
            comments,
            ..Default::default()
        }
    }

    fn comment_mut(&mut self, id: i64) -> Option<&mut FakeComment> {
        self.comments.iter_mut().find(|c| c.id == id)
    }

    fn next_id(&self) -> i64 {
        self.comments.iter().map(|c| c.id).max().unwrap_or(0) + 1
    }
}

pub struct TestData {
    pub client: ApiClient,
    pub state: Arc<Mutex<FakeState>>,
    pub api_base: String,
    handle: JoinHandle<()>,
}

impl TestData {
    pub async fn start() -> Self {
        static INIT: Once = Once::new();
        INIT.call_once(|| {
            env_logger::builder()
                .filter_level(LevelFilter::Warn)
                .filter_module("wpcom_comments", LevelFilter::Info)
                .is_test(true)
                .init();
        });

        let state = Arc::new(Mutex::new(FakeState::seeded()));
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = Router::new().fallback(handle).with_state(state.clone());
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let api_base = format!("http://{addr}/rest/");
        let client = ApiClient::from_config(&Self::config(&api_base, Some(TOKEN))).unwrap();
        Self {
            client,
            state,
            api_base,
            handle,
        }
    }

    pub fn config(api_base: &str, token: Option<&str>) -> ClientConfig {
        ClientConfig {
            api_base: api_base.to_string(),
            site_id: SITE_ID,
            token: token.map(str::to_string),
            timeout_seconds: 5,
            ..Default::default()
        }
    }

    /// Client for the same fake server but without credentials
    pub fn anonymous_client(&self) -> ApiClient {
        ApiClient::from_config(&Self::config(&self.api_base, None)).unwrap()
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.lock().unwrap().requests.clone()
    }

    pub fn last_request(&self) -> RecordedRequest {
        self.requests().pop().unwrap()
    }

    pub fn comment(&self, id: i64) -> FakeComment {
        let state = self.state.lock().unwrap();
        state.comments.iter().find(|c| c.id == id).unwrap().clone()
    }

    pub fn stop(self) -> Result<()> {
        self.handle.abort();
        Ok(())
    }
}

fn parse_pairs(input: &str) -> HashMap<String, String> {
    form_urlencoded::parse(input.as_bytes())
        .into_owned()
        .collect()
}

fn error(status: StatusCode, code: &str, message: &str) -> Response {
    (status, Json(json!({"error": code, "message": message}))).into_response()
}

fn render_comment(c: &FakeComment) -> Value {
    json!({
        "ID": c.id,
        "post": {"ID": c.post_id, "title": format!("Post {}", c.post_id), "type": "post"},
        "author": {
            "ID": 7,
            "login": "alpha",
            "email": false,
            "name": "Alpha",
            "URL": "",
            "avatar_URL": "https://gravatar.example/alpha"
        },
        "date": c.date.to_rfc3339(),
        "URL": format!("https://example.blog/?p={}#comment-{}", c.post_id, c.id),
        "content": format!("<p>{}</p>\n", c.content),
        "raw_content": c.content,
        "status": c.status,
        "parent": match c.parent_id {
            Some(p) => json!({"ID": p, "type": "comment"}),
            None => json!(false),
        },
        "type": "comment",
        "like_count": c.likes.len() + usize::from(c.i_like),
        "i_like": c.i_like,
        "can_moderate": true,
    })
}

fn render_like(l: &FakeLike) -> Value {
    json!({
        "ID": l.user_id,
        "login": format!("user{}", l.user_id),
        "name": format!("User {}", l.user_id),
        "avatar_URL": format!("https://gravatar.example/{}", l.user_id),
        "URL": false,
        "site_ID": 0,
        "date_liked": l.date.to_rfc3339(),
    })
}

/// Plays the part of the REST API for a single site.
async fn handle(
    State(state): State<Arc<Mutex<FakeState>>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> Response {
    let query = parse_pairs(uri.query().unwrap_or_default());
    let form = parse_pairs(&body);
    let auth = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let mut state = state.lock().unwrap();
    state.requests.push(RecordedRequest {
        method: method.to_string(),
        path: uri.path().to_string(),
        query: query.clone(),
        form: form.clone(),
        auth: auth.clone(),
    });
    if let Some((status, body)) = state.fail_next.take() {
        return (StatusCode::from_u16(status).unwrap(), body).into_response();
    }

    let segments: Vec<&str> = uri.path().trim_matches('/').split('/').collect();
    let (version, route) = match segments.as_slice() {
        ["rest", version, "sites", site, route @ ..] => {
            if site.parse::<i64>() != Ok(SITE_ID) {
                return error(StatusCode::NOT_FOUND, "unknown_blog", "Unknown blog");
            }
            (*version, route)
        }
        _ => return error(StatusCode::NOT_FOUND, "rest_no_route", "No route"),
    };
    if method == Method::POST && auth != Some(format!("Bearer {TOKEN}")) {
        return error(
            StatusCode::FORBIDDEN,
            "unauthorized",
            "An active access token must be used",
        );
    }
    match (method.as_str(), version, route) {
        ("GET", "v1.1", ["posts", post, "replies"]) => {
            replies(&state, parse_id(post), &query)
        }
        ("POST", "v1.1", ["posts", post, "replies", "new"]) => {
            let post = parse_id(post);
            let parent = state.misattach_replies.then_some(1);
            create(&mut state, post, parent, &form)
        }
        ("POST", "v1.1", ["comments", parent, "replies", "new"]) => {
            let parent_id = parse_id(parent);
            let Some(parent) = state.comments.iter().find(|c| c.id == parent_id).cloned() else {
                return unknown_comment();
            };
            let parent_id = if state.misattach_replies {
                parent.parent_id
            } else {
                Some(parent.id)
            };
            create(&mut state, parent.post_id, parent_id, &form)
        }
        ("GET", "v1.1", ["comments"]) => {
            let number = query.get("number").map(|n| parse_id(n)).unwrap_or(20) as usize;
            let mut comments: Vec<&FakeComment> = state
                .comments
                .iter()
                .filter(|c| query.get("status").is_none_or(|s| *s == c.status))
                .collect();
            comments.sort_by(|a, b| b.date.cmp(&a.date));
            let found = comments.len();
            let comments: Vec<Value> = comments
                .into_iter()
                .take(number)
                .map(render_comment)
                .collect();
            Json(json!({"found": found, "comments": comments})).into_response()
        }
        ("GET", "v1.1", ["comments", comment]) => match state.comment_mut(parse_id(comment)) {
            Some(c) => Json(render_comment(c)).into_response(),
            None => unknown_comment(),
        },
        ("POST", "v1.1", ["comments", comment]) => {
            let Some(c) = state.comment_mut(parse_id(comment)) else {
                return unknown_comment();
            };
            if let Some(content) = form.get("content") {
                c.content = content.clone();
            }
            if let Some(status) = form.get("status") {
                c.status = status.clone();
            }
            Json(render_comment(c)).into_response()
        }
        ("POST", "v1.1", ["comments", comment, "delete"]) => {
            let Some(c) = state.comment_mut(parse_id(comment)) else {
                return unknown_comment();
            };
            c.status = "trash".to_string();
            Json(render_comment(c)).into_response()
        }
        ("POST", "v1.1", ["comments", comment, "likes", "new"]) => {
            set_liked(&mut state, parse_id(comment), true)
        }
        ("POST", "v1.1", ["comments", comment, "likes", "mine", "delete"]) => {
            set_liked(&mut state, parse_id(comment), false)
        }
        ("GET", "v1.2", ["comments", comment, "likes"]) => {
            let Some(c) = state.comments.iter().find(|c| c.id == parse_id(comment)) else {
                return unknown_comment();
            };
            // inclusive on purpose, the client has to drop likes at exactly `before`
            let before = query
                .get("before")
                .and_then(|b| DateTime::parse_from_rfc3339(b).ok())
                .map(|b| b.with_timezone(&Utc));
            let mut likes: Vec<&FakeLike> = c
                .likes
                .iter()
                .filter(|l| before.is_none_or(|b| l.date <= b))
                .collect();
            likes.sort_by(|a, b| b.date.cmp(&a.date));
            let found = likes.len();
            if !state.ignore_like_number {
                let number = query.get("number").map(|n| parse_id(n)).unwrap_or(90) as usize;
                likes.truncate(number);
            }
            let likes: Vec<Value> = likes.into_iter().map(render_like).collect();
            Json(json!({"found": found, "likes": likes})).into_response()
        }
        _ => error(StatusCode::NOT_FOUND, "rest_no_route", "No route"),
    }
}

fn parse_id(s: &str) -> i64 {
    s.parse().unwrap_or(-1)
}

fn unknown_comment() -> Response {
    error(StatusCode::NOT_FOUND, "unknown_comment", "Unknown comment")
}

/// Pages count top level comments, all their replies are included. Comments are returned in
/// date order, not nesting order.
fn replies(state: &FakeState, post_id: i64, query: &HashMap<String, String>) -> Response {
    let page = query.get("page").and_then(|p| p.parse::<usize>().ok()).unwrap_or(1);
    let number = query.get("number").and_then(|n| n.parse::<usize>().ok()).unwrap_or(20);
    let mut on_post: Vec<&FakeComment> = state
        .comments
        .iter()
        .filter(|c| c.post_id == post_id)
        .collect();
    on_post.sort_by_key(|c| c.date);
    let parents: Vec<i64> = on_post
        .iter()
        .filter(|c| c.parent_id.is_none())
        .map(|c| c.id)
        .collect();
    let found = parents.len();
    let mut included: HashSet<i64> = parents
        .into_iter()
        .skip((page.max(1) - 1) * number)
        .take(number)
        .collect();
    loop {
        let before = included.len();
        for c in &on_post {
            if c.parent_id.is_some_and(|p| included.contains(&p)) {
                included.insert(c.id);
            }
        }
        if included.len() == before {
            break;
        }
    }
    let comments: Vec<Value> = on_post
        .into_iter()
        .filter(|c| included.contains(&c.id))
        .map(render_comment)
        .collect();
    Json(json!({"found": found, "comments": comments})).into_response()
}

fn create(
    state: &mut FakeState,
    post_id: i64,
    parent_id: Option<i64>,
    form: &HashMap<String, String>,
) -> Response {
    let comment = FakeComment {
        id: state.next_id(),
        post_id,
        parent_id,
        content: form.get("content").cloned().unwrap_or_default(),
        status: "approved".to_string(),
        date: Utc::now(),
        likes: vec![],
        i_like: false,
    };
    let json = render_comment(&comment);
    state.comments.push(comment);
    (StatusCode::OK, Json(json)).into_response()
}

fn set_liked(state: &mut FakeState, comment_id: i64, liked: bool) -> Response {
    let Some(c) = state.comment_mut(comment_id) else {
        return unknown_comment();
    };
    c.i_like = liked;
    Json(json!({
        "success": true,
        "i_like": c.i_like,
        "like_count": c.likes.len() + usize::from(c.i_like),
    }))
    .into_response()
}
