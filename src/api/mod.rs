use crate::{
    common::{newtypes::SiteId, ApiVersion},
    config::ClientConfig,
    error::{CommentError, CommentResult},
};
use http::{Method, StatusCode};
use log::{debug, info};
use serde::{de::DeserializeOwned, Serialize};
use std::{fmt::Debug, time::Duration};
use url::Url;

pub mod comment;
pub mod likes;
mod wire;

/// Client for the comment endpoints of a single site. Cloning is cheap, clones share the
/// connection pool.
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: reqwest::Client,
    api_base: Url,
    site_id: SiteId,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(client: reqwest::Client, config: &ClientConfig) -> CommentResult<Self> {
        let mut api_base = Url::parse(&config.api_base)?;
        if api_base.cannot_be_a_base() {
            return Err(CommentError::validation(format!(
                "Invalid api base {}",
                config.api_base
            )));
        }
        // otherwise joining replaces the last path segment
        if !api_base.path().ends_with('/') {
            let path = format!("{}/", api_base.path());
            api_base.set_path(&path);
        }
        Ok(Self {
            client,
            api_base,
            site_id: SiteId(config.site_id),
            token: config.token.clone(),
        })
    }

    pub fn from_config(config: &ClientConfig) -> CommentResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(&config.user_agent)
            .build()?;
        Self::new(client, config)
    }

    /// Same credentials and connection pool, different site.
    pub fn for_site(&self, site_id: SiteId) -> Self {
        Self {
            site_id,
            ..self.clone()
        }
    }

    pub fn site_id(&self) -> SiteId {
        self.site_id
    }

    async fn get<T, R>(
        &self,
        version: ApiVersion,
        endpoint: &str,
        query: Option<R>,
    ) -> CommentResult<T>
    where
        T: DeserializeOwned,
        R: Serialize + Debug,
    {
        let (status, text, url) = self.send(Method::GET, version, endpoint, query).await?;
        Self::response(status, text, &url)
    }

    async fn post<T, R>(
        &self,
        version: ApiVersion,
        endpoint: &str,
        form: Option<R>,
    ) -> CommentResult<T>
    where
        T: DeserializeOwned,
        R: Serialize + Debug,
    {
        let (status, text, url) = self.send(Method::POST, version, endpoint, form).await?;
        Self::response(status, text, &url)
    }

    /// Post where only acceptance matters, the response body is discarded.
    async fn post_ack<R>(
        &self,
        version: ApiVersion,
        endpoint: &str,
        form: Option<R>,
    ) -> CommentResult<()>
    where
        R: Serialize + Debug,
    {
        let (status, text, url) = self.send(Method::POST, version, endpoint, form).await?;
        if is_success(status) {
            Ok(())
        } else {
            Err(Self::api_error(status, text, &url))
        }
    }

    async fn send<P>(
        &self,
        method: Method,
        version: ApiVersion,
        path: &str,
        params: Option<P>,
    ) -> CommentResult<(u16, String, String)>
    where
        P: Serialize + Debug,
    {
        let endpoint = self.request_endpoint(version, path)?;
        debug!("{method} {endpoint} {params:?}");
        let mut req = self.client.request(method.clone(), endpoint);
        req = if method == Method::GET {
            req.query(&params)
        } else {
            req.form(&params)
        };
        if let Some(token) = &self.token {
            req = req.bearer_auth(token);
        }
        let res = req.send().await?;
        let status = res.status();
        let url = res.url().to_string();
        let text = res.text().await?;
        Ok((status.as_u16(), text, url))
    }

    fn response<T>(status: u16, text: String, url: &str) -> CommentResult<T>
    where
        T: DeserializeOwned,
    {
        if !is_success(status) {
            return Err(Self::api_error(status, text, url));
        }
        serde_json::from_str(&text).map_err(|e| {
            info!("Failed to deserialize api response: {e} from {text} on {url}");
            CommentError::from(e)
        })
    }

    fn api_error(status: u16, text: String, url: &str) -> CommentError {
        info!("API error: {text} on {url} status {status}");
        let message = match serde_json::from_str::<wire::ApiErrorBody>(&text) {
            Ok(body) if body.error.is_empty() => body.message,
            Ok(body) => format!("{}: {}", body.error, body.message),
            Err(_) => text,
        };
        CommentError::from_status(status, message)
    }

    fn request_endpoint(&self, version: ApiVersion, path: &str) -> CommentResult<Url> {
        Ok(self.api_base.join(&format!(
            "{}/sites/{}/{path}",
            version.as_str(),
            self.site_id
        ))?)
    }
}

fn is_success(status: u16) -> bool {
    StatusCode::from_u16(status).is_ok_and(|s| s.is_success())
}
