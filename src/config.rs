use config::Config;
use doku::Document;
use serde::Deserialize;
use smart_default::SmartDefault;

#[derive(Debug, Deserialize, PartialEq, Eq, Clone, Document, SmartDefault)]
#[serde(default)]
#[serde(deny_unknown_fields)]
pub struct ClientConfig {
    /// Root of the REST API, the version segment is appended for each request
    #[default("https://public-api.wordpress.com/rest/")]
    #[doku(example = "https://public-api.wordpress.com/rest/")]
    pub api_base: String,
    /// Numeric ID of the site whose comments are accessed
    #[default(0)]
    #[doku(example = "123456")]
    pub site_id: i64,
    /// OAuth2 bearer token. Without it only public data can be read
    #[default(None)]
    #[doku(example = "abc123")]
    pub token: Option<String>,
    /// Timeout for each request
    #[default(30)]
    #[doku(example = "30")]
    pub timeout_seconds: u64,
    #[default(concat!("wpcom_comments/", env!("CARGO_PKG_VERSION")).to_string())]
    #[doku(example = "wpcom_comments/0.1.0")]
    pub user_agent: String,
}

impl ClientConfig {
    pub fn read() -> anyhow::Result<Self> {
        let config = Config::builder()
            .add_source(config::File::with_name("config.toml").required(false))
            // Cant use _ as separator due to https://github.com/mehcode/config-rs/issues/391
            .add_source(config::Environment::with_prefix("WPCOM_COMMENTS").separator("__"))
            .build()?;

        Ok(config.try_deserialize()?)
    }
}
