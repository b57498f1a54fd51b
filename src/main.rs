use anyhow::{anyhow, Result};
use log::LevelFilter;
use wpcom_comments::{
    common::{comment::SyncCommentsParams, newtypes::PostId},
    config::ClientConfig,
    ApiClient,
};

/// Prints one page of a post's comments in nesting order as json.
#[tokio::main]
pub async fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    if args.get(1).map(String::as_str) == Some("--print-config") {
        println!("{}", doku::to_toml::<ClientConfig>());
        std::process::exit(0);
    }

    env_logger::builder()
        .filter_level(LevelFilter::Warn)
        .filter_module("wpcom_comments", LevelFilter::Info)
        .init();

    let post_id = args
        .get(1)
        .ok_or_else(|| anyhow!("Usage: wpcom_comments <post_id> [page] | --print-config"))?;
    let params = SyncCommentsParams {
        page: args.get(2).map(|p| p.parse()).transpose()?.unwrap_or(1),
        ..Default::default()
    };

    let config = ClientConfig::read()?;
    let client = ApiClient::from_config(&config)?;
    let comments = client
        .sync_hierarchical_comments(PostId(post_id.parse()?), &params)
        .await?;
    println!("{}", serde_json::to_string_pretty(&comments)?);
    Ok(())
}
