use crate::config::SyncConfig;
use anyhow::{Context, Result};
use synctool_client::Client;
use synctool_core::Queryset;
use synctool_models::ModelLabel;

pub fn execute(config: &SyncConfig, model: &str, field: &str) -> Result<()> {
    let label = ModelLabel::parse(model)?;
    let media_url = config
        .media_url
        .as_deref()
        .context("media_url is not configured")?;

    let (db, registry) = config.open()?;

    let api_url = config.api_url.clone().unwrap_or_default();
    let client = Client::new(db, registry, api_url, &config.api_token)
        .media(media_url, &config.media_root);

    let downloaded = client.images(&Queryset::all(label), field)?;
    println!("Downloaded {} images", downloaded);

    Ok(())
}
