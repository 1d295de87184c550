use crate::config::SyncConfig;
use anyhow::{Context, Result};
use synctool_client::{Client, SyncOptions};

pub fn execute(
    config: &SyncConfig,
    path: &str,
    clean: bool,
    no_reset: bool,
    images: bool,
) -> Result<()> {
    let api_url = config
        .api_url
        .as_deref()
        .context("api_url is not configured")?;

    let (db, registry) = config.open()?;

    let mut client = Client::new(db, registry, api_url, &config.api_token);
    if let Some(media_url) = &config.media_url {
        client = client.media(media_url, &config.media_root);
    }

    let options = SyncOptions {
        clean,
        reset: !no_reset,
        images,
    };
    let outcome = client.sync(path, &options)?;

    println!("Applied {} records from {}{}/", outcome.records, api_url, path);
    if images {
        println!("Downloaded {} images", outcome.images);
    }

    Ok(())
}
