use crate::http::HttpFetch;
use crate::Result;
use serde_json::Value;
use std::fs;
use std::path::{Component, Path, PathBuf};
use synctool_core::{Database, Queryset, Registry, SyncError};
use tracing::{info, warn};

/// Where media lives: the remote base URL files are fetched from and the
/// local directory they are written under.
#[derive(Debug, Clone)]
pub struct MediaConfig {
    pub base_url: String,
    pub root: PathBuf,
}

impl MediaConfig {
    pub fn new(base_url: impl Into<String>, root: impl Into<PathBuf>) -> Self {
        Self {
            base_url: base_url.into(),
            root: root.into(),
        }
    }
}

/// Downloads every missing image referenced by `field` across the
/// queryset's rows. Returns the number of files written.
///
/// Per-image failures are logged and skipped; only transport errors and
/// local IO errors abort the walk.
pub fn get_images(
    fetcher: &dyn HttpFetch,
    db: &Database,
    registry: &Registry,
    media: &MediaConfig,
    queryset: &Queryset,
    field: &str,
) -> Result<u64> {
    let model = registry.get(&queryset.model)?;
    if model.field(field).is_none() {
        return Err(SyncError::UnknownField {
            model: model.label().to_string(),
            field: field.to_string(),
        }
        .into());
    }

    info!("Syncing images for {} {}", model.label(), field);

    let mut downloaded = 0;
    for record in db.query(&model, queryset)? {
        if let Some(Value::String(source)) = record.fields.get(field) {
            if download(fetcher, media, source)? {
                downloaded += 1;
            }
        }
    }

    Ok(downloaded)
}

/// Fetches one file into the media root. Returns whether a file was
/// written.
pub fn download(fetcher: &dyn HttpFetch, media: &MediaConfig, source: &str) -> Result<bool> {
    if source.is_empty() {
        return Ok(false);
    }

    // Field values name files relative to the media root; anything else
    // is a bad row, not a download target.
    if !is_safe_relative(Path::new(source)) {
        warn!("Refusing unsafe media path {}", source);
        return Ok(false);
    }

    let target = media.root.join(source);
    if target.exists() {
        return Ok(false);
    }

    if let Some(parent) = target.parent() {
        if !parent.is_dir() {
            fs::create_dir_all(parent)?;
        }
    }

    let endpoint = format!("{}{}", media.base_url, source);
    info!("Downloading {}", endpoint);

    let response = fetcher.get(&endpoint, None)?;
    if !response.ok() {
        warn!("{} response. Unable to download image.", response.status);
        return Ok(false);
    }

    fs::write(&target, &response.body)?;
    Ok(true)
}

fn is_safe_relative(path: &Path) -> bool {
    !path.is_absolute()
        && path
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}

#[cfg(test)]
#[path = "images_tests.rs"]
mod images_tests;
