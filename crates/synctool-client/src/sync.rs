use crate::http::HttpFetch;
use crate::images::{get_images, MediaConfig};
use crate::{ClientError, Result};
use std::collections::BTreeSet;
use std::sync::Arc;
use synctool_core::{Database, ModelDef, Queryset, Registry, SyncError};
use synctool_models::SyncRecord;
use tracing::{error, info, warn};

/// Flags controlling one sync run.
#[derive(Debug, Clone)]
pub struct SyncOptions {
    /// Delete every local row of a model before re-inserting its feed
    /// records. Only models that actually appear in the feed are cleared.
    pub clean: bool,
    /// Reset AUTOINCREMENT counters for every app seen in the feed.
    pub reset: bool,
    /// Download images referenced by the synced models afterwards.
    pub images: bool,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            clean: false,
            reset: true,
            images: false,
        }
    }
}

/// What a sync run did.
#[derive(Debug, Clone)]
pub struct SyncOutcome {
    pub records: u64,
    pub images: u64,
}

/// Fetches the JSON feed at `url` and applies it to the local database.
///
/// A non-2xx feed response aborts the whole run; nothing is rolled back,
/// matching the one-pass apply. The outcome is appended to the sync
/// history on success.
pub fn sync_data(
    fetcher: &dyn HttpFetch,
    db: &Database,
    registry: &Registry,
    url: &str,
    api_token: &str,
    options: &SyncOptions,
    media: Option<&MediaConfig>,
) -> Result<SyncOutcome> {
    info!("Loading data from {}", url);
    let response = fetcher.get(url, Some(api_token))?;
    if !response.ok() {
        error!(
            status = response.status,
            body = %String::from_utf8_lossy(&response.body),
            "feed fetch failed",
        );
        return Err(ClientError::ServerStatus {
            status: response.status,
        });
    }

    let records: Vec<SyncRecord> = serde_json::from_slice(&response.body)?;

    info!("Saving data");

    let mut app_labels: BTreeSet<String> = BTreeSet::new();
    let mut seen: BTreeSet<String> = BTreeSet::new();
    let mut models: Vec<Arc<ModelDef>> = Vec::new();

    for record in &records {
        let label = record.label().map_err(SyncError::from)?;
        let model = registry.get(&label)?;

        app_labels.insert(model.app_label.clone());

        if seen.insert(record.model.clone()) {
            if options.clean {
                info!("Removing entries for model {}", record.model);
                db.delete_all(&model)?;
            }
            models.push(Arc::clone(&model));
        }

        db.save_record(&model, record)?;
    }

    if options.reset {
        for app_label in &app_labels {
            info!("Resetting primary key sequence for {}", app_label);
            for model in registry.models_for_app(app_label)? {
                db.reset_sequence(&model)?;
            }
        }
    }

    let mut images = 0;
    if options.images {
        match media {
            Some(media) => {
                for model in &models {
                    for field in model.image_fields() {
                        images += get_images(
                            fetcher,
                            db,
                            registry,
                            media,
                            &Queryset::all(model.label()),
                            &field.name,
                        )?;
                    }
                }
            }
            None => warn!("image sync requested but no media URL is configured"),
        }
    }

    db.record_sync(url, records.len() as u64)?;

    Ok(SyncOutcome {
        records: records.len() as u64,
        images,
    })
}

#[cfg(test)]
#[path = "sync_tests.rs"]
mod sync_tests;
