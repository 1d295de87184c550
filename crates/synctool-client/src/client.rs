use crate::http::{HttpFetch, ReqwestFetcher};
use crate::images::{get_images, MediaConfig};
use crate::sync::{sync_data, SyncOptions, SyncOutcome};
use crate::{ClientError, Result};
use std::path::PathBuf;
use synctool_core::{Database, Queryset, Registry};

/// Operator-facing entry point: a configured endpoint plus the local
/// database the feed lands in.
///
/// # Example
///
/// ```no_run
/// use synctool_client::{Client, SyncOptions};
/// use synctool_core::{Database, Registry};
///
/// # fn run() -> synctool_client::Result<()> {
/// let db = Database::open(std::path::Path::new("local.db"))?;
/// let registry = Registry::new();
///
/// let client = Client::new(db, registry, "https://example.com/api/", "token")
///     .media("https://example.com/media/", "media");
/// client.sync("blogs", &SyncOptions::default())?;
/// # Ok(())
/// # }
/// ```
pub struct Client {
    api_token: String,
    api_url: String,
    media: Option<MediaConfig>,
    db: Database,
    registry: Registry,
    fetcher: Box<dyn HttpFetch>,
}

impl Client {
    pub fn new(
        db: Database,
        registry: Registry,
        api_url: impl Into<String>,
        api_token: impl Into<String>,
    ) -> Self {
        Self {
            api_token: api_token.into(),
            api_url: api_url.into(),
            media: None,
            db,
            registry,
            fetcher: Box::new(ReqwestFetcher::new()),
        }
    }

    /// Configures media downloads: the remote base URL and the local
    /// media root.
    pub fn media(mut self, base_url: impl Into<String>, root: impl Into<PathBuf>) -> Self {
        self.media = Some(MediaConfig::new(base_url, root));
        self
    }

    /// Substitutes the HTTP implementation. Tests use this to serve
    /// canned responses.
    pub fn with_fetcher(mut self, fetcher: Box<dyn HttpFetch>) -> Self {
        self.fetcher = fetcher;
        self
    }

    fn get_url(&self, path: &str) -> String {
        format!("{}{}/", self.api_url, path)
    }

    /// Pulls the feed at `path` and applies it locally.
    pub fn sync(&self, path: &str, options: &SyncOptions) -> Result<SyncOutcome> {
        sync_data(
            self.fetcher.as_ref(),
            &self.db,
            &self.registry,
            &self.get_url(path),
            &self.api_token,
            options,
            self.media.as_ref(),
        )
    }

    /// Downloads missing images for one queryset field.
    pub fn images(&self, queryset: &Queryset, field: &str) -> Result<u64> {
        let media = self.media.as_ref().ok_or(ClientError::NoMediaConfig)?;
        get_images(
            self.fetcher.as_ref(),
            &self.db,
            &self.registry,
            media,
            queryset,
            field,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_url_joins_path_with_trailing_slash() {
        let db = Database::open_in_memory().unwrap();
        let client = Client::new(db, Registry::new(), "https://example.com/api/", "token");
        assert_eq!(client.get_url("blogs"), "https://example.com/api/blogs/");
    }

    #[test]
    fn test_images_without_media_config_errors() {
        let db = Database::open_in_memory().unwrap();
        let client = Client::new(db, Registry::new(), "https://example.com/api/", "token");

        let qs = Queryset::all(synctool_models::ModelLabel::new("blog", "person"));
        let result = client.images(&qs, "photo");
        assert!(matches!(result, Err(ClientError::NoMediaConfig)));
    }
}
