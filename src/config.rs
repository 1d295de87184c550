use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use synctool_core::{Database, ModelSpec, Registry};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SyncConfig {
    /// Path of the local SQLite database.
    pub database: PathBuf,

    /// Directory downloaded media lands in.
    #[serde(default = "default_media_root")]
    pub media_root: PathBuf,

    /// Address the feed server binds.
    #[serde(default = "default_listen")]
    pub listen: String,

    /// Shared token; gates served routes and authenticates sync pulls.
    pub api_token: String,

    /// Base URL of the remote feed API (client side).
    #[serde(default)]
    pub api_url: Option<String>,

    /// Base URL remote media is fetched from (client side).
    #[serde(default)]
    pub media_url: Option<String>,

    #[serde(default, rename = "model")]
    pub models: Vec<ModelEntry>,

    #[serde(default, rename = "route")]
    pub routes: Vec<RouteEntry>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ModelEntry {
    pub app: String,
    pub name: String,
    #[serde(default)]
    pub table: Option<String>,
    #[serde(default)]
    pub image_fields: Vec<String>,
    #[serde(default)]
    pub json_fields: Vec<String>,
}

/// A full-app dump route served at `/<path>/`.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RouteEntry {
    pub path: String,
    pub app: String,
}

fn default_media_root() -> PathBuf {
    PathBuf::from("media")
}

fn default_listen() -> String {
    "127.0.0.1:8000".to_string()
}

impl SyncConfig {
    pub fn load(path: Option<PathBuf>) -> Result<Self> {
        let config_path = match path {
            Some(path) => path,
            None => Self::default_path()?,
        };

        let contents = fs::read_to_string(&config_path)
            .context(format!("Failed to read config file: {}", config_path.display()))?;
        toml::from_str(&contents)
            .context(format!("Failed to parse config file: {}", config_path.display()))
    }

    fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir().context("Failed to determine home directory")?;
        Ok(home.join(".synctool").join("config.toml"))
    }

    /// Opens the database and resolves every declared model against it.
    pub fn open(&self) -> Result<(Database, Registry)> {
        let db = Database::open(&self.database)
            .context(format!("Failed to open database: {}", self.database.display()))?;

        let mut registry = Registry::new();
        for entry in &self.models {
            let mut spec = ModelSpec::new(&entry.app, &entry.name);
            if let Some(table) = &entry.table {
                spec = spec.table(table);
            }
            for field in &entry.image_fields {
                spec = spec.image_field(field);
            }
            for field in &entry.json_fields {
                spec = spec.json_field(field);
            }

            let model = db
                .introspect(&spec)
                .context(format!("Failed to resolve model {}.{}", entry.app, entry.name))?;
            registry.register(model);
        }

        Ok((db, registry))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_config() {
        let config: SyncConfig = toml::from_str(
            r#"
            database = "local.db"
            api_token = "secret"
            "#,
        )
        .unwrap();

        assert_eq!(config.database, PathBuf::from("local.db"));
        assert_eq!(config.listen, "127.0.0.1:8000");
        assert!(config.models.is_empty());
        assert!(config.api_url.is_none());
    }

    #[test]
    fn test_parse_models_and_routes() {
        let config: SyncConfig = toml::from_str(
            r#"
            database = "local.db"
            api_token = "secret"
            api_url = "https://example.com/api/"
            media_url = "https://example.com/media/"

            [[model]]
            app = "blog"
            name = "post"
            image_fields = ["cover"]

            [[model]]
            app = "blog"
            name = "category"
            table = "categories"

            [[route]]
            path = "blogs"
            app = "blog"
            "#,
        )
        .unwrap();

        assert_eq!(config.models.len(), 2);
        assert_eq!(config.models[0].image_fields, vec!["cover"]);
        assert_eq!(config.models[1].table.as_deref(), Some("categories"));
        assert_eq!(config.routes[0].path, "blogs");
    }

    #[test]
    fn test_open_resolves_models() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("local.db");
        {
            let db = Database::open(&db_path).unwrap();
            db.execute_batch(
                "CREATE TABLE blog_post (id INTEGER PRIMARY KEY AUTOINCREMENT, slug TEXT)",
            )
            .unwrap();
        }

        let config: SyncConfig = toml::from_str(&format!(
            r#"
            database = "{}"
            api_token = "secret"

            [[model]]
            app = "blog"
            name = "post"
            "#,
            db_path.display(),
        ))
        .unwrap();

        let (_db, registry) = config.open().unwrap();
        assert!(registry.get_str("blog.post").is_ok());
    }
}
