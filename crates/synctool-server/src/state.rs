use std::sync::Arc;
use synctool_core::{Database, Registry};

/// Shared state handed to every feed handler.
#[derive(Clone)]
pub struct ServerContext {
    pub db: Database,
    pub registry: Arc<Registry>,
}

impl ServerContext {
    pub fn new(db: Database, registry: Registry) -> Self {
        Self {
            db,
            registry: Arc::new(registry),
        }
    }
}
