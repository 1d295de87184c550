use crate::config::SyncConfig;
use anyhow::{bail, Context, Result};
use std::net::SocketAddr;
use synctool_server::{Route, ServerContext};

pub fn execute(config: &SyncConfig, listen: Option<String>) -> Result<()> {
    if config.routes.is_empty() {
        bail!("No [[route]] entries in config; nothing to serve");
    }

    let (db, registry) = config.open()?;

    let mut route = Route::new(&config.api_token);
    for entry in &config.routes {
        route = route.app(&entry.path, &entry.app);
    }
    let router = route.into_router(ServerContext::new(db, registry));

    let listen = listen.unwrap_or_else(|| config.listen.clone());
    let addr: SocketAddr = listen
        .parse()
        .context(format!("Invalid listen address: {}", listen))?;

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(synctool_server::serve(addr, router))?;

    Ok(())
}
