use crate::config::SyncConfig;
use anyhow::Result;
use tracing::info;

pub fn execute(config: &SyncConfig, app: &str) -> Result<()> {
    let (db, registry) = config.open()?;

    for model in registry.models_for_app(app)? {
        info!("Resetting primary key sequence for {}", model.label());
        db.reset_sequence(&model)?;
    }

    println!("Reset primary key sequences for {}", app);
    Ok(())
}
