use crate::config::SyncConfig;
use crate::format::{self, OutputFormat};
use anyhow::Result;
use serde_json::json;
use synctool_core::ModelDef;

pub fn execute(config: &SyncConfig, output_format: OutputFormat) -> Result<()> {
    let (_db, registry) = config.open()?;
    let models: Vec<_> = registry.models().collect();

    match output_format {
        OutputFormat::Json => {
            let entries: Vec<_> = models
                .iter()
                .map(|m| {
                    json!({
                        "model": m.label().to_string(),
                        "table": m.table,
                        "pk": m.pk_column,
                        "fields": m.fields.iter().map(|f| f.name.clone()).collect::<Vec<_>>(),
                        "image_fields": m.image_fields().map(|f| f.name.clone()).collect::<Vec<_>>(),
                    })
                })
                .collect();
            format::print_json(&json!(entries));
        }
        OutputFormat::Table => {
            let refs: Vec<&ModelDef> = models.iter().map(|m| m.as_ref()).collect();
            format::print_model_list(&refs);
        }
    }

    Ok(())
}
