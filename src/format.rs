use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, Table};
use serde_json::Value;
use synctool_core::ModelDef;

#[derive(Debug, Clone, Copy, PartialEq, clap::ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

pub fn print_json(value: &Value) {
    println!("{}", serde_json::to_string_pretty(value).unwrap());
}

pub fn print_model_list(models: &[&ModelDef]) {
    if models.is_empty() {
        println!("No models registered.");
        return;
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_header(vec!["MODEL", "TABLE", "PK", "FIELDS", "IMAGE FIELDS"]);

    for model in models {
        let image_fields: Vec<&str> = model
            .image_fields()
            .map(|f| f.name.as_str())
            .collect();

        table.add_row(vec![
            model.label().to_string(),
            model.table.clone(),
            model.pk_column.clone(),
            model.fields.len().to_string(),
            if image_fields.is_empty() {
                "-".to_string()
            } else {
                image_fields.join(", ")
            },
        ]);
    }

    println!("{table}");
}
