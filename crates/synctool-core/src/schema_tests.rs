#[cfg(test)]
mod tests {
    use super::super::*;
    use crate::Database;
    use synctool_models::ModelLabel;

    fn db_with_tables() -> Database {
        let db = Database::open_in_memory().unwrap();
        db.execute_batch(
            r#"
            CREATE TABLE blog_post (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                blog INTEGER NOT NULL,
                slug TEXT NOT NULL,
                cover TEXT,
                tags TEXT
            );
            CREATE TABLE blog_category (slug TEXT PRIMARY KEY);
            CREATE TABLE pair_key (a INTEGER, b INTEGER, PRIMARY KEY (a, b));
            "#,
        )
        .unwrap();
        db
    }

    #[test]
    fn test_introspect_columns_and_pk() {
        let db = db_with_tables();
        let model = db.introspect(&ModelSpec::new("blog", "post")).unwrap();

        assert_eq!(model.table, "blog_post");
        assert_eq!(model.pk_column, "id");
        let names: Vec<&str> = model.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["blog", "slug", "cover", "tags"]);
        assert!(model.fields.iter().all(|f| f.kind == FieldKind::Plain));
    }

    #[test]
    fn test_introspect_field_kinds() {
        let db = db_with_tables();
        let model = db
            .introspect(
                &ModelSpec::new("blog", "post")
                    .image_field("cover")
                    .json_field("tags"),
            )
            .unwrap();

        assert_eq!(model.field("cover").unwrap().kind, FieldKind::Image);
        assert_eq!(model.field("tags").unwrap().kind, FieldKind::Json);
        assert_eq!(model.field("slug").unwrap().kind, FieldKind::Plain);
        assert_eq!(model.image_fields().count(), 1);
    }

    #[test]
    fn test_introspect_text_pk() {
        let db = db_with_tables();
        let model = db.introspect(&ModelSpec::new("blog", "category")).unwrap();
        assert_eq!(model.pk_column, "slug");
        assert!(model.fields.is_empty());
    }

    #[test]
    fn test_introspect_missing_table() {
        let db = db_with_tables();
        let result = db.introspect(&ModelSpec::new("blog", "missing"));
        assert!(matches!(result, Err(SyncError::TableNotFound(_))));
    }

    #[test]
    fn test_introspect_composite_pk() {
        let db = db_with_tables();
        let result = db.introspect(&ModelSpec::new("pair", "key").table("pair_key"));
        assert!(matches!(
            result,
            Err(SyncError::CompositePrimaryKey { .. })
        ));
    }

    #[test]
    fn test_introspect_rejects_phantom_image_field() {
        let db = db_with_tables();
        let result = db.introspect(&ModelSpec::new("blog", "post").image_field("photo"));
        assert!(matches!(result, Err(SyncError::UnknownField { .. })));
    }

    #[test]
    fn test_spec_default_table_name() {
        let db = db_with_tables();
        // No explicit table: "<app>_<name>"
        let model = db.introspect(&ModelSpec::new("blog", "post")).unwrap();
        assert_eq!(model.table, "blog_post");
    }

    #[test]
    fn test_registry_lookup_and_order() {
        let db = db_with_tables();
        let mut registry = Registry::new();
        registry.register(db.introspect(&ModelSpec::new("blog", "category")).unwrap());
        registry.register(db.introspect(&ModelSpec::new("blog", "post")).unwrap());

        let post = registry.get_str("blog.post").unwrap();
        assert_eq!(post.table, "blog_post");

        let labels: Vec<String> = registry.models().map(|m| m.label().to_string()).collect();
        assert_eq!(labels, vec!["blog.category", "blog.post"]);

        let for_app = registry.models_for_app("blog").unwrap();
        assert_eq!(for_app.len(), 2);
        assert!(registry.models_for_app("shop").is_err());
        assert!(registry.get(&ModelLabel::new("blog", "missing")).is_err());
    }
}
