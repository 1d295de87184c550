use crate::{Database, Queryset, Registry, Result};
use synctool_models::SyncRecord;

/// Flattens one or more querysets into a single ordered record stream.
///
/// Records keep queryset order, then primary-key order within each
/// queryset, so a feed built from `[categories, blogs]` always lists
/// every category before the first blog.
pub fn serialize_querysets(
    db: &Database,
    registry: &Registry,
    querysets: &[Queryset],
) -> Result<Vec<SyncRecord>> {
    let mut records = Vec::new();
    for queryset in querysets {
        let model = registry.get(&queryset.model)?;
        records.extend(db.query(&model, queryset)?);
    }
    Ok(records)
}
