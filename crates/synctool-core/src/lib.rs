pub mod db;
pub mod error;
pub mod queryset;
pub mod schema;
pub mod serialize;

pub use db::{Database, SyncLogEntry};
pub use error::{Result, SyncError};
pub use queryset::Queryset;
pub use schema::{FieldDef, FieldKind, ModelDef, ModelSpec, Registry};
pub use serialize::serialize_querysets;
