pub mod auth;
pub mod error;
pub mod routes;
pub mod server;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use routes::Route;
pub use server::serve;
pub use state::ServerContext;
