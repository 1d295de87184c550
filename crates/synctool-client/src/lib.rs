pub mod client;
pub mod error;
pub mod http;
pub mod images;
pub mod sync;

pub use client::Client;
pub use error::{ClientError, Result};
pub use http::{FetchedResponse, HttpFetch, ReqwestFetcher};
pub use images::{get_images, MediaConfig};
pub use sync::{sync_data, SyncOptions, SyncOutcome};
