pub mod images;
pub mod models;
pub mod reset_sequences;
pub mod serve;
pub mod sync;
