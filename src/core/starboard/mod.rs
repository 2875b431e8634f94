pub mod channel_ids;
pub mod starboard_models;
pub mod starboard_service;
pub mod starboard_store;

pub use channel_ids::parse_channel_ids;
pub use starboard_models::*;
pub use starboard_service::{thread_name, StarboardError, StarboardService};
pub use starboard_store::{StarboardStore, StoreError};
