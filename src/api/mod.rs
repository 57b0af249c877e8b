pub mod batch;
pub mod client;
pub mod cursor;
pub mod error;
pub mod memory;
pub mod types;


pub use batch::{BatchOutcome, BatchRequest};
pub use client::{AdsApi, ApiContext};
pub use cursor::CampaignCursor;
pub use error::ApiError;
pub use memory::{AccountSnapshot, MemoryApi, DEFAULT_MAX_BATCH_SIZE};
pub use types::*;
