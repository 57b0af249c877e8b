// Public API exports
pub mod api;
pub mod batcher;
pub mod session;
pub mod workflow;

// Re-export main types for convenience
pub use batcher::{
    generate_batches, try_generate_batches, BatchError, BatchLimit, Batcher, Batches, TryBatches,
    DEFAULT_BATCH_LIMIT,
};

pub use session::{Session, SessionError, Settings};

pub use api::{
    AccountSnapshot, AdsApi, ApiContext, ApiError, BatchOutcome, BatchRequest, CampaignCursor,
    MemoryApi, RequestStats,
};

pub use workflow::{create_ad, pause_active_campaigns, AdPlan, CreatedAd, PauseReport};
