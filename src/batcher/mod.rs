pub mod error;
pub mod iter;
pub mod limit;

#[cfg(test)]
mod tests;

pub use error::BatchError;
pub use iter::{generate_batches, try_generate_batches, Batcher, Batches, TryBatches};
pub use limit::{BatchLimit, DEFAULT_BATCH_LIMIT};
