// batch.rs - queued updates, each with its own completion callbacks
use super::client::AdsApi;
use super::error::ApiError;
use super::types::{CampaignUpdate, UpdateResponse};

pub type SuccessCallback<'a> = Box<dyn FnOnce(&UpdateResponse) + 'a>;
pub type FailureCallback<'a> = Box<dyn FnOnce(&ApiError) + 'a>;

struct Operation<'a> {
    update: CampaignUpdate,
    on_success: SuccessCallback<'a>,
    on_failure: FailureCallback<'a>,
}

/// Counts from one executed batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchOutcome {
    pub succeeded: usize,
    pub failed: usize,
}

/// Updates collected for a single remote call.
///
/// Callbacks are owned by their operation, so whatever a callback captures
/// at registration is what it sees when the batch completes.
#[derive(Default)]
pub struct BatchRequest<'a> {
    operations: Vec<Operation<'a>>,
}

impl<'a> BatchRequest<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            operations: Vec::with_capacity(capacity),
        }
    }

    pub fn add<S, F>(&mut self, update: CampaignUpdate, on_success: S, on_failure: F)
    where
        S: FnOnce(&UpdateResponse) + 'a,
        F: FnOnce(&ApiError) + 'a,
    {
        self.operations.push(Operation {
            update,
            on_success: Box::new(on_success),
            on_failure: Box::new(on_failure),
        });
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Send every queued update in one call and dispatch per-operation results.
    ///
    /// A failed operation goes to its failure callback and the rest of the
    /// batch is still dispatched. If the response carries fewer results than
    /// operations, the operations left without one fail with
    /// `MalformedResponse`. Only a rejection of the batch as a whole is
    /// returned as `Err`, in which case no callback runs.
    pub fn execute<A: AdsApi + ?Sized>(self, api: &A) -> Result<BatchOutcome, ApiError> {
        if self.operations.is_empty() {
            return Ok(BatchOutcome::default());
        }

        let updates: Vec<CampaignUpdate> =
            self.operations.iter().map(|op| op.update.clone()).collect();
        let results = api.execute_batch(&updates)?;

        let expected = updates.len();
        let received = results.len();
        if received != expected {
            tracing::warn!(expected, received, "batch response size mismatch");
        }

        let mut results = results.into_iter();
        let mut outcome = BatchOutcome::default();
        for op in self.operations {
            let result = results.next().unwrap_or_else(|| {
                Err(ApiError::MalformedResponse(format!(
                    "expected {} batch results, got {}",
                    expected, received
                )))
            });
            match result {
                Ok(response) => {
                    outcome.succeeded += 1;
                    (op.on_success)(&response);
                }
                Err(err) => {
                    outcome.failed += 1;
                    (op.on_failure)(&err);
                }
            }
        }

        tracing::debug!(
            succeeded = outcome.succeeded,
            failed = outcome.failed,
            "batch executed"
        );
        Ok(outcome)
    }
}
