use crate::api::{
    AdsApi, ApiContext, ApiError, BatchRequest, Campaign, CampaignQuery, CampaignUpdate, ObjectId,
};
use crate::batcher::{BatchLimit, Batcher};
use std::cell::RefCell;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PauseError {
    #[error("Failed to list active campaigns: {0}")]
    ListingFailed(#[source] ApiError),

    #[error("Batch {batch} was rejected: {source}")]
    BatchRejected {
        batch: usize,
        #[source]
        source: ApiError,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PauseFailure {
    pub campaign_id: ObjectId,
    pub name: String,
    pub error: ApiError,
}

/// What one pausing pass did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PauseReport {
    /// Names of campaigns paused, in listing order
    pub paused: Vec<String>,
    pub failed: Vec<PauseFailure>,
    pub batches: usize,
}

impl PauseReport {
    pub fn found(&self) -> usize {
        self.paused.len() + self.failed.len()
    }

    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Pause every active campaign of `account_id`, `limit` updates per remote batch.
///
/// Campaigns are pulled page by page and batched as they arrive. A campaign
/// whose update fails is recorded in the report and the run carries on; a
/// listing error or a rejected batch stops the run.
pub fn pause_active_campaigns<A: AdsApi>(
    ctx: &ApiContext<A>,
    account_id: &str,
    limit: BatchLimit,
) -> Result<PauseReport, PauseError> {
    let campaigns = ctx.campaigns(account_id, CampaignQuery::active());

    let paused = RefCell::new(Vec::new());
    let failed = RefCell::new(Vec::new());
    let mut batches = 0;

    for group in Batcher::new(limit).try_batches(campaigns) {
        let group = group.map_err(PauseError::ListingFailed)?;
        batches += 1;

        let mut request = BatchRequest::with_capacity(group.len());
        for campaign in group {
            queue_pause(&mut request, campaign, &paused, &failed);
        }

        tracing::debug!(batch = batches, size = request.len(), "executing pause batch");
        request
            .execute(ctx.api())
            .map_err(|source| PauseError::BatchRejected {
                batch: batches,
                source,
            })?;
    }

    Ok(PauseReport {
        paused: paused.into_inner(),
        failed: failed.into_inner(),
        batches,
    })
}

/// Queue one pause whose callbacks own their campaign
fn queue_pause<'a>(
    request: &mut BatchRequest<'a>,
    campaign: Campaign,
    paused: &'a RefCell<Vec<String>>,
    failed: &'a RefCell<Vec<PauseFailure>>,
) {
    let update = CampaignUpdate::pause(&campaign);
    let name = campaign.name.clone();

    request.add(
        update,
        move |_| {
            tracing::info!(campaign = %name, "Paused {} successfully.", name);
            paused.borrow_mut().push(name);
        },
        move |err| {
            tracing::warn!(campaign = %campaign.name, error = %err, "FAILED to pause {}.", campaign.name);
            failed.borrow_mut().push(PauseFailure {
                campaign_id: campaign.id,
                name: campaign.name,
                error: err.clone(),
            });
        },
    );
}
