// client.rs - the seam between workflows and the ads platform
use super::cursor::CampaignCursor;
use super::error::ApiError;
use super::types::*;
use crate::session::{Session, DEFAULT_PAGE_SIZE};

/// Operations the workflows need from an ads platform.
///
/// Methods take `&self` so a listing cursor can stay alive while batches
/// are executed against the same client.
pub trait AdsApi {
    /// Check the session's credentials
    fn authenticate(&self, session: &Session) -> Result<(), ApiError>;

    /// First ad account of the authenticated user
    fn my_account(&self) -> Result<ObjectId, ApiError>;

    fn list_campaigns(
        &self,
        account_id: &str,
        query: &CampaignQuery,
        page: &PageRequest,
    ) -> Result<Page<Campaign>, ApiError>;

    /// Run all updates as one remote batch.
    ///
    /// The outer error rejects the whole batch; otherwise there is exactly
    /// one inner result per update, in order.
    fn execute_batch(
        &self,
        updates: &[CampaignUpdate],
    ) -> Result<Vec<Result<UpdateResponse, ApiError>>, ApiError>;

    fn create_campaign(&self, account_id: &str, campaign: &NewCampaign)
        -> Result<ObjectId, ApiError>;

    fn create_ad_set(&self, account_id: &str, ad_set: &NewAdSet) -> Result<ObjectId, ApiError>;

    fn upload_image(&self, account_id: &str, name: &str, bytes: &[u8])
        -> Result<AdImage, ApiError>;

    fn create_creative(&self, account_id: &str, creative: &NewCreative)
        -> Result<ObjectId, ApiError>;

    fn create_ad(&self, account_id: &str, ad: &NewAd) -> Result<ObjectId, ApiError>;

    fn stats(&self) -> RequestStats;
}

/// An authenticated client plus the settings workflows read from it.
///
/// Built once and passed explicitly wherever API access is needed.
pub struct ApiContext<A> {
    session: Session,
    api: A,
    page_size: usize,
}

impl<A: AdsApi> ApiContext<A> {
    /// Authenticate `session` against `api` and wrap both
    pub fn connect(session: Session, api: A) -> Result<Self, ApiError> {
        api.authenticate(&session)?;
        tracing::debug!(app_id = %session.app_id, "session authenticated");
        Ok(Self {
            session,
            api,
            page_size: DEFAULT_PAGE_SIZE,
        })
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Lazily page through the campaigns of `account_id` that match `query`
    pub fn campaigns(&self, account_id: &str, query: CampaignQuery) -> CampaignCursor<'_, A> {
        CampaignCursor::new(&self.api, account_id, query, self.page_size)
    }
}
