use super::client::AdsApi;
use super::error::ApiError;
use super::types::*;
use crate::session::Session;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};

/// Largest batch the platform accepts in one call
pub const DEFAULT_MAX_BATCH_SIZE: usize = 50;

/// Serializable state of one ad account
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccountSnapshot {
    pub account_id: ObjectId,
    #[serde(default)]
    pub campaigns: Vec<Campaign>,
    #[serde(default)]
    pub ad_sets: Vec<Created<NewAdSet>>,
    #[serde(default)]
    pub images: Vec<AdImage>,
    #[serde(default)]
    pub creatives: Vec<Created<NewCreative>>,
    #[serde(default)]
    pub ads: Vec<Created<NewAd>>,
}

impl AccountSnapshot {
    pub fn new(account_id: impl Into<ObjectId>) -> Self {
        Self {
            account_id: account_id.into(),
            ..Self::default()
        }
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[derive(Default)]
struct Faults {
    rejected_updates: HashMap<ObjectId, String>,
    failing_page: Option<usize>,
}

struct State {
    account: AccountSnapshot,
    faults: Faults,
    pages_served: usize,
}

/// In-process stand-in for the ads platform, backed by an [`AccountSnapshot`]
pub struct MemoryApi {
    state: Mutex<State>,
    access_token: Option<String>,
    max_batch_size: usize,
    attempted: AtomicU64,
    succeeded: AtomicU64,
}

impl MemoryApi {
    pub fn new(account: AccountSnapshot) -> Self {
        Self {
            state: Mutex::new(State {
                account,
                faults: Faults::default(),
                pages_served: 0,
            }),
            access_token: None,
            max_batch_size: DEFAULT_MAX_BATCH_SIZE,
            attempted: AtomicU64::new(0),
            succeeded: AtomicU64::new(0),
        }
    }

    /// Only accept sessions carrying this token
    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    pub fn with_max_batch_size(mut self, max: usize) -> Self {
        self.max_batch_size = max;
        self
    }

    /// Make every update of `campaign_id` fail with `message`
    pub fn reject_updates_for(&self, campaign_id: &str, message: &str) -> Result<(), ApiError> {
        self.state()?
            .faults
            .rejected_updates
            .insert(campaign_id.to_string(), message.to_string());
        Ok(())
    }

    /// Make the `page`-th listing request (1-based) fail
    pub fn fail_page(&self, page: usize) -> Result<(), ApiError> {
        self.state()?.faults.failing_page = Some(page);
        Ok(())
    }

    pub fn snapshot(&self) -> Result<AccountSnapshot, ApiError> {
        Ok(self.state()?.account.clone())
    }

    fn state(&self) -> Result<MutexGuard<'_, State>, ApiError> {
        self.state
            .lock()
            .map_err(|_| ApiError::Transport("account state lock poisoned".to_string()))
    }

    /// Count one request and its outcome
    fn record<T>(&self, result: Result<T, ApiError>) -> Result<T, ApiError> {
        self.attempted.fetch_add(1, Ordering::Relaxed);
        if result.is_ok() {
            self.succeeded.fetch_add(1, Ordering::Relaxed);
        }
        result
    }

    fn check_account(state: &State, account_id: &str) -> Result<(), ApiError> {
        if state.account.account_id == account_id {
            Ok(())
        } else {
            Err(ApiError::UnknownObject {
                kind: "ad account",
                id: account_id.to_string(),
            })
        }
    }

    fn new_id() -> ObjectId {
        uuid::Uuid::new_v4().simple().to_string()
    }
}

impl AdsApi for MemoryApi {
    fn authenticate(&self, session: &Session) -> Result<(), ApiError> {
        let result = match &self.access_token {
            Some(expected) if *expected != session.access_token => Err(ApiError::Unauthorized(
                format!("invalid access token for app {}", session.app_id),
            )),
            _ => Ok(()),
        };
        self.record(result)
    }

    fn my_account(&self) -> Result<ObjectId, ApiError> {
        let result = self.state().map(|state| state.account.account_id.clone());
        self.record(result)
    }

    fn list_campaigns(
        &self,
        account_id: &str,
        query: &CampaignQuery,
        page: &PageRequest,
    ) -> Result<Page<Campaign>, ApiError> {
        let result = self.state().and_then(|mut state| {
            Self::check_account(&state, account_id)?;

            state.pages_served += 1;
            if state.faults.failing_page == Some(state.pages_served) {
                return Err(ApiError::Transport(format!(
                    "connection reset while fetching page {}",
                    state.pages_served
                )));
            }

            // The cursor is a position in the full list, so records that stop
            // matching between pages do not shift the ones not yet seen
            let start = match &page.after {
                Some(cursor) => cursor.parse::<usize>().map_err(|_| {
                    ApiError::Validation(format!("invalid pagination cursor: {}", cursor))
                })?,
                None => 0,
            };

            let limit = page.limit.max(1);
            let mut remaining = state
                .account
                .campaigns
                .iter()
                .enumerate()
                .skip(start)
                .filter(|(_, campaign)| query.matches(campaign));

            let mut data = Vec::with_capacity(limit);
            let mut last_index = start;
            for (index, campaign) in remaining.by_ref().take(limit) {
                data.push(query.project(campaign));
                last_index = index;
            }
            let after = remaining
                .next()
                .map(|_| (last_index + 1).to_string());

            Ok(Page { data, after })
        });
        self.record(result)
    }

    fn execute_batch(
        &self,
        updates: &[CampaignUpdate],
    ) -> Result<Vec<Result<UpdateResponse, ApiError>>, ApiError> {
        if updates.len() > self.max_batch_size {
            return self.record(Err(ApiError::BatchTooLarge {
                size: updates.len(),
                max: self.max_batch_size,
            }));
        }

        let mut state = self.state()?;
        let mut results = Vec::with_capacity(updates.len());

        for update in updates {
            let rejection = state
                .faults
                .rejected_updates
                .get(&update.campaign_id)
                .cloned();
            let result = if let Some(message) = rejection {
                Err(ApiError::Rejected { code: 100, message })
            } else {
                match state
                    .account
                    .campaigns
                    .iter_mut()
                    .find(|campaign| campaign.id == update.campaign_id)
                {
                    Some(campaign) => {
                        campaign.status = update.status;
                        Ok(UpdateResponse {
                            id: campaign.id.clone(),
                            success: true,
                        })
                    }
                    None => Err(ApiError::UnknownObject {
                        kind: "campaign",
                        id: update.campaign_id.clone(),
                    }),
                }
            };
            // Each operation in a batch counts as its own request
            results.push(self.record(result));
        }

        Ok(results)
    }

    fn create_campaign(
        &self,
        account_id: &str,
        campaign: &NewCampaign,
    ) -> Result<ObjectId, ApiError> {
        let result = self.state().and_then(|mut state| {
            Self::check_account(&state, account_id)?;
            if campaign.name.trim().is_empty() {
                return Err(ApiError::Validation("campaign name is required".to_string()));
            }

            let id = Self::new_id();
            state.account.campaigns.push(Campaign {
                id: id.clone(),
                name: campaign.name.clone(),
                status: campaign.status,
                objective: Some(campaign.objective),
            });
            Ok(id)
        });
        self.record(result)
    }

    fn create_ad_set(&self, account_id: &str, ad_set: &NewAdSet) -> Result<ObjectId, ApiError> {
        let result = self.state().and_then(|mut state| {
            Self::check_account(&state, account_id)?;
            if !state
                .account
                .campaigns
                .iter()
                .any(|campaign| campaign.id == ad_set.campaign_id)
            {
                return Err(ApiError::UnknownObject {
                    kind: "campaign",
                    id: ad_set.campaign_id.clone(),
                });
            }
            if ad_set.daily_budget == 0 {
                return Err(ApiError::Validation(
                    "daily budget must be greater than zero".to_string(),
                ));
            }
            if ad_set.targeting.countries.is_empty() {
                return Err(ApiError::Validation(
                    "targeting needs at least one country".to_string(),
                ));
            }

            let id = Self::new_id();
            state.account.ad_sets.push(Created {
                id: id.clone(),
                fields: ad_set.clone(),
            });
            Ok(id)
        });
        self.record(result)
    }

    fn upload_image(&self, account_id: &str, name: &str, bytes: &[u8]) -> Result<AdImage, ApiError> {
        let result = self.state().and_then(|mut state| {
            Self::check_account(&state, account_id)?;
            if bytes.is_empty() {
                return Err(ApiError::Validation(format!("image {} is empty", name)));
            }

            let hash = hex::encode(Sha256::digest(bytes));
            if let Some(existing) = state.account.images.iter().find(|img| img.hash == hash) {
                return Ok(existing.clone());
            }

            let image = AdImage {
                hash,
                name: name.to_string(),
            };
            state.account.images.push(image.clone());
            Ok(image)
        });
        self.record(result)
    }

    fn create_creative(
        &self,
        account_id: &str,
        creative: &NewCreative,
    ) -> Result<ObjectId, ApiError> {
        let result = self.state().and_then(|mut state| {
            Self::check_account(&state, account_id)?;
            if !state
                .account
                .images
                .iter()
                .any(|img| img.hash == creative.image_hash)
            {
                return Err(ApiError::UnknownObject {
                    kind: "image",
                    id: creative.image_hash.clone(),
                });
            }

            let id = Self::new_id();
            state.account.creatives.push(Created {
                id: id.clone(),
                fields: creative.clone(),
            });
            Ok(id)
        });
        self.record(result)
    }

    fn create_ad(&self, account_id: &str, ad: &NewAd) -> Result<ObjectId, ApiError> {
        let result = self.state().and_then(|mut state| {
            Self::check_account(&state, account_id)?;
            if !state.account.ad_sets.iter().any(|set| set.id == ad.ad_set_id) {
                return Err(ApiError::UnknownObject {
                    kind: "ad set",
                    id: ad.ad_set_id.clone(),
                });
            }
            if !state
                .account
                .creatives
                .iter()
                .any(|creative| creative.id == ad.creative_id)
            {
                return Err(ApiError::UnknownObject {
                    kind: "creative",
                    id: ad.creative_id.clone(),
                });
            }

            let id = Self::new_id();
            state.account.ads.push(Created {
                id: id.clone(),
                fields: ad.clone(),
            });
            Ok(id)
        });
        self.record(result)
    }

    fn stats(&self) -> RequestStats {
        RequestStats {
            attempted: self.attempted.load(Ordering::Relaxed),
            succeeded: self.succeeded.load(Ordering::Relaxed),
        }
    }
}
