// the platform contract: records we read and payloads we send
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub type ObjectId = String;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CampaignStatus {
    Active,
    Paused,
    Archived,
    Deleted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Objective {
    WebsiteClicks,
    WebsiteConversions,
    PageLikes,
    VideoViews,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Campaign {
    pub id: ObjectId,
    #[serde(default)]
    pub name: String,
    pub status: CampaignStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub objective: Option<Objective>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CampaignField {
    Name,
    Status,
    Objective,
}

/// Field selection plus status filter for a campaign listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CampaignQuery {
    pub fields: Vec<CampaignField>,
    pub statuses: Vec<CampaignStatus>,
}

impl CampaignQuery {
    /// Name and status of every active campaign
    pub fn active() -> Self {
        Self {
            fields: vec![CampaignField::Name, CampaignField::Status],
            statuses: vec![CampaignStatus::Active],
        }
    }

    pub fn matches(&self, campaign: &Campaign) -> bool {
        self.statuses.is_empty() || self.statuses.contains(&campaign.status)
    }

    /// Strip the fields that were not requested. `id` and `status` always come back.
    pub fn project(&self, campaign: &Campaign) -> Campaign {
        Campaign {
            id: campaign.id.clone(),
            name: if self.fields.contains(&CampaignField::Name) {
                campaign.name.clone()
            } else {
                String::new()
            },
            status: campaign.status,
            objective: campaign
                .objective
                .filter(|_| self.fields.contains(&CampaignField::Objective)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PageRequest {
    pub limit: usize,
    pub after: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    /// Cursor for the next page, absent on the last one
    pub after: Option<String>,
}

/// One mutation queued in a batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignUpdate {
    pub campaign_id: ObjectId,
    pub status: CampaignStatus,
}

impl CampaignUpdate {
    pub fn pause(campaign: &Campaign) -> Self {
        Self {
            campaign_id: campaign.id.clone(),
            status: CampaignStatus::Paused,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateResponse {
    pub id: ObjectId,
    pub success: bool,
}

/// A stored object together with the id the platform assigned to it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Created<T> {
    pub id: ObjectId,
    #[serde(flatten)]
    pub fields: T,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCampaign {
    pub name: String,
    pub objective: Objective,
    pub status: CampaignStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BidType {
    Cpm,
    Cpc,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BidInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub impressions: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clicks: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Targeting {
    pub countries: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAdSet {
    pub name: String,
    pub status: CampaignStatus,
    pub bid_type: BidType,
    pub bid_info: BidInfo,
    /// Minor currency units (3600 = $36.00)
    pub daily_budget: u64,
    pub start_time: DateTime<Utc>,
    pub campaign_id: ObjectId,
    pub targeting: Targeting,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdImage {
    pub hash: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCreative {
    pub title: String,
    pub body: String,
    pub object_url: String,
    pub image_hash: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAd {
    pub name: String,
    pub ad_set_id: ObjectId,
    pub creative_id: ObjectId,
}

/// HTTP-style counters kept by an API implementation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RequestStats {
    pub attempted: u64,
    pub succeeded: u64,
}

impl std::fmt::Display for RequestStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} attempted, {} succeeded",
            self.attempted, self.succeeded
        )
    }
}
