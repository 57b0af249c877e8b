use crate::api::{
    AdImage, AdsApi, ApiContext, ApiError, BidInfo, BidType, CampaignStatus, NewAd, NewAdSet,
    NewCampaign, NewCreative, ObjectId, Objective, Targeting,
};
use chrono::{Duration, Utc};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CreateError {
    #[error("Failed to read image {path}: {source}")]
    ImageRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to create {step}: {source}")]
    Step {
        step: &'static str,
        #[source]
        source: ApiError,
    },
}

fn step(step: &'static str) -> impl FnOnce(ApiError) -> CreateError {
    move |source| CreateError::Step { step, source }
}

/// Ad set fields known before the campaign exists
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdSetPlan {
    pub name: String,
    pub status: CampaignStatus,
    pub bid_type: BidType,
    pub bid_info: BidInfo,
    pub daily_budget: u64,
    /// Delivery starts this long after the ad set is created
    pub start_delay: Duration,
    pub targeting: Targeting,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreativePlan {
    pub title: String,
    pub body: String,
    pub object_url: String,
}

/// Everything needed to go from nothing to a running ad
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdPlan {
    pub campaign: NewCampaign,
    pub ad_set: AdSetPlan,
    pub image_path: PathBuf,
    pub creative: CreativePlan,
    pub ad_name: String,
}

impl AdPlan {
    /// The Puget Sound sample: paused click campaign, $36/day CPM ad set targeting the US
    pub fn puget_sound(image_path: impl Into<PathBuf>) -> Self {
        Self {
            campaign: NewCampaign {
                name: "Seattle Ad Campaign".to_string(),
                objective: Objective::WebsiteClicks,
                status: CampaignStatus::Paused,
            },
            ad_set: AdSetPlan {
                name: "Puget Sound AdSet".to_string(),
                status: CampaignStatus::Paused,
                bid_type: BidType::Cpm,
                bid_info: BidInfo {
                    impressions: Some(500), // $5 per 1000 impressions
                    clicks: None,
                },
                daily_budget: 3600,
                start_delay: Duration::seconds(15),
                targeting: Targeting {
                    countries: vec!["US".to_string()],
                },
            },
            image_path: image_path.into(),
            creative: CreativePlan {
                title: "Visit Seattle".to_string(),
                body: "Beautiful Puget Sound!".to_string(),
                object_url: "http://www.seattle.gov/visiting/".to_string(),
            },
            ad_name: "Puget Sound impression ad".to_string(),
        }
    }
}

/// Ids of every object the workflow created
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedAd {
    pub campaign_id: ObjectId,
    pub ad_set_id: ObjectId,
    pub image: AdImage,
    pub creative_id: ObjectId,
    pub ad_id: ObjectId,
}

/// Campaign, then ad set, image, creative and finally the ad, each step feeding the next
pub fn create_ad<A: AdsApi>(
    ctx: &ApiContext<A>,
    account_id: &str,
    plan: &AdPlan,
) -> Result<CreatedAd, CreateError> {
    let api = ctx.api();

    let campaign_id = api
        .create_campaign(account_id, &plan.campaign)
        .map_err(step("campaign"))?;
    tracing::info!(id = %campaign_id, name = %plan.campaign.name, "campaign created");

    let ad_set = NewAdSet {
        name: plan.ad_set.name.clone(),
        status: plan.ad_set.status,
        bid_type: plan.ad_set.bid_type,
        bid_info: plan.ad_set.bid_info.clone(),
        daily_budget: plan.ad_set.daily_budget,
        start_time: Utc::now() + plan.ad_set.start_delay,
        campaign_id: campaign_id.clone(),
        targeting: plan.ad_set.targeting.clone(),
    };
    let ad_set_id = api
        .create_ad_set(account_id, &ad_set)
        .map_err(step("ad set"))?;
    tracing::info!(id = %ad_set_id, name = %ad_set.name, "ad set created");

    let image = upload_image_file(ctx, account_id, &plan.image_path)?;
    tracing::info!(hash = %image.hash, name = %image.name, "image uploaded");

    let creative = NewCreative {
        title: plan.creative.title.clone(),
        body: plan.creative.body.clone(),
        object_url: plan.creative.object_url.clone(),
        image_hash: image.hash.clone(),
    };
    let creative_id = api
        .create_creative(account_id, &creative)
        .map_err(step("creative"))?;
    tracing::info!(id = %creative_id, "creative created");

    let ad = NewAd {
        name: plan.ad_name.clone(),
        ad_set_id: ad_set_id.clone(),
        creative_id: creative_id.clone(),
    };
    let ad_id = api.create_ad(account_id, &ad).map_err(step("ad"))?;
    tracing::info!(id = %ad_id, name = %ad.name, "ad created");

    Ok(CreatedAd {
        campaign_id,
        ad_set_id,
        image,
        creative_id,
        ad_id,
    })
}

/// Upload a file from disk, naming the image after the file
pub fn upload_image_file<A: AdsApi>(
    ctx: &ApiContext<A>,
    account_id: &str,
    path: &Path,
) -> Result<AdImage, CreateError> {
    let bytes = std::fs::read(path).map_err(|source| CreateError::ImageRead {
        path: path.to_path_buf(),
        source,
    })?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());

    ctx.api()
        .upload_image(account_id, &name, &bytes)
        .map_err(step("image"))
}
