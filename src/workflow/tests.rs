use super::*;
use crate::api::{
    AccountSnapshot, AdsApi, ApiContext, ApiError, Campaign, CampaignStatus, MemoryApi,
};
use crate::batcher::BatchLimit;
use crate::session::Session;
use std::io::Write;

fn account(active: usize, paused: usize) -> AccountSnapshot {
    let mut account = AccountSnapshot::new("act_42");
    // interleave so filtering is exercised across pages
    for i in 0..active.max(paused) {
        if i < active {
            account.campaigns.push(Campaign {
                id: format!("a{}", i),
                name: format!("Active {}", i),
                status: CampaignStatus::Active,
                objective: None,
            });
        }
        if i < paused {
            account.campaigns.push(Campaign {
                id: format!("p{}", i),
                name: format!("Paused {}", i),
                status: CampaignStatus::Paused,
                objective: None,
            });
        }
    }
    account
}

fn connect(api: MemoryApi) -> ApiContext<MemoryApi> {
    ApiContext::connect(Session::new("app", "secret", "token"), api).unwrap()
}

fn limit(n: usize) -> BatchLimit {
    BatchLimit::new(n).unwrap()
}

#[test]
fn test_pauses_every_active_campaign() {
    let ctx = connect(MemoryApi::new(account(60, 5))).with_page_size(25);

    let report = pause_active_campaigns(&ctx, "act_42", limit(25)).unwrap();

    assert_eq!(report.paused.len(), 60);
    assert_eq!(report.batches, 3);
    assert!(report.is_clean());
    assert_eq!(report.paused[0], "Active 0");
    assert_eq!(report.paused[59], "Active 59");

    let snapshot = ctx.api().snapshot().unwrap();
    assert!(snapshot
        .campaigns
        .iter()
        .all(|c| c.status == CampaignStatus::Paused));
}

#[test]
fn test_page_size_and_batch_limit_are_independent() {
    let ctx = connect(MemoryApi::new(account(10, 10))).with_page_size(3);

    let report = pause_active_campaigns(&ctx, "act_42", limit(4)).unwrap();

    assert_eq!(report.found(), 10);
    assert_eq!(report.batches, 3);
}

#[test]
fn test_nothing_active() {
    let ctx = connect(MemoryApi::new(account(0, 4)));

    let report = pause_active_campaigns(&ctx, "act_42", limit(25)).unwrap();

    assert_eq!(report, PauseReport::default());
    assert_eq!(report.found(), 0);
}

#[test]
fn test_failed_campaign_is_reported_and_run_continues() {
    let api = MemoryApi::new(account(5, 0));
    api.reject_updates_for("a2", "insufficient permissions")
        .unwrap();
    let ctx = connect(api);

    let report = pause_active_campaigns(&ctx, "act_42", limit(2)).unwrap();

    assert_eq!(report.paused.len(), 4);
    assert_eq!(report.batches, 3);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].campaign_id, "a2");
    assert_eq!(report.failed[0].name, "Active 2");
    assert!(!report.is_clean());
}

#[test]
fn test_listing_error_stops_run() {
    let api = MemoryApi::new(account(6, 0));
    api.fail_page(2).unwrap();
    let ctx = connect(api).with_page_size(2);

    let err = pause_active_campaigns(&ctx, "act_42", limit(3)).unwrap_err();
    assert!(matches!(err, PauseError::ListingFailed(ApiError::Transport(_))));

    // the two campaigns from page one never formed a complete batch
    let snapshot = ctx.api().snapshot().unwrap();
    assert!(snapshot
        .campaigns
        .iter()
        .all(|c| c.status == CampaignStatus::Active));
}

#[test]
fn test_batch_over_platform_cap_is_rejected() {
    let api = MemoryApi::new(account(5, 0)).with_max_batch_size(3);
    let ctx = connect(api);

    let err = pause_active_campaigns(&ctx, "act_42", limit(5)).unwrap_err();
    assert!(matches!(
        err,
        PauseError::BatchRejected {
            batch: 1,
            source: ApiError::BatchTooLarge { size: 5, max: 3 }
        }
    ));
}

#[test]
fn test_request_stats_after_pause() {
    let ctx = connect(MemoryApi::new(account(3, 0))).with_page_size(25);

    pause_active_campaigns(&ctx, "act_42", limit(25)).unwrap();

    // authenticate + one page + three updates
    let stats = ctx.api().stats();
    assert_eq!(stats.attempted, 5);
    assert_eq!(stats.succeeded, 5);
}

fn image_file() -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".jpg")
        .tempfile()
        .unwrap();
    file.write_all(b"\xff\xd8\xff\xe0 not really a jpeg").unwrap();
    file
}

#[test]
fn test_create_ad_links_every_object() {
    let image = image_file();
    let ctx = connect(MemoryApi::new(AccountSnapshot::new("act_42")));
    let plan = AdPlan::puget_sound(image.path());

    let created = create_ad(&ctx, "act_42", &plan).unwrap();

    let snapshot = ctx.api().snapshot().unwrap();
    assert_eq!(snapshot.campaigns.len(), 1);
    assert_eq!(snapshot.campaigns[0].id, created.campaign_id);
    assert_eq!(snapshot.campaigns[0].name, "Seattle Ad Campaign");
    assert_eq!(snapshot.campaigns[0].status, CampaignStatus::Paused);

    let ad_set = &snapshot.ad_sets[0];
    assert_eq!(ad_set.id, created.ad_set_id);
    assert_eq!(ad_set.fields.campaign_id, created.campaign_id);
    assert_eq!(ad_set.fields.daily_budget, 3600);
    assert_eq!(ad_set.fields.bid_info.impressions, Some(500));
    assert_eq!(ad_set.fields.targeting.countries, vec!["US".to_string()]);
    assert!(ad_set.fields.start_time > chrono::Utc::now());

    let creative = &snapshot.creatives[0];
    assert_eq!(creative.id, created.creative_id);
    assert_eq!(creative.fields.image_hash, created.image.hash);
    assert_eq!(creative.fields.title, "Visit Seattle");

    let ad = &snapshot.ads[0];
    assert_eq!(ad.id, created.ad_id);
    assert_eq!(ad.fields.ad_set_id, created.ad_set_id);
    assert_eq!(ad.fields.creative_id, created.creative_id);
    assert_eq!(ad.fields.name, "Puget Sound impression ad");
}

#[test]
fn test_create_ad_missing_image() {
    let ctx = connect(MemoryApi::new(AccountSnapshot::new("act_42")));
    let dir = tempfile::tempdir().unwrap();
    let plan = AdPlan::puget_sound(dir.path().join("puget_sound.jpg"));

    let err = create_ad(&ctx, "act_42", &plan).unwrap_err();
    assert!(matches!(err, CreateError::ImageRead { .. }));
}

#[test]
fn test_create_ad_reports_failing_step() {
    let image = image_file();
    let ctx = connect(MemoryApi::new(AccountSnapshot::new("act_42")));
    let mut plan = AdPlan::puget_sound(image.path());
    plan.ad_set.daily_budget = 0;

    let err = create_ad(&ctx, "act_42", &plan).unwrap_err();
    assert!(matches!(
        err,
        CreateError::Step {
            step: "ad set",
            source: ApiError::Validation(_)
        }
    ));
    assert!(err.to_string().starts_with("Failed to create ad set"));
}

#[test]
fn test_upload_names_image_after_file() {
    let image = image_file();
    let ctx = connect(MemoryApi::new(AccountSnapshot::new("act_42")));

    let uploaded = upload_image_file(&ctx, "act_42", image.path()).unwrap();
    assert!(uploaded.name.ends_with(".jpg"));
}
