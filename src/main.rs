use adbatch::{
    create_ad, pause_active_campaigns, AccountSnapshot, AdPlan, AdsApi, ApiContext, BatchLimit,
    MemoryApi, Settings,
};
use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::Level;

#[derive(Parser)]
#[command(about, version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
    #[arg(long, short = 'v', global = true)]
    verbose: bool,
}

#[derive(Args)]
struct Target {
    /// Session file with [authentication] credentials
    #[arg(long, short = 'c')]
    config: PathBuf,
    /// JSON snapshot of the ad account to operate on
    #[arg(long, short = 's')]
    snapshot: PathBuf,
    /// Write the resulting account state back to the snapshot
    #[arg(long)]
    save: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Pause all active campaigns using batched updates
    Pause {
        #[command(flatten)]
        target: Target,
        /// Updates per batch, overriding the session file
        #[arg(long, allow_negative_numbers = true)]
        limit: Option<i64>,
    },
    /// Create a campaign, ad set, image, creative and ad
    Create {
        #[command(flatten)]
        target: Target,
        /// Image to upload for the creative
        #[arg(long)]
        image: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .init();

    match cli.command {
        Command::Pause { target, limit } => run_pause(&target, limit),
        Command::Create { target, image } => run_create(&target, &image),
    }
}

fn connect(target: &Target) -> Result<(Settings, ApiContext<MemoryApi>)> {
    let settings = Settings::load(&target.config)
        .with_context(|| format!("loading session from {}", target.config.display()))?;

    let json = std::fs::read_to_string(&target.snapshot)
        .with_context(|| format!("reading account snapshot {}", target.snapshot.display()))?;
    let snapshot = AccountSnapshot::from_json(&json)
        .with_context(|| format!("parsing account snapshot {}", target.snapshot.display()))?;

    let ctx = ApiContext::connect(settings.session.clone(), MemoryApi::new(snapshot))
        .context("authenticating session")?
        .with_page_size(settings.page_size);

    Ok((settings, ctx))
}

fn save_snapshot(ctx: &ApiContext<MemoryApi>, path: &Path) -> Result<()> {
    let json = ctx.api().snapshot()?.to_json()?;
    std::fs::write(path, json)
        .with_context(|| format!("writing account snapshot {}", path.display()))?;
    println!("Saved account state to {}", path.display());
    Ok(())
}

fn run_pause(target: &Target, limit: Option<i64>) -> Result<()> {
    let start_time = Instant::now();
    let (settings, ctx) = connect(target)?;

    let limit = match limit {
        Some(raw) => BatchLimit::try_from(raw)?,
        None => settings.batch_limit,
    };

    let account_id = ctx.api().my_account()?;
    println!("**** Pausing all active ad campaigns in {}...", account_id);

    let report = pause_active_campaigns(&ctx, &account_id, limit)?;

    if report.found() == 0 {
        println!("**** No active campaign found.");
    } else {
        println!(
            "✓ Paused {} of {} campaigns in {} batches of up to {} [{:.2}s]",
            report.paused.len(),
            report.found(),
            report.batches,
            limit,
            start_time.elapsed().as_secs_f64()
        );
    }

    println!("\nHTTP Request Statistics: {}.", ctx.api().stats());

    if target.save {
        save_snapshot(&ctx, &target.snapshot)?;
    }

    if !report.is_clean() {
        bail!("{} campaign(s) could not be paused", report.failed.len());
    }
    Ok(())
}

fn run_create(target: &Target, image: &Path) -> Result<()> {
    let start_time = Instant::now();
    let (_settings, ctx) = connect(target)?;
    println!("=== Ad Creation ===\n");

    let account_id = ctx.api().my_account()?;
    let plan = AdPlan::puget_sound(image);
    let created = create_ad(&ctx, &account_id, &plan)?;

    println!("**** DONE: Campaign created:  {}", created.campaign_id);
    println!("**** DONE: Ad Set created:    {}", created.ad_set_id);
    println!("**** DONE: Image uploaded:    {}", created.image.hash);
    println!("**** DONE: Creative created:  {}", created.creative_id);
    println!("**** DONE: Ad created:        {}", created.ad_id);
    println!(
        "\n✓ Workflow complete [{:.2}s]",
        start_time.elapsed().as_secs_f64()
    );
    println!("HTTP Request Statistics: {}.", ctx.api().stats());

    if target.save {
        save_snapshot(&ctx, &target.snapshot)?;
    }
    Ok(())
}
