mod create;
mod pause;

#[cfg(test)]
mod tests;

pub use create::{
    create_ad, upload_image_file, AdPlan, AdSetPlan, CreateError, CreatedAd, CreativePlan,
};
pub use pause::{pause_active_campaigns, PauseError, PauseFailure, PauseReport};
