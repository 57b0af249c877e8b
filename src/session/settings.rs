use super::SessionError;
use crate::batcher::{BatchLimit, DEFAULT_BATCH_LIMIT};
use serde::Deserialize;
use std::fmt;
use std::path::Path;

/// Records requested per page when listing campaigns
pub const DEFAULT_PAGE_SIZE: usize = 25;

/// App credentials used to authenticate every API call
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    pub app_id: String,
    pub app_secret: String,
    pub access_token: String,
}

impl Session {
    pub fn new(
        app_id: impl Into<String>,
        app_secret: impl Into<String>,
        access_token: impl Into<String>,
    ) -> Self {
        Self {
            app_id: app_id.into(),
            app_secret: app_secret.into(),
            access_token: access_token.into(),
        }
    }
}

// Keep secrets out of logs
impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("app_id", &self.app_id)
            .field("app_secret", &"<redacted>")
            .field("access_token", &"<redacted>")
            .finish()
    }
}

/// Validated contents of a session file
#[derive(Debug, Clone)]
pub struct Settings {
    pub session: Session,
    pub batch_limit: BatchLimit,
    pub page_size: usize,
}

#[derive(Deserialize)]
struct RawSettings {
    #[serde(default)]
    authentication: RawAuthentication,
    #[serde(default)]
    batching: RawBatching,
}

#[derive(Default, Deserialize)]
struct RawAuthentication {
    #[serde(default)]
    app_id: String,
    #[serde(default)]
    app_secret: String,
    #[serde(default)]
    access_token: String,
}

#[derive(Deserialize)]
#[serde(default)]
struct RawBatching {
    campaign_update_batch_limit: i64,
    page_size: i64,
}

impl Default for RawBatching {
    fn default() -> Self {
        Self {
            campaign_update_batch_limit: DEFAULT_BATCH_LIMIT as i64,
            page_size: DEFAULT_PAGE_SIZE as i64,
        }
    }
}

impl Settings {
    /// Read and validate a TOML session file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SessionError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| SessionError::ReadFailed {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, SessionError> {
        let raw: RawSettings = toml::from_str(contents)?;

        let auth = raw.authentication;
        for (field, value) in [
            ("app_id", &auth.app_id),
            ("app_secret", &auth.app_secret),
            ("access_token", &auth.access_token),
        ] {
            if value.trim().is_empty() {
                return Err(SessionError::MissingCredential(field));
            }
        }

        let batch_limit = BatchLimit::try_from(raw.batching.campaign_update_batch_limit)?;
        let page_size = usize::try_from(raw.batching.page_size)
            .ok()
            .filter(|size| *size > 0)
            .ok_or(SessionError::InvalidPageSize(raw.batching.page_size))?;

        Ok(Self {
            session: Session::new(auth.app_id, auth.app_secret, auth.access_token),
            batch_limit,
            page_size,
        })
    }
}
