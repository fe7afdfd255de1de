//! # SoundCloud API Client
//!
//! Thin client over SoundCloud's two private REST APIs:
//!
//! ```text
//! Module Layer (ModuleInterface backends)
//!          ↓
//! SoundCloud Client
//!     ├── Resolve (URL → entity)
//!     ├── Search (users, tracks, playlists)
//!     ├── Playlists (info + track listing)
//!     ├── Users (profile, posted albums and tracks)
//!     └── Tracks (batch lookup, download redirect, stream URLs)
//!          ↓
//! HTTP Layer (reqwest, JSON)
//! ```
//!
//! Every request carries `Authorization: OAuth <token>`. A status outside
//! 200/201/202 is returned as [`ModuleError::Api`] with the status and body,
//! without retrying.
//!
//! The mobile API (`api-mobile.soundcloud.com`) addresses entities by URN and
//! wraps resolved entities by kind. The web API (`api-v2.soundcloud.com`)
//! addresses them by numeric id, paginates with `next_href` and returns
//! playlists whose later tracks are stubs that have to be looked up in
//! batches.

use std::{fmt, str::FromStr};

use reqwest::{Client, Response, header::AUTHORIZATION};
use serde_json::Value;

use crate::{ModuleError, Res, utils};

mod playlists;
mod resolve;
mod search;
mod tracks;
mod users;

pub use tracks::{TRACK_BATCH_SIZE, merge_track_details};

pub const MOBILE_API_URL: &str = "https://api-mobile.soundcloud.com/";
pub const WEB_API_URL: &str = "https://api-v2.soundcloud.com/";

const SUCCESS_STATUSES: [u16; 3] = [200, 201, 202];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ApiBackend {
    #[default]
    Mobile,
    Web,
}

impl ApiBackend {
    pub fn base_url(&self) -> &'static str {
        match self {
            ApiBackend::Mobile => MOBILE_API_URL,
            ApiBackend::Web => WEB_API_URL,
        }
    }
}

impl fmt::Display for ApiBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiBackend::Mobile => write!(f, "mobile"),
            ApiBackend::Web => write!(f, "web"),
        }
    }
}

impl FromStr for ApiBackend {
    type Err = ModuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mobile" => Ok(ApiBackend::Mobile),
            "web" | "v2" => Ok(ApiBackend::Web),
            other => Err(ModuleError::Config(format!(
                "Unknown API backend: {}. Expected mobile or web.",
                other
            ))),
        }
    }
}

/// Playlist document plus its tracks in playlist order.
#[derive(Debug, Clone)]
pub struct PlaylistListing {
    pub playlist: Value,
    pub track_ids: Vec<String>,
    /// Full track documents, keyed by id, ready for the entity cache.
    pub track_documents: Vec<(String, Value)>,
}

/// A user's posted albums and tracks.
#[derive(Debug, Clone)]
pub struct UserListing {
    pub album_ids: Vec<String>,
    pub track_ids: Vec<String>,
    pub track_documents: Vec<(String, Value)>,
}

pub struct SoundCloudApi {
    client: Client,
    backend: ApiBackend,
    api_base: String,
    access_token: String,
}

impl SoundCloudApi {
    pub fn new(backend: ApiBackend, access_token: impl Into<String>) -> Self {
        Self::with_base_url(backend, access_token, backend.base_url())
    }

    /// Client against a custom base URL, e.g. a mock server.
    pub fn with_base_url(
        backend: ApiBackend,
        access_token: impl Into<String>,
        api_base: impl Into<String>,
    ) -> Self {
        let mut api_base = api_base.into();
        if !api_base.ends_with('/') {
            api_base.push('/');
        }

        Self {
            client: Client::new(),
            backend,
            api_base,
            access_token: access_token.into(),
        }
    }

    pub fn backend(&self) -> ApiBackend {
        self.backend
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    /// GET `{api_base}{path}` and decode the JSON body.
    pub async fn get(&self, path: &str, params: &[(&str, String)]) -> Res<Value> {
        let url = format!("{}{}", self.api_base, path);
        self.get_url(&url, params).await
    }

    /// GET an absolute URL, as handed out in `next_href` or transcoding entries.
    pub async fn get_url(&self, url: &str, params: &[(&str, String)]) -> Res<Value> {
        let response = self
            .client
            .get(url)
            .query(params)
            .header(AUTHORIZATION, utils::auth_header_value(&self.access_token))
            .send()
            .await?;

        let response = check_status(response).await?;
        Ok(response.json::<Value>().await?)
    }

    fn require_web(&self, operation: &str) -> Res<()> {
        match self.backend {
            ApiBackend::Web => Ok(()),
            ApiBackend::Mobile => Err(ModuleError::invalid_input(format!(
                "{} is only available on the web API",
                operation
            ))),
        }
    }
}

async fn check_status(response: Response) -> Res<Response> {
    let status = response.status();
    if SUCCESS_STATUSES.contains(&status.as_u16()) {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(ModuleError::Api { status, body })
}
