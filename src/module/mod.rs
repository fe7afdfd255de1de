//! # Module Interface
//!
//! The contract between the host downloader and this module. The host
//! resolves links with [`ModuleInterface::custom_url_parse`], lists
//! containers with the album, playlist and artist calls, then asks for each
//! track's info and finally its download.
//!
//! Two backends implement the contract:
//! - [`MobileModule`] - the mobile API; streams come straight from the
//!   progressive transcoding URL.
//! - [`WebModule`] - the web v2 API; transcodings are resolved through an
//!   extra request and downloadable originals are preferred, their codec
//!   probed from the `Content-Type` of the download.
//!
//! Both keep every document they see in an [`EntityCache`](crate::management::EntityCache)
//! and fetch on a cache miss.

use async_trait::async_trait;

use crate::{
    ModuleError, Res,
    config::ModuleSettings,
    soundcloud::ApiBackend,
    types::{
        AlbumInfo, ArtistInfo, DownloadDescriptor, MediaIdentification, MediaType, PlaylistInfo,
        SearchResult, TrackInfo,
    },
};

mod mobile;
mod state;
mod web;

pub use mobile::MobileModule;
pub use state::ModuleState;
pub use web::WebModule;

/// Static description of the module for the host's registry.
#[derive(Debug, Clone, Copy)]
pub struct ModuleInformation {
    pub service_name: &'static str,
    pub supports_download: bool,
    /// The module resolves URLs itself instead of relying on host patterns.
    pub custom_url_parsing: bool,
    /// Setting names and their defaults.
    pub session_settings: &'static [(&'static str, &'static str)],
    pub netlocation_constant: &'static str,
    pub test_url: &'static str,
}

impl ModuleInformation {
    /// Whether the host should route `url` to this module.
    pub fn handles_url(&self, url: &str) -> bool {
        reqwest::Url::parse(url)
            .ok()
            .and_then(|u| u.host_str().map(|h| h.contains(self.netlocation_constant)))
            .unwrap_or(false)
    }
}

pub const MODULE_INFORMATION: ModuleInformation = ModuleInformation {
    service_name: "SoundCloud",
    supports_download: true,
    custom_url_parsing: true,
    session_settings: &[
        ("access_token", ""),
        ("artist_download_ignore_tracks_in_albums", "true"),
    ],
    netlocation_constant: "soundcloud",
    test_url: "https://soundcloud.com/alanwalker/darkside-feat-tomine-harket-au",
};

#[async_trait]
pub trait ModuleInterface: Send + Sync {
    fn information(&self) -> &'static ModuleInformation {
        &MODULE_INFORMATION
    }

    /// Resolves a SoundCloud URL into the media type and id it points at.
    async fn custom_url_parse(&mut self, link: &str) -> Res<MediaIdentification>;

    async fn search(
        &mut self,
        query_type: MediaType,
        query: &str,
        limit: usize,
    ) -> Res<Vec<SearchResult>>;

    /// Track record. Unavailable tracks are not an `Err`: the reason is in
    /// [`TrackInfo::error`].
    async fn get_track_info(&mut self, track_id: &str) -> Res<TrackInfo>;

    /// Download for a track whose info was requested before.
    async fn get_track_download(&self, track_id: &str) -> Res<DownloadDescriptor>;

    async fn get_album_info(&mut self, album_id: &str) -> Res<AlbumInfo>;

    async fn get_playlist_info(&mut self, playlist_id: &str) -> Res<PlaylistInfo>;

    async fn get_artist_info(&mut self, artist_id: &str) -> Res<ArtistInfo>;
}

/// Builds the backend named in the settings.
///
/// # Errors
///
/// Fails with [`ModuleError::Config`] when no access token is set.
pub fn build_module(settings: ModuleSettings) -> Res<Box<dyn ModuleInterface>> {
    if settings.access_token.trim().is_empty() {
        return Err(ModuleError::Config("access_token is empty".to_string()));
    }

    Ok(match settings.backend {
        ApiBackend::Mobile => Box::new(MobileModule::new(&settings)),
        ApiBackend::Web => Box::new(WebModule::new(&settings)),
    })
}
