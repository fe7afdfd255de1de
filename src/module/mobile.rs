use async_trait::async_trait;

use super::{ModuleInterface, ModuleState};
use crate::{
    Res,
    config::ModuleSettings,
    mapping::{self, StreamSource, TrackStream},
    soundcloud::ApiBackend,
    types::{
        AlbumInfo, ArtistInfo, DownloadDescriptor, MediaIdentification, MediaType, PlaylistInfo,
        SearchResult, TrackInfo,
    },
};

/// Module backed by `api-mobile.soundcloud.com`.
pub struct MobileModule {
    state: ModuleState,
}

impl MobileModule {
    pub fn new(settings: &ModuleSettings) -> Self {
        let settings = settings.clone().with_backend(ApiBackend::Mobile);
        Self {
            state: ModuleState::new(&settings),
        }
    }

    pub fn state(&self) -> &ModuleState {
        &self.state
    }
}

#[async_trait]
impl ModuleInterface for MobileModule {
    async fn custom_url_parse(&mut self, link: &str) -> Res<MediaIdentification> {
        self.state.custom_url_parse(link).await
    }

    async fn search(
        &mut self,
        query_type: MediaType,
        query: &str,
        limit: usize,
    ) -> Res<Vec<SearchResult>> {
        self.state.search(query_type, query, limit).await
    }

    async fn get_track_info(&mut self, track_id: &str) -> Res<TrackInfo> {
        let document = self.state.track_document(track_id).await?;
        let already_downloaded = self.state.is_downloaded(track_id);

        // The mobile API never offers originals, so there is nothing to resolve.
        let stream = match mapping::select_stream(&document, ApiBackend::Mobile) {
            StreamSource::Transcoding { url, codec } => Ok(TrackStream { url, codec }),
            StreamSource::Download => Err(mapping::ERR_NOT_STREAMABLE.to_string()),
            StreamSource::Unavailable(reason) => Err(reason),
        };

        Ok(self
            .state
            .finish_track(track_id, &document, stream, already_downloaded))
    }

    async fn get_track_download(&self, track_id: &str) -> Res<DownloadDescriptor> {
        self.state.track_download(track_id).await
    }

    async fn get_album_info(&mut self, album_id: &str) -> Res<AlbumInfo> {
        self.state.album_info(album_id).await
    }

    async fn get_playlist_info(&mut self, playlist_id: &str) -> Res<PlaylistInfo> {
        self.state.playlist_info(playlist_id).await
    }

    async fn get_artist_info(&mut self, artist_id: &str) -> Res<ArtistInfo> {
        self.state.artist_info(artist_id).await
    }
}
