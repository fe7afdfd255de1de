use async_trait::async_trait;

use super::{ModuleInterface, ModuleState};
use crate::{
    Res,
    config::ModuleSettings,
    mapping::{self, StreamSource, TrackStream},
    soundcloud::ApiBackend,
    types::{
        AlbumInfo, ArtistInfo, Codec, DownloadDescriptor, MediaIdentification, MediaType,
        PlaylistInfo, SearchResult, TrackDocument, TrackInfo,
    },
    warning,
};

/// Module backed by `api-v2.soundcloud.com`.
pub struct WebModule {
    state: ModuleState,
}

impl WebModule {
    pub fn new(settings: &ModuleSettings) -> Self {
        let settings = settings.clone().with_backend(ApiBackend::Web);
        Self {
            state: ModuleState::new(&settings),
        }
    }

    pub fn state(&self) -> &ModuleState {
        &self.state
    }

    /// Turns the selected source into a media URL. Transport failures are
    /// errors; a track without a usable stream is `Ok(Err(reason))`. A
    /// downloadable original that cannot be fetched or probed falls back to
    /// the progressive transcoding.
    async fn resolve_stream(
        &self,
        track_id: &str,
        document: &TrackDocument,
    ) -> Res<Result<TrackStream, String>> {
        let source = match mapping::select_stream(document, ApiBackend::Web) {
            StreamSource::Download => match self.probe_original(track_id).await {
                Ok(Some(stream)) => return Ok(Ok(stream)),
                Ok(None) => mapping::select_transcoding(document),
                Err(e) => {
                    warning!(
                        "Original of track {} unavailable, using transcoding ({})",
                        track_id,
                        e
                    );
                    mapping::select_transcoding(document)
                }
            },
            other => other,
        };

        match source {
            StreamSource::Transcoding { url, codec } => {
                let url = self.state.api().resolve_stream_url(&url).await?;
                Ok(Ok(TrackStream { url, codec }))
            }
            StreamSource::Download => Ok(Err(mapping::ERR_NOT_STREAMABLE.to_string())),
            StreamSource::Unavailable(reason) => Ok(Err(reason)),
        }
    }

    /// The original upload, if its content type is a codec we know.
    async fn probe_original(&self, track_id: &str) -> Res<Option<TrackStream>> {
        let api = self.state.api();
        let url = api.get_track_download_redirect(track_id).await?;
        let content_type = api.probe_content_type(&url).await?;

        Ok(content_type
            .as_deref()
            .and_then(Codec::from_content_type)
            .map(|codec| TrackStream { url, codec }))
    }
}

#[async_trait]
impl ModuleInterface for WebModule {
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
        let stream = self.resolve_stream(track_id, &document).await?;

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
