use std::collections::HashMap;

use reqwest::header::AUTHORIZATION;
use serde_json::Value;

use crate::{
    ModuleError, Res,
    config::ModuleSettings,
    management::{DownloadHistory, EntityCache},
    mapping::{self, TrackStream},
    remux::Remuxer,
    soundcloud::SoundCloudApi,
    types::{
        AlbumInfo, ArtistInfo, DownloadDescriptor, DownloadType, EntityKind, MediaIdentification,
        MediaType, PlaylistDocument, PlaylistInfo, SearchResult, TrackDocument, TrackInfo,
        UserDocument,
    },
    utils,
};

/// Session state shared by both backends: the client, the entity cache, the
/// download history and the streams handed out so far.
pub struct ModuleState {
    api: SoundCloudApi,
    cache: EntityCache,
    history: DownloadHistory,
    file_urls: HashMap<String, TrackStream>,
    dont_redownload_tracks: bool,
    remuxer: Remuxer,
}

impl ModuleState {
    pub fn new(settings: &ModuleSettings) -> Self {
        let api = match &settings.api_base {
            Some(base) => {
                SoundCloudApi::with_base_url(settings.backend, &settings.access_token, base.as_str())
            }
            None => SoundCloudApi::new(settings.backend, &settings.access_token),
        };

        Self {
            api,
            cache: EntityCache::new(),
            history: DownloadHistory::new(),
            file_urls: HashMap::new(),
            dont_redownload_tracks: settings.artist_download_ignore_tracks_in_albums,
            remuxer: Remuxer::new(settings.ffmpeg_path.clone()),
        }
    }

    pub fn api(&self) -> &SoundCloudApi {
        &self.api
    }

    pub fn cache(&self) -> &EntityCache {
        &self.cache
    }

    pub fn history(&self) -> &DownloadHistory {
        &self.history
    }

    pub async fn custom_url_parse(&mut self, link: &str) -> Res<MediaIdentification> {
        let response = self.api.resolve_url(link).await?;
        let resolved = mapping::identify(&response)
            .ok_or_else(|| ModuleError::invalid_input("URL is invalid"))?;

        self.cache.insert(resolved.kind, resolved.id, resolved.document);
        Ok(resolved.media)
    }

    pub async fn search(
        &mut self,
        query_type: MediaType,
        query: &str,
        limit: usize,
    ) -> Res<Vec<SearchResult>> {
        let plan = mapping::plan_search(query_type, limit)?;
        let response = self.api.search(plan.endpoint, query, plan.fetch_limit).await?;

        let results = mapping::map_search_results(&plan, &utils::collection(&response), limit);
        Ok(results
            .into_iter()
            .map(|(id, document, result)| {
                self.cache.insert(plan.endpoint, id, document);
                result
            })
            .collect())
    }

    /// Cached document, fetched on a miss. A failed fetch is the caller's error.
    async fn document(&mut self, kind: EntityKind, id: &str) -> Res<Value> {
        if let Some(document) = self.cache.get(kind, id) {
            return Ok(document.clone());
        }

        let document = match kind {
            EntityKind::Track => self.api.get_track(id).await?,
            EntityKind::User => self.api.get_user(id).await?,
            EntityKind::Playlist => self.api.get_playlist(id).await?.playlist,
        };
        self.cache.insert(kind, id, document.clone());
        Ok(document)
    }

    pub async fn track_document(&mut self, track_id: &str) -> Res<TrackDocument> {
        let document = self.document(EntityKind::Track, track_id).await?;
        Ok(serde_json::from_value(document)?)
    }

    /// Whether the track was handed out before in this session.
    pub fn is_downloaded(&self, track_id: &str) -> bool {
        self.history.has(track_id)
    }

    /// Maps the track and remembers its stream for [`Self::track_download`].
    ///
    /// Only called once every lookup for the track succeeded, so the track
    /// enters the download history (when the ignore-album-tracks setting is
    /// on) only after a complete info request.
    pub fn finish_track(
        &mut self,
        track_id: &str,
        document: &TrackDocument,
        stream: Result<TrackStream, String>,
        already_downloaded: bool,
    ) -> TrackInfo {
        if let Ok(stream) = &stream {
            self.file_urls.insert(track_id.to_string(), stream.clone());
        }
        if self.dont_redownload_tracks && !already_downloaded {
            self.history.add(track_id.to_string());
        }

        mapping::map_track(document, stream, self.api.access_token(), already_downloaded)
    }

    pub async fn track_download(&self, track_id: &str) -> Res<DownloadDescriptor> {
        let stream = self.file_urls.get(track_id).ok_or_else(|| {
            ModuleError::invalid_input(format!(
                "No stream known for track {}, request its info first",
                track_id
            ))
        })?;

        match stream.codec.download_type() {
            DownloadType::Url => {
                let mut headers = HashMap::new();
                headers.insert(
                    AUTHORIZATION.as_str().to_string(),
                    utils::auth_header_value(self.api.access_token()),
                );
                Ok(DownloadDescriptor::Url {
                    url: stream.url.clone(),
                    headers,
                })
            }
            DownloadType::TempFile => {
                let extension = stream.codec.extension();
                let downloaded = self.api.download_to_temp(&stream.url, extension).await?;
                let output = self.remuxer.remux(&downloaded, extension).await;
                Ok(DownloadDescriptor::TempFile(output))
            }
        }
    }

    async fn playlist_listing(&mut self, playlist_id: &str) -> Res<(PlaylistDocument, Vec<String>)> {
        let listing = self.api.get_playlist(playlist_id).await?;
        self.cache.extend(EntityKind::Track, listing.track_documents);

        let document: PlaylistDocument = serde_json::from_value(listing.playlist.clone())?;
        self.cache
            .insert(EntityKind::Playlist, playlist_id, listing.playlist);

        Ok((document, listing.track_ids))
    }

    pub async fn album_info(&mut self, album_id: &str) -> Res<AlbumInfo> {
        let (document, tracks) = self.playlist_listing(album_id).await?;
        Ok(mapping::map_album(&document, tracks))
    }

    pub async fn playlist_info(&mut self, playlist_id: &str) -> Res<PlaylistInfo> {
        let (document, tracks) = self.playlist_listing(playlist_id).await?;
        Ok(mapping::map_playlist(&document, tracks))
    }

    pub async fn artist_info(&mut self, artist_id: &str) -> Res<ArtistInfo> {
        let listing = self.api.get_user_albums_tracks(artist_id).await?;
        self.cache.extend(EntityKind::Track, listing.track_documents);

        let user: UserDocument =
            serde_json::from_value(self.document(EntityKind::User, artist_id).await?)?;
        Ok(mapping::map_artist(&user, listing.album_ids, listing.track_ids))
    }
}
