use serde_json::Value;

use super::{ApiBackend, PlaylistListing, SoundCloudApi, merge_track_details};
use crate::{Res, info, utils};

const MOBILE_PLAYLIST_LIMIT: usize = 1000;

impl SoundCloudApi {
    /// Fetches a playlist (or album) together with its tracks.
    ///
    /// # Arguments
    ///
    /// * `playlist_id` - Playlist id: the URN suffix on mobile, the numeric id on web
    ///
    /// # Returns
    ///
    /// Returns a `Result` containing:
    /// - `Ok(PlaylistListing)` - The playlist document, its track ids in
    ///   playlist order and the full track documents to cache
    /// - `Err(ModuleError)` - Transport failure, non-success status or a
    ///   response without `playlist` / `tracks`
    ///
    /// On the web API only the first entries of `tracks` are complete; the
    /// rest lack `streamable` and are looked up in batches, then merged back
    /// into playlist order. Stubs the batch lookup does not return keep their
    /// place in `track_ids` but are left out of `track_documents`.
    ///
    /// # Example
    ///
    /// ```
    /// let listing = api.get_playlist("1234567").await?;
    /// println!("{} tracks", listing.track_ids.len());
    /// ```
    pub async fn get_playlist(&self, playlist_id: &str) -> Res<PlaylistListing> {
        match self.backend {
            ApiBackend::Mobile => self.get_mobile_playlist(playlist_id).await,
            ApiBackend::Web => self.get_web_playlist(playlist_id).await,
        }
    }

    async fn get_mobile_playlist(&self, playlist_id: &str) -> Res<PlaylistListing> {
        let path = format!("playlists/soundcloud:playlists:{}/info", playlist_id);
        let data = self
            .get(&path, &[("limit", MOBILE_PLAYLIST_LIMIT.to_string())])
            .await?;

        let playlist = utils::require(&data, "playlist")?.clone();
        let entries = utils::collection(utils::require(&data, "tracks")?);

        let mut track_ids = Vec::with_capacity(entries.len());
        let mut track_documents = Vec::with_capacity(entries.len());
        for entry in entries {
            let id = utils::entity_id(&entry).ok_or_else(|| utils::missing_field("urn"))?;
            track_ids.push(id.clone());
            track_documents.push((id, entry));
        }

        Ok(PlaylistListing {
            playlist,
            track_ids,
            track_documents,
        })
    }

    async fn get_web_playlist(&self, playlist_id: &str) -> Res<PlaylistListing> {
        let playlist = self.get(&format!("playlists/{}", playlist_id), &[]).await?;

        let entries = playlist
            .get("tracks")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();

        let stubs: Vec<String> = entries
            .iter()
            .filter(|t| t.get("streamable").is_none())
            .filter_map(utils::entity_id)
            .collect();

        let entries = if stubs.is_empty() {
            entries
        } else {
            info!(
                "Fetching details for {} of {} playlist tracks",
                stubs.len(),
                entries.len()
            );
            let details = self.get_tracks_by_ids(&stubs).await?;
            merge_track_details(entries, details)
        };

        let mut track_ids = Vec::with_capacity(entries.len());
        let mut track_documents = Vec::with_capacity(entries.len());
        for entry in entries {
            let Some(id) = utils::entity_id(&entry) else {
                continue;
            };
            track_ids.push(id.clone());
            if entry.get("streamable").is_some() {
                track_documents.push((id, entry));
            }
        }

        Ok(PlaylistListing {
            playlist,
            track_ids,
            track_documents,
        })
    }
}
