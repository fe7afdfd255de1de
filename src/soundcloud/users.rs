use serde_json::Value;

use super::{ApiBackend, SoundCloudApi, UserListing};
use crate::{Res, utils};

const MOBILE_LIST_LIMIT: usize = 1000;
const WEB_PAGE_SIZE: usize = 200;

impl SoundCloudApi {
    pub async fn get_user(&self, user_id: &str) -> Res<Value> {
        let path = match self.backend {
            ApiBackend::Mobile => format!("users/soundcloud:users:{}", user_id),
            ApiBackend::Web => format!("users/{}", user_id),
        };
        self.get(&path, &[]).await
    }

    /// Lists the albums and tracks a user has posted, in two list calls.
    ///
    /// # Arguments
    ///
    /// * `user_id` - User id: the URN suffix on mobile, the numeric id on web
    ///
    /// # Returns
    ///
    /// Returns a `Result` containing:
    /// - `Ok(UserListing)` - Album ids, track ids and the track documents that
    ///   came with the listing
    /// - `Err(ModuleError)` - Transport failure or non-success status
    ///
    /// # Pagination
    ///
    /// The mobile API answers with up to 1000 entries per list. On the web API
    /// pages of 200 are requested and `next_href` is followed until it is
    /// absent or empty.
    ///
    /// # Example
    ///
    /// ```
    /// let listing = api.get_user_albums_tracks("2097360").await?;
    /// for album_id in &listing.album_ids {
    ///     let album = api.get_playlist(album_id).await?;
    /// }
    /// ```
    pub async fn get_user_albums_tracks(&self, user_id: &str) -> Res<UserListing> {
        match self.backend {
            ApiBackend::Mobile => self.get_mobile_user_albums_tracks(user_id).await,
            ApiBackend::Web => self.get_web_user_albums_tracks(user_id).await,
        }
    }

    async fn get_mobile_user_albums_tracks(&self, user_id: &str) -> Res<UserListing> {
        let limit = [("limit", MOBILE_LIST_LIMIT.to_string())];

        let albums = self
            .get(&format!("users/soundcloud:users:{}/albums/posted", user_id), &limit)
            .await?;
        let album_ids = utils::collection(&albums)
            .iter()
            .map(target_id)
            .collect::<Res<Vec<_>>>()?;

        let tracks = self
            .get(&format!("users/soundcloud:users:{}/tracks/posted", user_id), &limit)
            .await?;

        let mut track_ids = Vec::new();
        let mut track_documents = Vec::new();
        for entry in utils::collection(&tracks) {
            let id = target_id(&entry)?;
            track_ids.push(id.clone());
            if let Some(track) = entry.get("track").filter(|t| !t.is_null()) {
                track_documents.push((id, track.clone()));
            }
        }

        Ok(UserListing {
            album_ids,
            track_ids,
            track_documents,
        })
    }

    async fn get_web_user_albums_tracks(&self, user_id: &str) -> Res<UserListing> {
        let albums = self.get_all_pages(&format!("users/{}/albums", user_id)).await?;
        let album_ids = albums.iter().filter_map(utils::entity_id).collect();

        let tracks = self.get_all_pages(&format!("users/{}/tracks", user_id)).await?;
        let mut track_ids = Vec::with_capacity(tracks.len());
        let mut track_documents = Vec::with_capacity(tracks.len());
        for track in tracks {
            let Some(id) = utils::entity_id(&track) else {
                continue;
            };
            track_ids.push(id.clone());
            track_documents.push((id, track));
        }

        Ok(UserListing {
            album_ids,
            track_ids,
            track_documents,
        })
    }

    /// Follows `next_href` until the listing is exhausted.
    async fn get_all_pages(&self, path: &str) -> Res<Vec<Value>> {
        let mut page = self
            .get(
                path,
                &[
                    ("limit", WEB_PAGE_SIZE.to_string()),
                    ("linked_partitioning", "1".to_string()),
                ],
            )
            .await?;

        let mut items = Vec::new();
        loop {
            items.extend(utils::collection(&page));

            let next = page
                .get("next_href")
                .and_then(Value::as_str)
                .filter(|href| !href.is_empty())
                .map(str::to_string);

            match next {
                Some(href) => page = self.get_url(&href, &[]).await?,
                None => break,
            }
        }

        Ok(items)
    }
}

fn target_id(entry: &Value) -> Res<String> {
    let urn = utils::require(entry, "target_urn")?
        .as_str()
        .ok_or_else(|| utils::missing_field("target_urn"))?;
    Ok(utils::urn_id(urn).to_string())
}
