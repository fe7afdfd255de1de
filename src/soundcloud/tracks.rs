use std::{collections::HashMap, path::PathBuf};

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde_json::Value;

use super::{ApiBackend, SoundCloudApi, check_status};
use crate::{Res, utils};

/// Most ids the `tracks?ids=` endpoint accepts per call.
pub const TRACK_BATCH_SIZE: usize = 50;

impl SoundCloudApi {
    pub async fn get_track(&self, track_id: &str) -> Res<Value> {
        let path = match self.backend {
            ApiBackend::Mobile => format!("tracks/soundcloud:tracks:{}", track_id),
            ApiBackend::Web => format!("tracks/{}", track_id),
        };
        self.get(&path, &[]).await
    }

    /// Looks up full track documents on the web API, `TRACK_BATCH_SIZE` ids
    /// per request.
    ///
    /// # Arguments
    ///
    /// * `track_ids` - Numeric track ids, in the order the caller wants them back
    ///
    /// # Returns
    ///
    /// Returns a `Result` containing:
    /// - `Ok(Vec<(String, Value)>)` - `(id, document)` pairs in the order of
    ///   `track_ids`. Ids the API does not return are skipped.
    /// - `Err(ModuleError)` - `InvalidInput` on the mobile API, `Api` for a
    ///   non-success status on any chunk
    ///
    /// Issues `ceil(track_ids.len() / 50)` requests, one after another.
    ///
    /// # Example
    ///
    /// ```
    /// let ids = vec!["1".to_string(), "2".to_string()];
    /// let documents = api.get_tracks_by_ids(&ids).await?;
    /// ```
    pub async fn get_tracks_by_ids(&self, track_ids: &[String]) -> Res<Vec<(String, Value)>> {
        self.require_web("Batch track lookup")?;

        let mut found: HashMap<String, Value> = HashMap::with_capacity(track_ids.len());
        for chunk in track_ids.chunks(TRACK_BATCH_SIZE) {
            let response = self.get("tracks", &[("ids", chunk.join(","))]).await?;
            let documents = match response {
                Value::Array(items) => items,
                other => utils::collection(&other),
            };

            for document in documents {
                if let Some(id) = utils::entity_id(&document) {
                    found.insert(id, document);
                }
            }
        }

        Ok(track_ids
            .iter()
            .filter_map(|id| found.get(id).map(|doc| (id.clone(), doc.clone())))
            .collect())
    }

    /// Signed URL of the uploader's original file.
    ///
    /// # Arguments
    ///
    /// * `track_id` - Numeric id of a track flagged `downloadable`
    ///
    /// # Returns
    ///
    /// The `redirectUri` of `tracks/{id}/download`. Fails with `InvalidInput`
    /// on the mobile API and with `Api` when the download is not offered.
    pub async fn get_track_download_redirect(&self, track_id: &str) -> Res<String> {
        self.require_web("Original file download")?;

        let response = self.get(&format!("tracks/{}/download", track_id), &[]).await?;
        utils::require(&response, "redirectUri")?
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| utils::missing_field("redirectUri"))
    }

    /// Web transcoding entries point at an API endpoint that hands out the
    /// actual media URL.
    pub async fn resolve_stream_url(&self, transcoding_url: &str) -> Res<String> {
        let response = self.get_url(transcoding_url, &[]).await?;
        utils::require(&response, "url")?
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| utils::missing_field("url"))
    }

    /// `Content-Type` of a media URL, read from a HEAD request.
    pub async fn probe_content_type(&self, url: &str) -> Res<Option<String>> {
        let response = self.client.head(url).send().await?;
        let response = check_status(response).await?;

        Ok(response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string))
    }

    /// Downloads `url` into a fresh temp file with the given extension.
    ///
    /// The request carries the OAuth header, like every API call.
    ///
    /// # Example
    ///
    /// ```
    /// let file = api.download_to_temp("https://cf-media.sndcdn.com/abc.m4a", "m4a").await?;
    /// ```
    pub async fn download_to_temp(&self, url: &str, extension: &str) -> Res<PathBuf> {
        let response = self
            .client
            .get(url)
            .header(AUTHORIZATION, utils::auth_header_value(&self.access_token))
            .send()
            .await?;
        let response = check_status(response).await?;
        let body = response.bytes().await?;

        let path = utils::create_temp_filename().with_extension(extension);
        async_fs::write(&path, &body).await?;
        Ok(path)
    }
}

/// Replaces track stubs with their full documents, keeping playlist order and
/// length. Stubs without a matching document stay as they are.
pub fn merge_track_details(entries: Vec<Value>, details: Vec<(String, Value)>) -> Vec<Value> {
    let details: HashMap<String, Value> = details.into_iter().collect();

    entries
        .into_iter()
        .map(|entry| {
            utils::entity_id(&entry)
                .and_then(|id| details.get(&id).cloned())
                .unwrap_or(entry)
        })
        .collect()
}
