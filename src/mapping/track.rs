use std::collections::HashMap;

use reqwest::header::AUTHORIZATION;

use super::cover_url;
use crate::{
    soundcloud::ApiBackend,
    types::{Codec, DownloadType, Tags, TrackDocument, TrackInfo},
    utils,
};

pub const PROGRESSIVE_PROTOCOL: &str = "progressive";
pub const SAMPLE_RATE_KHZ: u32 = 48;

pub const ERR_NOT_STREAMABLE: &str = "Track not streamable";
pub const ERR_ALREADY_DOWNLOADED: &str = "Already downloaded in album";

/// Where a track's audio can come from, decided from its document alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamSource {
    /// A progressive transcoding. On the web API `url` still has to be
    /// resolved into the media URL.
    Transcoding { url: String, codec: Codec },
    /// The uploader's original file (web API only); the codec is only known
    /// after probing the download.
    Download,
    Unavailable(String),
}

/// A playable stream, once every lookup is done.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackStream {
    pub url: String,
    pub codec: Codec,
}

/// Picks the stream for a track.
///
/// Tracks flagged non-streamable are unavailable. On the web API a
/// downloadable original wins over transcodings. Otherwise the first
/// progressive transcoding is used, never any other.
///
/// # Arguments
///
/// * `doc` - The raw track document
/// * `backend` - The API the document came from
///
/// # Example
///
/// ```
/// match select_stream(&doc, ApiBackend::Mobile) {
///     StreamSource::Transcoding { url, codec } => println!("{} as {:?}", url, codec),
///     StreamSource::Download => println!("original upload"),
///     StreamSource::Unavailable(reason) => println!("skipped: {}", reason),
/// }
/// ```
pub fn select_stream(doc: &TrackDocument, backend: ApiBackend) -> StreamSource {
    if doc.streamable == Some(false) {
        return StreamSource::Unavailable(ERR_NOT_STREAMABLE.to_string());
    }

    if backend == ApiBackend::Web
        && doc.downloadable == Some(true)
        && doc.has_downloads_left != Some(false)
    {
        return StreamSource::Download;
    }

    select_transcoding(doc)
}

/// First progressive transcoding of a track, ignoring downloadable originals.
pub fn select_transcoding(doc: &TrackDocument) -> StreamSource {
    let Some(transcoding) = doc
        .transcodings()
        .iter()
        .find(|t| t.format.protocol == PROGRESSIVE_PROTOCOL)
    else {
        return StreamSource::Unavailable(ERR_NOT_STREAMABLE.to_string());
    };

    match Codec::from_preset(&transcoding.preset) {
        Some(codec) => StreamSource::Transcoding {
            url: transcoding.url.clone(),
            codec,
        },
        None => StreamSource::Unavailable(format!("Unsupported codec: {}", transcoding.preset)),
    }
}

/// Builds the track record.
///
/// # Arguments
///
/// * `doc` - The raw track document
/// * `stream` - The resolved stream, or the reason there is none
/// * `access_token` - Token for the `Authorization` header of `file_url`
/// * `already_downloaded` - Whether the track was handed out before
///
/// # Returns
///
/// A [`TrackInfo`] whose `error` holds the unavailability reason, or
/// [`ERR_ALREADY_DOWNLOADED`] for a repeat of an available track. Mapping
/// itself never fails.
pub fn map_track(
    doc: &TrackDocument,
    stream: Result<TrackStream, String>,
    access_token: &str,
    already_downloaded: bool,
) -> TrackInfo {
    let (file_url, codec, error) = match stream {
        Ok(stream) => {
            let error = already_downloaded.then(|| ERR_ALREADY_DOWNLOADED.to_string());
            (Some(stream.url), Some(stream.codec), error)
        }
        Err(reason) => (None, None, Some(reason)),
    };

    let download_type = codec
        .map(|c| c.download_type())
        .unwrap_or(DownloadType::Url);

    let mut file_url_headers = HashMap::new();
    file_url_headers.insert(
        AUTHORIZATION.as_str().to_string(),
        utils::auth_header_value(access_token),
    );

    TrackInfo {
        name: doc.title.clone(),
        album: String::new(),
        album_id: String::new(),
        artists: track_artists(doc),
        artist_id: doc.owner.permalink(),
        download_type,
        file_url,
        file_url_headers,
        codec,
        sample_rate: SAMPLE_RATE_KHZ,
        release_year: doc.dates.release_year(),
        cover_url: cover_url(&doc.artwork, &doc.owner),
        tags: Tags {
            genres: genres(doc.genre.as_deref()),
        },
        error,
    }
}

/// Credited artists from the publisher metadata, else the uploader.
fn track_artists(doc: &TrackDocument) -> Vec<String> {
    let credited = doc
        .publisher_metadata
        .as_ref()
        .and_then(|m| m.artist.as_deref())
        .map(utils::split_artists)
        .unwrap_or_default();

    if !credited.is_empty() {
        return credited;
    }

    let username = doc.owner.username();
    if username.is_empty() {
        Vec::new()
    } else {
        vec![username]
    }
}

fn genres(genre: Option<&str>) -> Option<Vec<String>> {
    let genres: Vec<String> = genre?
        .split('/')
        .map(|g| g.trim().to_string())
        .filter(|g| !g.is_empty())
        .collect();

    (!genres.is_empty()).then_some(genres)
}
