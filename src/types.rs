use std::{collections::HashMap, fmt, path::PathBuf};

use serde::{Deserialize, Serialize};

use crate::utils;

/// Entity kinds the API scopes identifiers to. Albums are playlists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Track,
    Playlist,
    User,
}

impl EntityKind {
    /// Key used by the mobile API to wrap resolved entities, and by the web API
    /// in the `kind` field.
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Track => "track",
            EntityKind::Playlist => "playlist",
            EntityKind::User => "user",
        }
    }

    /// Path segment of the matching search endpoint.
    pub fn search_path(&self) -> &'static str {
        match self {
            EntityKind::Track => "tracks",
            EntityKind::Playlist => "playlists",
            EntityKind::User => "users",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Media types as the host understands them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MediaType {
    Track,
    Album,
    Playlist,
    Artist,
    Label,
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MediaType::Track => "track",
            MediaType::Album => "album",
            MediaType::Playlist => "playlist",
            MediaType::Artist => "artist",
            MediaType::Label => "label",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaIdentification {
    pub media_type: MediaType,
    pub media_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Codec {
    Mp3,
    Aac,
    Opus,
    Vorbis,
    Flac,
    Wav,
    Alac,
}

impl Codec {
    /// Parses the codec from a transcoding preset such as `mp3_0_0` or
    /// `aac_160k`.
    pub fn from_preset(preset: &str) -> Option<Codec> {
        let prefix = preset.split('_').next()?.to_lowercase();
        match prefix.as_str() {
            "mp3" => Some(Codec::Mp3),
            "aac" => Some(Codec::Aac),
            "opus" => Some(Codec::Opus),
            "vorbis" | "ogg" => Some(Codec::Vorbis),
            "flac" => Some(Codec::Flac),
            "wav" => Some(Codec::Wav),
            "alac" => Some(Codec::Alac),
            _ => None,
        }
    }

    /// Parses the codec from a `Content-Type` header value, ignoring parameters.
    pub fn from_content_type(content_type: &str) -> Option<Codec> {
        let mime = content_type.split(';').next()?.trim().to_lowercase();
        match mime.as_str() {
            "audio/mpeg" | "audio/mp3" => Some(Codec::Mp3),
            "audio/mp4" | "audio/x-m4a" | "audio/m4a" | "audio/aac" => Some(Codec::Aac),
            "audio/opus" => Some(Codec::Opus),
            "audio/ogg" | "audio/vorbis" => Some(Codec::Vorbis),
            "audio/flac" | "audio/x-flac" => Some(Codec::Flac),
            "audio/wav" | "audio/x-wav" | "audio/wave" => Some(Codec::Wav),
            "audio/alac" => Some(Codec::Alac),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Codec::Mp3 => "mp3",
            Codec::Aac | Codec::Alac => "m4a",
            Codec::Opus | Codec::Vorbis => "ogg",
            Codec::Flac => "flac",
            Codec::Wav => "wav",
        }
    }

    /// AAC is served with a broken container header and has to be remuxed
    /// from a temporary file.
    pub fn download_type(&self) -> DownloadType {
        match self {
            Codec::Aac => DownloadType::TempFile,
            _ => DownloadType::Url,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadType {
    Url,
    TempFile,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadDescriptor {
    Url {
        url: String,
        headers: HashMap<String, String>,
    },
    TempFile(PathBuf),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tags {
    pub genres: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrackInfo {
    pub name: String,
    /// Always empty: playlists take the place of albums on SoundCloud.
    pub album: String,
    pub album_id: String,
    pub artists: Vec<String>,
    pub artist_id: String,
    pub download_type: DownloadType,
    pub file_url: Option<String>,
    pub file_url_headers: HashMap<String, String>,
    pub codec: Option<Codec>,
    /// kHz
    pub sample_rate: u32,
    pub release_year: Option<i32>,
    pub cover_url: Option<String>,
    pub tags: Tags,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AlbumInfo {
    pub name: String,
    pub artist: String,
    pub artist_id: String,
    pub cover_url: Option<String>,
    pub release_year: Option<i32>,
    pub tracks: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlaylistInfo {
    pub name: String,
    pub creator: String,
    pub creator_id: String,
    pub cover_url: Option<String>,
    pub release_year: Option<i32>,
    pub tracks: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArtistInfo {
    pub name: String,
    pub albums: Vec<String>,
    pub tracks: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    pub result_id: String,
    pub name: String,
    pub artists: Option<Vec<String>>,
}

// Raw API documents. Fields the two APIs disagree on are optional.

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserDocument {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub urn: Option<String>,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub permalink: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Embedded {
    #[serde(default)]
    pub user: Option<UserDocument>,
}

/// Uploader, either inline (`user`, web) or under `_embedded` (mobile).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Owner {
    #[serde(default)]
    pub user: Option<UserDocument>,
    #[serde(default, rename = "_embedded")]
    pub embedded: Option<Embedded>,
}

impl Owner {
    pub fn user(&self) -> Option<&UserDocument> {
        self.embedded
            .as_ref()
            .and_then(|e| e.user.as_ref())
            .or(self.user.as_ref())
    }

    pub fn username(&self) -> String {
        self.user().map(|u| u.username.clone()).unwrap_or_default()
    }

    pub fn permalink(&self) -> String {
        self.user().map(|u| u.permalink.clone()).unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DateFields {
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub display_date: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub published_at: Option<String>,
}

impl DateFields {
    /// Year of the first populated date, preferring `release_date`, then
    /// `display_date`, then `created_at`. `published_at` is only consulted when
    /// none of those is set.
    pub fn release_year(&self) -> Option<i32> {
        [
            &self.release_date,
            &self.display_date,
            &self.created_at,
            &self.published_at,
        ]
        .into_iter()
        .flatten()
        .filter(|d| !d.trim().is_empty())
        .find_map(|d| utils::parse_year(d))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Artwork {
    #[serde(default)]
    pub artwork_url_template: Option<String>,
    #[serde(default)]
    pub artwork_url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TranscodingFormat {
    #[serde(default)]
    pub protocol: String,
    #[serde(default)]
    pub mime_type: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Transcoding {
    pub url: String,
    #[serde(default)]
    pub preset: String,
    #[serde(default)]
    pub format: TranscodingFormat,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Media {
    #[serde(default)]
    pub transcodings: Vec<Transcoding>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PublisherMetadata {
    #[serde(default)]
    pub artist: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrackDocument {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub urn: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub streamable: Option<bool>,
    #[serde(default)]
    pub downloadable: Option<bool>,
    #[serde(default)]
    pub has_downloads_left: Option<bool>,
    #[serde(default)]
    pub media: Option<Media>,
    #[serde(default)]
    pub genre: Option<String>,
    #[serde(default)]
    pub publisher_metadata: Option<PublisherMetadata>,
    #[serde(flatten)]
    pub owner: Owner,
    #[serde(flatten)]
    pub dates: DateFields,
    #[serde(flatten)]
    pub artwork: Artwork,
}

impl TrackDocument {
    pub fn transcodings(&self) -> &[Transcoding] {
        self.media
            .as_ref()
            .map(|m| m.transcodings.as_slice())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlaylistDocument {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub urn: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub is_album: Option<bool>,
    #[serde(flatten)]
    pub owner: Owner,
    #[serde(flatten)]
    pub dates: DateFields,
    #[serde(flatten)]
    pub artwork: Artwork,
}
