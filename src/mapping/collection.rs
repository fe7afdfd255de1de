use super::cover_url;
use crate::types::{AlbumInfo, ArtistInfo, PlaylistDocument, PlaylistInfo, UserDocument};

/// Album record from a playlist document flagged `is_album`.
///
/// # Arguments
///
/// * `doc` - The raw playlist document
/// * `tracks` - Track ids in album order
pub fn map_album(doc: &PlaylistDocument, tracks: Vec<String>) -> AlbumInfo {
    AlbumInfo {
        name: doc.title.clone(),
        artist: doc.owner.username(),
        artist_id: doc.owner.permalink(),
        cover_url: cover_url(&doc.artwork, &doc.owner),
        release_year: doc.dates.release_year(),
        tracks,
    }
}

/// Playlist record; the uploader is reported as the creator.
pub fn map_playlist(doc: &PlaylistDocument, tracks: Vec<String>) -> PlaylistInfo {
    PlaylistInfo {
        name: doc.title.clone(),
        creator: doc.owner.username(),
        creator_id: doc.owner.permalink(),
        cover_url: cover_url(&doc.artwork, &doc.owner),
        release_year: doc.dates.release_year(),
        tracks,
    }
}

pub fn map_artist(user: &UserDocument, albums: Vec<String>, tracks: Vec<String>) -> ArtistInfo {
    ArtistInfo {
        name: user.username.clone(),
        albums,
        tracks,
    }
}
