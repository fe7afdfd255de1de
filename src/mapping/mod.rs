//! Pure translation of raw API documents into the records the host consumes.
//!
//! Nothing here performs I/O. Where a record depends on a network answer
//! (web stream URLs, content-type probes) the caller resolves it first and
//! passes the outcome in.

mod collection;
mod resolve;
mod search;
mod track;

pub use collection::{map_album, map_artist, map_playlist};
pub use resolve::{Resolved, identify};
pub use search::{SearchPlan, map_search_results, plan_search};
pub use track::{
    ERR_ALREADY_DOWNLOADED, ERR_NOT_STREAMABLE, StreamSource, TrackStream, map_track,
    select_stream, select_transcoding,
};

use crate::types::{Artwork, Owner};

/// Full-size cover, falling back to the uploader's avatar.
pub(crate) fn cover_url(artwork: &Artwork, owner: &Owner) -> Option<String> {
    crate::utils::original_artwork(
        artwork.artwork_url_template.as_deref(),
        artwork.artwork_url.as_deref(),
    )
    .or_else(|| {
        owner
            .user()
            .and_then(|u| u.avatar_url.as_deref())
            .and_then(|avatar| crate::utils::original_artwork(None, Some(avatar)))
    })
}
