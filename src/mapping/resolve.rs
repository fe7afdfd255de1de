use serde_json::Value;

use crate::{
    types::{EntityKind, MediaIdentification, MediaType},
    utils,
};

/// Entity a URL resolved to, with the document to cache.
#[derive(Debug, Clone)]
pub struct Resolved {
    pub kind: EntityKind,
    pub id: String,
    pub media: MediaIdentification,
    pub document: Value,
}

const RESOLVABLE: [EntityKind; 3] = [EntityKind::User, EntityKind::Track, EntityKind::Playlist];

/// Identifies a resolve response. Understands the mobile shape
/// (`{"track": {...}}`) and the web shape (`{"kind": "track", ...}`).
///
/// A `kind` field wins: web tracks and playlists also carry a `user` object.
///
/// # Returns
///
/// `None` for anything that is not a user, track or playlist, such as
/// system playlists or error documents.
///
/// # Example
///
/// ```
/// let response = json!({"playlist": {"urn": "soundcloud:playlists:12", "is_album": true}});
/// let resolved = identify(&response).unwrap();
/// assert_eq!(resolved.media.media_type, MediaType::Album);
/// ```
pub fn identify(response: &Value) -> Option<Resolved> {
    if let Some(kind) = response.get("kind").and_then(Value::as_str) {
        let kind = RESOLVABLE.into_iter().find(|k| k.as_str() == kind)?;
        return resolved(kind, response);
    }

    RESOLVABLE.into_iter().find_map(|kind| {
        response
            .get(kind.as_str())
            .filter(|d| d.is_object())
            .and_then(|document| resolved(kind, document))
    })
}

fn resolved(kind: EntityKind, document: &Value) -> Option<Resolved> {
    let id = utils::entity_id(document)?;
    let media_type = match kind {
        EntityKind::User => MediaType::Artist,
        EntityKind::Track => MediaType::Track,
        EntityKind::Playlist if is_album(document) => MediaType::Album,
        EntityKind::Playlist => MediaType::Playlist,
    };

    Some(Resolved {
        kind,
        id: id.clone(),
        media: MediaIdentification {
            media_type,
            media_id: id,
        },
        document: document.clone(),
    })
}

pub(crate) fn is_album(document: &Value) -> bool {
    document
        .get("is_album")
        .and_then(Value::as_bool)
        .unwrap_or(false)
}
