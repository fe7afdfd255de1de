use serde_json::Value;

use super::resolve::is_album;
use crate::{
    ModuleError, Res,
    types::{EntityKind, MediaType, Owner, SearchResult},
    utils,
};

/// Playlists and albums share an endpoint, so playlist searches ask for this
/// many times the limit before filtering.
pub const PLAYLIST_OVERFETCH: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchPlan {
    pub endpoint: EntityKind,
    pub mode: MediaType,
    pub fetch_limit: usize,
}

/// Endpoint and fetch size for a search.
///
/// # Arguments
///
/// * `query_type` - Requested media type; labels are not searchable
/// * `limit` - Number of results the caller wants
///
/// # Returns
///
/// Returns a `Result` containing:
/// - `Ok(SearchPlan)` - Playlist and album searches fetch
///   `limit * PLAYLIST_OVERFETCH` (saturating) to survive the `is_album` filter
/// - `Err(ModuleError::InvalidInput)` - `Query type label is unsupported`
///
/// # Example
///
/// ```
/// let plan = plan_search(MediaType::Album, 5)?;
/// assert_eq!(plan.fetch_limit, 20);
/// ```
pub fn plan_search(query_type: MediaType, limit: usize) -> Res<SearchPlan> {
    let endpoint = match query_type {
        MediaType::Artist => EntityKind::User,
        MediaType::Track => EntityKind::Track,
        MediaType::Playlist | MediaType::Album => EntityKind::Playlist,
        other => {
            return Err(ModuleError::invalid_input(format!(
                "Query type {} is unsupported",
                other
            )));
        }
    };

    let fetch_limit = match endpoint {
        EntityKind::Playlist => limit.saturating_mul(PLAYLIST_OVERFETCH),
        _ => limit,
    };

    Ok(SearchPlan {
        endpoint,
        mode: query_type,
        fetch_limit,
    })
}

/// Maps a search `collection` into at most `limit` results, keeping only
/// albums or only plain playlists for playlist-endpoint searches. Each result
/// is returned with its id and document so the caller can cache it.
pub fn map_search_results(
    plan: &SearchPlan,
    collection: &[Value],
    limit: usize,
) -> Vec<(String, Value, SearchResult)> {
    collection
        .iter()
        .filter(|doc| match plan.endpoint {
            EntityKind::Playlist => is_album(doc) == (plan.mode == MediaType::Album),
            _ => true,
        })
        .filter_map(|doc| {
            let id = utils::entity_id(doc)?;
            let result = summarize(plan.endpoint, &id, doc);
            Some((id, doc.clone(), result))
        })
        .take(limit)
        .collect()
}

fn summarize(endpoint: EntityKind, id: &str, doc: &Value) -> SearchResult {
    let text = |key: &str| {
        doc.get(key)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    };

    match endpoint {
        EntityKind::User => SearchResult {
            result_id: id.to_string(),
            name: text("username"),
            artists: None,
        },
        _ => {
            let owner: Owner = serde_json::from_value(doc.clone()).unwrap_or_default();
            SearchResult {
                result_id: id.to_string(),
                name: text("title"),
                artists: Some(vec![owner.username()]),
            }
        }
    }
}
