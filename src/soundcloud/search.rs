use serde_json::Value;

use super::{ApiBackend, SoundCloudApi};
use crate::{Res, types::EntityKind};

impl SoundCloudApi {
    /// Queries `search/{users,tracks,playlists}`. Albums come back from the
    /// playlist endpoint and are told apart by `is_album`.
    pub async fn search(&self, kind: EntityKind, query: &str, limit: usize) -> Res<Value> {
        let mut params = vec![("q", query.to_string()), ("limit", limit.to_string())];
        if self.backend == ApiBackend::Mobile {
            params.push(("top_results", "v2".to_string()));
        }

        let path = format!("search/{}", kind.search_path());
        self.get(&path, &params).await
    }
}
