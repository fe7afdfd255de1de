use serde_json::Value;

use super::{ApiBackend, SoundCloudApi};
use crate::Res;

impl SoundCloudApi {
    /// Resolves a public SoundCloud URL into the entity it points at.
    ///
    /// The mobile API answers with the entity wrapped under its kind
    /// (`{"track": {...}}`); the web API answers with the entity itself, tagged
    /// with a `kind` field.
    pub async fn resolve_url(&self, url: &str) -> Res<Value> {
        let key = match self.backend {
            ApiBackend::Mobile => "identifier",
            ApiBackend::Web => "url",
        };
        self.get("resolve", &[(key, url.to_string())]).await
    }
}
