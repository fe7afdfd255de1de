use std::collections::HashMap;

use serde_json::Value;

use crate::types::EntityKind;

/// Last raw document seen per entity.
///
/// Filled opportunistically from resolve, search and listing responses and
/// never evicted. A miss only means the caller has to fetch the entity.
#[derive(Debug, Default)]
pub struct EntityCache {
    entries: HashMap<(EntityKind, String), Value>,
}

impl EntityCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, kind: EntityKind, id: impl Into<String>, document: Value) -> &mut Self {
        self.entries.insert((kind, id.into()), document);
        self
    }

    pub fn extend<I>(&mut self, kind: EntityKind, documents: I) -> &mut Self
    where
        I: IntoIterator<Item = (String, Value)>,
    {
        for (id, document) in documents {
            self.entries.insert((kind, id), document);
        }
        self
    }

    pub fn get(&self, kind: EntityKind, id: &str) -> Option<&Value> {
        self.entries.get(&(kind, id.to_string()))
    }

    pub fn contains(&self, kind: EntityKind, id: &str) -> bool {
        self.get(kind, id).is_some()
    }

    pub fn count(&self, kind: EntityKind) -> usize {
        self.entries.keys().filter(|(k, _)| *k == kind).count()
    }
}
