/// Track ids already handed out in this session.
///
/// Append-only and process-local: an at-most-once heuristic that keeps artist
/// downloads from fetching album tracks a second time, not a guarantee.
#[derive(Debug, Default)]
pub struct DownloadHistory {
    seen: Vec<String>,
}

impl DownloadHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, track_id: String) {
        self.seen.push(track_id);
    }

    pub fn has(&self, track_id: &str) -> bool {
        self.seen.iter().any(|id| id == track_id)
    }

    pub fn get_seen(&self) -> &Vec<String> {
        &self.seen
    }
}
