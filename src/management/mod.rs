mod cache;
mod history;

pub use cache::EntityCache;
pub use history::DownloadHistory;
