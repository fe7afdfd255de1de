//! SoundCloud Source Module Library
//!
//! This library lets a host media downloader resolve SoundCloud links, search
//! the catalogue and turn tracks, albums, playlists and artists into the fixed
//! records the host consumes. It talks to either the mobile API or the web v2
//! API and keeps a small in-memory cache of every document it has seen.
//!
//! # Modules
//!
//! - `config` - Module settings and environment loading
//! - `error` - The module error type
//! - `management` - In-memory entity cache and download history
//! - `mapping` - Raw JSON document to record mapping
//! - `module` - The host-facing capability interface and its backends
//! - `remux` - Best-effort container repair for downloaded streams
//! - `soundcloud` - SoundCloud API client implementation
//! - `types` - Data structures and type definitions
//! - `utils` - Utility functions and helpers
//!
//! # Example
//!
//! ```
//! use soundcloud_module::{config, module};
//!
//! #[tokio::main]
//! async fn main() -> soundcloud_module::Res<()> {
//!     config::load_env().await?;
//!     let settings = config::ModuleSettings::from_env()?;
//!     let mut sc = module::build_module(settings)?;
//!     let found = sc.custom_url_parse("https://soundcloud.com/alanwalker/darkside-feat-tomine-harket-au").await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod management;
pub mod mapping;
pub mod module;
pub mod remux;
pub mod soundcloud;
pub mod types;
pub mod utils;

pub use error::ModuleError;

/// A convenient Result type alias for module operations.
///
/// Every fallible operation in the crate reports a [`ModuleError`], so the
/// host can tell transport failures apart from invalid input.
///
/// # Example
///
/// ```
/// use soundcloud_module::Res;
///
/// async fn fetch_data() -> Res<String> {
///     Ok("data".to_string())
/// }
/// ```
pub type Res<T> = std::result::Result<T, ModuleError>;

/// Prints an informational message with a blue bullet point.
///
/// Creates a formatted output line with a distinctive blue "o" indicator
/// followed by the provided message.
///
/// # Example
///
/// ```
/// info!("Fetching {} tracks in batches", count);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
///
/// # Example
///
/// ```
/// success!("Remuxed {}", path.display());
/// ```
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a warning message with a yellow exclamation mark.
///
/// Creates a formatted output line with a yellow "!" indicator to highlight
/// recoverable issues, such as a missing remux tool, that users should notice
/// without the operation failing.
///
/// # Example
///
/// ```
/// warning!("FFmpeg is not installed or working! Using fallback, may have errors");
/// ```
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
