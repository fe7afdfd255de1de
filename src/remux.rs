//! Container repair for downloaded streams.
//!
//! AAC streams arrive with a malformed container header. Copying the audio
//! into a fresh container with ffmpeg fixes it. This is best effort: when
//! ffmpeg is missing or fails, the untouched download is used instead.

use std::{
    io,
    path::{Path, PathBuf},
    process::Stdio,
};

use tokio::process::Command;

use crate::{Res, success, utils, warning};

pub const DEFAULT_FFMPEG: &str = "ffmpeg";

#[derive(Debug, Clone)]
pub struct Remuxer {
    program: String,
}

impl Default for Remuxer {
    fn default() -> Self {
        Self::new(DEFAULT_FFMPEG)
    }
}

impl Remuxer {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Remuxes `input` into a new temp file and removes `input`.
    ///
    /// Returns the remuxed file, or `input` itself if remuxing failed.
    pub async fn remux(&self, input: &Path, extension: &str) -> PathBuf {
        let output = utils::create_temp_filename().with_extension(extension);

        match self.run(input, &output).await {
            Ok(()) => {
                let _ = async_fs::remove_file(input).await;
                success!("Remuxed {}", output.display());
                output
            }
            Err(e) => {
                warning!(
                    "FFmpeg is not installed or working! Using fallback, may have errors ({})",
                    e
                );
                let _ = async_fs::remove_file(&output).await;
                input.to_path_buf()
            }
        }
    }

    async fn run(&self, input: &Path, output: &Path) -> Res<()> {
        let status = Command::new(&self.program)
            .arg("-hide_banner")
            .arg("-y")
            .arg("-i")
            .arg(input)
            .args(["-acodec", "copy", "-loglevel", "error"])
            .arg(output)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .status()
            .await?;

        if status.success() {
            Ok(())
        } else {
            Err(io::Error::other(format!("{} exited with {}", self.program, status)).into())
        }
    }
}
