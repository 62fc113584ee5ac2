//! Full-screen capture for `deck-screen`.
//!
//! Grabs the primary monitor with `xcap` and writes it as a timestamped PNG.
//! The returned [`TempCapture`] owns that file and removes it when dropped,
//! so the PNG is cleaned up whether or not the upload succeeded.

use anyhow::{bail, Context, Result};
use image::ImageFormat;
use std::fs;
use std::path::{Path, PathBuf};
use xcap::Monitor;

/// A captured screenshot on disk, deleted on drop unless [`keep`](Self::keep) is called.
#[derive(Debug)]
pub struct TempCapture {
    path: PathBuf,
    keep: bool,
}

impl TempCapture {
    pub fn new(path: PathBuf) -> Self {
        Self { path, keep: false }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Leave the file in place after this guard goes away.
    pub fn keep(&mut self) {
        self.keep = true;
    }
}

impl Drop for TempCapture {
    fn drop(&mut self) {
        if self.keep || !self.path.exists() {
            return;
        }
        match fs::remove_file(&self.path) {
            Ok(()) => log::info!("Removed temporary capture {}", self.path.display()),
            Err(e) => log::warn!(
                "Failed to remove temporary capture {}: {}",
                self.path.display(),
                e
            ),
        }
    }
}

/// `screen_<YYYYmmdd_HHMMSS>.png` for the given local time.
pub fn capture_file_name(at: chrono::DateTime<chrono::Local>) -> String {
    format!("screen_{}.png", at.format("%Y%m%d_%H%M%S"))
}

/// Capture the primary monitor into `dir` and hand back the guard for the PNG.
pub fn capture_fullscreen(dir: &Path) -> Result<TempCapture> {
    let monitors = Monitor::all().context("Failed to enumerate monitors")?;
    let monitor = monitors
        .iter()
        .find(|m| m.is_primary())
        .or_else(|| monitors.first())
        .context("No monitors found")?;

    let image = monitor
        .capture_image()
        .context("Failed to capture screen. On macOS, grant Screen Recording permission to the terminal")?;
    if image.width() == 0 || image.height() == 0 {
        bail!("Captured empty screenshot - possible permission issue or no display");
    }

    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create capture directory {}", dir.display()))?;
    let capture = TempCapture::new(dir.join(capture_file_name(chrono::Local::now())));
    image
        .save_with_format(capture.path(), ImageFormat::Png)
        .with_context(|| format!("Failed to save capture to {}", capture.path().display()))?;

    log::info!(
        "Captured {}x{} screen to {}",
        image.width(),
        image.height(),
        capture.path().display()
    );
    Ok(capture)
}
