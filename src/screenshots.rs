use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tracing::info;

use crate::config::SCREENSHOT_URL_PREFIX;
use crate::error::AuditError;

/// Write-once store for captured screenshots.
#[derive(Debug, Clone)]
pub struct ScreenshotStore {
    dir: PathBuf,
}

impl ScreenshotStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Persist `png` under a fresh name and return the public path it is
    /// served from.
    pub async fn save(&self, png: &[u8]) -> Result<String, AuditError> {
        tokio::fs::create_dir_all(&self.dir).await?;

        let file_name = format!(
            "screenshot_{}_{}.png",
            chrono::Utc::now().timestamp(),
            &uuid::Uuid::new_v4().simple().to_string()[..8]
        );
        let path = self.dir.join(&file_name);

        // create_new: a name collision must never overwrite an earlier capture
        let mut file = tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await?;
        file.write_all(png).await?;
        file.flush().await?;

        info!("Saved screenshot to {:?}", path);
        Ok(format!("{}/{}", SCREENSHOT_URL_PREFIX, file_name))
    }
}
