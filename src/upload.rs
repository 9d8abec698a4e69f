//! Staged writes for uploaded image files
//!
//! Incoming bytes land in a hidden staging area inside the upload
//! directory and are promoted into their public name with an atomic
//! rename once the part is fully written. A record insert that fails
//! after promotion discards the file again; whatever a crash leaves
//! behind in staging is removed on the next start. The window between
//! promote and insert can still orphan a file, and no reconciliation
//! pass exists for that case.

use crate::error::ApiResult;
use chrono::Utc;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

const STAGING_DIR: &str = ".staging";
const FALLBACK_NAME: &str = "upload";

/// A partially or fully written upload file
#[derive(Debug)]
pub struct StagedUpload {
    file_name: String,
    staging_path: PathBuf,
    final_path: PathBuf,
    file: Option<fs::File>,
    promoted: bool,
}

impl StagedUpload {
    /// Open a staging file for an incoming part. The public name is
    /// fixed here: arrival epoch millis, a dash, the client-supplied
    /// filename reduced to its final path component.
    pub async fn begin(upload_dir: &Path, original_name: &str) -> ApiResult<Self> {
        let staging_dir = upload_dir.join(STAGING_DIR);
        fs::create_dir_all(&staging_dir).await?;

        let file_name = timestamped_name(original_name);
        let staging_path = staging_dir.join(format!("{}.part", Uuid::new_v4()));
        let final_path = upload_dir.join(&file_name);
        let file = fs::File::create(&staging_path).await?;

        Ok(Self {
            file_name,
            staging_path,
            final_path,
            file: Some(file),
            promoted: false,
        })
    }

    /// Append one chunk of the incoming part
    pub async fn append(&mut self, chunk: &[u8]) -> ApiResult<()> {
        if let Some(file) = self.file.as_mut() {
            file.write_all(chunk).await?;
        }
        Ok(())
    }

    /// Flush and atomically rename the staging file into its public name
    pub async fn promote(&mut self) -> ApiResult<()> {
        if let Some(mut file) = self.file.take() {
            file.flush().await?;
        }
        fs::rename(&self.staging_path, &self.final_path).await?;
        self.promoted = true;
        Ok(())
    }

    /// Remove the file, wherever it currently lives
    pub async fn discard(self) -> ApiResult<()> {
        drop(self.file);
        let path = if self.promoted {
            &self.final_path
        } else {
            &self.staging_path
        };
        fs::remove_file(path).await?;
        Ok(())
    }

    /// Public filename under the upload directory
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Server-relative URL path for the stored record
    pub fn public_path(&self) -> String {
        format!("/uploads/{}", self.file_name)
    }
}

/// Remove files a previous run abandoned in the staging area. Returns
/// how many were removed.
pub async fn sweep_staging(upload_dir: &Path) -> ApiResult<usize> {
    let staging_dir = upload_dir.join(STAGING_DIR);
    let mut entries = match fs::read_dir(&staging_dir).await {
        Ok(entries) => entries,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(0),
        Err(err) => return Err(err.into()),
    };

    let mut removed = 0;
    while let Some(entry) = entries.next_entry().await? {
        if entry.file_type().await?.is_file() {
            fs::remove_file(entry.path()).await?;
            removed += 1;
        }
    }
    Ok(removed)
}

fn timestamped_name(original_name: &str) -> String {
    format!(
        "{}-{}",
        Utc::now().timestamp_millis(),
        sanitize_filename(original_name)
    )
}

/// Reduce a client-supplied filename to a bare final component so the
/// destination cannot leave the upload directory.
fn sanitize_filename(raw: &str) -> String {
    let candidate = raw.rsplit(['/', '\\']).next().unwrap_or(raw).trim();
    if candidate.is_empty() || candidate == "." || candidate == ".." {
        FALLBACK_NAME.to_string()
    } else {
        candidate.to_string()
    }
}
