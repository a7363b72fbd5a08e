//! Upload and result files under the static root.

use chrono::Local;
use std::path::{Component, Path, PathBuf};

/// A file written below the static root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    /// Location on disk
    pub path: PathBuf,
    /// URL under `/static` the file is served from
    pub url: String,
}

/// Writes original uploads and processed results.
pub struct ResultStore {
    static_dir: PathBuf,
    upload_dir: PathBuf,
    result_dir: PathBuf,
}

impl ResultStore {
    /// `upload_dir` and `result_dir` are relative to `static_dir`.
    pub fn new(static_dir: &Path, upload_dir: &Path, result_dir: &Path) -> Self {
        Self {
            static_dir: static_dir.to_path_buf(),
            upload_dir: upload_dir.to_path_buf(),
            result_dir: result_dir.to_path_buf(),
        }
    }

    /// Create the upload and result directories if needed.
    pub fn ensure_dirs(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(self.static_dir.join(&self.upload_dir))?;
        std::fs::create_dir_all(self.static_dir.join(&self.result_dir))?;
        tracing::info!(
            uploads = %self.static_dir.join(&self.upload_dir).display(),
            results = %self.static_dir.join(&self.result_dir).display(),
            "Storage directories ready"
        );
        Ok(())
    }

    /// Save an upload under its sanitized client file name.
    ///
    /// A second upload with the same name replaces the first.
    pub async fn save_upload(&self, file_name: &str, bytes: &[u8]) -> std::io::Result<StoredFile> {
        let name = sanitize_file_name(file_name);
        self.write(&self.upload_dir, &name, bytes).await
    }

    /// Save a processed PNG under a timestamped name.
    pub async fn save_result(&self, png: &[u8]) -> std::io::Result<StoredFile> {
        let name = result_file_name();
        self.write(&self.result_dir, &name, png).await
    }

    async fn write(&self, dir: &Path, name: &str, bytes: &[u8]) -> std::io::Result<StoredFile> {
        let relative = dir.join(name);
        let path = self.static_dir.join(&relative);
        tokio::fs::write(&path, bytes).await?;
        tracing::debug!(path = %path.display(), bytes = bytes.len(), "Stored file");
        Ok(StoredFile {
            path,
            url: static_url(&relative),
        })
    }
}

/// `result_<YYYYmmdd_HHMMSS_micros>.png` in local time.
pub fn result_file_name() -> String {
    format!("result_{}.png", Local::now().format("%Y%m%d_%H%M%S_%6f"))
}

/// Reduce a client-supplied file name to a safe single path component.
///
/// Directory parts are dropped and anything outside `[A-Za-z0-9._-]`
/// becomes `_`. Leading dots are removed so the result is never hidden or
/// a parent reference.
pub fn sanitize_file_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or("");
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned.to_string()
    }
}

fn static_url(relative: &Path) -> String {
    let parts: Vec<String> = relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();
    format!("/static/{}", parts.join("/"))
}
