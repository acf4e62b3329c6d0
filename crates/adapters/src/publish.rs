// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Report publishing: cloud bucket or local directory.

use crate::subprocess::{run_checked, CLI_TIMEOUT};
use async_trait::async_trait;
use std::path::PathBuf;
use thiserror::Error;
use tokio::process::Command;

/// Errors from publish operations
#[derive(Debug, Error)]
pub enum PublishError {
    #[error("io error at {path}: {source}")]
    Io { path: String, source: std::io::Error },
    #[error("upload failed: {0}")]
    Upload(String),
    #[error("could not read stored reports: {0}")]
    Fetch(String),
}

/// Adapter for storing rendered reports where readers can open them
#[async_trait]
pub trait ReportPublisher: Clone + Send + Sync + 'static {
    /// Store `html` at `relative_path` under the report root and return its URL
    async fn publish(&self, relative_path: &str, html: &str) -> Result<String, PublishError>;

    /// Relative paths of the files directly under `dir`, sorted
    async fn list(&self, dir: &str) -> Result<Vec<String>, PublishError>;

    /// Contents of a stored report
    async fn read(&self, relative_path: &str) -> Result<String, PublishError>;

    /// URL readers open for the report at `relative_path`
    fn url(&self, relative_path: &str) -> String;
}

/// Files named in a `gsutil ls` listing, relative to `root`. Sub-folders are skipped.
pub fn listed_files(root: &str, stdout: &str) -> Vec<String> {
    let prefix = format!("{}/", root.trim_end_matches('/'));
    let mut files: Vec<String> = stdout
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.ends_with('/'))
        .filter_map(|line| line.strip_prefix(&prefix))
        .map(str::to_string)
        .collect();
    files.sort();
    files
}

async fn write_file(path: &std::path::Path, html: &str) -> Result<(), PublishError> {
    let io_err = |source| PublishError::Io { path: path.display().to_string(), source };
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await.map_err(io_err)?;
    }
    tokio::fs::write(path, html).await.map_err(io_err)
}

/// Uploads reports to a `gs://` prefix with `gsutil` and makes them public.
#[derive(Clone, Debug)]
pub struct GsutilPublisher {
    root: String,
    staging: PathBuf,
}

impl GsutilPublisher {
    /// `root` is a `gs://bucket/prefix/` path; `staging` a local scratch directory.
    pub fn new(root: impl Into<String>, staging: impl Into<PathBuf>) -> Self {
        Self { root: root.into(), staging: staging.into() }
    }

    fn remote_path(&self, relative_path: &str) -> String {
        format!("{}/{}", self.root.trim_end_matches('/'), relative_path)
    }
}

#[async_trait]
impl ReportPublisher for GsutilPublisher {
    async fn publish(&self, relative_path: &str, html: &str) -> Result<String, PublishError> {
        let local = self.staging.join(relative_path);
        write_file(&local, html).await?;
        let remote = self.remote_path(relative_path);

        let mut cp = Command::new("gsutil");
        cp.arg("cp").arg(&local).arg(&remote);
        run_checked(cp, CLI_TIMEOUT, "gsutil cp").await.map_err(PublishError::Upload)?;

        let mut acl = Command::new("gsutil");
        acl.args(["acl", "ch", "-u", "AllUsers:R", &remote]);
        run_checked(acl, CLI_TIMEOUT, "gsutil acl ch").await.map_err(PublishError::Upload)?;

        let url = self.url(relative_path);
        tracing::info!(%url, "report published");
        Ok(url)
    }

    async fn list(&self, dir: &str) -> Result<Vec<String>, PublishError> {
        let mut ls = Command::new("gsutil");
        ls.arg("ls").arg(format!("{}/", self.remote_path(dir.trim_end_matches('/'))));
        let stdout = run_checked(ls, CLI_TIMEOUT, "gsutil ls").await.map_err(PublishError::Fetch)?;
        Ok(listed_files(&self.root, &stdout))
    }

    async fn read(&self, relative_path: &str) -> Result<String, PublishError> {
        let mut cat = Command::new("gsutil");
        cat.arg("cat").arg(self.remote_path(relative_path));
        run_checked(cat, CLI_TIMEOUT, "gsutil cat").await.map_err(PublishError::Fetch)
    }

    fn url(&self, relative_path: &str) -> String {
        fwt_core::links::public_url(&self.remote_path(relative_path))
    }
}

/// Writes reports under a local directory.
#[derive(Clone, Debug)]
pub struct DirectoryPublisher {
    root: PathBuf,
}

impl DirectoryPublisher {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl ReportPublisher for DirectoryPublisher {
    async fn publish(&self, relative_path: &str, html: &str) -> Result<String, PublishError> {
        let path = self.root.join(relative_path);
        write_file(&path, html).await?;
        tracing::info!(path = %path.display(), "report written");
        Ok(self.url(relative_path))
    }

    async fn list(&self, dir: &str) -> Result<Vec<String>, PublishError> {
        let dir = dir.trim_end_matches('/');
        let path = self.root.join(dir);
        let io_err = |source| PublishError::Io { path: path.display().to_string(), source };
        let mut entries = tokio::fs::read_dir(&path).await.map_err(io_err)?;
        let mut files = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(io_err)? {
            if entry.file_type().await.map_err(io_err)?.is_file() {
                files.push(format!("{}/{}", dir, entry.file_name().to_string_lossy()));
            }
        }
        files.sort();
        Ok(files)
    }

    async fn read(&self, relative_path: &str) -> Result<String, PublishError> {
        let path = self.root.join(relative_path);
        tokio::fs::read_to_string(&path)
            .await
            .map_err(|source| PublishError::Io { path: path.display().to_string(), source })
    }

    fn url(&self, relative_path: &str) -> String {
        self.root.join(relative_path).display().to_string()
    }
}

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(coverage_nightly, coverage(off))]
mod fake {
    use super::{PublishError, ReportPublisher};
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::sync::Arc;

    /// Recorded publish call
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct Published {
        pub path: String,
        pub html: String,
    }

    /// Fake publisher for testing; URLs are `https://reports.test/<path>`
    #[derive(Clone, Default)]
    pub struct FakePublisher {
        inner: Arc<Mutex<Vec<Published>>>,
    }

    impl FakePublisher {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn published(&self) -> Vec<Published> {
            self.inner.lock().clone()
        }

        /// HTML of the most recent publish to `path`
        pub fn html(&self, path: &str) -> Option<String> {
            self.inner.lock().iter().rev().find(|p| p.path == path).map(|p| p.html.clone())
        }
    }

    #[async_trait]
    impl ReportPublisher for FakePublisher {
        async fn publish(&self, relative_path: &str, html: &str) -> Result<String, PublishError> {
            self.inner
                .lock()
                .push(Published { path: relative_path.to_string(), html: html.to_string() });
            Ok(self.url(relative_path))
        }

        async fn list(&self, dir: &str) -> Result<Vec<String>, PublishError> {
            let prefix = format!("{}/", dir.trim_end_matches('/'));
            let mut files: Vec<String> = self
                .inner
                .lock()
                .iter()
                .filter_map(|p| p.path.strip_prefix(&prefix).map(|rest| (rest, &p.path)))
                .filter(|(rest, _)| !rest.contains('/'))
                .map(|(_, path)| path.clone())
                .collect();
            files.sort();
            files.dedup();
            Ok(files)
        }

        async fn read(&self, relative_path: &str) -> Result<String, PublishError> {
            self.html(relative_path)
                .ok_or_else(|| PublishError::Fetch(format!("no report at {}", relative_path)))
        }

        fn url(&self, relative_path: &str) -> String {
            format!("https://reports.test/{}", relative_path)
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakePublisher, Published};

#[cfg(test)]
#[path = "publish_tests.rs"]
mod tests;
