//! Best-effort image store for article artwork
//!
//! Each `persist` call validates the article, then hands the download and
//! the atomic file replace to a detached task. Failures are logged and the
//! item is dropped; nothing is ever surfaced to the caller.

use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use directories::ProjectDirs;
use reqwest::StatusCode;
use tempfile::NamedTempFile;
use thiserror::Error;
use tokio::sync::{Mutex, Notify};
use tracing::{error, info};
use url::Url;

use crate::data::Article;
use crate::net::HttpTransport;

/// Errors that can occur when storing image bytes
#[derive(Debug, Error)]
pub enum ImageStoreError {
    /// The article title does not yield a usable file name
    #[error("cannot build a file name from title {0:?}")]
    InvalidTitle(String),

    /// Creating the cache directory or staging file failed
    #[error("filesystem error: {0}")]
    Io(#[from] std::io::Error),

    /// Moving the staged file into place failed
    #[error("failed to move image into the cache: {0}")]
    Replace(#[from] tempfile::PersistError),
}

/// State shared between the store handle and its download tasks
#[derive(Debug)]
struct Inner {
    /// Directory all images are written into
    base_dir: PathBuf,
    /// Transport used for image downloads
    transport: HttpTransport,
    /// One lock per destination path; guards the remove/rename pair
    locks: Mutex<HashMap<PathBuf, Arc<Mutex<()>>>>,
    /// Number of download tasks currently running
    in_flight: AtomicUsize,
    /// Signalled each time a download task finishes
    idle: Notify,
}

/// Stores article images on disk, one detached download task per article
///
/// Cloning the store is cheap and every clone shares the same lock table,
/// so concurrent saves that resolve to the same file stay serialized no
/// matter which handle scheduled them.
#[derive(Debug, Clone)]
pub struct ImageStore {
    inner: Arc<Inner>,
}

impl ImageStore {
    /// Creates a store rooted at the per-user cache directory
    ///
    /// Uses the platform cache path (`~/.cache/newsdesk/images` on Linux).
    /// Returns `None` if the cache directory cannot be determined (e.g. no
    /// home directory).
    pub fn new() -> Option<Self> {
        let project_dirs = ProjectDirs::from("", "", "newsdesk")?;
        Some(Self::with_dir(project_dirs.cache_dir().join("images")))
    }

    /// Creates a store rooted at a specific directory
    ///
    /// Useful for testing or when a dedicated image location is needed.
    pub fn with_dir(base_dir: PathBuf) -> Self {
        Self {
            inner: Arc::new(Inner {
                base_dir,
                transport: HttpTransport::new(),
                locks: Mutex::new(HashMap::new()),
                in_flight: AtomicUsize::new(0),
                idle: Notify::new(),
            }),
        }
    }

    /// Directory this store writes into
    pub fn base_dir(&self) -> &Path {
        &self.inner.base_dir
    }

    /// Schedules the article's image for download and storage
    ///
    /// Fire-and-forget: the call returns as soon as the title and image URL
    /// have been validated, and the download runs on a detached task that
    /// outlives the caller. Every failure is logged and the item dropped;
    /// completion is observable only through the filesystem or the logs.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn persist(&self, article: &Article) {
        let Some(dest) = self.destination(&article.title) else {
            error!("cannot build file name for article: {:?}", article.title);
            return;
        };

        let Some(image_url) = article.image_url.as_deref() else {
            error!("article has no image url: {:?}", article.title);
            return;
        };
        let Ok(image_url) = Url::parse(image_url) else {
            error!(
                "invalid image url {:?} for article: {:?}",
                image_url, article.title
            );
            return;
        };

        self.inner.in_flight.fetch_add(1, Ordering::SeqCst);

        let inner = Arc::clone(&self.inner);
        let title = article.title.clone();
        tokio::spawn(async move {
            inner.download_and_store(&title, &dest, &image_url).await;
            inner.in_flight.fetch_sub(1, Ordering::SeqCst);
            inner.idle.notify_waiters();
        });
    }

    /// Stores already-downloaded image bytes for a title
    ///
    /// Performs the same path resolution and locked replace as `persist`,
    /// without the network step. Returns the path the image was written to.
    #[allow(dead_code)]
    pub async fn store_bytes(&self, title: &str, bytes: &[u8]) -> Result<PathBuf, ImageStoreError> {
        let dest = self
            .destination(title)
            .ok_or_else(|| ImageStoreError::InvalidTitle(title.to_string()))?;

        self.inner.store_bytes_at(&dest, bytes).await?;
        Ok(dest)
    }

    /// Waits until no download tasks are in flight
    ///
    /// Lets a caller drain pending saves before exiting. Individual task
    /// outcomes remain unobserved; this only reports quiescence.
    pub async fn wait_idle(&self) {
        loop {
            // Register for the notification before checking the counter so
            // a task finishing in between cannot be missed.
            let notified = self.inner.idle.notified();
            if self.inner.in_flight.load(Ordering::SeqCst) == 0 {
                return;
            }
            notified.await;
        }
    }

    /// Resolves the destination path for an article title
    ///
    /// Returns `None` when the title cannot form a valid file name.
    fn destination(&self, title: &str) -> Option<PathBuf> {
        let name = sanitized_file_name(title)?;
        Some(self.inner.base_dir.join(name))
    }
}

impl Inner {
    /// Downloads one image and installs it at its destination
    ///
    /// Every failure branch logs and returns; errors never leave the task.
    async fn download_and_store(&self, title: &str, dest: &Path, image_url: &Url) {
        let (status, body) = match self.transport.fetch(image_url.clone()).await {
            Ok(pair) => pair,
            Err(err) => {
                error!("image download failed for {image_url}: {err}");
                return;
            }
        };

        if status != StatusCode::OK {
            error!(
                "image download for {image_url} returned status {}",
                status.as_u16()
            );
            return;
        }

        match self.store_bytes_at(dest, &body).await {
            Ok(()) => info!("image for {title:?} saved to {}", dest.display()),
            Err(err) => error!("failed to store image for {title:?}: {err}"),
        }
    }

    /// Writes bytes to a staging file, then replaces the destination
    ///
    /// The staging file lives in the cache directory itself so the final
    /// move is a rename on the same filesystem.
    async fn store_bytes_at(&self, dest: &Path, bytes: &[u8]) -> Result<(), ImageStoreError> {
        fs::create_dir_all(&self.base_dir)?;

        let mut staged = NamedTempFile::new_in(&self.base_dir)?;
        staged.write_all(bytes)?;
        staged.flush()?;

        let lock = self.lock_for(dest).await;
        let result = {
            let _guard = lock.lock().await;
            replace_file(dest, staged)
        };
        drop(lock);
        self.prune_lock(dest).await;

        result
    }

    /// Looks up or creates the lock guarding one destination path
    async fn lock_for(&self, dest: &Path) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().await;
        Arc::clone(locks.entry(dest.to_path_buf()).or_default())
    }

    /// Drops a path's lock entry once no writer holds it
    ///
    /// A concurrent `lock_for` bumps the entry's reference count before
    /// this runs, so an entry still in use is never removed.
    async fn prune_lock(&self, dest: &Path) {
        let mut locks = self.locks.lock().await;
        if let Some(entry) = locks.get(dest) {
            if Arc::strong_count(entry) == 1 {
                locks.remove(dest);
            }
        }
    }
}

/// Removes any existing file at `dest`, then moves the staged file there
///
/// Callers must hold the destination's lock: the remove/rename pair is the
/// critical section that must not interleave between writers.
fn replace_file(dest: &Path, staged: NamedTempFile) -> Result<(), ImageStoreError> {
    if dest.exists() {
        fs::remove_file(dest)?;
    }
    staged.persist(dest)?;
    Ok(())
}

/// Turns an article title into a safe file name component
///
/// Path separators and NUL bytes become underscores; titles that reduce to
/// nothing, or to the `.`/`..` path components, are rejected.
fn sanitized_file_name(title: &str) -> Option<String> {
    let name: String = title
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | '\0' => '_',
            c => c,
        })
        .collect();

    if name.is_empty() || name == "." || name == ".." {
        return None;
    }
    Some(name)
}
