//! Fetch orchestration
//!
//! [`VideoFetcher`] owns the session temp directory, drives the configured
//! [`DownloadSource`] backend, resolves the produced artifact on disk and
//! broadcasts lifecycle events. One long-lived instance serves all in-flight
//! API requests; fetches share nothing but the temp directory, and each
//! fetch's expected output name derives from the resource's own title.

use crate::config::Config;
use crate::error::{Error, Result};
use crate::source::{DownloadSource, FetchPlan, YtDlpSource};
use crate::types::{Event, FetchRequest, FetchedMedia, VideoInfo};
use crate::utils::most_recent_file;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

/// Output template for a full-resource fetch (title/extension substitution)
const OUTPUT_TEMPLATE: &str = "%(title)s.%(ext)s";

/// Output template for a clip fetch
///
/// The epoch component keeps a clip from colliding with an earlier full
/// download of the same title in the session directory.
const CLIP_OUTPUT_TEMPLATE: &str = "%(title)s_clip_%(epoch)s.%(ext)s";

/// Session temp directory, owned for the orchestrator's whole lifetime
///
/// The handle lives behind a mutex so `shutdown()` can take it out and
/// remove the directory explicitly; Drop remains as a backstop if shutdown
/// is never called.
struct TempSession {
    dir: Mutex<Option<TempDir>>,
    path: PathBuf,
}

/// Main orchestrator instance (cloneable - all fields are Arc-wrapped)
#[derive(Clone)]
pub struct VideoFetcher {
    /// Configuration (wrapped in Arc for sharing across tasks)
    pub(crate) config: Arc<Config>,
    /// The media-fetch backend (trait object for pluggable implementations)
    source: Arc<dyn DownloadSource>,
    /// Resolved backend binary, when the backend is the CLI tool
    binary_path: Option<PathBuf>,
    /// Session temp directory
    temp: Arc<TempSession>,
    /// Event broadcast channel sender (multiple subscribers supported)
    event_tx: tokio::sync::broadcast::Sender<Event>,
}

impl VideoFetcher {
    /// Create a new VideoFetcher instance
    ///
    /// This resolves the yt-dlp binary (explicit path from config, or PATH
    /// discovery), creates the session temp directory and sets up the event
    /// broadcast channel.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ToolMissing`] when no usable binary can be resolved
    /// and [`Error::Filesystem`] when the temp directory cannot be created.
    pub fn new(config: Config) -> Result<Self> {
        let binary_path = resolve_binary(&config)?;
        let source = YtDlpSource::new(binary_path.clone())
            .with_extractor_args(config.tools.extractor_args.clone());

        Self::with_source(config, Arc::new(source), Some(binary_path))
    }

    /// Create a VideoFetcher with a custom backend
    ///
    /// Useful for embedding alternative fetch implementations; `binary_path`
    /// is diagnostic only and may be `None` for non-CLI backends.
    pub fn with_source(
        config: Config,
        source: Arc<dyn DownloadSource>,
        binary_path: Option<PathBuf>,
    ) -> Result<Self> {
        let temp_dir = create_temp_dir(&config)?;
        let path = temp_dir.path().to_path_buf();

        tracing::info!(
            backend = source.name(),
            temp_dir = %path.display(),
            "fetcher initialized"
        );

        // Create broadcast channel with buffer size of 1000 events
        // This allows multiple subscribers to receive all events independently
        let (event_tx, _rx) = tokio::sync::broadcast::channel(1000);

        Ok(Self {
            config: Arc::new(config),
            source,
            binary_path,
            temp: Arc::new(TempSession {
                dir: Mutex::new(Some(temp_dir)),
                path,
            }),
            event_tx,
        })
    }

    /// Metadata-only query against the source
    ///
    /// Reports the title, duration, thumbnail and which quality tiers
    /// actually exist for the resource (deduplicated by label, first
    /// occurrence wins). No media bytes are transferred.
    pub async fn probe(&self, url: &str) -> Result<VideoInfo> {
        self.ensure_open()?;
        let url = validate_url(url)?;

        self.emit_event(Event::ProbeStarted { url: url.clone() });

        let result = self.with_time_budget(self.source.probe(&url)).await;

        match &result {
            Ok(info) => {
                self.emit_event(Event::ProbeComplete {
                    url,
                    title: info.title.clone(),
                });
            }
            Err(e) => {
                tracing::warn!(error = %e, "probe failed");
                self.emit_event(Event::ProbeFailed {
                    url,
                    error: e.to_string(),
                });
            }
        }

        result
    }

    /// Run the external fetch and resolve the produced artifact
    ///
    /// With a clip range present, only the requested sub-interval is fetched
    /// (keyframe-aligned, no re-encode) instead of the full resource.
    ///
    /// # Output resolution
    ///
    /// The backend's reported output path is consulted first; if that path
    /// does not exist on disk, the most recently created file in the session
    /// temp directory is used instead. The reported name and the final
    /// on-disk name can diverge after template expansion or container
    /// remuxing, so the reported path is never assumed authoritative.
    pub async fn fetch(&self, request: &FetchRequest) -> Result<FetchedMedia> {
        self.ensure_open()?;
        let url = validate_url(&request.url)?;

        self.emit_event(Event::FetchStarted {
            url: url.clone(),
            quality: request.quality,
            clipped: request.clip.is_some(),
        });

        let result = self.run_fetch(&url, request).await;

        match &result {
            Ok(media) => {
                tracing::info!(
                    url = %url,
                    file = %media.file_name,
                    size_bytes = media.size_bytes,
                    "fetch complete"
                );
                self.emit_event(Event::FetchComplete {
                    url,
                    file_name: media.file_name.clone(),
                    size_bytes: media.size_bytes,
                });
            }
            Err(e) => {
                tracing::warn!(url = %url, error = %e, "fetch failed");
                self.emit_event(Event::FetchFailed {
                    url,
                    error: e.to_string(),
                });
            }
        }

        result
    }

    async fn run_fetch(&self, url: &str, request: &FetchRequest) -> Result<FetchedMedia> {
        let template = if request.clip.is_some() {
            CLIP_OUTPUT_TEMPLATE
        } else {
            OUTPUT_TEMPLATE
        };
        let plan = FetchPlan {
            url: url.to_string(),
            format_expr: request.quality.format_expr(),
            section: request.clip,
            output_template: self.temp.path.join(template).to_string_lossy().into_owned(),
        };

        let reported = self.with_time_budget(self.source.fetch(&plan)).await?;
        let path = resolve_output(reported.as_deref(), &self.temp.path)?;

        let metadata = tokio::fs::metadata(&path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "download".to_string());

        Ok(FetchedMedia {
            path,
            file_name,
            size_bytes: metadata.len(),
        })
    }

    /// Apply the configured per-fetch time budget to an operation
    ///
    /// The backend spawns its child process with kill-on-drop, so abandoning
    /// the future here also terminates the external process.
    async fn with_time_budget<T>(
        &self,
        operation: impl Future<Output = Result<T>>,
    ) -> Result<T> {
        match self.config.fetch_timeout() {
            Some(budget) => match tokio::time::timeout(budget, operation).await {
                Ok(result) => result,
                Err(_) => Err(Error::FetchTimeout {
                    seconds: budget.as_secs(),
                }),
            },
            None => operation.await,
        }
    }

    fn ensure_open(&self) -> Result<()> {
        let guard = self
            .temp
            .dir
            .lock()
            .map_err(|_| Error::ApiServerError("temp session lock poisoned".to_string()))?;
        if guard.is_none() {
            return Err(Error::ShuttingDown);
        }
        Ok(())
    }

    /// Path of the session temp directory
    pub fn temp_path(&self) -> &Path {
        &self.temp.path
    }

    /// Backend name for diagnostics
    pub fn backend_name(&self) -> &'static str {
        self.source.name()
    }

    /// Resolved backend binary path, when the backend is the CLI tool
    pub fn binary_path(&self) -> Option<&PathBuf> {
        self.binary_path.as_ref()
    }

    /// Subscribe to lifecycle events
    ///
    /// Each subscriber receives all events independently via the broadcast
    /// channel.
    pub fn subscribe(&self) -> tokio::sync::broadcast::Receiver<Event> {
        self.event_tx.subscribe()
    }

    /// Get the current configuration
    pub fn get_config(&self) -> Arc<Config> {
        Arc::clone(&self.config)
    }

    /// Emit an event to all subscribers
    ///
    /// If there are no active subscribers the event is silently dropped;
    /// fetching continues even when no one is listening.
    pub(crate) fn emit_event(&self, event: Event) {
        self.event_tx.send(event).ok();
    }

    /// Spawn the REST API server in a background task
    ///
    /// The server runs concurrently with fetch processing and listens on the
    /// configured bind address (default: 127.0.0.1:5000).
    pub fn spawn_api_server(self: &Arc<Self>) -> tokio::task::JoinHandle<Result<()>> {
        let fetcher = self.clone();
        let config = fetcher.get_config();

        tokio::spawn(async move { crate::api::start_api_server(fetcher, config).await })
    }

    /// Shut down the orchestrator
    ///
    /// New probe/fetch calls are refused from this point on. The session
    /// temp directory and everything in it are removed; a removal failure is
    /// logged and swallowed, since it cannot affect any response.
    pub async fn shutdown(&self) -> Result<()> {
        let taken = self
            .temp
            .dir
            .lock()
            .map_err(|_| Error::ApiServerError("temp session lock poisoned".to_string()))?
            .take();

        let Some(temp_dir) = taken else {
            // Already shut down
            return Ok(());
        };

        tracing::info!(temp_dir = %self.temp.path.display(), "shutting down");
        self.emit_event(Event::Shutdown);

        if let Err(e) = temp_dir.close() {
            tracing::warn!(
                error = %e,
                temp_dir = %self.temp.path.display(),
                "failed to remove session temp directory"
            );
        }

        Ok(())
    }
}

/// Resolve the yt-dlp binary from config or PATH
fn resolve_binary(config: &Config) -> Result<PathBuf> {
    if let Some(path) = &config.tools.ytdlp_path {
        return Ok(path.clone());
    }
    if config.tools.search_path
        && let Ok(path) = which::which("yt-dlp")
    {
        return Ok(path);
    }
    Err(Error::ToolMissing(
        "yt-dlp not found: set tools.ytdlp_path or install it in PATH".to_string(),
    ))
}

/// Create the session temp directory, honoring a configured parent
fn create_temp_dir(config: &Config) -> Result<TempDir> {
    let result = match &config.fetch.temp_parent_dir {
        Some(parent) => {
            std::fs::create_dir_all(parent).map_err(|e| Error::Filesystem {
                message: format!("failed to create temp parent '{}': {e}", parent.display()),
                path: Some(parent.clone()),
            })?;
            TempDir::with_prefix_in("vidclip-", parent)
        }
        None => TempDir::with_prefix("vidclip-"),
    };

    result.map_err(|e| Error::Filesystem {
        message: format!("failed to create session temp directory: {e}"),
        path: config.fetch.temp_parent_dir.clone(),
    })
}

/// Check a caller-supplied URL
fn validate_url(url: &str) -> Result<String> {
    let trimmed = url.trim();
    if trimmed.is_empty() {
        return Err(Error::InvalidInput("url is required".to_string()));
    }
    url::Url::parse(trimmed).map_err(|e| Error::InvalidInput(format!("invalid url: {e}")))?;
    Ok(trimmed.to_string())
}

/// Locate the artifact the external tool produced
///
/// The tool's reported path is trusted only if it exists on disk; otherwise
/// the most recently created file in the temp directory is used. An empty
/// directory after the operation is a fetch failure.
fn resolve_output(reported: Option<&Path>, temp_dir: &Path) -> Result<PathBuf> {
    if let Some(path) = reported
        && path.is_file()
    {
        return Ok(path.to_path_buf());
    }

    if let Some(path) = reported {
        tracing::debug!(
            reported = %path.display(),
            "reported output path missing on disk, scanning temp directory"
        );
    }

    match most_recent_file(temp_dir)? {
        Some(path) => Ok(path),
        None => Err(Error::Fetch(
            "fetch produced no locatable output file".to_string(),
        )),
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
pub(crate) mod test_helpers;
