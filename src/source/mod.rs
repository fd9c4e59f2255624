//! Pluggable media-fetch backends
//!
//! The orchestrator talks to the external world through the
//! [`DownloadSource`] trait so the actual tool invocation stays swappable
//! (and mockable in tests). The production implementation is
//! [`YtDlpSource`], which drives the yt-dlp binary.

use crate::clip::ClipRange;
use crate::error::Result;
use crate::types::VideoInfo;
use async_trait::async_trait;
use std::path::PathBuf;

mod ytdlp;

pub use ytdlp::YtDlpSource;

/// Fully-resolved parameters for one external fetch invocation
///
/// Everything the backend needs is marshaled up front; the backend itself
/// does no quality or clip resolution.
#[derive(Clone, Debug)]
pub struct FetchPlan {
    /// Source URL
    pub url: String,

    /// Format-selection expression (see [`crate::quality::QualityLabel::format_expr`])
    pub format_expr: String,

    /// Optional sub-interval to extract; when present the cut is requested
    /// keyframe-aligned so no re-encode is needed
    pub section: Option<ClipRange>,

    /// Output path template with title/extension substitution, rooted in the
    /// session temp directory
    pub output_template: String,
}

/// A backend capable of probing and fetching remote media
///
/// Implementations must be safe to share across concurrent requests; the
/// orchestrator holds a single instance for its whole lifetime.
#[async_trait]
pub trait DownloadSource: Send + Sync {
    /// Backend name for diagnostics ("yt-dlp", ...)
    fn name(&self) -> &'static str;

    /// Metadata-only query against the source; no media bytes transferred
    async fn probe(&self, url: &str) -> Result<VideoInfo>;

    /// Run the external fetch described by `plan`
    ///
    /// Returns the output path the tool reported, if its output disclosed
    /// one. The reported path is a hint, not a guarantee - the file the tool
    /// finally writes can differ after template expansion or remuxing, which
    /// is why the orchestrator owns the on-disk resolution fallback.
    async fn fetch(&self, plan: &FetchPlan) -> Result<Option<PathBuf>>;
}
