//! Core types for vidclip-dl

use crate::clip::ClipRange;
use crate::quality::QualityLabel;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::PathBuf;
use utoipa::ToSchema;

/// A fully-resolved fetch request
///
/// Invariants are enforced upstream: `url` is non-empty, and `clip` is
/// either fully present or absent (partial clip bounds never reach here).
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct FetchRequest {
    /// Source URL of the video resource
    pub url: String,

    /// Requested quality tier
    #[serde(default)]
    pub quality: QualityLabel,

    /// Optional sub-interval to extract instead of the full resource
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clip: Option<ClipRange>,
}

impl FetchRequest {
    /// Convenience constructor for a full-resource fetch
    pub fn new(url: impl Into<String>, quality: QualityLabel) -> Self {
        Self {
            url: url.into(),
            quality,
            clip: None,
        }
    }

    /// Attach a clip range
    pub fn with_clip(mut self, clip: ClipRange) -> Self {
        self.clip = Some(clip);
        self
    }
}

/// The artifact produced by a successful fetch
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct FetchedMedia {
    /// Absolute path of the media file inside the session temp directory
    #[schema(value_type = String)]
    pub path: PathBuf,

    /// File name component of `path`, used as the attachment name
    pub file_name: String,

    /// File size in bytes
    pub size_bytes: u64,
}

/// Metadata about a remote video resource, gathered without downloading it
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct VideoInfo {
    /// Video title as reported by the source
    pub title: String,

    /// Duration in seconds (0 when the source does not report one)
    pub duration: u64,

    /// Thumbnail URL, empty when the source does not report one
    pub thumbnail: String,

    /// Quality tiers actually available for this resource
    pub formats: Vec<FormatInfo>,
}

/// One available quality tier of a remote resource
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct FormatInfo {
    /// Quality label this stream maps to
    pub quality: QualityLabel,

    /// Source-side format identifier
    pub format_id: String,

    /// Container extension ("mp4", "webm", ...)
    pub ext: String,

    /// File size in bytes, 0 when unknown
    pub filesize: u64,
}

/// Deduplicate a format list by quality label, first occurrence wins
///
/// The source typically reports several encodings per tier; callers only
/// care which tiers exist, so later duplicates are dropped while the
/// original ordering is preserved.
pub fn dedup_formats(formats: Vec<FormatInfo>) -> Vec<FormatInfo> {
    let mut seen: HashSet<QualityLabel> = HashSet::new();
    formats
        .into_iter()
        .filter(|f| seen.insert(f.quality))
        .collect()
}

/// Event emitted during the fetch lifecycle
///
/// Events are broadcast to all subscribers; the API bridges them to an SSE
/// stream. A dropped event (no subscribers) is not an error.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// Metadata probe started
    ProbeStarted {
        /// Source URL being probed
        url: String,
    },

    /// Metadata probe finished successfully
    ProbeComplete {
        /// Source URL that was probed
        url: String,
        /// Title reported by the source
        title: String,
    },

    /// Metadata probe failed
    ProbeFailed {
        /// Source URL that was probed
        url: String,
        /// Error message
        error: String,
    },

    /// Fetch started
    FetchStarted {
        /// Source URL being fetched
        url: String,
        /// Requested quality tier
        quality: QualityLabel,
        /// Whether a clip sub-interval was requested
        clipped: bool,
    },

    /// Fetch finished and the artifact was resolved on disk
    FetchComplete {
        /// Source URL that was fetched
        url: String,
        /// Resolved artifact file name
        file_name: String,
        /// Artifact size in bytes
        size_bytes: u64,
    },

    /// Fetch failed
    FetchFailed {
        /// Source URL that was fetched
        url: String,
        /// Error message
        error: String,
    },

    /// Orchestrator is shutting down
    Shutdown,
}
