//! Route handlers for the REST API
//!
//! Handlers are organized by domain:
//! - [`media`] — Probe and download operations
//! - [`system`] — Health, events, OpenAPI, shutdown

use crate::clip::ClipRequest;
use serde::{Deserialize, Serialize};

mod media;
mod system;

// Re-export all handlers so `routes::function_name` continues to work
pub use media::*;
pub use system::*;

// ============================================================================
// Request Types (shared across handlers)
// ============================================================================

/// Request body for POST /api/info
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct InfoRequest {
    /// Video URL to probe
    #[serde(default)]
    pub url: String,
}

/// Request body for POST /api/download
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct DownloadRequest {
    /// Video URL to fetch
    #[serde(default)]
    pub url: String,

    /// Quality label ("144p".."2160p"); an unrecognized value degrades to
    /// best-available, an absent one uses the configured default
    #[serde(default)]
    pub quality: Option<String>,

    /// Optional clip parameters; honored only when enabled with both bounds
    #[serde(default)]
    pub clip: Option<ClipRequest>,
}
