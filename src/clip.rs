//! Clip range parsing and the trim directive
//!
//! A clip is only honored when the caller explicitly enables it and supplies
//! both bounds; partial input is treated as "no clip" rather than an error.
//! Timestamps are colon-separated with right-to-left significance, so `45`,
//! `02:03` and `01:02:03` are all valid.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Parse a timestamp string into whole seconds
///
/// Components are colon-separated and weighted right-to-left (seconds,
/// minutes, hours). More than three components or a non-numeric component
/// is an error.
pub fn parse_timestamp(input: &str) -> Result<u64> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(Error::InvalidInput("empty timestamp".to_string()));
    }

    let parts: Vec<&str> = trimmed.split(':').collect();
    if parts.len() > 3 {
        return Err(Error::InvalidInput(format!(
            "timestamp '{trimmed}' has more than three components"
        )));
    }

    let mut seconds: u64 = 0;
    for part in &parts {
        let value: u64 = part.trim().parse().map_err(|_| {
            Error::InvalidInput(format!("timestamp '{trimmed}' has a non-numeric component"))
        })?;
        seconds = seconds * 60 + value;
    }

    Ok(seconds)
}

/// Wire-level clip request as sent by API callers
///
/// All fields are optional on the wire; [`ClipRange::from_request`] decides
/// whether the combination amounts to a usable clip.
#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClipRequest {
    /// Whether clipping was explicitly enabled by the caller
    #[serde(default)]
    pub enabled: bool,

    /// Clip start, as seconds or a `HH:MM:SS`/`MM:SS` string
    #[serde(default)]
    pub start_time: Option<String>,

    /// Clip end, same formats as `start_time`
    #[serde(default)]
    pub end_time: Option<String>,
}

/// A resolved, validated clip interval in whole seconds
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ClipRange {
    /// Interval start in seconds from the beginning of the timeline
    pub start_secs: u64,
    /// Interval end in seconds; always greater than `start_secs`
    pub end_secs: u64,
}

impl ClipRange {
    /// Construct a range from explicit bounds
    ///
    /// Returns `InvalidInput` when the interval is empty or inverted.
    pub fn new(start_secs: u64, end_secs: u64) -> Result<Self> {
        if end_secs <= start_secs {
            return Err(Error::InvalidInput(format!(
                "clip end ({end_secs}s) must be after clip start ({start_secs}s)"
            )));
        }
        Ok(Self {
            start_secs,
            end_secs,
        })
    }

    /// Resolve an optional wire-level clip request
    ///
    /// Returns `Ok(None)` when the request is absent, disabled, or has only
    /// one bound - a partial clip is treated as no clip. Returns an error
    /// only when both bounds are present but one fails to parse or the
    /// interval is inverted.
    pub fn from_request(request: Option<&ClipRequest>) -> Result<Option<Self>> {
        let Some(request) = request else {
            return Ok(None);
        };
        if !request.enabled {
            return Ok(None);
        }
        let (Some(start), Some(end)) = (request.start_time.as_deref(), request.end_time.as_deref())
        else {
            return Ok(None);
        };

        let start_secs = parse_timestamp(start)?;
        let end_secs = parse_timestamp(end)?;
        Self::new(start_secs, end_secs).map(Some)
    }

    /// The section directive handed to the external tool: `*start-end`
    ///
    /// The `*` prefix selects a wall-clock interval on the source timeline.
    /// Cuts are always requested keyframe-aligned alongside this directive so
    /// the tool can extract at the container level without a re-encode.
    pub fn section_spec(&self) -> String {
        format!("*{}-{}", self.start_secs, self.end_secs)
    }

    /// Clip duration in seconds
    pub fn duration_secs(&self) -> u64 {
        self.end_secs - self.start_secs
    }
}
