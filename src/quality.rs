//! Quality labels and format-selection expressions
//!
//! Maps the fixed set of user-facing quality labels to the format-selection
//! expressions understood by the external media-fetch tool. Unrecognized
//! labels degrade to "best available" instead of erroring.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A user-facing quality tier
///
/// The eight fixed labels map 1:1 to a height ceiling; [`QualityLabel::Best`]
/// is the unconstrained fallback that any unknown label resolves to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum QualityLabel {
    /// 144p (height <= 144)
    #[serde(rename = "144p")]
    P144,
    /// 240p (height <= 240)
    #[serde(rename = "240p")]
    P240,
    /// 360p (height <= 360)
    #[serde(rename = "360p")]
    P360,
    /// 480p (height <= 480)
    #[serde(rename = "480p")]
    P480,
    /// 720p (height <= 720)
    #[serde(rename = "720p")]
    P720,
    /// 1080p (height <= 1080)
    #[default]
    #[serde(rename = "1080p")]
    P1080,
    /// 1440p (height <= 1440)
    #[serde(rename = "1440p")]
    P1440,
    /// 2160p (height <= 2160)
    #[serde(rename = "2160p")]
    P2160,
    /// Best available stream, no height constraint
    #[serde(rename = "best")]
    Best,
}

impl QualityLabel {
    /// All labels with a height ceiling, ascending
    pub const TIERS: [QualityLabel; 8] = [
        QualityLabel::P144,
        QualityLabel::P240,
        QualityLabel::P360,
        QualityLabel::P480,
        QualityLabel::P720,
        QualityLabel::P1080,
        QualityLabel::P1440,
        QualityLabel::P2160,
    ];

    /// Resolve a user-supplied label string
    ///
    /// Anything outside the recognized set resolves to [`QualityLabel::Best`]
    /// rather than an error - unknown input degrades to maximum quality.
    pub fn from_label(label: &str) -> Self {
        match label {
            "144p" => QualityLabel::P144,
            "240p" => QualityLabel::P240,
            "360p" => QualityLabel::P360,
            "480p" => QualityLabel::P480,
            "720p" => QualityLabel::P720,
            "1080p" => QualityLabel::P1080,
            "1440p" => QualityLabel::P1440,
            "2160p" => QualityLabel::P2160,
            _ => QualityLabel::Best,
        }
    }

    /// Map a stream height (in pixels) to its exact quality tier, if any
    pub fn from_height(height: u32) -> Option<Self> {
        match height {
            144 => Some(QualityLabel::P144),
            240 => Some(QualityLabel::P240),
            360 => Some(QualityLabel::P360),
            480 => Some(QualityLabel::P480),
            720 => Some(QualityLabel::P720),
            1080 => Some(QualityLabel::P1080),
            1440 => Some(QualityLabel::P1440),
            2160 => Some(QualityLabel::P2160),
            _ => None,
        }
    }

    /// The height ceiling for this label, or `None` for [`QualityLabel::Best`]
    pub fn height_ceiling(&self) -> Option<u32> {
        match self {
            QualityLabel::P144 => Some(144),
            QualityLabel::P240 => Some(240),
            QualityLabel::P360 => Some(360),
            QualityLabel::P480 => Some(480),
            QualityLabel::P720 => Some(720),
            QualityLabel::P1080 => Some(1080),
            QualityLabel::P1440 => Some(1440),
            QualityLabel::P2160 => Some(2160),
            QualityLabel::Best => None,
        }
    }

    /// Build the format-selection expression for the external tool
    ///
    /// Labels with a height ceiling select the best video stream under the
    /// ceiling combined with the best audio stream, falling back to the best
    /// single combined stream under the same ceiling. [`QualityLabel::Best`]
    /// is the unconstrained `best` expression.
    pub fn format_expr(&self) -> String {
        match self.height_ceiling() {
            Some(h) => format!("bestvideo[height<={h}]+bestaudio/best[height<={h}]"),
            None => "best".to_string(),
        }
    }

    /// The canonical label string ("720p", "best", ...)
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityLabel::P144 => "144p",
            QualityLabel::P240 => "240p",
            QualityLabel::P360 => "360p",
            QualityLabel::P480 => "480p",
            QualityLabel::P720 => "720p",
            QualityLabel::P1080 => "1080p",
            QualityLabel::P1440 => "1440p",
            QualityLabel::P2160 => "2160p",
            QualityLabel::Best => "best",
        }
    }
}

impl std::fmt::Display for QualityLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
