//! CLI-based media-fetch backend using the external yt-dlp binary

use super::{DownloadSource, FetchPlan};
use crate::error::{Error, Result};
use crate::quality::QualityLabel;
use crate::types::{FormatInfo, VideoInfo, dedup_formats};
use crate::utils::stderr_summary;
use async_trait::async_trait;
use regex::Regex;
use serde::Deserialize;
use std::path::PathBuf;
use tokio::process::Command;

/// CLI-based backend driving the external `yt-dlp` binary
///
/// Probing uses the tool's single-JSON dump mode (`-J`), which transfers no
/// media bytes. Fetching hands the tool a format-selection expression, an
/// output template and optionally a keyframe-aligned section directive.
///
/// # Examples
///
/// ```no_run
/// use vidclip_dl::source::YtDlpSource;
/// use std::path::PathBuf;
///
/// // Create with explicit path
/// let source = YtDlpSource::new(PathBuf::from("/usr/bin/yt-dlp"));
///
/// // Or auto-discover from PATH
/// let source = YtDlpSource::from_path()
///     .expect("yt-dlp not found in PATH");
/// ```
pub struct YtDlpSource {
    binary_path: PathBuf,
    extractor_args: Option<String>,
}

impl YtDlpSource {
    /// Create a new backend with an explicit binary path
    pub fn new(binary_path: PathBuf) -> Self {
        Self {
            binary_path,
            extractor_args: None,
        }
    }

    /// Attempt to find yt-dlp in PATH
    ///
    /// # Returns
    ///
    /// `Some(YtDlpSource)` if the binary is found, `None` otherwise.
    pub fn from_path() -> Option<Self> {
        which::which("yt-dlp").ok().map(Self::new)
    }

    /// Pass extractor arguments through to every invocation
    ///
    /// Deployment-specific workarounds for platform-side access restrictions
    /// (`"youtube:player_client=android"` and friends) are configured here.
    pub fn with_extractor_args(mut self, args: Option<String>) -> Self {
        self.extractor_args = args;
        self
    }

    /// The resolved binary path
    pub fn binary_path(&self) -> &PathBuf {
        &self.binary_path
    }

    fn build_probe_args(&self, url: &str) -> Vec<String> {
        let mut args = vec![
            "-J".to_string(),
            "--no-warnings".to_string(),
            "--no-playlist".to_string(),
        ];
        if let Some(extractor_args) = &self.extractor_args {
            args.push("--extractor-args".to_string());
            args.push(extractor_args.clone());
        }
        args.push(url.to_string());
        args
    }

    fn build_fetch_args(&self, plan: &FetchPlan) -> Vec<String> {
        let mut args = vec![
            "-f".to_string(),
            plan.format_expr.clone(),
            "-o".to_string(),
            plan.output_template.clone(),
            "--no-warnings".to_string(),
            "--no-playlist".to_string(),
        ];
        if let Some(section) = &plan.section {
            args.push("--download-sections".to_string());
            args.push(section.section_spec());
            args.push("--force-keyframes-at-cuts".to_string());
        }
        if let Some(extractor_args) = &self.extractor_args {
            args.push("--extractor-args".to_string());
            args.push(extractor_args.clone());
        }
        args.push(plan.url.clone());
        args
    }
}

#[async_trait]
impl DownloadSource for YtDlpSource {
    fn name(&self) -> &'static str {
        "yt-dlp"
    }

    async fn probe(&self, url: &str) -> Result<VideoInfo> {
        let output = Command::new(&self.binary_path)
            .args(self.build_probe_args(url))
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| Error::ToolMissing(format!("failed to execute yt-dlp: {e}")))?;

        if !output.status.success() {
            return Err(Error::Probe(stderr_summary(&output.stderr)));
        }

        let raw: RawMetadata = serde_json::from_slice(&output.stdout)
            .map_err(|e| Error::Probe(format!("unreadable metadata: {e}")))?;

        Ok(video_info_from_raw(raw))
    }

    async fn fetch(&self, plan: &FetchPlan) -> Result<Option<PathBuf>> {
        tracing::debug!(
            url = %plan.url,
            format = %plan.format_expr,
            clipped = plan.section.is_some(),
            "invoking yt-dlp"
        );

        let output = Command::new(&self.binary_path)
            .args(self.build_fetch_args(plan))
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| Error::ToolMissing(format!("failed to execute yt-dlp: {e}")))?;

        if !output.status.success() {
            return Err(Error::Fetch(stderr_summary(&output.stderr)));
        }

        Ok(reported_output_path(&String::from_utf8_lossy(
            &output.stdout,
        )))
    }
}

/// Recover the output path the tool disclosed on stdout
///
/// The merger line is preferred because remuxing separate audio/video
/// streams renames the artifact after the per-stream destination lines were
/// printed. Within one pattern the last match wins.
fn reported_output_path(stdout: &str) -> Option<PathBuf> {
    let patterns = [
        r#"\[Merger\] Merging formats into "(?P<path>[^"]+)""#,
        r"\[download\] Destination: (?P<path>.+)",
        r"\[download\] (?P<path>.+) has already been downloaded",
    ];

    for pattern in patterns {
        let Ok(re) = Regex::new(pattern) else {
            continue;
        };
        let reported = stdout
            .lines()
            .rev()
            .find_map(|line| re.captures(line).map(|c| c["path"].trim().to_string()));
        if let Some(path) = reported {
            return Some(PathBuf::from(path));
        }
    }

    None
}

/// Metadata shape produced by the tool's `-J` dump (only the fields we read)
#[derive(Debug, Deserialize)]
struct RawMetadata {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    duration: Option<f64>,
    #[serde(default)]
    thumbnail: Option<String>,
    #[serde(default)]
    formats: Vec<RawFormat>,
}

#[derive(Debug, Deserialize)]
struct RawFormat {
    #[serde(default)]
    format_id: Option<String>,
    #[serde(default)]
    ext: Option<String>,
    #[serde(default)]
    height: Option<u32>,
    #[serde(default)]
    filesize: Option<u64>,
}

/// Convert the raw metadata dump into the API-facing [`VideoInfo`]
///
/// Streams whose height does not land exactly on a recognized tier are
/// skipped; the survivors are deduplicated by label, first occurrence wins.
fn video_info_from_raw(raw: RawMetadata) -> VideoInfo {
    let formats: Vec<FormatInfo> = raw
        .formats
        .into_iter()
        .filter_map(|f| {
            let quality = QualityLabel::from_height(f.height?)?;
            Some(FormatInfo {
                quality,
                format_id: f.format_id.unwrap_or_default(),
                ext: f.ext.unwrap_or_else(|| "mp4".to_string()),
                filesize: f.filesize.unwrap_or(0),
            })
        })
        .collect();

    VideoInfo {
        title: raw.title.unwrap_or_else(|| "Unknown".to_string()),
        duration: raw.duration.unwrap_or(0.0).round() as u64,
        thumbnail: raw.thumbnail.unwrap_or_default(),
        formats: dedup_formats(formats),
    }
}
