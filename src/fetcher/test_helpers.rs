//! Shared test fixtures: a scriptable fake backend and fetcher constructors
//!
//! Used by the fetcher unit tests and the API router tests so neither needs
//! the real yt-dlp binary or network access.

use crate::config::Config;
use crate::error::{Error, Result};
use crate::fetcher::VideoFetcher;
use crate::quality::QualityLabel;
use crate::source::{DownloadSource, FetchPlan};
use crate::types::{FormatInfo, VideoInfo};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Scripted probe behavior
#[derive(Clone)]
pub(crate) enum FakeProbe {
    Ok(VideoInfo),
    Fail(&'static str),
}

/// Scripted fetch behavior
#[derive(Clone)]
pub(crate) enum FakeFetch {
    /// Write `write` (name, bytes) into the session dir, then report
    /// `report` (name) as the tool's output path. Either side may be absent.
    Produce {
        write: Option<(&'static str, &'static [u8])>,
        report: Option<&'static str>,
    },
    /// Fail the way a non-zero tool exit does
    Fail(&'static str),
    /// Never finish within any reasonable test budget
    Hang(Duration),
}

/// A [`DownloadSource`] with scripted behavior that records every plan
pub(crate) struct FakeSource {
    pub(crate) probe: FakeProbe,
    pub(crate) fetch: FakeFetch,
    pub(crate) seen_plans: Mutex<Vec<FetchPlan>>,
}

impl FakeSource {
    pub(crate) fn new(probe: FakeProbe, fetch: FakeFetch) -> Self {
        Self {
            probe,
            fetch,
            seen_plans: Mutex::new(Vec::new()),
        }
    }

    /// The plans `fetch` was called with, in order
    pub(crate) fn plans(&self) -> Vec<FetchPlan> {
        self.seen_plans.lock().expect("plan lock").clone()
    }
}

#[async_trait]
impl DownloadSource for FakeSource {
    fn name(&self) -> &'static str {
        "fake"
    }

    async fn probe(&self, _url: &str) -> Result<VideoInfo> {
        match &self.probe {
            FakeProbe::Ok(info) => Ok(info.clone()),
            FakeProbe::Fail(msg) => Err(Error::Probe((*msg).to_string())),
        }
    }

    async fn fetch(&self, plan: &FetchPlan) -> Result<Option<PathBuf>> {
        self.seen_plans.lock().expect("plan lock").push(plan.clone());

        // The session dir is the parent of the output template
        let session_dir = Path::new(&plan.output_template)
            .parent()
            .expect("output template has a parent")
            .to_path_buf();

        match &self.fetch {
            FakeFetch::Produce { write, report } => {
                if let Some((name, bytes)) = write {
                    std::fs::write(session_dir.join(name), bytes).expect("write fake artifact");
                }
                Ok(report.map(|name| session_dir.join(name)))
            }
            FakeFetch::Fail(msg) => Err(Error::Fetch((*msg).to_string())),
            FakeFetch::Hang(duration) => {
                tokio::time::sleep(*duration).await;
                Ok(None)
            }
        }
    }
}

/// Sample probe metadata with two distinct quality tiers
pub(crate) fn sample_video_info() -> VideoInfo {
    VideoInfo {
        title: "Sample Video".to_string(),
        duration: 212,
        thumbnail: "https://example.com/thumb.jpg".to_string(),
        formats: vec![
            FormatInfo {
                quality: QualityLabel::P360,
                format_id: "18".to_string(),
                ext: "mp4".to_string(),
                filesize: 1_000_000,
            },
            FormatInfo {
                quality: QualityLabel::P720,
                format_id: "22".to_string(),
                ext: "mp4".to_string(),
                filesize: 5_000_000,
            },
        ],
    }
}

/// Build a fetcher around a scripted fake source, default config
pub(crate) fn create_test_fetcher(
    probe: FakeProbe,
    fetch: FakeFetch,
) -> (Arc<VideoFetcher>, Arc<FakeSource>) {
    create_test_fetcher_with_config(Config::default(), probe, fetch)
}

/// Build a fetcher around a scripted fake source with a custom config
pub(crate) fn create_test_fetcher_with_config(
    config: Config,
    probe: FakeProbe,
    fetch: FakeFetch,
) -> (Arc<VideoFetcher>, Arc<FakeSource>) {
    let source = Arc::new(FakeSource::new(probe, fetch));
    let fetcher = VideoFetcher::with_source(config, source.clone(), None)
        .expect("test fetcher construction");
    (Arc::new(fetcher), source)
}
