//! Media handlers: probe and download.

use super::{DownloadRequest, InfoRequest};
use crate::api::AppState;
use crate::clip::ClipRange;
use crate::error::Error;
use crate::quality::QualityLabel;
use crate::types::FetchRequest;
use crate::utils::content_type_for;
use axum::{
    Json,
    body::Body,
    extract::State,
    http::{StatusCode, header},
    response::Response,
};
use tokio_util::io::ReaderStream;

/// POST /api/info - Probe a video URL
///
/// Metadata-only query; no media bytes are transferred.
#[utoipa::path(
    post,
    path = "/api/info",
    tag = "media",
    request_body = InfoRequest,
    responses(
        (status = 200, description = "Video metadata with available quality tiers", body = crate::types::VideoInfo),
        (status = 400, description = "Missing or invalid URL", body = crate::error::ApiError),
        (status = 502, description = "Probe against the source failed", body = crate::error::ApiError)
    )
)]
pub async fn video_info(
    State(state): State<AppState>,
    Json(request): Json<InfoRequest>,
) -> Result<Json<crate::types::VideoInfo>, Error> {
    let info = state.fetcher.probe(&request.url).await?;
    Ok(Json(info))
}

/// POST /api/download - Fetch a video and stream it back
///
/// With clip parameters present (enabled, both bounds), only the requested
/// sub-interval is fetched. The response is a binary attachment; failures
/// are JSON error bodies, never partial streams.
#[utoipa::path(
    post,
    path = "/api/download",
    tag = "media",
    request_body = DownloadRequest,
    responses(
        (status = 200, description = "Media file attachment", content_type = "application/octet-stream"),
        (status = 400, description = "Missing URL or unparseable clip time", body = crate::error::ApiError),
        (status = 500, description = "Fetch failed", body = crate::error::ApiError),
        (status = 504, description = "Fetch timed out", body = crate::error::ApiError)
    )
)]
pub async fn download_video(
    State(state): State<AppState>,
    Json(request): Json<DownloadRequest>,
) -> Result<Response, Error> {
    let quality = request
        .quality
        .as_deref()
        .map(QualityLabel::from_label)
        .unwrap_or_else(|| state.config.default_quality());
    let clip = ClipRange::from_request(request.clip.as_ref())?;

    let fetch_request = FetchRequest {
        url: request.url,
        quality,
        clip,
    };
    let media = state.fetcher.fetch(&fetch_request).await?;

    // Stream from disk instead of buffering the whole file
    let file = tokio::fs::File::open(&media.path).await.map_err(Error::Io)?;
    let body = Body::from_stream(ReaderStream::new(file));

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type_for(&media.path))
        .header(header::CONTENT_LENGTH, media.size_bytes)
        .header(
            header::CONTENT_DISPOSITION,
            attachment_disposition(&media.file_name),
        )
        .body(body)
        .map_err(|e| Error::ApiServerError(e.to_string()))
}

/// Build a Content-Disposition header value for a downloaded file
///
/// The file name comes from the remote title, so anything that is not a
/// printable ASCII character (or would break the quoted-string) is replaced
/// before it goes into a header.
fn attachment_disposition(file_name: &str) -> String {
    let safe: String = file_name
        .chars()
        .map(|c| {
            if c == '"' || c == '\\' || !(c == ' ' || c.is_ascii_graphic()) {
                '_'
            } else {
                c
            }
        })
        .collect();
    format!("attachment; filename=\"{safe}\"")
}
