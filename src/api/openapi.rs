//! OpenAPI documentation and schema generation
//!
//! This module defines the OpenAPI specification for the vidclip-dl REST API
//! using utoipa for compile-time spec generation.

use utoipa::OpenApi;

/// OpenAPI documentation for the vidclip-dl REST API
///
/// This struct is used to generate the OpenAPI 3.1 specification that describes
/// all available endpoints, request/response types, and API behavior.
///
/// The spec can be accessed via:
/// - `/api/openapi.json` - JSON format OpenAPI specification
/// - `/swagger-ui` - Interactive Swagger UI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "vidclip-dl REST API",
        version = "0.1.0",
        description = "REST API for probing remote videos and fetching them, optionally clipped to a keyframe-aligned sub-interval",
        contact(
            name = "vidclip-dl",
            url = "https://github.com/vidclip-dl/vidclip-dl"
        ),
        license(
            name = "MIT OR Apache-2.0"
        )
    ),
    servers(
        (url = "http://localhost:5000", description = "Local development server")
    ),
    paths(
        // Media
        crate::api::routes::video_info,
        crate::api::routes::download_video,

        // System
        crate::api::routes::health_check,
        crate::api::routes::openapi_spec,
        crate::api::routes::event_stream,
        crate::api::routes::shutdown,
    ),
    components(schemas(
        // Core types from types.rs
        crate::types::FetchRequest,
        crate::types::FetchedMedia,
        crate::types::VideoInfo,
        crate::types::FormatInfo,
        crate::types::Event,

        // Resolver types
        crate::quality::QualityLabel,
        crate::clip::ClipRequest,
        crate::clip::ClipRange,

        // Request types from routes
        crate::api::routes::InfoRequest,
        crate::api::routes::DownloadRequest,

        // Config types from config.rs
        crate::config::Config,
        crate::config::FetchConfig,
        crate::config::ToolsConfig,
        crate::config::ServerIntegrationConfig,
        crate::config::ApiConfig,

        // Error types
        crate::error::ApiError,
        crate::error::ErrorDetail,
    )),
    tags(
        (name = "media", description = "Probe and download operations"),
        (name = "system", description = "Health, events and lifecycle")
    )
)]
pub struct ApiDoc;

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use utoipa::OpenApi;

    #[test]
    fn openapi_spec_generates_and_lists_all_routes() {
        let spec = ApiDoc::openapi();
        let json = serde_json::to_value(&spec).unwrap();

        for path in [
            "/api/info",
            "/api/download",
            "/api/health",
            "/api/openapi.json",
            "/api/events",
            "/api/shutdown",
        ] {
            assert!(
                json["paths"].get(path).is_some(),
                "OpenAPI spec should document {path}"
            );
        }
    }

    #[test]
    fn openapi_spec_has_media_schemas() {
        let spec = ApiDoc::openapi();
        let json = serde_json::to_value(&spec).unwrap();
        let schemas = &json["components"]["schemas"];

        for name in ["VideoInfo", "FormatInfo", "QualityLabel", "ClipRequest"] {
            assert!(
                schemas.get(name).is_some(),
                "OpenAPI spec should define schema {name}"
            );
        }
    }
}
