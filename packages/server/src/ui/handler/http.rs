//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    body::Body,
    extract::{Path, State},
    http::{
        HeaderMap, HeaderName, StatusCode,
        header::{ACCEPT_RANGES, CONTENT_LENGTH, CONTENT_RANGE, CONTENT_TYPE, RANGE},
    },
    response::{IntoResponse, Response},
};

use crate::{
    domain::{ItemId, OriginResponse, RelayError},
    infrastructure::dto::http::{
        CatalogItemDto, EpisodeDto, EpisodeListDto, ErrorDto, StreamUrlDto,
    },
    ui::state::AppState,
};

type JsonError = (StatusCode, Json<ErrorDto>);

fn json_error(status: StatusCode, message: impl Into<String>) -> JsonError {
    (
        status,
        Json(ErrorDto {
            error: message.into(),
        }),
    )
}

/// Convert String -> ItemId, answering 400 for ids the relay refuses to forward
fn parse_item_id(raw: String) -> Result<ItemId, JsonError> {
    ItemId::try_from(raw).map_err(|e| {
        tracing::debug!("Rejected item id: {}", e);
        json_error(StatusCode::BAD_REQUEST, e.to_string())
    })
}

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Relay URL for an item; the origin URL and its credentials never leave the server
pub async fn get_stream_url(
    State(state): State<Arc<AppState>>,
    Path(item_id): Path<String>,
) -> Result<Json<StreamUrlDto>, JsonError> {
    let item_id = parse_item_id(item_id)?;
    let url = state.relay_stream_usecase.resolve_stream_url(&item_id);
    Ok(Json(StreamUrlDto { url }))
}

/// Stream the item's bytes from the origin, honouring `Range`
pub async fn stream_video(
    State(state): State<Arc<AppState>>,
    Path(item_id): Path<String>,
    headers: HeaderMap,
) -> Response {
    let item_id = match parse_item_id(item_id) {
        Ok(item_id) => item_id,
        Err(rejection) => return rejection.into_response(),
    };
    // forwarded as raw bytes, even when the value is not visible ASCII
    let range = headers.get(RANGE).map(|v| v.as_bytes());

    match state
        .relay_stream_usecase
        .stream_video(&item_id, range)
        .await
    {
        Ok(origin) => relay_response(origin),
        Err(e @ RelayError::OriginTimeout(_)) => {
            (StatusCode::GATEWAY_TIMEOUT, e.to_string()).into_response()
        }
        Err(e @ RelayError::OriginUnreachable(_)) => {
            (StatusCode::BAD_GATEWAY, e.to_string()).into_response()
        }
    }
}

/// Mirror the origin's status and partial-content headers around its body stream
fn relay_response(origin: OriginResponse) -> Response {
    let status = StatusCode::from_u16(origin.status).unwrap_or(StatusCode::BAD_GATEWAY);

    let copied: [(HeaderName, Option<String>); 4] = [
        (CONTENT_LENGTH, origin.headers.content_length),
        (CONTENT_RANGE, origin.headers.content_range),
        (CONTENT_TYPE, origin.headers.content_type),
        (ACCEPT_RANGES, origin.headers.accept_ranges),
    ];
    let mut builder = Response::builder().status(status);
    for (name, value) in copied {
        if let Some(value) = value {
            builder = builder.header(name, value);
        }
    }

    // the body is pulled from the origin only as fast as the client reads it
    builder
        .body(Body::from_stream(origin.body))
        .unwrap_or_else(|e| {
            tracing::error!("Failed to build relay response: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        })
}

/// Recently added movies and series
pub async fn list_movies(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<CatalogItemDto>>, JsonError> {
    let items = state
        .browse_catalog_usecase
        .list_library()
        .await
        .map_err(|e| json_error(StatusCode::BAD_GATEWAY, e.to_string()))?;

    // Domain Model から DTO への変換
    Ok(Json(items.into_iter().map(CatalogItemDto::from).collect()))
}

/// Episodes of a series
pub async fn list_episodes(
    State(state): State<Arc<AppState>>,
    Path(series_id): Path<String>,
) -> Result<Json<EpisodeListDto>, JsonError> {
    let series_id = parse_item_id(series_id)?;
    let episodes = state
        .browse_catalog_usecase
        .list_episodes(&series_id)
        .await
        .map_err(|e| json_error(StatusCode::BAD_GATEWAY, e.to_string()))?;

    Ok(Json(EpisodeListDto {
        episodes: episodes.into_iter().map(EpisodeDto::from).collect(),
    }))
}
