// SPDX-License-Identifier: Apache-2.0

use crate::http::handlers::{
    api_error_response, caller_id, ok_json, parse_body, propagated_request_id, with_request_id,
};
use crate::services;
use crate::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::response::Response;
use axum::Json;
use showready_api::{ApiError, DeletedResponse, OverlayItemResponse, OverlayListResponse,
    SetCompletionBody};
use showready_model::{EventId, ItemType};
use tracing::info;

fn parse_event(raw: &str) -> Result<EventId, ApiError> {
    EventId::parse(raw).map_err(|e| ApiError::invalid_field("eventId", &e.to_string()))
}

/// The path segment arrives percent-decoded from the router; beyond the
/// non-empty check the key is opaque and passes through unmodified.
fn parse_item_type(raw: &str) -> Result<ItemType, ApiError> {
    ItemType::parse(raw).map_err(|e| ApiError::invalid_field("itemType", &e.to_string()))
}

pub(crate) async fn list_overlay_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(event_id): Path<String>,
) -> Response {
    let request_id = propagated_request_id(&headers, &state);
    let out = async {
        let caller = caller_id(&headers)?;
        let event = parse_event(&event_id)?;
        let items = services::overlay_items(&state, &caller, &event).await?;
        Ok::<_, ApiError>(ok_json(&OverlayListResponse {
            event_id: event.into_inner(),
            user_id: caller.into_inner(),
            count: items.len(),
            items,
        }))
    }
    .await;
    with_request_id(out.unwrap_or_else(|e| api_error_response(&e)), &request_id)
}

pub(crate) async fn set_completion_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path((event_id, item_type)): Path<(String, String)>,
    body: Result<Json<SetCompletionBody>, JsonRejection>,
) -> Response {
    let request_id = propagated_request_id(&headers, &state);
    let out = async {
        let caller = caller_id(&headers)?;
        let event = parse_event(&event_id)?;
        let item_type = parse_item_type(&item_type)?;
        let body = parse_body(body)?;
        let transition =
            services::set_overlay_completion(&state, &caller, &event, &item_type, body.completed)
                .await?;
        info!(
            user = caller.as_str(),
            event = event.as_str(),
            created = transition.created,
            completed = body.completed,
            "overlay item transition"
        );
        let message = if body.completed {
            "Item marked as complete"
        } else {
            "Item marked as incomplete"
        };
        Ok::<_, ApiError>(ok_json(&OverlayItemResponse {
            message: message.to_string(),
            created: transition.created,
            item: transition.item,
        }))
    }
    .await;
    with_request_id(out.unwrap_or_else(|e| api_error_response(&e)), &request_id)
}

pub(crate) async fn delete_overlay_item_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path((event_id, item_type)): Path<(String, String)>,
) -> Response {
    let request_id = propagated_request_id(&headers, &state);
    let out = async {
        let caller = caller_id(&headers)?;
        let event = parse_event(&event_id)?;
        let item_type = parse_item_type(&item_type)?;
        // Absence is not an error for the overlay: the response only
        // reports whether a row was removed.
        let deleted =
            services::remove_overlay_item(&state, &caller, &event, &item_type).await?;
        Ok::<_, ApiError>(ok_json(&DeletedResponse { deleted }))
    }
    .await;
    with_request_id(out.unwrap_or_else(|e| api_error_response(&e)), &request_id)
}

pub(crate) async fn overlay_stats_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(event_id): Path<String>,
) -> Response {
    let request_id = propagated_request_id(&headers, &state);
    let out = async {
        let caller = caller_id(&headers)?;
        let event = parse_event(&event_id)?;
        let stats = services::overlay_stats(&state, &caller, &event).await?;
        Ok::<_, ApiError>(ok_json(&stats))
    }
    .await;
    with_request_id(out.unwrap_or_else(|e| api_error_response(&e)), &request_id)
}
