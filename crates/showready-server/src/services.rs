// SPDX-License-Identifier: Apache-2.0

//! Orchestration between the HTTP surface and the stores. Every
//! overlay-facing operation follows the same contract, in order: confirm
//! the event exists, then ask the guard. Existence always precedes
//! authorization.

use crate::AppState;
use showready_api::ApiError;
use showready_model::{
    ChecklistAggregate, EventId, ItemType, OverlayItem, OverlayStats, OverlayTransition, UserId,
};
use showready_store::StoreError;
use tracing::error;

pub fn api_error_from_store(e: StoreError) -> ApiError {
    match e {
        StoreError::NotFound { resource, id } => ApiError::not_found(resource, &id),
        StoreError::EmptyPatch => ApiError::validation("no fields to update"),
        StoreError::Constraint(msg) => ApiError::validation(format!("constraint violated: {msg}")),
        StoreError::Sqlite(e) => {
            error!("storage failure: {e}");
            ApiError::internal("storage failure")
        }
    }
}

async fn require_event(state: &AppState, event: &EventId) -> Result<(), ApiError> {
    let exists = state
        .directory
        .event_exists(event)
        .await
        .map_err(api_error_from_store)?;
    if exists {
        Ok(())
    } else {
        Err(ApiError::not_found("Event", event.as_str()))
    }
}

async fn require_overlay_access(
    state: &AppState,
    user: &UserId,
    event: &EventId,
) -> Result<(), ApiError> {
    require_event(state, event).await?;
    let allowed = state
        .guard
        .verify(user, event)
        .await
        .map_err(api_error_from_store)?;
    if allowed {
        Ok(())
    } else {
        Err(ApiError::forbidden(
            "you can only access checklist items for events you participate in",
        ))
    }
}

/// Role gate for shared-checklist and template mutation. Unknown callers
/// fail closed as a denial, same as the guard.
pub async fn require_role(
    state: &AppState,
    user: &UserId,
    allowed: &[&str],
) -> Result<(), ApiError> {
    let role = state
        .directory
        .user_role(user)
        .await
        .map_err(api_error_from_store)?;
    match role {
        Some(role) if allowed.contains(&role.as_str()) => Ok(()),
        _ => Err(ApiError::forbidden("insufficient permissions")),
    }
}

/// Any known role may read the shared checklist.
pub async fn require_known_user(state: &AppState, user: &UserId) -> Result<(), ApiError> {
    let role = state
        .directory
        .user_role(user)
        .await
        .map_err(api_error_from_store)?;
    if role.is_some() {
        Ok(())
    } else {
        Err(ApiError::forbidden("insufficient permissions"))
    }
}

/// Lazily creates the checklist on first access; the aggregate always
/// carries all five sub-collections as arrays.
pub async fn checklist_aggregate(
    state: &AppState,
    user: &UserId,
    event: &EventId,
) -> Result<ChecklistAggregate, ApiError> {
    require_event(state, event).await?;
    require_known_user(state, user).await?;
    state.checklists.aggregate(event).map_err(api_error_from_store)
}

pub async fn overlay_items(
    state: &AppState,
    user: &UserId,
    event: &EventId,
) -> Result<Vec<OverlayItem>, ApiError> {
    require_overlay_access(state, user, event).await?;
    state.overlay.find(user, event).map_err(api_error_from_store)
}

pub async fn set_overlay_completion(
    state: &AppState,
    user: &UserId,
    event: &EventId,
    item_type: &ItemType,
    completed: bool,
) -> Result<OverlayTransition, ApiError> {
    require_overlay_access(state, user, event).await?;
    state
        .overlay
        .transition_item(user, event, item_type, completed)
        .map_err(api_error_from_store)
}

pub async fn remove_overlay_item(
    state: &AppState,
    user: &UserId,
    event: &EventId,
    item_type: &ItemType,
) -> Result<bool, ApiError> {
    require_overlay_access(state, user, event).await?;
    state
        .overlay
        .delete(user, event, item_type)
        .map_err(api_error_from_store)
}

pub async fn overlay_stats(
    state: &AppState,
    user: &UserId,
    event: &EventId,
) -> Result<OverlayStats, ApiError> {
    require_overlay_access(state, user, event).await?;
    state.overlay.stats(user, event).map_err(api_error_from_store)
}
