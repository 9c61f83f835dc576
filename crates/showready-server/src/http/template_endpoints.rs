use crate::http::handlers::{
    api_error_response, caller_id, ok_json, parse_body, parse_row_id, propagated_request_id,
    with_request_id,
};
use crate::services::{api_error_from_store, require_role};
use crate::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::response::Response;
use axum::Json;
use showready_api::{ApiError, ApplyTemplatesResponse, CreateTemplateBody, DeletedResponse};
use showready_model::{NewTemplate, TemplatePatch};
use showready_store::{TEMPLATE_ADMIN_ROLES, WRITER_ROLES};
use tracing::info;

pub(crate) async fn list_templates_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Response {
    let request_id = propagated_request_id(&headers, &state);
    let out = async {
        let caller = caller_id(&headers)?;
        require_role(&state, &caller, &WRITER_ROLES).await?;
        let templates = state.templates.active_templates().map_err(api_error_from_store)?;
        Ok::<_, ApiError>(ok_json(&templates))
    }
    .await;
    with_request_id(out.unwrap_or_else(|e| api_error_response(&e)), &request_id)
}

pub(crate) async fn create_template_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<CreateTemplateBody>, JsonRejection>,
) -> Response {
    let request_id = propagated_request_id(&headers, &state);
    let out = async {
        let caller = caller_id(&headers)?;
        require_role(&state, &caller, &TEMPLATE_ADMIN_ROLES).await?;
        let body = parse_body(body)?;
        if body.title.trim().is_empty() {
            return Err(ApiError::invalid_field("title", "must not be empty"));
        }
        let template = state
            .templates
            .create_template(NewTemplate {
                title: body.title,
                description: body.description,
                position: body.position.unwrap_or(0),
            })
            .map_err(api_error_from_store)?;
        Ok::<_, ApiError>(ok_json(&template))
    }
    .await;
    with_request_id(out.unwrap_or_else(|e| api_error_response(&e)), &request_id)
}

pub(crate) async fn update_template_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(key): Path<String>,
    body: Result<Json<TemplatePatch>, JsonRejection>,
) -> Response {
    let request_id = propagated_request_id(&headers, &state);
    let out = async {
        let caller = caller_id(&headers)?;
        require_role(&state, &caller, &TEMPLATE_ADMIN_ROLES).await?;
        let id = parse_row_id(&key)?;
        let patch = parse_body(body)?;
        let template = state
            .templates
            .update_template(id, &patch)
            .map_err(api_error_from_store)?;
        Ok::<_, ApiError>(ok_json(&template))
    }
    .await;
    with_request_id(out.unwrap_or_else(|e| api_error_response(&e)), &request_id)
}

pub(crate) async fn delete_template_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(key): Path<String>,
) -> Response {
    let request_id = propagated_request_id(&headers, &state);
    let out = async {
        let caller = caller_id(&headers)?;
        require_role(&state, &caller, &TEMPLATE_ADMIN_ROLES).await?;
        let id = parse_row_id(&key)?;
        let deleted = state
            .templates
            .soft_delete_template(id)
            .map_err(api_error_from_store)?;
        if !deleted {
            return Err(ApiError::not_found("Template", &id.to_string()));
        }
        Ok::<_, ApiError>(ok_json(&DeletedResponse { deleted: true }))
    }
    .await;
    with_request_id(out.unwrap_or_else(|e| api_error_response(&e)), &request_id)
}

/// `POST /checklist/:id/apply-templates` — bulk, idempotent application of
/// the active template set. The count reports templates considered.
pub(crate) async fn apply_templates_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(key): Path<String>,
) -> Response {
    let request_id = propagated_request_id(&headers, &state);
    let out = async {
        let caller = caller_id(&headers)?;
        require_role(&state, &caller, &WRITER_ROLES).await?;
        let id = parse_row_id(&key)?;
        let count = state
            .applier
            .apply_to_checklist(id)
            .await
            .map_err(api_error_from_store)?;
        info!(checklist_id = id, count, caller = caller.as_str(), "templates applied");
        Ok::<_, ApiError>(ok_json(&ApplyTemplatesResponse {
            message: "Templates applied successfully".to_string(),
            count,
        }))
    }
    .await;
    with_request_id(out.unwrap_or_else(|e| api_error_response(&e)), &request_id)
}
