use crate::http::handlers::{
    api_error_response, caller_id, ok_json, parse_body, parse_row_id, propagated_request_id,
    with_request_id,
};
use crate::services::{self, api_error_from_store, require_known_user, require_role};
use crate::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::response::Response;
use axum::Json;
use showready_api::{
    ApiError, CreateBoothShippingBody, CreateCarRentalBody, CreateCustomItemBody,
    CreateFlightBody, CreateHotelBody, DeletedResponse,
};
use showready_model::{
    BoothShippingPatch, CarRentalPatch, ChecklistPatch, CustomItemPatch, EventId, FlightPatch,
    HotelPatch, NewBoothShipping, NewCarRental, NewCustomItem, NewFlight, NewHotel,
};
use showready_store::WRITER_ROLES;
use tracing::info;

/// `GET /checklist/:event_id` — lazily creates the checklist and returns
/// the aggregate. The path segment is the event id; the numeric checklist
/// id only appears on the mutation routes.
pub(crate) async fn aggregate_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(key): Path<String>,
) -> Response {
    let request_id = propagated_request_id(&headers, &state);
    let out = async {
        let caller = caller_id(&headers)?;
        let event =
            EventId::parse(&key).map_err(|e| ApiError::invalid_field("eventId", &e.to_string()))?;
        let aggregate = services::checklist_aggregate(&state, &caller, &event).await?;
        Ok::<_, ApiError>(ok_json(&aggregate))
    }
    .await;
    with_request_id(out.unwrap_or_else(|e| api_error_response(&e)), &request_id)
}

pub(crate) async fn update_main_fields_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(key): Path<String>,
    body: Result<Json<ChecklistPatch>, JsonRejection>,
) -> Response {
    let request_id = propagated_request_id(&headers, &state);
    let out = async {
        let caller = caller_id(&headers)?;
        require_role(&state, &caller, &WRITER_ROLES).await?;
        let id = parse_row_id(&key)?;
        let patch = parse_body(body)?;
        let checklist = state
            .checklists
            .update_main_fields(id, &patch)
            .map_err(api_error_from_store)?;
        info!(checklist_id = id, caller = caller.as_str(), "patched checklist main fields");
        Ok::<_, ApiError>(ok_json(&checklist))
    }
    .await;
    with_request_id(out.unwrap_or_else(|e| api_error_response(&e)), &request_id)
}

// ---- flights ----

pub(crate) async fn create_flight_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(key): Path<String>,
    body: Result<Json<CreateFlightBody>, JsonRejection>,
) -> Response {
    let request_id = propagated_request_id(&headers, &state);
    let out = async {
        let caller = caller_id(&headers)?;
        require_role(&state, &caller, &WRITER_ROLES).await?;
        let id = parse_row_id(&key)?;
        let body = parse_body(body)?;
        let flight = state
            .checklists
            .create_flight(
                id,
                NewFlight {
                    attendee_id: body.attendee_id,
                    attendee_name: body.attendee_name,
                    carrier: body.carrier,
                    confirmation_number: body.confirmation_number,
                    notes: body.notes,
                    booked: body.booked,
                },
            )
            .map_err(api_error_from_store)?;
        Ok::<_, ApiError>(ok_json(&flight))
    }
    .await;
    with_request_id(out.unwrap_or_else(|e| api_error_response(&e)), &request_id)
}

pub(crate) async fn update_flight_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(key): Path<String>,
    body: Result<Json<FlightPatch>, JsonRejection>,
) -> Response {
    let request_id = propagated_request_id(&headers, &state);
    let out = async {
        let caller = caller_id(&headers)?;
        require_role(&state, &caller, &WRITER_ROLES).await?;
        let id = parse_row_id(&key)?;
        let patch = parse_body(body)?;
        let flight = state
            .checklists
            .update_flight(id, &patch)
            .map_err(api_error_from_store)?;
        Ok::<_, ApiError>(ok_json(&flight))
    }
    .await;
    with_request_id(out.unwrap_or_else(|e| api_error_response(&e)), &request_id)
}

pub(crate) async fn delete_flight_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(key): Path<String>,
) -> Response {
    let request_id = propagated_request_id(&headers, &state);
    let out = async {
        let caller = caller_id(&headers)?;
        require_role(&state, &caller, &WRITER_ROLES).await?;
        let id = parse_row_id(&key)?;
        let deleted = state
            .checklists
            .delete_flight(id)
            .map_err(api_error_from_store)?;
        if !deleted {
            return Err(ApiError::not_found("Flight", &id.to_string()));
        }
        Ok::<_, ApiError>(ok_json(&DeletedResponse { deleted: true }))
    }
    .await;
    with_request_id(out.unwrap_or_else(|e| api_error_response(&e)), &request_id)
}

// ---- hotels ----

pub(crate) async fn create_hotel_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(key): Path<String>,
    body: Result<Json<CreateHotelBody>, JsonRejection>,
) -> Response {
    let request_id = propagated_request_id(&headers, &state);
    let out = async {
        let caller = caller_id(&headers)?;
        require_role(&state, &caller, &WRITER_ROLES).await?;
        let id = parse_row_id(&key)?;
        let body = parse_body(body)?;
        let hotel = state
            .checklists
            .create_hotel(
                id,
                NewHotel {
                    attendee_id: body.attendee_id,
                    attendee_name: body.attendee_name,
                    property_name: body.property_name,
                    confirmation_number: body.confirmation_number,
                    check_in_date: body.check_in_date,
                    check_out_date: body.check_out_date,
                    notes: body.notes,
                    booked: body.booked,
                },
            )
            .map_err(api_error_from_store)?;
        Ok::<_, ApiError>(ok_json(&hotel))
    }
    .await;
    with_request_id(out.unwrap_or_else(|e| api_error_response(&e)), &request_id)
}

pub(crate) async fn update_hotel_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(key): Path<String>,
    body: Result<Json<HotelPatch>, JsonRejection>,
) -> Response {
    let request_id = propagated_request_id(&headers, &state);
    let out = async {
        let caller = caller_id(&headers)?;
        require_role(&state, &caller, &WRITER_ROLES).await?;
        let id = parse_row_id(&key)?;
        let patch = parse_body(body)?;
        let hotel = state
            .checklists
            .update_hotel(id, &patch)
            .map_err(api_error_from_store)?;
        Ok::<_, ApiError>(ok_json(&hotel))
    }
    .await;
    with_request_id(out.unwrap_or_else(|e| api_error_response(&e)), &request_id)
}

pub(crate) async fn delete_hotel_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(key): Path<String>,
) -> Response {
    let request_id = propagated_request_id(&headers, &state);
    let out = async {
        let caller = caller_id(&headers)?;
        require_role(&state, &caller, &WRITER_ROLES).await?;
        let id = parse_row_id(&key)?;
        let deleted = state
            .checklists
            .delete_hotel(id)
            .map_err(api_error_from_store)?;
        if !deleted {
            return Err(ApiError::not_found("Hotel", &id.to_string()));
        }
        Ok::<_, ApiError>(ok_json(&DeletedResponse { deleted: true }))
    }
    .await;
    with_request_id(out.unwrap_or_else(|e| api_error_response(&e)), &request_id)
}

// ---- car rentals ----

pub(crate) async fn create_car_rental_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(key): Path<String>,
    body: Result<Json<CreateCarRentalBody>, JsonRejection>,
) -> Response {
    let request_id = propagated_request_id(&headers, &state);
    let out = async {
        let caller = caller_id(&headers)?;
        require_role(&state, &caller, &WRITER_ROLES).await?;
        let id = parse_row_id(&key)?;
        let body = parse_body(body)?;
        let rental = state
            .checklists
            .create_car_rental(
                id,
                NewCarRental {
                    provider: body.provider,
                    confirmation_number: body.confirmation_number,
                    pickup_date: body.pickup_date,
                    return_date: body.return_date,
                    notes: body.notes,
                    booked: body.booked,
                    rental_type: body.rental_type.unwrap_or_default(),
                    assigned_to_id: body.assigned_to_id,
                    assigned_to_name: body.assigned_to_name,
                },
            )
            .map_err(api_error_from_store)?;
        Ok::<_, ApiError>(ok_json(&rental))
    }
    .await;
    with_request_id(out.unwrap_or_else(|e| api_error_response(&e)), &request_id)
}

pub(crate) async fn update_car_rental_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(key): Path<String>,
    body: Result<Json<CarRentalPatch>, JsonRejection>,
) -> Response {
    let request_id = propagated_request_id(&headers, &state);
    let out = async {
        let caller = caller_id(&headers)?;
        require_role(&state, &caller, &WRITER_ROLES).await?;
        let id = parse_row_id(&key)?;
        let patch = parse_body(body)?;
        let rental = state
            .checklists
            .update_car_rental(id, &patch)
            .map_err(api_error_from_store)?;
        Ok::<_, ApiError>(ok_json(&rental))
    }
    .await;
    with_request_id(out.unwrap_or_else(|e| api_error_response(&e)), &request_id)
}

pub(crate) async fn delete_car_rental_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(key): Path<String>,
) -> Response {
    let request_id = propagated_request_id(&headers, &state);
    let out = async {
        let caller = caller_id(&headers)?;
        require_role(&state, &caller, &WRITER_ROLES).await?;
        let id = parse_row_id(&key)?;
        let deleted = state
            .checklists
            .delete_car_rental(id)
            .map_err(api_error_from_store)?;
        if !deleted {
            return Err(ApiError::not_found("CarRental", &id.to_string()));
        }
        Ok::<_, ApiError>(ok_json(&DeletedResponse { deleted: true }))
    }
    .await;
    with_request_id(out.unwrap_or_else(|e| api_error_response(&e)), &request_id)
}

// ---- booth shipping ----

pub(crate) async fn create_booth_shipping_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(key): Path<String>,
    body: Result<Json<CreateBoothShippingBody>, JsonRejection>,
) -> Response {
    let request_id = propagated_request_id(&headers, &state);
    let out = async {
        let caller = caller_id(&headers)?;
        require_role(&state, &caller, &WRITER_ROLES).await?;
        let id = parse_row_id(&key)?;
        let body = parse_body(body)?;
        let shipping = state
            .checklists
            .create_booth_shipping(
                id,
                NewBoothShipping {
                    shipping_method: body.shipping_method,
                    carrier_name: body.carrier_name,
                    tracking_number: body.tracking_number,
                    shipping_date: body.shipping_date,
                    delivery_date: body.delivery_date,
                    notes: body.notes,
                    shipped: body.shipped,
                },
            )
            .map_err(api_error_from_store)?;
        Ok::<_, ApiError>(ok_json(&shipping))
    }
    .await;
    with_request_id(out.unwrap_or_else(|e| api_error_response(&e)), &request_id)
}

pub(crate) async fn update_booth_shipping_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(key): Path<String>,
    body: Result<Json<BoothShippingPatch>, JsonRejection>,
) -> Response {
    let request_id = propagated_request_id(&headers, &state);
    let out = async {
        let caller = caller_id(&headers)?;
        require_role(&state, &caller, &WRITER_ROLES).await?;
        let id = parse_row_id(&key)?;
        let patch = parse_body(body)?;
        let shipping = state
            .checklists
            .update_booth_shipping(id, &patch)
            .map_err(api_error_from_store)?;
        Ok::<_, ApiError>(ok_json(&shipping))
    }
    .await;
    with_request_id(out.unwrap_or_else(|e| api_error_response(&e)), &request_id)
}

pub(crate) async fn delete_booth_shipping_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(key): Path<String>,
) -> Response {
    let request_id = propagated_request_id(&headers, &state);
    let out = async {
        let caller = caller_id(&headers)?;
        require_role(&state, &caller, &WRITER_ROLES).await?;
        let id = parse_row_id(&key)?;
        let deleted = state
            .checklists
            .delete_booth_shipping(id)
            .map_err(api_error_from_store)?;
        if !deleted {
            return Err(ApiError::not_found("BoothShipping", &id.to_string()));
        }
        Ok::<_, ApiError>(ok_json(&DeletedResponse { deleted: true }))
    }
    .await;
    with_request_id(out.unwrap_or_else(|e| api_error_response(&e)), &request_id)
}

// ---- custom items ----

pub(crate) async fn list_custom_items_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(key): Path<String>,
) -> Response {
    let request_id = propagated_request_id(&headers, &state);
    let out = async {
        let caller = caller_id(&headers)?;
        require_known_user(&state, &caller).await?;
        let id = parse_row_id(&key)?;
        let items = state
            .checklists
            .custom_items_for(id)
            .map_err(api_error_from_store)?;
        Ok::<_, ApiError>(ok_json(&items))
    }
    .await;
    with_request_id(out.unwrap_or_else(|e| api_error_response(&e)), &request_id)
}

pub(crate) async fn create_custom_item_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(key): Path<String>,
    body: Result<Json<CreateCustomItemBody>, JsonRejection>,
) -> Response {
    let request_id = propagated_request_id(&headers, &state);
    let out = async {
        let caller = caller_id(&headers)?;
        require_role(&state, &caller, &WRITER_ROLES).await?;
        let id = parse_row_id(&key)?;
        let body = parse_body(body)?;
        if body.title.trim().is_empty() {
            return Err(ApiError::invalid_field("title", "must not be empty"));
        }
        let item = state
            .checklists
            .create_custom_item(
                id,
                NewCustomItem {
                    title: body.title,
                    description: body.description,
                    position: body.position.unwrap_or(0),
                },
            )
            .map_err(api_error_from_store)?;
        Ok::<_, ApiError>(ok_json(&item))
    }
    .await;
    with_request_id(out.unwrap_or_else(|e| api_error_response(&e)), &request_id)
}

pub(crate) async fn update_custom_item_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(key): Path<String>,
    body: Result<Json<CustomItemPatch>, JsonRejection>,
) -> Response {
    let request_id = propagated_request_id(&headers, &state);
    let out = async {
        let caller = caller_id(&headers)?;
        require_role(&state, &caller, &WRITER_ROLES).await?;
        let id = parse_row_id(&key)?;
        let patch = parse_body(body)?;
        let item = state
            .checklists
            .update_custom_item(id, &patch)
            .map_err(api_error_from_store)?;
        Ok::<_, ApiError>(ok_json(&item))
    }
    .await;
    with_request_id(out.unwrap_or_else(|e| api_error_response(&e)), &request_id)
}

pub(crate) async fn delete_custom_item_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(key): Path<String>,
) -> Response {
    let request_id = propagated_request_id(&headers, &state);
    let out = async {
        let caller = caller_id(&headers)?;
        require_role(&state, &caller, &WRITER_ROLES).await?;
        let id = parse_row_id(&key)?;
        let deleted = state
            .checklists
            .delete_custom_item(id)
            .map_err(api_error_from_store)?;
        if !deleted {
            return Err(ApiError::not_found("CustomItem", &id.to_string()));
        }
        Ok::<_, ApiError>(ok_json(&DeletedResponse { deleted: true }))
    }
    .await;
    with_request_id(out.unwrap_or_else(|e| api_error_response(&e)), &request_id)
}
