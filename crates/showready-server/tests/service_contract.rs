use showready_api::ApiErrorCode;
use showready_model::{EventId, ItemType, UserId};
use showready_server::{services, AppState};
use showready_store::{Db, FakeDirectory};
use std::sync::Arc;

fn user(id: &str) -> UserId {
    UserId::parse(id).expect("user id")
}

fn event(id: &str) -> EventId {
    EventId::parse(id).expect("event id")
}

fn item(raw: &str) -> ItemType {
    ItemType::parse(raw).expect("item type")
}

async fn fixture() -> (AppState, Arc<FakeDirectory>) {
    let directory = Arc::new(FakeDirectory::default());
    directory.add_event("ev-1").await;
    directory.add_user("coord", "coordinator").await;
    directory.add_user("sales-in", "salesperson").await;
    directory.add_user("sales-out", "salesperson").await;
    directory.add_participant("ev-1", "sales-in").await;
    let db = Db::open_in_memory().expect("open db");
    (AppState::new(db, directory.clone()), directory)
}

#[tokio::test]
async fn missing_event_reports_not_found_before_authorization() {
    let (state, _) = fixture().await;
    // sales-out is neither privileged nor a participant anywhere; a missing
    // event must still surface as 404, not 403.
    let err = services::overlay_items(&state, &user("sales-out"), &event("ev-ghost"))
        .await
        .expect_err("missing event");
    assert_eq!(err.code, ApiErrorCode::NotFound);
}

#[tokio::test]
async fn outsider_is_denied_by_every_overlay_operation() {
    let (state, _) = fixture().await;
    let (u, e, t) = (user("sales-out"), event("ev-1"), item("guidelines"));

    let err = services::overlay_items(&state, &u, &e).await.expect_err("list");
    assert_eq!(err.code, ApiErrorCode::AuthorizationDenied);

    let err = services::set_overlay_completion(&state, &u, &e, &t, true)
        .await
        .expect_err("set");
    assert_eq!(err.code, ApiErrorCode::AuthorizationDenied);

    let err = services::remove_overlay_item(&state, &u, &e, &t)
        .await
        .expect_err("delete");
    assert_eq!(err.code, ApiErrorCode::AuthorizationDenied);

    let err = services::overlay_stats(&state, &u, &e).await.expect_err("stats");
    assert_eq!(err.code, ApiErrorCode::AuthorizationDenied);
}

#[tokio::test]
async fn unknown_caller_fails_closed() {
    let (state, _) = fixture().await;
    let err = services::overlay_items(&state, &user("nobody"), &event("ev-1"))
        .await
        .expect_err("unknown user");
    assert_eq!(err.code, ApiErrorCode::AuthorizationDenied);
}

#[tokio::test]
async fn participant_and_privileged_callers_pass() {
    let (state, _) = fixture().await;
    let e = event("ev-1");

    let items = services::overlay_items(&state, &user("sales-in"), &e)
        .await
        .expect("participant reads");
    assert!(items.is_empty());

    let transition =
        services::set_overlay_completion(&state, &user("coord"), &e, &item("flight"), true)
            .await
            .expect("privileged writes without participation");
    assert!(transition.created);
}

#[tokio::test]
async fn overlay_transition_reports_create_then_toggle() {
    let (state, _) = fixture().await;
    let (u, e, t) = (user("sales-in"), event("ev-1"), item("custom_item_7"));

    let first = services::set_overlay_completion(&state, &u, &e, &t, true)
        .await
        .expect("first completion");
    assert!(first.created);
    assert!(first.item.completed);

    let second = services::set_overlay_completion(&state, &u, &e, &t, false)
        .await
        .expect("toggle");
    assert!(!second.created);
    assert!(!second.item.completed);

    let stats = services::overlay_stats(&state, &u, &e).await.expect("stats");
    assert_eq!(stats.total, 1);
    assert_eq!(stats.completion_rate, 0);
}

#[tokio::test]
async fn overlays_are_independent_per_user() {
    let (state, directory) = fixture().await;
    directory.add_user("sales-2", "salesperson").await;
    directory.add_participant("ev-1", "sales-2").await;
    let e = event("ev-1");
    let t = item("flight");

    services::set_overlay_completion(&state, &user("sales-in"), &e, &t, true)
        .await
        .expect("first user");
    let other = services::overlay_items(&state, &user("sales-2"), &e)
        .await
        .expect("second user");
    assert!(
        other.is_empty(),
        "one user's completion never leaks into another's overlay"
    );
}

#[tokio::test]
async fn aggregate_lazily_creates_with_empty_collections() {
    let (state, _) = fixture().await;
    let aggregate = services::checklist_aggregate(&state, &user("sales-in"), &event("ev-1"))
        .await
        .expect("aggregate");
    assert!(aggregate.flights.is_empty());
    assert!(aggregate.custom_items.is_empty());
    assert!(!aggregate.checklist.templates_applied);

    let again = services::checklist_aggregate(&state, &user("sales-in"), &event("ev-1"))
        .await
        .expect("aggregate again");
    assert_eq!(aggregate.checklist.id, again.checklist.id);
}

#[tokio::test]
async fn aggregate_for_missing_event_is_not_found() {
    let (state, _) = fixture().await;
    let err = services::checklist_aggregate(&state, &user("coord"), &event("ev-ghost"))
        .await
        .expect_err("missing event");
    assert_eq!(err.code, ApiErrorCode::NotFound);
}

#[tokio::test]
async fn role_gate_rejects_non_writers_and_unknowns() {
    let (state, _) = fixture().await;
    services::require_role(&state, &user("coord"), &showready_store::WRITER_ROLES)
        .await
        .expect("coordinator writes");
    let err = services::require_role(&state, &user("sales-in"), &showready_store::WRITER_ROLES)
        .await
        .expect_err("participant cannot write shared record");
    assert_eq!(err.code, ApiErrorCode::AuthorizationDenied);
    let err = services::require_role(&state, &user("nobody"), &showready_store::WRITER_ROLES)
        .await
        .expect_err("unknown user");
    assert_eq!(err.code, ApiErrorCode::AuthorizationDenied);
}

#[tokio::test]
async fn opaque_item_types_survive_the_service_layer() {
    let (state, _) = fixture().await;
    let (u, e) = (user("sales-in"), event("ev-1"));
    let raw = "Stand 42 – câblage électrique ✓";
    let t = item(raw);

    services::set_overlay_completion(&state, &u, &e, &t, true)
        .await
        .expect("set");
    let items = services::overlay_items(&state, &u, &e).await.expect("list");
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].item_type, raw);
    assert!(services::remove_overlay_item(&state, &u, &e, &t)
        .await
        .expect("delete"));
    assert!(!services::remove_overlay_item(&state, &u, &e, &t)
        .await
        .expect("absent delete is not an error"));
}
