use showready_model::{EventId, ItemType, NewTemplate, UserId};
use showready_store::{ChecklistStore, Db, OverlayStore, TemplateApplier, TemplateStore};

fn ids() -> (UserId, EventId) {
    (
        UserId::parse("u-1").expect("user id"),
        EventId::parse("ev-1").expect("event id"),
    )
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_upserts_of_one_key_leave_exactly_one_row() {
    let db = Db::open_in_memory().expect("open db");
    let overlay = OverlayStore::new(db);
    let (user, event) = ids();
    let item = ItemType::parse("guidelines").expect("item type");

    let mut tasks = tokio::task::JoinSet::new();
    for i in 0..32 {
        let overlay = overlay.clone();
        let (user, event, item) = (user.clone(), event.clone(), item.clone());
        tasks.spawn_blocking(move || overlay.upsert(&user, &event, &item, i % 2 == 0));
    }
    while let Some(joined) = tasks.join_next().await {
        joined.expect("task").expect("upsert");
    }

    let rows = overlay.find(&user, &event).expect("find");
    assert_eq!(rows.len(), 1, "exactly one persisted row for the key");
    assert_eq!(rows[0].item_type, "guidelines");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_applies_do_not_duplicate_custom_items() {
    let db = Db::open_in_memory().expect("open db");
    let templates = TemplateStore::new(db.clone());
    let checklists = ChecklistStore::new(db);
    let applier = TemplateApplier::new(templates.clone(), checklists.clone());

    for (title, position) in [("Pack Booth", 0), ("Confirm Flights", 1), ("Order Badges", 2)] {
        templates
            .create_template(NewTemplate {
                title: title.to_string(),
                description: None,
                position,
            })
            .expect("template");
    }
    let checklist = checklists
        .get_or_create(&EventId::parse("ev-1").expect("id"))
        .expect("checklist");

    let mut runs = tokio::task::JoinSet::new();
    for _ in 0..4 {
        let applier = applier.clone();
        let id = checklist.id;
        runs.spawn(async move { applier.apply_to_checklist(id).await });
    }
    while let Some(joined) = runs.join_next().await {
        let count = joined.expect("task").expect("apply");
        assert_eq!(count, 3);
    }

    let items = checklists.custom_items_for(checklist.id).expect("items");
    assert_eq!(items.len(), 3, "duplicate guard holds under concurrency");
    assert!(checklists.get(checklist.id).expect("get").templates_applied);
}

#[test]
fn full_event_scenario() {
    let db = Db::open_in_memory().expect("open db");
    let templates = TemplateStore::new(db.clone());
    let checklists = ChecklistStore::new(db);
    let (_, event) = ids();

    // Fresh event: first access creates the checklist, everything empty.
    let aggregate = checklists.aggregate(&event).expect("aggregate");
    assert!(aggregate.custom_items.is_empty());
    assert!(aggregate.flights.is_empty());
    assert!(!aggregate.checklist.templates_applied);

    templates
        .create_template(NewTemplate {
            title: "Pack Booth".to_string(),
            description: None,
            position: 0,
        })
        .expect("template");
    templates
        .create_template(NewTemplate {
            title: "Confirm Flights".to_string(),
            description: None,
            position: 1,
        })
        .expect("template");

    let applier = TemplateApplier::new(templates, checklists.clone());
    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .expect("runtime");
    let first = runtime
        .block_on(applier.apply_to_checklist(aggregate.checklist.id))
        .expect("apply");
    assert_eq!(first, 2);
    let again = runtime
        .block_on(applier.apply_to_checklist(aggregate.checklist.id))
        .expect("re-apply");
    assert_eq!(again, 2);

    let aggregate = checklists.aggregate(&event).expect("aggregate");
    assert_eq!(aggregate.custom_items.len(), 2);
    assert!(aggregate.checklist.templates_applied);
}

#[test]
fn database_survives_reopen() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("showready.db");
    let (user, event) = ids();
    let item = ItemType::parse("custom_item_7").expect("item type");

    {
        let db = Db::open(&path).expect("open db");
        OverlayStore::new(db)
            .upsert(&user, &event, &item, true)
            .expect("upsert");
    }

    let db = Db::open(&path).expect("reopen db");
    let found = OverlayStore::new(db)
        .find_one(&user, &event, &item)
        .expect("find_one")
        .expect("row persisted");
    assert!(found.completed);
}
