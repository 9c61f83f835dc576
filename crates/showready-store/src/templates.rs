// SPDX-License-Identifier: Apache-2.0

use crate::checklist::ChecklistStore;
use crate::db::Db;
use crate::error::{StoreError, StoreResult};
use crate::schema::NOW;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter};
use showready_model::{NewTemplate, Template, TemplatePatch};
use tracing::{info, warn};

const TEMPLATE_COLS: &str = "id, title, description, position, active, created_at, updated_at";

/// Global template catalog: reusable custom-item blueprints, not owned by
/// any single event.
#[derive(Clone)]
pub struct TemplateStore {
    db: Db,
}

impl TemplateStore {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    pub fn active_templates(&self) -> StoreResult<Vec<Template>> {
        let conn = self.db.conn();
        let mut stmt = conn.prepare_cached(&format!(
            "SELECT {TEMPLATE_COLS} FROM checklist_templates
             WHERE active = 1 ORDER BY position, id"
        ))?;
        let rows = stmt
            .query_map([], template_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    pub fn all_templates(&self) -> StoreResult<Vec<Template>> {
        let conn = self.db.conn();
        let mut stmt = conn.prepare_cached(&format!(
            "SELECT {TEMPLATE_COLS} FROM checklist_templates ORDER BY position, id"
        ))?;
        let rows = stmt
            .query_map([], template_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    pub fn create_template(&self, new: NewTemplate) -> StoreResult<Template> {
        let conn = self.db.conn();
        conn.execute(
            "INSERT INTO checklist_templates (title, description, position, active)
             VALUES (?1, ?2, ?3, 1)",
            params![new.title, new.description, new.position],
        )?;
        let id = conn.last_insert_rowid();
        conn.query_row(
            &format!("SELECT {TEMPLATE_COLS} FROM checklist_templates WHERE id = ?1"),
            params![id],
            template_from_row,
        )
        .map_err(Into::into)
    }

    pub fn update_template(&self, id: i64, patch: &TemplatePatch) -> StoreResult<Template> {
        if patch.is_empty() {
            return Err(StoreError::EmptyPatch);
        }
        let mut sets: Vec<&'static str> = Vec::new();
        let mut values: Vec<Value> = Vec::new();
        if let Some(v) = &patch.title {
            sets.push("title = ?");
            values.push(Value::from(v.clone()));
        }
        if let Some(v) = &patch.description {
            sets.push("description = ?");
            values.push(Value::from(v.clone()));
        }
        if let Some(v) = patch.position {
            sets.push("position = ?");
            values.push(Value::from(v));
        }
        if let Some(v) = patch.active {
            sets.push("active = ?");
            values.push(Value::from(v));
        }
        values.push(Value::from(id));

        let conn = self.db.conn();
        let sql = format!(
            "UPDATE checklist_templates SET {}, updated_at = {NOW} WHERE id = ?",
            sets.join(", ")
        );
        let changed = conn.execute(&sql, params_from_iter(values))?;
        if changed == 0 {
            return Err(StoreError::not_found("Template", id.to_string()));
        }
        conn.query_row(
            &format!("SELECT {TEMPLATE_COLS} FROM checklist_templates WHERE id = ?1"),
            params![id],
            template_from_row,
        )
        .map_err(Into::into)
    }

    /// Soft delete: the template stops being applied but its history stays.
    pub fn soft_delete_template(&self, id: i64) -> StoreResult<bool> {
        let conn = self.db.conn();
        let changed = conn.execute(
            &format!(
                "UPDATE checklist_templates SET active = 0, updated_at = {NOW} WHERE id = ?1"
            ),
            params![id],
        )?;
        Ok(changed > 0)
    }
}

/// Bulk, idempotent application of the active template set to one
/// checklist. Writes through [`ChecklistStore`]'s custom-item creation path
/// and then flips the one-way `templates_applied` flag.
#[derive(Clone)]
pub struct TemplateApplier {
    templates: TemplateStore,
    checklists: ChecklistStore,
}

impl TemplateApplier {
    #[must_use]
    pub fn new(templates: TemplateStore, checklists: ChecklistStore) -> Self {
        Self {
            templates,
            checklists,
        }
    }

    /// Fans out one creation attempt per active template, concurrently and
    /// without early abort. Duplicate titles are skipped by the storage
    /// guard; other per-item failures are logged and tolerated (best-effort
    /// batch). The flag is set unconditionally and the return value is the
    /// number of templates considered, not rows inserted.
    pub async fn apply_to_checklist(&self, checklist_id: i64) -> StoreResult<usize> {
        // Resolve the target first so a bad id is a 404, not a pile of
        // foreign-key failures.
        self.checklists.get(checklist_id)?;

        let templates = self.templates.active_templates()?;
        let mut tasks = tokio::task::JoinSet::new();
        for template in &templates {
            let checklists = self.checklists.clone();
            let title = template.title.clone();
            let description = template.description.clone();
            let position = template.position;
            tasks.spawn_blocking(move || {
                checklists.create_custom_item_if_absent(
                    checklist_id,
                    &title,
                    description.as_deref(),
                    position,
                )
            });
        }
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(Ok(())) => {}
                Ok(Err(e)) => warn!(checklist_id, "template item insert failed: {e}"),
                Err(e) => warn!(checklist_id, "template insert task failed: {e}"),
            }
        }

        self.checklists.mark_templates_applied(checklist_id)?;
        info!(
            checklist_id,
            considered = templates.len(),
            "applied template set"
        );
        Ok(templates.len())
    }
}

fn template_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Template> {
    Ok(Template {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        position: row.get(3)?,
        active: row.get(4)?,
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Db;
    use showready_model::EventId;

    fn fixtures() -> (TemplateStore, ChecklistStore, TemplateApplier) {
        let db = Db::open_in_memory().expect("open db");
        let templates = TemplateStore::new(db.clone());
        let checklists = ChecklistStore::new(db);
        let applier = TemplateApplier::new(templates.clone(), checklists.clone());
        (templates, checklists, applier)
    }

    fn template(title: &str, position: i64) -> NewTemplate {
        NewTemplate {
            title: title.to_string(),
            description: Some(format!("{title} details")),
            position,
        }
    }

    #[test]
    fn active_templates_order_by_position_then_id() {
        let (templates, _, _) = fixtures();
        templates.create_template(template("late", 10)).expect("t1");
        templates.create_template(template("early", 1)).expect("t2");
        templates
            .create_template(template("also early", 1))
            .expect("t3");

        let titles: Vec<_> = templates
            .active_templates()
            .expect("list")
            .into_iter()
            .map(|t| t.title)
            .collect();
        assert_eq!(titles, vec!["early", "also early", "late"]);
    }

    #[test]
    fn soft_delete_removes_from_active_set_only() {
        let (templates, _, _) = fixtures();
        let keep = templates.create_template(template("keep", 0)).expect("t1");
        let retired = templates.create_template(template("retire", 1)).expect("t2");

        assert!(templates
            .soft_delete_template(retired.id)
            .expect("soft delete"));
        assert!(!templates.soft_delete_template(999).expect("missing id"));

        let active: Vec<_> = templates.active_templates().expect("active");
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, keep.id);
        assert_eq!(templates.all_templates().expect("all").len(), 2);
    }

    #[tokio::test]
    async fn apply_is_idempotent_and_counts_templates_considered() {
        let (templates, checklists, applier) = fixtures();
        templates
            .create_template(template("Pack Booth", 0))
            .expect("t1");
        templates
            .create_template(template("Confirm Flights", 1))
            .expect("t2");
        let checklist = checklists
            .get_or_create(&EventId::parse("ev-1").expect("id"))
            .expect("checklist");

        let first = applier.apply_to_checklist(checklist.id).await.expect("apply");
        assert_eq!(first, 2);
        let items = checklists.custom_items_for(checklist.id).expect("items");
        assert_eq!(items.len(), 2);
        assert!(items.iter().all(|i| !i.completed));
        assert!(checklists.get(checklist.id).expect("get").templates_applied);

        let second = applier
            .apply_to_checklist(checklist.id)
            .await
            .expect("re-apply");
        assert_eq!(second, 2, "count reports templates considered, not inserts");
        assert_eq!(
            checklists.custom_items_for(checklist.id).expect("items").len(),
            2,
            "re-running must not duplicate rows"
        );
    }

    #[tokio::test]
    async fn apply_with_no_templates_still_flips_the_flag() {
        let (_, checklists, applier) = fixtures();
        let checklist = checklists
            .get_or_create(&EventId::parse("ev-1").expect("id"))
            .expect("checklist");
        let count = applier.apply_to_checklist(checklist.id).await.expect("apply");
        assert_eq!(count, 0);
        assert!(checklists.get(checklist.id).expect("get").templates_applied);
    }

    #[tokio::test]
    async fn apply_to_missing_checklist_is_not_found() {
        let (templates, _, applier) = fixtures();
        templates
            .create_template(template("Pack Booth", 0))
            .expect("t1");
        let err = applier.apply_to_checklist(404).await.expect_err("missing");
        assert!(matches!(err, StoreError::NotFound { resource: "Checklist", .. }));
    }

    #[tokio::test]
    async fn templates_added_after_apply_do_not_reset_the_flag() {
        let (templates, checklists, applier) = fixtures();
        templates
            .create_template(template("Pack Booth", 0))
            .expect("t1");
        let checklist = checklists
            .get_or_create(&EventId::parse("ev-1").expect("id"))
            .expect("checklist");
        applier.apply_to_checklist(checklist.id).await.expect("apply");

        templates
            .create_template(template("Order Badges", 2))
            .expect("t2");
        let count = applier
            .apply_to_checklist(checklist.id)
            .await
            .expect("re-apply");
        assert_eq!(count, 2);
        let items = checklists.custom_items_for(checklist.id).expect("items");
        assert_eq!(items.len(), 2, "new template lands, old one is skipped");
        assert!(checklists.get(checklist.id).expect("get").templates_applied);
    }
}
