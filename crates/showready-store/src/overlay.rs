use crate::db::Db;
use crate::error::{StoreError, StoreResult};
use crate::schema::NOW;
use rusqlite::{params, OptionalExtension};
use showready_model::{EventId, ItemType, OverlayItem, OverlayStats, OverlayTransition, UserId};

const OVERLAY_COLS: &str =
    "id, user_id, event_id, item_type, completed, created_at, updated_at";

/// Per-user completion overlay, keyed by `(user_id, event_id, item_type)`.
/// Independent of the shared checklist rows: completing an overlay item
/// never touches the coordinator-owned record.
#[derive(Clone)]
pub struct OverlayStore {
    db: Db,
}

impl OverlayStore {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    pub fn find(&self, user: &UserId, event: &EventId) -> StoreResult<Vec<OverlayItem>> {
        let conn = self.db.conn();
        let mut stmt = conn.prepare_cached(&format!(
            "SELECT {OVERLAY_COLS} FROM user_checklist_items
             WHERE user_id = ?1 AND event_id = ?2
             ORDER BY created_at, id"
        ))?;
        let rows = stmt
            .query_map(params![user.as_str(), event.as_str()], overlay_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    pub fn find_one(
        &self,
        user: &UserId,
        event: &EventId,
        item_type: &ItemType,
    ) -> StoreResult<Option<OverlayItem>> {
        let conn = self.db.conn();
        Ok(conn
            .query_row(
                &format!(
                    "SELECT {OVERLAY_COLS} FROM user_checklist_items
                     WHERE user_id = ?1 AND event_id = ?2 AND item_type = ?3"
                ),
                params![user.as_str(), event.as_str(), item_type.as_str()],
                overlay_from_row,
            )
            .optional()?)
    }

    /// Single-statement insert-or-update on the composite key. Two
    /// concurrent toggles of the same key resolve last-write-wins with
    /// exactly one persisted row; there is no read-then-write window.
    pub fn upsert(
        &self,
        user: &UserId,
        event: &EventId,
        item_type: &ItemType,
        completed: bool,
    ) -> StoreResult<OverlayItem> {
        let conn = self.db.conn();
        conn.execute(
            &format!(
                "INSERT INTO user_checklist_items (user_id, event_id, item_type, completed)
                 VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT(user_id, event_id, item_type)
                 DO UPDATE SET completed = excluded.completed, updated_at = {NOW}"
            ),
            params![
                user.as_str(),
                event.as_str(),
                item_type.as_str(),
                completed
            ],
        )?;
        conn.query_row(
            &format!(
                "SELECT {OVERLAY_COLS} FROM user_checklist_items
                 WHERE user_id = ?1 AND event_id = ?2 AND item_type = ?3"
            ),
            params![user.as_str(), event.as_str(), item_type.as_str()],
            overlay_from_row,
        )
        .map_err(Into::into)
    }

    /// Update-only counterpart of [`Self::upsert`]: fails when no row
    /// exists. Kept separate so orchestration can distinguish a first
    /// completion from a toggle.
    pub fn update_completion(
        &self,
        user: &UserId,
        event: &EventId,
        item_type: &ItemType,
        completed: bool,
    ) -> StoreResult<OverlayItem> {
        let conn = self.db.conn();
        let changed = conn.execute(
            &format!(
                "UPDATE user_checklist_items
                 SET completed = ?1, updated_at = {NOW}
                 WHERE user_id = ?2 AND event_id = ?3 AND item_type = ?4"
            ),
            params![
                completed,
                user.as_str(),
                event.as_str(),
                item_type.as_str()
            ],
        )?;
        if changed == 0 {
            return Err(StoreError::not_found(
                "User checklist item",
                format!("{}-{}-{}", user.as_str(), event.as_str(), item_type.as_str()),
            ));
        }
        conn.query_row(
            &format!(
                "SELECT {OVERLAY_COLS} FROM user_checklist_items
                 WHERE user_id = ?1 AND event_id = ?2 AND item_type = ?3"
            ),
            params![user.as_str(), event.as_str(), item_type.as_str()],
            overlay_from_row,
        )
        .map_err(Into::into)
    }

    /// Explicit create-vs-toggle entry point: reports whether this call
    /// persisted the first row for the triple. The atomic primitive stays
    /// [`Self::upsert`]; this wrapper only adds observability.
    pub fn transition_item(
        &self,
        user: &UserId,
        event: &EventId,
        item_type: &ItemType,
        completed: bool,
    ) -> StoreResult<OverlayTransition> {
        match self.find_one(user, event, item_type)? {
            None => Ok(OverlayTransition {
                created: true,
                item: self.upsert(user, event, item_type, completed)?,
            }),
            Some(_) => Ok(OverlayTransition {
                created: false,
                item: self.update_completion(user, event, item_type, completed)?,
            }),
        }
    }

    /// Absence is not an error; the return value reports whether a row was
    /// removed.
    pub fn delete(
        &self,
        user: &UserId,
        event: &EventId,
        item_type: &ItemType,
    ) -> StoreResult<bool> {
        let conn = self.db.conn();
        let changed = conn.execute(
            "DELETE FROM user_checklist_items
             WHERE user_id = ?1 AND event_id = ?2 AND item_type = ?3",
            params![user.as_str(), event.as_str(), item_type.as_str()],
        )?;
        Ok(changed > 0)
    }

    pub fn stats(&self, user: &UserId, event: &EventId) -> StoreResult<OverlayStats> {
        let conn = self.db.conn();
        let (total, completed) = conn.query_row(
            "SELECT COUNT(*), COALESCE(SUM(completed), 0) FROM user_checklist_items
             WHERE user_id = ?1 AND event_id = ?2",
            params![user.as_str(), event.as_str()],
            |row| Ok((row.get::<_, i64>(0)?, row.get::<_, i64>(1)?)),
        )?;
        Ok(OverlayStats::from_counts(total, completed))
    }
}

fn overlay_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<OverlayItem> {
    Ok(OverlayItem {
        id: row.get(0)?,
        user_id: row.get(1)?,
        event_id: row.get(2)?,
        item_type: row.get(3)?,
        completed: row.get(4)?,
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}
