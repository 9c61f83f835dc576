// SPDX-License-Identifier: Apache-2.0

use crate::db::Db;
use crate::error::StoreResult;
use async_trait::async_trait;
use rusqlite::{params, OptionalExtension};
use showready_model::{EventId, UserId};
use std::collections::{HashMap, HashSet};
use tokio::sync::Mutex;

/// Seam to the surrounding system's user/event records. The checklist core
/// only ever asks three questions; everything else about users and events
/// belongs to external collaborators.
#[async_trait]
pub trait AccessDirectory: Send + Sync {
    async fn event_exists(&self, event: &EventId) -> StoreResult<bool>;
    async fn user_role(&self, user: &UserId) -> StoreResult<Option<String>>;
    async fn is_participant(&self, user: &UserId, event: &EventId) -> StoreResult<bool>;
}

/// Directory backed by the collaborator tables in the service database.
#[derive(Clone)]
pub struct SqliteDirectory {
    db: Db,
}

impl SqliteDirectory {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    /// Bootstrap helpers for local deployments and integration tests. The
    /// rows themselves are owned by the surrounding system in production.
    pub fn seed_user(&self, user: &UserId, role: &str) -> StoreResult<()> {
        let conn = self.db.conn();
        conn.execute(
            "INSERT INTO users (id, role) VALUES (?1, ?2)
             ON CONFLICT(id) DO UPDATE SET role = excluded.role",
            params![user.as_str(), role],
        )?;
        Ok(())
    }

    pub fn seed_event(&self, event: &EventId, name: &str) -> StoreResult<()> {
        let conn = self.db.conn();
        conn.execute(
            "INSERT INTO events (id, name) VALUES (?1, ?2)
             ON CONFLICT(id) DO UPDATE SET name = excluded.name",
            params![event.as_str(), name],
        )?;
        Ok(())
    }

    pub fn seed_participant(&self, event: &EventId, user: &UserId) -> StoreResult<()> {
        let conn = self.db.conn();
        conn.execute(
            "INSERT INTO event_participants (event_id, user_id) VALUES (?1, ?2)
             ON CONFLICT(event_id, user_id) DO NOTHING",
            params![event.as_str(), user.as_str()],
        )?;
        Ok(())
    }
}

#[async_trait]
impl AccessDirectory for SqliteDirectory {
    async fn event_exists(&self, event: &EventId) -> StoreResult<bool> {
        let conn = self.db.conn();
        let found = conn
            .query_row(
                "SELECT 1 FROM events WHERE id = ?1",
                params![event.as_str()],
                |_| Ok(()),
            )
            .optional()?;
        Ok(found.is_some())
    }

    async fn user_role(&self, user: &UserId) -> StoreResult<Option<String>> {
        let conn = self.db.conn();
        Ok(conn
            .query_row(
                "SELECT role FROM users WHERE id = ?1",
                params![user.as_str()],
                |row| row.get::<_, String>(0),
            )
            .optional()?)
    }

    async fn is_participant(&self, user: &UserId, event: &EventId) -> StoreResult<bool> {
        let conn = self.db.conn();
        let found = conn
            .query_row(
                "SELECT 1 FROM event_participants WHERE event_id = ?1 AND user_id = ?2",
                params![event.as_str(), user.as_str()],
                |_| Ok(()),
            )
            .optional()?;
        Ok(found.is_some())
    }
}

/// In-memory directory for tests.
#[derive(Default)]
pub struct FakeDirectory {
    pub events: Mutex<HashSet<String>>,
    pub roles: Mutex<HashMap<String, String>>,
    pub participants: Mutex<HashSet<(String, String)>>,
}

impl FakeDirectory {
    pub async fn add_event(&self, event: &str) {
        self.events.lock().await.insert(event.to_string());
    }

    pub async fn add_user(&self, user: &str, role: &str) {
        self.roles
            .lock()
            .await
            .insert(user.to_string(), role.to_string());
    }

    pub async fn add_participant(&self, event: &str, user: &str) {
        self.participants
            .lock()
            .await
            .insert((event.to_string(), user.to_string()));
    }
}

#[async_trait]
impl AccessDirectory for FakeDirectory {
    async fn event_exists(&self, event: &EventId) -> StoreResult<bool> {
        Ok(self.events.lock().await.contains(event.as_str()))
    }

    async fn user_role(&self, user: &UserId) -> StoreResult<Option<String>> {
        Ok(self.roles.lock().await.get(user.as_str()).cloned())
    }

    async fn is_participant(&self, user: &UserId, event: &EventId) -> StoreResult<bool> {
        Ok(self
            .participants
            .lock()
            .await
            .contains(&(event.as_str().to_string(), user.as_str().to_string())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Db;

    #[tokio::test]
    async fn sqlite_directory_answers_the_three_questions() {
        let directory = SqliteDirectory::new(Db::open_in_memory().expect("open db"));
        let user = UserId::parse("u-1").expect("user id");
        let event = EventId::parse("ev-1").expect("event id");

        assert!(!directory.event_exists(&event).await.expect("missing event"));
        assert!(directory.user_role(&user).await.expect("unknown user").is_none());

        directory.seed_user(&user, "salesperson").expect("seed user");
        directory.seed_event(&event, "Hannover Messe").expect("seed event");
        assert!(directory.event_exists(&event).await.expect("event"));
        assert_eq!(
            directory.user_role(&user).await.expect("role").as_deref(),
            Some("salesperson")
        );

        assert!(!directory
            .is_participant(&user, &event)
            .await
            .expect("not linked yet"));
        directory.seed_participant(&event, &user).expect("seed link");
        directory
            .seed_participant(&event, &user)
            .expect("seeding twice is fine");
        assert!(directory.is_participant(&user, &event).await.expect("linked"));
    }
}
