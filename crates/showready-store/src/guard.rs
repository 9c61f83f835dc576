use crate::directory::AccessDirectory;
use crate::error::StoreResult;
use showready_model::{EventId, UserId};
use std::sync::Arc;

/// Roles that may read and write any event's checklist and overlay data
/// without a participation link.
pub const PRIVILEGED_ROLES: [&str; 3] = ["admin", "coordinator", "developer"];

/// Roles allowed to mutate the shared checklist record.
pub const WRITER_ROLES: [&str; 3] = PRIVILEGED_ROLES;

/// Roles allowed to administer the global template catalog.
pub const TEMPLATE_ADMIN_ROLES: [&str; 2] = ["admin", "developer"];

/// Resolves whether a user may touch an event's checklist/overlay data.
/// Unknown users fail closed: `false`, never an error.
#[derive(Clone)]
pub struct AccessGuard {
    directory: Arc<dyn AccessDirectory>,
}

impl AccessGuard {
    #[must_use]
    pub fn new(directory: Arc<dyn AccessDirectory>) -> Self {
        Self { directory }
    }

    pub async fn verify(&self, user: &UserId, event: &EventId) -> StoreResult<bool> {
        let Some(role) = self.directory.user_role(user).await? else {
            return Ok(false);
        };
        if PRIVILEGED_ROLES.contains(&role.as_str()) {
            return Ok(true);
        }
        self.directory.is_participant(user, event).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::FakeDirectory;

    fn ids(user: &str, event: &str) -> (UserId, EventId) {
        (
            UserId::parse(user).expect("user id"),
            EventId::parse(event).expect("event id"),
        )
    }

    #[tokio::test]
    async fn privileged_roles_pass_without_participation() {
        let directory = Arc::new(FakeDirectory::default());
        directory.add_event("ev-1").await;
        for role in PRIVILEGED_ROLES {
            directory.add_user(role, role).await;
        }
        let guard = AccessGuard::new(directory);
        for role in PRIVILEGED_ROLES {
            let (u, e) = ids(role, "ev-1");
            assert!(guard.verify(&u, &e).await.expect("verify"), "{role} must pass");
        }
    }

    #[tokio::test]
    async fn participants_pass_and_outsiders_do_not() {
        let directory = FakeDirectory::default();
        directory.add_event("ev-1").await;
        directory.add_user("sales-1", "salesperson").await;
        directory.add_user("sales-2", "salesperson").await;
        directory.add_participant("ev-1", "sales-1").await;

        let guard = AccessGuard::new(Arc::new(directory));
        let (insider, e) = ids("sales-1", "ev-1");
        assert!(guard.verify(&insider, &e).await.expect("verify"));
        let (outsider, e) = ids("sales-2", "ev-1");
        assert!(!guard.verify(&outsider, &e).await.expect("verify"));
    }

    #[tokio::test]
    async fn unknown_user_fails_closed_without_error() {
        let directory = FakeDirectory::default();
        directory.add_event("ev-1").await;
        let guard = AccessGuard::new(Arc::new(directory));
        let (ghost, e) = ids("nobody", "ev-1");
        assert!(!guard.verify(&ghost, &e).await.expect("must not error"));
    }
}
