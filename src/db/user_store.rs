use chrono::Utc;
use indexmap::IndexMap;
use tokio::sync::RwLock;

use crate::{
    error::UserError,
    models::user::{CreateUserDto, User, UserChanges, UserPage},
};

/// In-memory user store keyed by username.
///
/// Records are kept in insertion order, which is the order pages are cut
/// from. Every record handed out is an owned clone, so callers can never
/// reach into the map.
pub struct UserStore {
    users: RwLock<IndexMap<String, User>>,
}

impl UserStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            users: RwLock::new(IndexMap::new()),
        }
    }

    /// Get one page of users.
    ///
    /// `page_count` is computed even when the requested page lies past the
    /// end, in which case `list` is empty.
    pub async fn get_all(
        &self,
        page_current: usize,
        page_size: usize,
    ) -> Result<UserPage, UserError> {
        if page_current < 1 || page_size < 1 {
            return Err(UserError::InvalidRange {
                page_current,
                page_size,
            });
        }

        let users = self.users.read().await;
        let page_count = users.len().div_ceil(page_size);
        let offset = (page_current - 1).saturating_mul(page_size);
        let list = users.values().skip(offset).take(page_size).cloned().collect();

        Ok(UserPage {
            list,
            page_current,
            page_size,
            page_count,
        })
    }

    /// Get a user by username
    pub async fn get_by_username(&self, username: &str) -> Option<User> {
        let users = self.users.read().await;
        users.get(username).cloned()
    }

    /// Create a new user with default status and counters
    pub async fn create(&self, payload: CreateUserDto) -> Result<User, UserError> {
        let mut users = self.users.write().await;
        if users.contains_key(&payload.username) {
            return Err(UserError::UsernameExists(payload.username));
        }

        let user = User::new(payload, Utc::now());
        users.insert(user.username.clone(), user.clone());
        tracing::debug!("Inserted user {}", user.username);

        Ok(user)
    }

    /// Apply a partial update. Returns `None` if the user does not exist.
    pub async fn update(&self, username: &str, changes: UserChanges) -> Option<User> {
        let mut users = self.users.write().await;
        let user = users.get_mut(username)?;
        user.apply(changes, Utc::now());
        Some(user.clone())
    }

    /// Read-check-modify under a single write lock.
    ///
    /// `f` sees the current record and either returns the changes to apply
    /// or rejects the update; a rejection leaves the record untouched.
    pub async fn update_with<F>(&self, username: &str, f: F) -> Result<Option<User>, UserError>
    where
        F: FnOnce(&User) -> Result<UserChanges, UserError>,
    {
        let mut users = self.users.write().await;
        let Some(user) = users.get_mut(username) else {
            return Ok(None);
        };

        let changes = f(user)?;
        user.apply(changes, Utc::now());
        Ok(Some(user.clone()))
    }

    /// Delete a user. Returns whether a record was removed.
    pub async fn remove(&self, username: &str) -> bool {
        let mut users = self.users.write().await;
        // shift_remove keeps the remaining records in insertion order
        users.shift_remove(username).is_some()
    }

    /// Drop every record; intended for test isolation
    pub async fn clear_all(&self) {
        let mut users = self.users.write().await;
        users.clear();
    }

    /// Number of stored users
    pub async fn count(&self) -> usize {
        self.users.read().await.len()
    }
}

impl Default for UserStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::UserStatus;

    fn payload(username: &str) -> CreateUserDto {
        CreateUserDto {
            username: username.to_string(),
            first_name: format!("{}-first", username),
            last_name: format!("{}-last", username),
        }
    }

    async fn store_with(usernames: &[&str]) -> UserStore {
        let store = UserStore::new();
        for username in usernames {
            store.create(payload(username)).await.unwrap();
        }
        store
    }

    #[tokio::test]
    async fn test_create_and_get_returns_independent_copies() {
        let store = UserStore::new();
        let created = store.create(payload("alice")).await.unwrap();

        let mut fetched = store.get_by_username("alice").await.unwrap();
        assert_eq!(fetched, created);

        fetched.first_name = "Mallory".to_string();
        fetched.logins_counter = 99;

        let again = store.get_by_username("alice").await.unwrap();
        assert_eq!(again, created);
    }

    #[tokio::test]
    async fn test_create_sets_defaults() {
        let store = UserStore::new();
        let user = store.create(payload("alice")).await.unwrap();

        assert_eq!(user.status, UserStatus::Active);
        assert_eq!(user.logins_counter, 0);
        assert_eq!(user.creation_time, user.last_update_time);
    }

    #[tokio::test]
    async fn test_create_duplicate_keeps_existing_record() {
        let store = UserStore::new();
        let original = store.create(payload("alice")).await.unwrap();

        let duplicate = CreateUserDto {
            username: "alice".to_string(),
            first_name: "Other".to_string(),
            last_name: "Person".to_string(),
        };
        let result = store.create(duplicate).await;

        assert_eq!(result, Err(UserError::UsernameExists("alice".to_string())));
        assert_eq!(store.get_by_username("alice").await.unwrap(), original);
        assert_eq!(store.count().await, 1);
    }

    #[tokio::test]
    async fn test_get_unknown_user() {
        let store = UserStore::new();
        assert!(store.get_by_username("nobody").await.is_none());
    }

    #[tokio::test]
    async fn test_update_applies_only_present_fields() {
        let store = UserStore::new();
        let created = store.create(payload("alice")).await.unwrap();

        let updated = store
            .update(
                "alice",
                UserChanges {
                    first_name: Some("Alicia".to_string()),
                    ..UserChanges::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.first_name, "Alicia");
        assert_eq!(updated.last_name, created.last_name);
        assert_eq!(updated.status, created.status);
        assert_eq!(updated.creation_time, created.creation_time);
        assert!(updated.last_update_time >= created.last_update_time);
    }

    #[tokio::test]
    async fn test_empty_update_only_refreshes_timestamp() {
        let store = UserStore::new();
        let created = store.create(payload("alice")).await.unwrap();

        let updated = store.update("alice", UserChanges::default()).await.unwrap();

        assert!(updated.last_update_time >= created.last_update_time);
        let mut expected = created.clone();
        expected.last_update_time = updated.last_update_time;
        assert_eq!(updated, expected);
    }

    #[tokio::test]
    async fn test_update_unknown_user() {
        let store = UserStore::new();
        assert!(store.update("nobody", UserChanges::default()).await.is_none());
    }

    #[tokio::test]
    async fn test_update_with_rejection_leaves_record() {
        let store = UserStore::new();
        let created = store.create(payload("alice")).await.unwrap();

        let result = store
            .update_with("alice", |user| {
                Err(UserError::InactiveUser(user.username.clone()))
            })
            .await;

        assert_eq!(result, Err(UserError::InactiveUser("alice".to_string())));
        assert_eq!(store.get_by_username("alice").await.unwrap(), created);
    }

    #[tokio::test]
    async fn test_update_with_unknown_user() {
        let store = UserStore::new();
        let result = store
            .update_with("nobody", |_| Ok(UserChanges::default()))
            .await;
        assert_eq!(result, Ok(None));
    }

    #[tokio::test]
    async fn test_remove_is_idempotent() {
        let store = store_with(&["alice", "bob"]).await;

        assert!(store.remove("alice").await);
        assert!(!store.remove("alice").await);
        assert!(store.get_by_username("bob").await.is_some());
        assert_eq!(store.count().await, 1);
    }

    #[tokio::test]
    async fn test_clear_all() {
        let store = store_with(&["alice", "bob"]).await;
        store.clear_all().await;

        assert_eq!(store.count().await, 0);
        assert_eq!(store.get_all(1, 6).await.unwrap().page_count, 0);
    }

    #[tokio::test]
    async fn test_pagination_five_users_page_size_three() {
        let store = store_with(&["u1", "u2", "u3", "u4", "u5"]).await;

        let first = store.get_all(1, 3).await.unwrap();
        assert_eq!(first.list.len(), 3);
        assert_eq!(first.page_count, 2);

        let second = store.get_all(2, 3).await.unwrap();
        assert_eq!(second.list.len(), 2);
        assert_eq!(second.page_count, 2);
        assert_eq!(second.page_current, 2);
        assert_eq!(second.page_size, 3);
    }

    #[tokio::test]
    async fn test_pagination_follows_insertion_order() {
        let store = store_with(&["carol", "alice", "bob", "dave"]).await;
        store.remove("alice").await;
        store
            .update(
                "carol",
                UserChanges {
                    first_name: Some("Caroline".to_string()),
                    ..UserChanges::default()
                },
            )
            .await;

        let page = store.get_all(1, 10).await.unwrap();
        let names: Vec<_> = page.list.iter().map(|u| u.username.as_str()).collect();
        assert_eq!(names, vec!["carol", "bob", "dave"]);
    }

    #[tokio::test]
    async fn test_pagination_page_count() {
        for (total, size, expected) in [(0, 6, 0), (1, 6, 1), (6, 6, 1), (7, 6, 2), (10, 1, 10)] {
            let store = UserStore::new();
            for i in 0..total {
                store.create(payload(&format!("user{}", i))).await.unwrap();
            }
            let page = store.get_all(1, size).await.unwrap();
            assert_eq!(page.page_count, expected, "{} users, page size {}", total, size);
        }
    }

    #[tokio::test]
    async fn test_pagination_past_last_page() {
        let store = store_with(&["u1", "u2", "u3"]).await;

        let page = store.get_all(5, 2).await.unwrap();
        assert!(page.list.is_empty());
        assert_eq!(page.page_count, 2);

        let huge = store.get_all(usize::MAX, 2).await.unwrap();
        assert!(huge.list.is_empty());
    }

    #[tokio::test]
    async fn test_pagination_invalid_range() {
        let store = store_with(&["u1"]).await;

        for (page_current, page_size) in [(0, 6), (1, 0), (0, 0)] {
            assert_eq!(
                store.get_all(page_current, page_size).await,
                Err(UserError::InvalidRange {
                    page_current,
                    page_size
                })
            );
        }
    }
}
