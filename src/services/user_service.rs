use std::sync::Arc;

use crate::{
    db::UserStore,
    error::UserError,
    models::user::{CreateUserDto, UpdateUserDetailsDto, UpdateUserStatusDto, User, UserChanges, UserPage},
};

/// Business rules on top of the user store.
///
/// Inactive users may not change their details or log in. Everything else
/// is delegated to the store as is.
pub struct UserService {
    user_store: Arc<UserStore>,
}

impl UserService {
    pub fn new(user_store: Arc<UserStore>) -> Self {
        Self { user_store }
    }

    pub async fn get_all(&self, page_current: usize, page_size: usize) -> Result<UserPage, UserError> {
        self.user_store.get_all(page_current, page_size).await
    }

    pub async fn get_by_username(&self, username: &str) -> Option<User> {
        self.user_store.get_by_username(username).await
    }

    pub async fn create(&self, payload: CreateUserDto) -> Result<User, UserError> {
        let user = self.user_store.create(payload).await.inspect_err(|e| {
            tracing::warn!("Create rejected: {}", e);
        })?;
        tracing::info!(
            "Created user {} ({} stored)",
            user.username,
            self.user_store.count().await
        );
        Ok(user)
    }

    pub async fn remove(&self, username: &str) -> bool {
        let removed = self.user_store.remove(username).await;
        if removed {
            tracing::info!("Removed user {}", username);
        }
        removed
    }

    /// Update first/last name. Rejected for inactive users.
    pub async fn update_user_details(
        &self,
        username: &str,
        payload: UpdateUserDetailsDto,
    ) -> Result<Option<User>, UserError> {
        let changes = UserChanges::from(payload);
        let updated = self
            .user_store
            .update_with(username, |user| {
                ensure_active(user)?;
                Ok(changes)
            })
            .await
            .inspect_err(|e| tracing::warn!("Detail update rejected: {}", e))?;

        if updated.is_some() {
            tracing::info!("Updated details of user {}", username);
        }
        Ok(updated)
    }

    /// Set the status; allowed in both directions regardless of the current one
    pub async fn update_user_status(
        &self,
        username: &str,
        payload: UpdateUserStatusDto,
    ) -> Option<User> {
        let status = payload.status;
        let updated = self.user_store.update(username, payload.into()).await;
        if updated.is_some() {
            tracing::info!("Set status of user {} to {:?}", username, status);
        }
        updated
    }

    /// Count one login. Rejected for inactive users.
    pub async fn increase_logins_counter(&self, username: &str) -> Result<Option<User>, UserError> {
        self.user_store
            .update_with(username, |user| {
                ensure_active(user)?;
                Ok(UserChanges {
                    logins_counter: Some(user.logins_counter.saturating_add(1)),
                    ..UserChanges::default()
                })
            })
            .await
            .inspect_err(|e| tracing::warn!("Login rejected: {}", e))
    }
}

fn ensure_active(user: &User) -> Result<(), UserError> {
    if user.is_active() {
        Ok(())
    } else {
        Err(UserError::InactiveUser(user.username.clone()))
    }
}
