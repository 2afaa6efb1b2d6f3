use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Account status; only `Active` users may log in or edit their details
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    #[default]
    Active,
    Inactive,
}

/// Stored user record, also its JSON representation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub status: UserStatus,
    pub logins_counter: u64,
    pub creation_time: DateTime<Utc>,
    pub last_update_time: DateTime<Utc>,
}

impl User {
    /// Build a fresh record from a create payload, stamped with `now`
    pub fn new(payload: CreateUserDto, now: DateTime<Utc>) -> Self {
        Self {
            username: payload.username,
            first_name: payload.first_name,
            last_name: payload.last_name,
            status: UserStatus::default(),
            logins_counter: 0,
            creation_time: now,
            last_update_time: now,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == UserStatus::Active
    }

    /// Apply the present fields of `changes` and refresh `last_update_time`.
    ///
    /// The timestamp never moves backwards, even if the wall clock does.
    pub fn apply(&mut self, changes: UserChanges, now: DateTime<Utc>) {
        if let Some(first_name) = changes.first_name {
            self.first_name = first_name;
        }
        if let Some(last_name) = changes.last_name {
            self.last_name = last_name;
        }
        if let Some(status) = changes.status {
            self.status = status;
        }
        if let Some(logins_counter) = changes.logins_counter {
            self.logins_counter = logins_counter;
        }
        self.last_update_time = now.max(self.last_update_time);
    }
}

/// Partial update; `None` fields are left untouched
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserChanges {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub status: Option<UserStatus>,
    pub logins_counter: Option<u64>,
}

/// Create request body
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateUserDto {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
}

impl CreateUserDto {
    pub fn validate(&self) -> Result<(), AppError> {
        require_non_blank("username", &self.username)?;
        require_non_blank("firstName", &self.first_name)?;
        require_non_blank("lastName", &self.last_name)
    }
}

/// Detail update request body
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateUserDetailsDto {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl UpdateUserDetailsDto {
    pub fn validate(&self) -> Result<(), AppError> {
        if let Some(first_name) = &self.first_name {
            require_non_blank("firstName", first_name)?;
        }
        if let Some(last_name) = &self.last_name {
            require_non_blank("lastName", last_name)?;
        }
        Ok(())
    }
}

impl From<UpdateUserDetailsDto> for UserChanges {
    fn from(dto: UpdateUserDetailsDto) -> Self {
        Self {
            first_name: dto.first_name,
            last_name: dto.last_name,
            ..Self::default()
        }
    }
}

/// Status update request body
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateUserStatusDto {
    pub status: UserStatus,
}

impl From<UpdateUserStatusDto> for UserChanges {
    fn from(dto: UpdateUserStatusDto) -> Self {
        Self {
            status: Some(dto.status),
            ..Self::default()
        }
    }
}

/// One page of users plus the paging arithmetic that produced it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPage {
    pub list: Vec<User>,
    pub page_current: usize,
    pub page_size: usize,
    pub page_count: usize,
}

/// Listing query string; missing values fall back to defaults
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageQuery {
    pub page_current: Option<usize>,
    pub page_size: Option<usize>,
}

fn require_non_blank(field: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::BadRequest(format!("'{}' must not be empty", field)));
    }
    Ok(())
}
