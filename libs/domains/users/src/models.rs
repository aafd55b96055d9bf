use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Persisted user record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub age: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Overwrite the mutable fields and refresh `updated_at`.
    ///
    /// `updated_at` never moves before `created_at`, even if the clock does.
    pub fn apply_update(&mut self, input: CreateUser, now: DateTime<Utc>) {
        self.username = input.username;
        self.email = input.email;
        self.age = input.age;
        self.updated_at = now.max(self.created_at);
    }
}

/// A record about to be inserted; storage assigns the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub age: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl NewUser {
    /// Both timestamps come from the same clock read.
    pub fn new(input: CreateUser, now: DateTime<Utc>) -> Self {
        Self {
            username: input.username,
            email: input.email,
            age: input.age,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Request body for both create and update
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateUser {
    #[validate(length(min = 1, message = "username must not be empty"))]
    #[schema(example = "zhangsan", min_length = 1)]
    pub username: String,
    #[validate(email(message = "email must be a valid email address"))]
    #[schema(example = "zhangsan@example.com")]
    pub email: String,
    #[schema(example = 25)]
    pub age: Option<i32>,
}

/// User as returned by the API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub age: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            age: user.age,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}
