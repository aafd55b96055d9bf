use chrono::{DateTime, SubsecRound, Utc};
use validator::Validate;

use crate::error::{UserError, UserResult};
use crate::models::{CreateUser, NewUser, UserResponse};
use crate::repository::UserRepository;

/// Clock read at the precision `TIMESTAMPTZ` stores (microseconds), so a
/// returned timestamp is identical to the one a later read yields.
fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

/// Service layer for User business logic
pub struct UserService<R: UserRepository> {
    repository: R,
}

impl<R: UserRepository> UserService<R> {
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    /// Create a new user. Duplicate usernames and emails are allowed.
    pub async fn create_user(&self, input: CreateUser) -> UserResult<UserResponse> {
        input
            .validate()
            .map_err(|e| UserError::Validation(e.to_string()))?;

        let user = self
            .repository
            .insert(NewUser::new(input, now()))
            .await?;

        tracing::info!(user_id = user.id, "Created user");
        Ok(user.into())
    }

    /// All users in storage order
    pub async fn get_all_users(&self) -> UserResult<Vec<UserResponse>> {
        let users = self.repository.find_all().await?;
        tracing::debug!(count = users.len(), "Listed users");
        Ok(users.into_iter().map(Into::into).collect())
    }

    pub async fn get_user_by_id(&self, id: i64) -> UserResult<UserResponse> {
        tracing::debug!(user_id = id, "Fetching user");
        self.repository
            .find_by_id(id)
            .await?
            .map(Into::into)
            .ok_or(UserError::NotFound(id))
    }

    /// Replace username, email and age of an existing user.
    pub async fn update_user(&self, id: i64, input: CreateUser) -> UserResult<UserResponse> {
        input
            .validate()
            .map_err(|e| UserError::Validation(e.to_string()))?;

        let mut user = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id))?;

        user.apply_update(input, now());

        // Deleted between the read and the write.
        if self.repository.update(&user).await? == 0 {
            return Err(UserError::NotFound(id));
        }

        tracing::info!(user_id = id, "Updated user");
        Ok(user.into())
    }

    pub async fn delete_user(&self, id: i64) -> UserResult<()> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id))?;

        if self.repository.delete_by_id(id).await? == 0 {
            return Err(UserError::NotFound(id));
        }

        tracing::info!(user_id = id, "Deleted user");
        Ok(())
    }
}
