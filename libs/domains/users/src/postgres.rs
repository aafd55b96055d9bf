use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};

use crate::{
    entity,
    error::UserResult,
    models::{NewUser, User},
    repository::UserRepository,
};

/// PostgreSQL implementation of UserRepository using SeaORM
#[derive(Clone)]
pub struct PgUserRepository {
    db: DatabaseConnection,
}

impl PgUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn insert(&self, user: NewUser) -> UserResult<User> {
        let active_model: entity::ActiveModel = user.into();
        let model = active_model.insert(&self.db).await?;

        tracing::info!(user_id = model.id, "Inserted user row");
        Ok(model.into())
    }

    async fn find_all(&self) -> UserResult<Vec<User>> {
        let models = entity::Entity::find()
            .order_by_asc(entity::Column::Id)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn find_by_id(&self, id: i64) -> UserResult<Option<User>> {
        let model = entity::Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(Into::into))
    }

    async fn update(&self, user: &User) -> UserResult<u64> {
        let result = entity::Entity::update_many()
            .col_expr(entity::Column::Username, Expr::value(user.username.clone()))
            .col_expr(entity::Column::Email, Expr::value(user.email.clone()))
            .col_expr(entity::Column::Age, Expr::value(user.age))
            .col_expr(
                entity::Column::UpdatedAt,
                Expr::value(sea_orm::prelude::DateTimeWithTimeZone::from(user.updated_at)),
            )
            .filter(entity::Column::Id.eq(user.id))
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected)
    }

    async fn delete_by_id(&self, id: i64) -> UserResult<u64> {
        let result = entity::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(result.rows_affected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::UserError;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, DbErr, MockDatabase, MockExecResult};

    fn model(id: i64, username: &str) -> entity::Model {
        let now = Utc::now().into();
        entity::Model {
            id,
            username: username.to_string(),
            email: format!("{}@example.com", username),
            age: Some(25),
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_insert_returns_stored_row() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![model(1, "zhangsan")]])
            .into_connection();
        let repo = PgUserRepository::new(db);

        let now = Utc::now();
        let user = repo
            .insert(NewUser {
                username: "zhangsan".to_string(),
                email: "zhangsan@example.com".to_string(),
                age: Some(25),
                created_at: now,
                updated_at: now,
            })
            .await
            .unwrap();

        assert_eq!(user.id, 1);
        assert_eq!(user.username, "zhangsan");
    }

    #[tokio::test]
    async fn test_find_all_orders_by_id() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![model(1, "a"), model(2, "b")]])
            .into_connection();
        let repo = PgUserRepository::new(db.clone());

        let users = repo.find_all().await.unwrap();
        assert_eq!(users.len(), 2);

        let sql = format!("{:?}", db.into_transaction_log()[0]);
        assert!(sql.contains("ORDER BY"));
        assert!(sql.contains("ASC"));
    }

    #[tokio::test]
    async fn test_find_by_id_absent() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<entity::Model>::new()])
            .into_connection();
        let repo = PgUserRepository::new(db);

        assert!(repo.find_by_id(999).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_reports_rows_affected() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                },
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                },
            ])
            .into_connection();
        let repo = PgUserRepository::new(db);

        let user: User = model(1, "zhangsan_new").into();
        assert_eq!(repo.update(&user).await.unwrap(), 1);
        assert_eq!(repo.update(&user).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_update_never_writes_created_at() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .into_connection();
        let repo = PgUserRepository::new(db.clone());

        let user: User = model(1, "zhangsan").into();
        repo.update(&user).await.unwrap();

        let sql = format!("{:?}", db.into_transaction_log()[0]);
        assert!(sql.contains("updated_at"));
        assert!(!sql.contains("created_at"));
    }

    #[tokio::test]
    async fn test_delete_reports_rows_affected() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .into_connection();
        let repo = PgUserRepository::new(db);

        assert_eq!(repo.delete_by_id(1).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_database_error_maps_to_storage() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_errors([DbErr::Custom("connection refused".to_string())])
            .into_connection();
        let repo = PgUserRepository::new(db);

        let err = repo.find_all().await.unwrap_err();
        assert!(matches!(err, UserError::Storage(_)));
    }
}
