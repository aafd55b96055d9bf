//! Integration tests for the PostgreSQL user repository
//!
//! Each test starts its own Postgres container, so they are ignored by default.
//! Run them with `cargo test -p domain_users -- --ignored` on a host with Docker.

use chrono::Utc;
use domain_users::*;
use test_utils::{TestDataBuilder, TestDatabase, assertions::*};

fn new_user(builder: &TestDataBuilder, suffix: &str) -> NewUser {
    NewUser::new(
        CreateUser {
            username: builder.username(suffix),
            email: builder.email(suffix),
            age: Some(builder.age()),
        },
        Utc::now(),
    )
}

#[tokio::test]
#[ignore = "requires docker"]
async fn test_insert_and_find_by_id() {
    let db = TestDatabase::new().await;
    let repo = PgUserRepository::new(db.connection());
    let builder = TestDataBuilder::from_test_name("pg_insert_find");

    let created = repo.insert(new_user(&builder, "main")).await.unwrap();
    assert!(created.id > 0);
    assert_eq!(created.username, builder.username("main"));

    let retrieved = repo.find_by_id(created.id).await.unwrap();
    let retrieved = assert_some(retrieved, "user should exist after insert");
    assert_eq!(retrieved.email, builder.email("main"));
    assert_eq!(retrieved.age, Some(builder.age()));
    assert_eq!(retrieved.created_at, retrieved.updated_at);
}

#[tokio::test]
#[ignore = "requires docker"]
async fn test_find_all_orders_by_id() {
    let db = TestDatabase::new().await;
    let repo = PgUserRepository::new(db.connection());
    let builder = TestDataBuilder::from_test_name("pg_find_all");

    let a = repo.insert(new_user(&builder, "a")).await.unwrap();
    let b = repo.insert(new_user(&builder, "b")).await.unwrap();

    let ids: Vec<i64> = repo
        .find_all()
        .await
        .unwrap()
        .into_iter()
        .map(|u| u.id)
        .collect();
    assert_eq!(ids, vec![a.id, b.id]);
}

#[tokio::test]
#[ignore = "requires docker"]
async fn test_update_preserves_created_at() {
    let db = TestDatabase::new().await;
    let repo = PgUserRepository::new(db.connection());
    let builder = TestDataBuilder::from_test_name("pg_update");

    let mut user = repo.insert(new_user(&builder, "main")).await.unwrap();
    let created_at = user.created_at;

    user.apply_update(
        CreateUser {
            username: builder.username("renamed"),
            email: builder.email("renamed"),
            age: None,
        },
        Utc::now(),
    );
    assert_eq!(repo.update(&user).await.unwrap(), 1);

    let stored = assert_some(repo.find_by_id(user.id).await.unwrap(), "updated user");
    assert_eq!(stored.username, builder.username("renamed"));
    assert_eq!(stored.age, None);
    assert_eq!(stored.created_at, created_at);
    assert!(stored.updated_at >= stored.created_at);
}

#[tokio::test]
#[ignore = "requires docker"]
async fn test_delete_then_lookup_is_none() {
    let db = TestDatabase::new().await;
    let repo = PgUserRepository::new(db.connection());
    let builder = TestDataBuilder::from_test_name("pg_delete");

    let user = repo.insert(new_user(&builder, "main")).await.unwrap();

    assert_eq!(repo.delete_by_id(user.id).await.unwrap(), 1);
    assert_none(repo.find_by_id(user.id).await.unwrap(), "deleted user");
    assert_eq!(repo.delete_by_id(user.id).await.unwrap(), 0);
}

#[tokio::test]
#[ignore = "requires docker"]
async fn test_service_over_postgres() {
    let db = TestDatabase::new().await;
    let service = UserService::new(PgUserRepository::new(db.connection()));

    let created = service
        .create_user(CreateUser {
            username: "zhangsan".to_string(),
            email: "zhangsan@example.com".to_string(),
            age: Some(25),
        })
        .await
        .unwrap();

    let updated = service
        .update_user(
            created.id,
            CreateUser {
                username: "zhangsan_new".to_string(),
                email: "zhangsan@example.com".to_string(),
                age: Some(26),
            },
        )
        .await
        .unwrap();
    let fetched = service.get_user_by_id(created.id).await.unwrap();
    assert_eq!(fetched, updated);
    assert_eq!(fetched.created_at, created.created_at);

    let err = service.get_user_by_id(created.id + 1000).await.unwrap_err();
    assert!(matches!(err, UserError::NotFound(_)));

    service.delete_user(created.id).await.unwrap();
    assert!(service.get_all_users().await.unwrap().is_empty());
}
