use sea_orm::ActiveValue::{NotSet, Set};
use sea_orm::entity::prelude::*;

use crate::models::{NewUser, User};

/// Sea-ORM Entity for the users table
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub username: String,
    pub email: String,
    pub age: Option<i32>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for User {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            username: model.username,
            email: model.email,
            age: model.age,
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        }
    }
}

// The id is left to the BIGSERIAL sequence.
impl From<NewUser> for ActiveModel {
    fn from(input: NewUser) -> Self {
        ActiveModel {
            id: NotSet,
            username: Set(input.username),
            email: Set(input.email),
            age: Set(input.age),
            created_at: Set(input.created_at.into()),
            updated_at: Set(input.updated_at.into()),
        }
    }
}
