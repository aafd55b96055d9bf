//! Users Domain
//!
//! CRUD for a single `User` resource backed by the `users` table.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints, body validation
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← Existence checks, output mapping
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← Data access (trait + in-memory and PostgreSQL implementations)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← Records, DTOs, SeaORM entity
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_users::{handlers, InMemoryUserRepository, UserService};
//!
//! let service = UserService::new(InMemoryUserRepository::new());
//! let router = handlers::router(service);
//! ```

pub mod entity;
pub mod error;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;

pub use error::{UserError, UserResult};
pub use models::{CreateUser, NewUser, User, UserResponse};
pub use postgres::PgUserRepository;
pub use repository::{InMemoryUserRepository, UserRepository};
pub use service::UserService;
