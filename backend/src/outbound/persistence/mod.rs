//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Repository implementations only translate between Diesel rows and domain
//! types; validation runs through the domain constructors on every read.
//! Connections come from a `bb8` pool through `diesel-async`, and the schema
//! is brought up to date by embedded migrations at start-up.
//!
//! # Example
//!
//! ```ignore
//! use safety_backend::outbound::persistence::{DbPool, DieselFormRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/safety")).await?;
//! let forms = DieselFormRepository::new(pool);
//! ```

mod diesel_client_repository;
mod diesel_draft_store;
mod diesel_error_mapping;
mod diesel_form_repository;
mod diesel_response_repository;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_client_repository::DieselClientRepository;
pub use diesel_draft_store::DieselDraftStore;
pub use diesel_form_repository::DieselFormRepository;
pub use diesel_response_repository::DieselResponseRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::run_migrations;
pub use pool::{DbPool, PoolConfig, PoolError};
