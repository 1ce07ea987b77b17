//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL-backed repositories using Diesel ORM
//! - **memory**: process-local repositories used when no database is configured
//! - **mail**: HTTP mail relay client and a logging fallback
//! - **uploads**: capability-scoped file store for logos and attachments
//! - **password**: bcrypt password hashing
//!
//! Adapters are thin translators that convert between domain types and
//! infrastructure-specific representations. They contain no business logic.

pub mod mail;
pub mod memory;
pub mod password;
pub mod persistence;
pub mod uploads;
