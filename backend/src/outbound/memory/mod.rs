//! In-process adapters for the driven ports.
//!
//! Used when no database is configured and by the behaviour tests. Each store
//! guards a map with a `tokio` read/write lock and mirrors the uniqueness
//! rules of the PostgreSQL schema, so conflicts surface the same way.

mod clients;
mod drafts;
mod forms;
mod responses;
mod users;

pub use clients::MemoryClientRepository;
pub use drafts::MemoryDraftStore;
pub use forms::MemoryFormRepository;
pub use responses::MemoryResponseRepository;
pub use users::MemoryUserRepository;
