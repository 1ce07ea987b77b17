//! Multi-tenant safety reporting backend.
//!
//! Tenants (clients) own users; users build dynamic forms, collect responses
//! and share them as HTML reports or email. The crate follows a hexagonal
//! layout: [`domain`] holds entities, ports and services, [`inbound`] the
//! HTTP adapter, and [`outbound`] the PostgreSQL, in-memory, mail and upload
//! adapters.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
pub use settings::AppSettings;
