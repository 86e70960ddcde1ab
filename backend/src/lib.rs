//! Blog backend: posts, groups, comments and author follows served over HTTP.
//!
//! The domain owns the rules and exposes driving ports; `inbound::http`
//! adapts them to Actix handlers and `outbound` supplies storage.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

/// Public OpenAPI surface used by Swagger UI.
pub use doc::ApiDoc;
pub use middleware::Trace;
