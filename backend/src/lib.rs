//! Sentinela backend library: domain model, ports, and adapters for daily
//! wellness check-ins.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;

pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
