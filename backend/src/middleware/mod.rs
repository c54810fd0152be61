//! Request middleware. Session checks live in the
//! [`SessionContext`](crate::inbound::http::session::SessionContext)
//! extractor rather than here.

pub mod trace;

pub use trace::Trace;
