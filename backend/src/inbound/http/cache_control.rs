//! Cache-control policies for HTTP handlers.
//!
//! Everything behind the session cookie is per-user; responses that carry or
//! clear the session cookie must never be stored at all.

use actix_web::http::header::CACHE_CONTROL;

/// Per-user reads: revalidate before reuse, never share.
pub const PRIVATE_NO_CACHE_MUST_REVALIDATE: &str = "private, no-cache, must-revalidate";
/// Responses that set or clear credentials.
pub const NO_STORE: &str = "no-store";

pub const fn private_no_cache_header() -> (actix_web::http::header::HeaderName, &'static str) {
    (CACHE_CONTROL, PRIVATE_NO_CACHE_MUST_REVALIDATE)
}

pub const fn no_store_header() -> (actix_web::http::header::HeaderName, &'static str) {
    (CACHE_CONTROL, NO_STORE)
}
