//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL repositories using Diesel, plus migrations
//! - **security**: Argon2id password hashing and HS256 session tokens
//! - **mail**: verification email transports
//! - **bootstrap**: lock-guarded migrations and demo seeding at startup
//!
//! Adapters translate between domain types and infrastructure
//! representations. They contain no business rules.

pub mod bootstrap;
pub mod mail;
pub mod persistence;
pub mod security;
