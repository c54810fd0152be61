//! Credential adapters: password hashing and session tokens.

mod argon2_password_hasher;
mod jwt_session_codec;

pub use argon2_password_hasher::Argon2PasswordHasher;
pub use jwt_session_codec::JwtSessionCodec;
