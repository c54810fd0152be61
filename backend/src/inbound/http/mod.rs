//! HTTP inbound adapter exposing the `/api/v1` REST endpoints.
//!
//! Handlers parse and validate requests, call the driving ports held in
//! [`state::HttpState`], and map domain results to JSON. Accounts and the
//! signed-in profile live in [`accounts`], daily entries in [`check_ins`],
//! and aggregated figures in [`dashboard`].

pub mod accounts;
pub mod accounts_dto;
pub mod cache_control;
pub mod check_ins;
pub mod check_ins_dto;
pub mod dashboard;
pub mod error;
pub mod health;
pub mod schemas;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod validation;

pub use error::ApiResult;
