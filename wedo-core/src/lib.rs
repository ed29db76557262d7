//! Core types for the WeDo invite tools.
//!
//! This crate provides everything the `wedo` CLI needs to talk to the invites API:
//! - `invite` for the invite, guest and request payload types
//! - `api` for the typed REST client
//! - `session` for the authenticated session gate and login flow
//! - `route` for the client-side route table
//! - `config` for API and auth provider settings

pub mod api;
pub mod config;
pub mod error;
pub mod invite;
pub mod route;
pub mod session;

// Re-export the invite model at crate root for convenience
pub use invite::*;
