//! Domain services used by route handlers.
//!
//! Service modules own identity and backend-proxy logic so handlers can
//! stay focused on HTTP translation and cookie plumbing.

pub mod auth;
pub mod generation;
pub mod provider;
