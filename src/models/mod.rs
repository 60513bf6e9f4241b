//! Core data models for the photo portal service.
//!
//! These entities represent users, their sign-in sessions, folders, and the
//! photos uploaded into them. They map cleanly to database tables via
//! `sqlx::FromRow` and, where they appear in API responses, serialize as
//! JSON via `serde`.

pub mod folder;
pub mod photo;
pub mod session;
pub mod user;
