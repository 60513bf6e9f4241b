//! Folder-based photo sharing with public portal links.
//!
//! A self-contained service: email/password identity, a SQLite folder
//! directory, disk-backed photo storage, and an access controller that
//! gates the owner dashboard and the unauthenticated public portal.

pub mod config;
pub mod db;
pub mod errors;
pub mod extract;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;
pub mod views;
