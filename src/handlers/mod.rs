//! HTTP handlers and the state shared between them.

pub mod auth_handlers;
pub mod folder_handlers;
pub mod health_handlers;
pub mod portal_handlers;
pub mod view_handlers;

use crate::services::{access_control::AccessController, identity_service::IdentityService};
use sqlx::SqlitePool;
use std::{path::PathBuf, sync::Arc};

/// Application state shared across handlers.
///
/// The identity provider, folder directory, and media store are built
/// once at startup and injected (the latter two inside the access
/// controller); handlers never reach for ambient globals.
#[derive(Clone)]
pub struct AppState {
    /// Identity provider: accounts and bearer sessions.
    pub identity: IdentityService,
    /// Gate over the owner and portal access paths.
    pub access: AccessController,
    /// Pool handle, used directly only by the readiness probe.
    pub db: Arc<SqlitePool>,
    /// Payload base directory, used directly only by the readiness probe.
    pub storage_root: PathBuf,
}
