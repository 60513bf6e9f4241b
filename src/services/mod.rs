//! Service layer: identity, the folder directory, the media store, and
//! the access controller composed over them.

pub mod access_control;
pub mod folder_directory;
pub mod identity_service;
pub mod media_store;
