//! src/services/access_control.rs
//!
//! The access controller decides who may see a folder's contents, and
//! through which door. There are exactly two:
//!
//! - the owner path: dashboard listing and every mutation (create,
//!   upload, link generation), allowed only when the requester's id
//!   matches the folder's `owner_id`;
//! - the portal path: unauthenticated read-only access for anyone
//!   holding a share link. Knowledge of the folder id embedded in the
//!   link is the entire credential. No ownership check, no expiry, and
//!   no existence check beyond "does this id have photos under it".

use crate::{
    models::{folder::Folder, photo::Photo},
    services::{
        folder_directory::{DirectoryError, FolderDirectory},
        media_store::{MediaError, MediaStore},
    },
};
use bytes::Bytes;
use futures::{Stream, future::try_join_all};
use serde::Serialize;
use std::io;
use thiserror::Error;
use tokio::fs::File;
use tracing::{debug, info, warn};
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum AccessError {
    #[error("folder `{0}` does not belong to the requesting user")]
    PermissionDenied(Uuid),

    #[error(transparent)]
    Directory(#[from] DirectoryError),

    #[error(transparent)]
    Media(#[from] MediaError),
}

pub type AccessResult<T> = Result<T, AccessError>;

/// A photo resolved for display: metadata plus its download URL.
#[derive(Serialize, Clone, Debug)]
pub struct PhotoListing {
    pub filename: String,
    pub content_type: Option<String>,
    pub size_bytes: i64,
    pub url: String,
}

/// Gates the owner and portal paths to folder contents.
///
/// The folder directory and media store are injected at construction so
/// either can be stood up over test fixtures.
#[derive(Clone)]
pub struct AccessController {
    directory: FolderDirectory,
    media: MediaStore,
    /// Public origin share links are minted against.
    public_base_url: String,
}

impl AccessController {
    pub fn new(
        directory: FolderDirectory,
        media: MediaStore,
        public_base_url: impl Into<String>,
    ) -> Self {
        Self {
            directory,
            media,
            public_base_url: public_base_url.into(),
        }
    }

    /// Allow iff the requester owns the folder.
    ///
    /// Every mutation and the owner's direct photo listing run through
    /// this check; query scoping alone is not trusted to enforce it.
    pub fn authorize_mutation(&self, requester_id: Uuid, folder: &Folder) -> AccessResult<()> {
        if folder.owner_id == requester_id {
            Ok(())
        } else {
            warn!(
                folder = %folder.id,
                requester = %requester_id,
                "denied: requester does not own folder"
            );
            Err(AccessError::PermissionDenied(folder.id))
        }
    }

    /// Folders owned by the requester; empty when nobody is signed in.
    ///
    /// The listing is complete (no pagination) and its order is not part
    /// of the contract.
    pub async fn list_owned_folders(&self, requester: Option<Uuid>) -> AccessResult<Vec<Folder>> {
        match requester {
            Some(owner_id) => Ok(self.directory.query_by_owner(owner_id).await?),
            None => Ok(Vec::new()),
        }
    }

    /// Create a folder owned by the requester.
    pub async fn create_folder(&self, owner_id: Uuid, name: &str) -> AccessResult<Folder> {
        let folder = self.directory.insert(owner_id, name).await?;
        info!(folder = %folder.id, owner = %owner_id, name = %folder.name, "folder created");
        Ok(folder)
    }

    /// Stream a photo into a folder the requester owns.
    pub async fn upload_photo<S>(
        &self,
        requester_id: Uuid,
        folder_id: Uuid,
        filename: &str,
        content_type: Option<String>,
        stream: S,
    ) -> AccessResult<Photo>
    where
        S: Stream<Item = io::Result<Bytes>> + Send,
    {
        let folder = self.directory.get_by_id(folder_id).await?;
        self.authorize_mutation(requester_id, &folder)?;

        let photo = self.media.put(folder.id, filename, content_type, stream).await?;
        info!(
            folder = %folder.id,
            filename = %photo.filename,
            size = photo.size_bytes,
            "photo uploaded"
        );
        Ok(photo)
    }

    /// Generate the folder's public share link and persist it.
    ///
    /// The link is a deterministic template over the folder id, so
    /// generating twice yields the identical URL and previously handed
    /// out copies keep working. Persisting is a plain field update; two
    /// racing generations are last-write-wins.
    pub async fn grant_public_link(
        &self,
        requester_id: Uuid,
        folder_id: Uuid,
    ) -> AccessResult<Folder> {
        let mut folder = self.directory.get_by_id(folder_id).await?;
        self.authorize_mutation(requester_id, &folder)?;

        let link = share_link(&self.public_base_url, folder.id);
        self.directory.set_public_link(folder.id, &link).await?;
        info!(folder = %folder.id, link = %link, "public link generated");

        folder.public_link = Some(link);
        Ok(folder)
    }

    /// The owner's direct listing of a folder's photos.
    ///
    /// Resolves exactly the same URLs the public portal would for this
    /// folder; the two views never diverge.
    pub async fn list_folder_photos(
        &self,
        requester_id: Uuid,
        folder_id: Uuid,
    ) -> AccessResult<Vec<PhotoListing>> {
        let folder = self.directory.get_by_id(folder_id).await?;
        self.authorize_mutation(requester_id, &folder)?;
        self.resolve_folder_photos(folder.id).await
    }

    /// Portal enumeration: the gallery for whoever holds a share link.
    ///
    /// Takes the raw `folder` URL parameter. Anything that does not name
    /// photos, whether an unknown id, a folder with no uploads yet, or a
    /// value that is not even a UUID, resolves to an empty gallery rather
    /// than an error.
    pub async fn resolve_portal_access(&self, folder_param: &str) -> AccessResult<Vec<PhotoListing>> {
        let Ok(folder_id) = Uuid::parse_str(folder_param) else {
            debug!(folder = %folder_param, "portal request with non-UUID folder id");
            return Ok(Vec::new());
        };
        self.resolve_folder_photos(folder_id).await
    }

    /// Open one photo through the portal path.
    ///
    /// No identity is consulted; a missing photo is simply not found.
    pub async fn open_portal_photo(
        &self,
        folder_id: Uuid,
        filename: &str,
    ) -> AccessResult<(Photo, File)> {
        Ok(self.media.reader(folder_id, filename).await?)
    }

    /// Enumerate a folder's photos and resolve each to a download URL.
    ///
    /// Resolution fans out one concurrent check per photo and waits for
    /// all of them; a single failure fails the whole batch, so callers
    /// never see a partially resolved gallery.
    async fn resolve_folder_photos(&self, folder_id: Uuid) -> AccessResult<Vec<PhotoListing>> {
        let photos = self.media.list_under_prefix(folder_id).await?;

        let listings = try_join_all(photos.iter().map(|photo| async move {
            let url = self.media.resolve_download_url(photo).await?;
            Ok::<_, MediaError>(PhotoListing {
                filename: photo.filename.clone(),
                content_type: photo.content_type.clone(),
                size_bytes: photo.size_bytes,
                url,
            })
        }))
        .await?;

        Ok(listings)
    }
}

/// The share-link template: the public origin with the folder id as the
/// `folder` query parameter. This exact shape is what the entrypoint
/// parses to detect portal mode, so it must stay stable.
pub fn share_link(public_base_url: &str, folder_id: Uuid) -> String {
    format!("{}?folder={}", public_base_url, folder_id)
}
