//! Test helpers for the HTTP integration suites.
//!
//! Every suite runs the full router over an in-memory SQLite database
//! and a temporary payload directory.

use axum::http::{StatusCode, header::AUTHORIZATION};
use axum_test::{
    TestServer,
    multipart::{MultipartForm, Part},
};
use photo_portal::{
    db,
    handlers::AppState,
    routes,
    services::{
        access_control::AccessController, folder_directory::FolderDirectory,
        identity_service::IdentityService, media_store::MediaStore,
    },
};
use serde_json::{Value, json};
use sqlx::SqlitePool;
use std::sync::Arc;
use tempfile::TempDir;

/// Public origin the test stores mint share links against.
pub const TEST_PUBLIC_URL: &str = "http://gallery.test";

/// Body limit applied to the upload route in tests.
const TEST_MAX_UPLOAD_BYTES: usize = 8 * 1024 * 1024;

/// A running application over fresh stores.
pub struct TestApp {
    pub server: TestServer,
    pub db: Arc<SqlitePool>,
    // Holds the payload directory open until the test ends.
    _storage: TempDir,
}

/// Create a test server with an in-memory database and a temporary
/// payload directory.
pub async fn create_test_app() -> TestApp {
    let pool = db::connect_in_memory()
        .await
        .expect("Failed to open test database");
    db::run_migrations(&pool)
        .await
        .expect("Failed to run migrations");
    let db = Arc::new(pool);

    let storage = TempDir::new().expect("Failed to create payload directory");

    let identity = IdentityService::new(db.clone());
    let directory = FolderDirectory::new(db.clone());
    let media = MediaStore::new(db.clone(), storage.path(), TEST_PUBLIC_URL);
    let access = AccessController::new(directory, media, TEST_PUBLIC_URL);

    let state = AppState {
        identity,
        access,
        db: db.clone(),
        storage_root: storage.path().to_path_buf(),
    };

    let router = routes::routes::routes(TEST_MAX_UPLOAD_BYTES).with_state(state);
    let server = TestServer::new(router).expect("Failed to create test server");

    TestApp {
        server,
        db,
        _storage: storage,
    }
}

/// Helper to register an account and return the session response body.
pub async fn register_user(server: &TestServer, email: &str, password: &str) -> Value {
    let response = server
        .post("/api/auth/register")
        .json(&json!({ "email": email, "password": password }))
        .await;

    response.assert_status(StatusCode::CREATED);
    response.json::<Value>()
}

/// Helper to register an account and return just its bearer token.
pub async fn register_and_token(server: &TestServer, email: &str) -> String {
    let body = register_user(server, email, "a sensible password").await;
    body["token"].as_str().expect("session token").to_string()
}

/// Helper to create a folder and return its id.
pub async fn create_folder(server: &TestServer, token: &str, name: &str) -> String {
    let response = server
        .post("/api/folders")
        .add_header(AUTHORIZATION, format!("Bearer {}", token))
        .json(&json!({ "name": name }))
        .await;

    response.assert_status(StatusCode::CREATED);
    response.json::<Value>()["id"]
        .as_str()
        .expect("folder id")
        .to_string()
}

/// Helper to upload bytes as a named photo into a folder.
pub async fn upload_photo(
    server: &TestServer,
    token: &str,
    folder_id: &str,
    filename: &str,
    bytes: &[u8],
) -> axum_test::TestResponse {
    let part = Part::bytes(bytes.to_vec())
        .file_name(filename.to_string())
        .mime_type("image/jpeg");
    let form = MultipartForm::new().add_part("file", part);

    server
        .post(&format!("/api/folders/{}/photos", folder_id))
        .add_header(AUTHORIZATION, format!("Bearer {}", token))
        .multipart(form)
        .await
}

/// Helper to generate a folder's public link; returns the updated record.
pub async fn generate_link(server: &TestServer, token: &str, folder_id: &str) -> Value {
    let response = server
        .post(&format!("/api/folders/{}/link", folder_id))
        .add_header(AUTHORIZATION, format!("Bearer {}", token))
        .await;

    response.assert_status_ok();
    response.json::<Value>()
}
