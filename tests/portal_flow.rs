//! Public portal integration tests: share-link generation, the view
//! switch at the entrypoint, and unauthenticated gallery access.

mod common;

use axum::http::{StatusCode, header::AUTHORIZATION};
use common::{
    TEST_PUBLIC_URL, create_folder, create_test_app, generate_link, register_and_token,
    upload_photo,
};
use serde_json::Value;
use uuid::Uuid;

// ============================================================================
// Share Link Generation Tests
// ============================================================================

#[tokio::test]
async fn test_generate_link_shape_and_persistence() {
    let app = create_test_app().await;
    let token = register_and_token(&app.server, "ada@example.com").await;
    let folder_id = create_folder(&app.server, &token, "Beach Trip").await;

    let folder = generate_link(&app.server, &token, &folder_id).await;
    let link = folder["public_link"].as_str().unwrap();
    assert_eq!(link, format!("{}?folder={}", TEST_PUBLIC_URL, folder_id));

    // The link is stored on the folder record, visible in later listings.
    let response = app
        .server
        .get("/api/folders")
        .add_header(AUTHORIZATION, format!("Bearer {}", token))
        .await;
    let body: Value = response.json();
    assert_eq!(body.as_array().unwrap()[0]["public_link"], link);
}

#[tokio::test]
async fn test_generate_link_twice_yields_the_same_url() {
    let app = create_test_app().await;
    let token = register_and_token(&app.server, "ada@example.com").await;
    let folder_id = create_folder(&app.server, &token, "Beach Trip").await;

    let first = generate_link(&app.server, &token, &folder_id).await;
    let second = generate_link(&app.server, &token, &folder_id).await;

    assert_eq!(first["public_link"], second["public_link"]);
}

#[tokio::test]
async fn test_generate_link_requires_ownership() {
    let app = create_test_app().await;
    let ada = register_and_token(&app.server, "ada@example.com").await;
    let grace = register_and_token(&app.server, "grace@example.com").await;
    let folder_id = create_folder(&app.server, &ada, "Ada's Folder").await;

    let response = app
        .server
        .post(&format!("/api/folders/{}/link", folder_id))
        .add_header(AUTHORIZATION, format!("Bearer {}", grace))
        .await;

    response.assert_status(StatusCode::FORBIDDEN);
    assert_eq!(response.json::<Value>()["code"], "PERMISSION_DENIED");
}

#[tokio::test]
async fn test_generate_link_for_unknown_folder() {
    let app = create_test_app().await;
    let token = register_and_token(&app.server, "ada@example.com").await;

    let response = app
        .server
        .post(&format!("/api/folders/{}/link", Uuid::new_v4()))
        .add_header(AUTHORIZATION, format!("Bearer {}", token))
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_generate_link_requires_auth() {
    let app = create_test_app().await;
    let token = register_and_token(&app.server, "ada@example.com").await;
    let folder_id = create_folder(&app.server, &token, "Beach Trip").await;

    let response = app
        .server
        .post(&format!("/api/folders/{}/link", folder_id))
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
}

// ============================================================================
// Entrypoint View Tests
// ============================================================================

#[tokio::test]
async fn test_entrypoint_without_session_shows_login_view() {
    let app = create_test_app().await;

    let response = app.server.get("/").await;

    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["view"], "unauthenticated");
}

#[tokio::test]
async fn test_entrypoint_with_session_shows_dashboard() {
    let app = create_test_app().await;
    let token = register_and_token(&app.server, "ada@example.com").await;
    create_folder(&app.server, &token, "Beach Trip").await;

    let response = app
        .server
        .get("/")
        .add_header(AUTHORIZATION, format!("Bearer {}", token))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["view"], "dashboard");
    assert_eq!(body["user"]["email"], "ada@example.com");
    assert_eq!(body["folders"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_portal_param_wins_over_a_live_session() {
    let app = create_test_app().await;
    let ada = register_and_token(&app.server, "ada@example.com").await;
    let grace = register_and_token(&app.server, "grace@example.com").await;

    let folder_id = create_folder(&app.server, &ada, "Ada's Folder").await;
    upload_photo(&app.server, &ada, &folder_id, "beach.jpg", b"sand").await;

    // Grace follows Ada's share link while signed in: she gets the
    // portal over Ada's folder, never her own dashboard.
    let response = app
        .server
        .get("/")
        .add_query_param("folder", &folder_id)
        .add_header(AUTHORIZATION, format!("Bearer {}", grace))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["view"], "portal");
    assert_eq!(body["photos"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_empty_portal_param_is_not_portal_mode() {
    let app = create_test_app().await;

    let response = app.server.get("/").add_query_param("folder", "").await;

    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["view"], "unauthenticated");
}

// ============================================================================
// Portal Access Tests
// ============================================================================

#[tokio::test]
async fn test_share_link_opens_the_gallery_without_auth() {
    let app = create_test_app().await;
    let token = register_and_token(&app.server, "ada@example.com").await;
    let folder_id = create_folder(&app.server, &token, "Beach Trip").await;
    let bytes = b"jpeg bytes pretending to be a beach";
    upload_photo(&app.server, &token, &folder_id, "beach.jpg", bytes).await;

    let folder = generate_link(&app.server, &token, &folder_id).await;
    let link = folder["public_link"].as_str().unwrap();
    let (_, folder_param) = link.split_once("?folder=").unwrap();

    // Anonymous visitor follows the link.
    let response = app
        .server
        .get("/")
        .add_query_param("folder", folder_param)
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["view"], "portal");
    let photos = body["photos"].as_array().unwrap();
    assert_eq!(photos.len(), 1);
    assert_eq!(photos[0]["filename"], "beach.jpg");

    // And the resolved URL serves the exact uploaded bytes, still
    // without any credentials.
    let url = photos[0]["url"].as_str().unwrap();
    let path = url.strip_prefix(TEST_PUBLIC_URL).unwrap();
    let download = app.server.get(path).await;
    download.assert_status_ok();
    assert_eq!(download.as_bytes().as_ref(), bytes);
}

#[tokio::test]
async fn test_portal_matches_the_owner_listing() {
    let app = create_test_app().await;
    let token = register_and_token(&app.server, "ada@example.com").await;
    let folder_id = create_folder(&app.server, &token, "Beach Trip").await;
    upload_photo(&app.server, &token, &folder_id, "beach.jpg", b"sand").await;
    upload_photo(&app.server, &token, &folder_id, "dunes.jpg", b"more sand").await;

    let owner_view = app
        .server
        .get(&format!("/api/folders/{}/photos", folder_id))
        .add_header(AUTHORIZATION, format!("Bearer {}", token))
        .await
        .json::<Value>();

    let portal_view = app
        .server
        .get("/")
        .add_query_param("folder", &folder_id)
        .await
        .json::<Value>();

    // Owner and portal resolve the identical gallery.
    assert_eq!(owner_view, portal_view["photos"]);
}

#[tokio::test]
async fn test_portal_for_unknown_folder_is_an_empty_gallery() {
    let app = create_test_app().await;

    let response = app
        .server
        .get("/")
        .add_query_param("folder", Uuid::new_v4().to_string())
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["view"], "portal");
    assert_eq!(body["photos"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_portal_for_garbage_folder_id_is_an_empty_gallery() {
    let app = create_test_app().await;

    let response = app
        .server
        .get("/")
        .add_query_param("folder", "definitely-not-a-uuid")
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["view"], "portal");
    assert_eq!(body["photos"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_portal_for_a_folder_with_no_uploads_is_empty() {
    let app = create_test_app().await;
    let token = register_and_token(&app.server, "ada@example.com").await;
    let folder_id = create_folder(&app.server, &token, "Still Empty").await;
    generate_link(&app.server, &token, &folder_id).await;

    let response = app
        .server
        .get("/")
        .add_query_param("folder", &folder_id)
        .await;

    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["photos"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_old_links_survive_regeneration() {
    let app = create_test_app().await;
    let token = register_and_token(&app.server, "ada@example.com").await;
    let folder_id = create_folder(&app.server, &token, "Beach Trip").await;
    upload_photo(&app.server, &token, &folder_id, "beach.jpg", b"sand").await;

    let first = generate_link(&app.server, &token, &folder_id).await;
    let old_link = first["public_link"].as_str().unwrap().to_string();
    generate_link(&app.server, &token, &folder_id).await;

    // The previously handed out link still opens the gallery.
    let (_, folder_param) = old_link.split_once("?folder=").unwrap();
    let response = app
        .server
        .get("/")
        .add_query_param("folder", folder_param)
        .await;

    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["photos"].as_array().unwrap().len(), 1);
}

// ============================================================================
// Portal Download Tests
// ============================================================================

#[tokio::test]
async fn test_portal_download_serves_bytes_and_metadata() {
    let app = create_test_app().await;
    let token = register_and_token(&app.server, "ada@example.com").await;
    let folder_id = create_folder(&app.server, &token, "Beach Trip").await;
    let bytes = b"jpeg bytes pretending to be a beach";
    upload_photo(&app.server, &token, &folder_id, "beach.jpg", bytes).await;

    let response = app
        .server
        .get(&format!("/portal/{}/beach.jpg", folder_id))
        .await;

    response.assert_status_ok();
    assert_eq!(response.as_bytes().as_ref(), bytes);
    assert_eq!(
        response.headers().get("content-type").unwrap(),
        "image/jpeg"
    );
    let expected_etag = format!("\"{:x}\"", md5::compute(bytes));
    assert_eq!(
        response.headers().get("etag").unwrap().to_str().unwrap(),
        expected_etag
    );
}

#[tokio::test]
async fn test_portal_download_handles_spaces_in_filenames() {
    let app = create_test_app().await;
    let token = register_and_token(&app.server, "ada@example.com").await;
    let folder_id = create_folder(&app.server, &token, "Family").await;
    upload_photo(&app.server, &token, &folder_id, "family photo.jpg", b"everyone").await;

    let portal = app
        .server
        .get("/")
        .add_query_param("folder", &folder_id)
        .await
        .json::<Value>();
    let url = portal["photos"][0]["url"].as_str().unwrap();
    assert!(url.ends_with("/family%20photo.jpg"));

    let path = url.strip_prefix(TEST_PUBLIC_URL).unwrap();
    let download = app.server.get(path).await;
    download.assert_status_ok();
    assert_eq!(download.as_bytes().as_ref(), b"everyone");
}

#[tokio::test]
async fn test_portal_download_unknown_photo() {
    let app = create_test_app().await;
    let token = register_and_token(&app.server, "ada@example.com").await;
    let folder_id = create_folder(&app.server, &token, "Beach Trip").await;

    let response = app
        .server
        .get(&format!("/portal/{}/missing.jpg", folder_id))
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
    assert_eq!(response.json::<Value>()["code"], "RECORD_NOT_FOUND");
}

#[tokio::test]
async fn test_portal_download_rejects_traversal_filenames() {
    let app = create_test_app().await;
    let token = register_and_token(&app.server, "ada@example.com").await;
    let folder_id = create_folder(&app.server, &token, "Beach Trip").await;
    upload_photo(&app.server, &token, &folder_id, "beach.jpg", b"sand").await;

    // Encoded separators decode into the filename segment; the store
    // rejects them before touching the disk.
    let response = app
        .server
        .get(&format!("/portal/{}/..%2Fevil.jpg", folder_id))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["code"], "INVALID_REQUEST");
}

#[tokio::test]
async fn test_portal_download_with_garbage_folder_id() {
    let app = create_test_app().await;

    let response = app.server.get("/portal/not-a-uuid/photo.jpg").await;

    response.assert_status(StatusCode::NOT_FOUND);
}
