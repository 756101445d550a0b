//! HTTP-level tests for ApiClient against a mock backend.

use serde_json::json;
use sg_api::{ApiClient, Backend, Collection};
use sg_core::config::BackendConfig;
use sg_core::constants;
use sg_core::error::{ErrorKind, SgError};
use sg_models::{FileUpload, LocalStorage, PreviewOptions, Query};
use wiremock::matchers::{body_json, body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SESSION_COOKIE: &str = r#"{"a_session_proj":"s3cr3t"}"#;

fn config_for(server: &MockServer) -> BackendConfig {
    BackendConfig {
        endpoint: format!("{}/v1", server.uri()),
        project_id: "proj".into(),
        database_id: "db".into(),
        user_collection_id: "users".into(),
        post_collection_id: "posts".into(),
        saves_collection_id: "saves".into(),
        likes_collection_id: "likes".into(),
        storage_id: "media".into(),
        ..BackendConfig::default()
    }
}

fn account_body() -> serde_json::Value {
    json!({
        "$id": "acc1",
        "$createdAt": "2024-03-01T10:00:00.000+00:00",
        "name": "Ada",
        "email": "ada@example.com",
        "status": true,
        "emailVerification": false,
        "prefs": {}
    })
}

fn post_document(id: &str) -> serde_json::Value {
    json!({
        "$id": id,
        "$collectionId": "posts",
        "$databaseId": "db",
        "$createdAt": "2024-03-01T10:00:00.000+00:00",
        "$updatedAt": "2024-03-01T10:00:00.000+00:00",
        "$permissions": [],
        "caption": "hello",
        "imageUrl": "https://img",
        "imageId": "f1",
        "tags": [],
        "likes": []
    })
}

#[tokio::test]
async fn test_requests_carry_project_headers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/account"))
        .and(header("X-Appwrite-Project", "proj"))
        .and(header("X-Appwrite-Response-Format", constants::RESPONSE_FORMAT))
        .respond_with(ResponseTemplate::new(200).set_body_json(account_body()))
        .expect(1)
        .mount(&server)
        .await;

    let client = ApiClient::new(&config_for(&server)).unwrap();
    let account = client.get_account().await.unwrap();
    assert_eq!(account.id, "acc1");
    assert_eq!(account.email, "ada@example.com");
}

#[tokio::test]
async fn test_session_cookie_captured_and_replayed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/account/sessions/email"))
        .and(body_json(json!({"email": "ada@example.com", "password": "hunter22"})))
        .respond_with(
            ResponseTemplate::new(201)
                .insert_header(constants::FALLBACK_COOKIES_HEADER, SESSION_COOKIE)
                .set_body_json(json!({"$id": "sess1", "userId": "acc1", "provider": "email", "current": true})),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/account"))
        .and(header(constants::FALLBACK_COOKIES_HEADER, SESSION_COOKIE))
        .respond_with(ResponseTemplate::new(200).set_body_json(account_body()))
        .expect(1)
        .mount(&server)
        .await;

    let storage = LocalStorage::in_memory().unwrap();
    let client = ApiClient::new(&config_for(&server))
        .unwrap()
        .with_storage(storage.clone())
        .unwrap();

    let session = client
        .create_email_password_session("ada@example.com", "hunter22")
        .await
        .unwrap();
    assert_eq!(session.id, "sess1");
    assert_eq!(
        storage.get(constants::COOKIE_FALLBACK_KEY).unwrap().as_deref(),
        Some(SESSION_COOKIE)
    );

    client.get_account().await.unwrap();
}

#[tokio::test]
async fn test_stored_session_is_resumed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/account"))
        .and(header(constants::FALLBACK_COOKIES_HEADER, SESSION_COOKIE))
        .respond_with(ResponseTemplate::new(200).set_body_json(account_body()))
        .expect(1)
        .mount(&server)
        .await;

    let storage = LocalStorage::in_memory().unwrap();
    storage.set(constants::COOKIE_FALLBACK_KEY, SESSION_COOKIE).unwrap();
    let client = ApiClient::new(&config_for(&server))
        .unwrap()
        .with_storage(storage)
        .unwrap();

    assert_eq!(client.get_account().await.unwrap().id, "acc1");
}

#[tokio::test]
async fn test_delete_current_session_clears_marker() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/v1/account/sessions/current"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let storage = LocalStorage::in_memory().unwrap();
    storage.set(constants::COOKIE_FALLBACK_KEY, SESSION_COOKIE).unwrap();
    let client = ApiClient::new(&config_for(&server))
        .unwrap()
        .with_storage(storage.clone())
        .unwrap();

    client.delete_session(constants::CURRENT_SESSION).await.unwrap();
    assert_eq!(
        storage.get(constants::COOKIE_FALLBACK_KEY).unwrap().as_deref(),
        Some(constants::EMPTY_COOKIE_FALLBACK)
    );
}

#[tokio::test]
async fn test_expired_session_delete_still_clears_marker() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/v1/account/sessions/current"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "message": "User (role: guests) missing scope (account)",
            "code": 401,
            "type": "general_unauthorized_scope"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let storage = LocalStorage::in_memory().unwrap();
    storage.set(constants::COOKIE_FALLBACK_KEY, SESSION_COOKIE).unwrap();
    let client = ApiClient::new(&config_for(&server))
        .unwrap()
        .with_storage(storage.clone())
        .unwrap();

    let err = client.delete_session(constants::CURRENT_SESSION).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Auth);
    assert_eq!(
        storage.get(constants::COOKIE_FALLBACK_KEY).unwrap().as_deref(),
        Some(constants::EMPTY_COOKIE_FALLBACK)
    );
}

#[tokio::test]
async fn test_error_bodies_map_to_kinds() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/account"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "message": "User (role: guests) missing scope (account)",
            "code": 401,
            "type": "general_unauthorized_scope",
            "version": "1.5.7"
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/databases/db/collections/posts/documents/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "message": "Document with the requested ID could not be found.",
            "code": 404,
            "type": "document_not_found"
        })))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/v1/storage/buckets/media/files/f1"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let client = ApiClient::new(&config_for(&server)).unwrap();

    let err = client.get_account().await.unwrap_err();
    assert!(err.is_auth());
    assert!(err.to_string().contains("missing scope"));

    let err = client.get_document(Collection::Posts, "missing").await.unwrap_err();
    assert!(err.is_not_found());

    let err = client.delete_file("f1").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Server);
    assert!(matches!(err, SgError::ServerError { status: 500, .. }));
}

#[tokio::test]
async fn test_list_documents_sends_queries() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/databases/db/collections/posts/documents"))
        .and(query_param(
            "queries[]",
            r#"{"method":"orderDesc","attribute":"$createdAt"}"#,
        ))
        .and(query_param("queries[]", r#"{"method":"limit","values":[20]}"#))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total": 2,
            "documents": [post_document("p2"), post_document("p1")]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = ApiClient::new(&config_for(&server)).unwrap();
    let list = client
        .list_documents(
            Collection::Posts,
            &[Query::order_desc("$createdAt"), Query::limit(20)],
        )
        .await
        .unwrap();

    assert_eq!(list.total, 2);
    assert_eq!(list.next_cursor(), Some("p1"));
}

#[tokio::test]
async fn test_create_and_update_document_bodies() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/databases/db/collections/saves/documents"))
        .and(body_json(json!({"documentId": "s1", "data": {"user": "u1", "post": "p1"}})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "$id": "s1", "user": "u1", "post": "p1"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/v1/databases/db/collections/posts/documents/p1"))
        .and(body_json(json!({"data": {"likes": ["u1"]}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(post_document("p1")))
        .expect(1)
        .mount(&server)
        .await;

    let client = ApiClient::new(&config_for(&server)).unwrap();
    let saved = client
        .create_document(Collection::Saves, "s1", json!({"user": "u1", "post": "p1"}))
        .await
        .unwrap();
    assert_eq!(saved.id, "s1");

    let updated = client
        .update_document(Collection::Posts, "p1", json!({"likes": ["u1"]}))
        .await
        .unwrap();
    assert_eq!(updated.data["caption"], "hello");
}

#[tokio::test]
async fn test_upload_is_multipart() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/storage/buckets/media/files"))
        .and(body_string_contains("name=\"fileId\""))
        .and(body_string_contains("filename=\"cat.png\""))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "$id": "f9",
            "bucketId": "media",
            "name": "cat.png",
            "mimeType": "image/png",
            "sizeOriginal": 4
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = ApiClient::new(&config_for(&server)).unwrap();
    let file = FileUpload::new("cat.png", "image/png", vec![0x89, b'P', b'N', b'G']);
    let info = client.create_file("f9", file).await.unwrap();
    assert_eq!(info.id, "f9");
    assert_eq!(info.size_original, 4);
}

#[tokio::test]
async fn test_url_builders_need_no_request() {
    let server = MockServer::start().await;
    let client = ApiClient::new(&config_for(&server)).unwrap();
    let backend: &dyn Backend = &client;

    let preview = backend
        .file_preview_url("f1", &PreviewOptions::default())
        .unwrap();
    assert_eq!(
        preview.as_str(),
        format!(
            "{}/v1/storage/buckets/media/files/f1/preview?width=2000&height=2000&quality=100&project=proj",
            server.uri()
        )
    );

    let centered = backend
        .file_preview_url(
            "f1",
            &PreviewOptions {
                gravity: Some("center".into()),
                ..PreviewOptions::square(640, 80)
            },
        )
        .unwrap();
    assert!(centered
        .as_str()
        .ends_with("/f1/preview?width=640&height=640&gravity=center&quality=80&project=proj"));

    let avatar = backend.initials_avatar_url("Ada").unwrap();
    assert!(avatar.as_str().ends_with("/v1/avatars/initials?name=Ada&project=proj"));
    assert!(server.received_requests().await.unwrap_or_default().is_empty());
}
