//! Contract tests for SupabaseStorage against a mocked Storage REST API.
//!
//! | Method | Path | Test |
//! |--------|------|------|
//! | POST   | `/storage/v1/object/list/{bucket}` | `list_*` |
//! | DELETE | `/storage/v1/object/{bucket}` | `remove_*` |
//! | POST   | `/storage/v1/object/{bucket}/{name}` | `upload_*` |
//! | GET    | `/rest/v1/` | `ping_*` |

use apk_release_publisher::config::{APK_CONTENT_TYPE, StorageConfig};
use apk_release_publisher::payload::Payload;
use apk_release_publisher::storage::{ObjectStore, SupabaseStorage, UploadOptions};
use wiremock::matchers::{body_json, body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const BUCKET: &str = "apk-bucket";

fn test_client(mock_server: &MockServer) -> SupabaseStorage {
    let config = StorageConfig::new(&mock_server.uri(), BUCKET, "anon-key").unwrap();
    SupabaseStorage::new(config).unwrap()
}

#[tokio::test]
async fn list_sends_key_headers_and_parses_objects() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/storage/v1/object/list/apk-bucket"))
        .and(header("apikey", "anon-key"))
        .and(header("authorization", "Bearer anon-key"))
        .and(body_partial_json(serde_json::json!({ "prefix": "" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {
                "name": "app-release.apk",
                "updated_at": "2025-03-05T10:00:00Z",
                "metadata": { "size": 5242880 }
            },
            { "name": "notes.txt" }
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let objects = test_client(&mock_server).list().await.unwrap();
    assert_eq!(objects.len(), 2);
    assert_eq!(objects[0].name, "app-release.apk");
    assert_eq!(objects[0].size, Some(5_242_880));
    assert!(objects[0].updated_at.is_some());
    assert_eq!(objects[1].size, None);
}

#[tokio::test]
async fn list_failure_carries_provider_message() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/storage/v1/object/list/apk-bucket"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(serde_json::json!({ "message": "Bucket not found" })),
        )
        .mount(&mock_server)
        .await;

    let err = test_client(&mock_server).list().await.unwrap_err();
    assert!(err.user_message().contains("Bucket not found"));
}

#[tokio::test]
async fn remove_sends_all_names_in_one_call() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/storage/v1/object/apk-bucket"))
        .and(body_json(serde_json::json!({ "prefixes": ["a.apk", "b.apk"] })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .expect(1)
        .mount(&mock_server)
        .await;

    test_client(&mock_server)
        .remove(&["a.apk".to_string(), "b.apk".to_string()])
        .await
        .unwrap();
}

#[tokio::test]
async fn remove_with_no_names_makes_no_call() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    test_client(&mock_server).remove(&[]).await.unwrap();
}

#[tokio::test]
async fn upload_overwrites_with_apk_content_type() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/storage/v1/object/apk-bucket/app-release.apk"))
        .and(header("x-upsert", "true"))
        .and(header("content-type", APK_CONTENT_TYPE))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "Key": "apk-bucket/app-release.apk" })),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let payload = Payload::new("app-release.apk", b"PK\x03\x04".to_vec());
    test_client(&mock_server)
        .upload(&payload, &UploadOptions::overwrite())
        .await
        .unwrap();
}

#[tokio::test]
async fn upload_failure_surfaces_provider_message_verbatim() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/storage/v1/object/apk-bucket/app-release.apk"))
        .respond_with(ResponseTemplate::new(413).set_body_json(serde_json::json!({
            "statusCode": "413",
            "error": "Payload too large",
            "message": "The object exceeded the maximum allowed size"
        })))
        .mount(&mock_server)
        .await;

    let payload = Payload::new("app-release.apk", vec![0u8; 16]);
    let err = test_client(&mock_server)
        .upload(&payload, &UploadOptions::overwrite())
        .await
        .unwrap_err();
    assert_eq!(err.user_message(), "The object exceeded the maximum allowed size");
}

#[tokio::test]
async fn upload_failure_without_message_uses_fallback() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/storage/v1/object/apk-bucket/app-release.apk"))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal"))
        .mount(&mock_server)
        .await;

    let payload = Payload::new("app-release.apk", vec![0u8; 16]);
    let err = test_client(&mock_server)
        .upload(&payload, &UploadOptions::overwrite())
        .await
        .unwrap_err();
    assert!(err.user_message().starts_with("Failed to upload APK"));
}

#[tokio::test]
async fn public_url_is_derived_without_network() {
    let mock_server = MockServer::start().await;
    let client = test_client(&mock_server);

    assert_eq!(
        client.public_url("app-release.apk"),
        format!(
            "{}/storage/v1/object/public/apk-bucket/app-release.apk",
            mock_server.uri()
        )
    );
    assert!(mock_server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn ping_reports_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    assert_eq!(test_client(&mock_server).ping().await.unwrap(), 404);
}
