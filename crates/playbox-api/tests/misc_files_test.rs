//! Misc file upload and serve integration tests.
//!
//! Run with: `cargo test -p playbox-api --test misc_files_test`

mod helpers;

use axum_test::multipart::{MultipartForm, Part};
use helpers::{setup_test_app, PUBLIC_BASE_URL};
use playbox_storage::Storage;

fn png_fixture() -> Vec<u8> {
    // PNG signature plus a few payload bytes; handlers never sniff content.
    let mut data = vec![0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];
    data.extend_from_slice(&[0x00, 0x01, 0x02, 0x03]);
    data
}

fn upload_form(filename: &str, mime: &str, data: Vec<u8>) -> MultipartForm {
    MultipartForm::new().add_part(
        "file",
        Part::bytes(data).file_name(filename).mime_type(mime),
    )
}

#[tokio::test]
async fn upload_then_serve_roundtrip() {
    let app = setup_test_app().await;
    let png = png_fixture();

    let response = app
        .server
        .post("/misc-file/upload")
        .multipart(upload_form("screenshot.png", "image/png", png.clone()))
        .await;
    assert_eq!(response.status_code(), 200);

    let body: serde_json::Value = response.json();
    assert_eq!(body["ok"], true);
    assert_eq!(body["message"], "File uploaded successfully");

    let url = body["url"].as_str().unwrap();
    assert!(url.ends_with(".png"), "url should keep the extension: {url}");
    let file_id = body["fileId"].as_str().unwrap();
    assert!(!file_id.is_empty());
    assert!(url.contains(file_id));

    // The file is retrievable at the returned URL with the right headers.
    let path = url.strip_prefix(PUBLIC_BASE_URL).unwrap();
    let served = app.server.get(path).await;
    assert_eq!(served.status_code(), 200);
    assert_eq!(
        served.headers().get("content-type").unwrap(),
        "image/png"
    );
    assert_eq!(
        served.headers().get("cache-control").unwrap(),
        "public, max-age=31536000"
    );
    assert_eq!(
        served
            .headers()
            .get("content-length")
            .unwrap()
            .to_str()
            .unwrap(),
        png.len().to_string()
    );
    assert_eq!(&served.as_bytes()[..], &png[..]);
}

#[tokio::test]
async fn every_allowed_extension_uploads() {
    let app = setup_test_app().await;

    for (filename, mime) in [
        ("a.png", "image/png"),
        ("b.jpg", "image/jpeg"),
        ("c.JPEG", "image/jpeg"),
        ("d.mp4", "video/mp4"),
        ("e.gif", "image/gif"),
        ("f.mov", "video/quicktime"),
        ("g.mp3", "audio/mpeg"),
    ] {
        let response = app
            .server
            .post("/misc-file/upload")
            .multipart(upload_form(filename, mime, vec![1, 2, 3]))
            .await;
        assert_eq!(response.status_code(), 200, "upload of {filename} failed");

        let body: serde_json::Value = response.json();
        let expected_ext = filename.rsplit('.').next().unwrap().to_lowercase();
        let url = body["url"].as_str().unwrap();
        assert!(
            url.ends_with(&format!(".{expected_ext}")),
            "url {url} should end with .{expected_ext}"
        );
    }
}

#[tokio::test]
async fn disallowed_extension_is_rejected_without_store_write() {
    let app = setup_test_app().await;

    let response = app
        .server
        .post("/misc-file/upload")
        .multipart(upload_form("tool.exe", "application/octet-stream", vec![0; 16]))
        .await;
    assert_eq!(response.status_code(), 400);

    // Nothing was written under the misc-files prefix.
    assert!(!app.temp_dir.path().join("misc-files").exists());
}

#[tokio::test]
async fn missing_file_field_is_rejected() {
    let app = setup_test_app().await;

    let response = app
        .server
        .post("/misc-file/upload")
        .multipart(MultipartForm::new().add_text("note", "no file here"))
        .await;
    assert_eq!(response.status_code(), 400);
}

#[tokio::test]
async fn oversized_upload_is_rejected() {
    let app = setup_test_app().await;

    // Test config caps uploads at 8 MB.
    let response = app
        .server
        .post("/misc-file/upload")
        .multipart(upload_form("big.mp4", "video/mp4", vec![0u8; 9 * 1024 * 1024]))
        .await;
    assert_eq!(response.status_code(), 400);
}

#[tokio::test]
async fn missing_object_is_not_found() {
    let app = setup_test_app().await;

    let response = app.server.get("/misc-file/0190dead-0000.png").await;
    assert_eq!(response.status_code(), 404);
}

#[tokio::test]
async fn extensionless_lookup_uses_the_bare_key() {
    let app = setup_test_app().await;

    app.storage
        .put("misc-files/raw-object", "application/octet-stream", vec![9, 9])
        .await
        .unwrap();

    let response = app.server.get("/misc-file/raw-object").await;
    assert_eq!(response.status_code(), 200);
    assert_eq!(
        response.headers().get("content-type").unwrap(),
        "application/octet-stream"
    );
}

#[tokio::test]
async fn empty_file_id_is_rejected() {
    let app = setup_test_app().await;

    // ".png" has an empty stem once the extension is split off.
    let response = app.server.get("/misc-file/.png").await;
    assert_eq!(response.status_code(), 400);
}
