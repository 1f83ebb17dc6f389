//! End-to-end tests driving the HTTP API on an ephemeral port.

use artcanvas_common::ServiceConfig;
use artcanvas_core::{EnvelopeCodec, TemplateStore};
use artcanvas_daemon::api::{ApiServer, AppState};
use serde_json::{json, Value};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

const SECRET: &str = "integration-test-secret";

const SUBSCRIPTION: &str = "proxies:\n  - name: \"HK-01\"\n    server: hk.example.com\n    port: 8388\n    type: ss\n    cipher: aes-128-gcm\n    password: pw-hk\n  - name: \"HK-01\"\n    server: hk2.example.com\n    port: 8389\n    type: ss\n    cipher: aes-128-gcm\n    password: pw-hk2\n";

const PNG_BYTES: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x01];

/// Start the daemon on an ephemeral port, return its base URL.
async fn spawn_app() -> String {
    let config = ServiceConfig::new().with_secret(SECRET);
    let state = AppState::new(config, TemplateStore::builtin().unwrap());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = ApiServer::router(state);

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{addr}")
}

/// A fake subscription host serving a clash document on /sub and a PNG
/// favicon on /favicon.ico.
async fn spawn_site() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        loop {
            let Ok((mut stream, _)) = listener.accept().await else {
                break;
            };
            tokio::spawn(async move {
                let mut buf = [0u8; 1024];
                let n = stream.read(&mut buf).await.unwrap_or(0);
                let head = String::from_utf8_lossy(&buf[..n]).to_string();

                let (status, content_type, body): (&str, &str, Vec<u8>) =
                    if head.starts_with("GET /sub") {
                        ("200 OK", "text/yaml", SUBSCRIPTION.as_bytes().to_vec())
                    } else if head.starts_with("GET /favicon.ico") {
                        ("200 OK", "image/png", PNG_BYTES.to_vec())
                    } else {
                        ("404 Not Found", "text/plain", b"not here".to_vec())
                    };

                let header = format!(
                    "HTTP/1.1 {status}\r\nContent-Type: {content_type}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                    body.len()
                );
                let _ = stream.write_all(header.as_bytes()).await;
                let _ = stream.write_all(&body).await;
            });
        }
    });

    format!("http://{addr}")
}

#[tokio::test]
async fn test_health() {
    let base = spawn_app().await;
    let response = reqwest::get(format!("{base}/health")).await.unwrap();
    assert_eq!(response.status(), 200);
    assert_eq!(response.text().await.unwrap(), "OK");
}

#[tokio::test]
async fn test_invalid_style_yields_art_only() {
    let base = spawn_app().await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{base}/api/generate"))
        .json(&json!({"style": "not-a-style"}))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();

    assert_eq!(body["authenticated"], false);
    assert_eq!(body["metadata"]["authStatus"], false);
    assert!(body["artData"].as_str().unwrap().starts_with("data:image/svg+xml;base64,"));

    let errors = body["metadata"]["validationErrors"].as_array().unwrap();
    assert!(errors[0].as_str().unwrap().contains("Style"));

    assert!(body.get("faviconData").is_none());
    assert!(body.get("configData").is_none());
}

#[tokio::test]
async fn test_authenticated_generation_builds_config() {
    let base = spawn_app().await;
    let site = spawn_site().await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{base}/api/generate"))
        .json(&json!({
            "style": "geometric",
            "brushStroke": SECRET,
            "canvasTexture": format!("{site}/sub"),
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();

    assert_eq!(body["authenticated"], true);
    assert_eq!(body["metadata"]["authStatus"], true);

    let outbounds = body["configData"]["singbox"]["outbounds"].as_array().unwrap();

    // Source proxy name survives translation; the duplicate got renamed
    assert!(outbounds
        .iter()
        .any(|o| o["type"] == "shadowsocks" && o["tag"] == "HK-01"));
    assert!(outbounds
        .iter()
        .any(|o| o["type"] == "shadowsocks" && o["tag"] == "HK-01_1"));

    // The region group exists and is wired into the selectors
    assert!(outbounds.iter().any(|o| o["tag"] == "🇭🇰 Region"));
    let proxy = outbounds.iter().find(|o| o["tag"] == "PROXY").unwrap();
    assert!(proxy["outbounds"].as_array().unwrap().iter().any(|m| m == "🇭🇰 Region"));

    // Raw subscription text rides along
    assert_eq!(body["configData"]["clash"], SUBSCRIPTION);

    // A favicon is always attached on the authenticated path
    assert_eq!(body["faviconData"]["mimeType"], "image/png");
    assert!(body["faviconData"]["encoded"]
        .as_str()
        .unwrap()
        .starts_with("data:image/png;base64,"));
}

#[tokio::test]
async fn test_wrong_secret_is_indistinguishable() {
    let base = spawn_app().await;
    let site = spawn_site().await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{base}/api/generate"))
        .json(&json!({
            "style": "geometric",
            "brushStroke": "wrong-secret",
            "canvasTexture": format!("{site}/sub"),
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();

    assert_eq!(body["authenticated"], false);
    assert!(body.get("faviconData").is_none());
    assert!(body.get("configData").is_none());
    // Same shape otherwise: art and metadata are present, no error field
    assert!(body["artData"].as_str().unwrap().len() > 0);
    assert!(body["metadata"]["generatedAt"].is_string());
    assert!(body.get("error").is_none());
}

#[tokio::test]
async fn test_missing_body_still_renders_art() {
    let base = spawn_app().await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{base}/api/generate"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["authenticated"], false);
    assert!(body["artData"].as_str().unwrap().len() > 0);
}

#[tokio::test]
async fn test_process_without_seed_is_client_error() {
    let base = spawn_app().await;
    let response = reqwest::get(format!("{base}/api/process")).await.unwrap();
    assert_eq!(response.status(), 400);
    assert_eq!(response.text().await.unwrap(), "No seed provided");
}

#[tokio::test]
async fn test_process_with_garbled_seed_is_server_error() {
    let base = spawn_app().await;
    let response = reqwest::get(format!("{base}/api/process?seed=not-an-envelope"))
        .await
        .unwrap();
    assert_eq!(response.status(), 500);
    assert!(response.text().await.unwrap().contains("Decryption failed"));
}

#[tokio::test]
async fn test_process_passthrough_for_non_object_payload() {
    let base = spawn_app().await;
    let codec = EnvelopeCodec::new(Some(SECRET.to_string()));

    let seed = codec.encrypt(&json!("plain text payload")).unwrap();
    let response = reqwest::get(format!("{base}/api/process?seed={seed}"))
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    assert_eq!(response.text().await.unwrap(), "plain text payload");
}

#[tokio::test]
async fn test_process_echoes_params_when_sources_unusable() {
    let base = spawn_app().await;
    let codec = EnvelopeCodec::new(Some(SECRET.to_string()));

    let params = json!({"urls": 42, "note": "kept verbatim"});
    let seed = codec.encrypt(&params).unwrap();
    let response = reqwest::get(format!("{base}/api/process?seed={seed}"))
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    let envelope = response.text().await.unwrap();
    assert_eq!(codec.decrypt(&envelope).unwrap(), params);
}

#[tokio::test]
async fn test_process_answers_with_encrypted_outbounds() {
    let base = spawn_app().await;
    let codec = EnvelopeCodec::new(Some(SECRET.to_string()));

    // No https source is reachable here, so the translated set is empty,
    // but the channel must still answer with a decryptable envelope.
    let params = json!({"urls": {"main": "https://127.0.0.1:1/sub"}});
    let seed = codec.encrypt(&params).unwrap();
    let response = reqwest::get(format!("{base}/api/process?seed={seed}"))
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    let envelope = response.text().await.unwrap();
    assert_eq!(codec.decrypt(&envelope).unwrap(), json!([]));
}
