//! Shared helpers for tests: a seeded test server and signed requests.

use crate::auth::{authorization_header, rfc_1123_date};
use crate::config::Config;
use crate::database::VuforiaDatabase;
use crate::store::Registry;
use crate::{build_router, AppState};
use axum::http::{header, HeaderValue, Method};
use axum_test::{TestRequest, TestServer};
use base64::prelude::{Engine, BASE64_STANDARD};
use image::{ImageFormat, RgbImage};
use serde_json::json;
use std::io::Cursor;
use std::sync::Arc;
use std::time::Duration;

pub const TEST_SERVER_ACCESS_KEY: &str = "my_access_key";
pub const TEST_SERVER_SECRET_KEY: &str = "my_secret_key";

pub fn create_test_config() -> Config {
    Config {
        host: "127.0.0.1".to_string(),
        port: 0,
        processing_duration: Duration::from_millis(200),
        ..Config::default()
    }
}

pub fn create_test_database() -> VuforiaDatabase {
    VuforiaDatabase::builder()
        .database_name("test-db")
        .server_access_key(TEST_SERVER_ACCESS_KEY)
        .server_secret_key(TEST_SERVER_SECRET_KEY)
        .client_access_key("test_client_access_key")
        .client_secret_key("test_client_secret_key")
        .build()
}

pub async fn create_test_app() -> (TestServer, AppState) {
    create_test_app_with(create_test_config(), create_test_database()).await
}

pub async fn create_test_app_with(
    config: Config,
    database: VuforiaDatabase,
) -> (TestServer, AppState) {
    let registry = Arc::new(Registry::new());
    registry
        .add_database(database)
        .await
        .expect("failed to register test database");
    let state = AppState::builder().registry(registry).config(config).build();
    let server = TestServer::new(build_router(state.clone())).expect("failed to start test server");
    (server, state)
}

/// Sleep past the configured processing window of [`create_test_config`].
pub async fn wait_for_processing() {
    tokio::time::sleep(Duration::from_millis(300)).await;
}

/// A correctly signed request for the test database's server keys.
pub fn vws_request(
    server: &TestServer,
    method: Method,
    path: &str,
    body: Vec<u8>,
    content_type: Option<&str>,
) -> TestRequest {
    let date = rfc_1123_date();
    let authorization = authorization_header(
        TEST_SERVER_ACCESS_KEY,
        TEST_SERVER_SECRET_KEY,
        method.as_str(),
        &body,
        content_type.unwrap_or(""),
        &date,
        path,
    );

    let mut request = match method {
        Method::GET => server.get(path),
        Method::POST => server.post(path),
        Method::PUT => server.put(path),
        Method::DELETE => server.delete(path),
        other => panic!("unsupported test method {other}"),
    }
    .add_header(
        header::AUTHORIZATION,
        HeaderValue::from_str(&authorization).expect("authorization header is ASCII"),
    )
    .add_header(
        header::DATE,
        HeaderValue::from_str(&date).expect("date header is ASCII"),
    )
    .bytes(body.into());
    if let Some(content_type) = content_type {
        request = request.content_type(content_type);
    }
    request
}

/// A compact add-target body with the given name, width and raw image bytes.
pub fn add_target_body(name: &str, width: f64, image: &[u8]) -> Vec<u8> {
    serde_json::to_vec(&json!({
        "name": name,
        "width": width,
        "image": BASE64_STANDARD.encode(image),
    }))
    .expect("add-target body serializes")
}

/// A tiny white RGB PNG.
pub fn png_rgb() -> Vec<u8> {
    png_rgb_colored([255, 255, 255])
}

/// A tiny single-colour RGB PNG, for images that must not match each other.
pub fn png_rgb_colored(rgb: [u8; 3]) -> Vec<u8> {
    let mut pixels = RgbImage::new(1, 1);
    pixels.put_pixel(0, 0, image::Rgb(rgb));
    let mut buffer = Cursor::new(Vec::new());
    image::DynamicImage::ImageRgb8(pixels)
        .write_to(&mut buffer, ImageFormat::Png)
        .expect("PNG encoding of a 1x1 image succeeds");
    buffer.into_inner()
}

/// Base64 of [`png_rgb`], for hand-built JSON bodies.
pub fn base64_png() -> String {
    BASE64_STANDARD.encode(png_rgb())
}
