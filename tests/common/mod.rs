#![allow(dead_code)]

use std::io::Cursor;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response};
use http_body_util::BodyExt;
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use tower::ServiceExt;

use image_magic_lib::{AppState, Config, router};

pub const BOUNDARY: &str = "image-magic-test-boundary";

pub enum Part<'a> {
    Text(&'a str, &'a str),
    File {
        field: &'a str,
        filename: Option<&'a str>,
        content_type: &'a str,
        bytes: Vec<u8>,
    },
}

pub fn file<'a>(filename: &'a str, content_type: &'a str, bytes: Vec<u8>) -> Part<'a> {
    Part::File {
        field: "files",
        filename: Some(filename),
        content_type,
        bytes,
    }
}

pub fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match part {
            Part::Text(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n")
                        .as_bytes(),
                );
            }
            Part::File { field, filename, content_type, bytes } => {
                let disposition = match filename {
                    Some(f) => format!("form-data; name=\"{field}\"; filename=\"{f}\""),
                    None => format!("form-data; name=\"{field}\""),
                };
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: {disposition}\r\nContent-Type: {content_type}\r\n\r\n"
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(bytes);
                body.extend_from_slice(b"\r\n");
            }
        }
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub fn app() -> Router {
    router(AppState::default())
}

pub fn app_with_limit(max_upload_mb: usize) -> Router {
    router(AppState::new(Config {
        max_upload_mb,
        ..Config::default()
    }))
}

pub async fn post_multipart(app: Router, uri: &str, parts: &[Part<'_>]) -> Response<Body> {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(multipart_body(parts)))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response.into_body().collect().await.unwrap().to_bytes().to_vec()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

pub fn header<'a>(response: &'a Response<Body>, name: &str) -> Option<&'a str> {
    response.headers().get(name).and_then(|v| v.to_str().ok())
}

/// A small opaque gradient encoded as `format`.
pub fn sample_image(width: u32, height: u32, format: ImageFormat) -> Vec<u8> {
    let img = RgbaImage::from_fn(width, height, |x, y| {
        Rgba([(x * 255 / width.max(1)) as u8, (y * 255 / height.max(1)) as u8, 90, 255])
    });
    let img = match format {
        ImageFormat::Jpeg => DynamicImage::ImageRgb8(DynamicImage::ImageRgba8(img).to_rgb8()),
        _ => DynamicImage::ImageRgba8(img),
    };
    let mut bytes = Vec::new();
    img.write_to(&mut Cursor::new(&mut bytes), format).unwrap();
    bytes
}
