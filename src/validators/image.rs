//! Image payload checks.
//!
//! The stages are ordered: type, base64, decodability, file format, colour
//! space, size. A payload failing several stages reports the earliest one.

use crate::errors::{Error, Result};
use base64::prelude::{Engine, BASE64_STANDARD};
use image::{ColorType, ImageFormat};
use serde_json::{Map, Value};

/// Decoded image files may be at most this many bytes.
const MAX_IMAGE_BYTES: usize = 2_359_293;

pub fn validate_image(object: &Map<String, Value>) -> Result<()> {
    let value = match object.get("image") {
        None => return Ok(()),
        Some(value) => value,
    };
    let encoded = value.as_str().ok_or(Error::Fail)?;
    let decoded = BASE64_STANDARD.decode(encoded).map_err(|_| Error::Fail)?;

    let decoded_image = image::load_from_memory(&decoded).map_err(|_| Error::BadImage)?;
    match image::guess_format(&decoded) {
        Ok(ImageFormat::Png | ImageFormat::Jpeg) => {}
        _ => return Err(Error::BadImage),
    }
    match decoded_image.color() {
        ColorType::L8 | ColorType::Rgb8 => {}
        _ => return Err(Error::BadImage),
    }
    if decoded.len() > MAX_IMAGE_BYTES {
        return Err(Error::ImageTooLarge);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, RgbImage, RgbaImage};
    use serde_json::json;
    use std::io::Cursor;

    fn encode(image: &image::DynamicImage, format: ImageFormat) -> String {
        let mut buffer = Cursor::new(Vec::new());
        image.write_to(&mut buffer, format).unwrap();
        BASE64_STANDARD.encode(buffer.into_inner())
    }

    fn object_with_image(encoded: String) -> Map<String, Value> {
        json!({"image": encoded}).as_object().unwrap().clone()
    }

    #[test]
    fn rgb_png_and_jpeg_pass() {
        let rgb = image::DynamicImage::ImageRgb8(RgbImage::new(2, 2));
        assert!(validate_image(&object_with_image(encode(&rgb, ImageFormat::Png))).is_ok());
        assert!(validate_image(&object_with_image(encode(&rgb, ImageFormat::Jpeg))).is_ok());
    }

    #[test]
    fn greyscale_passes() {
        let grey = image::DynamicImage::ImageLuma8(GrayImage::new(2, 2));
        assert!(validate_image(&object_with_image(encode(&grey, ImageFormat::Png))).is_ok());
    }

    #[test]
    fn missing_image_key_passes() {
        assert!(validate_image(&Map::new()).is_ok());
    }

    #[test]
    fn non_string_image_is_a_generic_failure() {
        let object = json!({"image": 7}).as_object().unwrap().clone();
        assert!(matches!(validate_image(&object), Err(Error::Fail)));
        let object = json!({"image": null}).as_object().unwrap().clone();
        assert!(matches!(validate_image(&object), Err(Error::Fail)));
    }

    #[test]
    fn invalid_base64_is_a_generic_failure() {
        let object = object_with_image("not base64!".to_string());
        assert!(matches!(validate_image(&object), Err(Error::Fail)));
    }

    #[test]
    fn undecodable_bytes_are_a_bad_image() {
        let object = object_with_image(BASE64_STANDARD.encode(b"not an image"));
        assert!(matches!(validate_image(&object), Err(Error::BadImage)));
    }

    #[test]
    fn unsupported_file_format_is_a_bad_image() {
        let rgb = image::DynamicImage::ImageRgb8(RgbImage::new(2, 2));
        let object = object_with_image(encode(&rgb, ImageFormat::Bmp));
        assert!(matches!(validate_image(&object), Err(Error::BadImage)));
    }

    #[test]
    fn rgba_colour_space_is_a_bad_image() {
        let rgba = image::DynamicImage::ImageRgba8(RgbaImage::new(2, 2));
        let object = object_with_image(encode(&rgba, ImageFormat::Png));
        assert!(matches!(validate_image(&object), Err(Error::BadImage)));
    }

    #[test]
    fn oversized_image_is_reported_as_too_large() {
        // A large noisy RGB image compresses poorly enough to cross the bound.
        let mut pixels = RgbImage::new(1200, 1200);
        for (x, y, pixel) in pixels.enumerate_pixels_mut() {
            let h = (y * 1200 + x).wrapping_mul(2_654_435_761);
            *pixel = image::Rgb([(h >> 24) as u8, (h >> 16) as u8, (h >> 8) as u8]);
        }
        let encoded = encode(&image::DynamicImage::ImageRgb8(pixels), ImageFormat::Png);
        let decoded_len = BASE64_STANDARD.decode(&encoded).unwrap().len();
        assert!(decoded_len > MAX_IMAGE_BYTES, "test image must exceed the bound");
        let object = object_with_image(encoded);
        assert!(matches!(validate_image(&object), Err(Error::ImageTooLarge)));
    }
}
