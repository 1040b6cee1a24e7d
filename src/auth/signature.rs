//! The HMAC-SHA1 signature scheme used by the target management API.
//!
//! A signed request carries `Authorization: VWS <accessKey>:<signature>`,
//! where the signature is the base64 HMAC-SHA1 (keyed by the secret key) of
//!
//! ```text
//! method \n md5_hex(body) \n content_type \n date \n request_path
//! ```
//!
//! The same routine serves both sides: clients and test helpers build the
//! header with it, and the server recomputes it to verify.

use base64::prelude::{Engine, BASE64_STANDARD};
use chrono::Utc;
use hmac::{Hmac, Mac};
use md5::{Digest, Md5};
use sha1::Sha1;

/// The current time in the RFC 1123 form the `Date` header uses,
/// e.g. `Sun, 06 Nov 1994 08:49:37 GMT`.
pub fn rfc_1123_date() -> String {
    Utc::now().format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

fn hmac_base64(secret_key: &[u8], data: &[u8]) -> String {
    let mut mac = Hmac::<Sha1>::new_from_slice(secret_key)
        .expect("HMAC accepts keys of any length");
    mac.update(data);
    BASE64_STANDARD.encode(mac.finalize().into_bytes())
}

/// Build the full `Authorization` header value for a request.
///
/// `content_type` is the raw header value, or the empty string when the
/// request carries none. `date` must be the exact string sent in the `Date`
/// header, since it is part of the signed material.
pub fn authorization_header(
    access_key: &str,
    secret_key: &str,
    method: &str,
    content: &[u8],
    content_type: &str,
    date: &str,
    request_path: &str,
) -> String {
    let content_md5 = format!("{:x}", Md5::digest(content));
    let string_to_sign =
        format!("{method}\n{content_md5}\n{content_type}\n{date}\n{request_path}");
    let signature = hmac_base64(secret_key.as_bytes(), string_to_sign.as_bytes());
    format!("VWS {access_key}:{signature}")
}
