//! The error taxonomy of the emulated target management API.
//!
//! Every validator failure and handler rejection is one variant of [`Error`].
//! The [`IntoResponse`] impl is the single, exhaustive mapping from error kind
//! to (status code, headers, body); no handler builds its own error response.

use crate::types::transaction_id;
use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error as ThisError;

/// Result code strings exactly as the emulated service spells them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultCode {
    Success,
    TargetCreated,
    AuthenticationFailure,
    RequestTimeTooSkewed,
    Fail,
    UnknownTarget,
    TargetNameExist,
    ProjectInactive,
    BadImage,
    ImageTooLarge,
    MetadataTooLarge,
    TargetStatusProcessing,
    TargetStatusNotSuccess,
}

impl ResultCode {
    pub fn as_str(self) -> &'static str {
        match self {
            ResultCode::Success => "Success",
            ResultCode::TargetCreated => "TargetCreated",
            ResultCode::AuthenticationFailure => "AuthenticationFailure",
            ResultCode::RequestTimeTooSkewed => "RequestTimeTooSkewed",
            ResultCode::Fail => "Fail",
            ResultCode::UnknownTarget => "UnknownTarget",
            ResultCode::TargetNameExist => "TargetNameExist",
            ResultCode::ProjectInactive => "ProjectInactive",
            ResultCode::BadImage => "BadImage",
            ResultCode::ImageTooLarge => "ImageTooLarge",
            ResultCode::MetadataTooLarge => "MetadataTooLarge",
            ResultCode::TargetStatusProcessing => "TargetStatusProcessing",
            ResultCode::TargetStatusNotSuccess => "TargetStatusNotSuccess",
        }
    }
}

impl Serialize for ResultCode {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Standard error body: `{"transaction_id":"…","result_code":"…"}`.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub transaction_id: String,
    pub result_code: ResultCode,
}

/// HTML page returned for unexpected internal failures, mirroring the
/// emulated service's "Oops" page.
const OOPS_ERROR_HTML: &str = "<html><head><title>Error</title></head>\
<body><h1>Oops, an error occurred</h1>\
<p>This exception has been logged with id <code>0000000000</code>.</p>\
</body></html>";

#[derive(ThisError, Debug)]
pub enum Error {
    /// `Content-Length` header did not parse as an integer. Reported with an
    /// abrupt connection close and no body.
    #[error("Content-Length header is not an integer")]
    ContentLengthHeaderNotInt,

    /// `Content-Length` header claimed a larger body than was sent. Same
    /// abrupt connection-close behavior as the non-integer case.
    #[error("Content-Length header is larger than the body")]
    ContentLengthHeaderTooLarge,

    /// Missing/malformed Authorization header, unknown access key, signature
    /// mismatch, or an understated `Content-Length` header. The emulated
    /// service never distinguishes these, so neither do we.
    #[error("Authentication failure")]
    AuthenticationFailure,

    /// `Date` header outside the allowed clock-skew window.
    #[error("Request time too skewed")]
    RequestTimeTooSkewed,

    /// Generic bad request: malformed JSON, disallowed keys, invalid field
    /// values, undecodable base64.
    #[error("Bad request")]
    Fail,

    /// A body was supplied to an endpoint that takes none.
    #[error("Unnecessary request body")]
    UnnecessaryRequestBody,

    /// Target id does not exist (or is soft-deleted) in the matched database.
    #[error("Unknown target")]
    UnknownTarget,

    /// Another not-deleted target in the database already has this name.
    #[error("Target name already exists")]
    TargetNameExist,

    /// The matched database is inactive or suspended.
    #[error("Project inactive")]
    ProjectInactive,

    /// Image payload is not a decodable RGB/greyscale PNG or JPEG.
    #[error("Bad image")]
    BadImage,

    /// Decoded image exceeds the size bound.
    #[error("Image too large")]
    ImageTooLarge,

    /// Decoded application metadata exceeds the size bound.
    #[error("Metadata too large")]
    MetadataTooLarge,

    /// Delete attempted while the target is still processing.
    #[error("Target status is processing")]
    TargetStatusProcessing,

    /// Update attempted while the target status is not success.
    #[error("Target status is not success")]
    TargetStatusNotSuccess,

    /// Unexpected internal failure with full context chain.
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl Error {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::ContentLengthHeaderNotInt => StatusCode::BAD_REQUEST,
            Error::ContentLengthHeaderTooLarge => StatusCode::BAD_REQUEST,
            Error::AuthenticationFailure => StatusCode::UNAUTHORIZED,
            Error::RequestTimeTooSkewed => StatusCode::UNAUTHORIZED,
            Error::Fail => StatusCode::BAD_REQUEST,
            Error::UnnecessaryRequestBody => StatusCode::BAD_REQUEST,
            Error::UnknownTarget => StatusCode::NOT_FOUND,
            Error::TargetNameExist => StatusCode::FORBIDDEN,
            Error::ProjectInactive => StatusCode::FORBIDDEN,
            Error::BadImage => StatusCode::BAD_REQUEST,
            Error::ImageTooLarge => StatusCode::BAD_REQUEST,
            Error::MetadataTooLarge => StatusCode::BAD_REQUEST,
            Error::TargetStatusProcessing => StatusCode::FORBIDDEN,
            Error::TargetStatusNotSuccess => StatusCode::FORBIDDEN,
            Error::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The result code carried in the standard JSON error body, if this kind
    /// has one. Kinds returning `None` use an empty or HTML body instead.
    pub fn result_code(&self) -> Option<ResultCode> {
        match self {
            Error::ContentLengthHeaderNotInt
            | Error::ContentLengthHeaderTooLarge
            | Error::UnnecessaryRequestBody
            | Error::Internal(_) => None,
            Error::AuthenticationFailure => Some(ResultCode::AuthenticationFailure),
            Error::RequestTimeTooSkewed => Some(ResultCode::RequestTimeTooSkewed),
            Error::Fail => Some(ResultCode::Fail),
            Error::UnknownTarget => Some(ResultCode::UnknownTarget),
            Error::TargetNameExist => Some(ResultCode::TargetNameExist),
            Error::ProjectInactive => Some(ResultCode::ProjectInactive),
            Error::BadImage => Some(ResultCode::BadImage),
            Error::ImageTooLarge => Some(ResultCode::ImageTooLarge),
            Error::MetadataTooLarge => Some(ResultCode::MetadataTooLarge),
            Error::TargetStatusProcessing => Some(ResultCode::TargetStatusProcessing),
            Error::TargetStatusNotSuccess => Some(ResultCode::TargetStatusNotSuccess),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match &self {
            Error::Internal(_) => {
                tracing::error!("Internal service error: {:#}", self);
            }
            Error::AuthenticationFailure | Error::RequestTimeTooSkewed => {
                tracing::info!("Authorization error: {}", self);
            }
            _ => {
                tracing::debug!("Client error: {}", self);
            }
        }

        let status = self.status_code();

        match &self {
            // The two Content-Length failures are the only responses that
            // abruptly close the connection; the response post-processor
            // leaves responses that already carry a Connection header alone.
            Error::ContentLengthHeaderNotInt | Error::ContentLengthHeaderTooLarge => {
                let mut response = status.into_response();
                response
                    .headers_mut()
                    .insert(header::CONNECTION, HeaderValue::from_static("Close"));
                response
            }
            // Empty body; the post-processor emits no Content-Type for
            // empty bodies, matching the emulated service.
            Error::UnnecessaryRequestBody => status.into_response(),
            Error::Internal(_) => (
                status,
                [(header::CONTENT_TYPE, "text/html; charset=UTF-8")],
                OOPS_ERROR_HTML,
            )
                .into_response(),
            _ => {
                let body = ErrorBody {
                    transaction_id: transaction_id(),
                    result_code: self
                        .result_code()
                        .expect("standard-body error kinds always carry a result code"),
                };
                // Compact serialization of a two-field struct cannot fail.
                let text = serde_json::to_string(&body).unwrap_or_default();
                let mut response = (status, text).into_response();
                response.headers_mut().insert(
                    header::CONTENT_TYPE,
                    HeaderValue::from_static("application/json"),
                );
                if matches!(self, Error::AuthenticationFailure) {
                    response
                        .headers_mut()
                        .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("VWS"));
                }
                response
            }
        }
    }
}

/// Type alias for operations that fail with a service error.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_length_errors_close_the_connection() {
        for err in [
            Error::ContentLengthHeaderNotInt,
            Error::ContentLengthHeaderTooLarge,
        ] {
            let response = err.into_response();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
            assert_eq!(
                response.headers().get(header::CONNECTION).unwrap(),
                "Close"
            );
        }
    }

    #[test]
    fn authentication_failure_has_json_body_and_challenge() {
        let response = Error::AuthenticationFailure.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            response.headers().get(header::WWW_AUTHENTICATE).unwrap(),
            "VWS"
        );
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/json"
        );
    }

    #[test]
    fn unnecessary_request_body_has_no_content_type() {
        let response = Error::UnnecessaryRequestBody.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(response.headers().get(header::CONTENT_TYPE).is_none());
    }

    #[test]
    fn internal_errors_render_the_html_page() {
        let response = Error::Internal(anyhow::anyhow!("boom")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "text/html; charset=UTF-8"
        );
    }

    #[test]
    fn status_codes_match_the_service() {
        assert_eq!(Error::UnknownTarget.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(Error::TargetNameExist.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(Error::ProjectInactive.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(
            Error::TargetStatusProcessing.status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            Error::RequestTimeTooSkewed.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(Error::ImageTooLarge.status_code(), StatusCode::BAD_REQUEST);
    }
}
