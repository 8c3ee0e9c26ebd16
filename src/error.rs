use axum::extract::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use std::fmt::{self, Display};
use std::io;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Error {
    pub code: i32,
    pub message: String,
}

impl Error {
    pub fn is_storage_error(&self) -> bool {
        self.code == 2
    }

    pub fn is_unavailable_error(&self) -> bool {
        self.code == 3
    }

    pub fn is_response_error(&self) -> bool {
        self.code == 4
    }

    pub fn is_parse_error(&self) -> bool {
        self.code == 5
    }

    /// Replaces the message, keeping the code.
    pub fn with_message(self, message: impl Into<String>) -> Self {
        Self {
            code: self.code,
            message: message.into(),
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code {})", self.message, self.code)
    }
}

impl std::error::Error for Error {}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        tracing::error!("io error: {}", err);
        storage_error()
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        tracing::error!("json error: {}", err);
        match err.classify() {
            serde_json::error::Category::Io => storage_error(),
            _ => parse_error(),
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        tracing::warn!("reqwest error: {}", err);
        if err.is_decode() {
            return parse_error();
        }

        unavailable_error()
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = match self.code {
            1..=99 => StatusCode::INTERNAL_SERVER_ERROR,
            404 => StatusCode::NOT_FOUND,
            _ => StatusCode::BAD_REQUEST,
        };

        let body = Json(json!({
            "message": self.message,
        }));

        (status, body).into_response()
    }
}

pub fn config_error(message: impl Into<String>) -> Error {
    Error {
        code: 1,
        message: message.into(),
    }
}

pub fn storage_error() -> Error {
    Error {
        code: 2,
        message: "storage error".into(),
    }
}

pub fn unavailable_error() -> Error {
    Error {
        code: 3,
        message: "gateway unavailable".into(),
    }
}

pub fn response_error(message: impl Into<String>) -> Error {
    Error {
        code: 4,
        message: message.into(),
    }
}

pub fn parse_error() -> Error {
    Error {
        code: 5,
        message: "unexpected response structure".into(),
    }
}

pub fn invalid_input_error() -> Error {
    Error {
        code: 100,
        message: "invalid input".into(),
    }
}

pub fn not_found_error() -> Error {
    Error {
        code: 404,
        message: "404 - Not Found".into(),
    }
}

#[test]
fn status_for_codes() {
    let res = storage_error().into_response();
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let res = not_found_error().into_response();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = invalid_input_error().into_response();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[test]
fn json_syntax_error_is_parse_error() {
    let err: Error = serde_json::from_str::<Vec<u8>>("[1,").unwrap_err().into();
    assert!(err.is_parse_error());

    let err: Error = serde_json::from_str::<Vec<u8>>("{}").unwrap_err().into();
    assert!(err.is_parse_error());
}
