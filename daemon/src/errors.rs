//! Mapping of failures onto HTTP error responses.
use std::{convert::Infallible, error::Error as StdError};

use serde::Serialize;
use thiserror::Error;
use warp::{
    Reply,
    body::BodyDeserializeError,
    http::StatusCode,
    reject::{
        self, InvalidQuery, LengthRequired, MethodNotAllowed, PayloadTooLarge, Reject, Rejection,
        UnsupportedMediaType,
    },
};

use aurca_storage::{db::schemas::payload::FieldError, errors::Error as StorageError};

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl Error {
    #[must_use]
    #[inline]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Storage(StorageError::Validation(_) | StorageError::InvalidIdentifier(_)) => {
                StatusCode::BAD_REQUEST
            }
            Self::Storage(StorageError::NotFound) => StatusCode::NOT_FOUND,
            Self::Storage(
                StorageError::Unavailable
                | StorageError::ReadAfterWrite { .. }
                | StorageError::MalformedKey(_)
                | StorageError::DbError(_),
            ) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl Reject for Error {}

#[inline]
pub fn reject_on_error(err: impl Into<Error>) -> Rejection {
    reject::custom(err.into())
}

/// An API error serializable to JSON.
#[derive(Debug, Serialize)]
struct ErrorResponseBody {
    code: u16,
    message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    fields: Vec<FieldError>,
}

fn status_code_to_string(code: StatusCode) -> String {
    code.canonical_reason()
        .unwrap_or_else(|| code.as_str())
        .to_string()
}

fn source_message(err: &dyn StdError) -> String {
    err.source()
        .map_or_else(|| err.to_string(), ToString::to_string)
}

/// Render a rejection as a JSON error body with a matching status code.
///
/// # Errors
///
/// Never.
#[allow(clippy::unused_async)] // async needed for warp filter
#[inline]
pub async fn handle_rejection(reject: Rejection) -> Result<impl Reply, Infallible> {
    let code;
    let message;
    let mut fields = Vec::new();

    if reject.is_not_found() {
        code = StatusCode::NOT_FOUND;
        message = status_code_to_string(code);
    } else if let Some(err) = reject.find::<Error>() {
        code = err.status_code();
        message = err.to_string();
        if let Error::Storage(StorageError::Validation(validation)) = err {
            fields.clone_from(&validation.fields);
        }
        if code.is_server_error() {
            log::warn!("{err}");
        } else {
            log::debug!("{err}");
        }
    } else if let Some(err) = reject.find::<InvalidQuery>() {
        code = StatusCode::BAD_REQUEST;
        message = source_message(err);
    } else if let Some(err) = reject.find::<BodyDeserializeError>() {
        code = StatusCode::BAD_REQUEST;
        message = source_message(err);
    } else if let Some(err) = reject.find::<PayloadTooLarge>() {
        code = StatusCode::PAYLOAD_TOO_LARGE;
        message = err.to_string();
    } else if let Some(err) = reject.find::<LengthRequired>() {
        code = StatusCode::LENGTH_REQUIRED;
        message = err.to_string();
    } else if let Some(err) = reject.find::<UnsupportedMediaType>() {
        code = StatusCode::UNSUPPORTED_MEDIA_TYPE;
        message = err.to_string();
    } else if let Some(err) = reject.find::<MethodNotAllowed>() {
        // This must have the least priority, because most rejections
        // contain a MethodNotAllowed element!
        code = StatusCode::METHOD_NOT_ALLOWED;
        message = err.to_string();
    } else {
        log::error!("Unhandled rejection {reject:?}");
        code = StatusCode::INTERNAL_SERVER_ERROR;
        message = format!("{reject:?}");
    }

    let json_reply = warp::reply::json(&ErrorResponseBody {
        code: code.as_u16(),
        message,
        fields,
    });

    Ok(warp::reply::with_status(json_reply, code))
}

#[cfg(test)]
mod tests {
    use super::*;
    use aurca_storage::db::schemas::payload::{Reason, ValidationError};

    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case(StorageError::Validation(ValidationError::single("title", Reason::Missing)), StatusCode::BAD_REQUEST)]
    #[case(StorageError::InvalidIdentifier("x".into()), StatusCode::BAD_REQUEST)]
    #[case(StorageError::NotFound, StatusCode::NOT_FOUND)]
    #[case(StorageError::Unavailable, StatusCode::INTERNAL_SERVER_ERROR)]
    #[case(
        StorageError::ReadAfterWrite { table: "track", id: "65a1b2c3d4e5f60718293a4b".parse().unwrap() },
        StatusCode::INTERNAL_SERVER_ERROR
    )]
    #[case(StorageError::MalformedKey("track:weird".into()), StatusCode::INTERNAL_SERVER_ERROR)]
    fn test_status_code(#[case] err: StorageError, #[case] expected: StatusCode) {
        assert_eq!(Error::from(err).status_code(), expected);
    }

    #[tokio::test]
    async fn test_handle_rejection_body() {
        let rejection = reject_on_error(StorageError::Validation(ValidationError::single(
            "title",
            Reason::Missing,
        )));

        let response = handle_rejection(rejection).await.unwrap().into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = warp::hyper::body::to_bytes(response.into_body()).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "code": 400,
                "message": "Invalid payload: title (field required)",
                "fields": [{"field": "title", "reason": "missing"}],
            })
        );
    }

    #[tokio::test]
    async fn test_handle_not_found() {
        let response = handle_rejection(reject::not_found())
            .await
            .unwrap()
            .into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
