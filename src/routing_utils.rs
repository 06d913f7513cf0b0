use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum_macros::FromRequest;

use serde::Serialize;
use utoipa::openapi::{RefOr, Schema};
use utoipa::{openapi, ToResponse, ToSchema};

use validator::ValidationErrors;

use crate::error::DocsError;

/// Contains diagnostic information about an API failure
#[derive(Serialize, Debug, ToResponse)]
#[response(examples(
    ("Not Found" = (
        summary = "Requested document or resource does not exist (404)",
        value = json!({
            "error_code": "not_found",
            "error_description": "No API documentation is registered for the \"v9\" group.",
            "extra_info": null
        })
    )),

    ("Unauthorized" = (
        summary = "No credentials were supplied (401)",
        value = json!({
            "error_code": "unauthorized",
            "error_description": "This operation requires a bearer token.",
            "extra_info": null
        })
    )),

    ("Internal Failure" = (
        summary = "Something unexpected went wrong inside the server (500)",
        value = json!({
            "error_code": "internal_error",
            "error_description": "Could not complete your request.",
            "extra_info": null
        })
    )),

    ("Invalid Input" = (
        summary = "Invalid request body was passed (400)",
        value = json!({
            "error_code": "invalid_input",
            "error_description": "Submitted data was invalid.",
            "extra_info": {
                "name": [
                    {
                        "code": "length",
                        "message": null,
                        "params": {
                            "value": "",
                            "min": 1,
                            "max": 30
                        }
                    }
                ]
            }
        })
    )),

    ("Malformed JSON" = (
        summary = "Invalid JSON passed to server (400)",
        value = json!({
            "error_code": "invalid_json",
            "error_description": "The passed request body contained malformed or unreadable JSON.",
            "extra_info": "Failed to parse the request body as JSON: EOF while parsing an object at line 4 column 0"
        })
    ))
))]
pub struct BasicErrorResponse {
    pub error_code: String,
    pub error_description: String,
    pub extra_info: Option<ExtraInfo>,
}

impl BasicErrorResponse {
    fn new(error_code: &str, error_description: impl Into<String>) -> Self {
        BasicErrorResponse {
            error_code: error_code.to_owned(),
            error_description: error_description.into(),
            extra_info: None,
        }
    }
}

#[derive(Serialize, Debug, ToSchema)]
#[serde(untagged)]
pub enum ExtraInfo {
    ValidationIssues(ValidationErrorSchema),
    Message(String),
}

/// Stand-in OpenAPI schema for [ValidationErrors] which just provides an empty object
#[derive(Serialize, Debug)]
#[serde(transparent)]
pub struct ValidationErrorSchema(ValidationErrors);

impl<'schem> ToSchema<'schem> for ValidationErrorSchema {
    fn schema() -> (&'schem str, RefOr<Schema>) {
        (
            "ValidationErrorSchema",
            openapi::ObjectBuilder::new().into(),
        )
    }
}

/// Response type that turns documentation failures into [BasicErrorResponse]s
pub enum DocsErrorResponse {
    NotFound(String),
    Internal,
}

impl IntoResponse for DocsErrorResponse {
    fn into_response(self) -> Response {
        match self {
            Self::NotFound(description) => (
                StatusCode::NOT_FOUND,
                Json(BasicErrorResponse::new("not_found", description)),
            )
                .into_response(),

            Self::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(BasicErrorResponse::new(
                    "internal_error",
                    "Could not complete your request.",
                )),
            )
                .into_response(),
        }
    }
}

impl From<DocsError> for DocsErrorResponse {
    fn from(value: DocsError) -> Self {
        match value {
            DocsError::UnknownDocument(group) => Self::NotFound(format!(
                "No API documentation is registered for the \"{group}\" group."
            )),
            DocsError::Filesystem { .. } | DocsError::MissingCollaborator(_) => Self::Internal,
        }
    }
}

/// Response returned to callers of protected operations that sent no credentials
pub struct UnauthorizedResponse;

impl IntoResponse for UnauthorizedResponse {
    fn into_response(self) -> Response {
        (
            StatusCode::UNAUTHORIZED,
            Json(BasicErrorResponse::new(
                "unauthorized",
                "This operation requires a bearer token.",
            )),
        )
            .into_response()
    }
}

/// Response type that wraps validation errors and turns them into [BasicErrorResponse]s
pub struct ValidationErrorResponse(ValidationErrors);

impl IntoResponse for ValidationErrorResponse {
    fn into_response(self) -> Response {
        (
            StatusCode::BAD_REQUEST,
            Json(BasicErrorResponse {
                error_code: "invalid_input".into(),
                error_description: "Submitted data was invalid.".to_owned(),
                extra_info: Some(ExtraInfo::ValidationIssues(ValidationErrorSchema(self.0))),
            }),
        )
            .into_response()
    }
}

impl From<ValidationErrors> for ValidationErrorResponse {
    fn from(value: ValidationErrors) -> Self {
        Self(value)
    }
}

/// Wrapper for [axum::Json] which customizes the error response to use our
/// data structure for API errors
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(JsonErrorResponse))]
pub struct Json<T>(pub T);

impl<T: Serialize> IntoResponse for Json<T> {
    fn into_response(self) -> Response {
        axum::Json(self.0).into_response()
    }
}

/// Response type representing JSON parse errors
pub struct JsonErrorResponse {
    parse_problem: String,
}

impl From<JsonRejection> for JsonErrorResponse {
    fn from(value: JsonRejection) -> Self {
        JsonErrorResponse {
            parse_problem: value.body_text(),
        }
    }
}

impl IntoResponse for JsonErrorResponse {
    fn into_response(self) -> Response {
        (
            StatusCode::BAD_REQUEST,
            axum::Json(BasicErrorResponse {
                error_code: "invalid_json".into(),
                error_description:
                    "The passed request body contained malformed or unreadable JSON.".into(),
                extra_info: Some(ExtraInfo::Message(self.parse_problem)),
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_util::deserialize_body;
    use serde_json::{json, Value};
    use std::io;
    use std::path::PathBuf;

    #[tokio::test]
    async fn unknown_document_becomes_404() {
        let response = DocsErrorResponse::from(DocsError::UnknownDocument("v9".to_owned())).into_response();

        assert_eq!(StatusCode::NOT_FOUND, response.status());
        let body: Value = deserialize_body(response.into_body()).await;
        assert_eq!(json!("not_found"), body["error_code"]);
        assert_eq!(
            json!("No API documentation is registered for the \"v9\" group."),
            body["error_description"]
        );
        assert!(body["extra_info"].is_null());
    }

    #[tokio::test]
    async fn startup_failures_become_500() {
        let failure = DocsError::Filesystem {
            path: PathBuf::from("/srv/app"),
            source: io::Error::from(io::ErrorKind::PermissionDenied),
        };

        let response = DocsErrorResponse::from(failure).into_response();

        assert_eq!(StatusCode::INTERNAL_SERVER_ERROR, response.status());
        let body: Value = deserialize_body(response.into_body()).await;
        assert_eq!(json!("internal_error"), body["error_code"]);
    }
}
