use axum::{
    http::StatusCode,
    response::{IntoResponse, Redirect},
    Json,
};

use crate::JsonResponse;

#[derive(Debug)]
pub enum RequestError {
    NotFound,
    /// The route requires authentication; the payload is the path the caller
    /// originally asked for, carried into the login redirect as `next`.
    LoginRequired(String),
    Validation(Vec<String>),
    ServerError,
    DatabaseError(sqlx::Error),
}

#[derive(serde::Serialize)]
pub struct RequestErrorJsonWrapper {
    errors: RequestErrorJson,
}

#[derive(serde::Serialize)]
pub struct RequestErrorJson {
    body: Vec<String>,
}

impl RequestErrorJsonWrapper {
    pub fn new(error: &str) -> RequestErrorJsonWrapper {
        RequestErrorJsonWrapper {
            errors: RequestErrorJson {
                body: vec![error.to_string()],
            },
        }
    }

    pub fn from_messages(messages: Vec<String>) -> RequestErrorJsonWrapper {
        RequestErrorJsonWrapper {
            errors: RequestErrorJson { body: messages },
        }
    }
}

impl From<sqlx::Error> for RequestError {
    fn from(value: sqlx::Error) -> Self {
        Self::DatabaseError(value)
    }
}

impl IntoResponse for RequestError {
    fn into_response(self) -> axum::response::Response {
        match self {
            RequestError::LoginRequired(next) => {
                Redirect::to(&format!("/users/login?next={}", next)).into_response()
            }
            other => other.to_json_response().into_response(),
        }
    }
}

impl RequestError {
    pub fn to_json_response(&self) -> JsonResponse<RequestErrorJsonWrapper> {
        let (status_code, json) = match self {
            RequestError::NotFound => (
                StatusCode::NOT_FOUND,
                RequestErrorJsonWrapper::new("Not Found"),
            ),
            RequestError::LoginRequired(_) => (
                StatusCode::UNAUTHORIZED,
                RequestErrorJsonWrapper::new("Authentication required"),
            ),
            RequestError::Validation(messages) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                RequestErrorJsonWrapper::from_messages(messages.clone()),
            ),
            RequestError::ServerError => (
                StatusCode::INTERNAL_SERVER_ERROR,
                RequestErrorJsonWrapper::new("Internal Server Error"),
            ),
            RequestError::DatabaseError(e) => {
                tracing::error!("database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    RequestErrorJsonWrapper::new("Internal Server Error"),
                )
            }
        };
        (status_code, Json(json))
    }
}
