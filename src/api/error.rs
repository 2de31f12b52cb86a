use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use std::borrow::Cow;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Bad Request: {0}")]
    BadRequest(Cow<'static, str>),
    #[error("Not Found: {0}")]
    NotFound(Cow<'static, str>),
    #[error("Method not allowed")]
    MethodNotAllowed,
    #[error("Conflict: {0}")]
    Conflict(Cow<'static, str>),
    #[error("Internal Server Error")]
    InternalServer,
}

/// Failure envelope shared by every endpoint: `{"success": false, "error": "..."}`.
#[derive(serde::Serialize, serde::Deserialize, Debug)]
pub struct ErrorBody {
    pub success: bool,
    pub error: Cow<'static, str>,
}

impl Error {
    pub fn bad_request(msg: impl Into<Cow<'static, str>>) -> Self {
        Self::BadRequest(msg.into())
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        match *self {
            Error::BadRequest(_) => StatusCode::BAD_REQUEST,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Error::Conflict(_) => StatusCode::CONFLICT,
            Error::InternalServer => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message: Cow<'static, str> = match self {
            Error::NotFound(msg) | Error::Conflict(msg) | Error::BadRequest(msg) => msg.clone(),
            Error::MethodNotAllowed => "Method not allowed".into(),
            Error::InternalServer => "Internal Server Error".into(),
        };

        HttpResponse::build(self.status_code()).json(ErrorBody { success: false, error: message })
    }
}

#[derive(thiserror::Error, Debug)]
pub enum SystemError {
    // sqlx errors
    #[error("Database Error : {0}")]
    DatabaseError(Cow<'static, str>),
    // serde errors
    #[error("JSON Serialization/Deserialization Error")]
    JsonError(#[from] serde_json::Error),
    // Custom Errors
    #[error("Not Found: {0}")]
    NotFound(Cow<'static, str>),
    #[error("Conflict: {0}")]
    Conflict(Cow<'static, str>),
    #[error("Internal System Error: {0}")]
    InternalError(Box<dyn std::error::Error + Send + Sync>),
}

impl From<SystemError> for Error {
    fn from(value: SystemError) -> Self {
        match value {
            SystemError::NotFound(msg) => Error::NotFound(msg),
            SystemError::Conflict(msg) => Error::Conflict(msg),
            _ => {
                log::error!("Internal Server Error: {:?}", value);
                Error::InternalServer
            }
        }
    }
}

impl From<sqlx::Error> for SystemError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::RowNotFound = err {
            return SystemError::NotFound("Resource not found".into());
        }
        if let sqlx::Error::Database(db_err) = &err {
            return match db_err.code().as_deref() {
                Some("23505") => {
                    log::warn!(
                        "Unique violation on {:?}: {}",
                        db_err.constraint(),
                        db_err.message()
                    );
                    SystemError::Conflict("Application already exists".into())
                }
                _ => {
                    log::error!("Unhandled DB error: {:?}", db_err);
                    SystemError::DatabaseError(db_err.message().to_string().into())
                }
            };
        }
        log::error!("{:?}", err);
        SystemError::InternalError(Box::new(err))
    }
}

impl SystemError {
    pub fn not_found(msg: impl Into<Cow<'static, str>>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn conflict(msg: impl Into<Cow<'static, str>>) -> Self {
        Self::Conflict(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::MessageBody;

    #[test]
    fn test_system_error_maps_to_http_status() {
        let err: Error = SystemError::not_found("Application not found").into();
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);

        let err: Error = SystemError::conflict("Application already exists").into();
        assert_eq!(err.status_code(), StatusCode::CONFLICT);

        let err: Error = SystemError::DatabaseError("connection reset".into()).into();
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_error_response_carries_success_false() {
        let response = Error::bad_request("Missing application ID").error_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let bytes = response.into_body().try_into_bytes().unwrap();
        let body: ErrorBody = serde_json::from_slice(&bytes).unwrap();
        assert!(!body.success);
        assert_eq!(body.error, "Missing application ID");
    }

    #[test]
    fn test_internal_error_hides_details() {
        let err: Error = SystemError::InternalError("pool exhausted".into()).into();
        let bytes = err.error_response().into_body().try_into_bytes().unwrap();
        let body: ErrorBody = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body.error, "Internal Server Error");
    }
}
