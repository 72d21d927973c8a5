use std::fmt::{Debug, Display};
use std::io::Error as IoError;

use actix_web::error::{JsonPayloadError, PathError, QueryPayloadError, UrlencodedError};
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use derivative::Derivative;
use mongodb::error::Error as DatabaseError;
use serde::{Serialize, Serializer};

#[derive(Debug, Serialize, Derivative)]
#[derivative(PartialEq, Eq)]
#[serde(untagged)]
pub enum Error {
    // 400
    #[serde(serialize_with = "display")]
    InvalidJson(#[derivative(PartialEq = "ignore")] JsonPayloadError),
    #[serde(serialize_with = "display")]
    InvalidPath(#[derivative(PartialEq = "ignore")] PathError),
    #[serde(serialize_with = "display")]
    InvalidForm(#[derivative(PartialEq = "ignore")] UrlencodedError),
    #[serde(serialize_with = "display")]
    InvalidQuery(#[derivative(PartialEq = "ignore")] QueryPayloadError),
    InvalidIdentifier {
        id: String,
    },
    MissingField {
        field: &'static str,
    },

    // 404
    PathDoesNotExist,

    // 500
    NotConfigured,
    ConnectionFailed {
        reason: String,
    },
    StoreUnavailable(Box<Error>),
    #[serde(serialize_with = "display")]
    StoreOperationFailed(#[derivative(PartialEq = "ignore")] DatabaseError),
    #[serde(serialize_with = "display")]
    IoError(#[derivative(PartialEq = "ignore")] IoError),
}

impl Error {
    pub fn error_code(&self) -> &'static str {
        match self {
            Error::InvalidJson(_) => "E4001000",
            Error::InvalidPath(_) => "E4001001",
            Error::InvalidForm(_) => "E4001002",
            Error::InvalidQuery(_) => "E4001003",
            Error::InvalidIdentifier { .. } => "E4001004",
            Error::MissingField { .. } => "E4001005",
            Error::PathDoesNotExist => "E4041000",
            Error::NotConfigured => "E5001000",
            Error::ConnectionFailed { .. } => "E5001001",
            Error::StoreUnavailable(_) => "E5001002",
            Error::StoreOperationFailed(_) => "E5001003",
            Error::IoError(_) => "E5001004",
        }
    }

    pub fn error_message(&self) -> &'static str {
        match self {
            Error::InvalidJson(_) => "The given json could not be parsed",
            Error::InvalidPath(_) => "The given path could not be parsed",
            Error::InvalidForm(_) => "The given form could not be parsed",
            Error::InvalidQuery(_) => "The given query could not be parsed",
            Error::InvalidIdentifier { .. } => "The given campaign id is not well-formed",
            Error::MissingField { .. } => "A required field was left empty",
            Error::PathDoesNotExist => "The requested path does not exist",
            Error::NotConfigured => "No database connection string has been configured",
            Error::ConnectionFailed { .. } => "The database could not be reached",
            Error::StoreUnavailable(_) => "The campaign store is unavailable",
            Error::StoreOperationFailed(_) => {
                "An error occurred when communicating with the database"
            }
            Error::IoError(_) => "An error occurred during an I/O operation",
        }
    }

    /// Message for the inline warnings of the dashboard, including the
    /// underlying cause where one is known.
    pub fn describe(&self) -> String {
        match self {
            Error::InvalidIdentifier { id } => format!("{}: {:?}", self.error_message(), id),
            Error::MissingField { field } => format!("{}: {}", self.error_message(), field),
            Error::ConnectionFailed { reason } => format!("{}: {}", self.error_message(), reason),
            Error::StoreUnavailable(cause) => {
                format!("{} ({})", self.error_message(), cause.describe())
            }
            Error::StoreOperationFailed(err) => format!("{}: {}", self.error_message(), err),
            _ => self.error_message().to_string(),
        }
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Error::InvalidJson(_) => StatusCode::BAD_REQUEST,
            Error::InvalidPath(_) => StatusCode::BAD_REQUEST,
            Error::InvalidForm(_) => StatusCode::BAD_REQUEST,
            Error::InvalidQuery(_) => StatusCode::BAD_REQUEST,
            Error::InvalidIdentifier { .. } => StatusCode::BAD_REQUEST,
            Error::MissingField { .. } => StatusCode::BAD_REQUEST,
            Error::PathDoesNotExist => StatusCode::NOT_FOUND,
            Error::NotConfigured => StatusCode::INTERNAL_SERVER_ERROR,
            Error::ConnectionFailed { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Error::StoreUnavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Error::StoreOperationFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Error::IoError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        #[derive(Serialize)]
        struct Dummy<'a> {
            error_code: &'static str,
            error_message: &'static str,
            error_meta: &'a Error,
        }

        HttpResponse::build(self.status_code()).json(&Dummy {
            error_code: self.error_code(),
            error_message: self.error_message(),
            error_meta: self,
        })
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> Result<(), std::fmt::Error> {
        Debug::fmt(self, f)
    }
}

impl From<DatabaseError> for Error {
    fn from(error: DatabaseError) -> Error {
        Error::StoreOperationFailed(error)
    }
}

impl From<IoError> for Error {
    fn from(error: IoError) -> Error {
        Error::IoError(error)
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::InvalidJson(err) => Some(err),
            Error::InvalidPath(err) => Some(err),
            Error::InvalidForm(err) => Some(err),
            Error::InvalidQuery(err) => Some(err),
            Error::StoreUnavailable(err) => Some(err.as_ref()),
            Error::StoreOperationFailed(err) => Some(err),
            Error::IoError(err) => Some(err),
            _ => None,
        }
    }
}

fn display<T, S>(value: &T, serializer: S) -> Result<S::Ok, S::Error>
where
    T: Display,
    S: Serializer,
{
    serializer.collect_str(value)
}
