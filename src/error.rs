//! Error types shared by the transport, services and stores.

use serde::Deserialize;

/// A failed request to the Vitta API.
#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum ApiError {
    /// The request never reached the server or no response arrived.
    #[error("request failed: {0}")]
    Transport(String),

    /// The server rejected the configured credentials.
    #[error("unauthorized: check the configured credentials")]
    Unauthorized,

    /// The server answered with a non-success status.
    ///
    /// `message` is taken from the `{"error": "..."}` body when present,
    /// otherwise it holds the raw body text.
    #[error("server returned {status}: {message}")]
    Status { status: u16, message: String },

    /// The response body did not have the expected shape.
    #[error("could not decode response: {0}")]
    Decode(String),

    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// A local file could not be read for upload.
    #[error("could not read file: {0}")]
    Io(String),
}

impl ApiError {
    /// The HTTP status code, when the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Unauthorized => Some(401),
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub(crate) fn from_response_body(status: u16, body: &str) -> Self {
        if status == 401 {
            return ApiError::Unauthorized;
        }

        #[derive(Deserialize)]
        struct ErrorBody {
            error: String,
        }

        let message = match serde_json::from_str::<ErrorBody>(body) {
            Ok(parsed) => parsed.error,
            Err(_) => body.trim().to_string(),
        };

        ApiError::Status { status, message }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(value: reqwest::Error) -> Self {
        if value.is_decode() {
            ApiError::Decode(value.to_string())
        } else {
            ApiError::Transport(value.to_string())
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(value: serde_json::Error) -> Self {
        ApiError::Decode(value.to_string())
    }
}

/// Input rejected on the client before any request is made.
#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum ValidationError {
    #[error("{0} is required")]
    Required(&'static str),

    #[error("the name \"{0}\" is already in use")]
    DuplicateName(String),

    /// Only `.csv`, `.xls` and `.xlsx` files may be imported.
    #[error("\"{0}\" is not a CSV or Excel file")]
    UnsupportedFile(String),

    #[error("\"{0}\" is not a valid amount")]
    InvalidAmount(String),

    #[error("{year}-{month} is not a valid budget month")]
    InvalidPeriod { year: u16, month: u8 },

    #[error("page size must be positive")]
    InvalidPageSize,
}

/// The failure half of every store operation.
#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum StoreError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A transaction operation was attempted before an account was loaded.
    #[error("no account selected")]
    NoAccountSelected,

    /// The id is not present in the store's current collection.
    #[error("{0} is not loaded")]
    UnknownEntity(uuid::Uuid),

    #[error("could not acquire the store lock")]
    Lock,
}
