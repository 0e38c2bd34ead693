use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse,
};
use ambassador_engine::{AmbassadorApiError, CatalogApiError, SettlementError, UserApiError};
use log::error;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Could not initialize server. {0}")]
    InitializeError(String),
    #[error("An error occurred on the backend of the server. {0}")]
    BackendError(String),
    #[error("Invalid request. {0}")]
    InvalidRequest(String),
    #[error("The data was not found. {0}")]
    NoRecordFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("The payment provider returned an error. {0}")]
    PaymentProviderError(String),
    #[error("Authentication Error. {0}")]
    AuthenticationError(String),
    #[error("An I/O error happened in the server. {0}")]
    IOError(#[from] std::io::Error),
    #[error("UnspecifiedError. {0}")]
    Unspecified(String),
}

impl ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::NoRecordFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::PaymentProviderError(_) => StatusCode::BAD_GATEWAY,
            Self::AuthenticationError(_) => StatusCode::UNAUTHORIZED,
            Self::InitializeError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BackendError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::IOError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unspecified(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            error!("💻️ {self}");
        }
        HttpResponse::build(status)
            .insert_header(ContentType::json())
            .body(serde_json::json!({ "error": self.to_string() }).to_string())
    }
}

impl From<SettlementError> for ServerError {
    fn from(e: SettlementError) -> Self {
        match e {
            SettlementError::MissingField(_) |
            SettlementError::EmptyOrder |
            SettlementError::InvalidQuantity { .. } |
            SettlementError::MissingSource => Self::InvalidRequest(e.to_string()),
            SettlementError::InvalidLink(_) | SettlementError::InvalidProduct(_) | SettlementError::OrderNotFound(_) => {
                Self::NoRecordFound(e.to_string())
            },
            SettlementError::ProviderError(_) => Self::PaymentProviderError(e.to_string()),
            SettlementError::UserLookupFailed(_) | SettlementError::PersistenceError(_) => {
                Self::BackendError(e.to_string())
            },
        }
    }
}

impl From<AmbassadorApiError> for ServerError {
    fn from(e: AmbassadorApiError) -> Self {
        match e {
            AmbassadorApiError::AmbassadorNotFound(_) => Self::NoRecordFound(e.to_string()),
            AmbassadorApiError::DatabaseError(_) | AmbassadorApiError::CacheError(_) => {
                Self::BackendError(e.to_string())
            },
        }
    }
}

impl From<UserApiError> for ServerError {
    fn from(e: UserApiError) -> Self {
        match e {
            UserApiError::MissingField(_) => Self::InvalidRequest(e.to_string()),
            UserApiError::EmailAlreadyRegistered(_) => Self::Conflict(e.to_string()),
            UserApiError::UserNotFound(_) => Self::NoRecordFound(e.to_string()),
            UserApiError::DatabaseError(_) => Self::BackendError(e.to_string()),
        }
    }
}

impl From<CatalogApiError> for ServerError {
    fn from(e: CatalogApiError) -> Self {
        match e {
            CatalogApiError::InvalidProduct(_) => Self::InvalidRequest(e.to_string()),
            CatalogApiError::ProductNotFound(_) => Self::NoRecordFound(e.to_string()),
            CatalogApiError::DatabaseError(_) => Self::BackendError(e.to_string()),
        }
    }
}
