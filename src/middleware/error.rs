use std::fmt;

use axum::{http::StatusCode, response::IntoResponse};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::ValidationErrors;

use crate::middleware::ctx::Ctx;

#[derive(Debug, PartialEq, Clone)]
pub struct CtxError {
    pub error: AppError,
    pub req_id: Uuid,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum AppError {
    Generic { description: String },
    AuthenticationFail,
    AuthFailNoJwtCookie,
    AuthFailJwtInvalid { source: String },
    AuthorizationFail { required: String },
    Forbidden,
    EntityFailIdNotFound { ident: String },
    UserBanned,
    EmailTaken,
    InvalidReferralCode,
    BalanceTooLow,
    PaymentMethodDisabled { method: String },
    InvalidStatusTransition { from: String, to: String },
    WithdrawalInProgress,
    CurrencyNotFound { code: String },
    CurrencyDisabled { code: String },
    CurrencyLocked { code: String },
    InvalidRate,
    TaskInactive,
    PayoutFailed { description: String },
    RateProvider { source: String },
    Serde { source: String },
    Validation { source: String },
}

/// Error carried to the HTTP response, tagged with the request id reported to the client.
pub type CtxResult<T> = core::result::Result<T, CtxError>;
/// Any error produced before a response is composed.
pub type AppResult<T> = core::result::Result<T, AppError>;

impl std::error::Error for AppError {}

impl CtxError {
    pub fn from<T: Into<AppError>>(ctx: &Ctx) -> impl FnOnce(T) -> CtxError + '_ {
        |err| CtxError {
            req_id: ctx.req_id(),
            error: err.into(),
        }
    }
}

impl From<AppError> for CtxError {
    fn from(value: AppError) -> Self {
        CtxError {
            req_id: Uuid::new_v4(),
            error: value,
        }
    }
}

const INTERNAL: &str = "Internal error";

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Generic { description } => write!(f, "{description}"),
            Self::AuthenticationFail => write!(f, "Authentication failed"),
            Self::AuthFailNoJwtCookie => write!(f, "You are not logged in"),
            Self::AuthFailJwtInvalid { .. } => write!(f, "The provided JWT token is not valid"),
            Self::AuthorizationFail { required } => write!(f, "Not authorized: {required}"),
            Self::Forbidden => write!(f, "Forbidden"),
            Self::EntityFailIdNotFound { ident } => write!(f, "Record id= {ident} not found"),
            Self::UserBanned => write!(f, "Your account has been banned"),
            Self::EmailTaken => write!(f, "Email is already registered"),
            Self::InvalidReferralCode => write!(f, "Referral code is not valid"),
            Self::BalanceTooLow => write!(f, "Balance is too low"),
            Self::PaymentMethodDisabled { method } => {
                write!(f, "Payment method {method} is disabled")
            }
            Self::InvalidStatusTransition { from, to } => {
                write!(f, "Withdrawal can not change from {from} to {to}")
            }
            Self::WithdrawalInProgress => write!(f, "Withdrawal is already being processed"),
            Self::CurrencyNotFound { code } => write!(f, "Currency {code} not found"),
            Self::CurrencyDisabled { code } => write!(f, "Currency {code} is disabled"),
            Self::CurrencyLocked { code } => write!(f, "Currency {code} can not be changed"),
            Self::InvalidRate => write!(f, "Exchange rate must be greater than 0"),
            Self::TaskInactive => write!(f, "Task is not active"),
            Self::PayoutFailed { description } => write!(f, "{description}"),
            Self::RateProvider { .. } => write!(f, "Failed to update exchange rates"),
            Self::Serde { source } => write!(f, "Serde error - {source}"),
            Self::Validation { source } => write!(f, "{source}"),
        }
    }
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::EntityFailIdNotFound { .. } | AppError::CurrencyNotFound { .. } => {
                StatusCode::NOT_FOUND
            }
            AppError::AuthenticationFail
            | AppError::AuthFailNoJwtCookie
            | AppError::AuthFailJwtInvalid { .. } => StatusCode::UNAUTHORIZED,
            AppError::AuthorizationFail { .. } | AppError::Forbidden | AppError::UserBanned => {
                StatusCode::FORBIDDEN
            }
            AppError::InvalidStatusTransition { .. }
            | AppError::WithdrawalInProgress
            | AppError::EmailTaken => StatusCode::CONFLICT,
            AppError::PayoutFailed { .. } | AppError::RateProvider { .. } => {
                StatusCode::BAD_GATEWAY
            }
            AppError::Generic { .. }
            | AppError::InvalidReferralCode
            | AppError::BalanceTooLow
            | AppError::PaymentMethodDisabled { .. }
            | AppError::CurrencyDisabled { .. }
            | AppError::CurrencyLocked { .. }
            | AppError::InvalidRate
            | AppError::TaskInactive
            | AppError::Serde { .. }
            | AppError::Validation { .. } => StatusCode::BAD_REQUEST,
        }
    }
}

#[derive(Serialize, Deserialize, Debug)]
pub struct ErrorResponseBody {
    error: String,
    req_id: String,
}

impl ErrorResponseBody {
    pub fn new(error: String, req_id: Option<String>) -> Self {
        ErrorResponseBody {
            error,
            req_id: req_id.unwrap_or_else(|| Uuid::new_v4().to_string()),
        }
    }

    pub fn get_err(&self) -> String {
        self.error.clone()
    }
}

impl From<ErrorResponseBody> for String {
    fn from(value: ErrorResponseBody) -> Self {
        serde_json::to_string(&value).unwrap_or_else(|_| format!("{{\"error\":\"{INTERNAL}\"}}"))
    }
}

// REST error response
impl IntoResponse for CtxError {
    fn into_response(self) -> axum::response::Response {
        tracing::debug!("->> {:<12} - into_response - {self:?}", "ERROR");
        let status_code = self.error.status_code();
        let err = self.error.clone();
        let body: String =
            ErrorResponseBody::new(self.error.to_string(), Some(self.req_id.to_string())).into();
        let mut response = (
            status_code,
            [(axum::http::header::CONTENT_TYPE, "application/json")],
            body,
        )
            .into_response();
        // Insert the real Error into the response - for the logger
        response.extensions_mut().insert(err);
        response
    }
}

// External Errors
impl From<serde_json::Error> for AppError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serde {
            source: value.to_string(),
        }
    }
}

impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(value: jsonwebtoken::errors::Error) -> Self {
        Self::AuthFailJwtInvalid {
            source: value.to_string(),
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation {
            source: value.to_string(),
        }
    }
}

impl From<ValidationErrors> for CtxError {
    fn from(value: ValidationErrors) -> Self {
        AppError::from(value).into()
    }
}

impl From<reqwest::Error> for AppError {
    fn from(value: reqwest::Error) -> Self {
        Self::RateProvider {
            source: value.to_string(),
        }
    }
}

impl From<CtxError> for AppError {
    fn from(value: CtxError) -> Self {
        value.error
    }
}
