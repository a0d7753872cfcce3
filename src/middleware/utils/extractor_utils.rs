use axum::body::{Body, Bytes};
use axum::extract::{FromRequest, Request};
use axum::http::header::CONTENT_TYPE;
use axum::http::StatusCode;
use axum::{
    async_trait,
    response::{IntoResponse, Response},
    Form, Json, RequestExt,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::middleware::error::ErrorResponseBody;

fn error_response(status: StatusCode, message: String) -> Response {
    let body: String = ErrorResponseBody::new(message, None).into();
    (status, [(CONTENT_TYPE, "application/json")], body).into_response()
}

enum BodyKind {
    Json,
    Form,
    Empty,
}

fn body_kind(req: &Request<Body>) -> Option<BodyKind> {
    match req
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
    {
        Some(ct) if ct.starts_with("application/json") => Some(BodyKind::Json),
        Some(ct) if ct.starts_with("application/x-www-form-urlencoded") => Some(BodyKind::Form),
        Some(_) => None,
        None => Some(BodyKind::Empty),
    }
}

/// JSON or urlencoded body, validated before the handler runs.
/// A request without a body is read as `{}`, so all-optional inputs may be omitted.
#[derive(Debug)]
pub struct JsonOrFormValidated<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonOrFormValidated<T>
where
    S: Send + Sync,
    Json<T>: FromRequest<()>,
    Form<T>: FromRequest<()>,
    T: DeserializeOwned + Validate + Send + Sync + 'static,
{
    type Rejection = Response;

    async fn from_request(req: Request<Body>, _state: &S) -> Result<Self, Self::Rejection> {
        let payload: T = match body_kind(&req) {
            Some(BodyKind::Json) => {
                let Json(payload) = req.extract().await.map_err(IntoResponse::into_response)?;
                payload
            }
            Some(BodyKind::Form) => {
                let Form(payload) = req.extract().await.map_err(IntoResponse::into_response)?;
                payload
            }
            Some(BodyKind::Empty) => {
                let bytes: Bytes = req.extract().await.map_err(IntoResponse::into_response)?;
                if !bytes.is_empty() {
                    return Err(StatusCode::UNSUPPORTED_MEDIA_TYPE.into_response());
                }
                serde_json::from_slice(b"{}")
                    .map_err(|err| error_response(StatusCode::BAD_REQUEST, err.to_string()))?
            }
            None => return Err(StatusCode::UNSUPPORTED_MEDIA_TYPE.into_response()),
        };

        payload
            .validate()
            .map_err(|err| error_response(StatusCode::BAD_REQUEST, err.to_string()))?;
        Ok(Self(payload))
    }
}
