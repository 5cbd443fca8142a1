use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct Meta {
    pub status: u16,
}

/// `{ok: true, meta: {status}, data}` body shared by every successful response.
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub ok: bool,
    pub meta: Meta,
    pub data: T,
}

impl<T: Serialize> Envelope<T> {
    pub fn ok(data: T) -> Self {
        Self::with_status(StatusCode::OK, data)
    }

    pub fn created(data: T) -> Self {
        Self::with_status(StatusCode::CREATED, data)
    }

    fn with_status(status: StatusCode, data: T) -> Self {
        Self { ok: true, meta: Meta { status: status.as_u16() }, data }
    }
}

impl<T: Serialize> IntoResponse for Envelope<T> {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.meta.status).unwrap_or(StatusCode::OK);
        (status, Json(self)).into_response()
    }
}

/// `{ok: false, msg}` body; `msg` is a string or a list of field errors.
#[derive(Debug, Serialize)]
pub struct Failure {
    pub ok: bool,
    pub msg: serde_json::Value,
}

impl Failure {
    pub fn new(msg: serde_json::Value) -> Self {
        Self { ok: false, msg }
    }
}

impl IntoResponse for Failure {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}
