//! Request extractors whose rejections render as [`AppError`] JSON.

use axum::extract::FromRequest;

use crate::error::AppError;

/// [`axum::Json`] body extractor. Malformed or mistyped bodies are reported
/// through [`AppError::JsonBody`] instead of axum's plain-text rejection.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct JsonBody<T>(pub T);
