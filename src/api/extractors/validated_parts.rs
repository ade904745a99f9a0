//! Path and query extractors that reject with [`AppError`].
//!
//! A malformed `:id` or `?page=` gets the same JSON error body as every
//! other client error instead of axum's plain-text rejection.

use axum::extract::FromRequestParts;

use crate::errors::AppError;

/// `Path<T>` with rejections converted to [`AppError::Validation`].
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct ValidatedPath<T>(pub T);

/// `Query<T>` with rejections converted to [`AppError::Validation`].
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct ValidatedQuery<T>(pub T);
