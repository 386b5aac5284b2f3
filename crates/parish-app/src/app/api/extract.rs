//! Request decoding shared by the resource handlers. Every failure here is the
//! caller's fault and surfaces as a 400.

use parish_core::config::PaginationConfig;
use parish_core::page::{Page, PageParams};
use salvo::{Depot, Request};
use serde::de::DeserializeOwned;

use crate::config::pagination_from_depot;
use crate::error::{AppError, AppResult};

/// ## Errors
/// Returns `AppError::BadRequest` if the path segment is missing or not an integer.
pub fn path_id(req: &Request, name: &str) -> AppResult<i64> {
    req.param::<i64>(name)
        .ok_or_else(|| AppError::BadRequest(format!("path parameter `{name}` must be an integer")))
}

/// ## Errors
/// Returns `AppError::BadRequest` if the path segment is missing.
pub fn path_text(req: &Request, name: &str) -> AppResult<String> {
    req.param::<String>(name)
        .ok_or_else(|| AppError::BadRequest(format!("path parameter `{name}` is required")))
}

/// ## Summary
/// Decodes the JSON body. Payload types reject unknown fields, so a typo in a
/// field name is reported instead of silently ignored.
///
/// ## Errors
/// Returns `AppError::BadRequest` for a missing content type, malformed JSON,
/// a missing required field or an unknown field.
pub async fn json_body<T: DeserializeOwned>(req: &mut Request) -> AppResult<T> {
    req.parse_json::<T>()
        .await
        .map_err(|err| AppError::BadRequest(err.to_string()))
}

/// ## Errors
/// Returns `AppError::BadRequest` if a query value cannot be decoded into `T`.
pub fn query<T: DeserializeOwned>(req: &mut Request) -> AppResult<T> {
    req.parse_queries::<T>()
        .map_err(|err| AppError::BadRequest(err.to_string()))
}

/// ## Errors
/// Returns `AppError::BadRequest` if the query parameter is absent or malformed.
pub fn required_query<T: DeserializeOwned>(req: &Request, name: &str) -> AppResult<T> {
    req.query::<T>(name).ok_or_else(|| {
        AppError::BadRequest(format!("query parameter `{name}` is required"))
    })
}

/// ## Summary
/// Reads `skip`/`limit` and resolves them against the configured bounds.
///
/// ## Errors
/// Returns a validation error for a negative `skip` or a `limit` out of bounds.
pub fn page(req: &mut Request, depot: &Depot) -> AppResult<Page> {
    resolve_page(req, pagination_from_depot(depot))
}

/// ## Summary
/// Like [`page`], with a resource-specific default `limit`.
///
/// ## Errors
/// Returns a validation error for a negative `skip` or a `limit` out of bounds.
pub fn page_with_default(req: &mut Request, depot: &Depot, default_limit: u32) -> AppResult<Page> {
    let bounds = pagination_from_depot(depot);
    resolve_page(
        req,
        PaginationConfig {
            default_limit: default_limit.min(bounds.max_limit),
            ..bounds
        },
    )
}

fn resolve_page(req: &mut Request, bounds: PaginationConfig) -> AppResult<Page> {
    let params: PageParams = query(req)?;
    Ok(params.resolve(bounds)?)
}
