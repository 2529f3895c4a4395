//! Double-submit cookie CSRF protection.
//!
//! Every response to a client without an `XSRF-TOKEN` cookie carries a fresh
//! one. State-changing requests must echo that value in the `X-XSRF-TOKEN`
//! header; the cookie is readable by scripts so a same-origin frontend can do so.

use crate::error::AppError;
use axum::{
    extract::Request,
    http::{header, HeaderValue, Method},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use subtle::ConstantTimeEq;
use uuid::Uuid;

pub const CSRF_COOKIE: &str = "XSRF-TOKEN";
pub const CSRF_HEADER: &str = "x-xsrf-token";

fn is_safe_method(method: &Method) -> bool {
    matches!(
        *method,
        Method::GET | Method::HEAD | Method::OPTIONS | Method::TRACE
    )
}

pub async fn csrf_middleware(req: Request, next: Next) -> Response {
    let jar = CookieJar::from_headers(req.headers());
    let cookie_token = jar
        .get(CSRF_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .filter(|value| !value.is_empty());

    if !is_safe_method(req.method()) {
        let header_token = req
            .headers()
            .get(CSRF_HEADER)
            .and_then(|value| value.to_str().ok());

        let valid = match (cookie_token.as_deref(), header_token) {
            (Some(expected), Some(presented)) => {
                expected.as_bytes().ct_eq(presented.as_bytes()).into()
            }
            _ => false,
        };

        if !valid {
            tracing::warn!(
                method = %req.method(),
                path = %req.uri().path(),
                "Rejected request with missing or mismatched CSRF token"
            );
            return AppError::forbidden("Invalid CSRF token").into_response();
        }
    }

    let mut response = next.run(req).await;

    if cookie_token.is_none() {
        let cookie = Cookie::build((CSRF_COOKIE, Uuid::new_v4().to_string()))
            .path("/")
            .same_site(SameSite::Lax)
            .build();

        if let Ok(value) = HeaderValue::from_str(&cookie.to_string()) {
            response.headers_mut().append(header::SET_COOKIE, value);
        }
    }

    response
}
