//! Session cookie middleware.
//!
//! Every request gets a [`SessionId`] in its extensions. The id is read from
//! the `todo_lists_session` cookie; when the cookie is missing or unreadable a
//! fresh id is minted and sent back with `Set-Cookie`.

use axum::{
    body::Body,
    http::{header, HeaderMap, HeaderValue, Request},
    middleware::Next,
    response::Response,
};

use crate::store::SessionId;

pub const SESSION_COOKIE: &str = "todo_lists_session";

/// Find the session id in the request's `Cookie` headers.
pub fn session_from_headers(headers: &HeaderMap) -> Option<SessionId> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .and_then(|(_, value)| value.parse().ok())
}

pub async fn session_middleware(mut request: Request<Body>, next: Next) -> Response {
    let existing = session_from_headers(request.headers());
    let session = existing.unwrap_or_default();
    request.extensions_mut().insert(session);

    let mut response = next.run(request).await;

    if existing.is_none() {
        let cookie = format!("{SESSION_COOKIE}={session}; Path=/; HttpOnly; SameSite=Lax");
        match HeaderValue::from_str(&cookie) {
            Ok(value) => {
                response.headers_mut().append(header::SET_COOKIE, value);
            }
            Err(e) => tracing::warn!("Could not encode session cookie: {}", e),
        }
    }

    response
}
