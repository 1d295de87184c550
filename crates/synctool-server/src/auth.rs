use crate::error::ApiError;
use axum::{
    extract::Request,
    http::header,
    middleware::Next,
    response::{IntoResponse, Response},
};
use base64::{engine::general_purpose::STANDARD, Engine};
use tracing::debug;

/// Splits a `Basic` authorization header into its credential halves.
///
/// Malformed input (missing header, bad base64, no `:` separator) yields
/// `(None, None)` rather than an error; the caller treats it as a failed
/// authentication.
pub fn decode_header(key: Option<&str>) -> (Option<String>, Option<String>) {
    let auth = key.unwrap_or("").trim();
    let auth = auth.strip_prefix("Basic ").unwrap_or(auth);

    let decoded = match STANDARD.decode(auth) {
        Ok(bytes) => match String::from_utf8(bytes) {
            Ok(s) => s,
            Err(_) => return (None, None),
        },
        Err(_) => return (None, None),
    };

    match decoded.split_once(':') {
        Some((user, pass)) => (Some(user.to_string()), Some(pass.to_string())),
        None => (None, None),
    }
}

/// Token check applied to every feed route.
///
/// The token may ride in either half of the credentials; the username
/// wins when it is non-empty.
pub async fn require_token(token: &str, request: Request, next: Next) -> Response {
    let header_value = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    let (username, password) = decode_header(header_value);
    let candidate = username.filter(|u| !u.is_empty()).or(password);

    if candidate.as_deref() != Some(token) {
        debug!("rejected feed request with bad or missing token");
        return ApiError::Unauthorized.into_response();
    }

    next.run(request).await
}

/// Builds the header value a client sends for `token`.
pub fn encode_header(token: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{}:", token)))
}
