//! Middleware that only lets requests with a live session through.

use axum::{
    extract::{FromRef, FromRequestParts, Request, State},
    http::{StatusCode, header::SET_COOKIE},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};
use axum_htmx::HxRedirect;
use time::Duration;

use crate::{
    AppState,
    auth::{
        cookie::{
            DEFAULT_COOKIE_DURATION, extend_auth_cookie_duration_if_needed,
            get_token_from_cookies,
        },
        redirect::log_in_url_for_request,
    },
    timezone::get_local_offset,
};

/// The state needed for the auth middleware
#[derive(Clone)]
pub struct AuthState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
    /// The duration for which cookies used for authentication are valid.
    pub cookie_duration: Duration,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for AuthState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            cookie_duration: state.cookie_duration,
            local_timezone: state.local_timezone.clone(),
        }
    }
}

impl FromRef<AuthState> for Key {
    fn from_ref(state: &AuthState) -> Self {
        state.cookie_key.clone()
    }
}

async fn guard(
    state: AuthState,
    request: Request,
    next: Next,
    redirect: impl Fn(&str) -> Response,
) -> Response {
    let log_in_url = log_in_url_for_request(&request);

    let Some(local_offset) = get_local_offset(&state.local_timezone) else {
        tracing::error!(
            "Invalid timezone {}. Redirecting to log in page.",
            state.local_timezone
        );
        return redirect(&log_in_url);
    };

    let (mut parts, body) = request.into_parts();
    let jar = match PrivateCookieJar::from_request_parts(&mut parts, &state).await {
        Ok(jar) => jar,
        Err(error) => {
            tracing::error!("Error getting cookie jar: {error:?}. Redirecting to log in page.");
            return redirect(&log_in_url);
        }
    };
    let user_id = match get_token_from_cookies(&jar) {
        Ok(token) => token.user_id,
        Err(error) => {
            tracing::debug!("Rejected request to {}: {error}", parts.uri);
            return redirect(&log_in_url);
        }
    };

    parts.extensions.insert(user_id);
    let response = next.run(Request::from_parts(parts, body)).await;

    // Activity keeps the session alive.
    let (mut parts, body) = response.into_parts();
    let jar = extend_auth_cookie_duration_if_needed(
        jar.clone(),
        DEFAULT_COOKIE_DURATION,
        local_offset,
    )
    .unwrap_or_else(|error| {
        tracing::error!("Could not extend session: {error}. Keeping the old cookie.");
        jar
    });

    for value in jar.into_response().headers().get_all(SET_COOKIE) {
        parts.headers.append(SET_COOKIE, value.to_owned());
    }

    Response::from_parts(parts, body)
}

/// Reject requests without a live session by redirecting to the log-in page.
///
/// Handlers behind this guard can take `Extension(user_id): Extension<UserID>`.
pub async fn auth_guard(State(state): State<AuthState>, request: Request, next: Next) -> Response {
    guard(state, request, next, |url| Redirect::to(url).into_response()).await
}

/// Like [auth_guard], but redirects with an `HX-Redirect` header for htmx requests.
pub async fn auth_guard_hx(
    State(state): State<AuthState>,
    request: Request,
    next: Next,
) -> Response {
    guard(state, request, next, |url| {
        (HxRedirect(url.to_owned()), StatusCode::OK).into_response()
    })
    .await
}
