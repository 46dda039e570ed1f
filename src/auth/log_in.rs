//! The log-in page and the handler for log-in requests.

use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use time::Duration;

use crate::{
    AppState, Error,
    app_state::create_cookie_key,
    auth::{
        cookie::{DEFAULT_COOKIE_DURATION, invalidate_auth_cookie, set_auth_cookie},
        redirect::normalize_redirect_url,
        user::get_user_by_username,
    },
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, LINK_STYLE, base, loading_spinner, log_in_register, password_input,
        username_input,
    },
    timezone::get_local_offset,
};

/// How long a session lasts when the user ticks "remember me".
const REMEMBER_ME_COOKIE_DURATION: Duration = Duration::days(7);

/// Shown for an unknown username and for a wrong password alike.
pub const INVALID_CREDENTIALS_ERROR_MSG: &str = "Incorrect username or password.";

const INTERNAL_ERROR_MSG: &str = "An internal error occurred. Please try again later.";

fn log_in_form(username: &str, error_message: Option<&str>, redirect_url: Option<&str>) -> Markup {
    html! {
        form
            hx-post=(endpoints::LOG_IN_API)
            hx-indicator="#indicator"
            hx-disabled-elt="#username, #password, #submit-button"
            class="space-y-4 md:space-y-6"
        {
            @if let Some(redirect_url) = redirect_url {
                input type="hidden" name="redirect_url" value=(redirect_url);
            }

            (username_input(username, None))
            (password_input("", 0, error_message))

            div class="flex items-center gap-x-3"
            {
                input
                    type="checkbox"
                    name="remember_me"
                    id="remember_me"
                    tabindex="0"
                    class="rounded-xs";

                label
                    for="remember_me"
                    class="block text-sm font-medium text-gray-900 dark:text-white"
                {
                    "Keep me logged in for one week"
                }
            }

            button type="submit" id="submit-button" tabindex="0" class=(BUTTON_PRIMARY_STYLE)
            {
                span class="inline htmx-indicator" id="indicator" { (loading_spinner()) }
                "Log in"
            }

            p class="text-sm font-light text-gray-500 dark:text-gray-400"
            {
                "Don't have an account? "
                a href=(endpoints::REGISTER_VIEW) tabindex="0" class=(LINK_STYLE) { "Register here" }
            }
        }
    }
}

fn parse_redirect_url(raw_url: Option<&str>) -> Option<String> {
    let raw_url = raw_url?;
    let redirect_url = normalize_redirect_url(raw_url);

    if redirect_url.is_none() {
        tracing::warn!("Ignoring invalid redirect URL: {raw_url}");
    }

    redirect_url
}

/// The query string of the log-in page.
#[derive(Deserialize)]
pub struct RedirectQuery {
    /// The page to open after logging in.
    pub redirect_url: Option<String>,
}

/// Display the log-in page.
pub async fn get_log_in_page(Query(query): Query<RedirectQuery>) -> Response {
    let redirect_url = parse_redirect_url(query.redirect_url.as_deref());
    let form = log_in_form("", None, redirect_url.as_deref());
    let content = log_in_register("Log in to your account", &form);

    base("Log In", &[], &content).into_response()
}

/// The state needed to perform a login.
#[derive(Debug, Clone)]
pub struct LoginState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
    /// The duration for which cookies used for authentication are valid.
    pub cookie_duration: Duration,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
    /// The database holding registered users.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl LoginState {
    /// Create the cookie key from a string and set the default cookie duration.
    pub fn new(
        cookie_secret: &str,
        local_timezone: &str,
        db_connection: Arc<Mutex<Connection>>,
    ) -> Self {
        Self {
            cookie_key: create_cookie_key(cookie_secret),
            cookie_duration: DEFAULT_COOKIE_DURATION,
            local_timezone: local_timezone.to_owned(),
            db_connection,
        }
    }
}

impl FromRef<AppState> for LoginState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            cookie_duration: state.cookie_duration,
            local_timezone: state.local_timezone.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

impl FromRef<LoginState> for Key {
    fn from_ref(state: &LoginState) -> Self {
        state.cookie_key.clone()
    }
}

/// The fields of the log-in form.
///
/// The password is checked against the stored hash, so it is not validated here.
#[derive(Clone, Serialize, Deserialize)]
pub struct LogInData {
    /// The name the user registered with.
    pub username: String,

    /// Password entered during log-in.
    pub password: String,

    /// Set to any value when the "remember me" checkbox is ticked.
    pub remember_me: Option<String>,

    /// The page to open after logging in.
    pub redirect_url: Option<String>,
}

fn check_credentials(state: &LoginState, user_data: &LogInData) -> Result<crate::User, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let user = match get_user_by_username(&user_data.username, &connection) {
        Ok(user) => user,
        Err(Error::NotFound) => return Err(Error::InvalidCredentials),
        Err(error) => return Err(error),
    };

    if user.password_hash.verify(&user_data.password)? {
        Ok(user)
    } else {
        Err(Error::InvalidCredentials)
    }
}

/// Handler for log-in requests via the POST method.
///
/// On success the auth cookie is set and the client is redirected to the
/// requested page, or the report page. Otherwise the form is returned with
/// an error message.
pub async fn post_log_in(
    State(state): State<LoginState>,
    jar: PrivateCookieJar,
    Form(user_data): Form<LogInData>,
) -> Response {
    let redirect_url = parse_redirect_url(user_data.redirect_url.as_deref());
    let redirect_url = redirect_url.as_deref();

    let user = match check_credentials(&state, &user_data) {
        Ok(user) => user,
        Err(Error::InvalidCredentials) => {
            tracing::info!("Failed log-in attempt for {:?}", user_data.username);
            return log_in_form(
                &user_data.username,
                Some(INVALID_CREDENTIALS_ERROR_MSG),
                redirect_url,
            )
            .into_response();
        }
        Err(error) => {
            tracing::error!("Unhandled error while verifying credentials: {error}");
            return log_in_form(&user_data.username, Some(INTERNAL_ERROR_MSG), redirect_url)
                .into_response();
        }
    };

    let cookie_duration = if user_data.remember_me.is_some() {
        REMEMBER_ME_COOKIE_DURATION
    } else {
        state.cookie_duration
    };

    let Some(local_offset) = get_local_offset(&state.local_timezone) else {
        return Error::InvalidTimezoneError(state.local_timezone).into_response();
    };

    let redirect_url = redirect_url.unwrap_or(endpoints::REPORT_VIEW);

    match set_auth_cookie(jar.clone(), user.id, cookie_duration, local_offset) {
        Ok(jar) => {
            tracing::info!("User {} logged in", user.id);
            (
                StatusCode::SEE_OTHER,
                HxRedirect(redirect_url.to_owned()),
                jar,
            )
                .into_response()
        }
        Err(error) => {
            tracing::error!("Error setting auth cookie: {error}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                HxRedirect(endpoints::INTERNAL_ERROR_VIEW.to_owned()),
                invalidate_auth_cookie(jar),
            )
                .into_response()
        }
    }
}


#[cfg(test)]
mod log_in_tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Form, Router,
        body::Body,
        extract::State,
        http::{Response, StatusCode},
        routing::post,
    };
    use axum_extra::extract::PrivateCookieJar;
    use axum_test::TestServer;
    use rusqlite::Connection;
    use time::{Duration, OffsetDateTime};

    use crate::{
        PasswordHash,
        auth::{COOKIE_TOKEN, user::create_user},
        db::initialize,
        endpoints,
        test_utils::{
            assert_form_error_message, assert_hx_redirect, must_get_form, parse_html_fragment,
        },
    };

    use super::{
        INVALID_CREDENTIALS_ERROR_MSG, LogInData, LoginState, REMEMBER_ME_COOKIE_DURATION,
        post_log_in,
    };

    const USERNAME: &str = "alice";
    const PASSWORD: &str = "olive-gravel-tempest-88";

    fn get_state() -> LoginState {
        let connection =
            Connection::open_in_memory().expect("Could not open in-memory SQLite database");
        initialize(&connection).expect("Could not initialize database");
        create_user(
            USERNAME,
            PasswordHash::from_raw_password(PASSWORD, 4).unwrap(),
            &connection,
        )
        .expect("Could not create test user");

        LoginState::new("foobar", "Etc/UTC", Arc::new(Mutex::new(connection)))
    }

    fn form(username: &str, password: &str, redirect_url: Option<&str>) -> LogInData {
        LogInData {
            username: username.to_owned(),
            password: password.to_owned(),
            remember_me: None,
            redirect_url: redirect_url.map(str::to_owned),
        }
    }

    async fn log_in(state: LoginState, data: LogInData) -> Response<Body> {
        let jar = PrivateCookieJar::new(state.cookie_key.clone());

        post_log_in(State(state), jar, Form(data)).await
    }

    #[tokio::test]
    async fn log_in_succeeds_with_valid_credentials() {
        let response = log_in(get_state(), form(USERNAME, PASSWORD, None)).await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(&response, endpoints::REPORT_VIEW);
        assert!(response.headers().get("set-cookie").is_some());
    }

    #[tokio::test]
    async fn log_in_redirects_to_requested_page() {
        let response = log_in(
            get_state(),
            form(USERNAME, PASSWORD, Some(endpoints::LOANS_VIEW)),
        )
        .await;

        assert_hx_redirect(&response, endpoints::LOANS_VIEW);
    }

    #[tokio::test]
    async fn log_in_ignores_external_redirect() {
        let response = log_in(
            get_state(),
            form(USERNAME, PASSWORD, Some("https://example.com")),
        )
        .await;

        assert_hx_redirect(&response, endpoints::REPORT_VIEW);
    }

    #[tokio::test]
    async fn log_in_fails_with_wrong_password() {
        let response = log_in(get_state(), form(USERNAME, "hunter2", None)).await;

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_fragment(response).await;
        assert_form_error_message(&must_get_form(&html), INVALID_CREDENTIALS_ERROR_MSG);
    }

    #[tokio::test]
    async fn log_in_fails_with_unknown_username() {
        let response = log_in(get_state(), form("mallory", PASSWORD, None)).await;

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_fragment(response).await;
        assert_form_error_message(&must_get_form(&html), INVALID_CREDENTIALS_ERROR_MSG);
    }

    #[tokio::test]
    async fn log_in_fails_with_missing_fields() {
        let app = Router::new()
            .route(endpoints::LOG_IN_API, post(post_log_in))
            .with_state(get_state());
        let server = TestServer::try_new(app).expect("Could not create test server.");

        server
            .post(endpoints::LOG_IN_API)
            .content_type("application/x-www-form-urlencoded")
            .await
            .assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn remember_me_lasts_one_week() {
        let app = Router::new()
            .route(endpoints::LOG_IN_API, post(post_log_in))
            .with_state(get_state());
        let server = TestServer::try_new(app).expect("Could not create test server.");
        let form = [
            ("username", USERNAME),
            ("password", PASSWORD),
            ("remember_me", "on"),
        ];

        let response = server.post(endpoints::LOG_IN_API).form(&form).await;

        assert_eq!(response.status_code(), StatusCode::SEE_OTHER);
        let expires_at = response
            .cookie(COOKIE_TOKEN)
            .expires_datetime()
            .expect("want cookie expiry");
        let want = OffsetDateTime::now_utc() + REMEMBER_ME_COOKIE_DURATION;
        assert!(
            (expires_at - want).abs() < Duration::seconds(2),
            "got expiry {expires_at:?}, want {want:?}"
        );
    }
}
