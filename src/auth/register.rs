//! The registration page and the handler that opens a new account.

use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, State},
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
    account::create_account,
    app_state::create_cookie_key,
    auth::{
        PasswordHash, User, ValidatedPassword,
        cookie::{DEFAULT_COOKIE_DURATION, set_auth_cookie},
        user::create_user,
    },
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, LINK_STYLE, base,
        loading_spinner, log_in_register, password_input, username_input,
    },
    internal_server_error::get_internal_server_error_redirect,
    timezone::get_local_offset,
};

/// Client-side minimum length. zxcvbn does the real check on the server.
const PASSWORD_INPUT_MIN_LENGTH: u8 = 14;

fn confirm_password_input(error_message: Option<&str>) -> Markup {
    html! {
        div
        {
            label for="confirm-password" class=(FORM_LABEL_STYLE) { "Confirm Password" }

            input
                type="password"
                name="confirm_password"
                id="confirm-password"
                placeholder="••••••••"
                class=(FORM_TEXT_INPUT_STYLE)
                required
                minlength=(PASSWORD_INPUT_MIN_LENGTH)
                autofocus[error_message.is_some()];

            @if let Some(error_message) = error_message
            {
                p class="text-red-500 text-base" { (error_message) }
            }
        }
    }
}

/// Error messages for each field of the registration form.
#[derive(Default)]
struct FieldErrors<'a> {
    username: Option<&'a str>,
    password: Option<&'a str>,
    confirm_password: Option<&'a str>,
}

fn registration_form(username: &str, password: &str, errors: FieldErrors) -> Markup {
    html! {
        form
            hx-post=(endpoints::USERS)
            hx-indicator="#indicator"
            hx-disabled-elt="#username, #password, #submit-button"
            class="space-y-4 md:space-y-6"
        {
            (username_input(username, errors.username))
            (password_input(password, PASSWORD_INPUT_MIN_LENGTH, errors.password))
            (confirm_password_input(errors.confirm_password))

            button type="submit" id="submit-button" tabindex="0" class=(BUTTON_PRIMARY_STYLE)
            {
                span class="inline htmx-indicator" id="indicator" { (loading_spinner()) }
                "Create Account"
            }

            p class="text-sm font-light text-gray-500 dark:text-gray-400"
            {
                "Already have an account? "
                a href=(endpoints::LOG_IN_VIEW) tabindex="0" class=(LINK_STYLE) { "Log in here" }
            }
        }
    }
}

/// Display the registration page.
pub async fn get_register_page() -> Response {
    let form = registration_form("", "", FieldErrors::default());
    let content = log_in_register("Create Account", &form);

    base("Register", &[], &content).into_response()
}

/// The state needed for creating a new user.
#[derive(Debug, Clone)]
pub struct RegistrationState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
    /// The duration for which cookies used for authentication are valid.
    pub cookie_duration: Duration,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
    /// The database the user and account are written to.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl RegistrationState {
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

impl FromRef<AppState> for RegistrationState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            cookie_duration: state.cookie_duration,
            local_timezone: state.local_timezone.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

impl FromRef<RegistrationState> for Key {
    fn from_ref(state: &RegistrationState) -> Self {
        state.cookie_key.clone()
    }
}

/// The fields of the registration form.
#[derive(Serialize, Deserialize)]
pub struct RegisterForm {
    /// The name to log in with.
    pub username: String,
    /// The new password.
    pub password: String,
    /// Must equal `password`.
    pub confirm_password: String,
}

/// Create the user and their empty account together.
///
/// # Errors
///
/// Returns an [Error::EmptyUsername] or [Error::DuplicateUsername] for bad
/// usernames, or [Error::SqlError] if either insert fails. Nothing is written
/// on error.
fn open_account(
    username: &str,
    password_hash: PasswordHash,
    connection: &Connection,
) -> Result<User, Error> {
    let transaction = connection.unchecked_transaction()?;

    let user = create_user(username, password_hash, &transaction)?;
    create_account(user.id, &transaction)?;

    transaction.commit()?;

    Ok(user)
}

fn rerender(user_data: &RegisterForm, errors: FieldErrors) -> Response {
    registration_form(&user_data.username, &user_data.password, errors).into_response()
}

/// Handler for registration requests.
///
/// On success the user is logged in and redirected to the report page.
/// Invalid input re-renders the form with a message under the offending field.
pub async fn register_user(
    State(state): State<RegistrationState>,
    jar: PrivateCookieJar,
    Form(user_data): Form<RegisterForm>,
) -> Response {
    if user_data.username.trim().is_empty() {
        return rerender(&user_data, FieldErrors {
            username: Some("Username cannot be empty"),
            ..Default::default()
        });
    }

    let validated_password = match ValidatedPassword::new(&user_data.password) {
        Ok(password) => password,
        Err(error) => {
            let message = error.to_string();
            return rerender(&user_data, FieldErrors {
                password: Some(&message),
                ..Default::default()
            });
        }
    };

    if user_data.password != user_data.confirm_password {
        return rerender(&user_data, FieldErrors {
            confirm_password: Some("Passwords do not match"),
            ..Default::default()
        });
    }

    let password_hash = match PasswordHash::new(validated_password, PasswordHash::DEFAULT_COST) {
        Ok(hash) => hash,
        Err(error) => {
            tracing::error!("an error occurred while hashing a password: {error}");
            return get_internal_server_error_redirect();
        }
    };

    let Some(local_offset) = get_local_offset(&state.local_timezone) else {
        return Error::InvalidTimezoneError(state.local_timezone).into_response();
    };

    let result = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)
        .and_then(|connection| open_account(&user_data.username, password_hash, &connection));

    let user = match result {
        Ok(user) => user,
        Err(Error::DuplicateUsername) => {
            return rerender(&user_data, FieldErrors {
                username: Some("That username is already taken"),
                ..Default::default()
            });
        }
        Err(error) => {
            tracing::error!("An unhandled error occurred while registering a user: {error}");
            return get_internal_server_error_redirect();
        }
    };

    tracing::info!("Registered user {} ({})", user.id, user.username);

    match set_auth_cookie(jar, user.id, state.cookie_duration, local_offset) {
        Ok(jar) => (
            StatusCode::SEE_OTHER,
            HxRedirect(endpoints::REPORT_VIEW.to_owned()),
            jar,
        )
            .into_response(),
        Err(error) => {
            tracing::error!("An error occurred while setting the auth cookie: {error}");
            get_internal_server_error_redirect()
        }
    }
}
