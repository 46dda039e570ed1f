//! Reading and writing the encrypted auth cookie.

use std::cmp::max;

use axum_extra::extract::{
    PrivateCookieJar,
    cookie::{Cookie, SameSite},
};
use time::{Duration, OffsetDateTime, UtcOffset};

use crate::{
    Error,
    auth::{UserID, token::Token},
};

/// The name of the cookie holding the session [Token].
pub const COOKIE_TOKEN: &str = "token";
/// How long a session lasts without activity.
pub const DEFAULT_COOKIE_DURATION: Duration = Duration::minutes(5);

fn build_cookie(value: String, expires_at: OffsetDateTime) -> Cookie<'static> {
    Cookie::build((COOKIE_TOKEN, value))
        .expires(expires_at)
        .http_only(true)
        .same_site(SameSite::Strict)
        .secure(true)
        .path("/")
        .build()
}

fn add_token(jar: PrivateCookieJar, token: &Token) -> Result<PrivateCookieJar, Error> {
    let value = serde_json::to_string(token)
        .map_err(|error| Error::JSONSerializationError(error.to_string()))?;

    Ok(jar.add(build_cookie(value, token.expires_at)))
}

/// Log `user_id` in by adding a token cookie that expires `duration` from now.
///
/// # Errors
///
/// Returns [Error::JSONSerializationError] if the token cannot be serialized.
pub fn set_auth_cookie(
    jar: PrivateCookieJar,
    user_id: UserID,
    duration: Duration,
    local_offset: UtcOffset,
) -> Result<PrivateCookieJar, Error> {
    let token = Token {
        user_id,
        expires_at: (OffsetDateTime::now_utc() + duration).to_offset(local_offset),
    };

    add_token(jar, &token)
}

/// Overwrite the token cookie with an expired, empty one so the browser drops it.
pub fn invalidate_auth_cookie(jar: PrivateCookieJar) -> PrivateCookieJar {
    let mut cookie = build_cookie("deleted".to_owned(), OffsetDateTime::UNIX_EPOCH);
    cookie.set_max_age(Duration::ZERO);

    jar.add(cookie)
}

/// Read the session token from `jar`.
///
/// # Errors
///
/// Returns a:
/// - [Error::CookieMissing] if there is no token cookie,
/// - [Error::InvalidToken] if the cookie cannot be parsed or has expired.
pub fn get_token_from_cookies(jar: &PrivateCookieJar) -> Result<Token, Error> {
    let cookie = jar.get(COOKIE_TOKEN).ok_or(Error::CookieMissing)?;
    let token: Token =
        serde_json::from_str(cookie.value_trimmed()).map_err(|_| Error::InvalidToken)?;

    if token.is_expired(OffsetDateTime::now_utc()) {
        return Err(Error::InvalidToken);
    }

    Ok(token)
}

/// Push the session expiry out to `duration` from now, unless it already ends later.
///
/// Sessions created with "remember me" keep their longer expiry.
///
/// # Errors
///
/// Returns [Error::CookieMissing] or [Error::InvalidToken] if the jar has no
/// live session. Callers should keep a clone of the jar to fall back on.
pub fn extend_auth_cookie_duration_if_needed(
    jar: PrivateCookieJar,
    duration: Duration,
    local_offset: UtcOffset,
) -> Result<PrivateCookieJar, Error> {
    let token = get_token_from_cookies(&jar)?;
    let extended = OffsetDateTime::now_utc()
        .checked_add(duration)
        .ok_or(Error::InvalidToken)?
        .to_offset(local_offset);

    let token = Token {
        user_id: token.user_id,
        expires_at: max(token.expires_at, extended),
    };

    add_token(jar, &token)
}

#[cfg(test)]
mod cookie_tests {
    use axum_extra::extract::{PrivateCookieJar, cookie::Key};
    use sha2::{Digest, Sha512};
    use time::{Duration, OffsetDateTime, UtcOffset};

    use crate::{
        Error,
        auth::{
            UserID,
            cookie::{
                COOKIE_TOKEN, DEFAULT_COOKIE_DURATION, extend_auth_cookie_duration_if_needed,
                get_token_from_cookies, invalidate_auth_cookie, set_auth_cookie,
            },
        },
    };

    fn get_jar() -> PrivateCookieJar {
        let hash = Sha512::digest(b"a very secret key");

        PrivateCookieJar::new(Key::from(&hash))
    }

    #[track_caller]
    fn assert_date_time_close(left: OffsetDateTime, right: OffsetDateTime) {
        assert!(
            (left - right).abs() < Duration::seconds(1),
            "got date time {left:?}, want {right:?}"
        );
    }

    #[test]
    fn set_cookie_stores_user_id_and_expiry() {
        let jar = set_auth_cookie(
            get_jar(),
            UserID::new(3),
            DEFAULT_COOKIE_DURATION,
            UtcOffset::UTC,
        )
        .unwrap();

        let token = get_token_from_cookies(&jar).unwrap();
        let cookie = jar.get(COOKIE_TOKEN).unwrap();

        assert_eq!(token.user_id, UserID::new(3));
        assert_date_time_close(
            token.expires_at,
            OffsetDateTime::now_utc() + DEFAULT_COOKIE_DURATION,
        );
        assert_eq!(cookie.expires_datetime(), Some(token.expires_at));
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.secure(), Some(true));
    }

    #[test]
    fn missing_cookie_is_an_error() {
        assert_eq!(
            get_token_from_cookies(&get_jar()),
            Err(Error::CookieMissing)
        );
    }

    #[test]
    fn expired_token_is_rejected() {
        let jar = set_auth_cookie(
            get_jar(),
            UserID::new(1),
            Duration::seconds(-10),
            UtcOffset::UTC,
        )
        .unwrap();

        assert_eq!(get_token_from_cookies(&jar), Err(Error::InvalidToken));
    }

    #[test]
    fn extend_pushes_expiry_out() {
        let jar = set_auth_cookie(
            get_jar(),
            UserID::new(1),
            Duration::seconds(5),
            UtcOffset::UTC,
        )
        .unwrap();

        let jar =
            extend_auth_cookie_duration_if_needed(jar, Duration::minutes(5), UtcOffset::UTC)
                .unwrap();
        let token = get_token_from_cookies(&jar).unwrap();

        assert_date_time_close(
            token.expires_at,
            OffsetDateTime::now_utc() + Duration::minutes(5),
        );
    }

    #[test]
    fn extend_keeps_longer_expiry() {
        let jar = set_auth_cookie(get_jar(), UserID::new(1), Duration::days(7), UtcOffset::UTC)
            .unwrap();
        let want = get_token_from_cookies(&jar).unwrap().expires_at;

        let jar =
            extend_auth_cookie_duration_if_needed(jar, Duration::minutes(5), UtcOffset::UTC)
                .unwrap();

        assert_eq!(get_token_from_cookies(&jar).unwrap().expires_at, want);
    }

    #[test]
    fn invalidated_cookie_logs_user_out() {
        let jar = set_auth_cookie(
            get_jar(),
            UserID::new(1),
            DEFAULT_COOKIE_DURATION,
            UtcOffset::UTC,
        )
        .unwrap();

        let jar = invalidate_auth_cookie(jar);
        let cookie = jar.get(COOKIE_TOKEN).unwrap();

        assert_eq!(cookie.value(), "deleted");
        assert_eq!(cookie.max_age(), Some(Duration::ZERO));
        assert_eq!(get_token_from_cookies(&jar), Err(Error::InvalidToken));
    }
}
