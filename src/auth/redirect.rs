//! Where to send a user after they log in.

use axum::{extract::Request, http::Uri};

use crate::endpoints;

/// Only local paths are allowed, and never the log-in page itself.
fn is_local_path(url: &str) -> bool {
    if !url.starts_with('/') || url.starts_with("//") {
        return false;
    }

    let path = url.split_once('?').map_or(url, |(path, _)| path);

    path != endpoints::LOG_IN_VIEW
}

/// Reduce `raw_url` to a local path and query.
///
/// Returns `None` for absolute URLs and anything that is not a local page.
pub fn normalize_redirect_url(raw_url: &str) -> Option<String> {
    let uri = raw_url.parse::<Uri>().ok()?;
    if uri.scheme().is_some() || uri.authority().is_some() {
        return None;
    }

    let path_and_query = uri.path_and_query()?.as_str();
    is_local_path(path_and_query).then(|| path_and_query.to_owned())
}

/// The page the browser was showing when it sent an htmx request.
fn hx_current_path(request: &Request) -> Option<String> {
    let headers = request.headers();
    let is_hx_request = headers
        .get("hx-request")
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.eq_ignore_ascii_case("true"));

    if !is_hx_request {
        tracing::warn!("Missing HX-Request header for {}", request.uri());
        return None;
    }

    let current_url = headers
        .get("hx-current-url")
        .and_then(|value| value.to_str().ok())?;

    // htmx sends the full URL, so only the path and query are kept.
    let uri = current_url.parse::<Uri>().ok()?;
    let path_and_query = uri.path_and_query()?.as_str();
    is_local_path(path_and_query).then(|| path_and_query.to_owned())
}

/// Build the log-in page URL that returns the user to `target` afterwards.
pub fn log_in_url_with_redirect(target: &str) -> String {
    match serde_urlencoded::to_string([("redirect_url", target)]) {
        Ok(query) => format!("{}?{query}", endpoints::LOG_IN_VIEW),
        Err(error) => {
            tracing::error!("Could not encode redirect URL {target}: {error}");
            endpoints::LOG_IN_VIEW.to_owned()
        }
    }
}

/// Build the log-in URL for a request that failed the auth check.
///
/// API requests return to the page that sent them, page requests return to
/// themselves. Falls back to the report page.
pub fn log_in_url_for_request(request: &Request) -> String {
    let target = if request.uri().path().starts_with("/api") {
        hx_current_path(request)
    } else {
        request
            .uri()
            .path_and_query()
            .and_then(|path_and_query| normalize_redirect_url(path_and_query.as_str()))
    };

    log_in_url_with_redirect(target.as_deref().unwrap_or(endpoints::REPORT_VIEW))
}
