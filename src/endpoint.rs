//! Agent API endpoint resolution.
//!
//! The chat UI can be told where the agent API lives via a `url` query
//! parameter, or it derives the endpoint from the path it is mounted on.
//! The derivation steps up one path segment: when the UI is served from
//! `<mount>/chat/`, the API answers at `<mount>/`. Neither input available
//! is a configuration error — there is nothing sensible to guess or retry.

use url::Url;

/// Page context the resolver reads: the `url` query parameter, the statically
/// configured mount base path, and the page origin (scheme + host + port).
#[derive(Debug, Clone, Default)]
pub struct PageContext {
    /// Value of the `url` query parameter, if present. Highest precedence.
    pub query_url: Option<String>,
    /// Configured base path the UI is mounted under, e.g. `/apps/ccw/chat/`.
    pub base_path: Option<String>,
    /// Page origin, e.g. `https://coder.example.com`.
    pub origin: String,
}

/// Endpoint resolution failure. Fatal to session start: surfaced to the
/// user, never retried.
#[derive(Debug, thiserror::Error)]
pub enum EndpointError {
    #[error(
        "agent API endpoint is not set; pass the `url` query parameter or \
         configure the UI base path"
    )]
    Unresolvable,
    #[error("invalid page origin '{origin}': {source}")]
    InvalidOrigin {
        origin: String,
        source: url::ParseError,
    },
    #[error("cannot derive endpoint from base path '{base_path}': {source}")]
    InvalidBasePath {
        base_path: String,
        source: url::ParseError,
    },
}

/// Resolve the agent API endpoint from page context.
///
/// Precedence:
/// 1. `url` query parameter, used verbatim when it parses as an absolute
///    http(s) URL. An invalid value is logged and treated as absent.
/// 2. Base path resolved against the origin, stepped up one path segment.
/// 3. Neither → [`EndpointError::Unresolvable`].
///
/// The result never has a trailing slash.
pub fn resolve(page: &PageContext) -> Result<Url, EndpointError> {
    if let Some(raw) = page.query_url.as_deref() {
        match Url::parse(raw) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {
                return Ok(trim_trailing_slash(url));
            }
            Ok(url) => {
                log::warn!(
                    "url query parameter has unsupported scheme '{}', ignoring: {raw}",
                    url.scheme()
                );
            }
            Err(e) => {
                log::warn!("url query parameter is not an absolute URL, ignoring: {raw} ({e})");
            }
        }
    }

    let Some(base_path) = page.base_path.as_deref().filter(|p| !p.is_empty()) else {
        return Err(EndpointError::Unresolvable);
    };

    let origin = Url::parse(&page.origin).map_err(|e| EndpointError::InvalidOrigin {
        origin: page.origin.clone(),
        source: e,
    })?;

    // Relative resolution treats `a/b` and `a/b/` differently; force the
    // directory form before stepping up to the parent segment.
    let mut chat_url = origin
        .join(base_path)
        .map_err(|e| EndpointError::InvalidBasePath {
            base_path: base_path.to_string(),
            source: e,
        })?;
    if !chat_url.path().ends_with('/') {
        let path = format!("{}/", chat_url.path());
        chat_url.set_path(&path);
    }

    let api_url = chat_url
        .join("..")
        .map_err(|e| EndpointError::InvalidBasePath {
            base_path: base_path.to_string(),
            source: e,
        })?;

    Ok(trim_trailing_slash(api_url))
}

/// Normalize away a trailing slash so `<endpoint>/events` style joins do not
/// produce double slashes. The root path is left alone — a URL cannot have
/// an empty path.
fn trim_trailing_slash(mut url: Url) -> Url {
    let path = url.path();
    if path.len() > 1 && path.ends_with('/') {
        let trimmed = path.trim_end_matches('/').to_string();
        url.set_path(&trimmed);
    }
    url
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn ctx(query: Option<&str>, base: Option<&str>) -> PageContext {
        PageContext {
            query_url: query.map(str::to_string),
            base_path: base.map(str::to_string),
            origin: "https://coder.example.com".to_string(),
        }
    }

    #[test]
    fn test_query_parameter_used_verbatim() {
        let url = resolve(&ctx(Some("https://x.test/api"), None)).unwrap();
        assert_eq!(url.as_str(), "https://x.test/api");
    }

    #[test]
    fn test_query_parameter_beats_base_path() {
        let url = resolve(&ctx(Some("https://x.test/api"), Some("/app/chat/"))).unwrap();
        assert_eq!(url.as_str(), "https://x.test/api");
    }

    #[test]
    fn test_query_parameter_trailing_slash_trimmed() {
        let url = resolve(&ctx(Some("https://x.test/api/"), None)).unwrap();
        assert_eq!(url.as_str(), "https://x.test/api");
    }

    #[test]
    fn test_invalid_query_parameter_falls_back_to_base_path() {
        let url = resolve(&ctx(Some("not a url"), Some("/app/chat/"))).unwrap();
        assert_eq!(url.as_str(), "https://coder.example.com/app");
    }

    #[test]
    fn test_non_http_scheme_rejected() {
        let err = resolve(&ctx(Some("file:///etc/passwd"), None)).unwrap_err();
        assert!(matches!(err, EndpointError::Unresolvable));
    }

    #[test]
    fn test_base_path_steps_up_one_segment() {
        let url = resolve(&ctx(None, Some("/apps/ccw/chat/"))).unwrap();
        assert_eq!(url.as_str(), "https://coder.example.com/apps/ccw");
    }

    #[test]
    fn test_base_path_without_trailing_slash() {
        let url = resolve(&ctx(None, Some("/apps/ccw/chat"))).unwrap();
        assert_eq!(url.as_str(), "https://coder.example.com/apps/ccw");
    }

    #[test]
    fn test_single_segment_base_path_resolves_to_origin_root() {
        let url = resolve(&ctx(None, Some("/chat/"))).unwrap();
        assert_eq!(url.as_str(), "https://coder.example.com/");
    }

    #[test]
    fn test_nothing_available_is_a_configuration_error() {
        let err = resolve(&ctx(None, None)).unwrap_err();
        assert!(matches!(err, EndpointError::Unresolvable));
        let err = resolve(&ctx(None, Some(""))).unwrap_err();
        assert!(matches!(err, EndpointError::Unresolvable));
    }

    #[test]
    fn test_invalid_origin_reported() {
        let page = PageContext {
            query_url: None,
            base_path: Some("/app/chat/".to_string()),
            origin: "not an origin".to_string(),
        };
        let err = resolve(&page).unwrap_err();
        assert!(matches!(err, EndpointError::InvalidOrigin { .. }));
        assert!(err.to_string().contains("not an origin"));
    }
}
