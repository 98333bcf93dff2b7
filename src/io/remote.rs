use std::time::Duration;

use crate::error::{Error, Result};

pub fn is_remote(location: &str) -> bool {
    location.starts_with("http://") || location.starts_with("https://") || location.starts_with("//")
}

/// Host part of a remote location, e.g. `fonts.googleapis.com`.
pub fn host_of(location: &str) -> &str {
    let rest = location
        .strip_prefix("https://")
        .or_else(|| location.strip_prefix("http://"))
        .or_else(|| location.strip_prefix("//"))
        .unwrap_or(location);
    rest.split(['/', '?', '#']).next().unwrap_or(rest)
}

/// Fetch a remote stylesheet, giving up after `timeout_ms`.
pub fn fetch_text(location: &str, timeout_ms: u64) -> Result<String> {
    let url = if location.starts_with("//") {
        format!("https:{}", location)
    } else {
        location.to_string()
    };
    let fetch_error = |e: reqwest::Error| Error::Fetch {
        url: url.clone(),
        message: e.to_string(),
    };
    let client = reqwest::blocking::Client::builder()
        .timeout(Duration::from_millis(timeout_ms))
        .build()
        .map_err(fetch_error)?;
    let resp = client
        .get(&url)
        .send()
        .and_then(|r| r.error_for_status())
        .map_err(fetch_error)?;
    resp.text().map_err(fetch_error)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_remote_locations() {
        assert!(is_remote("https://fonts.googleapis.com/css"));
        assert!(is_remote("//cdn.example.com/a.css"));
        assert!(!is_remote("local/a.css"));
    }

    #[test]
    fn extracts_host() {
        assert_eq!(host_of("https://fonts.googleapis.com/css?family=A"), "fonts.googleapis.com");
        assert_eq!(host_of("//cdn.example.com/a.css"), "cdn.example.com");
    }
}
