//! Resolution of the SonarQube server origin.

use url::Url;

/// Used when neither configuration nor the report names a server.
pub const DEFAULT_SONAR_URL: &str = "https://sonarcloud.io";

/// Pick the server base URL.
///
/// Precedence: configured override, report `serverUrl`, origin of
/// `ceTaskUrl`, then [`DEFAULT_SONAR_URL`]. Empty strings count as unset.
pub fn resolve_base_url(
    ce_task_url: Option<&str>,
    server_url: Option<&str>,
    configured: Option<&str>,
) -> String {
    fn non_empty(s: Option<&str>) -> Option<&str> {
        s.map(str::trim).filter(|s| !s.is_empty())
    }

    if let Some(url) = non_empty(configured).or_else(|| non_empty(server_url)) {
        return url.trim_end_matches('/').to_string();
    }

    non_empty(ce_task_url)
        .and_then(origin_of)
        .unwrap_or_else(|| DEFAULT_SONAR_URL.to_string())
}

/// `scheme://host[:port]` of a URL.
fn origin_of(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let origin = parsed.origin();
    origin
        .is_tuple()
        .then(|| origin.ascii_serialization())
}
