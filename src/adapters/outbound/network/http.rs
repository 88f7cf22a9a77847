use crate::shared::Result;
use std::time::Duration;

/// Builds the shared async HTTP client.
///
/// Every request carries the crate user agent and the per-request timeout.
/// There is no retry layer: a failed call degrades to its fallback at once.
pub fn build_http_client(timeout: Duration) -> Result<reqwest::Client> {
    let user_agent = format!("dep-health/{}", env!("CARGO_PKG_VERSION"));
    let client = reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(user_agent)
        .build()?;
    Ok(client)
}

/// Validates a package name before it is placed in a URL path.
///
/// Rejects path traversal, query/fragment delimiters, backslashes and
/// whitespace. A single `/` is allowed only for npm-style scoped names
/// (`@scope/name`) when `allow_scope` is set.
pub fn validate_url_component(component: &str, component_type: &str, allow_scope: bool) -> Result<()> {
    if component.trim().is_empty() {
        anyhow::bail!("Security: {} is empty", component_type);
    }

    if component.contains("..") {
        anyhow::bail!(
            "Security: {} contains '..' which is not allowed",
            component_type
        );
    }

    if component.contains('\\') || component.chars().any(char::is_whitespace) {
        anyhow::bail!(
            "Security: {} contains path separators or whitespace which are not allowed",
            component_type
        );
    }

    if component.contains('#') || component.contains('?') || component.contains('%') {
        anyhow::bail!(
            "Security: {} contains URL-unsafe characters",
            component_type
        );
    }

    let slashes = component.matches('/').count();
    let scoped = allow_scope && component.starts_with('@') && slashes == 1;
    if slashes > 0 && !scoped {
        anyhow::bail!(
            "Security: {} contains path separators which are not allowed",
            component_type
        );
    }
    if component.contains('@') && !scoped {
        anyhow::bail!(
            "Security: {} contains URL-unsafe characters",
            component_type
        );
    }

    Ok(())
}

/// Joins a base URL and a path, tolerating a missing trailing slash on the base.
pub fn join_url(base: &str, path: &str) -> String {
    if base.ends_with('/') {
        format!("{}{}", base, path)
    } else {
        format!("{}/{}", base, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_http_client() {
        assert!(build_http_client(Duration::from_secs(5)).is_ok());
    }

    #[test]
    fn test_validate_plain_names() {
        assert!(validate_url_component("requests", "Package name", false).is_ok());
        assert!(validate_url_component("zope.interface", "Package name", false).is_ok());
        assert!(validate_url_component("lodash.merge", "Package name", true).is_ok());
    }

    #[test]
    fn test_validate_scoped_names() {
        assert!(validate_url_component("@babel/core", "Package name", true).is_ok());
        assert!(validate_url_component("@babel/core", "Package name", false).is_err());
        assert!(validate_url_component("@a/b/c", "Package name", true).is_err());
        assert!(validate_url_component("a/b", "Package name", true).is_err());
        assert!(validate_url_component("evil@host", "Package name", true).is_err());
    }

    #[test]
    fn test_validate_rejects_injection() {
        for bad in ["../etc", "a?b", "a#b", "a\\b", "a b", "%2e%2e", ""] {
            assert!(
                validate_url_component(bad, "Package name", true).is_err(),
                "{} should be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_join_url() {
        assert_eq!(join_url("https://x.org/", "a"), "https://x.org/a");
        assert_eq!(join_url("https://x.org", "a"), "https://x.org/a");
    }
}
