/// Normalizes an ecosystem tag for lookups (`" PyPI "` -> `"pypi"`).
pub fn normalize_ecosystem(tag: &str) -> String {
    tag.trim().to_lowercase()
}

/// Maps an ecosystem tag to the advisory database's own ecosystem name.
///
/// Returns `None` for ecosystems the advisory source does not know about;
/// callers treat that as "no vulnerabilities", not as an error.
pub fn osv_ecosystem(tag: &str) -> Option<&'static str> {
    match normalize_ecosystem(tag).as_str() {
        "npm" => Some("npm"),
        "pypi" | "python" | "pip" => Some("PyPI"),
        "maven" => Some("Maven"),
        "nuget" => Some("NuGet"),
        "packagist" | "composer" => Some("Packagist"),
        "rubygems" => Some("RubyGems"),
        "cargo" | "rust" => Some("crates.io"),
        "go" | "golang" => Some("Go"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_ecosystem() {
        assert_eq!(normalize_ecosystem(" PyPI "), "pypi");
        assert_eq!(normalize_ecosystem("npm"), "npm");
    }

    #[test]
    fn test_osv_ecosystem_aliases() {
        assert_eq!(osv_ecosystem("pypi"), Some("PyPI"));
        assert_eq!(osv_ecosystem("pip"), Some("PyPI"));
        assert_eq!(osv_ecosystem("Python"), Some("PyPI"));
        assert_eq!(osv_ecosystem("composer"), Some("Packagist"));
        assert_eq!(osv_ecosystem("rust"), Some("crates.io"));
        assert_eq!(osv_ecosystem("golang"), Some("Go"));
        assert_eq!(osv_ecosystem("NPM"), Some("npm"));
    }

    #[test]
    fn test_osv_ecosystem_unknown() {
        assert_eq!(osv_ecosystem("hex"), None);
        assert_eq!(osv_ecosystem(""), None);
    }
}
