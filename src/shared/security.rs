use crate::shared::Result;
use std::fs;
use std::path::Path;

/// Upper bound for dataset and config files read from disk (50 MB)
pub const MAX_INPUT_FILE_SIZE: u64 = 50 * 1024 * 1024;

/// Checks that an input file (dataset, config) is a regular file of acceptable size.
///
/// # Security
/// Uses `symlink_metadata()` so a symbolic link is rejected instead of followed.
///
/// # Errors
/// Returns an error if the path is missing, a symlink, not a regular file,
/// or larger than [`MAX_INPUT_FILE_SIZE`].
pub fn validate_input_file(path: &Path, file_description: &str) -> Result<()> {
    let metadata = fs::symlink_metadata(path).map_err(|e| {
        anyhow::anyhow!(
            "Failed to read {} metadata at {}: {}",
            file_description,
            path.display(),
            e
        )
    })?;

    if metadata.is_symlink() {
        anyhow::bail!(
            "Security: {} ({}) is a symbolic link. Symbolic links are not followed.",
            file_description,
            path.display()
        );
    }

    if !metadata.is_file() {
        anyhow::bail!("{} is not a regular file", path.display());
    }

    if metadata.len() > MAX_INPUT_FILE_SIZE {
        anyhow::bail!(
            "Security: {} is too large ({} bytes). Maximum allowed size is {} bytes.",
            path.display(),
            metadata.len(),
            MAX_INPUT_FILE_SIZE
        );
    }

    Ok(())
}

/// Refuses to write through a symbolic link.
///
/// A path that does not exist yet is accepted.
pub fn validate_write_target(path: &Path) -> Result<()> {
    match fs::symlink_metadata(path) {
        Ok(metadata) if metadata.is_symlink() => anyhow::bail!(
            "Security: {} is a symbolic link. Writing through symbolic links is not allowed.",
            path.display()
        ),
        Ok(metadata) if metadata.is_dir() => {
            anyhow::bail!("{} is a directory, expected a file", path.display())
        }
        _ => Ok(()),
    }
}

/// Turns a free-form label into a file-name-safe slug.
///
/// Lowercases, maps spaces to `_`, and replaces anything outside
/// `[a-z0-9._-]` with `_`. An empty result becomes `unnamed`.
pub fn file_slug(label: &str) -> String {
    let slug: String = label
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    if slug.is_empty() || slug.chars().all(|c| c == '.') {
        "unnamed".to_string()
    } else {
        slug
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn test_validate_input_file_regular_file() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("deps.csv");
        fs::write(&file_path, "project,ecosystem\n").unwrap();

        assert!(validate_input_file(&file_path, "dataset").is_ok());
    }

    #[test]
    fn test_validate_input_file_missing() {
        let path = PathBuf::from("/nonexistent/deps.csv");
        let result = validate_input_file(&path, "dataset");
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("dataset metadata"));
    }

    #[test]
    fn test_validate_input_file_directory() {
        let temp_dir = TempDir::new().unwrap();
        let result = validate_input_file(temp_dir.path(), "dataset");
        assert!(result.unwrap_err().to_string().contains("not a regular file"));
    }

    #[cfg(unix)]
    #[test]
    fn test_validate_input_file_symlink() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("real.csv");
        let link = temp_dir.path().join("link.csv");
        fs::write(&target, "x").unwrap();
        std::os::unix::fs::symlink(&target, &link).unwrap();

        let result = validate_input_file(&link, "dataset");
        assert!(result.unwrap_err().to_string().contains("symbolic link"));
    }

    #[test]
    fn test_validate_write_target_new_file() {
        let temp_dir = TempDir::new().unwrap();
        assert!(validate_write_target(&temp_dir.path().join("out.md")).is_ok());
    }

    #[test]
    fn test_validate_write_target_directory() {
        let temp_dir = TempDir::new().unwrap();
        assert!(validate_write_target(temp_dir.path()).is_err());
    }

    #[test]
    fn test_file_slug() {
        assert_eq!(file_slug("Web Frontend"), "web_frontend");
        assert_eq!(file_slug("api/v2"), "api_v2");
        assert_eq!(file_slug("  "), "unnamed");
        assert_eq!(file_slug(".."), "unnamed");
        assert_eq!(file_slug("billing-svc"), "billing-svc");
    }
}
