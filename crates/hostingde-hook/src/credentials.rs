//! Credentials file handling
//!
//! Reads the API key from a certbot-style INI file:
//!
//! ```ini
//! # hosting.de API credentials
//! dns_hostingde_apikey = 0123456789abcdef
//! ```

use anyhow::{Context, Result};
use std::path::Path;
use tracing::warn;

/// INI key holding the API key
pub const API_KEY_ENTRY: &str = "dns_hostingde_apikey";

/// Read the API key from the credentials file at `path`
///
/// Logs a warning when the file can be read by group or others.
pub fn read_api_key(path: &Path) -> Result<String> {
    warn_if_exposed(path);

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read credentials file: {}", path.display()))?;

    parse_api_key(&content).with_context(|| {
        format!(
            "Credentials file {} has no non-empty '{}' entry",
            path.display(),
            API_KEY_ENTRY
        )
    })
}

/// Extract the API key from INI text
///
/// Blank lines, `#`/`;` comments and section headers are skipped.
pub fn parse_api_key(content: &str) -> Option<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with(['#', ';', '[']))
        .filter_map(|line| line.split_once('='))
        .find(|(key, _)| key.trim() == API_KEY_ENTRY)
        .map(|(_, value)| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

#[cfg(unix)]
fn warn_if_exposed(path: &Path) {
    use std::os::unix::fs::PermissionsExt;

    if let Ok(metadata) = std::fs::metadata(path) {
        let mode = metadata.permissions().mode();
        if mode & 0o077 != 0 {
            warn!(
                "Unsafe permissions on credentials file {} ({:o}); it should not be accessible by group or others",
                path.display(),
                mode & 0o777
            );
        }
    }
}

#[cfg(not(unix))]
fn warn_if_exposed(_path: &Path) {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn parses_key_with_comments_and_sections() {
        let content = "# credentials\n[default]\n; note\ndns_hostingde_apikey = abc123 \n";
        assert_eq!(parse_api_key(content), Some("abc123".to_string()));
    }

    #[test]
    fn ignores_other_entries() {
        let content = "dns_other_apikey = nope\n";
        assert_eq!(parse_api_key(content), None);
    }

    #[test]
    fn empty_value_is_missing() {
        assert_eq!(parse_api_key("dns_hostingde_apikey =   \n"), None);
    }

    #[test]
    fn reads_key_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "dns_hostingde_apikey = from-file").unwrap();

        assert_eq!(read_api_key(file.path()).unwrap(), "from-file");
    }

    #[test]
    fn missing_entry_is_an_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "something = else").unwrap();

        let err = read_api_key(file.path()).unwrap_err();
        assert!(err.to_string().contains(API_KEY_ENTRY));
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(read_api_key(&dir.path().join("absent.ini")).is_err());
    }
}
