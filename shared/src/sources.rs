//! Origin list loading.
//!
//! The origins to collect are kept in a JSON file of the form
//! `{"urls": ["https://example.com", ...]}`.

use serde::Deserialize;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, error};

/// Errors that can occur while loading an origin list.
#[derive(Debug, Error)]
pub enum OriginListError {
    /// The file could not be read.
    #[error("Failed to read origin list: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not a valid origin list.
    #[error("Failed to parse origin list: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Deserialize)]
struct OriginList {
    urls: Vec<String>,
}

/// Parses the contents of an origin list file.
///
/// # Errors
///
/// Returns an error if `contents` is not a JSON object with a `urls` array of strings.
pub fn parse_origins(contents: &str) -> Result<Vec<String>, OriginListError> {
    let list: OriginList = serde_json::from_str(contents)?;
    Ok(list.urls)
}

/// Loads the origin list at `path`.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_origins(path: impl AsRef<Path>) -> Result<Vec<String>, OriginListError> {
    let contents = std::fs::read_to_string(path.as_ref())?;
    parse_origins(&contents)
}

/// Reads the origin list at `path`, falling back to an empty list.
///
/// A missing or malformed file is logged and treated as having no origins.
#[must_use]
pub fn read_origins(path: impl AsRef<Path>) -> Vec<String> {
    let path = path.as_ref();
    debug!(path = %path.display(), "Reading origin list");

    match load_origins(path) {
        Ok(origins) => {
            debug!(count = origins.len(), "Loaded origins");
            origins
        }
        Err(e) => {
            error!(path = %path.display(), error = %e, "Could not load origin list");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_origins() {
        let origins =
            parse_origins(r#"{"urls": ["https://example.com", "https://www.rust-lang.org"]}"#)
                .unwrap();

        assert_eq!(origins, vec!["https://example.com", "https://www.rust-lang.org"]);
    }

    #[test]
    fn test_parse_origins_malformed() {
        assert!(matches!(
            parse_origins("{\"urls\": "),
            Err(OriginListError::Parse(_))
        ));
        assert!(parse_origins(r#"{"origins": []}"#).is_err());
        assert!(parse_origins(r#"{"urls": [1, 2]}"#).is_err());
    }

    #[test]
    fn test_read_origins_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"urls": ["https://example.com"]}}"#).unwrap();

        assert_eq!(read_origins(file.path()), vec!["https://example.com"]);
    }

    #[test]
    fn test_read_origins_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let origins = read_origins(dir.path().join("urls.json"));
        assert!(origins.is_empty());
    }

    #[test]
    fn test_read_origins_malformed_file_is_empty() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        assert!(read_origins(file.path()).is_empty());
        assert!(matches!(
            load_origins(file.path()),
            Err(OriginListError::Parse(_))
        ));
    }
}
