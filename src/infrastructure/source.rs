//! Source acquisition: local paths, URLs, and inline strings.
//!
//! All three acquirers yield raw program text and reject empty sources, so
//! downstream stages never see an input they cannot parse into a tree with
//! a root.

use crate::error::VizError;
use std::path::Path;

/// Read source text from a local file.
pub fn from_path(path: impl AsRef<Path>) -> Result<String, VizError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)
        .map_err(|e| VizError::UnavailableSource(format!("{}: {}", path.display(), e)))?;
    non_empty(text)
}

/// Fetch source text over HTTP(S).
pub fn from_url(url: &str) -> Result<String, VizError> {
    let response = reqwest::blocking::get(url)
        .and_then(reqwest::blocking::Response::error_for_status)
        .map_err(|e| VizError::UnavailableSource(e.to_string()))?;
    let text = response
        .text()
        .map_err(|e| VizError::UnavailableSource(e.to_string()))?;
    non_empty(text)
}

/// Use an inline code string as-is.
pub fn from_string(code: &str) -> Result<String, VizError> {
    non_empty(code.to_string())
}

fn non_empty(text: String) -> Result<String, VizError> {
    if text.is_empty() {
        return Err(VizError::EmptyInput);
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_from_string_rejects_empty() {
        assert!(matches!(from_string(""), Err(VizError::EmptyInput)));
        assert_eq!(from_string("x = 1").unwrap(), "x = 1");
    }

    #[test]
    fn test_from_path_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "def main():\n    pass").unwrap();
        let text = from_path(file.path()).unwrap();
        assert!(text.contains("def main"));
    }

    #[test]
    fn test_from_path_missing_file() {
        assert!(matches!(
            from_path("/definitely/not/a/file.py"),
            Err(VizError::UnavailableSource(_))
        ));
    }

    #[test]
    fn test_from_path_empty_file() {
        let file = tempfile::NamedTempFile::new().unwrap();
        assert!(matches!(from_path(file.path()), Err(VizError::EmptyInput)));
    }
}
