use crate::error::{ChartError, Result};
use serde_json::Value;
use std::path::Path;

/// Read a JSON document from `path` into a generic value tree.
///
/// No shape validation happens here; the normalizer owns that.
pub fn read_json(path: &Path) -> Result<Value> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| ChartError::MalformedInput(format!("{}: {}", path.display(), e)))?;
    serde_json::from_str(&raw)
        .map_err(|e| ChartError::MalformedInput(format!("{}: {}", path.display(), e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_read_valid_json() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"CAS": [1.0, 2.0]}}"#).unwrap();

        let doc = read_json(file.path()).unwrap();
        assert_eq!(doc["CAS"][1], serde_json::json!(2.0));
    }

    #[test]
    fn test_missing_file() {
        let err = read_json(Path::new("/nonexistent/results.json")).unwrap_err();
        assert!(matches!(err, ChartError::MalformedInput(_)));
    }

    #[test]
    fn test_invalid_json() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{{not json").unwrap();

        let err = read_json(file.path()).unwrap_err();
        assert!(matches!(err, ChartError::MalformedInput(_)));
    }
}
