//! Cookie vault - persisted per-worker session state
//!
//! A vault file is a JSON array of cookie records at
//! `vault/session_{worker_id}.json`, read once while a worker initializes.
//! The vault is read-only; nothing here ever writes one.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::{MusterError, Result};

/// One persisted cookie
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CookieRecord {
    pub name: String,
    pub value: String,
    pub domain: String,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub expires: Option<f64>,
    #[serde(default)]
    pub http_only: bool,
    #[serde(default)]
    pub secure: bool,
}

/// Load a worker's cookie set from its vault file
///
/// Callers treat any error as "no cookies": a missing or malformed vault is
/// never fatal to the worker.
pub fn load(path: &Path) -> Result<Vec<CookieRecord>> {
    let content = fs::read_to_string(path)?;
    let cookies: Vec<CookieRecord> = serde_json::from_str(&content)
        .map_err(|e| MusterError::config(format!("malformed vault {}: {}", path.display(), e)))?;
    Ok(cookies)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_valid_vault() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"name":"sid","value":"abc","domain":".example.com","secure":true}}]"#
        )
        .unwrap();

        let cookies = load(file.path()).unwrap();
        assert_eq!(cookies.len(), 1);
        assert_eq!(cookies[0].name, "sid");
        assert!(cookies[0].secure);
        assert!(!cookies[0].http_only);
    }

    #[test]
    fn test_malformed_vault_is_an_error_not_a_panic() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json at all").unwrap();
        assert!(load(file.path()).is_err());
    }

    #[test]
    fn test_missing_vault() {
        assert!(load(Path::new("/nonexistent/vault/session_9.json")).is_err());
    }
}
