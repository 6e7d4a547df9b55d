//! Validation of operator-supplied input
//!
//! Repository URLs and target roots are checked eagerly when a source is
//! registered. Ref names and module names are operator-controlled strings
//! that end up in filesystem paths and subprocess arguments, so they are
//! restricted to an allow-listed character set before any use.

use crate::error::{CheckoutError, ValidationError};
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;
use url::Url;

static REF_NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9][A-Za-z0-9._/-]*$").expect("ref name regex is valid")
});

static MODULE_NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9][A-Za-z0-9._-]*$").expect("module name regex is valid")
});

/// Check that a repository URL parses and carries both a scheme and a host.
pub fn validate_url(url: &str) -> Result<(), ValidationError> {
    let parsed = Url::parse(url)
        .map_err(|e| ValidationError::invalid_url(url, e.to_string()))?;

    if parsed.host_str().is_none() {
        return Err(ValidationError::invalid_url(url, "URL has no host"));
    }

    Ok(())
}

/// Check that a checkout target root is an absolute path.
pub fn validate_target_root(path: &Path) -> Result<(), ValidationError> {
    if !path.is_absolute() {
        return Err(ValidationError::RelativeTargetRoot {
            path: path.to_path_buf(),
        });
    }
    Ok(())
}

/// Check that a source name is usable as a CLI handle and record key.
pub fn validate_source_name(name: &str) -> Result<(), ValidationError> {
    if !MODULE_NAME_RE.is_match(name) {
        return Err(ValidationError::InvalidSourceName {
            name: name.to_string(),
        });
    }
    Ok(())
}

/// Allow-list check for a ref name before it is used in a subprocess
/// argument or path segment. Slashes are allowed (branch names), `..` and
/// leading punctuation are not.
pub fn validate_ref_name(name: &str) -> Result<(), CheckoutError> {
    if name.contains("..") || !REF_NAME_RE.is_match(name) {
        return Err(CheckoutError::InvalidRefName {
            name: name.to_string(),
        });
    }
    Ok(())
}

/// Allow-list check for a module name before it becomes part of the
/// installation path.
pub fn validate_module_name(name: &str) -> Result<(), CheckoutError> {
    if name.contains("..") || !MODULE_NAME_RE.is_match(name) {
        return Err(CheckoutError::InvalidModuleName {
            name: name.to_string(),
        });
    }
    Ok(())
}

/// Derive a module name from the repository URL basename, stripping a
/// trailing `.git`.
pub fn module_name_from_url(url: &str) -> Option<String> {
    let name = url
        .trim_end_matches('/')
        .rsplit('/')
        .next()?
        .trim_end_matches(".git");

    if name.is_empty() {
        return None;
    }

    Some(name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url_accepts_https() {
        assert!(validate_url("https://github.com/org/repo.git").is_ok());
    }

    #[test]
    fn test_validate_url_rejects_missing_scheme() {
        assert!(validate_url("github.com/org/repo").is_err());
    }

    #[test]
    fn test_validate_url_rejects_missing_host() {
        assert!(validate_url("file:///srv/repo").is_err());
    }

    #[test]
    fn test_validate_target_root() {
        assert!(validate_target_root(Path::new("/srv/modules")).is_ok());
        assert!(validate_target_root(Path::new("modules")).is_err());

        let err = validate_target_root(Path::new("relative/path")).unwrap_err();
        assert!(err.to_string().contains("absolute"));
    }

    #[test]
    fn test_ref_name_allow_list() {
        assert!(validate_ref_name("v1.0.0").is_ok());
        assert!(validate_ref_name("feature/login").is_ok());
        assert!(validate_ref_name("18.0").is_ok());

        // shell metacharacters, traversal, and option-looking names
        assert!(validate_ref_name("v1.0; rm -rf /").is_err());
        assert!(validate_ref_name("../../etc").is_err());
        assert!(validate_ref_name("--upload-pack=/bin/sh").is_err());
        assert!(validate_ref_name("").is_err());
    }

    #[test]
    fn test_module_name_allow_list() {
        assert!(validate_module_name("my-module").is_ok());
        assert!(validate_module_name("repo_backup").is_ok());

        assert!(validate_module_name("a/b").is_err());
        assert!(validate_module_name("..").is_err());
        assert!(validate_module_name("-leading-dash").is_err());
    }

    #[test]
    fn test_module_name_from_url() {
        assert_eq!(
            module_name_from_url("https://github.com/org/my-repo.git"),
            Some("my-repo".to_string())
        );
        assert_eq!(
            module_name_from_url("https://github.com/org/my-repo/"),
            Some("my-repo".to_string())
        );
        assert_eq!(module_name_from_url(""), None);
    }
}
